//! Subset-sum move generation shared by both players
//!
//! A move is 1 to 4 distinct square values whose sum equals the dice total.
//! Board sizes top out at 11, so exhaustive enumeration is at worst
//! C(11,4) = 330 combinations; brute force is intentional and sufficient.

use crate::view::Log;

/// A candidate move: the square values to cover or uncover, in the order
/// they were enumerated. Transient per decision, never persisted.
pub type Move = Vec<u8>;

/// Every combination of 1 to 4 values from `available` summing to `target`,
/// preserving the input's enumeration order.
pub fn all_valid_moves(available: &[u8], target: u8) -> Vec<Move> {
    let mut moves = Vec::new();
    let n = available.len();
    let target = target as u16;

    for i in 0..n {
        let a = available[i] as u16;
        if a == target {
            moves.push(vec![available[i]]);
        }
        for j in i + 1..n {
            let b = a + available[j] as u16;
            if b == target {
                moves.push(vec![available[i], available[j]]);
            }
            for k in j + 1..n {
                let c = b + available[k] as u16;
                if c == target {
                    moves.push(vec![available[i], available[j], available[k]]);
                }
                for l in k + 1..n {
                    if c + available[l] as u16 == target {
                        moves.push(vec![
                            available[i],
                            available[j],
                            available[k],
                            available[l],
                        ]);
                    }
                }
            }
        }
    }
    moves
}

/// Pick the preferred move: fewest squares when covering (sacrifice as
/// little as possible per move), most squares when uncovering (maximize
/// opponent damage). Ties go to the first move encountered.
pub fn choose_best_move(moves: &[Move], for_cover: bool) -> Option<&Move> {
    let mut best = moves.first()?;
    for mv in moves {
        let better = if for_cover {
            mv.len() < best.len()
        } else {
            mv.len() > best.len()
        };
        if better {
            best = mv;
        }
    }
    Some(best)
}

/// Render one move as `{ a, b, c }`.
pub fn format_move(mv: &[u8]) -> String {
    let inner = mv
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{ {inner} }}")
}

/// Write every candidate move to the transcript.
pub fn display_valid_moves(moves: &[Move], log: &mut dyn Log) {
    if moves.is_empty() {
        log.record("No valid moves available.");
        return;
    }
    let mut out = String::from("Valid moves:\n");
    for mv in moves {
        out.push_str(&format_move(mv));
        out.push('\n');
    }
    log.record(&out);
}
