//! Terminal front end for the Canoga engine.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use canoga::board::Board;
use canoga::config::CanogaConfig;
use canoga::error::logging::init_from_env;
use canoga::machine::{GameState, TurnAction, TurnStateMachine};
use canoga::view::{GameView, Log};
use canoga::{GameEngine, Seat};

#[derive(Parser, Debug)]
#[command(name = "canoga", version, about = "Two-player Canoga dice board game")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Board size for the first round (9, 10 or 11)
    #[arg(short, long)]
    board_size: Option<usize>,

    /// Fixed RNG seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Resume from a saved game file
    #[arg(short, long)]
    load: Option<PathBuf>,
}

/// What the state machine is currently waiting to hear back about.
enum PendingPrompt {
    RollCount,
    DiePair { roll_index: usize, total: usize },
}

/// View that prints the transcript to stdout and parks manual-input
/// requests for the main loop to answer.
struct TerminalView {
    pending: Option<PendingPrompt>,
    finished: bool,
}

impl TerminalView {
    fn new() -> Self {
        TerminalView {
            pending: None,
            finished: false,
        }
    }

    fn take_pending(&mut self) -> Option<PendingPrompt> {
        self.pending.take()
    }
}

impl Log for TerminalView {
    fn record(&mut self, message: &str) {
        println!("{message}");
    }
}

impl GameView for TerminalView {
    fn refresh_board(&mut self, board: &Board) {
        println!("{}", board.render());
    }

    fn refresh_controls(&mut self, _state: GameState) {}

    fn request_manual_roll_count(&mut self) {
        self.pending = Some(PendingPrompt::RollCount);
    }

    fn request_manual_die_values(&mut self, roll_index: usize, total: usize) {
        self.pending = Some(PendingPrompt::DiePair { roll_index, total });
    }

    fn board_size_changed(&mut self, size: usize) {
        println!("\nBoard rebuilt with {size} squares per row.");
    }

    fn round_complete(&mut self, round: u32, human_score: u32, computer_score: u32) {
        println!("\nRound {round} complete. Totals: Human {human_score}, Computer {computer_score}");
    }

    fn show_tournament_results(&mut self, human_score: u32, computer_score: u32) {
        println!("\n=======Tournament Over=======");
        println!("Human: {human_score}");
        println!("Computer: {computer_score}");
        if human_score > computer_score {
            println!("Human wins the tournament!");
        } else if computer_score > human_score {
            println!("Computer wins the tournament!");
        } else {
            println!("The tournament is a draw!");
        }
        self.finished = true;
    }
}

fn main() -> Result<()> {
    init_from_env().map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CanogaConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => CanogaConfig::default(),
    };
    if let Some(size) = cli.board_size {
        config.game.board_size = size;
    }
    if let Some(seed) = cli.seed {
        config.game.rng_seed = Some(seed);
    }
    config.validate().context("invalid configuration")?;

    let engine = match config.game.rng_seed {
        Some(seed) => GameEngine::with_seed(config.game.board_size, seed),
        None => GameEngine::new(config.game.board_size),
    };
    info!(board_size = config.game.board_size, "starting session");

    let mut machine = TurnStateMachine::new(engine, TerminalView::new());

    if let Some(path) = &cli.load {
        machine
            .request_load(path)
            .with_context(|| format!("failed to resume from {}", path.display()))?;
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        while let Some(prompt) = machine.view_mut().take_pending() {
            match prompt {
                PendingPrompt::RollCount => {
                    let count = read_number(
                        &mut lines,
                        "How many rolls would you like to enter in advance? ",
                    )?;
                    machine.supply_manual_roll_count(count as usize);
                }
                PendingPrompt::DiePair { roll_index, total } => {
                    let first = read_number(
                        &mut lines,
                        &format!("Roll {roll_index} of {total}, first die (1-6): "),
                    )?;
                    let second = read_number(
                        &mut lines,
                        &format!("Roll {roll_index} of {total}, second die (1-6): "),
                    )?;
                    machine.supply_manual_die_pair(
                        u8::try_from(first).unwrap_or(0),
                        u8::try_from(second).unwrap_or(0),
                    );
                }
            }
        }

        if machine.view().finished {
            break;
        }

        match machine.state() {
            GameState::StartGame | GameState::BeginTurn => machine.dispatch(TurnAction::One),
            GameState::WaitForInput => {}
            state => {
                print_menu(state);
                let Some(line) = read_line(&mut lines)? else {
                    break;
                };
                if !handle_command(&mut machine, line.trim())? {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn print_menu(state: GameState) {
    let menu = match state {
        GameState::NumDice => "[1] one die  [2] two dice  [3] help",
        GameState::RollType => "[1] roll randomly  [2] enter rolls manually",
        GameState::MoveType => "[1] cover  [2] uncover  [3] help",
        GameState::MoveSelection => {
            "tap squares with h<N> or c<N>, then: [1] reset  [2] submit  [3] help"
        }
        GameState::RoundEnd => "[1] play another round  [2] end tournament",
        GameState::NewBoardSize => "[1] 9 squares  [2] 10 squares  [3] 11 squares",
        _ => "",
    };
    println!("\n{menu}");
    println!("(also: save <path>, load <path>, quit)");
    print!("> ");
    let _ = io::stdout().flush();
}

/// Returns false when the session should end.
fn handle_command<V: GameView>(machine: &mut TurnStateMachine<V>, input: &str) -> Result<bool> {
    if input.is_empty() {
        return Ok(true);
    }
    let mut parts = input.split_whitespace();
    let head = parts.next().unwrap_or_default();
    match head {
        "quit" | "q" => return Ok(false),
        "save" => {
            let path = parts.next().context("usage: save <path>")?;
            if let Err(e) = machine.request_save(path) {
                println!("Save failed: {e}");
            }
        }
        "load" => {
            let path = parts.next().context("usage: load <path>")?;
            if let Err(e) = machine.request_load(path) {
                println!("Load failed: {e}");
            }
        }
        _ => {
            if let Some((seat, square)) = parse_tap(head) {
                machine.tap_square(seat, square);
            } else if let Some(action) = head
                .parse::<u8>()
                .ok()
                .and_then(TurnAction::from_button)
            {
                machine.dispatch(action);
            } else {
                println!("Unrecognized input: {input}");
            }
        }
    }
    Ok(true)
}

/// Parse `h3` or `c10` style square taps.
fn parse_tap(token: &str) -> Option<(Seat, u8)> {
    let (prefix, rest) = token.split_at(1);
    let seat = match prefix {
        "h" | "H" => Seat::Human,
        "c" | "C" => Seat::Computer,
        _ => return None,
    };
    rest.parse::<u8>().ok().map(|square| (seat, square))
}

fn read_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<Option<String>> {
    match lines.next() {
        Some(line) => Ok(Some(line.context("failed to read input")?)),
        None => Ok(None),
    }
}

fn read_number(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    prompt: &str,
) -> Result<u32> {
    loop {
        print!("{prompt}");
        let _ = io::stdout().flush();
        let Some(line) = read_line(lines)? else {
            anyhow::bail!("input stream closed");
        };
        match line.trim().parse::<u32>() {
            Ok(n) => return Ok(n),
            Err(_) => println!("Please enter a number."),
        }
    }
}
