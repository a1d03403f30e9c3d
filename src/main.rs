use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use std::io::{stdin, stdout, Write};
use std::path::PathBuf;

use connect4_gametree::search::DEFAULT_MAX_DEPTH;
use connect4_gametree::*;

mod console;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Heuristic {
    /// Weighted twos, threes and fours
    Streak,
    /// Center column and long straight runs
    Positional,
    /// Piece count difference
    Pieces,
}

/// Play Connect 4 against a depth-limited game tree agent
#[derive(Parser)]
#[command(name = "connect4_gametree", about = "Play Connect 4 against a game tree agent")]
struct Cli {
    /// CSV file with the starting position: one line per board row, top row
    /// first, 0 = empty, 1 = player one, 2 = player two. The side to
    /// move follows from the piece counts
    board: Option<PathBuf>,

    /// Search depth in plies
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    depth: usize,

    /// Sort the agent's candidate moves by a one ply evaluation before searching
    #[arg(long)]
    ordering: bool,

    /// Search the agent's candidate moves on all cores
    #[arg(long)]
    parallel: bool,

    /// Heuristic used to score positions
    #[arg(long, value_enum, default_value = "streak")]
    evaluator: Heuristic,

    /// Let the agent play player one, which opens the game
    #[arg(long)]
    agent_first: bool,

    /// Print the agent's move for the starting position and exit
    #[arg(long)]
    analyse: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let board = match &cli.board {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading board from {}", path.display()))?
            .parse::<Board>()
            .with_context(|| format!("loading board from {}", path.display()))?,
        None => Board::new(),
    };

    let agent = if cli.agent_first {
        Player::One
    } else {
        Player::Two
    };
    let player = GameTreePlayer::new(cli.depth)
        .with_agent(agent)
        .with_move_ordering(cli.ordering);
    match cli.evaluator {
        Heuristic::Streak => run(&cli, board, player),
        Heuristic::Positional => run(&cli, board, player.with_evaluator(PositionalEvaluator)),
        Heuristic::Pieces => run(&cli, board, player.with_evaluator(PieceCountEvaluator)),
    }
}

/// Runs the agent's search behind a spinner
fn think<E: Evaluator + Clone + Send + Sync>(
    player: &mut GameTreePlayer<E>,
    board: &Board,
    parallel: bool,
) -> Result<SearchResult, GameError> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}"));
    spinner.set_message("Agent is thinking...");
    spinner.enable_steady_tick(100);

    let result = if parallel {
        player.search_parallel(board)
    } else {
        player.search(board)
    };

    spinner.finish_and_clear();
    result
}

fn run<E: Evaluator + Clone + Send + Sync>(
    cli: &Cli,
    mut board: Board,
    mut player: GameTreePlayer<E>,
) -> Result<()> {
    let agent = player.agent();

    if cli.analyse {
        console::display(&board)?;
        match think(&mut player, &board, cli.parallel) {
            Ok(SearchResult {
                score,
                best_move: Some(column),
            }) => println!("Best move: {} (score {})", column + 1, score),
            Ok(SearchResult {
                score,
                best_move: None,
            }) => println!("No move chosen (score {})", score),
            Err(err) => println!("{}", err),
        }
        println!("Positions searched: {}", player.node_count);
        return Ok(());
    }

    let stdin = stdin();
    let mut to_move = board.next_player();

    println!(
        "Welcome to Connect 4, the agent searches {} plies\n",
        player.max_depth()
    );

    // game loop
    loop {
        console::display(&board)?;

        if let Some(message) = console::outcome(board.state(), agent) {
            println!("{}", message);
            break;
        }

        // AI player
        if to_move == agent {
            let result = think(&mut player, &board, cli.parallel)?;
            match result.best_move {
                Some(column) => {
                    println!("Agent plays {} (score {})", column + 1, result.score);
                    board = board.apply(column, agent)?;
                }
                None => {
                    println!("Agent found no move, ending the game as a draw");
                    break;
                }
            }

        // human player
        } else {
            print!("{} move input > ", console::player_name(to_move, agent));
            stdout().flush()?;
            let mut input_str = String::new();
            if stdin.read_line(&mut input_str)? == 0 {
                bail!("input closed before the game finished");
            }

            let column = match input_str.trim().parse::<usize>() {
                Ok(column @ 1..=COLUMNS) => column - 1,
                _ => {
                    println!(
                        "Invalid column: {}. Columns must be between 1 and {}",
                        input_str.trim(),
                        COLUMNS
                    );
                    continue;
                }
            };
            match board.apply(column, to_move) {
                Ok(next) => board = next,
                Err(err) if err.is_invalid_move() => {
                    println!("{}", err);
                    // try the move again
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }
        to_move = to_move.opponent();
    }

    println!(
        "Moves: {}, positions searched: {}",
        board.num_pieces(),
        player.node_count
    );
    Ok(())
}
