//! CLI entry point for the sliding-tile solver.
//!
//! Usage:
//!   tile-astar solve [--preset <1|2>] [options]
//!   tile-astar solve --board 2,8,3,1,6,4,0,7,5 [--goal <tiles>] [options]
//!   tile-astar solve <puzzle.json> | --stdin [options]
//!
//! Options:
//!   --node-budget <n>   Give up after generating this many nodes
//!   --json              Print a JSON report instead of text
//!   -v, --verbose       Log search progress to stderr

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use tile_astar::{solve, Board, Direction, Preset, SearchError, SolverConfig};

#[derive(Parser)]
#[command(name = "tile-astar")]
#[command(about = "Graph-search A* solver for sliding-tile puzzles")]
#[command(version)]
struct Cli {
    /// Log search progress to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find an optimal solution and report search statistics
    Solve {
        /// Path to a puzzle JSON file: {"start": [...], "goal": [...]}
        #[arg(value_name = "FILE", conflicts_with_all = ["stdin", "board"])]
        file: Option<PathBuf>,

        /// Read puzzle JSON from stdin
        #[arg(long, conflicts_with = "board")]
        stdin: bool,

        /// Built-in start board
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=2))]
        preset: u8,

        /// Start board as comma-separated row-major tiles (0 is the blank)
        #[arg(long, value_name = "TILES")]
        board: Option<String>,

        /// Goal board as comma-separated row-major tiles
        #[arg(long, value_name = "TILES")]
        goal: Option<String>,

        /// Maximum number of nodes to generate
        #[arg(long)]
        node_budget: Option<usize>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Puzzle file format
#[derive(Debug, Deserialize)]
struct PuzzleInput {
    start: Board,
    #[serde(default)]
    goal: Option<Board>,
}

/// JSON report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    path: Vec<Board>,
    moves: Vec<Direction>,
    nodes_generated: usize,
    nodes_expanded: usize,
    depth: u32,
    effective_branching_factor: f64,
    time_elapsed_ms: u64,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Solve {
            file,
            stdin,
            preset,
            board,
            goal,
            node_budget,
            json,
        } => {
            let (start, goal) = match load_puzzle(file, stdin, preset, board, goal) {
                Ok(puzzle) => puzzle,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            if !start.is_solvable_towards(&goal) {
                warn!("start and goal have different parity; the search will exhaust");
            }

            let config = SolverConfig { goal, node_budget };

            let start_time = Instant::now();
            let result = solve(&start, &config);
            let elapsed = start_time.elapsed();

            let solved = result.is_ok();
            if json {
                let output = format_result(&result, elapsed.as_millis() as u64);
                println!("{}", serde_json::to_string_pretty(&output).unwrap());
            } else {
                print_report(&result, elapsed.as_secs_f64());
            }

            if solved {
                std::process::exit(0);
            } else {
                std::process::exit(1);
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "tile_astar=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Resolve the start and goal boards from the command line.
fn load_puzzle(
    file: Option<PathBuf>,
    stdin: bool,
    preset: u8,
    board: Option<String>,
    goal: Option<String>,
) -> Result<(Board, Board), String> {
    let json_content = if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("failed to read from stdin: {}", e))?;
        Some(buffer)
    } else if let Some(path) = file {
        let content = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read file {:?}: {}", path, e))?;
        Some(content)
    } else {
        None
    };

    let goal_override = goal.as_deref().map(parse_tiles).transpose()?;

    if let Some(content) = json_content {
        let input: PuzzleInput = serde_json::from_str(&content)
            .map_err(|e| format!("invalid puzzle JSON: {}", e))?;
        let goal = goal_override
            .or(input.goal)
            .unwrap_or_else(Board::default_goal);
        return Ok((input.start, goal));
    }

    let start = match board {
        Some(tiles) => parse_tiles(&tiles)?,
        None => Preset::from_number(preset)
            .ok_or_else(|| format!("unknown preset {}", preset))?
            .start(),
    };
    Ok((start, goal_override.unwrap_or_else(Board::default_goal)))
}

/// Parse `"2,8,3,1,6,4,0,7,5"` (commas and/or whitespace) into a board.
fn parse_tiles(text: &str) -> Result<Board, String> {
    let tiles = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u8>()
                .map_err(|e| format!("bad tile {:?}: {}", part, e))
        })
        .collect::<Result<Vec<u8>, String>>()?;
    Board::new(&tiles).map_err(|e| e.to_string())
}

fn print_report(result: &Result<tile_astar::Solution, SearchError>, seconds: f64) {
    match result {
        Ok(solution) => {
            let stats = &solution.stats;
            println!("Solution found in {} steps:", stats.depth);
            print!("{}", solution.path[0]);
            for (board, direction) in solution.path[1..].iter().zip(solution.moves()) {
                println!("{}", direction);
                print!("{}", board);
            }
            println!();
            println!("Execution Time: {:.6} seconds", seconds);
            println!("Number of Nodes Generated: {}", stats.generated);
            println!("Number of Nodes Expanded: {}", stats.expanded);
            println!("Depth of the Tree: {}", stats.depth);
            println!(
                "Effective Branching Factor: {:.4}",
                stats.effective_branching_factor()
            );
            println!("Total Path: {}", solution.path.len());
        }
        Err(e) => {
            println!("No solution found: {}", e);
            println!("Execution Time: {:.6} seconds", seconds);
        }
    }
}

fn format_result(
    result: &Result<tile_astar::Solution, SearchError>,
    time_elapsed_ms: u64,
) -> SolveOutput {
    match result {
        Ok(solution) => SolveOutput {
            solved: true,
            reason: None,
            path: solution.path.clone(),
            moves: solution.moves(),
            nodes_generated: solution.stats.generated,
            nodes_expanded: solution.stats.expanded,
            depth: solution.stats.depth,
            effective_branching_factor: solution.stats.effective_branching_factor(),
            time_elapsed_ms,
        },
        Err(e) => {
            let (generated, expanded) = match e {
                SearchError::Unsolvable {
                    generated,
                    expanded,
                }
                | SearchError::NodeBudgetExceeded {
                    generated,
                    expanded,
                    ..
                } => (*generated, *expanded),
                _ => (0, 0),
            };
            SolveOutput {
                solved: false,
                reason: Some(e.to_string()),
                path: Vec::new(),
                moves: Vec::new(),
                nodes_generated: generated,
                nodes_expanded: expanded,
                depth: 0,
                effective_branching_factor: 0.0,
                time_elapsed_ms,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tiles_accepts_commas_and_spaces() {
        let board = parse_tiles("2, 8, 3 1 6 4,0,7,5").unwrap();
        assert_eq!(board, Preset::One.start());
        assert!(parse_tiles("1,2,x,0").is_err());
        assert!(parse_tiles("1,2,3").is_err());
    }

    #[test]
    fn test_load_puzzle_defaults_to_preset_and_default_goal() {
        let (start, goal) = load_puzzle(None, false, 2, None, None).unwrap();
        assert_eq!(start, Preset::Two.start());
        assert_eq!(goal, Board::default_goal());
    }

    #[test]
    fn test_load_puzzle_board_and_goal_override() {
        let (start, goal) =
            load_puzzle(None, false, 1, Some("0,1,3,2".into()), Some("1,2,3,0".into())).unwrap();
        assert_eq!(start.tiles(), &[0, 1, 3, 2]);
        assert_eq!(goal.tiles(), &[1, 2, 3, 0]);
    }

    #[test]
    fn test_puzzle_input_goal_is_optional() {
        let input: PuzzleInput = serde_json::from_str(r#"{"start": [1,2,3,8,0,4,7,6,5]}"#).unwrap();
        assert!(input.goal.is_none());
        assert!(serde_json::from_str::<PuzzleInput>(r#"{"start": [1,2]}"#).is_err());
    }

    #[test]
    fn test_format_result_reports_failure_counters() {
        let result = Err(SearchError::Unsolvable {
            generated: 7,
            expanded: 5,
        });
        let output = format_result(&result, 3);
        assert!(!output.solved);
        assert_eq!(output.nodes_generated, 7);
        assert_eq!(output.nodes_expanded, 5);
        assert!(output.reason.unwrap().contains("no solution"));
    }
}
