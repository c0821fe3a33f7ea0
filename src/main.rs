//! Computer-versus-computer demo.
//!
//! Usage: `sparring_chess [--difficulty random|easy|medium|hard] [--delay-ms N]
//! [--max-plies N] [--fen FEN]`. Diagnostic info lines go to stderr, the
//! final board and move list to stdout.

use std::env;
use std::process::ExitCode;
use std::time::Duration;

use sparring_chess::errors::ChessResult;
use sparring_chess::game_state::chess_types::Color;
use sparring_chess::moves::move_descriptions::Move;
use sparring_chess::move_generation::terminal::GameStatus;
use sparring_chess::session::display::GameDisplay;
use sparring_chess::session::game_record::SessionContext;
use sparring_chess::session::game_session::{GameSession, SessionPhase};
use sparring_chess::session::player::{Difficulty, GameMode};
use sparring_chess::session::session_config::SessionConfig;
use sparring_chess::utils::render_game_state::render_game_state;

struct ConsoleDisplay;

impl GameDisplay for ConsoleDisplay {
    fn move_executed(&mut self, _mv: &Move, san: &str, mover: Color) {
        println!("{mover}: {san}");
    }

    fn game_ended(&mut self, status: GameStatus, _winner: Option<Color>) {
        println!("game over: {status}");
    }

    fn info_line(&mut self, line: &str) {
        eprintln!("{line}");
    }
}

struct DemoArgs {
    difficulty: Difficulty,
    delay: Duration,
    max_plies: usize,
    fen: Option<String>,
}

fn parse_args() -> Result<DemoArgs, String> {
    let mut parsed = DemoArgs {
        difficulty: Difficulty::Easy,
        delay: Duration::ZERO,
        max_plies: 200,
        fen: None,
    };
    let mut args = env::args().skip(1);
    while let Some(flag) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--difficulty" => {
                parsed.difficulty = match value()?.to_ascii_lowercase().as_str() {
                    "random" => Difficulty::Random,
                    "easy" => Difficulty::Easy,
                    "medium" => Difficulty::Medium,
                    "hard" => Difficulty::Hard,
                    other => return Err(format!("unknown difficulty {other}")),
                }
            }
            "--delay-ms" => {
                let millis = value()?.parse::<u64>().map_err(|e| e.to_string())?;
                parsed.delay = Duration::from_millis(millis);
            }
            "--max-plies" => {
                parsed.max_plies = value()?.parse::<usize>().map_err(|e| e.to_string())?;
            }
            "--fen" => parsed.fen = Some(value()?),
            other => return Err(format!("unknown argument {other}")),
        }
    }
    Ok(parsed)
}

fn run(args: DemoArgs) -> ChessResult<()> {
    let config = SessionConfig {
        mode: GameMode::AiOnly,
        difficulty: args.difficulty,
        step_delay: args.delay,
        start_fen: args.fen,
        ..SessionConfig::default()
    };
    let mut context = SessionContext::new();
    let mut session = GameSession::new(config, Box::new(ConsoleDisplay), None, &mut context)?;
    session.start()?;

    let mut plies = 0;
    while plies < args.max_plies && matches!(session.phase(), SessionPhase::SearchInProgress(_)) {
        if session.wait_for_ai_move(Duration::from_secs(60))? {
            plies += 1;
        }
    }
    session.shutdown();

    {
        let game = session.shared_game();
        let game = game
            .lock()
            .map_err(|_| sparring_chess::errors::ChessError::CorruptState("lock poisoned".into()))?;
        println!("{}", render_game_state(&game));
        println!("{}", game.get_fen());
    }
    for (tag, value) in session.record().tag_pairs() {
        println!("[{tag} \"{value}\"]");
    }
    println!("{}", session.san_history()?.join(" "));
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
