//! Headless fractris runner (default binary).
//!
//! Reads one command per line from stdin and prints the board after each one.
//!
//! - a key name (`left`, `space`, `p`, ...) is looked up in the config keymap
//! - `tick` applies one step of gravity
//! - `select <offset|angle|threshold>` starts editing a control while paused,
//!   a bare `select` stops
//!
//! The config path comes from the first argument or `FRACTRIS_CONFIG`, the
//! seed from `FRACTRIS_SEED`. With `FRACTRIS_JSON` set every frame is printed
//! as a one-line JSON snapshot instead of the text board.

use std::env;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use fractris::session::{ControlField, GameConfig, Session, Transition};

fn main() -> Result<()> {
    let config = load_config()?;
    let seed = env::var("FRACTRIS_SEED")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(1);
    let json = env::var_os("FRACTRIS_JSON").is_some();

    let mut session = Session::new(config, seed)?;
    eprintln!("[Driver] ready (seed {}, json {})", seed, json);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render(&session, json, &mut out)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        if run_command(&mut session, command) == Transition::Menu {
            break;
        }
        render(&session, json, &mut out)?;
    }

    eprintln!(
        "[Driver] exiting, score {}{}",
        session.engine().score(),
        if session.game_over() { " (game over)" } else { "" }
    );
    Ok(())
}

fn load_config() -> Result<GameConfig> {
    match env::args().nth(1).or_else(|| env::var("FRACTRIS_CONFIG").ok()) {
        Some(path) => {
            eprintln!("[Driver] loading config {}", path);
            GameConfig::load(&path)
        }
        None => {
            eprintln!("[Driver] no config given, using built-in defaults");
            Ok(GameConfig::default())
        }
    }
}

fn run_command(session: &mut Session, command: &str) -> Transition {
    if command == "tick" {
        session.tick();
        return Transition::Stay;
    }

    if let Some(rest) = command.strip_prefix("select") {
        let field = ControlField::from_str(rest);
        if !rest.trim().is_empty() && field.is_none() {
            eprintln!("[Driver] unknown control {:?}", rest.trim());
        } else if !session.select_control(field) {
            eprintln!("[Driver] controls can only be edited while paused");
        }
        return Transition::Stay;
    }

    session.handle_key(command)
}

fn render(session: &Session, json: bool, out: &mut impl Write) -> Result<()> {
    let engine = session.engine();

    if json {
        serde_json::to_writer(&mut *out, &engine.snapshot())
            .context("failed to serialize snapshot")?;
        writeln!(out)?;
    } else {
        write!(out, "{}", engine.preview_board())?;
        let next: Vec<&str> = engine
            .preview(fractris::types::PREVIEW_LEN)
            .map(|m| m.name())
            .collect();
        writeln!(
            out,
            "score {} | next {} | {}",
            engine.score(),
            next.join(" "),
            status(session)
        )?;
    }

    out.flush()?;
    Ok(())
}

fn status(session: &Session) -> &'static str {
    if session.game_over() {
        "game over"
    } else if session.paused() {
        "paused"
    } else {
        "playing"
    }
}
