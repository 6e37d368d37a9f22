//! Interactive prompt
//!
//! Reads one line at a time from stdin. Single-letter keys run commands,
//! `c N` converts bases, anything else is evaluated against the session.
//! Errors are reported and the loop continues.

use std::io::{self, BufRead, Write};

use bcal_engine::Session;

use crate::render;

const PROMPT: &str = "bcal> ";

/// What the prompt should do with one line of input
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    ShowLast,
    ShowSizes,
    Help,
    Bases(&'a str),
    Evaluate(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    match line {
        "q" | "exit" | "quit" => Command::Quit,
        "r" => Command::ShowLast,
        "s" => Command::ShowSizes,
        "?" => Command::Help,
        _ => match line.strip_prefix('c') {
            // `c` followed by a number, not an expression starting with `c`
            Some(rest) if is_base_argument(rest) => Command::Bases(rest),
            _ => Command::Evaluate(line),
        },
    }
}

fn is_base_argument(rest: &str) -> bool {
    rest.trim_start()
        .starts_with(|c: char| c.is_ascii_digit() || c == 'r' || c == '-')
}

/// Run the prompt until quit, a double empty line, or end of input
pub fn run(session: &mut Session, minimal: bool) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_with(session, minimal, stdin.lock(), &mut stdout)
}

fn run_with<R: BufRead, W: Write>(
    session: &mut Session,
    minimal: bool,
    mut input: R,
    out: &mut W,
) -> anyhow::Result<()> {
    writeln!(out, "q/double Enter -> quit, ? -> help")?;

    let mut empty_lines = 0;
    let mut line = String::new();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        if line.trim().is_empty() {
            empty_lines += 1;
            if empty_lines == 2 {
                break;
            }
            continue;
        }
        empty_lines = 0;

        let cleaned: String = line.trim().chars().filter(|&c| c != ',').collect();
        if cleaned.is_empty() {
            continue;
        }
        tracing::debug!(input = %cleaned, "prompt line");

        match parse_command(&cleaned) {
            Command::Quit => break,
            Command::ShowLast => match session.last_result() {
                Some(last) => write!(out, "{}", render::last_result(last.bytes, last.is_unit))?,
                None => writeln!(out, "no result stored")?,
            },
            Command::ShowSizes => write!(out, "{}", render::storage_sizes())?,
            Command::Help => write!(out, "{}", render::prompt_help())?,
            Command::Bases(value) => match session.base_value(value) {
                Ok(n) => write!(out, "{}", render::bases(n))?,
                Err(e) => writeln!(out, "error: {e}")?,
            },
            Command::Evaluate(expr) => match session.evaluate(expr) {
                Ok(outcome) => write!(
                    out,
                    "{}",
                    render::outcome(&outcome, session.sector_size(), minimal)
                )?,
                Err(e) => writeln!(out, "error: {e}")?,
            },
        }
    }

    Ok(())
}
