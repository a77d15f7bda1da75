//! Interactive REPL over a [`StateTracker`].

use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::Result;
use colored::Colorize;
use platewatch_application::{StateTracker, UiModelFeed};
use platewatch_core::ALL_STATES;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use crate::command::{self, COMMAND_WORDS, HELP_TEXT, ReplCommand};
use crate::render::render_model;

/// Completes command words, and state names after `see` / `unsee`.
#[derive(Clone, Default)]
struct ReplHelper;

impl ReplHelper {
    fn candidates(line: &str) -> (usize, Vec<String>) {
        match line.split_once(' ') {
            None => {
                let words = COMMAND_WORDS
                    .iter()
                    .filter(|word| word.starts_with(&line.to_ascii_lowercase()))
                    .map(|word| word.to_string())
                    .collect();
                (0, words)
            }
            Some((verb, rest)) if matches!(verb.to_ascii_lowercase().as_str(), "see" | "unsee") => {
                let prefix = rest.trim_start();
                let start = line.len() - prefix.len();
                let states = ALL_STATES
                    .iter()
                    .filter(|state| {
                        state
                            .to_ascii_lowercase()
                            .starts_with(&prefix.to_ascii_lowercase())
                    })
                    .map(|state| state.to_string())
                    .collect();
                (start, states)
            }
            Some(_) => (0, Vec::new()),
        }
    }
}

impl Helper for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = Self::candidates(&line[..pos]);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        match line.split_whitespace().next() {
            Some(verb) if COMMAND_WORDS.contains(&verb.to_ascii_lowercase().as_str()) => {
                Owned(line.replacen(verb, &verb.bright_cyan().to_string(), 1))
            }
            _ => Borrowed(line),
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        let (start, words) = Self::candidates(line);
        let typed = &line[start..];
        match words.as_slice() {
            [only] if only.len() > typed.len() => Some(only[typed.len()..].to_string()),
            _ => None,
        }
    }
}

impl Validator for ReplHelper {}

/// What the loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Runs the REPL until `quit` or Ctrl-D.
pub async fn run(tracker: &StateTracker) -> Result<()> {
    let feed = tracker.observe_ui_model();

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ReplHelper));

    println!("{}", "=== Plate Watch ===".bright_magenta().bold());
    println!(
        "{}",
        "Type 'see <state>' when you spot a plate, 'help' for more, 'quit' to exit.".bright_black()
    );
    println!();
    print!("{}", render_model(&feed.current()));

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match execute(tracker, &feed, trimmed).await {
                    Ok(Flow::Quit) => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Ok(Flow::Continue) => {}
                    Err(message) => println!("{}", message.red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Err(err) => {
                tracing::error!("[Repl] readline failed: {}", err);
                return Err(err.into());
            }
        }
    }

    Ok(())
}

/// Parses and runs one line, printing its output.
///
/// `list` re-reads the store first, so changes saved by another
/// `platewatch` process show up. Errors come back as messages for the
/// user; they never end the session.
async fn execute(
    tracker: &StateTracker,
    feed: &UiModelFeed,
    line: &str,
) -> std::result::Result<Flow, String> {
    let command = command::parse(line).map_err(|e| e.to_string())?;

    match command {
        ReplCommand::Quit => return Ok(Flow::Quit),
        ReplCommand::Help => {
            println!("{}", HELP_TEXT);
            return Ok(Flow::Continue);
        }
        ReplCommand::List => {
            tracker.refresh().await.map_err(|e| e.to_string())?;
        }
        ReplCommand::See(label) => tracker.mark_viewed(label).await.map_err(|e| e.to_string())?,
        ReplCommand::Unsee(label) => tracker
            .mark_unviewed(label)
            .await
            .map_err(|e| e.to_string())?,
        ReplCommand::Reset => tracker.reset().await.map_err(|e| e.to_string())?,
        ReplCommand::Undo => {
            if !tracker.undo().await.map_err(|e| e.to_string())? {
                println!("{}", "Nothing to undo.".bright_black());
                return Ok(Flow::Continue);
            }
        }
    }

    print!("{}", render_model(&feed.current()));
    Ok(Flow::Continue)
}
