use crate::Command;
use crate::error::ApplicationResult;
use crate::station::Station;
use clap::Parser;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use tracing::warn;

/// One console line, parsed with the same commands as the command line.
#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ConsoleLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
    pub kinds: Vec<String>,
}

impl CompleteHelper {
    fn new() -> Self {
        let words = |ws: &[&str]| ws.iter().map(|w| w.to_string()).collect();
        CompleteHelper {
            commands: words(&[
                "list",
                "import-data",
                "enqueue",
                "authorize",
                "status",
                "report",
                "reset",
                "help",
                "exit",
            ]),
            kinds: words(&["takeoff", "landing"]),
        }
    }

    fn candidates(choices: &[String], word: &str) -> Vec<Pair> {
        choices
            .iter()
            .filter(|c| c.starts_with(word))
            .map(|c| Pair {
                display: c.clone(),
                replacement: format!("{} ", c),
            })
            .collect()
    }
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = line.get(..pos).unwrap_or(line);
        match line.split_once(' ') {
            None => Ok((0, Self::candidates(&self.commands, line))),
            Some((cmd @ ("enqueue" | "authorize"), kind)) if !kind.contains(' ') => {
                Ok((cmd.len() + 1, Self::candidates(&self.kinds, kind)))
            }
            Some(_) => Ok((pos, vec![])),
        }
    }
}

pub(crate) fn run(station: &mut Station) -> ApplicationResult<()> {
    println!("Tower online. Type 'help' for commands, 'exit' to leave.");

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(CompleteHelper::new()));

    loop {
        match rl.readline("TWR> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                if matches!(trimmed, "exit" | "quit") {
                    break;
                }
                match ConsoleLine::try_parse_from(trimmed.split_whitespace()) {
                    Ok(ConsoleLine { command }) => {
                        station.run(&command);
                    }
                    Err(e) => {
                        if let Err(io) = e.print() {
                            warn!(error = %io, "Could not print usage");
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}
