//! # Terminal Client
//!
//! Walks one user through a weighing session and submits it.
//!
//! ## Flow
//!
//! - Rank all five criteria, then confirm
//! - Step through the four adjacent comparisons, setting how many times more important each one is
//! - Submit from the last comparison, optionally with the value being looked at
//! - Nothing leaves the terminal until that submit
//! - Only a success reply moves on to the completion screen, anything else stays on the comparison
//!   so the submit can be tried again with the same request token
use std::io::{self, BufRead, Write};

use criteria::{Event, Flow, FlowError, Importance, SubmissionRequest};
use reqwest::Client;
use tracing::warn;

pub mod models;
pub mod prompt;
pub mod remote;
pub mod view;

use prompt::{Command, HELP, ParseError, parse};
use remote::submit;

#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Moved(Flow),
    Send(SubmissionRequest),
    Refused(String),
    Help,
    Quit,
}

/// Decides what a command does to `flow` without any I/O.
pub fn step(flow: &Flow, command: Command) -> Step {
    let event = match command {
        Command::Quit => return Step::Quit,
        Command::Help => return Step::Help,
        Command::Submit(displayed) => return prepare_submit(flow, displayed),

        Command::Rank { id, rank } => Event::SetRank {
            id,
            rank: Some(rank),
        },
        Command::Clear { id } => Event::SetRank { id, rank: None },
        Command::Confirm => Event::confirm_ranks(),
        Command::Set(value) => match flow {
            Flow::Comparing(comparing) => Event::SetImportance {
                index: comparing.cursor(),
                value,
            },
            other => {
                return Step::Refused(
                    FlowError::NotAvailable {
                        event: "set importance",
                        stage: other.stage(),
                    }
                    .to_string(),
                );
            }
        },
        Command::Next => Event::Next,
        Command::Previous => Event::Previous,
        Command::Reset => Event::Reset,
    };

    match flow.reduce(event) {
        Ok(next) => Step::Moved(next),
        Err(e) => Step::Refused(e.to_string()),
    }
}

fn prepare_submit(flow: &Flow, displayed: Option<u8>) -> Step {
    let Flow::Comparing(comparing) = flow else {
        return Step::Refused(
            FlowError::NotAvailable {
                event: "submit",
                stage: flow.stage(),
            }
            .to_string(),
        );
    };

    if !comparing.is_last() {
        return Step::Refused("Submit is available on the last comparison".to_string());
    }

    match displayed.map(Importance::try_from).transpose() {
        Ok(displayed) => Step::Send(comparing.submission(displayed)),
        Err(e) => Step::Refused(e.to_string()),
    }
}

pub async fn run(server: &str) -> anyhow::Result<()> {
    let client = Client::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut flow = Flow::new();

    println!("Laptop Selection Criteria Weighing\n");
    println!("{HELP}\n");
    print!("{}", view::render(&flow));

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };

        let command = match parse(&line?) {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match step(&flow, command) {
            Step::Quit => break,
            Step::Help => println!("{HELP}"),
            Step::Refused(reason) => println!("{reason}"),
            Step::Moved(next) => {
                flow = next;
                print!("{}", view::render(&flow));
            }
            Step::Send(request) => match submit(&client, server, &request).await {
                Ok(message) => {
                    flow = flow.reduce(Event::Submitted { message })?;
                    print!("{}", view::render(&flow));
                }
                Err(e) => {
                    warn!("Submit failed: {e}");
                    println!("{e}");
                }
            },
        }
    }

    Ok(())
}
