use thiserror::Error;

pub const HELP: &str = "\
Ranking:    rank <id> <1-5>   clear <id>   confirm
Comparing:  set <1-9>   next   prev   submit [1-9]
Anywhere:   reset   help   quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Rank { id: String, rank: u8 },
    Clear { id: String },
    Confirm,
    Set(u8),
    Next,
    Previous,
    Submit(Option<u8>),
    Reset,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("")]
    Empty,

    #[error("Unknown command {0:?}, type `help` for the list")]
    Unknown(String),

    #[error("`{0}` needs {1}")]
    MissingArgument(&'static str, &'static str),

    #[error("{0:?} is not a number")]
    NotANumber(String),
}

fn number(word: Option<&str>, command: &'static str, what: &'static str) -> Result<u8, ParseError> {
    let word = word.ok_or(ParseError::MissingArgument(command, what))?;

    word.parse()
        .map_err(|_| ParseError::NotANumber(word.to_string()))
}

fn criterion_id(word: Option<&str>, command: &'static str) -> Result<String, ParseError> {
    word.map(str::to_uppercase)
        .ok_or(ParseError::MissingArgument(command, "a criterion id"))
}

/// Range checks are left to the flow, only the shape of the line is checked here.
pub fn parse(line: &str) -> Result<Command, ParseError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(ParseError::Empty);
    };

    let command = match head.to_lowercase().as_str() {
        "rank" => Command::Rank {
            id: criterion_id(words.next(), "rank")?,
            rank: number(words.next(), "rank", "a rank")?,
        },
        "clear" => Command::Clear {
            id: criterion_id(words.next(), "clear")?,
        },
        "confirm" => Command::Confirm,
        "set" => Command::Set(number(words.next(), "set", "an importance")?),
        "next" => Command::Next,
        "prev" | "previous" => Command::Previous,
        "submit" => match words.next() {
            Some(value) => Command::Submit(Some(number(Some(value), "submit", "an importance")?)),
            None => Command::Submit(None),
        },
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(ParseError::Unknown(head.to_string())),
    };

    Ok(command)
}
