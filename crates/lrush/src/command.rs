//! Line command parser
//!
//! One command per line, verbs case-insensitive:
//! ```text
//! READ <key> | R <key>
//! WRITE <key> | W <key>
//! RESET [capacity]
//! SHOW | S
//! STATS
//! HISTORY | H
//! DUMP
//! HELP | ?
//! EXIT | E
//! ```

use std::fmt;

use nom::{
    bytes::complete::take_till1,
    character::complete::{digit1, multispace0, multispace1},
    combinator::{all_consuming, map_res},
    multi::separated_list1,
    sequence::delimited,
    IResult,
};

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Probe a key
    Read(String),
    /// Insert or promote a key
    Write(String),
    /// Clear the cache, optionally switching capacity
    Reset(Option<usize>),
    /// Show resident keys, LRU first
    Show,
    /// Show hit/miss counters
    Stats,
    /// Show the operation log
    History,
    /// Print a JSON snapshot of the session
    Dump,
    /// Print usage
    Help,
    /// Leave the shell
    Exit,
}

/// Rejection for a malformed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line could not be split into words
    Malformed(String),
    /// First word is not a known verb
    UnknownCommand(String),
    /// Known verb with the wrong number of arguments
    WrongArity {
        /// Canonical verb
        command: &'static str,
        /// Expected form
        usage: &'static str,
    },
    /// `RESET` argument is not a positive integer
    InvalidCapacity(String),
    /// The line is not valid UTF-8
    NotUtf8,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Malformed(line) => write!(f, "Invalid command: cannot parse '{}'", line),
            ParseError::UnknownCommand(verb) => write!(f, "Invalid command: unknown '{}'", verb),
            ParseError::WrongArity { command, usage } => {
                write!(f, "Invalid command: {} expects '{}'", command, usage)
            }
            ParseError::InvalidCapacity(arg) => write!(
                f,
                "Invalid command: capacity '{}' is not a positive integer",
                arg
            ),
            ParseError::NotUtf8 => f.write_str("Invalid command: line is not valid UTF-8"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse one raw input line, rejecting bytes that are not UTF-8
pub fn parse_line(line: &[u8]) -> Result<Option<Command>, ParseError> {
    match std::str::from_utf8(line) {
        Ok(line) => parse_command(line),
        Err(_) => Err(ParseError::NotUtf8),
    }
}

/// Parse one input line; blank lines yield `Ok(None)`
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let words = match all_consuming(words)(line) {
        Ok((_, words)) => words,
        Err(_) => return Err(ParseError::Malformed(line.trim().to_string())),
    };

    let (verb, args) = match words.split_first() {
        Some(split) => split,
        None => return Ok(None),
    };

    let command = match verb.to_ascii_uppercase().as_str() {
        "READ" | "R" => Command::Read(single_key(args, "READ", "READ <key>")?),
        "WRITE" | "W" => Command::Write(single_key(args, "WRITE", "WRITE <key>")?),
        "RESET" => match args {
            [] => Command::Reset(None),
            [arg] => Command::Reset(Some(parse_capacity(arg)?)),
            _ => {
                return Err(ParseError::WrongArity {
                    command: "RESET",
                    usage: "RESET [capacity]",
                })
            }
        },
        "SHOW" | "S" => no_args(args, Command::Show, "SHOW")?,
        "STATS" => no_args(args, Command::Stats, "STATS")?,
        "HISTORY" | "H" => no_args(args, Command::History, "HISTORY")?,
        "DUMP" => no_args(args, Command::Dump, "DUMP")?,
        "HELP" | "?" => no_args(args, Command::Help, "HELP")?,
        "EXIT" | "E" => Command::Exit,
        _ => return Err(ParseError::UnknownCommand(verb.to_string())),
    };

    Ok(Some(command))
}

/// Parse a positive capacity such as the `RESET` argument
pub fn parse_capacity(input: &str) -> Result<usize, ParseError> {
    match all_consuming(capacity)(input.trim()) {
        Ok((_, n)) if n > 0 => Ok(n),
        _ => Err(ParseError::InvalidCapacity(input.trim().to_string())),
    }
}

fn words(input: &str) -> IResult<&str, Vec<&str>> {
    delimited(
        multispace0,
        separated_list1(multispace1, take_till1(char::is_whitespace)),
        multispace0,
    )(input)
}

fn capacity(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(input)
}

fn single_key(
    args: &[&str],
    command: &'static str,
    usage: &'static str,
) -> Result<String, ParseError> {
    match args {
        [key] => Ok((*key).to_string()),
        _ => Err(ParseError::WrongArity { command, usage }),
    }
}

fn no_args(args: &[&str], command: Command, name: &'static str) -> Result<Command, ParseError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(ParseError::WrongArity {
            command: name,
            usage: name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write() {
        assert_eq!(
            parse_command("READ a").unwrap(),
            Some(Command::Read("a".to_string()))
        );
        assert_eq!(
            parse_command("w b").unwrap(),
            Some(Command::Write("b".to_string()))
        );
        assert_eq!(
            parse_command("  r   key1  ").unwrap(),
            Some(Command::Read("key1".to_string()))
        );
    }

    #[test]
    fn test_case_insensitive_verbs() {
        assert_eq!(
            parse_command("Write X").unwrap(),
            Some(Command::Write("X".to_string()))
        );
        assert_eq!(parse_command("exit").unwrap(), Some(Command::Exit));
        assert_eq!(parse_command("E").unwrap(), Some(Command::Exit));
    }

    #[test]
    fn test_keys_keep_case() {
        assert_eq!(
            parse_command("read MixedCase").unwrap(),
            Some(Command::Read("MixedCase".to_string()))
        );
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("   \t ").unwrap(), None);
    }

    #[test]
    fn test_trailing_newline() {
        assert_eq!(
            parse_command("READ a\r\n").unwrap(),
            Some(Command::Read("a".to_string()))
        );
    }

    #[test]
    fn test_missing_key() {
        let err = parse_command("READ").unwrap_err();
        assert_eq!(
            err,
            ParseError::WrongArity {
                command: "READ",
                usage: "READ <key>"
            }
        );
    }

    #[test]
    fn test_too_many_args() {
        assert!(parse_command("WRITE a b").is_err());
        assert!(parse_command("SHOW now").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_command("FETCH a").unwrap_err();
        assert_eq!(err, ParseError::UnknownCommand("FETCH".to_string()));
        assert_eq!(err.to_string(), "Invalid command: unknown 'FETCH'");
    }

    #[test]
    fn test_reset() {
        assert_eq!(parse_command("RESET").unwrap(), Some(Command::Reset(None)));
        assert_eq!(
            parse_command("reset 7").unwrap(),
            Some(Command::Reset(Some(7)))
        );
    }

    #[test]
    fn test_reset_rejects_bad_capacity() {
        assert_eq!(
            parse_command("RESET 0").unwrap_err(),
            ParseError::InvalidCapacity("0".to_string())
        );
        assert_eq!(
            parse_command("RESET -3").unwrap_err(),
            ParseError::InvalidCapacity("-3".to_string())
        );
        assert!(parse_command("RESET lots").is_err());
    }

    #[test]
    fn test_introspection_commands() {
        assert_eq!(parse_command("show").unwrap(), Some(Command::Show));
        assert_eq!(parse_command("STATS").unwrap(), Some(Command::Stats));
        assert_eq!(parse_command("h").unwrap(), Some(Command::History));
        assert_eq!(parse_command("DUMP").unwrap(), Some(Command::Dump));
        assert_eq!(parse_command("?").unwrap(), Some(Command::Help));
    }

    #[test]
    fn test_help_takes_no_args() {
        assert_eq!(
            parse_command("HELP me").unwrap_err(),
            ParseError::WrongArity {
                command: "HELP",
                usage: "HELP"
            }
        );
    }

    #[test]
    fn test_parse_line_rejects_invalid_utf8() {
        assert_eq!(parse_line(b"W \xff\xfe\n").unwrap_err(), ParseError::NotUtf8);
        assert_eq!(
            parse_line(b"W a\n").unwrap(),
            Some(Command::Write("a".to_string()))
        );
    }

    #[test]
    fn test_parse_capacity() {
        assert_eq!(parse_capacity(" 12 ").unwrap(), 12);
        assert!(parse_capacity("1.5").is_err());
        assert!(parse_capacity("").is_err());
    }
}
