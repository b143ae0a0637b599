//! Command decoding.
//!
//! One command per line, fields separated by whitespace:
//!
//! | Line | Command |
//! |---|---|
//! | `addent <name>` | [`Command::AddEntity`] |
//! | `delent <name>` | [`Command::DeleteEntity`] |
//! | `addrel <orig> <dest> <rel>` | [`Command::AddRelation`] |
//! | `delrel <orig> <dest> <rel>` | [`Command::DeleteRelation`] |
//! | `report` | [`Command::Report`] |
//! | `end` | [`Command::End`] |
//!
//! Names are opaque tokens; quotes, if present, are part of the name.

use crate::error::ProtocolError;
use std::fmt;
use std::str::FromStr;

/// Longest accepted entity or relation name, in bytes.
pub const DEFAULT_MAX_NAME_LEN: usize = 63;

/// A decoded protocol command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddEntity(String),
    DeleteEntity(String),
    AddRelation {
        origin: String,
        destination: String,
        relation: String,
    },
    DeleteRelation {
        origin: String,
        destination: String,
        relation: String,
    },
    Report,
    End,
}

impl Command {
    /// Decodes one line.
    ///
    /// Blank lines decode to `Ok(None)`. A `max_name_len` of zero disables
    /// the length check.
    pub fn parse(line: &str, max_name_len: usize) -> Result<Option<Self>, ProtocolError> {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = tokens.collect();

        let command = match keyword {
            "addent" => {
                let [name] = take_args::<1>("addent", &args, max_name_len)?;
                Self::AddEntity(name)
            }
            "delent" => {
                let [name] = take_args::<1>("delent", &args, max_name_len)?;
                Self::DeleteEntity(name)
            }
            "addrel" => {
                let [origin, destination, relation] = take_args::<3>("addrel", &args, max_name_len)?;
                Self::AddRelation {
                    origin,
                    destination,
                    relation,
                }
            }
            "delrel" => {
                let [origin, destination, relation] = take_args::<3>("delrel", &args, max_name_len)?;
                Self::DeleteRelation {
                    origin,
                    destination,
                    relation,
                }
            }
            "report" => {
                take_args::<0>("report", &args, max_name_len)?;
                Self::Report
            }
            "end" => {
                take_args::<0>("end", &args, max_name_len)?;
                Self::End
            }
            other => return Err(ProtocolError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }

    /// The protocol keyword for this command.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::AddEntity(_) => "addent",
            Self::DeleteEntity(_) => "delent",
            Self::AddRelation { .. } => "addrel",
            Self::DeleteRelation { .. } => "delrel",
            Self::Report => "report",
            Self::End => "end",
        }
    }

    /// True for commands that can change the store.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Report | Self::End)
    }
}

fn take_args<const N: usize>(
    command: &'static str,
    args: &[&str],
    max_name_len: usize,
) -> Result<[String; N], ProtocolError> {
    if args.len() != N {
        return Err(ProtocolError::WrongArity {
            command,
            expected: N,
            found: args.len(),
        });
    }
    if max_name_len > 0 {
        if let Some(name) = args.iter().find(|a| a.len() > max_name_len) {
            return Err(ProtocolError::NameTooLong {
                name: name.to_string(),
                max: max_name_len,
            });
        }
    }
    Ok(std::array::from_fn(|i| args[i].to_string()))
}

impl FromStr for Command {
    type Err = ProtocolError;

    /// Parses with the default name limit. Blank input is an unknown command.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, DEFAULT_MAX_NAME_LEN)?
            .ok_or_else(|| ProtocolError::UnknownCommand(String::new()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddEntity(name) | Self::DeleteEntity(name) => {
                write!(f, "{} {}", self.keyword(), name)
            }
            Self::AddRelation {
                origin,
                destination,
                relation,
            }
            | Self::DeleteRelation {
                origin,
                destination,
                relation,
            } => write!(f, "{} {} {} {}", self.keyword(), origin, destination, relation),
            Self::Report | Self::End => f.write_str(self.keyword()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Option<Command>, ProtocolError> {
        Command::parse(line, DEFAULT_MAX_NAME_LEN)
    }

    #[test]
    fn test_parse_all_commands() {
        assert_eq!(
            parse("addent \"alice\"").unwrap(),
            Some(Command::AddEntity("\"alice\"".to_string()))
        );
        assert_eq!(
            parse("delent bob").unwrap(),
            Some(Command::DeleteEntity("bob".to_string()))
        );
        assert_eq!(
            parse("addrel a b friend").unwrap(),
            Some(Command::AddRelation {
                origin: "a".to_string(),
                destination: "b".to_string(),
                relation: "friend".to_string(),
            })
        );
        assert_eq!(
            parse("delrel a b friend").unwrap(),
            Some(Command::DeleteRelation {
                origin: "a".to_string(),
                destination: "b".to_string(),
                relation: "friend".to_string(),
            })
        );
        assert_eq!(parse("report").unwrap(), Some(Command::Report));
        assert_eq!(parse("end").unwrap(), Some(Command::End));
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("   \t \r").unwrap(), None);
    }

    #[test]
    fn test_extra_whitespace_and_crlf() {
        assert_eq!(
            parse("  addrel   a\tb  r \r").unwrap(),
            Some(Command::AddRelation {
                origin: "a".to_string(),
                destination: "b".to_string(),
                relation: "r".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse("addentity a"),
            Err(ProtocolError::UnknownCommand("addentity".to_string()))
        );
    }

    #[test]
    fn test_wrong_arity() {
        assert_eq!(
            parse("addrel a b"),
            Err(ProtocolError::WrongArity {
                command: "addrel",
                expected: 3,
                found: 2,
            })
        );
        assert!(matches!(
            parse("report now"),
            Err(ProtocolError::WrongArity { found: 1, .. })
        ));
    }

    #[test]
    fn test_name_too_long() {
        let long = "x".repeat(DEFAULT_MAX_NAME_LEN + 1);
        assert!(matches!(
            parse(&format!("addent {}", long)),
            Err(ProtocolError::NameTooLong { .. })
        ));

        let exact = "x".repeat(DEFAULT_MAX_NAME_LEN);
        assert!(parse(&format!("addent {}", exact)).unwrap().is_some());
        assert!(Command::parse(&format!("addent {}", long), 0).unwrap().is_some());
    }

    #[test]
    fn test_display_matches_wire_format() {
        for line in ["addent a", "delent a", "addrel a b r", "delrel a b r", "report", "end"] {
            let command: Command = line.parse().unwrap();
            assert_eq!(command.to_string(), line);
        }
    }

    #[test]
    fn test_is_mutation() {
        assert!("addent a".parse::<Command>().unwrap().is_mutation());
        assert!(!Command::Report.is_mutation());
        assert!(!Command::End.is_mutation());
    }
}
