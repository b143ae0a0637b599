//! Relmon Protocol - Line-oriented command interface
//!
//! This crate decodes the `addent` / `delent` / `addrel` / `delrel` /
//! `report` / `end` command stream and drives a [`RelationStore`] with it.
//!
//! ```
//! use relmon_protocol::{Session, SessionConfig};
//!
//! let input = "addent a\naddent b\naddrel a b likes\nreport\nend\n";
//! let mut out = Vec::new();
//! Session::new(SessionConfig::default())
//!     .run(input.as_bytes(), &mut out)
//!     .unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "likes b 1; \n");
//! ```
//!
//! [`RelationStore`]: relmon_core::RelationStore

mod command;
mod config;
mod error;
mod session;

pub use command::{Command, DEFAULT_MAX_NAME_LEN};
pub use config::{ReportFormat, SessionConfig};
pub use error::{ConfigError, ProtocolError, Result, SessionError};
pub use session::{Session, SessionSummary};
