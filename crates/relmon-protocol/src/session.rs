//! Command loop.
//!
//! A `Session` owns a store and feeds it commands read line by line from any
//! `BufRead`, writing report output to any `Write`. It stops at `end` or at
//! end of input.

use crate::command::Command;
use crate::config::{ReportFormat, SessionConfig};
use crate::error::{ProtocolError, Result, SessionError};
use relmon_core::RelationStore;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub lines_read: usize,
    /// Commands executed, including ones that changed nothing.
    pub commands: usize,
    /// Commands that actually changed the store.
    pub mutations: usize,
    /// Malformed lines skipped in lenient mode.
    pub skipped: usize,
    pub reports: usize,
    /// Whether the input ended with an explicit `end`.
    pub ended: bool,
}

/// A store driven by protocol commands.
#[derive(Debug, Default)]
pub struct Session {
    store: RelationStore,
    config: SessionConfig,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            store: RelationStore::new(),
            config,
        }
    }

    pub fn store(&self) -> &RelationStore {
        &self.store
    }

    pub fn into_store(self) -> RelationStore {
        self.store
    }

    /// Applies one command. Returns true if the store changed.
    ///
    /// `End` is a no-op here; the loop in `run` handles it.
    pub fn execute<W: Write>(&mut self, command: &Command, out: &mut W) -> Result<bool> {
        let changed = match command {
            Command::AddEntity(name) => self.store.add_entity(name)?,
            Command::DeleteEntity(name) => self.store.delete_entity(name),
            Command::AddRelation {
                origin,
                destination,
                relation,
            } => self.store.add_relation(origin, destination, relation)?,
            Command::DeleteRelation {
                origin,
                destination,
                relation,
            } => self.store.delete_relation(origin, destination, relation),
            Command::Report => {
                self.write_report(out)?;
                false
            }
            Command::End => false,
        };
        Ok(changed)
    }

    fn write_report<W: Write>(&self, out: &mut W) -> Result<()> {
        let report = self.store.report();
        match self.config.format {
            ReportFormat::Text => writeln!(out, "{}", report)?,
            ReportFormat::Json => writeln!(out, "{}", report.to_json()?)?,
        }
        out.flush()?;
        Ok(())
    }

    /// Runs commands from `input` until `end` or end of input.
    ///
    /// Lines that are not valid UTF-8 are treated like any other malformed
    /// line: skipped, or fatal in strict mode.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        out: &mut W,
    ) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;
            summary.lines_read += 1;

            let parsed = match std::str::from_utf8(&buf) {
                Ok(line) => Command::parse(line, self.config.max_name_len),
                Err(_) => Err(ProtocolError::InvalidUtf8),
            };
            let command = match parsed {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(source) if self.config.strict => {
                    return Err(SessionError::Protocol {
                        line: line_no,
                        source,
                    });
                }
                Err(e) => {
                    warn!("Skipping line {}: {}", line_no, e);
                    summary.skipped += 1;
                    continue;
                }
            };

            if command == Command::End {
                summary.ended = true;
                break;
            }

            let changed = self.execute(&command, out)?;
            summary.commands += 1;
            if changed {
                summary.mutations += 1;
            }
            if command == Command::Report {
                summary.reports += 1;
            }
            debug!(line = line_no, command = command.keyword(), changed, "executed");

            if self.config.verify && command.is_mutation() {
                self.store
                    .verify()
                    .map_err(|source| SessionError::Invariant {
                        line: line_no,
                        source,
                    })?;
            }
        }

        out.flush()?;
        info!(
            "Session finished: {} lines, {} commands, {} skipped, {} reports",
            summary.lines_read, summary.commands, summary.skipped, summary.reports
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_with(config: SessionConfig, input: &str) -> (Result<SessionSummary>, String) {
        let mut session = Session::new(config);
        let mut out = Vec::new();
        let result = session.run(input.as_bytes(), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn run(input: &str) -> (SessionSummary, String) {
        let (result, out) = run_with(SessionConfig::default(), input);
        (result.unwrap(), out)
    }

    #[test]
    fn test_basic_report() {
        let (summary, out) = run(
            "addent a\naddent b\naddent c\naddrel a b r1\naddrel c b r1\nreport\nend\n",
        );
        assert_eq!(out, "r1 b 2; \n");
        assert!(summary.ended);
        assert_eq!(summary.commands, 6);
        assert_eq!(summary.mutations, 5);
        assert_eq!(summary.reports, 1);
    }

    #[test]
    fn test_stops_at_end() {
        let (summary, out) = run("report\nend\naddent a\nreport\n");
        assert_eq!(out, "none\n");
        assert_eq!(summary.lines_read, 2);
    }

    #[test]
    fn test_eof_without_end() {
        let (summary, out) = run("addent a\nreport");
        assert_eq!(out, "none\n");
        assert!(!summary.ended);
    }

    #[test]
    fn test_lenient_skips_bad_lines() {
        let (summary, out) = run("addent a\nbogus\naddrel a\n\naddrel a a self\nreport\n");
        assert_eq!(out, "self a 1; \n");
        assert_eq!(summary.skipped, 2);
    }

    #[test]
    fn test_strict_fails_on_bad_line() {
        let config = SessionConfig {
            strict: true,
            ..SessionConfig::default()
        };
        let (result, _) = run_with(config, "addent a\nbogus\n");
        match result {
            Err(SessionError::Protocol { line, source }) => {
                assert_eq!(line, 2);
                assert_eq!(source, ProtocolError::UnknownCommand("bogus".to_string()));
            }
            other => panic!("expected protocol error, got {:?}", other),
        }
    }

    #[test]
    fn test_json_format() {
        let config = SessionConfig {
            format: ReportFormat::Json,
            ..SessionConfig::default()
        };
        let (result, out) = run_with(config, "report\naddent a\naddrel a a r\nreport\n");
        result.unwrap();
        assert_eq!(
            out,
            "{\"relations\":[]}\n{\"relations\":[{\"relation\":\"r\",\"holders\":[\"a\"],\"count\":1}]}\n"
        );
    }

    #[test]
    fn test_verify_mode_passes() {
        let config = SessionConfig {
            verify: true,
            ..SessionConfig::default()
        };
        let (result, _) = run_with(
            config,
            "addent a\naddent b\naddrel a b r\naddrel b a r\ndelent a\nreport\n",
        );
        assert_eq!(result.unwrap().mutations, 5);
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let mut session = Session::default();
        let mut out = Vec::new();
        let input: &[u8] = b"addent a\naddrel a a r\naddent \xff\xfe\nreport\nend\n";
        let summary = session.run(input, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "r a 1; \n");
        assert_eq!(summary.skipped, 1);
        assert!(summary.ended);
    }

    #[test]
    fn test_invalid_utf8_line_fails_strict() {
        let config = SessionConfig {
            strict: true,
            ..SessionConfig::default()
        };
        let mut out = Vec::new();
        let input: &[u8] = b"addent a\n\xc3\x28\nreport\n";
        match Session::new(config).run(input, &mut out) {
            Err(SessionError::Protocol { line, source }) => {
                assert_eq!(line, 2);
                assert_eq!(source, ProtocolError::InvalidUtf8);
            }
            other => panic!("expected protocol error, got {:?}", other),
        }
        assert!(out.is_empty());
    }

    #[test]
    fn test_into_store_keeps_state() {
        let mut session = Session::default();
        let mut out = Vec::new();
        session
            .run("addent a\naddent b\naddrel a b r\n".as_bytes(), &mut out)
            .unwrap();
        let store = session.into_store();
        assert!(store.has_relation("a", "b", "r"));
        assert_eq!(store.stats().edges, 1);
    }

    #[test]
    fn test_execute_single_command() {
        let mut session = Session::default();
        let mut out = Vec::new();
        assert!(session
            .execute(&Command::AddEntity("x".to_string()), &mut out)
            .unwrap());
        assert!(!session
            .execute(&Command::AddEntity("x".to_string()), &mut out)
            .unwrap());
        assert!(session.store().contains_entity("x"));
        assert!(out.is_empty());
    }
}
