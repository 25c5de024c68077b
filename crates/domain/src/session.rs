// crates/domain/src/session.rs
//! Lifecycle of a single import run.
//!
//! ```text
//! Init -> Enumerated -> Opened -> Appending* -> Closed -> Done
//!             |            |          |
//!             +------------+----------+--> Aborted
//! ```

use std::fmt;

use bundle_import_shared_kernel::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Init,
    Enumerated,
    Opened,
    Appending,
    Closed,
    Done,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    /// Full listing obtained and sorted.
    Listed,
    /// The listing held nothing to import.
    NoEntries,
    /// Destination bundle opened for writing.
    Opened,
    /// One target classified, and appended unless unsupported.
    ItemProcessed,
    Closed,
    Reported,
    /// A fatal error ended the run.
    Failed,
}

impl SessionState {
    pub fn next(self, event: SessionEvent) -> DomainResult<Self> {
        use SessionEvent as E;
        use SessionState as S;

        match (self, event) {
            (S::Init, E::Listed) => Ok(S::Enumerated),
            (S::Enumerated, E::NoEntries) => Ok(S::Aborted),
            (S::Enumerated, E::Opened) => Ok(S::Opened),
            (S::Opened | S::Appending, E::ItemProcessed) => Ok(S::Appending),
            (S::Opened | S::Appending, E::Closed) => Ok(S::Closed),
            (S::Closed, E::Reported) => Ok(S::Done),
            (S::Init | S::Enumerated | S::Opened | S::Appending | S::Closed, E::Failed) => Ok(S::Aborted),
            (state, event) => Err(DomainError::IllegalTransition {
                state: state.to_string(),
                event: format!("{event:?}"),
            }),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "INIT",
            Self::Enumerated => "ENUMERATED",
            Self::Opened => "OPENED",
            Self::Appending => "APPENDING",
            Self::Closed => "CLOSED",
            Self::Done => "DONE",
            Self::Aborted => "ABORTED",
        };
        f.write_str(name)
    }
}

/// Running counters of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub accepted: usize,
    pub skipped: usize,
}

impl ImportSummary {
    pub fn record_accepted(&mut self) {
        self.accepted += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn total(&self) -> usize {
        self.accepted + self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(events: &[SessionEvent]) -> DomainResult<SessionState> {
        events.iter().try_fold(SessionState::Init, |state, event| state.next(*event))
    }

    #[test]
    fn happy_path_reaches_done() {
        use SessionEvent::*;
        let state = drive(&[Listed, Opened, ItemProcessed, ItemProcessed, Closed, Reported]).unwrap();
        assert_eq!(state, SessionState::Done);
    }

    #[test]
    fn open_then_close_without_items_is_allowed() {
        use SessionEvent::*;
        assert_eq!(drive(&[Listed, Opened, Closed, Reported]).unwrap(), SessionState::Done);
    }

    #[test]
    fn empty_listing_aborts_before_opening() {
        use SessionEvent::*;
        assert_eq!(drive(&[Listed, NoEntries]).unwrap(), SessionState::Aborted);
        assert!(drive(&[Listed, NoEntries, Opened]).is_err());
    }

    #[test]
    fn failures_abort_from_any_live_state() {
        use SessionEvent::*;
        assert_eq!(drive(&[Listed, Failed]).unwrap(), SessionState::Aborted);
        assert_eq!(drive(&[Listed, Opened, ItemProcessed, Failed]).unwrap(), SessionState::Aborted);
        assert!(SessionState::Aborted.is_terminal());
    }

    #[test]
    fn appending_before_open_is_illegal() {
        let err = SessionState::Enumerated.next(SessionEvent::ItemProcessed).unwrap_err();
        assert!(err.to_string().contains("ENUMERATED"));
    }

    #[test]
    fn summary_counts_both_outcomes() {
        let mut summary = ImportSummary::default();
        summary.record_accepted();
        summary.record_skipped();
        summary.record_skipped();
        assert_eq!(summary, ImportSummary { accepted: 1, skipped: 2 });
        assert_eq!(summary.total(), 3);
    }
}
