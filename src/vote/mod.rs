//! Duplicate-vote prevention.
//!
//! A candidate's controls move `Unvoted → Voting → Voted`, falling back to
//! `Unvoted` when the request fails. `Voted` is terminal for this browser
//! profile: it is remembered in the [`VoteLedger`] and restored on mount.

pub mod controller;
pub mod ledger;

pub use controller::{VoteController, VoteError, VoteView};
pub use ledger::VoteLedger;

use crate::model::VoteType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteState {
    Unvoted,
    Voting(VoteType),
    /// Type is unknown when the vote was reported by the server for a
    /// shared visitor token rather than cast here.
    Voted(Option<VoteType>),
}

impl VoteState {
    pub fn is_disabled(&self) -> bool {
        !matches!(self, VoteState::Unvoted)
    }

    pub fn is_voted(&self) -> bool {
        matches!(self, VoteState::Voted(_))
    }
}
