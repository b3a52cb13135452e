use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use super::VoteState;
use crate::{
    model::{CandidateId, VoteRecord, VoteType},
    storage::KeyValueStore,
};

/// Local "already voted" markers, one per (visitor, candidate).
///
/// Sessions without a stable device id also write a profile marker keyed by
/// candidate alone, since their visitor id changes every session.
#[derive(Clone)]
pub struct VoteLedger {
    store: Arc<dyn KeyValueStore>,
}

impl VoteLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn key(visitor: &str, candidate_id: CandidateId) -> String {
        format!("voted:{visitor}:{candidate_id}")
    }

    pub fn profile_key(candidate_id: CandidateId) -> String {
        format!("voted-profile:{candidate_id}")
    }

    /// `Voted` whenever either marker exists, even one we cannot parse.
    pub fn state_for(&self, visitor: &str, candidate_id: CandidateId) -> Result<VoteState> {
        match self.read(&Self::key(visitor, candidate_id))? {
            VoteState::Unvoted => self.read(&Self::profile_key(candidate_id)),
            voted => Ok(voted),
        }
    }

    fn read(&self, key: &str) -> Result<VoteState> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(VoteState::Unvoted);
        };

        match serde_json::from_str::<VoteRecord>(&raw) {
            Ok(record) => Ok(VoteState::Voted(Some(record.vote_type))),
            Err(e) => {
                warn!(%key, "unreadable vote marker: {e}");
                Ok(VoteState::Voted(None))
            }
        }
    }

    pub fn record(&self, visitor: &str, candidate_id: CandidateId, vote_type: VoteType) -> Result<()> {
        let value = serde_json::to_string(&VoteRecord { vote_type })?;
        self.store.set(&Self::key(visitor, candidate_id), &value)
    }

    pub fn record_for_profile(&self, candidate_id: CandidateId, vote_type: VoteType) -> Result<()> {
        let value = serde_json::to_string(&VoteRecord { vote_type })?;
        self.store.set(&Self::profile_key(candidate_id), &value)
    }
}
