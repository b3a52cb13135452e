use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{ledger::VoteLedger, VoteState};
use crate::{
    api::{ApiError, PollApi, VoteRequest},
    identity::IdentityProvider,
    model::{CandidateId, VoteCounts, VoteType},
};

#[derive(Error, Debug)]
pub enum VoteError {
    #[error("Vote already recorded")]
    AlreadyVoted,

    #[error("Vote is already being submitted")]
    InFlight,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// What the vote controls should currently show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteView {
    pub state: VoteState,
    pub counts: VoteCounts,
}

struct Inner {
    state: VoteState,
    counts: VoteCounts,
    // counts as they were when the in-flight vote was clicked
    before_vote: Option<VoteCounts>,
}

/// Vote controls for one candidate on one page.
///
/// The lock is only held while reading or flipping state, never across a
/// request, so a second `vote` during a submission sees `Voting` and is
/// turned away without touching the network.
pub struct VoteController {
    candidate_id: CandidateId,
    api: Arc<dyn PollApi>,
    identity: Arc<IdentityProvider>,
    ledger: VoteLedger,
    inner: Mutex<Inner>,
}

impl VoteController {
    pub fn new(
        candidate_id: CandidateId,
        initial: VoteCounts,
        api: Arc<dyn PollApi>,
        identity: Arc<IdentityProvider>,
        ledger: VoteLedger,
    ) -> Self {
        Self {
            candidate_id,
            api,
            identity,
            ledger,
            inner: Mutex::new(Inner {
                state: VoteState::Unvoted,
                counts: initial,
                before_vote: None,
            }),
        }
    }

    pub fn candidate_id(&self) -> CandidateId {
        self.candidate_id
    }

    /// Restores `Voted` from the local ledger, then asks the server about a
    /// shared visitor token if the page carried one.
    pub async fn mount(&self, shared_visitor: Option<&str>) {
        let visitor = self.identity.get_identity().await;
        match self.ledger.state_for(&visitor, self.candidate_id) {
            Ok(VoteState::Voted(vote_type)) => {
                let mut inner = self.inner.lock().await;
                if inner.state == VoteState::Unvoted {
                    inner.state = VoteState::Voted(vote_type);
                }
            }
            Ok(_) => {}
            Err(e) => warn!(candidate = self.candidate_id, "vote ledger read failed: {e}"),
        }

        if let Some(token) = shared_visitor.map(str::trim).filter(|t| !t.is_empty()) {
            self.sync_shared_visitor(token).await;
        }
    }

    async fn sync_shared_visitor(&self, token: &str) {
        let status = match self.api.vote_status(self.candidate_id, token).await {
            Ok(status) => status,
            Err(e) => {
                debug!(candidate = self.candidate_id, "shared visitor status check failed: {e}");
                return;
            }
        };

        if !status.already_voted {
            return;
        }

        let mut inner = self.inner.lock().await;
        if let Some(support) = status.support_count {
            inner.counts.support_count = support;
        }
        if let Some(oppose) = status.oppose_count {
            inner.counts.oppose_count = oppose;
        }
        match inner.state {
            VoteState::Unvoted => inner.state = VoteState::Voted(None),
            VoteState::Voting(_) | VoteState::Voted(_) => {}
        }
    }

    pub async fn vote(&self, vote_type: VoteType) -> Result<VoteCounts, VoteError> {
        {
            let mut inner = self.inner.lock().await;
            match inner.state {
                VoteState::Voted(_) => return Err(VoteError::AlreadyVoted),
                VoteState::Voting(_) => return Err(VoteError::InFlight),
                VoteState::Unvoted => {}
            }
            inner.state = VoteState::Voting(vote_type);
            inner.before_vote = Some(inner.counts);
            inner.counts.bump(vote_type);
        }

        let visitor = self.identity.get_identity().await;
        let req = VoteRequest {
            candidate_id: self.candidate_id,
            vote_type,
            fingerprint: Some(visitor.clone()),
        };

        match self.api.cast_vote(&req).await {
            Ok(counts) => {
                {
                    let mut inner = self.inner.lock().await;
                    inner.counts = counts;
                    inner.before_vote = None;
                    inner.state = VoteState::Voted(Some(vote_type));
                }
                self.persist(&visitor, vote_type).await;
                info!(candidate = self.candidate_id, %vote_type, "vote recorded");
                Ok(counts)
            }
            Err(e) => {
                let mut inner = self.inner.lock().await;
                if let Some(before) = inner.before_vote.take() {
                    inner.counts = before;
                }
                inner.state = VoteState::Unvoted;
                debug!(candidate = self.candidate_id, "vote failed, rolled back: {e}");
                Err(e.into())
            }
        }
    }

    async fn persist(&self, visitor: &str, vote_type: VoteType) {
        if let Err(e) = self.ledger.record(visitor, self.candidate_id, vote_type) {
            warn!(candidate = self.candidate_id, "vote confirmed but not persisted: {e}");
        }
        // a fallback id is not seen again next session
        if self.identity.is_fallback().await {
            if let Err(e) = self.ledger.record_for_profile(self.candidate_id, vote_type) {
                warn!(candidate = self.candidate_id, "profile vote marker not persisted: {e}");
            }
        }
    }

    pub async fn view(&self) -> VoteView {
        let inner = self.inner.lock().await;
        VoteView {
            state: inner.state,
            counts: inner.counts,
        }
    }

    pub async fn counts(&self) -> VoteCounts {
        self.inner.lock().await.counts
    }

    pub async fn state(&self) -> VoteState {
        self.inner.lock().await.state
    }

    pub async fn is_disabled(&self) -> bool {
        self.state().await.is_disabled()
    }
}
