//! Page-level flows. A page either loads or shows the server's error text
//! inline; nothing a collaborator does is allowed to escape as a panic.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::debug;

pub mod candidate;
pub mod chhetra;
pub mod contact;
pub mod explore;

pub use candidate::CandidatePage;
pub use chhetra::ChhetraPage;
pub use contact::{submit_contact, ContactError};
pub use explore::ExplorePage;

use crate::{
    api::{ApiError, PollApi},
    comments::CommentThread,
    identity::IdentityProvider,
    model::{Candidate, VoteCounts},
    share,
    vote::{VoteController, VoteLedger},
};

#[derive(Debug, Clone, PartialEq)]
pub enum PageState<T> {
    Ready(T),
    Failed(String),
}

impl<T> PageState<T> {
    pub fn from_result(res: Result<T, ApiError>) -> Self {
        match res {
            Ok(page) => PageState::Ready(page),
            Err(e) => {
                debug!("page load failed: {e}");
                PageState::Failed(e.message())
            }
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            PageState::Ready(page) => Some(page),
            PageState::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PageState::Ready(_) => None,
            PageState::Failed(msg) => Some(msg),
        }
    }
}

/// Everything a page needs to talk as the current visitor.
#[derive(Clone)]
pub struct Session {
    api: Arc<dyn PollApi>,
    identity: Arc<IdentityProvider>,
    ledger: VoteLedger,
    shared_visitor: Option<String>,
}

impl Session {
    pub fn new(api: Arc<dyn PollApi>, identity: Arc<IdentityProvider>, ledger: VoteLedger) -> Self {
        Self {
            api,
            identity,
            ledger,
            shared_visitor: None,
        }
    }

    pub fn with_shared_visitor(mut self, token: Option<String>) -> Self {
        self.shared_visitor = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }

    /// Picks up `asVisitor` from the url the page was opened with.
    pub fn for_page_url(self, url: &str) -> Self {
        let token = share::shared_visitor(url);
        self.with_shared_visitor(token)
    }

    pub fn api(&self) -> &Arc<dyn PollApi> {
        &self.api
    }

    pub fn identity(&self) -> &Arc<IdentityProvider> {
        &self.identity
    }

    pub fn shared_visitor(&self) -> Option<&str> {
        self.shared_visitor.as_deref()
    }

    /// Mounted vote controls seeded with the candidate's listed tallies.
    pub async fn vote_controls(&self, candidate: &Candidate) -> VoteController {
        let votes = VoteController::new(
            candidate.id,
            VoteCounts::new(candidate.support_count, candidate.oppose_count),
            self.api.clone(),
            self.identity.clone(),
            self.ledger.clone(),
        );
        votes.mount(self.shared_visitor()).await;
        votes
    }

    pub async fn vote_controls_for(&self, candidates: &[Candidate]) -> Vec<VoteController> {
        join_all(candidates.iter().map(|c| self.vote_controls(c))).await
    }

    /// Comment thread seeded with embedded comments, then refreshed. A failed
    /// refresh keeps whatever was embedded.
    pub async fn comment_thread(&self, candidate: &Candidate) -> CommentThread {
        let thread = CommentThread::new(
            candidate.id,
            candidate.comments.clone().unwrap_or_default(),
            self.api.clone(),
            self.identity.clone(),
        );
        if let Err(e) = thread.refresh(self.shared_visitor()).await {
            debug!(candidate = candidate.id, "comment refresh failed: {e}");
        }
        thread
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::Session;
    use crate::{
        identity::{IdentityProvider, DEFAULT_PROBE_TIMEOUT},
        storage::MemoryStore,
        testing::{MockApi, StaticProbe},
        vote::VoteLedger,
    };

    pub fn session(api: Arc<MockApi>) -> Session {
        let identity = Arc::new(IdentityProvider::new(
            Arc::new(StaticProbe("visitor-1")),
            DEFAULT_PROBE_TIMEOUT,
        ));
        Session::new(api, identity, VoteLedger::new(Arc::new(MemoryStore::new())))
    }
}
