//! The REST backend as seen from the client.
//!
//! Every flow in the crate talks to the backend through [`PollApi`], so
//! pages and controllers can run against [`ApiClient`] in production and a
//! hand-written mock in tests.

use async_trait::async_trait;

use crate::model::{
    Candidate, CandidateId, Chhetra, ChhetraId, Comment, ContactAck, ContactRequest, VoteCounts,
    VoteStatus, VoteTotals,
};

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{CommentRequest, CommentsResponse, LikeRequest, VoteRequest};

pub type ApiResult<T> = Result<T, ApiError>;

#[async_trait]
pub trait PollApi: Send + Sync {
    // GET /candidates
    async fn candidates(&self) -> ApiResult<Vec<Candidate>>;

    // GET /candidates/{id}
    async fn candidate(&self, id: CandidateId) -> ApiResult<Candidate>;

    // GET /chhetras
    async fn chhetras(&self) -> ApiResult<Vec<Chhetra>>;

    // GET /chhetras/{id}/candidates
    async fn chhetra_candidates(&self, id: ChhetraId) -> ApiResult<Vec<Candidate>>;

    // POST /votes
    async fn cast_vote(&self, req: &VoteRequest) -> ApiResult<VoteCounts>;

    // GET /votes?candidateId=&fingerprint=
    async fn vote_status(&self, candidate_id: CandidateId, fingerprint: &str)
        -> ApiResult<VoteStatus>;

    // GET /api/votes/stats
    async fn vote_stats(&self) -> ApiResult<VoteTotals>;

    // POST /comments
    async fn post_comment(&self, req: &CommentRequest) -> ApiResult<CommentsResponse>;

    // GET /comments?candidateId=&fingerprint=
    async fn comments(
        &self,
        candidate_id: CandidateId,
        fingerprint: Option<&str>,
    ) -> ApiResult<Vec<Comment>>;

    // POST /comments/{id}/like
    async fn like_comment(&self, comment_id: i64, fingerprint: &str) -> ApiResult<()>;

    // POST /contact
    async fn send_contact(&self, req: &ContactRequest) -> ApiResult<ContactAck>;
}
