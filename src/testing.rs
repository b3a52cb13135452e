//! Hand-written doubles shared by the unit tests.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::Notify;

use crate::{
    api::{ApiError, ApiResult, CommentRequest, CommentsResponse, PollApi, VoteRequest},
    identity::DeviceProbe,
    model::{
        Candidate, CandidateId, Chhetra, ChhetraId, Comment, ContactAck, ContactRequest,
        VoteCounts, VoteStatus, VoteTotals,
    },
};

pub struct StaticProbe(pub &'static str);

#[async_trait]
impl DeviceProbe for StaticProbe {
    async fn visitor_id(&self) -> Result<String> {
        Ok(self.0.to_string())
    }
}

fn server_error(detail: &str) -> ApiError {
    ApiError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        detail: detail.to_string(),
    }
}

fn answer<T: Clone>(res: &Result<T, String>) -> ApiResult<T> {
    res.clone().map_err(|e| server_error(&e))
}

struct Gate {
    arrived: Arc<Notify>,
    release: Arc<Notify>,
}

impl Gate {
    async fn pass(&self) {
        self.arrived.notify_one();
        self.release.notified().await;
    }
}

#[derive(Default)]
struct State {
    candidates: Option<Result<Vec<Candidate>, String>>,
    chhetras: Option<Result<Vec<Chhetra>, String>>,
    vote_result: Option<Result<VoteCounts, String>>,
    status: Option<VoteStatus>,
    comments: Option<Result<Vec<Comment>, String>>,
    contact: Option<Result<ContactAck, String>>,
    like_result: Option<Result<(), String>>,
    sent_votes: Vec<VoteRequest>,
    sent_comments: Vec<CommentRequest>,
    sent_contacts: Vec<ContactRequest>,
    sent_likes: Vec<(i64, String)>,
    status_queries: Vec<(CandidateId, String)>,
    comment_queries: Vec<(CandidateId, Option<String>)>,
}

/// In-memory backend. Unconfigured endpoints answer with a 500.
#[derive(Default)]
pub struct MockApi {
    state: Mutex<State>,
    vote_gate: Mutex<Option<Arc<Gate>>>,
    comment_gate: Mutex<Option<Arc<Gate>>>,
    vote_arrived: Arc<Notify>,
    comment_arrived: Arc<Notify>,
}

impl MockApi {
    fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn set_candidates(&self, res: Result<Vec<Candidate>, String>) {
        self.with(|s| s.candidates = Some(res));
    }

    pub fn set_chhetras(&self, res: Result<Vec<Chhetra>, String>) {
        self.with(|s| s.chhetras = Some(res));
    }

    pub fn set_vote_result(&self, res: Result<VoteCounts, String>) {
        self.with(|s| s.vote_result = Some(res));
    }

    pub fn set_status(&self, status: VoteStatus) {
        self.with(|s| s.status = Some(status));
    }

    pub fn set_comments(&self, res: Result<Vec<Comment>, String>) {
        self.with(|s| s.comments = Some(res));
    }

    pub fn set_contact(&self, res: Result<ContactAck, String>) {
        self.with(|s| s.contact = Some(res));
    }

    pub fn set_like_result(&self, res: Result<(), String>) {
        self.with(|s| s.like_result = Some(res));
    }

    pub fn sent_likes(&self) -> Vec<(i64, String)> {
        self.with(|s| s.sent_likes.clone())
    }

    pub fn sent_votes(&self) -> Vec<VoteRequest> {
        self.with(|s| s.sent_votes.clone())
    }

    pub fn sent_comments(&self) -> Vec<CommentRequest> {
        self.with(|s| s.sent_comments.clone())
    }

    pub fn sent_contacts(&self) -> Vec<ContactRequest> {
        self.with(|s| s.sent_contacts.clone())
    }

    pub fn status_queries(&self) -> Vec<(CandidateId, String)> {
        self.with(|s| s.status_queries.clone())
    }

    pub fn comment_queries(&self) -> Vec<(CandidateId, Option<String>)> {
        self.with(|s| s.comment_queries.clone())
    }

    /// Pending votes wait until the returned handle is notified.
    pub fn hold_votes(&self) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        *self.vote_gate.lock().unwrap() = Some(Arc::new(Gate {
            arrived: self.vote_arrived.clone(),
            release: release.clone(),
        }));
        release
    }

    pub async fn wait_for_vote(&self) {
        self.vote_arrived.notified().await;
    }

    pub fn hold_comments(&self) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        *self.comment_gate.lock().unwrap() = Some(Arc::new(Gate {
            arrived: self.comment_arrived.clone(),
            release: release.clone(),
        }));
        release
    }

    pub async fn wait_for_comment(&self) {
        self.comment_arrived.notified().await;
    }
}

#[async_trait]
impl PollApi for MockApi {
    async fn candidates(&self) -> ApiResult<Vec<Candidate>> {
        self.with(|s| {
            s.candidates
                .as_ref()
                .map(answer)
                .unwrap_or_else(|| Err(server_error("no candidates")))
        })
    }

    async fn candidate(&self, id: CandidateId) -> ApiResult<Candidate> {
        let all = self.candidates().await?;
        all.into_iter().find(|c| c.id == id).ok_or(ApiError::Status {
            status: StatusCode::NOT_FOUND,
            detail: "Candidate not found".into(),
        })
    }

    async fn chhetras(&self) -> ApiResult<Vec<Chhetra>> {
        self.with(|s| {
            s.chhetras
                .as_ref()
                .map(answer)
                .unwrap_or_else(|| Err(server_error("no chhetras")))
        })
    }

    async fn chhetra_candidates(&self, id: ChhetraId) -> ApiResult<Vec<Candidate>> {
        let all = self.candidates().await?;
        Ok(all
            .into_iter()
            .filter(|c| c.chhetra_id == Some(id))
            .collect())
    }

    async fn cast_vote(&self, req: &VoteRequest) -> ApiResult<VoteCounts> {
        let gate = self.vote_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        self.with(|s| {
            s.sent_votes.push(req.clone());
            s.vote_result
                .as_ref()
                .map(answer)
                .unwrap_or_else(|| Err(server_error("votes closed")))
        })
    }

    async fn vote_status(
        &self,
        candidate_id: CandidateId,
        fingerprint: &str,
    ) -> ApiResult<VoteStatus> {
        self.with(|s| {
            s.status_queries
                .push((candidate_id, fingerprint.to_string()));
            s.status
                .clone()
                .ok_or_else(|| server_error("status unavailable"))
        })
    }

    async fn vote_stats(&self) -> ApiResult<VoteTotals> {
        let all = self.candidates().await?;
        Ok(all.iter().fold(VoteTotals::default(), |mut t, c| {
            t.support += c.support_count;
            t.oppose += c.oppose_count;
            t
        }))
    }

    async fn post_comment(&self, req: &CommentRequest) -> ApiResult<CommentsResponse> {
        let gate = self.comment_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        self.with(|s| {
            s.sent_comments.push(req.clone());
            s.comments
                .as_ref()
                .map(answer)
                .unwrap_or_else(|| Err(server_error("comments closed")))
                .map(|comments| CommentsResponse { comments })
        })
    }

    async fn comments(
        &self,
        candidate_id: CandidateId,
        fingerprint: Option<&str>,
    ) -> ApiResult<Vec<Comment>> {
        self.with(|s| {
            s.comment_queries
                .push((candidate_id, fingerprint.map(str::to_string)));
            s.comments
                .as_ref()
                .map(answer)
                .unwrap_or_else(|| Ok(Vec::new()))
        })
    }

    async fn like_comment(&self, comment_id: i64, fingerprint: &str) -> ApiResult<()> {
        self.with(|s| {
            s.sent_likes.push((comment_id, fingerprint.to_string()));
            s.like_result.as_ref().map(answer).unwrap_or(Ok(()))
        })
    }

    async fn send_contact(&self, req: &ContactRequest) -> ApiResult<ContactAck> {
        self.with(|s| {
            s.sent_contacts.push(req.clone());
            s.contact
                .as_ref()
                .map(answer)
                .unwrap_or_else(|| Ok(ContactAck::Text("ok".into())))
        })
    }
}

pub fn candidate(id: CandidateId, name: &str, party: &str, chhetra: Option<ChhetraId>) -> Candidate {
    Candidate {
        id,
        name: name.to_string(),
        party: party.to_string(),
        party_icon: None,
        photo: None,
        chhetra_id: chhetra,
        bio: None,
        support_count: 0,
        oppose_count: 0,
        comments: None,
        comments_count: None,
    }
}

pub fn chhetra(id: ChhetraId, name: &str) -> Chhetra {
    Chhetra {
        id,
        name: name.to_string(),
        region: "Bagmati".to_string(),
        candidate_count: None,
    }
}

pub fn comment(id: i64, message: &str) -> Comment {
    Comment {
        id,
        candidate_id: None,
        message: message.to_string(),
        sentiment: None,
        created_at: None,
        author: None,
        likes: None,
    }
}
