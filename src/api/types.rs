use serde::{Deserialize, Serialize};

use crate::model::{CandidateId, Comment, VoteTotals, VoteType};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub candidate_id: CandidateId,
    pub vote_type: VoteType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub candidate_id: CandidateId,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LikeRequest {
    pub fingerprint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentsResponse {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoteStatsResponse {
    #[serde(default)]
    pub totals: VoteTotals,
}
