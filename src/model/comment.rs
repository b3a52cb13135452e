use serde::{Deserialize, Serialize};

use super::{candidate::CandidateId, vote::VoteType};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64, // negative → local optimistic entry
    #[serde(default)]
    pub candidate_id: Option<CandidateId>,
    #[serde(alias = "content")]
    pub message: String,
    #[serde(default)]
    pub sentiment: Option<VoteType>,
    #[serde(default, alias = "timestamp")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub likes: Option<u64>,
}

impl Comment {
    pub fn is_local(&self) -> bool {
        self.id < 0
    }

    pub fn like_count(&self) -> u64 {
        self.likes.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::Comment;

    #[test]
    fn reads_older_comment_shape() {
        let c: Comment = serde_json::from_str(
            r#"{"id":4,"content":"Good work","author":"Anonymous","timestamp":"2024-01-01T00:00:00Z","likes":3}"#,
        )
        .unwrap();

        assert_eq!(c.message, "Good work");
        assert_eq!(c.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(c.like_count(), 3);
        assert!(!c.is_local());
    }

    #[test]
    fn missing_likes_count_as_zero() {
        let c: Comment = serde_json::from_str(r#"{"id":-1,"message":"hi"}"#).unwrap();
        assert_eq!(c.likes, None);
        assert_eq!(c.like_count(), 0);
        assert!(c.is_local());
    }
}
