//! Anonymous comments for one candidate, posted optimistically.

use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    api::{ApiError, CommentRequest, PollApi},
    identity::IdentityProvider,
    model::{CandidateId, Comment},
};

pub const MAX_COMMENT_CHARS: usize = 500;

#[derive(Error, Debug)]
pub enum CommentError {
    #[error("Please enter a comment")]
    Empty,

    #[error("Comment must be less than 500 characters")]
    TooLong,

    #[error("Comment is still being posted")]
    NotPosted,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Trimmed message, or why it cannot be posted.
pub fn validate_message(message: &str) -> Result<String, CommentError> {
    let text = message.trim();
    if text.is_empty() {
        return Err(CommentError::Empty);
    }
    if text.chars().count() > MAX_COMMENT_CHARS {
        return Err(CommentError::TooLong);
    }
    Ok(text.to_string())
}

pub struct CommentThread {
    candidate_id: CandidateId,
    api: Arc<dyn PollApi>,
    identity: Arc<IdentityProvider>,
    comments: Mutex<Vec<Comment>>,
    next_local_id: AtomicI64,
}

impl CommentThread {
    pub fn new(
        candidate_id: CandidateId,
        initial: Vec<Comment>,
        api: Arc<dyn PollApi>,
        identity: Arc<IdentityProvider>,
    ) -> Self {
        Self {
            candidate_id,
            api,
            identity,
            comments: Mutex::new(initial),
            next_local_id: AtomicI64::new(-1),
        }
    }

    pub fn candidate_id(&self) -> CandidateId {
        self.candidate_id
    }

    /// Reloads the list. With a shared visitor token the backend is asked
    /// "as" that visitor, otherwise as the local identity.
    pub async fn refresh(&self, shared_visitor: Option<&str>) -> Result<(), ApiError> {
        let fingerprint = match shared_visitor.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => token.to_string(),
            None => self.identity.get_identity().await,
        };
        let fresh = self
            .api
            .comments(self.candidate_id, Some(&fingerprint))
            .await?;
        *self.comments.lock().await = fresh;
        Ok(())
    }

    pub async fn post_comment(&self, message: &str) -> Result<Vec<Comment>, CommentError> {
        let text = validate_message(message)?;

        let local_id = self.next_local_id.fetch_sub(1, Ordering::SeqCst);
        let temp = Comment {
            id: local_id,
            candidate_id: Some(self.candidate_id),
            message: text.clone(),
            sentiment: None,
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            author: None,
            likes: None,
        };
        self.comments.lock().await.insert(0, temp);

        let fingerprint = self.identity.get_identity().await;
        let req = CommentRequest {
            candidate_id: self.candidate_id,
            message: text,
            fingerprint: Some(fingerprint),
        };

        match self.api.post_comment(&req).await {
            Ok(res) => {
                let mut comments = self.comments.lock().await;
                *comments = res.comments;
                info!(candidate = self.candidate_id, total = comments.len(), "comment posted");
                Ok(comments.clone())
            }
            Err(e) => {
                self.comments.lock().await.retain(|c| c.id != local_id);
                debug!(candidate = self.candidate_id, "comment failed, removed local copy: {e}");
                Err(e.into())
            }
        }
    }

    /// Likes a posted comment as the local identity and bumps its count
    /// here once the backend accepts. Returns the new count, or `None` when
    /// the comment is no longer listed.
    pub async fn like(&self, comment_id: i64) -> Result<Option<u64>, CommentError> {
        if comment_id < 0 {
            return Err(CommentError::NotPosted);
        }

        let fingerprint = self.identity.get_identity().await;
        self.api.like_comment(comment_id, &fingerprint).await?;

        let mut comments = self.comments.lock().await;
        let liked = comments.iter_mut().find(|c| c.id == comment_id).map(|c| {
            let likes = c.like_count() + 1;
            c.likes = Some(likes);
            likes
        });
        debug!(candidate = self.candidate_id, comment = comment_id, "comment liked");
        Ok(liked)
    }

    pub async fn comments(&self) -> Vec<Comment> {
        self.comments.lock().await.clone()
    }
}
