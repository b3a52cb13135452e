use crate::{
    comments::CommentThread,
    model::{Candidate, CandidateId},
    vote::VoteController,
};

use super::{PageState, Session};

pub struct CandidatePage {
    pub candidate: Candidate,
    pub votes: VoteController,
    pub comments: CommentThread,
}

impl CandidatePage {
    pub async fn load(session: &Session, id: CandidateId) -> PageState<Self> {
        let candidate = match session.api().candidate(id).await {
            Ok(candidate) => candidate,
            Err(e) => return PageState::from_result(Err(e)),
        };

        let (votes, comments) = tokio::join!(
            session.vote_controls(&candidate),
            session.comment_thread(&candidate)
        );

        PageState::Ready(Self {
            candidate,
            votes,
            comments,
        })
    }
}
