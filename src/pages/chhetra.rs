use crate::{
    model::{Candidate, ChhetraId},
    vote::VoteController,
};

use super::{PageState, Session};

pub struct ChhetraCard {
    pub candidate: Candidate,
    pub votes: VoteController,
}

pub struct ChhetraPage {
    pub chhetra_id: ChhetraId,
    pub cards: Vec<ChhetraCard>,
}

impl ChhetraPage {
    pub async fn load(session: &Session, chhetra_id: ChhetraId) -> PageState<Self> {
        let candidates = match session.api().chhetra_candidates(chhetra_id).await {
            Ok(candidates) => candidates,
            Err(e) => return PageState::from_result(Err(e)),
        };

        let controls = session.vote_controls_for(&candidates).await;
        let cards = candidates
            .into_iter()
            .zip(controls)
            .map(|(candidate, votes)| ChhetraCard { candidate, votes })
            .collect();

        PageState::Ready(Self { chhetra_id, cards })
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
