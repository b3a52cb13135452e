use tracing::info;

use crate::{
    api::PollApi,
    explore::{self, CandidateFilter, ChhetraGroup, ExploreStats},
    model::{Candidate, Chhetra},
};

use super::PageState;

#[derive(Debug, Clone)]
pub struct ExplorePage {
    pub candidates: Vec<Candidate>,
    pub chhetras: Vec<Chhetra>,
}

impl ExplorePage {
    pub async fn load(api: &dyn PollApi) -> PageState<Self> {
        let res = tokio::try_join!(api.candidates(), api.chhetras()).map(|(candidates, chhetras)| {
            info!(
                candidates = candidates.len(),
                chhetras = chhetras.len(),
                "explore data loaded"
            );
            Self {
                candidates,
                chhetras,
            }
        });
        PageState::from_result(res)
    }

    pub fn filtered(&self, filter: &CandidateFilter) -> Vec<&Candidate> {
        filter.apply(&self.candidates)
    }

    pub fn groups(&self, filter: &CandidateFilter) -> Vec<ChhetraGroup<'_>> {
        explore::group_by_chhetra(&self.chhetras, &self.filtered(filter))
    }

    pub fn parties(&self) -> Vec<String> {
        explore::unique_parties(&self.candidates)
    }

    pub fn stats(&self, filter: &CandidateFilter) -> ExploreStats {
        explore::stats(&self.candidates, &self.filtered(filter))
    }
}
