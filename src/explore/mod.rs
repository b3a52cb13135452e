//! Candidate browsing: filter, group by chhetra, summarize.

use std::collections::{HashMap, HashSet};

use crate::model::{Candidate, Chhetra, ChhetraId};

/// All predicates must hold. `None`/blank means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
    pub chhetra: Option<ChhetraId>,
    pub party: Option<String>,
    pub query: String,
}

impl CandidateFilter {
    pub fn matches(&self, candidate: &Candidate) -> bool {
        if let Some(chhetra) = self.chhetra {
            if candidate.chhetra_id != Some(chhetra) {
                return false;
            }
        }

        if let Some(party) = &self.party {
            if &candidate.party != party {
                return false;
            }
        }

        let query = self.query.trim();
        if query.is_empty() {
            return true;
        }

        let q = query.to_lowercase();
        candidate.name.to_lowercase().contains(&q)
            || candidate.party.to_lowercase().contains(&q)
            || candidate
                .bio
                .as_deref()
                .map(|b| b.to_lowercase().contains(&q))
                .unwrap_or(false)
    }

    pub fn apply<'a>(&self, candidates: &'a [Candidate]) -> Vec<&'a Candidate> {
        candidates.iter().filter(|c| self.matches(c)).collect()
    }

    pub fn is_active(&self) -> bool {
        self.chhetra.is_some() || self.party.is_some() || !self.query.trim().is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChhetraGroup<'a> {
    pub chhetra: &'a Chhetra,
    pub candidates: Vec<&'a Candidate>,
}

/// Groups in chhetra-list order; empty groups and candidates without a known
/// chhetra are left out.
pub fn group_by_chhetra<'a>(
    chhetras: &'a [Chhetra],
    candidates: &[&'a Candidate],
) -> Vec<ChhetraGroup<'a>> {
    let mut slots: HashMap<ChhetraId, Vec<&'a Candidate>> = HashMap::new();
    for candidate in candidates {
        if let Some(id) = candidate.chhetra_id {
            slots.entry(id).or_default().push(*candidate);
        }
    }

    chhetras
        .iter()
        .filter_map(|chhetra| {
            let candidates = slots.remove(&chhetra.id)?;
            Some(ChhetraGroup {
                chhetra,
                candidates,
            })
        })
        .collect()
}

/// Parties in first-seen order.
pub fn unique_parties(candidates: &[Candidate]) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .filter(|c| seen.insert(c.party.as_str()))
        .map(|c| c.party.clone())
        .collect()
}

/// Chhetra selector search, case-insensitive on the name.
pub fn search_chhetras<'a>(chhetras: &'a [Chhetra], search: &str) -> Vec<&'a Chhetra> {
    let q = search.trim().to_lowercase();
    chhetras
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&q))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExploreStats {
    pub candidates: usize,
    pub chhetras: usize,
    pub parties: usize,
    pub total: usize,
}

pub fn stats(all: &[Candidate], filtered: &[&Candidate]) -> ExploreStats {
    let chhetras: HashSet<ChhetraId> = filtered.iter().filter_map(|c| c.chhetra_id).collect();
    ExploreStats {
        candidates: filtered.len(),
        chhetras: chhetras.len(),
        parties: unique_parties(all).len(),
        total: all.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{candidate, chhetra};

    fn roster() -> Vec<Candidate> {
        let mut asha = candidate(1, "Asha Gurung", "Nepali Congress", Some(1));
        asha.bio = Some("Teacher from Pokhara".into());
        vec![
            asha,
            candidate(2, "Bikash Thapa", "CPN (UML)", Some(1)),
            candidate(3, "Chandra Rai", "Nepali Congress", Some(2)),
            candidate(4, "Dipa Shah", "RSP", None),
        ]
    }

    #[test]
    fn chhetra_and_query_are_anded() {
        let all = roster();
        let filter = CandidateFilter {
            chhetra: Some(1),
            party: None,
            query: "congress".into(),
        };
        let ids: Vec<_> = filter.apply(&all).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn query_checks_bio_case_insensitively() {
        let all = roster();
        let filter = CandidateFilter {
            query: "POKHARA".into(),
            ..Default::default()
        };
        let ids: Vec<_> = filter.apply(&all).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn party_filter_is_exact() {
        let all = roster();
        let filter = CandidateFilter {
            party: Some("Nepali Congress".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&all).len(), 2);

        let filter = CandidateFilter {
            party: Some("Congress".into()),
            ..Default::default()
        };
        assert!(filter.apply(&all).is_empty());
    }

    #[test]
    fn blank_filter_matches_everything() {
        let all = roster();
        let mut filter = CandidateFilter {
            query: "   ".into(),
            ..Default::default()
        };
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&all).len(), 4);

        filter.chhetra = Some(2);
        assert!(filter.is_active());
        filter.clear();
        assert_eq!(filter, CandidateFilter::default());
    }

    #[test]
    fn grouping_follows_chhetra_order_and_drops_empty() {
        let all = roster();
        let chhetras = vec![chhetra(2, "Kaski-2"), chhetra(3, "Empty"), chhetra(1, "Kaski-1")];
        let filtered = CandidateFilter::default().apply(&all);

        let groups = group_by_chhetra(&chhetras, &filtered);
        let shape: Vec<_> = groups
            .iter()
            .map(|g| (g.chhetra.id, g.candidates.iter().map(|c| c.id).collect::<Vec<_>>()))
            .collect();
        assert_eq!(shape, vec![(2, vec![3]), (1, vec![1, 2])]);
    }

    #[test]
    fn parties_stats_and_search() {
        let all = roster();
        assert_eq!(
            unique_parties(&all),
            vec!["Nepali Congress", "CPN (UML)", "RSP"]
        );

        let filter = CandidateFilter {
            party: Some("Nepali Congress".into()),
            ..Default::default()
        };
        let filtered = filter.apply(&all);
        assert_eq!(
            stats(&all, &filtered),
            ExploreStats {
                candidates: 2,
                chhetras: 2,
                parties: 3,
                total: 4
            }
        );

        let chhetras = vec![chhetra(1, "Kaski-1"), chhetra(2, "Jhapa-3")];
        assert_eq!(search_chhetras(&chhetras, "kaski").len(), 1);
        assert_eq!(search_chhetras(&chhetras, "").len(), 2);
    }
}
