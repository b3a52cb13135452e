use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Support,
    Oppose,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Support => "support",
            VoteType::Oppose => "oppose",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "support" | "vote" | "+" => Some(VoteType::Support),
            "oppose" | "skip" | "-" => Some(VoteType::Oppose),
            _ => None,
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-owned tallies for one candidate.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteCounts {
    pub support_count: u64,
    pub oppose_count: u64,
}

impl VoteCounts {
    pub fn new(support_count: u64, oppose_count: u64) -> Self {
        Self {
            support_count,
            oppose_count,
        }
    }

    pub fn total(&self) -> u64 {
        self.support_count + self.oppose_count
    }

    /// Rounded share of support votes, 0 when nobody voted yet.
    pub fn support_percentage(&self) -> u8 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        ((self.support_count as f64 / total as f64) * 100.0).round() as u8
    }

    pub(crate) fn bump(&mut self, vote_type: VoteType) {
        match vote_type {
            VoteType::Support => self.support_count += 1,
            VoteType::Oppose => self.oppose_count += 1,
        }
    }
}

/// Answer to `GET /votes?candidateId=&fingerprint=`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatus {
    #[serde(default)]
    pub already_voted: bool,
    #[serde(default)]
    pub support_count: Option<u64>,
    #[serde(default)]
    pub oppose_count: Option<u64>,
}

/// Client-local "already voted" marker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteRecord {
    #[serde(rename = "type")]
    pub vote_type: VoteType,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteTotals {
    pub support: u64,
    pub oppose: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_and_handles_empty() {
        assert_eq!(VoteCounts::new(0, 0).support_percentage(), 0);
        assert_eq!(VoteCounts::new(2, 1).support_percentage(), 67);
        assert_eq!(VoteCounts::new(5, 0).support_percentage(), 100);
    }

    #[test]
    fn record_uses_type_field() {
        let json = serde_json::to_string(&VoteRecord {
            vote_type: VoteType::Oppose,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"oppose"}"#);
    }

    #[test]
    fn parses_button_labels() {
        assert_eq!(VoteType::parse("Support"), Some(VoteType::Support));
        assert_eq!(VoteType::parse("skip"), Some(VoteType::Oppose));
        assert_eq!(VoteType::parse("maybe"), None);
    }
}
