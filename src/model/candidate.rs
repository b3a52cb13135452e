use serde::{de, Deserialize, Deserializer, Serialize};

use super::{chhetra::ChhetraId, comment::Comment};

pub type CandidateId = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", from = "RawCandidate")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub party: String,
    pub party_icon: Option<String>,
    pub photo: Option<String>,
    pub chhetra_id: Option<ChhetraId>,
    pub bio: Option<String>,
    pub support_count: u64,
    pub oppose_count: u64,
    pub comments: Option<Vec<Comment>>,
    pub comments_count: Option<u64>,
}

/// Wire shape. Some endpoints send `chhetra_id`, some `chhetraId`, some both,
/// and the id may arrive as a string.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCandidate {
    id: CandidateId,
    name: String,
    party: String,
    #[serde(default)]
    party_icon: Option<String>,
    #[serde(default)]
    photo: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    chhetra_id: Option<ChhetraId>,
    #[serde(default, rename = "chhetra_id", deserialize_with = "lenient_id")]
    chhetra_id_snake: Option<ChhetraId>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    support_count: u64,
    #[serde(default)]
    oppose_count: u64,
    #[serde(default)]
    comments: Option<Vec<Comment>>,
    #[serde(default)]
    comments_count: Option<u64>,
}

impl From<RawCandidate> for Candidate {
    fn from(raw: RawCandidate) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            party: raw.party,
            party_icon: raw.party_icon,
            photo: raw.photo,
            chhetra_id: raw.chhetra_id.or(raw.chhetra_id_snake),
            bio: raw.bio,
            support_count: raw.support_count,
            oppose_count: raw.oppose_count,
            comments: raw.comments,
            comments_count: raw.comments_count,
        }
    }
}

impl Candidate {
    pub fn total_votes(&self) -> u64 {
        self.support_count + self.oppose_count
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Num(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid chhetra id: {s}"))),
    }
}
