use serde::{Deserialize, Serialize};

pub type ChhetraId = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Chhetra {
    pub id: ChhetraId,
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub candidate_count: Option<u64>,
}
