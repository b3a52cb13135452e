pub mod candidate;
pub mod chhetra;
pub mod comment;
pub mod contact;
pub mod vote;

pub use candidate::{Candidate, CandidateId};
pub use chhetra::{Chhetra, ChhetraId};
pub use comment::Comment;
pub use contact::{ContactAck, ContactRequest};
pub use vote::{VoteCounts, VoteRecord, VoteStatus, VoteTotals, VoteType};
