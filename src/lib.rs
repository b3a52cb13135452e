//! Anonymous public-opinion poll client.
//!
//! Browse candidates by chhetra (electoral constituency), cast one
//! support/oppose vote per candidate, and leave anonymous comments. Visitors
//! never log in: a best-effort device identity stands in for them, and local
//! durable markers keep a browser profile from voting twice.

pub mod api;
pub mod comments;
pub mod config;
pub mod explore;
pub mod identity;
pub mod model;
pub mod pages;
pub mod party;
pub mod share;
pub mod storage;
pub mod vote;

#[cfg(test)]
pub(crate) mod testing;
