//! Twitter/X v1.1 integration: the OAuth-signed client and its wire types.
//!
//! Timeline paging uses `max_id` (inclusive upper bound); see
//! [`client::TwitterApi`] for the endpoints touched.
pub mod client;
pub mod types;

pub use client::TwitterApi;
