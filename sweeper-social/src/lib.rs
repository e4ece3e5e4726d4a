//! Social network clients used by the sweeper.
//!
//! [`SocialApi`] is the seam the job talks to; [`twitter::TwitterApi`] is the
//! production implementation over the Twitter v1.1 REST API.
pub mod api;
pub mod twitter;

pub use api::SocialApi;
pub use sweeper_http::HttpError;
