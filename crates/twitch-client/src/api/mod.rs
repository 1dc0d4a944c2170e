//! Twitch Helix REST API client.
//!
//! Provides typed access to the endpoints the watcher needs, with
//! automatic Bearer token + Client-ID header injection. A 401 from Helix
//! is surfaced as [`TwitchError::InvalidToken`] so callers can prompt for
//! re-authentication instead of retrying.

mod channels;
mod request;
mod streams;
mod users;

pub mod models;

pub use models::{
    FollowedChannel, HelixPaginatedResponse, HelixPagination, HelixResponse, StreamData,
    TwitchUser,
};

use crate::{Token, TwitchError};

const HELIX_BASE: &str = "https://api.twitch.tv/helix";

/// Page size used for every paginated Helix call.
pub const PAGE_SIZE: u32 = 100;

/// Twitch Helix API client with automatic auth header injection.
#[derive(Clone)]
pub struct TwitchApiClient {
    pub(super) http: reqwest::Client,
    pub(super) client_id: String,
    pub(super) base_url: String,
}
