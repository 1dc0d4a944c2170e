use twitch_client::TwitchError;
use watch_db::DbError;

/// Errors surfaced by the engine, the foreground use cases and the
/// collaborator implementations.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("Access token rejected, re-authorization required")]
    InvalidCredential,

    #[error("Authorization failed: {0}")]
    AuthFlow(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Side effect failed: {0}")]
    SideEffect(String),
}

pub type WatchResult<T> = Result<T, WatchError>;

impl WatchError {
    pub fn no_token() -> Self {
        Self::MissingCredential("token")
    }

    pub fn no_user_id() -> Self {
        Self::MissingCredential("user id")
    }

    /// True when the user has to (re)connect their account.
    pub fn needs_connect(&self) -> bool {
        matches!(self, Self::MissingCredential(_) | Self::InvalidCredential)
    }
}

impl From<TwitchError> for WatchError {
    fn from(err: TwitchError) -> Self {
        match err {
            TwitchError::InvalidToken => Self::InvalidCredential,
            TwitchError::AuthRequired => Self::no_token(),
            TwitchError::TokenRefreshFailed(msg) => Self::AuthFlow(msg),
            other => Self::Fetch(other.to_string()),
        }
    }
}

impl From<DbError> for WatchError {
    fn from(err: DbError) -> Self {
        Self::Storage(err.to_string())
    }
}
