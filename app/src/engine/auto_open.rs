//! Decides whether a newly live broadcaster's page should be opened.

use url::Url;

use crate::WatchResult;
use crate::model::LiveSession;
use crate::ports::{PageCollaborator, PreferenceStore};

const CHANNEL_HOST: &str = "twitch.tv";

/// Login handle of a channel page URL.
///
/// Only `https://<any>twitch.tv/<login>` counts: sub-pages such as
/// `/<login>/videos` and a trailing slash are not a channel page.
pub fn channel_login_from_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    if url.scheme() != "https" {
        return None;
    }
    let host = url.host_str()?;
    if host != CHANNEL_HOST && !host.ends_with(&format!(".{CHANNEL_HOST}")) {
        return None;
    }
    let login = url.path().strip_prefix('/')?;
    if login.is_empty() || login.contains('/') {
        return None;
    }
    Some(login.to_ascii_lowercase())
}

pub fn is_channel_page_open(open_urls: &[String], login: &str) -> bool {
    open_urls
        .iter()
        .filter_map(|url| channel_login_from_url(url))
        .any(|open| open.eq_ignore_ascii_case(login))
}

/// Roster member and no page already showing the channel.
pub async fn should_auto_open(
    preferences: &dyn PreferenceStore,
    pages: &dyn PageCollaborator,
    session: &LiveSession,
) -> WatchResult<bool> {
    let is_target_user = preferences.is_auto_open_user(&session.owner_id).await?;
    let is_already_open = if is_target_user {
        is_channel_page_open(&pages.open_page_urls().await?, &session.owner_login)
    } else {
        false
    };
    let should_open = is_target_user && !is_already_open;
    tracing::debug!(
        user_id = %session.owner_id,
        user_login = %session.owner_login,
        stream_id = %session.id,
        is_target_user,
        is_already_open,
        should_open,
        "Auto-open decision"
    );
    Ok(should_open)
}
