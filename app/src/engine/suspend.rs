//! ACTIVE ⇄ SUSPENDED toggle for auto-open. Polling and notifications
//! continue while suspended.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::WatchResult;
use crate::model::{DEFAULT_BADGE_COLOR, SUSPENDED_BADGE_COLOR};
use crate::ports::{BadgeSink, PreferenceStore};

#[derive(Clone)]
pub struct SuspendController {
    preferences: Arc<dyn PreferenceStore>,
    badge: Arc<dyn BadgeSink>,
}

impl SuspendController {
    pub fn new(preferences: Arc<dyn PreferenceStore>, badge: Arc<dyn BadgeSink>) -> Self {
        Self { preferences, badge }
    }

    pub async fn is_suspended(&self) -> WatchResult<bool> {
        Ok(self.preferences.suspend_from().await?.is_some())
    }

    pub async fn suspended_since(&self) -> WatchResult<Option<DateTime<Utc>>> {
        self.preferences.suspend_from().await
    }

    pub async fn set_suspended(&self, suspended: bool) -> WatchResult<()> {
        let at = suspended.then(Utc::now);
        self.preferences.set_suspend_from(at).await?;
        let color = if self.is_suspended().await? {
            SUSPENDED_BADGE_COLOR
        } else {
            DEFAULT_BADGE_COLOR
        };
        self.badge.set_background_color(color).await?;
        tracing::info!(suspended, "Auto-open suspend state changed");
        Ok(())
    }

    /// Force ACTIVE. Runs once at startup.
    pub async fn reset(&self) -> WatchResult<()> {
        self.preferences.set_suspend_from(None).await?;
        self.badge.set_background_color(DEFAULT_BADGE_COLOR).await
    }
}
