//! The poll engine: fetch followed live sessions on an interval, diff them
//! against what was already seen and fire notifications, auto-opens and
//! sounds for the new ones.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::background::{self, sleep_or_cancel};
use crate::model::{LiveSession, Notification, SoundKind};
use crate::ports::Collaborators;
use crate::{WatchError, WatchResult};

use super::auto_open;
use super::notification_tracker::{DEFAULT_NOTIFICATION_CAPACITY, NotificationTracker};
use super::session_log::SessionLog;
use super::suspend::SuspendController;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);
const DEFAULT_OPEN_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub poll_interval: Duration,
    /// Pause between two new sessions handled in the same cycle.
    pub open_delay: Duration,
    pub notification_capacity: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            open_delay: DEFAULT_OPEN_DELAY,
            notification_capacity: DEFAULT_NOTIFICATION_CAPACITY,
        }
    }
}

#[derive(Default)]
struct CycleState {
    session_log: SessionLog,
    last_check: Option<DateTime<Utc>>,
}

/// Per-cycle preference snapshot.
struct CyclePrefs {
    show_notification: bool,
    suspended: bool,
    volume: f32,
}

pub struct PollEngine {
    deps: Collaborators,
    suspend: SuspendController,
    /// Replaced when settings are reloaded; read at the start of each use.
    options: RwLock<EngineOptions>,
    /// Held for a whole cycle, so cycles never overlap.
    cycle: tokio::sync::Mutex<CycleState>,
    tracker: Arc<Mutex<NotificationTracker>>,
    running: AtomicBool,
    shutdown: CancellationToken,
}

impl PollEngine {
    pub fn new(deps: Collaborators, options: EngineOptions, shutdown: CancellationToken) -> Self {
        let suspend = SuspendController::new(deps.preferences.clone(), deps.badge.clone());
        let tracker = NotificationTracker::with_capacity(options.notification_capacity);
        Self {
            deps,
            suspend,
            options: RwLock::new(options),
            cycle: tokio::sync::Mutex::new(CycleState::default()),
            tracker: Arc::new(Mutex::new(tracker)),
            running: AtomicBool::new(false),
            shutdown,
        }
    }

    pub fn suspend_controller(&self) -> &SuspendController {
        &self.suspend
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn options(&self) -> EngineOptions {
        match self.options.read() {
            Ok(options) => options.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Swap in new timings and tracker capacity. The running poll loop
    /// picks up the interval after its current sleep.
    pub fn apply_options(&self, options: EngineOptions) -> WatchResult<()> {
        self.tracker
            .lock()
            .map_err(|_| WatchError::SideEffect("notification tracker lock poisoned".into()))?
            .set_capacity(options.notification_capacity);
        let mut current = self
            .options
            .write()
            .map_err(|_| WatchError::SideEffect("engine options lock poisoned".into()))?;
        tracing::info!(
            interval_secs = options.poll_interval.as_secs(),
            open_delay_secs = options.open_delay.as_secs(),
            "Poll engine options updated"
        );
        *current = options;
        Ok(())
    }

    /// Start polling: keep-alive, one immediate cycle, then one cycle per
    /// interval until shutdown. A second call returns without doing anything.
    pub async fn run(self: &Arc<Self>) {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Poll engine already running");
            return;
        }
        tracing::info!(
            interval_secs = self.options().poll_interval.as_secs(),
            "Poll engine starting"
        );

        if let Err(e) = self.deps.keep_alive.start() {
            tracing::warn!("Failed to start keep-alive: {e}");
        }
        self.request_streams_ignoring_error().await;

        let engine = Arc::clone(self);
        let token = self.shutdown.clone();
        tokio::spawn(background::poll_loop(engine, token));
    }

    pub async fn request_streams_ignoring_error(&self) {
        if let Err(e) = self.request_streams().await {
            tracing::warn!("Failed to request streams: {e}");
        }
    }

    /// One poll cycle.
    pub async fn request_streams(&self) -> WatchResult<()> {
        let mut cycle = self.cycle.lock().await;
        tracing::debug!("Poll cycle start");

        let Some(token) = self.deps.credentials.token().await? else {
            tracing::info!("No access token, skipping poll cycle");
            self.set_warning_badge().await;
            return Ok(());
        };
        let Some(user_id) = self.deps.credentials.user_id().await? else {
            tracing::info!("No user id, skipping poll cycle");
            self.set_warning_badge().await;
            return Ok(());
        };

        let sessions = self
            .deps
            .source
            .followed_live_sessions(&token, &user_id, false)
            .await?;
        if let Err(e) = self.deps.badge.set_count(sessions.len()).await {
            tracing::warn!("Failed to update badge count: {e}");
        }

        self.check_streams(&mut cycle, &sessions).await?;
        tracing::debug!(live = sessions.len(), "Poll cycle end");
        Ok(())
    }

    async fn check_streams(
        &self,
        cycle: &mut CycleState,
        sessions: &[LiveSession],
    ) -> WatchResult<()> {
        let first_check = cycle.last_check.is_none();
        cycle.last_check = Some(Utc::now());
        if first_check {
            cycle
                .session_log
                .extend(sessions.iter().map(|s| s.id.clone()));
            cycle.session_log.trim();
            tracing::info!(count = sessions.len(), "Recorded baseline of live sessions");
            return Ok(());
        }

        let prefs = CyclePrefs {
            show_notification: self.deps.preferences.show_notification().await?,
            suspended: self.suspend.is_suspended().await?,
            volume: self.deps.preferences.sound_volume().await?,
        };

        let open_delay = self.options().open_delay;
        let mut handled = 0usize;
        for session in sessions {
            if !cycle.session_log.insert(session.id.clone()) {
                continue;
            }
            tracing::info!(
                stream_id = %session.id,
                user_login = %session.owner_login,
                title = %session.title,
                "Found newly live followed stream"
            );

            if handled > 0
                && !open_delay.is_zero()
                && sleep_or_cancel(&self.shutdown, open_delay).await
            {
                tracing::info!("Shutdown during poll cycle, stopping");
                break;
            }
            handled += 1;

            self.handle_new_session(session, &prefs).await;
        }

        cycle.session_log.trim();
        Ok(())
    }

    async fn handle_new_session(&self, session: &LiveSession, prefs: &CyclePrefs) {
        if prefs.show_notification {
            self.show_notification(session).await;
        }
        if prefs.suspended {
            tracing::info!(stream_id = %session.id, "Suspended, not auto-opening");
            return;
        }

        let should_open = match auto_open::should_auto_open(
            self.deps.preferences.as_ref(),
            self.deps.pages.as_ref(),
            session,
        )
        .await
        {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(stream_id = %session.id, "Auto-open check failed: {e}");
                return;
            }
        };

        if should_open {
            let url = session.stream_url();
            if let Err(e) = self.deps.pages.open_page(&url).await {
                tracing::warn!(%url, "Failed to open page: {e}");
                return;
            }
            self.play(SoundKind::Primary, prefs.volume).await;
        } else if prefs.show_notification {
            self.play(SoundKind::Secondary, prefs.volume).await;
        }
    }

    async fn show_notification(&self, session: &LiveSession) {
        let tracker = Arc::clone(&self.tracker);
        let url = session.stream_url();
        let on_created = Box::new(move |notification_id: String| {
            tracing::debug!(%notification_id, %url, "Notification created");
            match tracker.lock() {
                Ok(mut t) => t.record(notification_id, url),
                Err(_) => tracing::warn!("Notification tracker lock poisoned"),
            }
        });
        if let Err(e) = self
            .deps
            .notifications
            .show(Notification::went_live(session), on_created)
            .await
        {
            tracing::warn!(stream_id = %session.id, "Failed to show notification: {e}");
        }
    }

    async fn play(&self, kind: SoundKind, volume: f32) {
        if let Err(e) = self.deps.audio.play(kind, volume).await {
            tracing::warn!(?kind, "Failed to play sound: {e}");
        }
    }

    async fn set_warning_badge(&self) {
        if let Err(e) = self.deps.badge.set_warning().await {
            tracing::warn!("Failed to set warning badge: {e}");
        }
    }

    /// Open the page a clicked notification points at. Unknown ids are
    /// logged and ignored.
    pub async fn open_notification(&self, notification_id: &str) -> WatchResult<()> {
        let url = self
            .tracker
            .lock()
            .map_err(|_| WatchError::SideEffect("notification tracker lock poisoned".into()))?
            .resolve(notification_id);
        let Some(url) = url else {
            tracing::info!(%notification_id, "No page recorded for notification");
            return Ok(());
        };
        self.deps.pages.open_page(&url).await
    }

    /// Connect-account flow run on behalf of the foreground. Failures are
    /// logged, flagged on the badge and returned to the caller.
    pub async fn handle_connect_request(&self) -> WatchResult<()> {
        let result = self.connect_to_twitch().await;
        if let Err(e) = &result {
            tracing::warn!("Failed to connect to Twitch: {e}");
            self.set_warning_badge().await;
        }
        result
    }

    async fn connect_to_twitch(&self) -> WatchResult<()> {
        let token = self.deps.auth.launch().await?;
        self.deps.credentials.set_token(&token).await?;
        let token = self.deps.credentials.token().await?.ok_or_else(|| {
            WatchError::AuthFlow("token missing right after authorization".into())
        })?;
        let user_id = self.deps.source.current_user_id(&token).await?;
        self.deps.credentials.set_user_id(&user_id).await?;
        tracing::info!(%user_id, "Connected to Twitch");

        self.request_streams_ignoring_error().await;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) async fn processed_count(&self) -> usize {
        self.cycle.lock().await.session_log.len()
    }
}
