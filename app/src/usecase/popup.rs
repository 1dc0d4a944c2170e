use crate::WatchResult;
use crate::engine::SuspendController;
use crate::messaging::{Message, MessageBus};
use crate::model::{LiveSession, Streamer};
use crate::ports::Collaborators;

#[derive(Clone)]
pub struct PopupUseCase {
    deps: Collaborators,
    suspend: SuspendController,
    bus: MessageBus,
}

impl PopupUseCase {
    pub fn new(deps: Collaborators, suspend: SuspendController, bus: MessageBus) -> Self {
        Self { deps, suspend, bus }
    }

    /// Ask the engine to run the authorization flow and wait for it.
    pub async fn connect_to_twitch(&self) -> WatchResult<()> {
        self.bus.request(Message::RequestConnectToTwitch).await
    }

    pub async fn following_streams(&self) -> WatchResult<Vec<LiveSession>> {
        let (token, user_id) = self.deps.require_credentials().await?;
        self.deps
            .source
            .followed_live_sessions(&token, &user_id, true)
            .await
    }

    pub async fn streams(&self, languages: &[String]) -> WatchResult<Vec<LiveSession>> {
        let token = self.deps.require_token().await?;
        self.deps
            .source
            .live_sessions_by_language(&token, languages)
            .await
    }

    pub async fn following_streamers(&self) -> WatchResult<Vec<Streamer>> {
        let (token, user_id) = self.deps.require_credentials().await?;
        self.deps.source.followed_streamers(&token, &user_id).await
    }

    pub async fn set_badge_number(&self, count: usize) -> WatchResult<()> {
        self.deps.badge.set_count(count).await
    }

    pub async fn is_suspended(&self) -> WatchResult<bool> {
        self.suspend.is_suspended().await
    }

    pub async fn set_suspended(&self, suspended: bool) -> WatchResult<()> {
        self.suspend.set_suspended(suspended).await
    }

    pub async fn is_auto_open_user(&self, user_id: &str) -> WatchResult<bool> {
        self.deps.preferences.is_auto_open_user(user_id).await
    }

    pub async fn set_auto_open_user(&self, user_id: &str, enabled: bool) -> WatchResult<()> {
        self.deps
            .preferences
            .set_auto_open_user(user_id, enabled)
            .await?;
        tracing::info!(user_id, enabled, "Auto-open roster updated");
        Ok(())
    }

    pub async fn trending_languages(&self) -> WatchResult<Vec<String>> {
        self.deps.preferences.trending_languages().await
    }

    pub async fn set_trending_languages(&self, languages: &[String]) -> WatchResult<()> {
        self.deps.preferences.set_trending_languages(languages).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use tokio_util::sync::CancellationToken;
    use twitch_client::Token;

    use super::*;
    use crate::WatchError;
    use crate::background;
    use crate::model::{SUSPENDED_BADGE_COLOR, session};
    use crate::testing::{Effect, Harness};

    fn popup(h: &Harness) -> PopupUseCase {
        let engine = h.engine();
        let (bus, rx) = MessageBus::channel();
        tokio::spawn(background::message_worker_loop(
            engine.clone(),
            rx,
            CancellationToken::new(),
        ));
        PopupUseCase::new(h.collaborators(), engine.suspend_controller().clone(), bus)
    }

    #[tokio::test]
    async fn following_streams_are_fetched_with_avatars() {
        let h = Harness::connected();
        h.source.set_followed(vec![session("s1", "u1", "foo")]);

        let streams = popup(&h).following_streams().await.unwrap();

        assert_eq!(streams.len(), 1);
        assert!(h.source.last_with_avatars.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn following_streams_without_user_id_needs_connect() {
        let h = Harness::connected();
        *h.credentials.user_id.lock().unwrap() = None;

        let err = popup(&h).following_streams().await.unwrap_err();

        assert!(err.needs_connect());
        assert_eq!(h.source.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn streams_need_only_a_token() {
        let h = Harness::connected();
        *h.credentials.user_id.lock().unwrap() = None;
        *h.source.by_language.lock().unwrap() = vec![session("s9", "u9", "ja_streamer")];

        let langs = vec!["ja".to_string()];
        let streams = popup(&h).streams(&langs).await.unwrap();

        assert_eq!(streams[0].id, "s9");
        assert_eq!(*h.source.last_languages.lock().unwrap(), langs);
    }

    #[tokio::test]
    async fn rejected_token_surfaces_as_invalid_credential() {
        let h = Harness::connected();
        h.source.reject_token.store(true, Ordering::SeqCst);

        let err = popup(&h).following_streamers().await.unwrap_err();
        assert!(matches!(err, WatchError::InvalidCredential));
    }

    #[tokio::test]
    async fn connect_goes_through_the_engine() {
        let h = Harness::disconnected();
        *h.auth.token.lock().unwrap() = Some(Token::bearer("fresh"));
        *h.source.current_user.lock().unwrap() = "u7".into();

        popup(&h).connect_to_twitch().await.unwrap();

        assert_eq!(h.auth.launches.load(Ordering::SeqCst), 1);
        assert_eq!(h.credentials.user_id.lock().unwrap().as_deref(), Some("u7"));
    }

    #[tokio::test]
    async fn failed_connect_is_reported_to_caller() {
        let h = Harness::disconnected();

        let err = popup(&h).connect_to_twitch().await.unwrap_err();

        assert!(matches!(err, WatchError::AuthFlow(_)));
        assert_eq!(h.effects.effects(), vec![Effect::BadgeWarning]);
    }

    #[tokio::test]
    async fn suspending_turns_badge_grey() {
        let h = Harness::connected();
        let popup = popup(&h);

        popup.set_suspended(true).await.unwrap();

        assert!(popup.is_suspended().await.unwrap());
        assert_eq!(
            h.effects.effects(),
            vec![Effect::BadgeColor(SUSPENDED_BADGE_COLOR.into())]
        );
    }

    #[tokio::test]
    async fn roster_and_languages_round_trip_through_preferences() {
        let h = Harness::connected();
        let popup = popup(&h);

        popup.set_auto_open_user("u1", true).await.unwrap();
        assert!(popup.is_auto_open_user("u1").await.unwrap());
        popup.set_auto_open_user("u1", false).await.unwrap();
        assert!(!popup.is_auto_open_user("u1").await.unwrap());

        let langs = vec!["en".to_string(), "ja".to_string()];
        popup.set_trending_languages(&langs).await.unwrap();
        assert_eq!(popup.trending_languages().await.unwrap(), langs);
    }

    #[tokio::test]
    async fn badge_number_is_forwarded() {
        let h = Harness::connected();
        popup(&h).set_badge_number(4).await.unwrap();
        assert_eq!(h.effects.effects(), vec![Effect::BadgeCount(4)]);
    }
}
