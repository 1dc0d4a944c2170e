use crate::WatchResult;
use crate::model::SoundKind;
use crate::ports::Collaborators;

#[derive(Clone)]
pub struct OptionsUseCase {
    deps: Collaborators,
}

impl OptionsUseCase {
    pub fn new(deps: Collaborators) -> Self {
        Self { deps }
    }

    pub async fn show_notification(&self) -> WatchResult<bool> {
        self.deps.preferences.show_notification().await
    }

    pub async fn set_show_notification(&self, enabled: bool) -> WatchResult<()> {
        self.deps.preferences.set_show_notification(enabled).await
    }

    pub async fn sound_volume(&self) -> WatchResult<f32> {
        self.deps.preferences.sound_volume().await
    }

    pub async fn set_sound_volume(&self, volume: f32) -> WatchResult<()> {
        self.deps
            .preferences
            .set_sound_volume(volume.clamp(0.0, 1.0))
            .await
    }

    /// Play the auto-open alert at the current volume.
    pub async fn play_test_sound(&self) -> WatchResult<()> {
        let volume = self.deps.preferences.sound_volume().await?;
        self.deps.audio.play(SoundKind::Primary, volume).await
    }

    /// Roster, most recently added first.
    pub async fn auto_open_user_ids(&self) -> WatchResult<Vec<String>> {
        let mut ids = self.deps.preferences.auto_open_user_ids().await?;
        ids.reverse();
        Ok(ids)
    }

    pub async fn disable_auto_open(&self, user_id: &str) -> WatchResult<()> {
        self.deps
            .preferences
            .set_auto_open_user(user_id, false)
            .await
    }
}
