//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_LANGUAGE_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2,3}(-[A-Za-z]{2,4})?(,[a-z]{2,3}(-[A-Za-z]{2,4})?)*$")
        .expect("language list regex is valid")
});
static RE_NUMERIC_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("numeric id regex is valid"));

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "SERVER_PORT" => validate_int_range(value, 1, 65535)?,
        "POLL_INTERVAL_SECS" => validate_int_range(value, 10, 3600)?,
        "OPEN_DELAY_SECS" => validate_int_range(value, 0, 60)?,
        "NOTIFICATION_CACHE_SIZE" => validate_int_range(value, 1, 10_000)?,
        "KEEP_ALIVE_INTERVAL_SECS" => validate_int_range(value, 5, 300)?,
        "SOUND_VOLUME" => {
            let v: f64 = value.parse().map_err(|_| "must be a float")?;
            if !(0.0..=1.0).contains(&v) {
                return Err("must be between 0.0 and 1.0".into());
            }
        }
        "SUSPEND_FROM_DATE" => {
            if !value.is_empty() && chrono::DateTime::parse_from_rfc3339(value).is_err() {
                return Err("must be an RFC 3339 timestamp or empty".into());
            }
        }
        "TRENDING_LANGUAGES" => {
            if !value.is_empty() && !RE_LANGUAGE_LIST.is_match(value) {
                return Err("must be comma separated language codes".into());
            }
        }
        "TWITCH_USER_ID" => {
            if !value.is_empty() && !RE_NUMERIC_ID.is_match(value) {
                return Err("must be a numeric Twitch user ID".into());
            }
        }
        // Boolean settings
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(key, "SHOW_NOTIFICATION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_boolean() {
        assert!(validate_setting("SHOW_NOTIFICATION", "true").is_ok());
        assert!(validate_setting("SHOW_NOTIFICATION", "false").is_ok());
        assert!(validate_setting("SHOW_NOTIFICATION", "yes").is_err());
    }

    #[test]
    fn test_valid_sound_volume() {
        assert!(validate_setting("SOUND_VOLUME", "0.5").is_ok());
        assert!(validate_setting("SOUND_VOLUME", "0.0").is_ok());
        assert!(validate_setting("SOUND_VOLUME", "1.0").is_ok());
        assert!(validate_setting("SOUND_VOLUME", "1.1").is_err());
        assert!(validate_setting("SOUND_VOLUME", "-0.1").is_err());
        assert!(validate_setting("SOUND_VOLUME", "loud").is_err());
    }

    #[test]
    fn test_valid_intervals() {
        assert!(validate_setting("POLL_INTERVAL_SECS", "60").is_ok());
        assert!(validate_setting("POLL_INTERVAL_SECS", "5").is_err());
        assert!(validate_setting("OPEN_DELAY_SECS", "0").is_ok());
        assert!(validate_setting("SERVER_PORT", "0").is_err());
        assert!(validate_setting("SERVER_PORT", "8787").is_ok());
    }

    #[test]
    fn test_valid_suspend_date() {
        assert!(validate_setting("SUSPEND_FROM_DATE", "").is_ok());
        assert!(validate_setting("SUSPEND_FROM_DATE", "2024-05-01T10:00:00+00:00").is_ok());
        assert!(validate_setting("SUSPEND_FROM_DATE", "tomorrow").is_err());
    }

    #[test]
    fn test_valid_languages() {
        assert!(validate_setting("TRENDING_LANGUAGES", "").is_ok());
        assert!(validate_setting("TRENDING_LANGUAGES", "en,ja,zh-hk").is_ok());
        assert!(validate_setting("TRENDING_LANGUAGES", "en, ja").is_err());
    }

    #[test]
    fn test_valid_user_id() {
        assert!(validate_setting("TWITCH_USER_ID", "141981764").is_ok());
        assert!(validate_setting("TWITCH_USER_ID", "").is_ok());
        assert!(validate_setting("TWITCH_USER_ID", "twitchdev").is_err());
    }
}
