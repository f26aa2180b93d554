//! Setting value validation.

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "POLL_INTERVAL_SECS" => validate_int_range(value, 10, 86_400)?,
        "REQUEST_TIMEOUT_SECS" => validate_int_range(value, 1, 120)?,
        "NOTIFICATION_TIMEOUT_MS" => validate_int_range(value, 0, 60_000)?,
        "NOTIFIER" => {
            if value != "desktop" && value != "log" {
                return Err("must be 'desktop' or 'log'".into());
            }
        }
        "PLAYER_COMMAND" => {
            if value.len() > 1024 {
                return Err("command must be at most 1024 characters".into());
            }
        }
        "HELIX_BASE_URL" => {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err("must be an http(s) URL".into());
            }
        }
        "TWITCH_LIVE_ALERT_CONFIG" => {
            if value.trim().is_empty() {
                return Err("path must not be empty".into());
            }
        }
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: u64, max: u64) -> Result<(), String> {
    let v: u64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(key, "CHOOSER_ENABLED")
}
