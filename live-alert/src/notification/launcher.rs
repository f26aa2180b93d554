//! Player launcher built from a command template.
//!
//! The template is split on whitespace; `{channel}`, `{login}` and `{url}`
//! are substituted per argument. No shell is involved.

use std::process::Stdio;

use super::{Launcher, LiveAlert};
use crate::error::AlertError;

#[derive(Debug, Clone)]
pub struct CommandLauncher {
    program: String,
    args: Vec<String>,
}

impl CommandLauncher {
    /// Returns `None` for a blank template.
    pub fn parse(template: &str) -> Option<Self> {
        let mut parts = template.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Program followed by its substituted arguments.
    pub fn argv(&self, alert: &LiveAlert) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|arg| {
                arg.replace("{channel}", alert.channel_id.as_str())
                    .replace("{login}", &alert.login)
                    .replace("{url}", &alert.watch_url)
            }))
            .collect()
    }
}

impl Launcher for CommandLauncher {
    /// Spawn the player and return without waiting for it.
    fn launch(&self, alert: &LiveAlert) -> Result<(), AlertError> {
        let argv = self.argv(alert);
        tracing::debug!(program = %self.program, "Launching player");

        tokio::process::Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| AlertError::DispatchFailed(format!("failed to launch {}: {e}", self.program)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelId;

    fn alert() -> LiveAlert {
        LiveAlert {
            channel_id: ChannelId::from("101"),
            login: "alpha".into(),
            display_name: "Alpha".into(),
            title: "rapid".into(),
            viewer_count: 3,
            watch_url: "https://www.twitch.tv/alpha".into(),
        }
    }

    #[test]
    fn placeholders_are_substituted() {
        let launcher = CommandLauncher::parse("streamlink {url} best --title=ch{channel}-{login}").unwrap();
        assert_eq!(
            launcher.argv(&alert()),
            vec![
                "streamlink",
                "https://www.twitch.tv/alpha",
                "best",
                "--title=ch101-alpha"
            ]
        );
    }

    #[test]
    fn blank_template_has_no_launcher() {
        assert!(CommandLauncher::parse("   ").is_none());
    }

    #[tokio::test]
    async fn missing_program_is_dispatch_failed() {
        let launcher = CommandLauncher::parse("/nonexistent/player-binary {url}").unwrap();
        let err = launcher.launch(&alert()).unwrap_err();
        assert!(matches!(err, AlertError::DispatchFailed(_)));
    }
}
