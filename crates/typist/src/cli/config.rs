use dotenvy::dotenv;
use eyre::Result;
use typist_core::Preferences;

use super::Cli;

pub fn load_env() -> Result<()> {
    dotenv().ok();
    Ok(())
}

impl Cli {
    /// Layer command-line flags over the loaded preferences.
    pub fn apply_overrides(&self, preferences: &mut Preferences) {
        let server = &mut preferences.server;
        if let Some(url) = &self.url {
            server.base_url.clone_from(url);
        }
        if let Some(resource) = &self.resource {
            server.resource_path.clone_from(resource);
        }
        if let Some(chat_path) = &self.chat_path {
            server.chat_path.clone_from(chat_path);
        }
        if let Some(method) = self.method {
            server.chat_method = method.into();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            server.request_timeout_ms = Some(timeout_ms);
        }

        let display = &mut preferences.display;
        if self.instant {
            display.reveal_delay_ms = 0;
        } else if let Some(delay) = self.reveal_delay_ms {
            display.reveal_delay_ms = delay;
        }
        if self.no_cursor {
            display.cursor_blink_ms = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::time::Duration;
    use typist_core::{ChatMethod, RevealSpeed};

    #[test]
    fn flags_override_preferences() {
        let cli = Cli::try_parse_from([
            "typist",
            "--url",
            "http://example.test:9000/",
            "--method",
            "post",
            "--instant",
            "--no-cursor",
            "--timeout-ms",
            "1500",
        ])
        .unwrap();

        let mut preferences = Preferences::default();
        cli.apply_overrides(&mut preferences);

        assert_eq!(preferences.server.base_url, "http://example.test:9000/");
        assert_eq!(preferences.server.chat_method, ChatMethod::Post);
        assert_eq!(
            preferences.server.request_timeout(),
            Some(Duration::from_millis(1500))
        );

        let settings = preferences.controller_settings();
        assert_eq!(settings.reveal, RevealSpeed::Instant);
        assert_eq!(settings.cursor_blink, None);
    }

    #[test]
    fn absent_flags_keep_preferences() {
        let cli = Cli::try_parse_from(["typist", "health"]).unwrap();
        let mut preferences = Preferences::default();
        preferences.server.resource_path = "custom.html".to_string();
        preferences.display.reveal_delay_ms = 5;

        cli.apply_overrides(&mut preferences);

        assert_eq!(preferences.server.resource_path, "custom.html");
        assert_eq!(preferences.display.reveal_delay_ms, 5);
    }

    #[test]
    fn reveal_delay_flag_sets_typed_speed() {
        let cli = Cli::try_parse_from(["typist", "--reveal-delay-ms", "40"]).unwrap();
        let mut preferences = Preferences::default();
        cli.apply_overrides(&mut preferences);
        assert_eq!(
            preferences.display.reveal_speed(),
            RevealSpeed::Typed {
                delay: Duration::from_millis(40),
                chars_per_step: 1,
            }
        );
    }
}
