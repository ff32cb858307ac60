use clap::Parser;
use eyre::Result;
use tracing::{debug, warn};

use typist::cli::{Cli, Commands, PreferencesCommands};
use typist::commands::{
    Command, health::HealthCommand, preferences::PreferencesAction,
    preferences::PreferencesCommand, send::SendCommand,
};
use typist_core::{Endpoints, Preferences};

#[cfg(feature = "ui")]
use typist_tui::tui::{self, setup_panic_hook};

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre for better error reports
    color_eyre::install()?;

    let cli = Cli::parse();

    // Load .env file if it exists
    typist::cli::config::load_env()?;

    // Initialize tracing (level configured via RUST_LOG env var)
    typist_core::utils::tracing::init_tracing()?;

    let mut preferences = Preferences::load().unwrap_or_else(|e| {
        warn!("Failed to load preferences: {}. Using defaults.", e);
        Preferences::default()
    });
    cli.apply_overrides(&mut preferences);
    debug!(?preferences, "Resolved preferences");

    // Set up signal handlers for terminal cleanup if using TUI
    #[cfg(feature = "ui")]
    if cli.command.is_none() || matches!(cli.command, Some(Commands::Tui { .. })) {
        setup_signal_handlers().await;
    }

    // If no subcommand specified, default to TUI
    let cmd = cli.command.clone().unwrap_or(Commands::Tui {
        theme: None, // Will use global --theme if set
    });

    match cmd {
        Commands::Tui { theme } => {
            #[cfg(feature = "ui")]
            {
                let theme_name = theme.or(cli.theme.clone());
                let endpoints = Endpoints::from_preferences(&preferences.server)?;
                // Set panic hook for terminal cleanup
                setup_panic_hook();

                tui::run_tui(
                    endpoints,
                    preferences.controller_settings(),
                    preferences.server.request_timeout(),
                    theme_name,
                )
                .await?;
                Ok(())
            }
            #[cfg(not(feature = "ui"))]
            {
                let _ = theme;
                eyre::bail!("This build does not include the terminal UI. Use `send` or `health`.")
            }
        }
        Commands::Send { message } => {
            let cmd = SendCommand {
                endpoints: Endpoints::from_preferences(&preferences.server)?,
                method: preferences.server.chat_method,
                timeout: preferences.server.request_timeout(),
                message: (!message.is_empty()).then(|| message.join(" ")),
            };
            cmd.execute().await
        }
        Commands::Health => {
            let cmd = HealthCommand {
                endpoints: Endpoints::from_preferences(&preferences.server)?,
                timeout: preferences.server.request_timeout(),
            };
            cmd.execute().await
        }
        Commands::Preferences { action } => {
            let cmd = PreferencesCommand::new(match action {
                PreferencesCommands::Show => PreferencesAction::Show,
                PreferencesCommands::Edit => PreferencesAction::Edit,
                PreferencesCommands::Reset => PreferencesAction::Reset,
            })?;
            cmd.execute().await
        }
    }
}

#[cfg(feature = "ui")]
async fn setup_signal_handlers() {
    // Set up signal handler for SIGINT, SIGTERM
    #[cfg(not(windows))]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let _sigterm_task = tokio::spawn(async move {
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(signal) => signal,
                Err(error) => {
                    warn!(error = %error, "Failed to set up SIGTERM handler");
                    return;
                }
            };
            sigterm.recv().await;

            tui::cleanup_terminal();
            std::process::exit(0);
        });

        let _sigint_task = tokio::spawn(async move {
            let mut sigint = match signal(SignalKind::interrupt()) {
                Ok(signal) => signal,
                Err(error) => {
                    warn!(error = %error, "Failed to set up SIGINT handler");
                    return;
                }
            };
            sigint.recv().await;

            tui::cleanup_terminal();
            std::process::exit(130); // Standard exit code for SIGINT
        });
    }

    #[cfg(windows)]
    {
        let _ctrl_c_task = tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            tui::cleanup_terminal();
            std::process::exit(130);
        });
    }
}
