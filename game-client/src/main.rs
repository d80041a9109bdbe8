use std::sync::Arc;

use anyhow::{Context, Result};
use game_client::commands::{self, Command, HELP};
use game_client::{Config, ConsolePresenter, HttpOracle};
use game_core::{GameController, TargetSelector};
use game_types::GameError;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::signal;
use tracing::{info, warn};

type InputLines = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the board on stdout stays readable
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!("Using ranking oracle at {}", config.oracle_url);

    let oracle = HttpOracle::new(&config.oracle_url, config.request_timeout)
        .context("Failed to create HTTP client")?;
    let presenter = Arc::new(ConsolePresenter::stdout());
    let controller = GameController::new(Arc::new(oracle), presenter, config.game.clone());

    println!("{}", HELP);
    if controller.start().await.is_err() {
        println!("Could not start a game. Use /new to try again.");
    }

    // Refresh daily stats on start and periodically
    let stats_controller = controller.clone();
    let stats_interval = config.stats_refresh;
    let stats_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(stats_interval);
        loop {
            interval.tick().await;
            if let Err(e) = stats_controller.refresh_stats().await {
                warn!("Failed to refresh stats: {}", e);
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read from stdin")?,
            _ = &mut shutdown => break,
        };

        let Some(line) = line else {
            info!("Input closed");
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        run_command(&controller, command, &mut lines).await?;
    }

    stats_task.abort();
    controller.shutdown().await;
    info!("Goodbye.");
    Ok(())
}

/// Errors from the core are already shown by the presenter, so results are
/// dropped with `.ok()` here.
async fn run_command(
    controller: &Arc<GameController>,
    command: Command,
    lines: &mut InputLines,
) -> Result<()> {
    match command {
        Command::Guess(word) => {
            controller.submit_guess(&word).await.ok();
        }
        Command::AiTurn => {
            controller.request_ai_turn().await.ok();
        }
        Command::Restart => {
            controller.restart().await.ok();
        }
        Command::NewGame => {
            controller.start().await.ok();
        }
        Command::Stats => {
            controller.refresh_stats().await.ok();
        }
        Command::GiveUp => {
            if confirm("Give up and reveal the word? [y/n]", lines).await? {
                controller.give_up(true).await.ok();
            }
        }
        Command::Target(selector) => {
            let selector = TargetSelector::new(selector);
            if let Err(GameError::ConfirmationRequired) =
                controller.set_target(selector.clone(), false).await
            {
                if confirm("Abandon the current game? [y/n]", lines).await? {
                    controller.set_target(selector, true).await.ok();
                }
            }
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
    Ok(())
}

async fn confirm(question: &str, lines: &mut InputLines) -> Result<bool> {
    println!("{}", question);
    let answer = lines
        .next_line()
        .await
        .context("Failed to read from stdin")?;
    Ok(answer.is_some_and(|answer| commands::is_yes(&answer)))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
        ) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => {
                        info!("Received SIGINT, shutting down gracefully...");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down gracefully...");
                    }
                }
                return;
            }
            _ => warn!("Failed to install signal handlers, falling back to Ctrl+C"),
        }
    }

    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down gracefully..."),
        Err(e) => {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
