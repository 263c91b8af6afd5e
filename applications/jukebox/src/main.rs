/// Jukebox - credit-operated terminal music player
use anyhow::Context;
use clap::Parser;
use jukebox::{AppConfig, Command, DirectoryLibrary, RodioEngine};
use jukebox_playback::{PlayerController, PlayerEvent};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jukebox")]
#[command(about = "Credit-operated jukebox for the terminal", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./jukebox.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Music root with one numbered directory per album
    #[arg(short, long, env = "JUKEBOX_MUSIC_DIR")]
    music_dir: Option<PathBuf>,

    /// Credits available at start-up
    #[arg(long)]
    credits: Option<u32>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jukebox=info,jukebox_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(music_dir) = cli.music_dir {
        config.music_dir = music_dir;
    }
    if let Some(credits) = cli.credits {
        config.player.initial_credits = credits;
    }

    run(config).await
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let engine = RodioEngine::new().context("Failed to open audio output")?;
    let library = DirectoryLibrary::new(&config.music_dir);
    info!(music_dir = %library.root().display(), "library ready");

    let mut player = PlayerController::new(config.player.clone(), Box::new(engine), Box::new(library));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    println!("Jukebox ready, {} credit(s). Type 'help' for commands.", player.credits());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = player.tick() {
                    warn!(error = %err, "queue advance failed");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                match Command::parse(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => println!("{}", command.execute(&mut player)),
                    Ok(None) => {}
                    Err(err) => println!("{err}"),
                }
            }
        }

        for event in player.drain_events() {
            log_event(&event);
        }
    }

    player.stop();
    info!("jukebox stopped");
    Ok(())
}

fn log_event(event: &PlayerEvent) {
    match event {
        PlayerEvent::TrackStarted { selection } => info!(%selection, "now playing"),
        PlayerEvent::TrackFinished { selection } => info!(%selection, "completed"),
        PlayerEvent::SelectionSkipped { selection, reason } => {
            warn!(%selection, %reason, "selection skipped");
        }
        PlayerEvent::Error { message } => warn!(%message, "player error"),
        other => tracing::debug!(event = ?other, "player event"),
    }
}
