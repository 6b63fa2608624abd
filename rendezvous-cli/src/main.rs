use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use colored::*;
use rendezvous::RoomId;
use rendezvous::model::default_stun_servers;
use rendezvous::peer::{
    ApprtcConfig, ApprtcSignaling, FilePlayback, LoggingObserver, MediaSourceSelector,
    RtcConnection, Session, SessionOutcome, SyntheticPattern, TransportConfig, default_camera,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Joins an AppRTC room and streams media to whoever else joins it.
#[derive(Parser)]
#[command(name = "rendezvous", version)]
struct Args {
    /// Room to join. A random numeric room is created when omitted.
    room: Option<String>,

    /// Send this file instead of live video (.ivf video, .ogg/.opus audio).
    #[arg(long = "play-from", value_name = "FILE")]
    play_from: Vec<PathBuf>,

    /// Image to rotate when no file or camera is available.
    #[arg(long, value_name = "FILE")]
    still_image: Option<PathBuf>,

    #[arg(
        long,
        value_name = "URL",
        env = "RENDEZVOUS_SIGNALING_URL",
        default_value = "https://appr.tc"
    )]
    signaling_url: String,

    /// STUN server, may be repeated.
    #[arg(long = "stun", value_name = "URL")]
    stun: Vec<String>,

    /// More output, -vv for everything.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn selector(args: &Args) -> Result<MediaSourceSelector> {
    let file = if args.play_from.is_empty() {
        None
    } else {
        Some(FilePlayback::open(args.play_from.as_slice()).context("Failed to open media files")?)
    };

    let synthetic = match &args.still_image {
        Some(path) => SyntheticPattern::from_path(path)
            .with_context(|| format!("Failed to load still image {}", path.display()))?,
        None => SyntheticPattern::test_pattern(),
    };

    Ok(MediaSourceSelector::new(file, default_camera(), synthetic))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let room = match &args.room {
        Some(room) => RoomId::parse(room).with_context(|| format!("Invalid room {room:?}"))?,
        None => RoomId::random(&mut rand::thread_rng()),
    };
    let selector = selector(&args)?;

    let transport = TransportConfig {
        ice_servers: if args.stun.is_empty() {
            default_stun_servers()
        } else {
            args.stun.clone()
        },
    };
    let connection = RtcConnection::new(transport)
        .await
        .context("Failed to create peer connection")?;
    let signaling = ApprtcSignaling::new(room.clone(), ApprtcConfig::new(&args.signaling_url));

    println!(
        "{} {} {}",
        "📡 Joining room".green().bold(),
        room.to_string().cyan().bold(),
        format!("on {}", args.signaling_url).dimmed()
    );

    let mut session =
        Session::new(signaling, connection, selector).with_observer(Arc::new(LoggingObserver));
    let outcome = session
        .run_until(shutdown_signal())
        .await
        .context("Session failed")?;

    match outcome {
        SessionOutcome::Completed => println!("{}", "👋 Remote peer left".green()),
        SessionOutcome::Interrupted => println!("{}", "✋ Interrupted".yellow()),
    }
    Ok(())
}
