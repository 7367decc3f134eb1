//! object-announcer: spoken detected-objects list for an assistive vision server.

use object_announcer::{config, history, render, service, speech};

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "object-announcer",
    about = "Announce objects detected by a vision server"
)]
struct Args {
    /// Path to config.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Objects endpoint URL (overrides config)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Run a single poll cycle and exit
    #[arg(long)]
    once: bool,

    /// Disable speech output
    #[arg(long)]
    mute: bool,

    /// Print a poll report for a date (YYYY-MM-DD, default today) and exit
    #[arg(long, value_name = "DATE")]
    report: Option<Option<String>>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(date) = args.report {
        let date =
            date.unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
        println!("{}", history::generate_report(&date));
        return Ok(());
    }

    info!("object-announcer starting");

    let mut config = config::Config::load(args.config.as_deref());
    if let Some(endpoint) = args.endpoint {
        config.poll.endpoint = endpoint;
    }
    if args.mute {
        config.speech.enabled = false;
    }
    info!("Objects endpoint: {}", config.poll.endpoint);

    let target = render::TerminalList::new(&config.display.heading);
    let speaker = speech::PlatformSpeaker::new(&config.speech);

    let service = service::AnnouncerService::new(config, target, speaker);

    if args.once {
        service.poll_once().await;
        return Ok(());
    }

    service.run().await;

    Ok(())
}
