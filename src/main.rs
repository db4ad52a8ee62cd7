use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use url::Url;

use retroplayer::Config;
use retroplayer::player::{
    Codec, DurationProbe, HttpHeaderProbe, Quality, SessionEvent, SourceDescriptor,
};
use retroplayer::runtime::session_channel;
use retroplayer::utils::format_duration;

#[derive(Debug, Parser)]
#[command(
    name = "retroplayer",
    about = "Diagnostics for the retroplayer control layer",
    disable_help_subcommand = true
)]
struct Cli {
    /// Player configuration file (TOML)
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read the duration headers a media URL reports
    Probe {
        /// Absolute media URL
        url: Url,
    },
    /// Rewrite a source URL for a quality and codec selection
    Source {
        src: String,
        quality: String,
        /// mpeg4, h263 or default
        codec: Option<Codec>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("retroplayer=debug")
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Probe { url } => probe(url, &config),
        Command::Source {
            src,
            quality,
            codec,
        } => {
            let codec = codec.unwrap_or_default();
            println!("{}", SourceDescriptor::rebuild(&src, &Quality::new(quality), codec));
            Ok(())
        }
    }
}

/// Ask the server for the duration headers of `url` and print the result
fn probe(url: Url, config: &Config) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        let (tx, mut rx) = session_channel();
        let mut probe = HttpHeaderProbe::new(url.clone(), config.network.probe_timeout(), tx)
            .context("Failed to set up the duration request")?;
        info!("Probing {} for duration headers", url);
        probe.request(url.as_str(), 0);

        match rx.recv().await {
            Some(SessionEvent::DurationProbed {
                seconds: Some(seconds),
                ..
            }) => println!("{} ({:.3}s)", format_duration(seconds), seconds),
            Some(SessionEvent::DurationProbed { seconds: None, .. }) => {
                println!("no duration header")
            }
            other => bail!("Unexpected probe outcome: {:?}", other),
        }
        Ok::<(), anyhow::Error>(())
    })
}
