//! wtx-ui (Client UI)
//!
//! Submits ticket image URLs through the extraction proxy, shows the
//! normalized details, and stores them via the persistence service.
//! One-shot with an IMAGE_URL argument, otherwise an interactive prompt.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::info;
use wtx_common::config::TomlConfig;
use wtx_ui::render::{render_notification, render_state};
use wtx_ui::{
    DetailsSink, ExtractionClient, ExtractionSource, PersistenceClient, Session, SessionState,
    Status,
};

/// Command-line arguments for wtx-ui
#[derive(Parser, Debug)]
#[command(name = "wtx-ui")]
#[command(about = "Extract, review, and store waste ticket details")]
#[command(version)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extraction endpoint (through the proxy)
    #[arg(long, env = "WTX_EXTRACT_URL")]
    extract_url: Option<String>,

    /// Persistence endpoint
    #[arg(long, env = "WTX_SAVE_URL")]
    save_url: Option<String>,

    /// Submit this image URL once and exit
    #[arg(value_name = "IMAGE_URL")]
    image_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let (config, config_source) = TomlConfig::load(args.config.as_deref());

    // stdout belongs to the rendered form
    let level = &config.logging.level;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("wtx_ui={level},wtx_common={level}").into()),
        )
        .init();

    info!("Starting WTX Client (wtx-ui) v{}", env!("CARGO_PKG_VERSION"));
    config_source.log();

    let extract_url = args.extract_url.unwrap_or(config.client.extract_url);
    let save_url = args.save_url.unwrap_or(config.client.save_url);
    info!("Extraction: {}", extract_url);
    info!("Persistence: {}", save_url);

    let extractor = ExtractionClient::new(extract_url).context("Failed to build extraction client")?;
    let sink = PersistenceClient::new(save_url).context("Failed to build persistence client")?;

    let mut session = Session::new(extractor, sink);
    tokio::spawn(show_loading(session.subscribe()));

    match args.image_url {
        Some(image_url) => Ok(submit_and_render(&mut session, &image_url).await),
        None => {
            prompt_loop(&mut session).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Print the status line whenever a submission starts
async fn show_loading(mut rx: watch::Receiver<SessionState>) {
    while rx.changed().await.is_ok() {
        if matches!(*rx.borrow_and_update(), SessionState::Loading { .. }) {
            println!("Loading...");
        }
    }
}

/// Exit code 2 for rejected input, 1 for failed extraction
async fn submit_and_render<E, S>(session: &mut Session<E, S>, input: &str) -> ExitCode
where
    E: ExtractionSource,
    S: DetailsSink,
{
    let status = match session.submit(input).await {
        Ok(status) => status,
        Err(e) => {
            println!("{}", e);
            return ExitCode::from(2);
        }
    };

    for notification in session.take_notifications() {
        println!("{}", render_notification(&notification));
    }
    print!("{}", render_state(&session.state()));

    match status {
        Status::Failed => ExitCode::from(1),
        _ => ExitCode::SUCCESS,
    }
}

async fn prompt_loop<E, S>(session: &mut Session<E, S>) -> Result<()>
where
    E: ExtractionSource,
    S: DetailsSink,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("Image URL> ");
        std::io::stdout().flush().context("Failed to write prompt")?;

        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            println!();
            break;
        };

        let input = line.trim();
        if input == "quit" || input == "exit" {
            break;
        }

        submit_and_render(session, input).await;
        println!();
    }

    info!("Session ended");
    Ok(())
}
