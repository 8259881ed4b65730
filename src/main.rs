mod cli;
mod client;
mod commands;
mod config;
mod error;
mod form;
mod mount;
mod output;
mod panel;
mod payload;
mod types;

use std::error::Error;
use std::io;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use client::{IndicoClient, Routes};
use config::Config;
use error::{Result, SpeakersError};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let verbose = std::env::args().any(|arg| arg == "--verbose" || arg == "-v");
    init_logging(verbose);

    if let Err(e) = run().await {
        // Already shown by the error reporter
        if !matches!(e, SpeakersError::Reported) {
            eprintln!("Error: {e}");

            if verbose {
                let mut source = e.source();
                while let Some(cause) = source {
                    eprintln!("Caused by: {cause}");
                    source = cause.source();
                }
            }
        }

        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("speakers=debug")
    } else {
        EnvFilter::try_from_env("SPEAKERS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    output::set_format(cli.output_format());
    output::set_quiet(cli.quiet);

    match cli.command {
        // Commands that don't require config/client
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "speakers", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run().await?;
        }
        // Commands that require config and client
        command => {
            let config = Config::load()?;
            let routes = Routes::new(&config.base_url()?)?;
            let client = Arc::new(IndicoClient::new(routes, config.api_token())?);

            match command {
                Commands::List(args) => {
                    commands::speakers::list(&client, &config, args).await?;
                }
                Commands::Edit(args) => {
                    commands::speakers::edit(&client, &config, args).await?;
                }
                Commands::UploadPhoto(args) => {
                    commands::speakers::upload_photo(&client, &config, args).await?;
                }
                Commands::Browse(args) => {
                    commands::browse::run(&client, &config, args).await?;
                }
                Commands::Completions { .. } | Commands::Init => {
                    // Already handled above
                }
            }
        }
    }

    Ok(())
}
