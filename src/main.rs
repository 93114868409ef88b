mod cli;

use std::io::{self, Read};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use planwise_config::Config;
use planwise_core::{Dispatcher, ProfileKind, SessionFactory};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if let Commands::Completions { shell } = &cli.command {
        cli::print_completions(*shell);
        return Ok(());
    }

    let mut config = planwise_config::load(cli.config.as_deref())?;
    if let Some(model) = &cli.model {
        config.model.name = model.clone();
    }

    match cli.command {
        Commands::ShowConfig => {
            println!("{}", toml::to_string_pretty(&config).context("rendering configuration")?);
            Ok(())
        }
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            planwise_server::serve(&config).await
        }
        Commands::Ask { profile, text } => {
            let query = match text {
                Some(t) => t,
                None => read_stdin()?,
            };
            let ok = ask(&config, profile.into(), query.trim()).await?;
            if !ok {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Completions { .. } => Ok(()),
    }
}

/// One-shot dispatch; prints the rendered outcome to stdout.
async fn ask(config: &Config, kind: ProfileKind, query: &str) -> anyhow::Result<bool> {
    let factory = SessionFactory::from_config(config)?;
    let session = factory.build(kind.profile(&config.model.name)).await?;
    let outcome = Dispatcher::from_config(&config.agent).dispatch_session(query, &session).await;
    let ok = outcome.is_success();
    println!("{}", outcome.into_text());
    Ok(ok)
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf).context("reading query from stdin")?;
    Ok(buf)
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
