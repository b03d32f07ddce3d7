mod cli;
mod commands;
mod error;
mod metadata;
mod output;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::commands::interactive::Session;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sentimeter=info,sentimeter_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    let config = commands::resolve_config(&cli)?;
    let service = config.build_service();

    if let Command::Interactive(args) = &cli.command {
        let symbol = args.symbol.as_deref().unwrap_or(&config.default_symbol);
        let period = args.period.unwrap_or(config.default_period);
        let mut session = Session::new(
            &service,
            cli.format,
            commands::cache_mode(&cli),
            symbol,
            period,
        );
        let stdin = BufReader::new(tokio::io::stdin());
        session.run(stdin, &mut io::stdout()).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let (envelope, table) = commands::run(&cli, &config, &service).await?;
    output::render(
        &mut io::stdout().lock(),
        &envelope,
        table.as_deref(),
        cli.format,
        cli.pretty,
    )?;

    if !envelope.errors.is_empty() {
        return Ok(ExitCode::from(3));
    }

    Ok(ExitCode::SUCCESS)
}
