//! CLI argument definitions for sentimeter.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dashboard` | Price metrics, headline sentiment and news table for one symbol |
//! | `prices` | Price history and issuer metadata |
//! | `news` | Scored headlines |
//! | `score` | Score free text |
//! | `interactive` | Line-driven dashboard session with refresh |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--mock` | `false` | Serve synthetic data without network access |
//! | `--model` | `vader` | Sentiment model (vader, vader-finance) |
//! | `--no-cache` | `false` | Skip the in-memory cache |
//!
//! # Examples
//!
//! ```bash
//! sentimeter dashboard TSLA --period 3mo
//! sentimeter news AAPL --format json --pretty
//! sentimeter score "Shares surge after excellent earnings"
//! sentimeter --mock interactive
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use sentimeter_core::{Period, SentimentModelKind};

/// Stock price and news sentiment dashboard for the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "sentimeter",
    author,
    version,
    about = "Stock price and news sentiment dashboard",
    long_about = "sentimeter fetches a stock's recent price history and news headlines, scores \
the headlines' sentiment and prints the result as a terminal dashboard or JSON.\n\
\n\
Set SENTIMETER_NEWSAPI_KEY to use NewsAPI as the primary headline source; without it \
headlines come from Yahoo Finance."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Serve deterministic synthetic data instead of calling providers.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// Sentiment model; overrides SENTIMETER_SENTIMENT_MODEL.
    #[arg(long, global = true, value_parser = parse_model)]
    pub model: Option<SentimentModelKind>,

    /// Fetch upstream without reading or writing the cache.
    #[arg(long, global = true, default_value_t = false)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal layout.
    Table,
    /// Single JSON envelope.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 📈 Full dashboard: price metrics, overall sentiment, headline table.
    ///
    /// # Examples
    ///
    ///   sentimeter dashboard
    ///   sentimeter dashboard MSFT --period 6mo
    Dashboard(DashboardArgs),

    /// 💰 Price history and issuer metadata.
    Prices(PricesArgs),

    /// 📰 Recent headlines with per-headline sentiment.
    News(NewsArgs),

    /// 🧮 Score arbitrary text.
    ///
    /// # Examples
    ///
    ///   sentimeter score "Profit warning sends shares lower"
    Score(ScoreArgs),

    /// 🔁 Interactive session.
    ///
    /// Type a symbol to load it, `period <1mo|5d|3mo|6mo>` to change the window,
    /// `refresh` to clear caches and reload, `quit` to leave.
    Interactive(DashboardArgs),
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Ticker symbol; defaults to AAPL.
    pub symbol: Option<String>,

    /// Analysis window.
    #[arg(long, value_parser = parse_period)]
    pub period: Option<Period>,
}

#[derive(Debug, Args)]
pub struct PricesArgs {
    pub symbol: String,

    #[arg(long, value_parser = parse_period)]
    pub period: Option<Period>,
}

#[derive(Debug, Args)]
pub struct NewsArgs {
    pub symbol: String,
}

#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Text to score; multiple words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

fn parse_period(value: &str) -> Result<Period, String> {
    value.parse().map_err(|error: sentimeter_core::ValidationError| error.to_string())
}

fn parse_model(value: &str) -> Result<SentimentModelKind, String> {
    value.parse().map_err(|error: sentimeter_core::ValidationError| error.to_string())
}
