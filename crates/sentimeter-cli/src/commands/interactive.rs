//! Line-driven dashboard session.

use std::io::Write;

use sentimeter_core::{CacheMode, DashboardReport, DashboardService, Period};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output::terminal;

const HELP: &str = "commands: <SYMBOL> | period <1mo|5d|3mo|6mo> | refresh | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionCommand {
    Load(String),
    SetPeriod(Period),
    Refresh,
    Help,
    Quit,
    Skip,
    Invalid(String),
}

fn parse_line(line: &str) -> SessionCommand {
    let line = line.trim();
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return SessionCommand::Skip;
    };

    match first.to_ascii_lowercase().as_str() {
        "quit" | "exit" | "q" => SessionCommand::Quit,
        "refresh" | "r" => SessionCommand::Refresh,
        "help" | "?" => SessionCommand::Help,
        "period" => match words.next().map(str::parse::<Period>) {
            Some(Ok(period)) => SessionCommand::SetPeriod(period),
            Some(Err(error)) => SessionCommand::Invalid(error.to_string()),
            None => SessionCommand::Invalid(String::from("period needs a value")),
        },
        _ if words.next().is_none() => SessionCommand::Load(first.to_owned()),
        _ => SessionCommand::Invalid(format!("unrecognized input '{line}'")),
    }
}

/// Session state: the symbol and period currently on screen.
pub struct Session<'a> {
    service: &'a DashboardService,
    format: OutputFormat,
    mode: CacheMode,
    symbol: String,
    period: Period,
}

impl<'a> Session<'a> {
    pub fn new(
        service: &'a DashboardService,
        format: OutputFormat,
        mode: CacheMode,
        symbol: impl Into<String>,
        period: Period,
    ) -> Self {
        Self {
            service,
            format,
            mode,
            symbol: symbol.into(),
            period,
        }
    }

    /// Shows the initial dashboard, then handles input lines until `quit` or end of input.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<(), CliError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "{HELP}")?;
        let report = self.service.run_with_mode(&self.symbol, self.period, self.mode).await;
        self.show(&report, out)?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let report = match parse_line(&line) {
                SessionCommand::Quit => break,
                SessionCommand::Skip => continue,
                SessionCommand::Help => {
                    writeln!(out, "{HELP}")?;
                    continue;
                }
                SessionCommand::Invalid(message) => {
                    writeln!(out, "error: {message}")?;
                    continue;
                }
                SessionCommand::Load(symbol) => {
                    self.symbol = symbol;
                    self.service.run_with_mode(&self.symbol, self.period, self.mode).await
                }
                SessionCommand::SetPeriod(period) => {
                    self.period = period;
                    self.service.run_with_mode(&self.symbol, self.period, self.mode).await
                }
                SessionCommand::Refresh => self.service.refresh(&self.symbol, self.period).await,
            };
            self.show(&report, out)?;
        }

        tracing::debug!("interactive session ended");
        Ok(())
    }

    fn show<W: Write>(&self, report: &DashboardReport, out: &mut W) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Table => write!(out, "{}", terminal::render_dashboard(report))?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(report)?)?,
        }
        out.flush()?;
        Ok(())
    }
}
