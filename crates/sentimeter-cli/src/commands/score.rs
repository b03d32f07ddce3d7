use serde::Serialize;

use sentimeter_core::{DashboardService, SentimentResult};

use crate::cli::ScoreArgs;
use crate::error::CliError;
use crate::output::terminal;

use super::CommandResult;

#[derive(Debug, Serialize)]
pub struct ScoreResponseData {
    pub text: String,
    pub model: &'static str,
    pub result: SentimentResult,
}

/// Scores text locally; the market provider stands in as the source chain entry.
pub fn run(args: &ScoreArgs, service: &DashboardService) -> Result<CommandResult, CliError> {
    let text = args.text.join(" ");
    let scorer = service.scorer();
    let data = ScoreResponseData {
        result: scorer.score(&text),
        model: scorer.model_name(),
        text,
    };

    Ok(
        CommandResult::ok(serde_json::to_value(&data)?, vec![service.market().provider()])
            .with_table(terminal::render_score(&data)),
    )
}
