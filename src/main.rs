// ========================================================================================
//
//                        THE ONE-SHOT PREDICTOR: MANOMETER
//
// ========================================================================================
//
// This binary runs a complete stress assessment in a single invocation: it
// decodes the questionnaire answers passed as its one argument, fits the
// model on the synthetic corpus, scores the answers, and prints exactly one
// JSON object on stdout.
//
// ### The Output Contract ###
//
// 1.  **Syntactically invalid input** (including a missing argument) prints
//     `{"error": ...}` and exits 1. This is the only non-zero path.
//
// 2.  **Every later failure** (payload shape, training, prediction) degrades
//     to a fallback payload carrying a plausible default score, and exits 0.
//     Machine callers detect failure by the presence of the "error" key, not
//     by the exit code.
//
// 3.  **No flags.** The single positional is the entire interface. Tokens
//     shaped like options ("-5", "--help") are answer payload, handled by
//     rule 1 or 2 like any other input.

use clap::Parser;
use manometer::model::ModelConfig;
use manometer::pipeline::{self, FallbackResult, PipelineError, PredictionResult, ScoreEngine};
use manometer::synthesis::SynthesisConfig;
use serde::Serialize;
use std::process;

#[derive(Parser, Debug)]
#[clap(
    name = "manometer",
    about = "Questionnaire-driven stress score prediction.",
    disable_help_flag = true
)]
struct Args {
    /// JSON array of questionnaire answers, e.g. '[{"questionId":1,"value":7}]'.
    #[clap(allow_hyphen_values = true)]
    answers: Option<String>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    // A missing argument decodes like empty input: a parse failure.
    let raw = args.answers.unwrap_or_default();

    match assess(&raw) {
        Ok(result) => emit(&result),
        Err(error @ PipelineError::Parse(_)) => {
            emit(&serde_json::json!({ "error": error.to_string() }));
            process::exit(1);
        }
        Err(error) => emit(&FallbackResult::for_error(&error)),
    }
}

/// Decode, train, assess. Any error funnels into the caller's match.
fn assess(raw: &str) -> Result<PredictionResult, PipelineError> {
    let answers = pipeline::parse_answers(raw)?;
    let engine = ScoreEngine::train(&SynthesisConfig::default(), ModelConfig::default())?;
    Ok(engine.assess(&answers)?)
}

/// Prints one payload as a single JSON line on stdout.
fn emit<T: Serialize>(payload: &T) {
    let line = serde_json::to_string(payload).expect("output payloads always serialize");
    println!("{line}");
}
