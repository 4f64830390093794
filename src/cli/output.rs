//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, SentimentArgs};
use crate::error::Result;
use crate::pipeline::PipelineReport;
use crate::prediction::PredictionResult;

/// Result of `--check`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckReport {
    pub path: String,
    pub malformed_lines: Vec<String>,
}

/// Print a pipeline report in the selected format.
pub fn output_report(report: &PipelineReport, args: &SentimentArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            print!("{}", format_report(report));
            Ok(())
        }
        OutputFormat::Json => output_json(report, args),
    }
}

/// Print the result of checking an input file.
pub fn output_check(report: &CheckReport, args: &SentimentArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if report.malformed_lines.is_empty() {
                println!("{}: OK", report.path);
            } else {
                println!("{}: {} malformed lines", report.path, report.malformed_lines.len());
                for problem in &report.malformed_lines {
                    println!("  {problem}");
                }
            }
            Ok(())
        }
        OutputFormat::Json => output_json(report, args),
    }
}

fn output_json<T: Serialize>(result: &T, args: &SentimentArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

/// Human-readable rendering of a pipeline report.
pub fn format_report(report: &PipelineReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Training set: {} records, test set: {} records\n",
        report.train_count, report.test_count
    ));
    match report.training_millis {
        Some(ms) => output.push_str(&format!("Training time: {ms} ms\n")),
        None => output.push_str("Model loaded from file\n"),
    }

    output.push_str("\nModel quality metrics\n");
    output.push_str("═════════════════════\n");
    output.push_str(&report.metrics.format());
    if let Some(accuracy) = report.baseline_accuracy {
        output.push_str(&format!("Majority baseline: {:.2}%\n", accuracy * 100.0));
    }

    output.push_str("\nSingle prediction\n");
    output.push_str("═════════════════\n");
    output.push_str(&format_prediction(&report.single_prediction));

    output.push_str("\nBatch predictions\n");
    output.push_str("═════════════════\n");
    for prediction in &report.batch_predictions {
        output.push_str(&format_prediction(prediction));
    }

    output
}

fn format_prediction(prediction: &PredictionResult) -> String {
    format!(
        "Sentiment: {} | Prediction: {} | Probability: {:.4} | Score: {:.4}\n",
        prediction.input_text,
        prediction.sentiment(),
        prediction.probability,
        prediction.score
    )
}
