//! Command implementation for the sentiment CLI.

use log::info;

use crate::cli::args::SentimentArgs;
use crate::cli::output::{CheckReport, output_check, output_report};
use crate::config::{ModelSource, PipelineConfig};
use crate::data::DataLoader;
use crate::error::{Result, SentimentError};
use crate::pipeline::SentimentPipeline;

/// Execute the CLI.
pub fn execute_command(args: SentimentArgs) -> Result<()> {
    let config = build_config(&args)?;

    if args.check {
        return check_input(&config, &args);
    }

    let report = SentimentPipeline::new(config)?.run()?;
    output_report(&report, &args)
}

/// Merge the optional config file with command-line flags (flags win).
pub fn build_config(args: &SentimentArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Reading configuration from {}", path.display());
            let mut config = PipelineConfig::from_file(path)?;
            if let Some(input) = args.explicit_input_path() {
                config.input_path = input;
            }
            config
        }
        None => PipelineConfig::new(args.input_path()),
    };

    if let Some(test_fraction) = args.test_fraction {
        config.test_fraction = test_fraction;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(path) = &args.save_model {
        config.model = ModelSource::TrainAndSave(path.clone());
    }
    if let Some(path) = &args.load_model {
        config.model = ModelSource::Load(path.clone());
    }
    if let Some(first) = args.texts.first() {
        config.single_text = first.clone();
        config.batch_texts = args.texts.clone();
    }

    config.validate()?;
    Ok(config)
}

fn check_input(config: &PipelineConfig, args: &SentimentArgs) -> Result<()> {
    let problems = DataLoader::new(&config.input_path).validate()?;
    let report = CheckReport {
        path: config.input_path.display().to_string(),
        malformed_lines: problems.iter().map(ToString::to_string).collect(),
    };
    output_check(&report, args)?;

    if problems.is_empty() {
        Ok(())
    } else {
        Err(SentimentError::other(format!(
            "{} contains {} malformed lines",
            report.path,
            problems.len()
        )))
    }
}
