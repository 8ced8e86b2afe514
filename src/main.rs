use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use ct_indication::{
    DateFormatConfig, FittedModel, KeyphraseDictionary, Pipeline, PipelineConfig,
    read_scan_records, write_scored_scans,
};
use log::{info, warn};

#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

/// Label CT scans as surveillance or other reasons
#[derive(Parser, Debug)]
#[command(name = "ct-indication", version, about)]
struct Args {
    /// Parquet file with one row per CT scan
    #[arg(long)]
    input: PathBuf,

    /// Keyphrase dictionary (JSON object of feature name to patterns)
    #[arg(long)]
    dictionary: PathBuf,

    /// Fitted model (JSON with intercept, coefficients and cutoff)
    #[arg(long)]
    model: PathBuf,

    /// Gap in 30-day months above which a prior scan counts as distant
    #[arg(long, default_value_t = 6.0)]
    threshold: f64,

    /// Probability cutoff overriding the model's own
    #[arg(long)]
    cutoff: Option<f64>,

    /// Write scored scans to this Parquet file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Process records on a single thread
    #[arg(long)]
    sequential: bool,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::new().with_threshold_months(self.threshold);
        if let Some(cutoff) = self.cutoff {
            config = config.with_cutoff(cutoff);
        }
        if let Some(output) = &self.output {
            config = config.with_output(output);
        }
        if self.sequential {
            config = config.sequential();
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.pipeline_config();
    info!("{config}");

    // Artifacts are loaded once, before any record is touched
    let dictionary = KeyphraseDictionary::load(&args.dictionary)
        .context("Failed to load keyphrase dictionary")?;
    let model = FittedModel::load(&args.model).context("Failed to load fitted model")?;
    let pipeline = Pipeline::new(config, dictionary, model)?;

    let records = read_scan_records(&args.input, &DateFormatConfig::default())
        .with_context(|| format!("Failed to read scan records from {}", args.input.display()))?;

    let output = pipeline.run(&records)?;
    if !output.notices.is_empty() {
        warn!(
            "{} negative structured counts were clamped to zero",
            output.notices.len()
        );
    }
    info!("{}", output.summary);

    if let Some(path) = pipeline.config().output.destination() {
        write_scored_scans(path, &output.scans, &pipeline.feature_schema())
            .with_context(|| format!("Failed to write scored scans to {}", path.display()))?;
    } else {
        info!("Output disabled; scored scans were not written");
    }

    Ok(())
}
