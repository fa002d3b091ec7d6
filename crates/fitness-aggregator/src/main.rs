mod bootstrap;

use aggregator_core::error::AggregatorError;
use aggregator_core::settings::Settings;
use aggregator_data::pipeline::run_pipeline;
use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Fitness aggregator v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = settings.validate() {
        eprintln!("{}", e);
        eprintln!("Provide at least one input source with --csv and/or --json.");
        std::process::exit(2);
    }

    let result = match run_pipeline(settings.csv.as_deref(), settings.json.as_deref()) {
        Ok(result) => result,
        // Soft outcome: there simply is nothing to aggregate.
        Err(AggregatorError::EmptyDataset) => {
            eprintln!("No data to process.");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        "Records: {} initial, {} final, {} duplicates removed ({} source(s) skipped)",
        result.cleaning.initial_count,
        result.cleaning.final_count,
        result.cleaning.duplicates_removed,
        result.metadata.sources_skipped,
    );

    let json = if settings.pretty {
        serde_json::to_string_pretty(&result.report)?
    } else {
        serde_json::to_string(&result.report)?
    };

    match &settings.output {
        Some(path) => {
            std::fs::write(path, &json)?;
            tracing::info!("Report written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
