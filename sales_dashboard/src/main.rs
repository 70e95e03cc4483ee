//! CLI dashboard for the monthly sales forecast
//!
//! Mirrors the sidebar of the original dashboard: a prediction mode, a pair
//! of dates, and (when they coincide) a direction and day count to extend
//! the range. Prints a summary or a table and exports the forecast as CSV.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use sales_forecast::data::SalesHistory;
use sales_forecast::models::seasonal_arima::SeasonalArima;
use sales_forecast::models::ForecastModel;
use sales_forecast::range::{DateRangeRequest, ExtendDirection, PredictionMode};
use sales_forecast::{report, resolve, ForecastCache};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Single,
    Multiple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DirectionArg {
    Forward,
    Backward,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Sales prediction dashboard", long_about = None)]
struct Args {
    /// Path to the sales ledger CSV
    #[arg(long, default_value = "Sales_data.csv")]
    data: PathBuf,

    /// Prediction type
    #[arg(long, value_enum, default_value_t = ModeArg::Single)]
    mode: ModeArg,

    /// Date to predict (start date in multiple mode)
    #[arg(long)]
    start: NaiveDate,

    /// End date in multiple mode, defaults to the start date
    #[arg(long)]
    end: Option<NaiveDate>,

    /// How to extend the range when start and end coincide
    #[arg(long, value_enum, default_value_t = DirectionArg::Forward)]
    direction: DirectionArg,

    /// Days to extend by when start and end coincide
    #[arg(long, default_value_t = 0)]
    steps: u32,

    /// Where to write the exported forecast
    #[arg(long, default_value = report::CSV_FILE_NAME)]
    out: PathBuf,

    /// Skip the CSV export
    #[arg(long)]
    no_export: bool,
}

fn build_request(args: &Args) -> DateRangeRequest {
    let mode = match args.mode {
        ModeArg::Single => PredictionMode::Single,
        ModeArg::Multiple => PredictionMode::Multiple,
    };
    let direction = match args.direction {
        DirectionArg::Forward => ExtendDirection::Forward,
        DirectionArg::Backward => ExtendDirection::Backward,
    };
    DateRangeRequest {
        mode,
        user_start: args.start,
        user_end: args.end.unwrap_or(args.start),
        direction,
        step_days: args.steps,
    }
}

fn main() -> anyhow::Result<()> {
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with(stdout_layer)
        .init();

    let args = Args::parse();

    info!("loading sales ledger from {}", args.data.display());
    let history = SalesHistory::from_csv(&args.data)
        .with_context(|| format!("failed to load {}", args.data.display()))?;
    let monthly = history.resample_monthly()?;
    info!(
        "{} daily records resampled to {} months ({} .. {})",
        history.len(),
        monthly.len(),
        monthly.first_month().unwrap_or_default(),
        monthly.last_month().unwrap_or_default()
    );

    let spec = SeasonalArima::monthly_default();
    info!("fitting {}", spec.name());
    let model = spec.train(&monthly).context("model fitting failed")?;

    let request = build_request(&args);
    let resolved = resolve(&request);
    debug!(
        "resolved range {} .. {}",
        resolved.effective_start, resolved.effective_end
    );

    let mut cache = ForecastCache::new();
    let table = cache
        .fetch(&model, &resolved)
        .context("forecast failed")?;
    info!("forecast produced {} rows", table.len());

    if request.mode == PredictionMode::Single {
        // single mode always resolves to exactly one row
        println!("{}", report::single_summary(&table[0]));
    } else {
        print!("{}", report::render_table(&table));
    }

    if !args.no_export {
        let bytes = report::to_csv(&table)?;
        let file = File::create(&args.out)
            .with_context(|| format!("cannot create {}", args.out.display()))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&bytes)?;
        writer.flush()?;
        info!("wrote {} ({})", args.out.display(), report::CSV_MIME_TYPE);
    }

    Ok(())
}
