//! SPC overlay command line tool.
//!
//! Resolves an outlook or mesoscale discussion through the full pipeline
//! (local cache, fetch, parse, style) and prints the styled layer as JSON:
//! - `outlook`: convective or fire weather outlook for a day/time/date/hazard
//! - `md`: mesoscale discussion by year and number
//! - `legend`: legend entries for a product

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::{debug, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use outlook_common::{Color, ProductFamily, RequestKey};
use overlay::OverlayService;
use renderer::{LegendKind, StyleOverrides};
use storage::StorageConfig;

#[derive(Parser, Debug)]
#[command(name = "spc-overlay")]
#[command(about = "Fetch, cache and style SPC outlook overlays")]
struct Args {
    /// YAML storage configuration (default: SPC_* environment variables)
    #[arg(long, env = "SPC_CONFIG")]
    config: Option<PathBuf>,

    /// Writable cache directory
    #[arg(long, env = "SPC_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Read-only bundle checked before the cache directory
    #[arg(long, env = "SPC_PRE_EXISTING_DATA_DIR")]
    pre_existing_data_dir: Option<PathBuf>,

    /// Upstream host
    #[arg(long, env = "SPC_BASE_URL")]
    base_url: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON instead of human readable text
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convective or fire weather outlook
    Outlook {
        #[arg(long, value_enum, default_value = "convective")]
        family: Family,

        /// Forecast day, 1 through 8
        #[arg(long, default_value = "1")]
        day: u8,

        /// Issuance time as HHMM, e.g. 1630
        #[arg(long)]
        time: Option<u16>,

        /// Outlook date, YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,

        /// Hazard code (cat, torn, hail, wind, sighail, dryt, windrh, ...)
        #[arg(long)]
        hazard: Option<String>,

        /// Print a GeoJSON feature collection with style properties
        #[arg(long)]
        geojson: bool,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Mesoscale discussion
    Md {
        #[arg(long)]
        year: i32,

        #[arg(long)]
        number: u16,

        /// Print a GeoJSON feature collection
        #[arg(long)]
        geojson: bool,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Legend entries for a product
    Legend {
        /// e.g. convective_categorical, convective_hail, fire_categorical
        kind: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Family {
    Convective,
    Fire,
}

impl From<Family> for ProductFamily {
    fn from(family: Family) -> Self {
        match family {
            Family::Convective => ProductFamily::Convective,
            Family::Fire => ProductFamily::Fire,
        }
    }
}

#[derive(ClapArgs, Debug)]
struct StyleArgs {
    #[arg(long)]
    facecolor: Option<String>,

    #[arg(long)]
    edgecolor: Option<String>,

    #[arg(long)]
    hatch: Option<String>,

    #[arg(long)]
    linewidth: Option<f64>,

    #[arg(long)]
    alpha: Option<f64>,

    #[arg(long)]
    zorder: Option<f64>,
}

impl StyleArgs {
    fn overrides(&self) -> StyleOverrides {
        StyleOverrides {
            facecolor: self.facecolor.as_deref().map(Color::parse),
            edgecolor: self.edgecolor.as_deref().map(Color::parse),
            hatch: self.hatch.clone().map(outlook_common::Hatch::new),
            linewidth: self.linewidth,
            alpha: self.alpha,
            zorder: self.zorder,
        }
    }
}

fn init_tracing(args: &Args) -> Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    // stdout carries the JSON result, logs go to stderr.
    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if args.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<StorageConfig> {
    let mut config = match &args.config {
        Some(path) => StorageConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => StorageConfig::from_env().context("Invalid SPC_* environment")?,
    };

    if let Some(dir) = &args.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(dir) = &args.pre_existing_data_dir {
        config = config.with_pre_existing_data_dir(dir);
    }
    if let Some(url) = &args.base_url {
        config = config.with_base_url(url.as_str());
    }
    if let Some(secs) = args.timeout_secs {
        config.request_timeout_secs = secs;
    }

    config.validate().context("Invalid storage configuration")?;
    Ok(config)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to encode output")?
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args)?;

    if let Command::Legend { kind } = &args.command {
        let kind: LegendKind = kind.parse()?;
        return print_json(&kind.entries());
    }

    let config = load_config(&args)?;
    debug!(data_dir = %config.data_dir.display(), base_url = %config.base_url, "Loaded configuration");
    let service = OverlayService::new(config).context("Failed to create overlay service")?;

    match &args.command {
        Command::Outlook {
            family,
            day,
            time,
            date,
            hazard,
            geojson,
            style,
        } => {
            let request = RequestKey::new(
                *day,
                *time,
                date.year(),
                date.month(),
                date.day(),
                hazard.as_deref(),
            )?;
            let feature = service
                .outlook((*family).into(), request, &style.overrides())
                .await
                .with_context(|| format!("Failed to load outlook {}", request))?;

            info!(records = feature.records().len(), "Resolved outlook");

            if *geojson {
                print_json(&feature.to_feature_collection())?;
            } else {
                print_json(&json!({
                    "feature": feature,
                    "bounds": feature.bounds(),
                    "legend": feature.legend(),
                }))?;
            }
        }
        Command::Md {
            year,
            number,
            geojson,
            style,
        } => {
            let feature = service
                .discussion(*year, *number, &style.overrides())
                .await
                .with_context(|| format!("Failed to load mesoscale discussion {} of {}", number, year))?;

            if *geojson {
                print_json(&feature.to_feature_collection())?;
            } else {
                print_json(&json!({
                    "feature": feature,
                    "bounds": feature.bounds(),
                }))?;
            }
        }
        Command::Legend { .. } => {}
    }

    Ok(())
}
