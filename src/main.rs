use anchor_survey::{
    solve_batch, CsvFormatter, InvalidRangePolicy, JsonFormatter, StationParser, SurveyConfig, SurveyReport, SurveyRun,
    TextFormatter, TravelTimeMode,
};
use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info};

/// Locate a seafloor acoustic anchor from ship ranging stations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Station files, one `lat_deg lat_min lon_deg lon_min travel_time` row per station.
    /// Several files are solved as independent drops sharing one configuration.
    #[arg(required = true, value_name = "STATIONS")]
    stations: Vec<PathBuf>,

    /// JSON survey configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Drop record "lat_deg lat_min [lat_sec] [N|S] lon_deg lon_min [lon_sec] [E|W] depth"
    #[arg(long, value_name = "RECORD")]
    drop: Option<String>,

    /// Ship transducer depth, positive down (m)
    #[arg(long, value_name = "METERS")]
    transducer_depth: Option<f64>,

    /// Sound speed in water (m/s)
    #[arg(long, value_name = "M/S")]
    sound_speed: Option<f64>,

    /// Travel times are one-way rather than round-trip
    #[arg(long, default_value_t = false)]
    one_way: bool,

    /// Drop stations with unusable ranges instead of failing the survey
    #[arg(long, default_value_t = false)]
    drop_invalid: bool,

    /// Solver convergence tolerance (m)
    #[arg(long, value_name = "METERS")]
    tolerance: Option<f64>,

    /// Solver iteration cap
    #[arg(long, value_name = "N")]
    max_iterations: Option<usize>,

    /// Stop the solver when a single step exceeds this distance (m)
    #[arg(long, value_name = "METERS")]
    divergence_limit: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Include per-station residuals in text output
    #[arg(long, default_value_t = false)]
    residuals: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Csv,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = build_config(&args)?;
    info!(
        lat = config.reference_point.lat,
        lon = config.reference_point.lon,
        drop_depth_m = config.drop_depth_m,
        "drop point"
    );

    let parser = StationParser::new(config.station_hemispheres);
    let mut runs = Vec::with_capacity(args.stations.len());
    for path in &args.stations {
        let stations = parser
            .parse_file(path)
            .with_context(|| format!("reading stations from {}", path.display()))?;
        info!(file = %path.display(), stations = stations.len(), "loaded stations");
        runs.push(SurveyRun::new(path.display().to_string(), stations, config.clone()));
    }

    let results = solve_batch(&runs);

    let csv = CsvFormatter::new();
    if args.format == Format::Csv {
        println!("{}", csv.header());
    }

    let mut failures = 0;
    for (run, result) in runs.iter().zip(&results) {
        let solution = match result {
            Ok(solution) => solution,
            Err(e) => {
                error!(run = %run.name, "{}", e);
                failures += 1;
                continue;
            }
        };
        let report = SurveyReport::new(&run.name, solution);
        match args.format {
            Format::Text => {
                let mut text = TextFormatter::new();
                if args.residuals {
                    text = text.with_residuals();
                }
                print!("{}", text.format_text(&report));
            }
            Format::Json => println!("{}", JsonFormatter::pretty().format_json(&report)?),
            Format::Csv => println!("{}", csv.format_csv(&report)),
        }
    }

    if failures > 0 {
        bail!("{} of {} survey(s) failed", failures, runs.len());
    }
    Ok(())
}

/// Layer command-line overrides on top of the configuration file
fn build_config(args: &Args) -> Result<SurveyConfig> {
    let mut config = match &args.config {
        Some(path) => SurveyConfig::load_from_file(path)?,
        None => SurveyConfig::default(),
    };

    match &args.drop {
        Some(record) => {
            let drop = StationParser::new(config.station_hemispheres)
                .parse_drop_record(record)
                .context("parsing --drop")?;
            config = config.with_drop_point(drop);
        }
        None if args.config.is_none() => {
            bail!("no drop position given; pass --drop or --config");
        }
        None => {}
    }

    if let Some(depth) = args.transducer_depth {
        config = config.with_transducer_depth(depth);
    }
    if let Some(speed) = args.sound_speed {
        config = config.with_sound_speed(speed);
    }
    if args.one_way {
        config = config.with_travel_time_mode(TravelTimeMode::OneWay);
    }
    if args.drop_invalid {
        config = config.with_invalid_range_policy(InvalidRangePolicy::Drop);
    }
    if let Some(tolerance) = args.tolerance {
        config.solver.tolerance_m = tolerance;
    }
    if let Some(max_iterations) = args.max_iterations {
        config.solver.max_iterations = max_iterations;
    }
    if args.divergence_limit.is_some() {
        config.solver.divergence_limit_m = args.divergence_limit;
    }

    config.validate()?;
    Ok(config)
}

/// Initialize logging subsystem
fn init_logging(verbose: bool) {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if verbose {
        subscriber.with_max_level(tracing::Level::DEBUG).init();
        info!("Verbose logging enabled (DEBUG level)");
    } else {
        subscriber.with_max_level(tracing::Level::INFO).init();
    }
}
