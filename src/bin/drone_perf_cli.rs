use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use drone_performance::{estimate, estimate_many, ComponentSelection, ModelConfig, PerformanceReport};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "drone-perf")]
#[command(version)]
#[command(about = "Multirotor performance estimator for catalog builds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the performance of one build
    Estimate {
        /// Component selection (JSON file)
        #[arg(short = 'b', long)]
        build: PathBuf,

        #[command(flatten)]
        model: ModelArgs,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Estimate several builds in parallel
    Batch {
        /// Selection files; each holds one selection or an array of selections
        #[arg(required = true)]
        builds: Vec<PathBuf>,

        #[command(flatten)]
        model: ModelArgs,

        /// Output format
        #[arg(short = 'o', long, default_value = "csv")]
        output: OutputFormat,
    },

    /// Print the model configuration as TOML
    Config {
        #[command(flatten)]
        model: ModelArgs,
    },

    /// Display estimator information
    Info,
}

/// Configuration sources and quick environment overrides.
#[derive(Args, Debug, Clone, Default)]
struct ModelArgs {
    /// Model configuration (TOML file)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Altitude (meters)
    #[arg(long)]
    altitude: Option<f64>,

    /// Temperature (Celsius)
    #[arg(long)]
    temperature: Option<f64>,

    /// Humidity (percentage 0-100)
    #[arg(long)]
    humidity: Option<f64>,

    /// Wind speed (m/s)
    #[arg(long)]
    wind_speed: Option<f64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Table,
}

/// Environment variables overriding configuration keys,
/// e.g. `DRONE_PERF__ENVIRONMENT__ALTITUDE_M=1500`.
const ENV_PREFIX: &str = "DRONE_PERF";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Estimate { build, model, output } => {
            let config = load_model_config(&model)?;
            let selection = read_selection(&build)?;
            let report = estimate(&selection, Some(&config));
            display_reports(&[(build.display().to_string(), report)], output)?;
        }

        Commands::Batch { builds, model, output } => {
            let config = load_model_config(&model)?;
            let mut labels = Vec::new();
            let mut selections = Vec::new();
            for path in &builds {
                let parsed = read_selections(path)?;
                let many = parsed.len() > 1;
                for (index, selection) in parsed.into_iter().enumerate() {
                    labels.push(if many {
                        format!("{}#{}", path.display(), index + 1)
                    } else {
                        path.display().to_string()
                    });
                    selections.push(selection);
                }
            }
            info!(count = selections.len(), "estimating batch");

            let reports = estimate_many(&selections, Some(&config));
            let rows: Vec<(String, PerformanceReport)> = labels.into_iter().zip(reports).collect();
            display_reports(&rows, output)?;
        }

        Commands::Config { model } => {
            let config = load_model_config(&model)?;
            print!("{}", toml::to_string_pretty(&config).context("serializing configuration")?);
        }

        Commands::Info => {
            println!("╔════════════════════════════════════════╗");
            println!("║      DRONE PERFORMANCE v{:<15}║", env!("CARGO_PKG_VERSION"));
            println!("╠════════════════════════════════════════╣");
            println!("║ Empirical performance estimator for    ║");
            println!("║ multirotors built from catalog parts.  ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Estimates:                             ║");
            println!("║ • Mass and thrust-to-weight            ║");
            println!("║ • Power draw and flight time           ║");
            println!("║ • Top speed and hover throttle         ║");
            println!("║ • Compatibility and price              ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Config: TOML file, then env vars       ║");
            println!("║ {}__<SECTION>__<KEY>            ║", ENV_PREFIX);
            println!("╚════════════════════════════════════════╝");
        }
    }

    Ok(())
}

/// Defaults, then the optional TOML file, then `DRONE_PERF__*` variables, then flags.
fn load_model_config(args: &ModelArgs) -> Result<ModelConfig> {
    let mut builder = config::Config::builder();
    if let Some(path) = &args.config {
        if !path.exists() {
            bail!("configuration file {} does not exist", path.display());
        }
        builder = builder.add_source(
            config::File::from(path.as_path())
                .format(config::FileFormat::Toml)
                .required(true),
        );
    }
    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let settings = builder.build().context("loading model configuration")?;
    let mut model: ModelConfig = settings
        .try_deserialize()
        .context("decoding model configuration")?;

    if let Some(altitude) = args.altitude {
        model.environment.altitude_m = altitude;
    }
    if let Some(temperature) = args.temperature {
        model.environment.temperature_c = temperature;
    }
    if let Some(humidity) = args.humidity {
        model.environment.humidity_percent = humidity;
    }
    if let Some(wind_speed) = args.wind_speed {
        model.environment.wind_speed_mps = wind_speed;
    }

    model.validate().context("invalid model configuration")?;
    debug!(environment = ?model.environment, "model configuration loaded");
    Ok(model)
}

fn read_selection(path: &Path) -> Result<ComponentSelection> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    ComponentSelection::from_json(&text).with_context(|| format!("parsing {}", path.display()))
}

/// One selection, or a JSON array of them.
fn read_selections(path: &Path) -> Result<Vec<ComponentSelection>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    if text.trim_start().starts_with('[') {
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    } else {
        let selection = ComponentSelection::from_json(&text).with_context(|| format!("parsing {}", path.display()))?;
        Ok(vec![selection])
    }
}

fn display_reports(rows: &[(String, PerformanceReport)], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            if let [(_, report)] = rows {
                println!("{}", serde_json::to_string_pretty(report)?);
            } else {
                let reports: Vec<&PerformanceReport> = rows.iter().map(|(_, r)| r).collect();
                println!("{}", serde_json::to_string_pretty(&reports)?);
            }
        }

        OutputFormat::Csv => {
            println!("build,mass_g,twr,thrust_g,top_speed_kmh,flight_time_min,hover_time_min,power_w,current_a,hover_throttle_pct,style,price,compatible");
            for (label, r) in rows {
                println!(
                    "{},{:.1},{:.2},{:.1},{:.1},{:.2},{:.2},{:.1},{:.2},{:.1},{},{:.2},{}",
                    label,
                    r.total_mass_g,
                    r.thrust_to_weight,
                    r.max_thrust_g,
                    r.top_speed_kmh,
                    r.flight_time_min,
                    r.hover.time_min,
                    r.power_draw_w,
                    r.average_current_a,
                    r.hover.throttle_percent,
                    r.flight_style.map(|s| s.as_str()).unwrap_or("unknown"),
                    r.price.total,
                    r.compatibility.all_compatible(),
                );
            }
        }

        OutputFormat::Table => {
            for (label, r) in rows {
                let style = r.flight_style.map(|s| s.as_str()).unwrap_or("unknown");
                println!("{}", label);
                println!("╔════════════════════════════════════════╗");
                println!("║         PERFORMANCE ESTIMATE           ║");
                println!("╠════════════════════════════════════════╣");
                println!("║ Total Mass:        {:>8.1} g          ║", r.total_mass_g);
                println!("║ Max Thrust:        {:>8.1} g          ║", r.max_thrust_g);
                println!("║ Thrust/Weight:     {:>8.2}            ║", r.thrust_to_weight);
                println!("║ Flight Style:      {:>10}          ║", style);
                println!("╠════════════════════════════════════════╣");
                println!("║ FLIGHT                                 ║");
                println!("║ Flight Time:       {:>8.2} min        ║", r.flight_time_min);
                println!("║ Top Speed:         {:>8.1} km/h       ║", r.top_speed_kmh);
                println!("║ Avg Current:       {:>8.2} A          ║", r.average_current_a);
                println!("║ Power Draw:        {:>8.1} W          ║", r.power_draw_w);
                println!("║ Efficiency:        {:>8.1} %          ║", r.efficiency * 100.0);
                println!("╠════════════════════════════════════════╣");
                println!("║ HOVER                                  ║");
                println!("║ Throttle:          {:>8.1} %          ║", r.hover.throttle_percent);
                println!("║ Current:           {:>8.2} A          ║", r.hover.current_a);
                println!("║ Hover Time:        {:>8.2} min        ║", r.hover.time_min);
                println!("╠════════════════════════════════════════╣");
                println!("║ PRICE                                  ║");
                println!("║ Total:             {:>8.2}            ║", r.price.total);
                println!("╠════════════════════════════════════════╣");
                println!("║ COMPATIBILITY                          ║");
                println!("║ Motor/Prop:        {:>8}            ║", yes_no(r.compatibility.motor_prop));
                println!("║ Voltage:           {:>8}            ║", yes_no(r.compatibility.voltage));
                println!("║ Mounting:          {:>8}            ║", yes_no(r.compatibility.mounting));
                println!("║ Frame/Prop:        {:>8}            ║", yes_no(r.compatibility.frame_prop));
                println!("╚════════════════════════════════════════╝");
            }
        }
    }

    Ok(())
}

fn yes_no(ok: bool) -> &'static str {
    if ok {
        "yes"
    } else {
        "NO"
    }
}
