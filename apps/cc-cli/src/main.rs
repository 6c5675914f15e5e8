use cc_app::{
    AppError, AppResult, GainSet, RunOptions, RunProgressEvent, RunRequest, RunStage, query,
    run_service, sweep,
};
use cc_core::SeedPlan;
use cc_project::{RoadDef, Scenario, TARGET_SPEED_RANGE_KPH};
use cc_road::{InclinationConfig, SegmentedProfileConfig};
use cc_sim::{SeriesStats, SimulationResult, Summary};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cruise-sim")]
#[command(about = "Cruise control closed-loop simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate once from command-line parameters, without caching
    Simulate(SimulateArgs),
    /// Run a scenario file, reusing the cached result of a seeded scenario
    ///
    /// A scenario without a `seed` draws a fresh one on every invocation, so
    /// each run of it is simulated and stored as a new run.
    Run {
        /// Path to the scenario file (YAML or JSON)
        scenario_path: PathBuf,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// Write the default Camry scenario to a new file
    Init {
        /// Destination path (YAML, or JSON for .json)
        scenario_path: PathBuf,
    },
    /// Validate a scenario file
    Validate {
        /// Path to the scenario file
        scenario_path: PathBuf,
    },
    /// List stored runs of a scenario, across seeds
    Runs {
        /// Path to the scenario file
        scenario_path: PathBuf,
    },
    /// Show details of a cached run
    ShowRun {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export a cached run as CSV
    Export {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Export a single variable as time_s,value instead of every column
        #[arg(long)]
        variable: Option<String>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a scenario over a grid of controller gains in parallel
    Sweep {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// Proportional gains, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        kp: Vec<f64>,
        /// Integral gains, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        ki: Vec<f64>,
        /// Derivative gains, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        kd: Vec<f64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoadKind {
    Flat,
    Random,
    Segmented,
}

#[derive(clap::Args)]
struct SimulateArgs {
    /// Use the default Camry scenario and ignore the other parameters
    #[arg(long = "default")]
    use_default: bool,
    /// Proportional gain
    #[arg(long, default_value_t = 0.5)]
    kp: f64,
    /// Integral gain
    #[arg(long, default_value_t = 0.2)]
    ki: f64,
    /// Derivative gain
    #[arg(long, default_value_t = 1.0)]
    kd: f64,
    /// Enable anti-windup
    #[arg(long)]
    windup: bool,
    /// Target speed in km/h (30-130)
    #[arg(long, default_value_t = 108.0, value_parser = parse_target_speed)]
    speed: f64,
    /// Initial speed in km/h
    #[arg(long, default_value_t = 0.0)]
    initial_speed: f64,
    /// Number of one-second ticks
    #[arg(long, default_value_t = 3600)]
    ticks: usize,
    /// Road grade model
    #[arg(long, value_enum, default_value_t = RoadKind::Flat)]
    road: RoadKind,
    /// Per-tick probability of sudden unintended acceleration
    #[arg(long, default_value_t = default_sua_probability())]
    sua: f64,
    /// Seed for every random stream
    #[arg(long)]
    seed: Option<u64>,
    /// Also write the trajectory as CSV
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn default_sua_probability() -> f64 {
    cc_project::FaultDef::default().sua_probability
}

fn parse_target_speed(s: &str) -> Result<f64, String> {
    let kph: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if TARGET_SPEED_RANGE_KPH.contains(&kph) {
        Ok(kph)
    } else {
        Err(format!(
            "target speed must be between {} and {} km/h",
            TARGET_SPEED_RANGE_KPH.start(),
            TARGET_SPEED_RANGE_KPH.end()
        ))
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => cmd_simulate(&args),
        Commands::Run {
            scenario_path,
            no_cache,
        } => cmd_run(&scenario_path, !no_cache),
        Commands::Init { scenario_path } => cmd_init(&scenario_path),
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Runs { scenario_path } => cmd_runs(&scenario_path),
        Commands::ShowRun {
            scenario_path,
            run_id,
        } => cmd_show_run(&scenario_path, &run_id),
        Commands::Export {
            scenario_path,
            run_id,
            variable,
            output,
        } => cmd_export(
            &scenario_path,
            &run_id,
            variable.as_deref(),
            output.as_deref(),
        ),
        Commands::Sweep {
            scenario_path,
            kp,
            ki,
            kd,
        } => cmd_sweep(&scenario_path, &kp, &ki, &kd),
    }
}

fn scenario_from_args(args: &SimulateArgs) -> Scenario {
    if args.use_default {
        return Scenario::default();
    }

    let mut scenario = Scenario::default();
    scenario.name = "command line".to_string();
    scenario.controller.kp = args.kp;
    scenario.controller.ki = args.ki;
    scenario.controller.kd = args.kd;
    scenario.controller.windup_protection = args.windup;
    scenario.simulation.target_speed_kph = args.speed;
    scenario.simulation.initial_speed_kph = args.initial_speed;
    scenario.simulation.total_ticks = args.ticks;
    scenario.faults.sua_probability = args.sua;
    scenario.road = match args.road {
        RoadKind::Flat => RoadDef::Flat,
        RoadKind::Random => RoadDef::Random {
            config: InclinationConfig {
                horizon_ticks: args.ticks.max(1),
                ..InclinationConfig::default()
            },
        },
        RoadKind::Segmented => RoadDef::Segmented {
            config: SegmentedProfileConfig {
                size: args.ticks,
                ..SegmentedProfileConfig::default()
            },
        },
    };
    scenario.seed = args.seed;
    scenario
}

fn cmd_simulate(args: &SimulateArgs) -> AppResult<()> {
    let scenario = scenario_from_args(args);
    cc_app::validate_scenario(&scenario)?;

    println!(
        "Simulating {} ticks at {:.0} km/h (kp={}, ki={}, kd={}, windup={})",
        scenario.simulation.total_ticks,
        scenario.simulation.target_speed_kph,
        scenario.controller.kp,
        scenario.controller.ki,
        scenario.controller.kd,
        scenario.controller.windup_protection
    );

    let mut runtime = cc_app::build_runtime(&scenario, &SeedPlan::from_option(scenario.seed))?;
    let mut last_emit = Instant::now();
    let result = runtime.run_with_progress(Some(&mut |p: cc_sim::SimProgress| {
        if last_emit.elapsed().as_millis() >= 100 || p.tick == p.total_ticks {
            render_bar(p.fraction_complete, "simulate", 0.0);
            last_emit = Instant::now();
        }
    }))?;
    clear_progress_line();

    print_result(&result, scenario.simulation.target_speed_kph);

    if let Some(path) = &args.output {
        let records: Vec<cc_results::TickRecord> = result.rows().collect();
        cc_results::export_csv(path, &records)?;
        tracing::info!(path = %path.display(), rows = records.len(), "exported simulation");
        println!("✓ Wrote {} rows to {}", records.len(), path.display());
    }
    Ok(())
}

fn print_result(result: &SimulationResult, target_kph: f64) {
    if let Some(speed) = result.final_speed_kph() {
        println!("\nFinal speed: {:.2} km/h", speed);
    }
    if let Some(gear) = result.gear.last() {
        println!("Final gear:  {}", gear);
    }
    println!(
        "Within ±{} km/h of target: {:.1}%",
        cc_app::COMFORT_BAND_KPH,
        100.0 * result.fraction_within_band(target_kph, cc_app::COMFORT_BAND_KPH)
    );
    if let Some(summary) = result.describe() {
        print_summary(&summary);
    }
}

fn print_summary(summary: &Summary) {
    println!(
        "\n{:<16} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "series", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    let rows: [(&str, &SeriesStats); 6] = [
        ("error_kph", &summary.error_kph),
        ("speed_kph", &summary.speed_kph),
        ("gear", &summary.gear),
        ("throttle", &summary.throttle),
        ("speedometer_kph", &summary.speedometer_kph),
        ("inclination_deg", &summary.inclination_deg),
    ];
    for (name, s) in rows {
        println!(
            "{:<16} {:>8} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
            name, s.count, s.mean, s.std, s.min, s.p25, s.p50, s.p75, s.max
        );
    }
}

fn cmd_run(scenario_path: &Path, use_cache: bool) -> AppResult<()> {
    println!("Running scenario: {}", scenario_path.display());

    let request = RunRequest {
        scenario_path,
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    };

    let mut last_emit = Instant::now();
    let mut last_stage = RunStage::LoadingScenario;
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event| {
            let emit_now = event.stage != last_stage || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = event.stage;
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Simulation completed: {}", response.run_id);
    }

    print_timing_summary(&response.timing);

    let (manifest, records) = run_service::load_run(scenario_path, &response.run_id)?;
    let target_kph = target_of(&manifest);
    let summary = query::get_run_summary(&records, target_kph)?;
    print_run_summary(&summary);

    Ok(())
}

fn target_of(manifest: &cc_results::RunManifest) -> f64 {
    match &manifest.run_type {
        cc_results::RunType::ClosedLoop {
            target_speed_kph, ..
        } => *target_speed_kph,
    }
}

fn print_run_summary(summary: &query::RunSummary) {
    println!("  Ticks: {}", summary.record_count);
    println!("  Final speed: {:.2} km/h", summary.final_speed_kph);
    println!("  Final gear: {}", summary.final_gear);
    println!("  Gear changes: {}", summary.gear_changes);
    println!("  Mean |error|: {:.3} km/h", summary.mean_abs_error_kph);
    println!(
        "  Within ±{} km/h: {:.1}%",
        cc_app::COMFORT_BAND_KPH,
        100.0 * summary.within_band_fraction
    );
}

fn cmd_init(scenario_path: &Path) -> AppResult<()> {
    cc_app::init_scenario(scenario_path)?;
    println!("✓ Wrote default scenario to {}", scenario_path.display());
    Ok(())
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = cc_app::load_scenario(scenario_path)?;
    cc_app::validate_scenario(&scenario)?;
    println!("✓ Scenario '{}' is valid", scenario.name);
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_bar(fraction: f64, label: &str, elapsed_wall_s: f64) {
    let width = 28usize;
    let filled = ((fraction * width as f64).round() as usize).min(width);
    print!(
        "\r[{}{}] {:>6.2}%  phase={}  elapsed={:.1}s",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled)),
        fraction * 100.0,
        label,
        elapsed_wall_s
    );
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (&event.stage, &event.sim) {
        (RunStage::Simulating, Some(p)) => {
            render_bar(p.fraction_complete, event.stage.label(), event.elapsed_wall_s)
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            print!("{}", line);
            let _ = io::stdout().flush();
        }
    }
}

fn print_timing_summary(timing: &cc_app::RunTimingSummary) {
    let total = timing.total_time_s.max(1.0e-12);

    println!("\nTiming summary:");
    if timing.load_cache_time_s > 0.0 {
        println!("  Cache load: {:.3}s", timing.load_cache_time_s);
    } else {
        println!(
            "  Build:    {:.3}s ({:.1}%)",
            timing.build_time_s,
            100.0 * timing.build_time_s / total
        );
        println!(
            "  Simulate: {:.3}s ({:.1}%)",
            timing.simulate_time_s,
            100.0 * timing.simulate_time_s / total
        );
        println!(
            "  Save:     {:.3}s ({:.1}%)",
            timing.save_time_s,
            100.0 * timing.save_time_s / total
        );
    }
    println!("  Total:    {:.3}s", timing.total_time_s);
}

fn cmd_runs(scenario_path: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(scenario_path)?;

    if runs.is_empty() {
        println!("No cached runs found for: {}", scenario_path.display());
    } else {
        println!("Cached runs for '{}':", scenario_path.display());
        for manifest in runs {
            let seed = manifest
                .seed
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {} ({}, {}, seed {})",
                manifest.run_id, manifest.scenario_name, manifest.timestamp, seed
            );
        }
    }
    Ok(())
}

fn cmd_show_run(scenario_path: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let (manifest, records) = run_service::load_run(scenario_path, run_id)?;
    let summary = query::get_run_summary(&records, target_of(&manifest))?;

    println!("\nRun Summary:");
    println!("  Scenario: {}", manifest.scenario_name);
    println!("  Created: {}", manifest.timestamp);
    println!("  Engine: {}", manifest.engine_version);
    if let Some(seed) = manifest.seed {
        println!("  Seed: {}", seed);
    }
    println!(
        "  Time range: {:.1} - {:.1} s",
        summary.time_range.0, summary.time_range.1
    );
    print_run_summary(&summary);

    if let Some(stats) = &manifest.summary {
        print_summary(stats);
    }

    Ok(())
}

fn cmd_export(
    scenario_path: &Path,
    run_id: &str,
    variable: Option<&str>,
    output: Option<&Path>,
) -> AppResult<()> {
    let (_manifest, records) = run_service::load_run(scenario_path, run_id)?;

    let Some(variable) = variable else {
        match output {
            Some(path) => {
                cc_results::export_csv(path, &records)?;
                println!("✓ Exported {} rows to {}", records.len(), path.display());
            }
            None => cc_results::write_csv(io::stdout().lock(), &records)?,
        }
        return Ok(());
    };

    let series = query::extract_series(&records, variable)?;
    let mut csv = String::from("time_s,value\n");
    for (t, val) in &series {
        csv.push_str(&format!("{},{}\n", t, val));
    }

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} data points to {}",
            series.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}

fn cmd_sweep(scenario_path: &Path, kp: &[f64], ki: &[f64], kd: &[f64]) -> AppResult<()> {
    let scenario = cc_app::load_scenario(scenario_path)?;
    let gains = sweep::gain_grid(kp, ki, kd);
    println!(
        "Sweeping {} gain sets over '{}'",
        gains.len(),
        scenario.name
    );

    let outcomes = sweep::run_sweep(&scenario, &gains)?;

    println!(
        "\n{:>8} {:>8} {:>8} {:>12} {:>12} {:>10}",
        "kp", "ki", "kd", "final km/h", "mean |err|", "in band"
    );
    for o in &outcomes {
        println!(
            "{:>8.3} {:>8.3} {:>8.3} {:>12.2} {:>12.3} {:>9.1}%",
            o.gains.kp,
            o.gains.ki,
            o.gains.kd,
            o.final_speed_kph,
            o.mean_abs_error_kph,
            100.0 * o.within_band_fraction
        );
    }

    let best = sweep::best_outcome(&outcomes)
        .ok_or_else(|| AppError::InvalidInput("empty sweep".to_string()))?;
    let GainSet { kp, ki, kd } = best.gains;
    println!("\nBest: kp={} ki={} kd={}", kp, ki, kd);
    Ok(())
}
