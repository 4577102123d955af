//! # Substrata CLI Application
//!
//! Runs a foundation analysis from a JSON input file and prints a summary.
//!
//! ## Commands
//!
//! - `analyze <INPUT>`: analyze a site file, optionally writing a JSON report
//! - `demo`: run the built-in raft on sand over clay
//!
//! Logging goes to stderr; raise it with `-v`, `-vv` or `RUST_LOG`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use geo_core::calculations::{CheckStatus, SettlementStatus, SlopeStatus};
use geo_core::engine::{analyze, AnalysisInput, AnalysisReport, CalculationOutput};
use geo_core::file_io::{load_input, load_settings, save_report};
use geo_core::foundation::{FoundationShape, FoundationSpec};
use geo_core::narration::{narrate_with_fallback, NarrationRequest, TemplateNarrator};
use geo_core::settings::EngineSettings;
use geo_core::soil::{MeasuredProperties, SoilClass, SoilLayer};
use geo_core::CalcError;

/// Substrata - geotechnical foundation analysis
#[derive(Parser)]
#[command(name = "geo_cli")]
#[command(version)]
#[command(about = "Bearing capacity, settlement and footing design from SPT soil profiles")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a JSON input file (layers + foundation)
    Analyze {
        /// Path to the analysis input JSON
        input: PathBuf,

        /// Engine settings JSON (missing fields use defaults)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Write the full report as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the full report JSON instead of the summary
        #[arg(long)]
        json: bool,

        /// Narration timeout in milliseconds
        #[arg(long, default_value_t = 2000)]
        narration_timeout_ms: u64,
    },
    /// Run the built-in demonstration scenario
    Demo {
        /// Print the full report JSON instead of the summary
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Analyze {
            input,
            settings,
            output,
            json,
            narration_timeout_ms,
        } => run_analyze(input, settings, output, json, Duration::from_millis(narration_timeout_ms)).await,
        Commands::Demo { json } => {
            run_report(demo_input(), EngineSettings::default(), None, json, Duration::from_secs(2)).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            if e.is_input_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run_analyze(
    input: PathBuf,
    settings: Option<PathBuf>,
    output: Option<PathBuf>,
    json: bool,
    timeout: Duration,
) -> Result<(), CalcError> {
    let analysis = load_input(&input)?;
    let settings = match settings {
        Some(path) => load_settings(&path)?,
        None => EngineSettings::default(),
    };
    run_report(analysis, settings, output, json, timeout).await
}

async fn run_report(
    input: AnalysisInput,
    settings: EngineSettings,
    output_path: Option<PathBuf>,
    json: bool,
    timeout: Duration,
) -> Result<(), CalcError> {
    let output = analyze(&input, &settings)?;

    let request = NarrationRequest::new(&input, output.clone());
    let narrative = narrate_with_fallback(&TemplateNarrator, &request, timeout).await;
    let report = AnalysisReport::new(output, input.locale.clone()).with_narrative(narrative);

    if json {
        let text = serde_json::to_string_pretty(&report)?;
        println!("{}", text);
    } else {
        print_summary(&input, &report);
    }

    if let Some(path) = output_path {
        save_report(&report, &path)?;
        info!(path = %path.display(), "report written");
        println!();
        println!("Report written to {}", path.display());
    }
    Ok(())
}

fn status_icon(ok: bool) -> &'static str {
    if ok {
        "✓"
    } else {
        "✗"
    }
}

fn print_summary(input: &AnalysisInput, report: &AnalysisReport) {
    let out: &CalculationOutput = &report.output;
    let f = &input.foundation;
    let b = &out.bearing_capacity;
    let s = &out.settlement;
    let d = &out.foundation_design;

    println!("═══════════════════════════════════════");
    println!("  FOUNDATION ANALYSIS RESULTS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Input:");
    println!("  Shape:    {} ({:.2} m wide)", f.shape.name(), f.shape.width());
    println!("  Depth:    {:.2} m", f.depth);
    println!("  Load:     {:.0} kN", f.load);
    println!("  Layers:   {}", input.layers.len());
    for layer in &out.layer_parameters {
        println!(
            "    {:>5.2}-{:<5.2} m  {:<6} N={:<4.0} γ={:.1} φ={:.1}° c={:.1} kPa E={:.1} MPa",
            layer.depth_from,
            layer.depth_to,
            layer.soil_class.display_name(),
            layer.spt_n,
            layer.unit_weight,
            layer.friction_angle,
            layer.cohesion,
            layer.elastic_modulus
        );
    }
    println!();
    println!("Bearing Capacity:");
    println!(
        "  Nc={:.2} Nq={:.2} Nγ={:.2}",
        b.factors.nc, b.factors.nq, b.factors.ngamma
    );
    println!("  q_ult = {:.2} kPa, q_all = {:.2} kPa", b.ultimate_capacity_kpa, b.allowable_capacity_kpa);
    println!(
        "  FOS:        {:.2} (target {:.2}) {}",
        b.factor_of_safety,
        b.target_fos,
        status_icon(b.passes())
    );
    println!();
    println!("Settlement:");
    println!("  Elastic:    {:.2} mm", s.elastic_mm);
    println!("  Primary:    {:.2} mm", s.primary_consolidation_mm);
    println!("  Secondary:  {:.2} mm", s.secondary_consolidation_mm);
    println!(
        "  Total:      {:.2} mm {} {}",
        s.total_mm,
        s.status,
        status_icon(s.status != SettlementStatus::Failure)
    );
    println!("  t90:        {}", s.consolidation_time);
    println!();
    println!("Structural Design:");
    println!(
        "  Thickness:  {:.2} m (d = {:.2} m{})",
        d.thickness_m,
        d.effective_depth_m,
        if d.converged { "" } else { ", search capped" }
    );
    println!(
        "  Punching:   {:.0}/{:.0} kN {} {}",
        d.punching_shear_demand_kn,
        d.punching_shear_capacity_kn,
        d.punching_shear_check,
        status_icon(d.punching_shear_check == CheckStatus::Safe)
    );
    println!("  Steel:      {:.0} mm²/m → {}", d.design_steel_mm2, d.bar_suggestion);
    if let Some(slope) = &out.slope_stability {
        println!();
        println!("Slope Stability:");
        println!(
            "  FOS:        {:.2} {:?} {}",
            slope.factor_of_safety,
            slope.status,
            status_icon(slope.status == SlopeStatus::Stable)
        );
    }
    println!();
    println!(
        "Stress Field: {} (max displacement {:.2} mm)",
        out.stress_field.plasticity_description, out.stress_field.max_displacement_mm
    );

    if let Some(narrative) = &report.narrative {
        println!();
        println!("═══════════════════════════════════════");
        println!("  RISK: {:?}", narrative.risk_level);
        println!("═══════════════════════════════════════");
        println!("{}", narrative.report);
        println!();
        for (i, suggestion) in narrative.suggestions.iter().enumerate() {
            println!("  {}. {}", i + 1, suggestion);
        }
    }
}

/// 10 m square raft on sand over soft clay with lab consolidation data.
fn demo_input() -> AnalysisInput {
    let layers = vec![
        SoilLayer::new(0.0, 15.0, SoilClass::Sand, 20.0),
        SoilLayer::new(15.0, 22.0, SoilClass::Clay, 8.0).with_measured(MeasuredProperties {
            compression_index: Some(0.18),
            consolidation_coefficient: Some(0.4),
            ..Default::default()
        }),
    ];
    let mut raft = FoundationSpec::new(
        FoundationShape::Raft {
            width: 10.0,
            length: 10.0,
        },
        2.0,
        16_000.0,
    );
    raft.groundwater_depth = Some(2.0);
    AnalysisInput::new(layers, raft)
}
