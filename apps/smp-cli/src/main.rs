mod logging;

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use smp_app::{
    AppResult, RunOptions, RunProgressEvent, RunRequest, RunStage, RunTimingSummary, run_service,
    validate_inputs,
};

#[derive(Parser)]
#[command(name = "smp-cli")]
#[command(about = "Semi-Markov transition probability engine", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate P_ij(t) over the configured time grid and write the CSV
    Run {
        /// Path to the run configuration (YAML or JSON)
        config: PathBuf,
        /// Output CSV path, overriding the configuration
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Worker thread count, overriding the configuration
        #[arg(short, long)]
        threads: Option<usize>,
    },
    /// Load the configuration and both tables without evaluating anything
    Validate {
        /// Path to the run configuration (YAML or JSON)
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            config,
            output,
            threads,
        } => cmd_run(&config, output, threads),
        Commands::Validate { config } => cmd_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            clear_progress_line();
            tracing::error!(error = %err, "command failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_validate(config: &Path) -> AppResult<()> {
    println!("Validating configuration: {}", config.display());
    let summary = validate_inputs(config)?;
    println!("✓ Configuration is valid");
    println!("  States:      {}", summary.states);
    println!(
        "  Edges:       {} ({} distinct)",
        summary.edges, summary.transitions
    );
    println!("  Time points: {}", summary.time_points);
    println!("  Tolerance:   {:e}", summary.tol);
    println!("  Output:      {}", summary.output_path.display());
    if let Some(path) = &summary.manifest_path {
        println!("  Manifest:    {}", path.display());
    }
    Ok(())
}

fn cmd_run(config: &Path, output: Option<PathBuf>, threads: Option<usize>) -> AppResult<()> {
    println!("Running: {}", config.display());

    let request = RunRequest {
        config_path: config,
        options: RunOptions { output, threads },
    };

    let mut last_emit = Instant::now();
    let mut last_stage: Option<RunStage> = None;
    let summary = run_service::run_with_progress(
        &request,
        Some(&mut |event| {
            let emit_now =
                last_stage != Some(event.stage) || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = Some(event.stage);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    println!("✓ Run completed: {}", summary.run_id);
    println!("  Output:      {}", summary.output_path.display());
    if let Some(path) = &summary.manifest_path {
        println!("  Manifest:    {}", path.display());
    }
    println!("  Threads:     {}", summary.threads);
    println!("  Time points: {}", summary.time_points);
    println!(
        "  Rows:        {} written, {} non-positive dropped",
        summary.rows_written, summary.dropped_non_positive
    );
    if summary.unconverged_evaluations > 0 {
        println!(
            "  Unconverged: {} of {} evaluations",
            summary.unconverged_evaluations, summary.pair_evaluations
        );
    }
    print_timing_summary(&summary.timing);
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match &event.grid {
        Some(grid) => {
            let width = 28usize;
            let filled = ((grid.fraction_complete * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  t={:.4}/{:.4}  rows={}  elapsed={:.1}s",
                bar,
                grid.fraction_complete * 100.0,
                grid.time,
                grid.t_max,
                grid.rows_written,
                event.elapsed_wall_s
            );
        }
        None => {
            print!(
                "\r{:<120}",
                format!(
                    "{}{}  elapsed={:.1}s",
                    event.stage.label(),
                    event
                        .message
                        .as_deref()
                        .map(|m| format!(" ({m})"))
                        .unwrap_or_default(),
                    event.elapsed_wall_s
                )
            );
        }
    }
    let _ = io::stdout().flush();
}

fn print_timing_summary(timing: &RunTimingSummary) {
    let total = timing.total_time_s.max(1.0e-12);
    let pct = |s: f64| 100.0 * s / total;

    println!("\nTiming summary:");
    println!(
        "  Load:     {:.3}s ({:.1}%)",
        timing.load_time_s,
        pct(timing.load_time_s)
    );
    println!(
        "  Build:    {:.3}s ({:.1}%)",
        timing.build_time_s,
        pct(timing.build_time_s)
    );
    println!(
        "  Evaluate: {:.3}s ({:.1}%)",
        timing.evaluate_time_s,
        pct(timing.evaluate_time_s)
    );
    if timing.manifest_time_s > 0.0 {
        println!("  Manifest: {:.3}s", timing.manifest_time_s);
    }
    println!("  Total:    {:.3}s", timing.total_time_s);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_overrides() {
        let cli = Cli::try_parse_from([
            "smp-cli", "-vv", "run", "run.yaml", "--output", "p.csv", "--threads", "4",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Run {
                config,
                output,
                threads,
            } => {
                assert_eq!(config, PathBuf::from("run.yaml"));
                assert_eq!(output, Some(PathBuf::from("p.csv")));
                assert_eq!(threads, Some(4));
            }
            Commands::Validate { .. } => panic!("expected run"),
        }
    }

    #[test]
    fn missing_config_is_a_usage_error() {
        assert!(Cli::try_parse_from(["smp-cli", "run"]).is_err());
        assert!(Cli::try_parse_from(["smp-cli", "run", "a.yaml", "--threads", "x"]).is_err());
    }
}
