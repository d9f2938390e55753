use anyhow::Context;
use clap::Parser;
use generator::capture::{build_capture, encode_le};
use std::fs;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod report;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline FMCW range-Doppler processor")]
struct Args {
    /// Workflow YAML with the radar parameters and capture location
    #[arg(long)]
    workflow: PathBuf,
    /// Override the number of frame workers
    #[arg(long)]
    workers: Option<usize>,
    /// Override where the JSON report is written
    #[arg(long)]
    output: Option<PathBuf>,
    /// Save the synthetic capture as raw int16 before processing it
    #[arg(long)]
    write_capture: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = WorkflowConfig::load(&args.workflow)?;
    if let Some(workers) = args.workers {
        workflow_config.workers = workers;
    }
    if let Some(output) = args.output {
        workflow_config.output = output;
    }

    if let Some(path) = args.write_capture {
        let generator = workflow_config
            .synthetic
            .as_ref()
            .context("--write-capture needs a synthetic block in the workflow")?;
        let radar = workflow_config.radar_config()?;
        let stream = build_capture(&radar, generator)?;
        fs::write(&path, encode_le(&stream))
            .with_context(|| format!("writing synthetic capture {}", path.display()))?;
        println!("Synthetic capture -> {} ({} int16 values)", path.display(), stream.len());
    }

    let runner = Runner::new(workflow_config);
    let report = runner.execute()?;
    runner.write_report(&report, &runner.config().output)?;

    println!(
        "Processed {} frames -> range res {:.4} m, velocity res {:.4} m/s, floor {:.1} dB",
        report.frames_processed,
        report.params.range_resolution_m,
        report.params.velocity_resolution_mps,
        report.floor_db
    );
    for frame in &report.frames {
        if let Some(peak) = &frame.peak {
            println!(
                "  frame {}: peak {:.1} dB at {:.3} m, {:.3} m/s",
                frame.index, peak.value_db, peak.range_m, peak.velocity_mps
            );
        }
    }
    println!("Report written to {}", runner.config().output.display());

    Ok(())
}
