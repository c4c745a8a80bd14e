// File: runner.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};
use std::time::Instant;

use crate::config::ProbeConfig;
use crate::getstate::ProbeStats;
use crate::output;
use crate::probe::FragmentationProbe;
use crate::report::{ProbeReport, RunEntry};
use crate::transport::Connector;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub json: bool,
    pub output: Option<String>,
}

/// Runs the configured probe (baseline first when enabled), prints the
/// results and returns the report. The process exit code is
/// `report.exit_code`.
pub async fn execute<C: Connector>(
    probe: &FragmentationProbe<C>,
    options: &RunOptions,
) -> Result<ProbeReport> {
    let config: &ProbeConfig = probe.config();
    let fragments = config
        .fragments()
        .context("Failed to build the fragment sequence")?;
    let text = !options.json;

    let mut report = ProbeReport::new(config, &fragments, Utc::now());
    let mut stats = ProbeStats::new();
    stats.set_start_time(Utc::now());

    if text {
        output::print_testing(config.target());
    }

    if config.baseline() {
        let started = Instant::now();
        let baseline = probe.run_baseline(&fragments).await;
        let entry = RunEntry::from_result(
            &baseline,
            config.excerpt_len(),
            started.elapsed().as_millis() as u64,
        );
        if text {
            output::print_baseline(&baseline);
        }
        report.set_baseline(entry);
    }

    for run in 1..=config.repeat() {
        if config.repeat() > 1 {
            info!("Run {}/{}", run, config.repeat());
        }
        let started = Instant::now();
        let result = probe.run(&fragments).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        stats.record(result.kind());
        if text {
            output::print_result(&result, config.excerpt_len());
        }
        report.push_run(RunEntry::from_result(
            &result,
            config.excerpt_len(),
            elapsed_ms,
        ));
    }

    stats.set_end_time(Utc::now());

    if report.baseline_mismatch() {
        warn!(
            "{} answers unfragmented requests but not fragmented ones",
            config.target()
        );
        if text {
            output::print_baseline_mismatch();
        }
    }

    if text && config.repeat() > 1 {
        output::print_stats(&stats);
    }

    if options.json {
        println!("{}", report.to_json().context("Failed to serialize report")?);
    }

    if let Some(path) = &options.output {
        report
            .write_json(path)
            .with_context(|| format!("Failed to write report to {}", path))?;
        info!("Report written to {}", path);
    }

    Ok(report)
}
