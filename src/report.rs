// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::config::ProbeConfig;
use crate::fragment::FragmentSequence;
use crate::outcome::{OutcomeKind, ProbeResult, ProbeStage};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{Result, Write};

#[derive(Debug, Clone, Serialize)]
pub struct RunEntry {
    pub outcome: OutcomeKind,
    pub verdict: String,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<ProbeStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RunEntry {
    pub fn from_result(result: &ProbeResult, excerpt_len: usize, elapsed_ms: u64) -> Self {
        RunEntry {
            outcome: result.kind(),
            verdict: result.verdict(),
            elapsed_ms,
            status_line: result.status_line(),
            excerpt: result.excerpt(excerpt_len),
            stage: result.stage(),
            detail: result.detail().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub fragment_count: usize,
    pub request_bytes: usize,
    pub boundaries: Vec<usize>,
    pub delay_ms: u64,
    pub timeout_ms: u64,
    pub read_capacity: usize,
    pub predicate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<RunEntry>,
    pub runs: Vec<RunEntry>,
    pub outcome: OutcomeKind,
    pub exit_code: i32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    baseline_mismatch: bool,
}

impl ProbeReport {
    pub fn new(config: &ProbeConfig, fragments: &FragmentSequence, started_at: DateTime<Utc>) -> Self {
        ProbeReport {
            target: config.target().to_string(),
            started_at,
            fragment_count: fragments.len(),
            request_bytes: fragments.total_len(),
            boundaries: fragments.boundaries(),
            delay_ms: config.delay().as_millis() as u64,
            timeout_ms: config.timeout().as_millis() as u64,
            read_capacity: config.read_capacity(),
            predicate: config.predicate().to_string(),
            baseline: None,
            runs: Vec::new(),
            outcome: OutcomeKind::Success,
            exit_code: 0,
            baseline_mismatch: false,
        }
    }

    pub fn set_baseline(&mut self, entry: RunEntry) {
        self.baseline = Some(entry);
        self.refresh_baseline_mismatch();
    }

    /// Appends a run; the report outcome is the worst run seen.
    pub fn push_run(&mut self, entry: RunEntry) {
        if self.runs.is_empty() || entry.outcome > self.outcome {
            self.outcome = entry.outcome;
        }
        self.exit_code = self.outcome.exit_code();
        self.runs.push(entry);
        self.refresh_baseline_mismatch();
    }

    /// True when the unfragmented request passed but a fragmented run did
    /// not, which points at a reassembly defect rather than a bad target.
    pub fn baseline_mismatch(&self) -> bool {
        self.baseline_mismatch
    }

    fn refresh_baseline_mismatch(&mut self) {
        self.baseline_mismatch = match &self.baseline {
            Some(baseline) => {
                baseline.outcome == OutcomeKind::Success
                    && !self.runs.is_empty()
                    && self.outcome != OutcomeKind::Success
            }
            None => false,
        };
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_json(&self, output_path: &str) -> Result<()> {
        let json = self.to_json()?;
        let mut file = File::create(output_path)?;
        writeln!(file, "{}", json)?;
        Ok(())
    }
}
