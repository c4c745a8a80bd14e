// File: output.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::getstate::ProbeStats;
use crate::outcome::ProbeResult;
use crate::target::ProbeTarget;
use colored::*;

pub fn testing_line(target: &ProbeTarget) -> String {
    format!("Testing Port {}...", target.port())
}

/// `None` when no read completed.
pub fn response_line(result: &ProbeResult, excerpt_len: usize) -> Option<String> {
    result
        .excerpt(excerpt_len)
        .map(|excerpt| format!("Response: {}...", excerpt))
}

pub fn print_testing(target: &ProbeTarget) {
    println!("{}", testing_line(target).bold());
}

pub fn print_result(result: &ProbeResult, excerpt_len: usize) {
    if let Some(line) = response_line(result, excerpt_len) {
        println!("{}", line);
    }
    let verdict = result.verdict();
    if result.is_success() {
        println!("{}", verdict.green().bold());
    } else {
        println!("{}", verdict.red().bold());
    }
}

pub fn print_baseline(result: &ProbeResult) {
    println!(
        "{} {}",
        "Baseline (unfragmented):".blue().bold(),
        result.verdict()
    );
}

pub fn print_baseline_mismatch() {
    println!(
        "{}",
        "Unfragmented request passed but the fragmented one did not: the server does not reassemble split requests"
            .yellow()
            .bold()
    );
}

pub fn print_stats(stats: &ProbeStats) {
    println!();
    println!("{}", stats.summary());
}
