// File: cli.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use clap::Parser;
use log::LevelFilter;
use std::time::Duration;

use crate::config::ProbeConfig;
use crate::errors::{ConfigError, ConfigResult};
use crate::fragment::{SplitStrategy, DEFAULT_SPLIT_OFFSETS};
use crate::predicate::{SuccessPredicate, DEFAULT_SUCCESS_MARKER};
use crate::request::{RequestTemplate, DEFAULT_HOST_HEADER, DEFAULT_PATH};
use crate::target::{ProbeTarget, DEFAULT_HOST, DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
pub struct Cli {
    #[arg(short = 'H', long = "host", default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(short = 'p', long = "port", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(
        long = "target",
        help = "Target as host:port, overrides --host and --port",
        conflicts_with_all = ["host", "port"]
    )]
    pub target: Option<String>,

    #[arg(
        short = 't',
        long = "timeout",
        default_value_t = 5,
        help = "Connect and read timeout in seconds"
    )]
    pub timeout: u64,

    #[arg(
        short = 'd',
        long = "delay-ms",
        default_value_t = 100,
        help = "Pause after each fragment in milliseconds"
    )]
    pub delay_ms: u64,

    #[arg(long = "read-buffer", default_value_t = 4096)]
    pub read_buffer: usize,

    #[arg(long = "path", default_value = DEFAULT_PATH)]
    pub path: String,

    #[arg(long = "host-header", default_value = DEFAULT_HOST_HEADER)]
    pub host_header: String,

    #[arg(
        long = "split-at",
        value_delimiter = ',',
        help = "Byte offsets at which the request is cut [default: 18,28,43]"
    )]
    pub split_at: Vec<usize>,

    #[arg(
        long = "pieces",
        conflicts_with = "split_at",
        help = "Cut the request into this many roughly equal fragments"
    )]
    pub pieces: Option<usize>,

    #[arg(long = "marker", help = "Literal success marker [default: \"200 OK\"]")]
    pub marker: Option<String>,

    #[arg(
        long = "marker-regex",
        conflicts_with = "marker",
        help = "Regex the response must match instead of the literal marker"
    )]
    pub marker_regex: Option<String>,

    #[arg(long = "excerpt-len", default_value_t = 20)]
    pub excerpt_len: usize,

    #[arg(long = "repeat", default_value_t = 1, help = "Run the probe this many times in sequence")]
    pub repeat: u32,

    #[arg(
        long = "baseline",
        help = "Send the request unfragmented first and compare outcomes"
    )]
    pub baseline: bool,

    #[arg(long = "json", help = "Print a JSON report instead of text lines")]
    pub json: bool,

    #[arg(short = 'o', long = "output", help = "Also write the JSON report to this file")]
    pub output: Option<String>,

    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,

    #[arg(long = "no-color", help = "Disable colored output")]
    pub no_color: bool,
}

impl Cli {
    pub fn level_filter(&self) -> ConfigResult<LevelFilter> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| ConfigError::InvalidValue(format!("unknown log level: {}", self.log_level)))
    }

    pub fn to_config(&self) -> ConfigResult<ProbeConfig> {
        let mut config = ProbeConfig::new();

        let target = match &self.target {
            Some(target) => ProbeTarget::parse(target, DEFAULT_PORT)?,
            None => ProbeTarget::new(&self.host, self.port)?,
        };
        config.set_target(target);
        config.set_request(RequestTemplate::new(&self.path, &self.host_header)?);

        let split = match self.pieces {
            Some(pieces) => SplitStrategy::Pieces(pieces),
            None if self.split_at.is_empty() => SplitStrategy::Offsets(DEFAULT_SPLIT_OFFSETS.to_vec()),
            None => SplitStrategy::Offsets(self.split_at.clone()),
        };
        config.set_split(split);

        let predicate = match (&self.marker, &self.marker_regex) {
            (_, Some(pattern)) => SuccessPredicate::pattern(pattern)?,
            (Some(marker), None) => SuccessPredicate::marker(marker)?,
            (None, None) => SuccessPredicate::marker(DEFAULT_SUCCESS_MARKER)?,
        };
        config.set_predicate(predicate);

        config.set_timeout(Duration::from_secs(self.timeout));
        config.set_delay(Duration::from_millis(self.delay_ms));
        config.set_read_capacity(self.read_buffer);
        config.set_excerpt_len(self.excerpt_len);
        config.set_repeat(self.repeat);
        config.set_baseline(self.baseline);

        config.validate()?;
        Ok(config)
    }
}
