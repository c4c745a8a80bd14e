// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::errors::{ConfigError, ConfigResult};
use crate::fragment::{FragmentSequence, SplitStrategy};
use crate::predicate::SuccessPredicate;
use crate::request::RequestTemplate;
use crate::target::ProbeTarget;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_READ_CAPACITY: usize = 4096;
pub const MAX_READ_CAPACITY: usize = 1 << 20;
pub const DEFAULT_EXCERPT_LEN: usize = 20;

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    target: ProbeTarget,
    request: RequestTemplate,
    split: SplitStrategy,
    timeout: Duration,
    delay: Duration,
    read_capacity: usize,
    predicate: SuccessPredicate,
    excerpt_len: usize,
    repeat: u32,
    baseline: bool,
}

impl ProbeConfig {
    pub fn new() -> Self {
        Self {
            target: ProbeTarget::default(),
            request: RequestTemplate::default(),
            split: SplitStrategy::default(),
            timeout: DEFAULT_TIMEOUT,
            delay: DEFAULT_DELAY,
            read_capacity: DEFAULT_READ_CAPACITY,
            predicate: SuccessPredicate::default(),
            excerpt_len: DEFAULT_EXCERPT_LEN,
            repeat: 1,
            baseline: false,
        }
    }

    pub fn set_target(&mut self, target: ProbeTarget) {
        self.target = target;
    }

    pub fn target(&self) -> &ProbeTarget {
        &self.target
    }

    pub fn set_request(&mut self, request: RequestTemplate) {
        self.request = request;
    }

    pub fn request(&self) -> &RequestTemplate {
        &self.request
    }

    pub fn set_split(&mut self, split: SplitStrategy) {
        self.split = split;
    }

    pub fn split(&self) -> &SplitStrategy {
        &self.split
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_read_capacity(&mut self, read_capacity: usize) {
        self.read_capacity = read_capacity;
    }

    pub fn read_capacity(&self) -> usize {
        self.read_capacity
    }

    pub fn set_predicate(&mut self, predicate: SuccessPredicate) {
        self.predicate = predicate;
    }

    pub fn predicate(&self) -> &SuccessPredicate {
        &self.predicate
    }

    pub fn set_excerpt_len(&mut self, excerpt_len: usize) {
        self.excerpt_len = excerpt_len;
    }

    pub fn excerpt_len(&self) -> usize {
        self.excerpt_len
    }

    pub fn set_repeat(&mut self, repeat: u32) {
        self.repeat = repeat;
    }

    pub fn repeat(&self) -> u32 {
        self.repeat
    }

    pub fn set_baseline(&mut self, baseline: bool) {
        self.baseline = baseline;
    }

    pub fn baseline(&self) -> bool {
        self.baseline
    }

    /// Renders the request and cuts it with the configured strategy.
    pub fn fragments(&self) -> ConfigResult<FragmentSequence> {
        FragmentSequence::split(&self.request.render(), &self.split)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.read_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "read buffer must be at least one byte".to_string(),
            ));
        }
        if self.read_capacity > MAX_READ_CAPACITY {
            return Err(ConfigError::InvalidValue(format!(
                "read buffer must not exceed {} bytes",
                MAX_READ_CAPACITY
            )));
        }
        if self.repeat == 0 {
            return Err(ConfigError::InvalidValue(
                "repeat count must be at least 1".to_string(),
            ));
        }
        self.fragments().map(|_| ())
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self::new()
    }
}
