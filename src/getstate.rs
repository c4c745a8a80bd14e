/*
Copyright 2022 Volker Schwaberow <volker@schwaberow.de>
Permission is hereby granted, free of charge, to any person obtaining a
copy of this software and associated documentation files (the
"Software"), to deal in the Software without restriction, including without
limitation the rights to use, copy, modify, merge, publish, distribute,
sublicense, and/or sell copies of the Software, and to permit persons to whom the
Software is furnished to do so, subject to the following conditions:
The above copyright notice and this permission notice shall be
included in all copies or substantial portions of the Software.
THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS
OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT
SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR
OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE,
ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
DEALINGS IN THE SOFTWARE.
Author(s): Volker Schwaberow
*/

use crate::outcome::OutcomeKind;
use chrono::{DateTime, Utc};

/// Tallies of repeated probe runs against one target.
#[derive(Debug, Clone, Copy)]
pub struct ProbeStats {
    total_runs: u32,
    passed: u32,
    invalid_responses: u32,
    connection_errors: u32,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
}

impl ProbeStats {
    pub fn new() -> ProbeStats {
        ProbeStats {
            total_runs: 0,
            passed: 0,
            invalid_responses: 0,
            connection_errors: 0,
            start_time: None,
            end_time: None,
        }
    }

    pub fn record(&mut self, kind: OutcomeKind) {
        self.total_runs += 1;
        match kind {
            OutcomeKind::Success => self.passed += 1,
            OutcomeKind::InvalidResponse => self.invalid_responses += 1,
            OutcomeKind::ConnectionError => self.connection_errors += 1,
        }
    }

    pub fn set_start_time(&mut self, start_time: DateTime<Utc>) {
        self.start_time = Some(start_time);
    }

    pub fn set_end_time(&mut self, end_time: DateTime<Utc>) {
        self.end_time = Some(end_time);
    }

    pub fn elapsed_ms(&self) -> i64 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => (end - start).num_milliseconds(),
            _ => 0,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} runs. {} ms. Passed: {}. Invalid responses: {}. Connection errors: {}.",
            self.total_runs,
            self.elapsed_ms(),
            self.passed,
            self.invalid_responses,
            self.connection_errors
        )
    }
}
