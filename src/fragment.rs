// File: fragment.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::errors::{ConfigError, ConfigResult};
use crate::request::validate_request;

/// Offsets that cut the default request mid-keyword (`HT|TP`), mid-header
/// name (`Ho|st`) and right after the Host header.
pub const DEFAULT_SPLIT_OFFSETS: [usize; 3] = [18, 28, 43];

pub const DEFAULT_FRAGMENTS: [&[u8]; 4] = [
    b"GET /index.html HT",
    b"TP/1.1\r\nHo",
    b"st: 127.0.0.1\r\n",
    b"Connection: keep-alive\r\n\r\n",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitStrategy {
    /// Cut before each of these byte offsets. Must be strictly increasing
    /// and inside the request.
    Offsets(Vec<usize>),
    /// Cut into this many pieces of roughly equal size.
    Pieces(usize),
}

impl Default for SplitStrategy {
    fn default() -> Self {
        SplitStrategy::Offsets(DEFAULT_SPLIT_OFFSETS.to_vec())
    }
}

/// Ordered, non-empty fragments whose concatenation is one complete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentSequence {
    fragments: Vec<Vec<u8>>,
}

impl FragmentSequence {
    pub fn new(fragments: Vec<Vec<u8>>) -> ConfigResult<Self> {
        if fragments.is_empty() {
            return Err(ConfigError::InvalidSplit(
                "at least one fragment is required".to_string(),
            ));
        }
        if let Some(index) = fragments.iter().position(|f| f.is_empty()) {
            return Err(ConfigError::InvalidSplit(format!(
                "fragment {} is empty",
                index
            )));
        }

        let sequence = Self { fragments };
        validate_request(&sequence.concat())?;
        Ok(sequence)
    }

    pub fn split(request: &[u8], strategy: &SplitStrategy) -> ConfigResult<Self> {
        let offsets = match strategy {
            SplitStrategy::Offsets(offsets) => offsets.clone(),
            SplitStrategy::Pieces(pieces) => even_offsets(request.len(), *pieces)?,
        };

        let mut previous = 0;
        for &offset in &offsets {
            if offset <= previous || offset >= request.len() {
                return Err(ConfigError::InvalidSplit(format!(
                    "offset {} must be greater than {} and less than the request length {}",
                    offset,
                    previous,
                    request.len()
                )));
            }
            previous = offset;
        }

        let mut fragments = Vec::with_capacity(offsets.len() + 1);
        let mut start = 0;
        for offset in offsets.into_iter().chain(std::iter::once(request.len())) {
            fragments.push(request[start..offset].to_vec());
            start = offset;
        }

        Self::new(fragments)
    }

    /// The request as a single fragment, used for the unfragmented baseline.
    pub fn whole(request: &[u8]) -> ConfigResult<Self> {
        Self::new(vec![request.to_vec()])
    }

    pub fn as_whole(&self) -> Self {
        Self {
            fragments: vec![self.concat()],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.fragments.iter().map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn total_len(&self) -> usize {
        self.fragments.iter().map(Vec::len).sum()
    }

    pub fn concat(&self) -> Vec<u8> {
        self.fragments.concat()
    }

    /// Byte offsets at which the request is cut.
    pub fn boundaries(&self) -> Vec<usize> {
        self.fragments
            .iter()
            .take(self.fragments.len().saturating_sub(1))
            .scan(0, |acc, f| {
                *acc += f.len();
                Some(*acc)
            })
            .collect()
    }
}

impl Default for FragmentSequence {
    fn default() -> Self {
        Self {
            fragments: DEFAULT_FRAGMENTS.iter().map(|f| f.to_vec()).collect(),
        }
    }
}

fn even_offsets(len: usize, pieces: usize) -> ConfigResult<Vec<usize>> {
    if pieces == 0 || pieces > len {
        return Err(ConfigError::InvalidSplit(format!(
            "cannot cut {} bytes into {} pieces",
            len, pieces
        )));
    }
    Ok((1..pieces).map(|i| i * len / pieces).collect())
}
