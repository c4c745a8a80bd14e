// File: lib.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::new_without_default)]
#![allow(clippy::bool_assert_comparison)]

pub mod cli;
pub mod config;
pub mod errors;
pub mod fragment;
pub mod getstate;
pub mod outcome;
pub mod output;
pub mod predicate;
pub mod probe;
pub mod report;
pub mod request;
pub mod runner;
pub mod target;
pub mod transport;
