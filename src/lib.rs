// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod commands;
pub mod config;
pub mod console;
pub mod constants;
pub mod duration;
pub mod error;
pub mod kubernetes;
pub mod race;
pub mod types;

#[cfg(test)]
pub mod test_utils;

pub use error::{Result, RiffError};
