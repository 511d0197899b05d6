// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Duration strings in the `1h30m` / `5ms` / `1.5s` form accepted by kubectl and friends.

use crate::error::{Result, RiffError};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Parse a duration made of one or more `<number><unit>` pairs.
///
/// Units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. The bare string `0` is accepted.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let invalid = || RiffError::InvalidDuration(s.to_string());

    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err(invalid());
    }

    let mut rest = s;
    let mut nanos = 0f64;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(invalid());
        }
        let value: f64 = rest[..number_len].parse().map_err(|_| invalid())?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_len] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return Err(invalid()),
        };
        nanos += value * scale;
        rest = &rest[unit_len..];
    }

    Ok(Duration::from_nanos(nanos.round() as u64))
}

/// A parsed timeout that remembers how the user spelled it, for messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitTimeout {
    raw: String,
    duration: Duration,
}

impl WaitTimeout {
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for WaitTimeout {
    type Err = RiffError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(WaitTimeout {
            raw: s.to_string(),
            duration: parse_duration(s)?,
        })
    }
}

impl fmt::Display for WaitTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
