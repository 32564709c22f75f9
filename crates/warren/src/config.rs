// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller configuration, loaded from a YAML file.
//!
//! Section and key names are uppercase on disk:
//!
//! ```yaml
//! DEBUG:
//!   ENABLED: false
//! SOCKET:
//!   HOST: "0.0.0.0"
//!   PORT: 8765
//! INFO:
//!   NAME: "warren"
//!   AUTHOR: ""
//! STRATEGY:
//!   KIND: quarry
//! STATUS:
//!   INTERVAL_MS: 200
//! ```
//!
//! A missing file falls back to defaults with a warning; a malformed file is
//! a startup error. Every key is optional.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::strategy::{QuarryParams, Strategy, StripmineParams};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE", default)]
pub struct Config {
    pub debug: DebugSection,
    pub socket: SocketSection,
    pub info: InfoSection,
    pub strategy: StrategySection,
    pub status: StatusSection,
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// The listen endpoint as a `host:port` string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.socket.host, self.socket.port)
    }

    pub fn status_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.status.interval_ms)
    }
}

/// `DEBUG` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE", default)]
pub struct DebugSection {
    pub enabled: bool,
}

/// `SOCKET` section: the WebSocket listen endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "UPPERCASE", default)]
pub struct SocketSection {
    pub host: String,
    pub port: u16,
}

impl Default for SocketSection {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_owned(), port: 8765 }
    }
}

/// `INFO` section, informational only.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "UPPERCASE", default)]
pub struct InfoSection {
    pub name: String,
    pub author: String,
}

impl Default for InfoSection {
    fn default() -> Self {
        Self { name: "warren".to_owned(), author: String::new() }
    }
}

/// `STATUS` section: snapshot reporter cadence.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "UPPERCASE", default)]
pub struct StatusSection {
    pub interval_ms: u64,
}

impl Default for StatusSection {
    fn default() -> Self {
        Self { interval_ms: 200 }
    }
}

/// Which mining strategy drives registered agents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Quarry,
    Stripmine,
}

/// `STRATEGY` section: strategy selection plus optional parameter overrides.
///
/// Overrides apply to whichever strategy kind they belong to; unset keys keep
/// the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE", default)]
pub struct StrategySection {
    pub kind: StrategyKind,
    pub xz_size: Option<i64>,
    pub y_size: Option<i64>,
    pub prerun_fuel_check: Option<bool>,
    pub branch_spacing: Option<i64>,
    pub branch_length: Option<i64>,
    pub branch_pair_count: Option<i64>,
    pub place_torches: Option<bool>,
    pub torch_light: Option<i64>,
}

impl StrategySection {
    /// Build the configured strategy value handed to every agent driver.
    pub fn build(&self) -> Strategy {
        match self.kind {
            StrategyKind::Quarry => {
                let mut params = QuarryParams::default();
                if let Some(xz_size) = self.xz_size {
                    params.xz_size = xz_size;
                }
                if let Some(y_size) = self.y_size {
                    params.y_size = y_size;
                }
                if let Some(check) = self.prerun_fuel_check {
                    params.prerun_fuel_check = check;
                }
                Strategy::Quarry(params)
            }
            StrategyKind::Stripmine => {
                let mut params = StripmineParams::default();
                if let Some(spacing) = self.branch_spacing {
                    params.branch_spacing = spacing;
                }
                if let Some(length) = self.branch_length {
                    params.branch_length = length;
                }
                if let Some(pairs) = self.branch_pair_count {
                    params.branch_pair_count = pairs;
                }
                if let Some(check) = self.prerun_fuel_check {
                    params.prerun_fuel_check = check;
                }
                if let Some(torches) = self.place_torches {
                    params.do_place_torches = torches;
                }
                if let Some(light) = self.torch_light {
                    params.torch_light = light;
                }
                Strategy::Stripmine(params)
            }
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
