//! Optional TOML overrides for tuning and city economics.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use concert_core::Tuning;
use concert_system_outcome::CityEconomics;
use serde::Deserialize;

/// Host configuration; every table and key is optional.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct HostConfig {
    pub(crate) tuning: Tuning,
    pub(crate) economics: CityEconomics,
}

/// Loads the configuration at `path`, or the defaults when no file was given.
pub(crate) fn load(path: Option<&Path>) -> Result<HostConfig> {
    let Some(path) = path else {
        return Ok(HostConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    parse(&text).with_context(|| format!("failed to parse tuning file {}", path.display()))
}

fn parse(text: &str) -> Result<HostConfig> {
    Ok(toml::from_str(text)?)
}
