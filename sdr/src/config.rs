/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Tunables for the merge kernels.
//!
//! The algebra is correct under every setting; these only trade
//! constant factors. Values come from, in increasing priority:
//! defaults, a YAML file ([`global::init_from_yaml`]), environment
//! variables ([`global::init_from_env`]), and test overrides
//! ([`global::lock`]).
//!
//! | Variable              | Values              | Default  |
//! |-----------------------|---------------------|----------|
//! | `SDR_TRAVERSAL`       | `search`, `linear`  | `search` |
//! | `SDR_RESERVE_OUTPUTS` | `true`, `false`     | `true`   |

use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

pub mod global;

/// Environment variable selecting the [`Traversal`].
pub const TRAVERSAL_ENV: &str = "SDR_TRAVERSAL";

/// Environment variable toggling [`SdrConfig::reserve_outputs`].
pub const RESERVE_OUTPUTS_ENV: &str = "SDR_RESERVE_OUTPUTS";

/// Errors parsing configuration values.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Unrecognized traversal name.
    #[error("unknown traversal {0:?}, expected \"search\" or \"linear\"")]
    UnknownTraversal(String),

    /// A boolean variable holds something other than `true`/`false`.
    #[error("{var}: expected a boolean, got {value:?}")]
    InvalidBool {
        /// Variable name.
        var: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// How a merge advances the lagging side to the other side's id.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize
)]
#[serde(rename_all = "snake_case")]
pub enum Traversal {
    /// Use the container's native ordered search (galloping binary
    /// search for contiguous containers, a range query for trees).
    /// Favours operands of very different sizes.
    #[default]
    Search,
    /// Step one element at a time. Favours operands of similar size.
    Linear,
}

impl FromStr for Traversal {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "search" => Ok(Traversal::Search),
            "linear" => Ok(Traversal::Linear),
            _ => Err(ConfigError::UnknownTraversal(s.to_string())),
        }
    }
}

/// Merge-kernel configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdrConfig {
    /// Traversal used when one side of a merge lags the other.
    pub traversal: Traversal,
    /// Reserve output capacity from operand sizes before a
    /// value-returning merge.
    pub reserve_outputs: bool,
}

impl Default for SdrConfig {
    fn default() -> Self {
        Self {
            traversal: Traversal::Search,
            reserve_outputs: true,
        }
    }
}

impl SdrConfig {
    /// Defaults overlaid with the process environment. Unparsable
    /// values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Defaults overlaid with values produced by `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(value) = lookup(TRAVERSAL_ENV) {
            match value.parse() {
                Ok(traversal) => config.traversal = traversal,
                Err(err) => tracing::warn!(%err, "ignoring {}", TRAVERSAL_ENV),
            }
        }
        if let Some(value) = lookup(RESERVE_OUTPUTS_ENV) {
            match parse_bool(RESERVE_OUTPUTS_ENV, &value) {
                Ok(reserve) => config.reserve_outputs = reserve,
                Err(err) => tracing::warn!(%err, "ignoring {}", RESERVE_OUTPUTS_ENV),
            }
        }
        config
    }

    /// Load a configuration from a YAML file. Missing fields take
    /// their defaults.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Save this configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), anyhow::Error> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn traversal_parses() {
        assert_eq!("search".parse::<Traversal>().unwrap(), Traversal::Search);
        assert_eq!(" Linear ".parse::<Traversal>().unwrap(), Traversal::Linear);
        assert!("gallop".parse::<Traversal>().is_err());
    }

    #[test]
    fn lookup_overlays_defaults() {
        let config = SdrConfig::from_lookup(lookup_in(&[
            (TRAVERSAL_ENV, "linear"),
            (RESERVE_OUTPUTS_ENV, "0"),
        ]));
        assert_eq!(
            config,
            SdrConfig {
                traversal: Traversal::Linear,
                reserve_outputs: false,
            }
        );
    }

    #[test]
    fn bad_values_are_ignored() {
        let config = SdrConfig::from_lookup(lookup_in(&[
            (TRAVERSAL_ENV, "sideways"),
            (RESERVE_OUTPUTS_ENV, "maybe"),
        ]));
        assert_eq!(config, SdrConfig::default());
    }

    #[test]
    fn yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sdr.yaml");
        let config = SdrConfig {
            traversal: Traversal::Linear,
            reserve_outputs: false,
        };
        config.to_yaml(&path).unwrap();
        assert_eq!(SdrConfig::from_yaml(&path).unwrap(), config);
    }

    #[test]
    fn yaml_fields_default() {
        let config: SdrConfig = serde_yaml::from_str("traversal: linear\n").unwrap();
        assert_eq!(config.traversal, Traversal::Linear);
        assert!(config.reserve_outputs);
    }

    #[test]
    fn yaml_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SdrConfig::from_yaml(dir.path().join("absent.yaml")).is_err());
    }
}
