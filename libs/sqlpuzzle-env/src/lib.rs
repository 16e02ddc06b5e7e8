// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Settings lookup for the SQL renderer.
//!
//! Rendering options (identifier quoting, boolean literals) come from `SQLPUZZLE_*` variables.
//! They are read through [`Environment`] so that tests pass a [`MapEnvironment`] instead of
//! touching the process environment.

use std::{collections::HashMap, fmt::Display, str::FromStr};

pub trait Environment: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Read `key` as an on/off switch, `default_value` if unset.
    fn enabled(&self, key: &str, default_value: bool) -> Result<bool, EnvError> {
        let Some(value) = self.get(key) else {
            return Ok(default_value);
        };
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(EnvError::InvalidSwitch {
                key: key.to_string(),
                value,
            }),
        }
    }

    fn get_or_else(&self, key: &str, default_value: &str) -> String {
        self.get(key).unwrap_or_else(|| default_value.to_string())
    }
}

/// Parse the setting `key` with its `FromStr` implementation. `None` if the setting is absent.
pub fn parse_setting<T>(env: &dyn Environment, key: &'static str) -> Result<Option<T>, EnvError>
where
    T: FromStr,
    T::Err: Display,
{
    env.get(key)
        .map(|value| {
            value.parse().map_err(|err: T::Err| EnvError::InvalidSetting {
                key,
                reason: err.to_string(),
                value,
            })
        })
        .transpose()
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EnvError {
    #[error("{key}={value:?} is not a switch; use true/false, 1/0, yes/no or on/off")]
    InvalidSwitch { key: String, value: String },

    #[error("{key}={value:?} is not a valid setting: {reason}")]
    InvalidSetting {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// The process environment
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    values: HashMap<String, String>,
}

impl Environment for MapEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for MapEnvironment {
    fn from(values: [(&str, &str); N]) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}
