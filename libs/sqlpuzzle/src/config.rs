// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::str::FromStr;

use sqlpuzzle_env::{EnvError, Environment, SystemEnvironment, parse_setting};

pub const QUOTE_STYLE_KEY: &str = "SQLPUZZLE_QUOTE_STYLE";
pub const BOOLEAN_KEYWORDS_KEY: &str = "SQLPUZZLE_BOOLEAN_KEYWORDS";

/// How identifiers (table names, column names, aliases) are quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// `` `users`.`id` `` (MySQL)
    #[default]
    Backtick,
    /// `"users"."id"` (ANSI, Postgres, SQLite)
    DoubleQuote,
}

impl QuoteStyle {
    pub fn quote_char(self) -> char {
        match self {
            QuoteStyle::Backtick => '`',
            QuoteStyle::DoubleQuote => '"',
        }
    }
}

impl FromStr for QuoteStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "backtick" | "mysql" => Ok(QuoteStyle::Backtick),
            "double" | "ansi" => Ok(QuoteStyle::DoubleQuote),
            other => Err(format!(
                "unknown quote style '{other}', expected one of: backtick, mysql, double, ansi"
            )),
        }
    }
}

/// Settings of the escaping layer used while rendering a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderConfig {
    pub quote_style: QuoteStyle,
    /// Render booleans as `TRUE`/`FALSE` instead of `1`/`0`
    pub boolean_keywords: bool,
}

impl RenderConfig {
    pub fn from_env(env: &dyn Environment) -> Result<Self, EnvError> {
        let quote_style: QuoteStyle = parse_setting(env, QUOTE_STYLE_KEY)?.unwrap_or_default();
        let boolean_keywords = env.enabled(BOOLEAN_KEYWORDS_KEY, false)?;

        Ok(Self {
            quote_style,
            boolean_keywords,
        })
    }

    /// Read the settings from the process environment.
    pub fn from_system_env() -> Result<Self, EnvError> {
        Self::from_env(&SystemEnvironment)
    }
}
