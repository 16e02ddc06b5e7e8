// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{QueryError, RenderConfig, config::QuoteStyle};

use super::ExpressionBuilder;

/// Accumulates the SQL text of a statement. All identifier and literal tokens go through this
/// builder, so fragments never emit unescaped names or values themselves.
pub struct SQLBuilder {
    /// The SQL being built
    sql: String,
    config: RenderConfig,
}

impl SQLBuilder {
    pub fn new() -> Self {
        Self::with_config(RenderConfig::default())
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self {
            sql: String::new(),
            config,
        }
    }

    /// Push a string
    pub fn push_str<T: AsRef<str>>(&mut self, s: T) {
        self.sql.push_str(s.as_ref());
    }

    /// Push a character
    pub fn push(&mut self, c: char) {
        self.sql.push(c);
    }

    /// Push a space. This is a common operation, so it is provided as a separate method.
    pub fn push_space(&mut self) {
        self.sql.push(' ');
    }

    /// Push a (possibly qualified) identifier such as `users` or `users.id`. Each dot-separated
    /// segment is quoted separately and a `*` segment is left bare, so `users.*` becomes
    /// `` `users`.* ``.
    pub fn push_identifier<T: AsRef<str>>(&mut self, s: T) {
        let quote = self.config.quote_style.quote_char();
        for (i, segment) in s.as_ref().split('.').enumerate() {
            if i > 0 {
                self.sql.push('.');
            }
            if segment == "*" {
                self.sql.push('*');
            } else {
                self.sql.push(quote);
                for c in segment.chars() {
                    if c == quote {
                        self.sql.push(quote);
                    }
                    self.sql.push(c);
                }
                self.sql.push(quote);
            }
        }
    }

    /// Push a string literal. Single quotes are doubled; backslashes are escaped only for the
    /// MySQL flavor (where they start an escape sequence).
    pub fn push_string_literal<T: AsRef<str>>(&mut self, s: T) {
        let escape_backslash = self.config.quote_style == QuoteStyle::Backtick;
        self.sql.push('\'');
        for c in s.as_ref().chars() {
            match c {
                '\'' => self.sql.push_str("''"),
                '\\' if escape_backslash => self.sql.push_str("\\\\"),
                c => self.sql.push(c),
            }
        }
        self.sql.push('\'');
    }

    pub fn push_bool(&mut self, value: bool) {
        let token = match (self.config.boolean_keywords, value) {
            (true, true) => "TRUE",
            (true, false) => "FALSE",
            (false, true) => "1",
            (false, false) => "0",
        };
        self.sql.push_str(token);
    }

    /// Push elements of an iterator, separated by `sep`. The `push_elem` function provides
    /// the flexibility to map the elements (compared to [`SQLBuilder::push_elems`], which assumes that
    /// the elements implement [`ExpressionBuilder`] and [`build`](ExpressionBuilder::build) is all you need to call).
    pub fn push_iter<T>(
        &mut self,
        iter: impl Iterator<Item = T>,
        sep: &str,
        push_elem: impl Fn(&mut Self, T) -> Result<(), QueryError>,
    ) -> Result<(), QueryError> {
        for (i, item) in iter.enumerate() {
            if i > 0 {
                self.sql.push_str(sep);
            }
            push_elem(self, item)?;
        }
        Ok(())
    }

    /// Push elements of a slice, separated by `sep`. The elements must themselves implement
    /// `ExpressionBuilder`.
    pub fn push_elems<T: ExpressionBuilder>(
        &mut self,
        elems: &[T],
        sep: &str,
    ) -> Result<(), QueryError> {
        self.push_iter(elems.iter(), sep, |builder, elem| elem.build(builder))
    }

    /// Get the SQL string. Calling this method should be the final step in building an SQL
    /// expression, and thus this builder consumes the `self`.
    pub fn into_sql(self) -> String {
        self.sql
    }
}

impl Default for SQLBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn double_quoted() -> SQLBuilder {
        SQLBuilder::with_config(RenderConfig {
            quote_style: QuoteStyle::DoubleQuote,
            boolean_keywords: true,
        })
    }

    #[test]
    fn identifiers() {
        let mut builder = SQLBuilder::new();
        builder.push_identifier("users.id");
        builder.push_space();
        builder.push_identifier("odd`name");
        builder.push_space();
        builder.push_identifier("users.*");
        assert_eq!(builder.into_sql(), "`users`.`id` `odd``name` `users`.*");

        let mut builder = double_quoted();
        builder.push_identifier("public.users");
        assert_eq!(builder.into_sql(), r#""public"."users""#);
    }

    #[test]
    fn string_literals() {
        let mut builder = SQLBuilder::new();
        builder.push_string_literal(r"it's a \ test");
        assert_eq!(builder.into_sql(), r"'it''s a \\ test'");

        let mut builder = double_quoted();
        builder.push_string_literal(r"it's a \ test");
        assert_eq!(builder.into_sql(), r"'it''s a \ test'");
    }

    #[test]
    fn booleans() {
        let mut builder = SQLBuilder::new();
        builder.push_bool(true);
        builder.push_bool(false);
        assert_eq!(builder.into_sql(), "10");

        let mut builder = double_quoted();
        builder.push_bool(true);
        assert_eq!(builder.into_sql(), "TRUE");
    }

    #[test]
    fn separated_elements() {
        let mut builder = SQLBuilder::new();
        builder
            .push_iter(["a", "b", "c"].into_iter(), ", ", |builder, name| {
                builder.push_identifier(name);
                Ok(())
            })
            .unwrap();
        assert_eq!(builder.into_sql(), "`a`, `b`, `c`");
    }
}
