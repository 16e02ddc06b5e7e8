// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::QueryError;

use super::{ExpressionBuilder, SQLBuilder};

/// A raw SQL fragment such as `COUNT(*)` or `NOW()`, emitted verbatim. Can stand in for a table,
/// a column, a value or a whole condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomSql(String);

impl CustomSql {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ExpressionBuilder for CustomSql {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.push_str(self.as_str());
        Ok(())
    }
}

/// A value that can appear in a statement. Everything except [`SqlValue::Reference`] and
/// [`SqlValue::Sql`] renders as an escaped literal.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// A list such as `(1, 2, 3)`, typically the right-hand side of `IN`
    List(Vec<SqlValue>),
    /// A column or table name such as `users.id`, rendered as a quoted identifier
    Reference(String),
    Sql(CustomSql),
}

impl SqlValue {
    pub fn reference(name: impl Into<String>) -> Self {
        SqlValue::Reference(name.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl ExpressionBuilder for SqlValue {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        match self {
            SqlValue::Null => builder.push_str("NULL"),
            SqlValue::Bool(value) => builder.push_bool(*value),
            SqlValue::Integer(value) => builder.push_str(value.to_string()),
            SqlValue::Float(value) => {
                if !value.is_finite() {
                    return Err(QueryError::invalid_argument(format!(
                        "{value} can't be rendered as an SQL number"
                    )));
                }
                builder.push_str(value.to_string())
            }
            SqlValue::String(value) => builder.push_string_literal(value),
            SqlValue::List(values) => {
                builder.push('(');
                builder.push_elems(values, ", ")?;
                builder.push(')');
            }
            SqlValue::Reference(name) => builder.push_identifier(name),
            SqlValue::Sql(sql) => sql.build(builder)?,
        }
        Ok(())
    }
}

macro_rules! sql_value_from {
    ($variant:ident: $($t:ty),*) => {
        $(
            impl From<$t> for SqlValue {
                fn from(value: $t) -> Self {
                    SqlValue::$variant(value.into())
                }
            }
        )*
    };
}

sql_value_from!(Integer: i8, i16, i32, i64, u8, u16, u32);
sql_value_from!(Float: f32, f64);
sql_value_from!(Bool: bool);
sql_value_from!(String: &str, String);
sql_value_from!(Sql: CustomSql);

// Unsigned values may not fit into `Integer`, so the conversion is checked.
macro_rules! sql_value_try_from {
    ($($t:ty),*) => {
        $(
            impl TryFrom<$t> for SqlValue {
                type Error = QueryError;

                fn try_from(value: $t) -> Result<Self, Self::Error> {
                    i64::try_from(value).map(SqlValue::Integer).map_err(|_| {
                        QueryError::invalid_argument(format!(
                            "{value} is too large for an SQL integer"
                        ))
                    })
                }
            }
        )*
    };
}

sql_value_try_from!(u64, usize);

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

impl<T: Into<SqlValue>> From<Vec<T>> for SqlValue {
    fn from(values: Vec<T>) -> Self {
        SqlValue::List(values.into_iter().map(Into::into).collect())
    }
}
