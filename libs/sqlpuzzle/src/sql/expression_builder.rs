// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use tracing::debug;

use super::SQLBuilder;
use crate::{QueryError, RenderConfig};

/// A trait for types that can build themselves into an SQL expression.
///
/// Each constituent of an SQL statement (value, condition, table, limit, select, etc.) implements
/// this trait, which can then be used to hierarchically build the SQL string. Building fails when
/// the fragments are structurally inconsistent (for example, a join without an ON clause).
pub trait ExpressionBuilder {
    /// Build the SQL expression into the given SQL builder
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError>;

    /// Build the SQL expression into a string using the default [`RenderConfig`].
    fn to_sql(&self) -> Result<String, QueryError>
    where
        Self: Sized,
    {
        self.to_sql_with(&RenderConfig::default())
    }

    fn to_sql_with(&self, config: &RenderConfig) -> Result<String, QueryError>
    where
        Self: Sized,
    {
        let mut builder = SQLBuilder::with_config(*config);
        self.build(&mut builder)?;
        let sql = builder.into_sql();
        debug!(%sql, "Rendered SQL");
        Ok(sql)
    }
}

/// A fragment that a statement renders only when it has content (a `WHERE` clause with no
/// conditions, for instance, is left out entirely).
pub trait Clause: ExpressionBuilder {
    fn is_set(&self) -> bool;
}

impl<T> ExpressionBuilder for Box<T>
where
    T: ExpressionBuilder,
{
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        self.as_ref().build(builder)
    }
}

impl<T> ExpressionBuilder for &T
where
    T: ExpressionBuilder,
{
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        (**self).build(builder)
    }
}

/// Build the clauses that are set, in the given order, each preceded by a space and its optional
/// keyword.
pub(crate) fn build_clauses(
    clauses: &[(Option<&'static str>, &dyn Clause)],
    builder: &mut SQLBuilder,
) -> Result<(), QueryError> {
    for (keyword, clause) in clauses {
        if clause.is_set() {
            builder.push_space();
            if let Some(keyword) = keyword {
                builder.push_str(keyword);
                builder.push_space();
            }
            clause.build(builder)?;
        }
    }
    Ok(())
}
