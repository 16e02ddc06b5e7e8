// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use tracing::instrument;

use crate::QueryError;

use super::{
    Arg, Clause, ExpressionBuilder, SQLBuilder, build_clauses, condition::WhereConditions,
    tables::Tables,
};

/// A delete statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    /// The table to delete from
    tables: Tables,
    /// The predicate to filter rows by
    conditions: WhereConditions,
    allow_delete_all: bool,
}

impl Default for Delete {
    fn default() -> Self {
        Self::new()
    }
}

impl Delete {
    pub fn new() -> Self {
        Self {
            tables: Tables::with_keyword("FROM"),
            conditions: WhereConditions::new(),
            allow_delete_all: false,
        }
    }

    pub fn from_<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.tables.set(args)?;
        Ok(self)
    }

    pub fn where_<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.conditions.where_(args)?;
        Ok(self)
    }

    pub fn where_group(&mut self, group: WhereConditions) -> &mut Self {
        self.conditions.push_group(group);
        self
    }

    /// Confirm that deleting without any condition (every row) is intended.
    pub fn allow_delete_all(&mut self) -> &mut Self {
        self.allow_delete_all = true;
        self
    }
}

impl ExpressionBuilder for Delete {
    /// Build a delete statement of the form `DELETE FROM <table> [WHERE <conditions>]`.
    #[instrument(name = "Delete::build", level = "trace", skip_all)]
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        if !self.tables.is_simple() {
            return Err(QueryError::invalid_query(
                "You can delete from exactly one table without joins.",
            ));
        }
        if !self.conditions.is_set() && !self.allow_delete_all {
            return Err(QueryError::ConfirmDeleteAll);
        }

        builder.push_str("DELETE ");
        self.tables.build(builder)?;
        build_clauses(&[(Some("WHERE"), &self.conditions)], builder)
    }
}
