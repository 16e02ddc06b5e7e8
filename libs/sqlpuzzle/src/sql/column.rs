// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::QueryError;

use super::{Arg, ArgKind, ArgValue, ArgsSpec, Clause, ExpressionBuilder, SQLBuilder};

/// The selected columns of a `SELECT`. A column is a name (`users.id`), custom SQL
/// (`COUNT(*)`) or a sub-select, each with an optional alias. No columns means `*`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Columns {
    columns: Vec<(ArgValue, Option<String>)>,
}

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    fn args_spec() -> ArgsSpec {
        const COLUMN: &[ArgKind] = &[
            ArgKind::String,
            ArgKind::Reference,
            ArgKind::Sql,
            ArgKind::Select,
        ];
        ArgsSpec::new(1, 2)
            .allow_map()
            .keyword_as_alias()
            .allow(&[COLUMN, ArgKind::NAME])
    }

    /// Add columns. A column already present with the same alias is not added again.
    pub fn columns<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        for (column, alias) in Self::args_spec().parse_pairs(args)? {
            let column = (column.into_column()?, alias);
            if !self.columns.contains(&column) {
                self.columns.push(column);
            }
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl ExpressionBuilder for Columns {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        if self.columns.is_empty() {
            builder.push('*');
            return Ok(());
        }

        builder.push_iter(self.columns.iter(), ", ", |builder, (column, alias)| {
            column.build(builder)?;
            if let Some(alias) = alias {
                builder.push_str(" AS ");
                builder.push_identifier(alias);
            }
            Ok(())
        })
    }
}

impl Clause for Columns {
    fn is_set(&self) -> bool {
        !self.columns.is_empty()
    }
}
