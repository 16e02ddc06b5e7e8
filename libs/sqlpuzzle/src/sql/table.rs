// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::QueryError;

use super::{
    Arg, ArgValue, Clause, CustomSql, ExpressionBuilder, SQLBuilder, SqlValue,
    join::{self, Join, JoinKind},
    select::Select,
};

/// What a [`TableRef`] reads from.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    /// A table such as `users` (or `db.users`)
    Name(String),
    /// A sub-select such as `(SELECT * FROM users)`
    SubSelect(Box<Select>),
    Sql(CustomSql),
}

impl TableSource {
    pub(crate) fn from_arg(value: ArgValue) -> Result<Self, QueryError> {
        match value {
            ArgValue::Value(SqlValue::String(name) | SqlValue::Reference(name)) => {
                Ok(TableSource::Name(name))
            }
            ArgValue::Value(SqlValue::Sql(sql)) => Ok(TableSource::Sql(sql)),
            ArgValue::Select(select) => Ok(TableSource::SubSelect(select)),
            other => Err(QueryError::invalid_argument(format!(
                "{:?} can't be used as a table",
                other.kind()
            ))),
        }
    }
}

impl ExpressionBuilder for TableSource {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        match self {
            TableSource::Name(name) => {
                builder.push_identifier(name);
                Ok(())
            }
            TableSource::SubSelect(select) => {
                builder.push('(');
                select.build(builder)?;
                builder.push(')');
                Ok(())
            }
            TableSource::Sql(sql) => sql.build(builder),
        }
    }
}

/// A table of a statement, with an optional alias and the tables joined to it.
///
/// Two table references are equal only if their sources, aliases and joins are all equal.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    source: TableSource,
    alias: Option<String>,
    joins: Vec<Join>,
}

impl TableRef {
    pub fn new(source: TableSource, alias: Option<String>) -> Self {
        Self {
            source,
            alias,
            joins: vec![],
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(TableSource::Name(name.into()), None)
    }

    pub fn source(&self) -> &TableSource {
        &self.source
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// A table without any joins
    pub fn is_simple(&self) -> bool {
        self.joins.is_empty()
    }

    /// Join a table given as `"name"`, `("name", "alias")` or `Arg::map([("name", "alias")])`.
    pub fn join(&mut self, arg: impl Into<Arg>, kind: JoinKind) -> Result<&mut Self, QueryError> {
        let invalid = || QueryError::invalid_argument("Invalid argument for join.");

        let (name, alias) = match arg.into() {
            Arg::Value(name) => (name, None),
            Arg::Tuple(items) if items.len() == 2 => {
                let mut items = items.into_iter();
                (items.next().ok_or_else(invalid)?, items.next())
            }
            Arg::Map(entries) if entries.len() == 1 => {
                let (name, alias) = entries.into_iter().next().ok_or_else(invalid)?;
                (name, Some(alias))
            }
            _ => return Err(invalid()),
        };

        let name = name.into_name().ok_or_else(invalid)?;
        let alias = match alias {
            Some(alias) if alias.is_empty() => None,
            Some(alias) => Some(alias.into_name().ok_or_else(invalid)?),
            None => None,
        };

        self.joins.push(Join::new(
            kind,
            TableRef::new(TableSource::Name(name), alias),
        ));
        Ok(self)
    }

    /// Add conditions to the ON clause of the most recently added join.
    pub fn on<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        let join = self.joins.last_mut().ok_or_else(|| {
            QueryError::invalid_query("You can't set condition of join without join.")
        })?;
        join.on.where_(args)?;
        Ok(self)
    }

    /// Replace the joins with their minimized form (see [`join::minimize`]). Rendering applies the
    /// same minimization on the fly, so calling this is only needed to inspect the minimized joins.
    pub fn minimize_joins(&mut self) {
        let minimized: Vec<Join> = join::minimize(&self.joins)
            .into_iter()
            .map(|(kind, join)| Join {
                kind,
                ..join.clone()
            })
            .collect();
        self.joins = minimized;
    }
}

impl ExpressionBuilder for TableRef {
    /// Build `<table> [AS <alias>] [<join> ...]`.
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        self.source.build(builder)?;
        if let Some(alias) = &self.alias {
            builder.push_str(" AS ");
            builder.push_identifier(alias);
        }

        if self.joins.iter().any(|join| !join.on.is_set()) {
            return Err(QueryError::invalid_query("You can't use join without on."));
        }

        for (kind, join) in join::minimize(&self.joins) {
            builder.push_space();
            join.build_as(kind, builder)?;
        }
        Ok(())
    }
}
