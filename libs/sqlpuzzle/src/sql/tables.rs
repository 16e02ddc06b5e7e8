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
    Arg, ArgKind, ArgsSpec, Clause, ExpressionBuilder, SQLBuilder,
    join::JoinKind,
    table::{TableRef, TableSource},
};

/// The tables of a statement, such as `FROM users, posts AS p LEFT JOIN tags ON (...)`.
///
/// Tables are kept in insertion order and adding a table equal to one already present is a no-op.
/// Joins and ON conditions always apply to the last added table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tables {
    tables: Vec<TableRef>,
    keyword: Option<&'static str>,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables rendered after a keyword such as `FROM` or `INTO`.
    pub fn with_keyword(keyword: &'static str) -> Self {
        Self {
            tables: vec![],
            keyword: Some(keyword),
        }
    }

    fn args_spec() -> ArgsSpec {
        const SOURCE: &[ArgKind] = &[
            ArgKind::String,
            ArgKind::Reference,
            ArgKind::Select,
            ArgKind::Sql,
        ];
        ArgsSpec::new(1, 2)
            .allow_map()
            .keyword_as_alias()
            .allow(&[SOURCE, ArgKind::NAME])
    }

    /// Add tables given as names, sub-selects or custom SQL, each optionally with an alias.
    /// Empty arguments are skipped.
    pub fn set<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        for (source, alias) in Self::args_spec().parse_pairs(args)? {
            let table = TableRef::new(TableSource::from_arg(source)?, alias);
            if !self.tables.contains(&table) {
                self.tables.push(table);
            }
        }
        Ok(self)
    }

    pub fn tables(&self) -> &[TableRef] {
        &self.tables
    }

    pub fn last_table(&mut self) -> Result<&mut TableRef, QueryError> {
        self.tables
            .last_mut()
            .ok_or_else(|| QueryError::Builder("Tables are not set; there is no last table.".into()))
    }

    /// Exactly one table without any joins
    pub fn is_simple(&self) -> bool {
        matches!(self.tables.as_slice(), [table] if table.is_simple())
    }

    pub fn join(&mut self, arg: impl Into<Arg>) -> Result<&mut Self, QueryError> {
        self.inner_join(arg)
    }

    pub fn inner_join(&mut self, arg: impl Into<Arg>) -> Result<&mut Self, QueryError> {
        self.join_as(arg, JoinKind::Inner)
    }

    pub fn left_join(&mut self, arg: impl Into<Arg>) -> Result<&mut Self, QueryError> {
        self.join_as(arg, JoinKind::Left)
    }

    pub fn right_join(&mut self, arg: impl Into<Arg>) -> Result<&mut Self, QueryError> {
        self.join_as(arg, JoinKind::Right)
    }

    fn join_as(&mut self, arg: impl Into<Arg>, kind: JoinKind) -> Result<&mut Self, QueryError> {
        if !self.is_set() {
            return Err(QueryError::invalid_query(
                "You can't set join without table.",
            ));
        }
        self.last_table()?.join(arg, kind)?;
        Ok(self)
    }

    pub fn on<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        if !self.is_set() {
            return Err(QueryError::invalid_query(
                "You can't set condition of join without table.",
            ));
        }
        self.last_table()?.on(args)?;
        Ok(self)
    }

    /// Minimize the joins of every table in place.
    pub fn minimize_joins(&mut self) {
        self.tables.iter_mut().for_each(TableRef::minimize_joins);
    }
}

impl ExpressionBuilder for Tables {
    /// Build `[<keyword>] <table>, <table>, ...`.
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        if let Some(keyword) = self.keyword {
            builder.push_str(keyword);
            builder.push_space();
        }
        builder.push_elems(&self.tables, ", ")
    }
}

impl Clause for Tables {
    fn is_set(&self) -> bool {
        !self.tables.is_empty()
    }
}
