// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use tracing::debug;

use crate::QueryError;

use super::{Clause, ExpressionBuilder, SQLBuilder, condition::OnConditions, table::TableRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

/// A table joined to a [`TableRef`], such as `LEFT JOIN posts ON (users.id = posts.user_id)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: TableRef,
    pub on: OnConditions,
}

impl Join {
    pub fn new(kind: JoinKind, table: TableRef) -> Self {
        Self {
            kind,
            table,
            on: OnConditions::new(),
        }
    }

    /// Whether both joins attach the same table with the same predicate (regardless of kind).
    fn same_target(&self, other: &Join) -> bool {
        self.table == other.table && self.on == other.on
    }

    /// Build `<KEYWORD> <table> ON (<conditions>)` using `kind` in place of the join's own kind.
    pub(crate) fn build_as(&self, kind: JoinKind, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        if !self.on.is_set() {
            return Err(QueryError::invalid_query("You can't use join without on."));
        }
        builder.push_str(kind.keyword());
        builder.push_space();
        self.table.build(builder)?;
        builder.push_str(" ON (");
        self.on.build(builder)?;
        builder.push(')');
        Ok(())
    }
}

impl ExpressionBuilder for Join {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        self.build_as(self.kind, builder)
    }
}

/// Collapse redundant joins. Joins attaching the same table with the same predicate form a group;
/// a group containing an inner join is reduced to a single inner join (its first member), since
/// the inner join subsumes the outer ones. Groups without an inner join are kept as they are.
/// Groups keep the order in which they were first seen.
///
/// The result is a fixed point: minimizing an already minimized list yields the same list.
pub(crate) fn minimize(joins: &[Join]) -> Vec<(JoinKind, &Join)> {
    let mut groups: Vec<Vec<&Join>> = vec![];
    for join in joins {
        match groups.iter_mut().find(|group| group[0].same_target(join)) {
            Some(group) => group.push(join),
            None => groups.push(vec![join]),
        }
    }

    groups
        .into_iter()
        .flat_map(|group| {
            if group.len() > 1 && group.iter().any(|join| join.kind == JoinKind::Inner) {
                debug!(
                    count = group.len(),
                    "Collapsing joins with the same table and condition into an inner join"
                );
                vec![(JoinKind::Inner, group[0])]
            } else {
                group.into_iter().map(|join| (join.kind, join)).collect()
            }
        })
        .collect()
}
