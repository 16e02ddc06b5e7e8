// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::str::FromStr;

use crate::QueryError;

use super::{Arg, ArgKind, ArgValue, ArgsSpec, Clause, ExpressionBuilder, SQLBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ordering {
    #[default]
    Asc,
    Desc,
}

impl FromStr for Ordering {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ASC" => Ok(Ordering::Asc),
            "DESC" => Ok(Ordering::Desc),
            _ => Err(QueryError::invalid_argument(format!(
                "Unknown ordering '{s}', expected ASC or DESC."
            ))),
        }
    }
}

const COLUMN: &[ArgKind] = &[ArgKind::String, ArgKind::Reference, ArgKind::Sql];

/// Parse `"column"` or `("column", "ASC" | "DESC")` arguments into ordered columns.
fn parse_ordered_columns<I>(args: I) -> Result<Vec<(ArgValue, Ordering)>, QueryError>
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    ArgsSpec::new(1, 2)
        .allow_map()
        .allow(&[COLUMN, &[ArgKind::String]])
        .parse_pairs(args)?
        .into_iter()
        .map(|(column, ordering)| {
            let ordering = match ordering {
                Some(ordering) => ordering.parse()?,
                None => Ordering::default(),
            };
            Ok((column.into_column()?, ordering))
        })
        .collect()
}

/// Add or re-order a column: a column already present keeps its position and takes the new
/// ordering.
fn upsert(elements: &mut Vec<(ArgValue, Ordering)>, (column, ordering): (ArgValue, Ordering)) {
    match elements.iter_mut().find(|(existing, _)| *existing == column) {
        Some(element) => element.1 = ordering,
        None => elements.push((column, ordering)),
    }
}

fn build_ordered(
    keyword: &str,
    elements: &[(ArgValue, Ordering)],
    builder: &mut SQLBuilder,
) -> Result<(), QueryError> {
    builder.push_str(keyword);
    builder.push_space();
    builder.push_iter(elements.iter(), ", ", |builder, (column, ordering)| {
        column.build(builder)?;
        builder.push_space();
        builder.push_str(match ordering {
            Ordering::Asc => "ASC",
            Ordering::Desc => "DESC",
        });
        Ok(())
    })
}

/// `ORDER BY <column> ASC|DESC, ...`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderBy(Vec<(ArgValue, Ordering)>);

impl OrderBy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_by<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        for element in parse_ordered_columns(args)? {
            upsert(&mut self.0, element);
        }
        Ok(self)
    }
}

impl ExpressionBuilder for OrderBy {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        build_ordered("ORDER BY", &self.0, builder)
    }
}

impl Clause for OrderBy {
    fn is_set(&self) -> bool {
        !self.0.is_empty()
    }
}

/// `GROUP BY <column>, ...`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupBy(Vec<ArgValue>);

impl GroupBy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group_by<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        for items in ArgsSpec::new(1, 1).allow(&[COLUMN]).parse(args)? {
            for column in items {
                let column = column.into_column()?;
                if !self.0.contains(&column) {
                    self.0.push(column);
                }
            }
        }
        Ok(self)
    }
}

impl ExpressionBuilder for GroupBy {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.push_str("GROUP BY ");
        builder.push_elems(&self.0, ", ")
    }
}

impl Clause for GroupBy {
    fn is_set(&self) -> bool {
        !self.0.is_empty()
    }
}
