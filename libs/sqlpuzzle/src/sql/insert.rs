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

use super::{Arg, ArgKind, ArgValue, ArgsSpec, ExpressionBuilder, SQLBuilder, tables::Tables};

/// An insert statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    /// The table to insert into
    tables: Tables,
    /// The columns to insert into such as `(age, name)`, taken from the first row
    columns: Vec<ArgValue>,
    /// The values to insert such as `(30, 'John'), (35, 'Jane')`, in the order of `columns`
    rows: Vec<Vec<ArgValue>>,
}

impl Default for Insert {
    fn default() -> Self {
        Self::new()
    }
}

impl Insert {
    pub fn new() -> Self {
        Self {
            tables: Tables::with_keyword("INTO"),
            columns: vec![],
            rows: vec![],
        }
    }

    pub fn table<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.tables.set(args)?;
        Ok(self)
    }

    /// Add a row given as `(column, value)` pairs. The first row decides the columns; every later
    /// row must provide exactly the same columns, in any order.
    pub fn values<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        const COLUMN: &[ArgKind] = &[ArgKind::String, ArgKind::Reference];
        let spec = ArgsSpec::new(2, 2)
            .allow_map()
            .allow(&[COLUMN, ArgKind::ANY]);

        let mut pairs: Vec<(ArgValue, ArgValue)> = vec![];
        for items in spec.parse(args)? {
            let mut items = items.into_iter();
            let (Some(column), Some(value)) = (items.next(), items.next()) else {
                return Err(QueryError::invalid_argument("Expected a column and a value."));
            };
            let column = column.into_column()?;
            if pairs.iter().any(|(existing, _)| *existing == column) {
                return Err(QueryError::invalid_argument(
                    "A column can be set only once per row.",
                ));
            }
            pairs.push((column, value));
        }

        if pairs.is_empty() {
            return Ok(self);
        }

        if self.rows.is_empty() {
            let (columns, row): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
            self.columns = columns;
            self.rows.push(row);
            return Ok(self);
        }

        if pairs.len() != self.columns.len() {
            return Err(QueryError::invalid_argument(
                "Every row must set the same columns.",
            ));
        }
        let row = self
            .columns
            .iter()
            .map(|column| {
                pairs
                    .iter()
                    .position(|(c, _)| c == column)
                    .map(|index| pairs[index].1.clone())
                    .ok_or_else(|| {
                        QueryError::invalid_argument("Every row must set the same columns.")
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.rows.push(row);
        Ok(self)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl ExpressionBuilder for Insert {
    /// Build the insert statement of the form `INSERT INTO <table> (<columns>) VALUES (<values>),
    /// ...`.
    #[instrument(name = "Insert::build", level = "trace", skip_all)]
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        if !self.tables.is_simple() {
            return Err(QueryError::invalid_query(
                "You can insert into exactly one table without joins.",
            ));
        }
        if self.rows.is_empty() {
            return Err(QueryError::invalid_query(
                "You can't insert without any values.",
            ));
        }

        builder.push_str("INSERT ");
        self.tables.build(builder)?;

        builder.push_str(" (");
        builder.push_elems(&self.columns, ", ")?;
        builder.push_str(") VALUES (");
        builder.push_iter(self.rows.iter(), "), (", |builder, values| {
            builder.push_elems(values, ", ")
        })?;
        builder.push(')');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{args, kw};

    use super::*;

    fn users() -> Insert {
        let mut insert = Insert::new();
        insert.table(["users"]).unwrap();
        insert
    }

    #[test]
    fn single_row() {
        let mut insert = users();
        insert
            .values(args![("name", "Alice"), kw("age", 30), ("email", None::<&str>)])
            .unwrap();

        assert_sql!(
            insert,
            "INSERT INTO `users` (`name`, `age`, `email`) VALUES ('Alice', 30, NULL)"
        );
    }

    #[test]
    fn multiple_rows() {
        let mut insert = users();
        insert
            .values(args![("name", "Alice"), ("age", 30)])
            .unwrap()
            .values([Arg::map(vec![("age", ArgValue::from(35)), ("name", "Bob".into())])])
            .unwrap();

        assert_eq!(insert.row_count(), 2);
        assert_sql!(
            insert,
            "INSERT INTO `users` (`name`, `age`) VALUES ('Alice', 30), ('Bob', 35)"
        );
    }

    #[test]
    fn mismatched_rows() {
        let mut insert = users();
        insert.values(args![("name", "Alice"), ("age", 30)]).unwrap();

        assert!(matches!(
            insert.values([("name", "Bob")]),
            Err(QueryError::InvalidArgument(_))
        ));
        assert!(matches!(
            insert.values(args![("name", "Bob"), ("email", "bob@example.com")]),
            Err(QueryError::InvalidArgument(_))
        ));
        assert!(matches!(
            insert.values(args![("name", "Bob"), ("name", "Rob")]),
            Err(QueryError::InvalidArgument(_))
        ));
        assert_eq!(insert.row_count(), 1);
    }

    #[test]
    fn invalid_inserts() {
        assert_sql_err!(Insert::new(), QueryError::InvalidQuery(_));
        assert_sql_err!(users(), QueryError::InvalidQuery(_));

        let mut insert = users();
        insert.table(["posts"]).unwrap().values([("id", 1)]).unwrap();
        assert_sql_err!(insert, QueryError::InvalidQuery(_));
    }
}
