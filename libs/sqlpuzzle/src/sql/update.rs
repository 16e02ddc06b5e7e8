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
    Arg, ArgKind, ArgValue, ArgsSpec, Clause, ExpressionBuilder, SQLBuilder, build_clauses,
    condition::WhereConditions, tables::Tables,
};

/// An update statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Update {
    /// The tables to update, with their joins
    tables: Tables,
    /// The columns to update and their values
    column_values: Vec<(ArgValue, ArgValue)>,
    /// The predicate to filter rows to update
    conditions: WhereConditions,
    allow_update_all: bool,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.tables.set(args)?;
        Ok(self)
    }

    pub fn join(&mut self, arg: impl Into<Arg>) -> Result<&mut Self, QueryError> {
        self.tables.join(arg)?;
        Ok(self)
    }

    pub fn inner_join(&mut self, arg: impl Into<Arg>) -> Result<&mut Self, QueryError> {
        self.tables.inner_join(arg)?;
        Ok(self)
    }

    pub fn left_join(&mut self, arg: impl Into<Arg>) -> Result<&mut Self, QueryError> {
        self.tables.left_join(arg)?;
        Ok(self)
    }

    pub fn right_join(&mut self, arg: impl Into<Arg>) -> Result<&mut Self, QueryError> {
        self.tables.right_join(arg)?;
        Ok(self)
    }

    pub fn on<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.tables.on(args)?;
        Ok(self)
    }

    /// Set columns to values, given as `("name", value)`, `kw("name", value)` or a map. Setting a
    /// column again replaces its value.
    pub fn set<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        const COLUMN: &[ArgKind] = &[ArgKind::String, ArgKind::Reference];
        let spec = ArgsSpec::new(2, 2)
            .allow_map()
            .allow(&[COLUMN, ArgKind::ANY]);

        let column_values = spec
            .parse(args)?
            .into_iter()
            .map(|items| {
                let mut items = items.into_iter();
                match (items.next(), items.next()) {
                    (Some(column), Some(value)) => Ok((column.into_column()?, value)),
                    _ => Err(QueryError::invalid_argument("Expected a column and a value.")),
                }
            })
            .collect::<Result<Vec<_>, QueryError>>()?;

        for (column, value) in column_values {
            match self
                .column_values
                .iter_mut()
                .find(|(existing, _)| *existing == column)
            {
                Some(column_value) => column_value.1 = value,
                None => self.column_values.push((column, value)),
            }
        }
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

    /// Confirm that updating without any condition (every row) is intended.
    pub fn allow_update_all(&mut self) -> &mut Self {
        self.allow_update_all = true;
        self
    }
}

impl ExpressionBuilder for Update {
    /// Build the update statement of the form `UPDATE <tables> SET <column = value, ...> [WHERE
    /// <conditions>]`.
    #[instrument(name = "Update::build", level = "trace", skip_all)]
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        if !self.tables.is_set() {
            return Err(QueryError::invalid_query("You can't update without table."));
        }
        if self.column_values.is_empty() {
            return Err(QueryError::invalid_query(
                "You can't update without any value.",
            ));
        }
        if !self.conditions.is_set() && !self.allow_update_all {
            return Err(QueryError::ConfirmUpdateAll);
        }

        builder.push_str("UPDATE ");
        self.tables.build(builder)?;

        builder.push_str(" SET ");
        builder.push_iter(
            self.column_values.iter(),
            ", ",
            |builder, (column, value)| {
                column.build(builder)?;
                builder.push_str(" = ");
                value.build(builder)
            },
        )?;

        build_clauses(&[(Some("WHERE"), &self.conditions)], builder)
    }
}

#[cfg(test)]
mod tests {
    use crate::{CustomSql, SqlValue, args, kw};

    use super::*;

    fn users() -> Update {
        let mut update = Update::new();
        update.table(["users"]).unwrap();
        update
    }

    #[test]
    fn update() {
        let mut update = users();
        update
            .set(args![("name", "O'Brien"), kw("age", 42)])
            .unwrap()
            .where_([("id", 7)])
            .unwrap();

        assert_sql!(
            update,
            "UPDATE `users` SET `name` = 'O''Brien', `age` = 42 WHERE `id` = 7"
        );
    }

    #[test]
    fn set_replaces_values() {
        let mut update = users();
        update
            .set(args![("name", "a"), ("age", 1)])
            .unwrap()
            .set([Arg::map([("name", SqlValue::Null)])])
            .unwrap()
            .set([("visits", CustomSql::new("visits + 1"))])
            .unwrap()
            .allow_update_all();

        assert_sql!(
            update,
            "UPDATE `users` SET `name` = NULL, `age` = 1, `visits` = visits + 1"
        );
    }

    #[test]
    fn update_with_join() {
        let mut update = users();
        update
            .join("groups")
            .unwrap()
            .on([("users.group_id", "groups.id")])
            .unwrap()
            .set([("users.active", false)])
            .unwrap()
            .where_([("groups.name", "banned")])
            .unwrap();

        assert_sql!(
            update,
            "UPDATE `users` JOIN `groups` ON (`users`.`group_id` = `groups`.`id`) \
             SET `users`.`active` = 0 WHERE `groups`.`name` = 'banned'"
        );
    }

    #[test]
    fn update_all_needs_confirmation() {
        let mut update = users();
        update.set([("active", true)]).unwrap();
        assert_sql_err!(update, QueryError::ConfirmUpdateAll);

        update.allow_update_all();
        assert_sql!(update, "UPDATE `users` SET `active` = 1");
    }

    #[test]
    fn invalid_updates() {
        assert_sql_err!(Update::new(), QueryError::InvalidQuery(_));

        let mut update = users();
        update.where_([("id", 1)]).unwrap();
        assert_sql_err!(update, QueryError::InvalidQuery(_));

        assert!(matches!(
            update.set(["name"]),
            Err(QueryError::InvalidArgument(_))
        ));
        assert!(matches!(
            update.set([(1, 2)]),
            Err(QueryError::InvalidArgument(_))
        ));
    }
}
