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
    Arg, ArgValue, Clause, ExpressionBuilder, SQLBuilder, build_clauses,
    column::Columns,
    condition::WhereConditions,
    limit::Limit,
    order::{GroupBy, OrderBy},
    tables::Tables,
};

/// A select statement
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    distinct: bool,
    /// The columns to select (`*` if none)
    columns: Columns,
    /// The tables to select from, with their joins
    tables: Tables,
    /// The predicate to filter the rows
    conditions: WhereConditions,
    group_by: GroupBy,
    order_by: OrderBy,
    limit: Limit,
}

impl Default for Select {
    fn default() -> Self {
        Self::new()
    }
}

impl Select {
    pub fn new() -> Self {
        Self {
            distinct: false,
            columns: Columns::new(),
            tables: Tables::with_keyword("FROM"),
            conditions: WhereConditions::new(),
            group_by: GroupBy::new(),
            order_by: OrderBy::new(),
            limit: Limit::new(),
        }
    }

    pub fn columns<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.columns.columns(args)?;
        Ok(self)
    }

    pub fn distinct(&mut self, distinct: bool) -> &mut Self {
        self.distinct = distinct;
        self
    }

    pub fn from_<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.tables.set(args)?;
        Ok(self)
    }

    /// Inner join to the last table in `FROM`
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

    /// Add conditions to the ON clause of the last join.
    pub fn on<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.tables.on(args)?;
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

    /// Add a nested group such as `Conditions::any(...)`.
    pub fn where_group(&mut self, group: WhereConditions) -> &mut Self {
        self.conditions.push_group(group);
        self
    }

    pub fn group_by<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.group_by.group_by(args)?;
        Ok(self)
    }

    pub fn order_by<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.order_by.order_by(args)?;
        Ok(self)
    }

    pub fn limit(&mut self, limit: impl Into<ArgValue>) -> Result<&mut Self, QueryError> {
        self.limit.limit(limit)?;
        Ok(self)
    }

    pub fn offset(&mut self, offset: impl Into<ArgValue>) -> Result<&mut Self, QueryError> {
        self.limit.offset(offset)?;
        Ok(self)
    }

    pub fn limit_offset(
        &mut self,
        limit: impl Into<ArgValue>,
        offset: impl Into<ArgValue>,
    ) -> Result<&mut Self, QueryError> {
        self.limit.limit_offset(limit, offset)?;
        Ok(self)
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    /// Collapse redundant joins of every table in place. Rendering already does this without
    /// changing the select.
    pub fn minimize_joins(&mut self) -> &mut Self {
        self.tables.minimize_joins();
        self
    }

    pub fn get_limit(&self) -> &Limit {
        &self.limit
    }
}

impl ExpressionBuilder for Select {
    /// Build the select statement of the form `SELECT [DISTINCT] <columns> FROM <tables> [WHERE
    /// <conditions>] [GROUP BY ...] [ORDER BY ...] [LIMIT ... [OFFSET ...]]`.
    #[instrument(name = "Select::build", level = "trace", skip_all)]
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        if !self.tables.is_set() {
            return Err(QueryError::invalid_query("You can't select without table."));
        }

        builder.push_str("SELECT ");
        if self.distinct {
            builder.push_str("DISTINCT ");
        }
        self.columns.build(builder)?;

        build_clauses(
            &[
                (None, &self.tables),
                (Some("WHERE"), &self.conditions),
                (None, &self.group_by),
                (None, &self.order_by),
                (None, &self.limit),
            ],
            builder,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::{Conditions, CustomSql, SqlValue, args, kw};

    use super::*;

    fn users() -> Select {
        let mut select = Select::new();
        select.from_(["users"]).unwrap();
        select
    }

    #[test]
    fn star() {
        assert_sql!(users(), "SELECT * FROM `users`");
    }

    #[test]
    fn all_clauses() {
        let mut select = users();
        select
            .distinct(true)
            .columns(args!["country", kw("total", CustomSql::new("COUNT(*)"))])
            .unwrap()
            .where_([("age", ">=", 18)])
            .unwrap()
            .group_by(["country"])
            .unwrap()
            .order_by([("total", "DESC")])
            .unwrap()
            .limit_offset(10, 20)
            .unwrap();

        assert_sql!(
            select,
            "SELECT DISTINCT `country`, COUNT(*) AS `total` FROM `users` WHERE `age` >= 18 \
             GROUP BY `country` ORDER BY `total` DESC LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn where_groups() {
        let mut select = users();
        select
            .where_([("active", true)])
            .unwrap()
            .where_group(Conditions::any(args![("role", "admin"), ("role", "owner")]).unwrap());

        assert_sql!(
            select,
            "SELECT * FROM `users` WHERE `active` = 1 AND (`role` = 'admin' OR `role` = 'owner')"
        );
    }

    #[test]
    fn sub_select_column() {
        let mut count = Select::new();
        count
            .columns([CustomSql::new("COUNT(*)")])
            .unwrap()
            .from_(["posts"])
            .unwrap()
            .where_([CustomSql::new("posts.user_id = users.id")])
            .unwrap();

        let mut select = users();
        select.columns(args!["name", kw("posts", count)]).unwrap();

        assert_sql!(
            select,
            "SELECT `name`, (SELECT COUNT(*) FROM `posts` WHERE posts.user_id = users.id) AS `posts` FROM `users`"
        );
    }

    #[test]
    fn joins() {
        let mut select = users();
        select
            .left_join(("posts", "p"))
            .unwrap()
            .on([("users.id", "p.user_id")])
            .unwrap()
            .right_join("tags")
            .unwrap()
            .on([("tags.post_id", "p.id")])
            .unwrap();

        assert_sql!(
            select,
            "SELECT * FROM `users` LEFT JOIN `posts` AS `p` ON (`users`.`id` = `p`.`user_id`) \
             RIGHT JOIN `tags` ON (`tags`.`post_id` = `p`.`id`)"
        );
    }

    #[test]
    fn without_table() {
        let mut select = Select::new();
        select.columns(["id"]).unwrap();
        assert_sql_err!(select, QueryError::InvalidQuery(_));

        assert!(matches!(
            select.left_join("posts"),
            Err(QueryError::InvalidQuery(_))
        ));
    }

    #[test]
    fn offset_without_limit() {
        let mut select = users();
        select.offset(20).unwrap();
        assert_sql!(select, "SELECT * FROM `users`");

        select.limit(5).unwrap();
        assert_eq!(select.get_limit().get_limit(), Some(5));
        assert_eq!(select.get_limit().get_offset(), Some(20));
        assert_sql!(select, "SELECT * FROM `users` LIMIT 5 OFFSET 20");
    }

    #[test]
    fn limit_from_collection_length() {
        let ids = vec![3, 1, 4];
        let mut select = users();
        select
            .where_([("id", ids.clone())])
            .unwrap()
            .limit(SqlValue::try_from(ids.len()).unwrap())
            .unwrap();
        assert_sql!(select, "SELECT * FROM `users` WHERE `id` IN (3, 1, 4) LIMIT 3");
    }
}
