// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A builder of MySQL-flavored SQL statements from loosely shaped arguments.
//!
//! Statements ([Select], [Update], [Insert], [Delete]) are composed by calling builder methods
//! whose arguments may be bare values, tuples, maps or keywords (see [Arg]). Each statement holds
//! one fragment per clause ([Tables], [WhereConditions], [GroupBy], [OrderBy], [Limit]) and
//! renders the fragments that are set, in a fixed order:
//!
//! ```ignore
//! let mut query = sqlpuzzle::select(["id", "name"])?;
//! query
//!     .from_(["users"])?
//!     .where_([("active", true)])?
//!     .limit_offset(10, 20)?;
//!
//! assert_eq!(
//!     query.to_sql()?,
//!     "SELECT `id`, `name` FROM `users` WHERE `active` = 1 LIMIT 10 OFFSET 20"
//! );
//! ```
//!
//! Joins to the same table with equivalent ON conditions are collapsed when rendering: if any of
//! them is an inner join, a single inner join is emitted. Rendering is configured with a
//! [RenderConfig], which can be read from the environment.

mod config;
mod query_error;
#[macro_use]
mod sql;

pub use config::{BOOLEAN_KEYWORDS_KEY, QUOTE_STYLE_KEY, QuoteStyle, RenderConfig};
pub use query_error::QueryError;

/// Public types at the root level of this crate
pub use sql::{
    Arg, ArgKind, ArgValue, ArgsSpec, Clause, CustomSql, ExpressionBuilder, SQLBuilder, SqlValue,
    column::Columns,
    condition::{
        Condition, ConditionLeaf, ConditionNode, Conditions, OnCondition, OnConditions, Operator,
        Separator, WhereConditions,
    },
    delete::Delete,
    insert::Insert,
    join::{Join, JoinKind},
    kw,
    limit::Limit,
    order::{GroupBy, OrderBy, Ordering},
    select::Select,
    table::{TableRef, TableSource},
    tables::Tables,
    update::Update,
};

/// Start a `SELECT` of the given columns (`*` if there are none).
pub fn select<I>(columns: I) -> Result<Select, QueryError>
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    let mut select = Select::new();
    select.columns(columns)?;
    Ok(select)
}

/// Start a `SELECT * FROM` the given tables.
pub fn select_from<I>(tables: I) -> Result<Select, QueryError>
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    let mut select = Select::new();
    select.from_(tables)?;
    Ok(select)
}

pub fn update<I>(tables: I) -> Result<Update, QueryError>
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    let mut update = Update::new();
    update.table(tables)?;
    Ok(update)
}

pub fn insert_into<I>(table: I) -> Result<Insert, QueryError>
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    let mut insert = Insert::new();
    insert.table(table)?;
    Ok(insert)
}

pub fn delete_from<I>(table: I) -> Result<Delete, QueryError>
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    let mut delete = Delete::new();
    delete.from_(table)?;
    Ok(delete)
}
