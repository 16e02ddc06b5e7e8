// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

#[macro_use]
#[cfg(test)]
mod test_util;

pub(crate) mod args;
pub(crate) mod column;
pub mod condition;
mod expression_builder;
pub(crate) mod join;
pub(crate) mod limit;
pub mod order;
mod sql_builder;
pub(crate) mod table;
pub(crate) mod tables;
mod value;

pub(crate) mod delete;
pub(crate) mod insert;
pub(crate) mod select;
pub(crate) mod update;

pub use args::{Arg, ArgKind, ArgValue, ArgsSpec, kw};
pub(crate) use expression_builder::build_clauses;
pub use expression_builder::{Clause, ExpressionBuilder};
pub use sql_builder::SQLBuilder;
pub use value::{CustomSql, SqlValue};
