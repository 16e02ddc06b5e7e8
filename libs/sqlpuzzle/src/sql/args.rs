// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Normalization of builder-method arguments.
//!
//! Builder methods accept their arguments in several shapes: a bare value (`"users"`), a tuple
//! (`("users", "u")` or `("age", ">", 18)`), a mapping (`Arg::map([("users", "u")])`) or a keyword
//! (`kw("u", "users")`). Each call site declares the shapes and value kinds it accepts with an
//! [`ArgsSpec`], which turns the arguments into an ordered list of item lists.

use crate::QueryError;

use super::{CustomSql, ExpressionBuilder, SQLBuilder, SqlValue, select::Select};

/// The kind of a single argument value, used to declare what a position accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    List,
    Reference,
    Sql,
    Select,
}

impl ArgKind {
    pub const ANY: &'static [ArgKind] = &[
        ArgKind::Null,
        ArgKind::Bool,
        ArgKind::Integer,
        ArgKind::Float,
        ArgKind::String,
        ArgKind::List,
        ArgKind::Reference,
        ArgKind::Sql,
        ArgKind::Select,
    ];

    /// Kinds usable as a table or column name
    pub const NAME: &'static [ArgKind] = &[ArgKind::String, ArgKind::Reference];
}

/// A single argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Value(SqlValue),
    Select(Box<Select>),
}

impl ArgValue {
    pub fn kind(&self) -> ArgKind {
        match self {
            ArgValue::Value(SqlValue::Null) => ArgKind::Null,
            ArgValue::Value(SqlValue::Bool(_)) => ArgKind::Bool,
            ArgValue::Value(SqlValue::Integer(_)) => ArgKind::Integer,
            ArgValue::Value(SqlValue::Float(_)) => ArgKind::Float,
            ArgValue::Value(SqlValue::String(_)) => ArgKind::String,
            ArgValue::Value(SqlValue::List(_)) => ArgKind::List,
            ArgValue::Value(SqlValue::Reference(_)) => ArgKind::Reference,
            ArgValue::Value(SqlValue::Sql(_)) => ArgKind::Sql,
            ArgValue::Select(_) => ArgKind::Select,
        }
    }

    /// Empty values (`NULL`, `""`, `[]`) passed as bare arguments are skipped, so that callers
    /// can pass optional arguments without checking them first.
    pub(crate) fn is_empty(&self) -> bool {
        match self {
            ArgValue::Value(SqlValue::Null) => true,
            ArgValue::Value(SqlValue::String(s)) => s.is_empty(),
            ArgValue::Value(SqlValue::List(values)) => values.is_empty(),
            _ => false,
        }
    }

    pub(crate) fn into_name(self) -> Option<String> {
        match self {
            ArgValue::Value(SqlValue::String(name) | SqlValue::Reference(name)) => Some(name),
            _ => None,
        }
    }

    /// Interpret the value as a column: strings become references, raw SQL and sub-selects are
    /// kept as they are.
    pub(crate) fn into_column(self) -> Result<ArgValue, QueryError> {
        match self {
            ArgValue::Value(SqlValue::String(name)) => Ok(SqlValue::Reference(name).into()),
            column @ (ArgValue::Value(SqlValue::Reference(_) | SqlValue::Sql(_))
            | ArgValue::Select(_)) => Ok(column),
            other => Err(QueryError::invalid_argument(format!(
                "{:?} can't be used as a column",
                other.kind()
            ))),
        }
    }
}

impl ExpressionBuilder for ArgValue {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        match self {
            ArgValue::Value(value) => value.build(builder),
            ArgValue::Select(select) => {
                builder.push('(');
                select.build(builder)?;
                builder.push(')');
                Ok(())
            }
        }
    }
}

/// One argument of a builder call, in any of the accepted shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Value(ArgValue),
    Tuple(Vec<ArgValue>),
    Map(Vec<(ArgValue, ArgValue)>),
    /// `name = value`; see [`ArgsSpec::keyword_as_alias`] for how it is interpreted
    Keyword(String, ArgValue),
}

impl Arg {
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<ArgValue>,
        V: Into<ArgValue>,
    {
        Arg::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Build a keyword argument, the equivalent of `name=value`.
pub fn kw(name: impl Into<String>, value: impl Into<ArgValue>) -> Arg {
    Arg::Keyword(name.into(), value.into())
}

macro_rules! arg_from_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ArgValue {
                fn from(value: $t) -> Self {
                    ArgValue::Value(value.into())
                }
            }

            impl From<$t> for Arg {
                fn from(value: $t) -> Self {
                    Arg::Value(value.into())
                }
            }
        )*
    };
}

arg_from_value!(
    i8, i16, i32, i64, u8, u16, u32, f32, f64, bool, &str, String, CustomSql, SqlValue
);

impl<T: Into<SqlValue>> From<Option<T>> for ArgValue {
    fn from(value: Option<T>) -> Self {
        ArgValue::Value(value.into())
    }
}

impl<T: Into<SqlValue>> From<Vec<T>> for ArgValue {
    fn from(values: Vec<T>) -> Self {
        ArgValue::Value(values.into())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        Arg::Value(value.into())
    }
}

impl<T: Into<SqlValue>> From<Vec<T>> for Arg {
    fn from(values: Vec<T>) -> Self {
        Arg::Value(values.into())
    }
}

impl From<Select> for ArgValue {
    fn from(select: Select) -> Self {
        ArgValue::Select(Box::new(select))
    }
}

impl From<Select> for Arg {
    fn from(select: Select) -> Self {
        Arg::Value(select.into())
    }
}

impl From<ArgValue> for Arg {
    fn from(value: ArgValue) -> Self {
        Arg::Value(value)
    }
}

impl<A, B> From<(A, B)> for Arg
where
    A: Into<ArgValue>,
    B: Into<ArgValue>,
{
    fn from((a, b): (A, B)) -> Self {
        Arg::Tuple(vec![a.into(), b.into()])
    }
}

impl<A, B, C> From<(A, B, C)> for Arg
where
    A: Into<ArgValue>,
    B: Into<ArgValue>,
    C: Into<ArgValue>,
{
    fn from((a, b, c): (A, B, C)) -> Self {
        Arg::Tuple(vec![a.into(), b.into(), c.into()])
    }
}

impl<A, B, C, D> From<(A, B, C, D)> for Arg
where
    A: Into<ArgValue>,
    B: Into<ArgValue>,
    C: Into<ArgValue>,
    D: Into<ArgValue>,
{
    fn from((a, b, c, d): (A, B, C, D)) -> Self {
        Arg::Tuple(vec![a.into(), b.into(), c.into(), d.into()])
    }
}

/// Build a list of heterogeneous [`Arg`]s: `args!["users", ("posts", "p"), kw("c", "comments")]`.
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        vec![$($crate::Arg::from($arg)),*]
    };
}

/// Declaration of the argument shapes a builder method accepts.
#[derive(Debug, Clone)]
pub struct ArgsSpec {
    min_items: usize,
    max_items: usize,
    allow_map: bool,
    keyword_as_alias: bool,
    /// Alternative signatures; each lists the allowed kinds per position. Empty means anything.
    allowed: Vec<&'static [&'static [ArgKind]]>,
}

impl ArgsSpec {
    pub fn new(min_items: usize, max_items: usize) -> Self {
        Self {
            min_items,
            max_items,
            allow_map: false,
            keyword_as_alias: false,
            allowed: vec![],
        }
    }

    pub fn allow_map(mut self) -> Self {
        self.allow_map = true;
        self
    }

    /// Interpret `kw(name, value)` as `(value, name)` (i.e. `alias=table`) instead of
    /// `(name, value)` (i.e. `column=value`).
    pub fn keyword_as_alias(mut self) -> Self {
        self.keyword_as_alias = true;
        self
    }

    /// Add an allowed signature. An argument matches a signature if it has no more items than the
    /// signature has positions, and each item's kind is listed for its position.
    pub fn allow(mut self, positions: &'static [&'static [ArgKind]]) -> Self {
        self.allowed.push(positions);
        self
    }

    pub fn parse<I>(&self, args: I) -> Result<Vec<Vec<ArgValue>>, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        let mut parsed = vec![];

        for arg in args {
            match arg.into() {
                Arg::Value(value) => {
                    if !value.is_empty() {
                        parsed.push(vec![value]);
                    }
                }
                Arg::Tuple(items) => {
                    if !items.is_empty() {
                        parsed.push(items);
                    }
                }
                Arg::Map(entries) => {
                    if !self.allow_map {
                        return Err(QueryError::invalid_argument("Mapping is not allowed here."));
                    }
                    parsed.extend(entries.into_iter().map(|(key, value)| vec![key, value]));
                }
                Arg::Keyword(name, value) => {
                    let name = ArgValue::from(name);
                    parsed.push(if self.keyword_as_alias {
                        vec![value, name]
                    } else {
                        vec![name, value]
                    });
                }
            }
        }

        parsed.iter().try_for_each(|items| self.validate(items))?;

        Ok(parsed)
    }

    /// Parse into `(value, alias)` pairs. An empty alias is the same as no alias.
    pub fn parse_pairs<I>(&self, args: I) -> Result<Vec<(ArgValue, Option<String>)>, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.parse(args)?
            .into_iter()
            .map(|items| {
                let mut items = items.into_iter();
                let value = items
                    .next()
                    .ok_or_else(|| QueryError::invalid_argument("Missing value."))?;
                let alias = match items.next() {
                    Some(alias) if alias.is_empty() => None,
                    Some(alias) => Some(
                        alias
                            .into_name()
                            .ok_or_else(|| QueryError::invalid_argument("Alias must be a name."))?,
                    ),
                    None => None,
                };
                Ok((value, alias))
            })
            .collect()
    }

    fn validate(&self, items: &[ArgValue]) -> Result<(), QueryError> {
        if items.len() > self.max_items || items.len() < self.min_items {
            return Err(QueryError::invalid_argument(format!(
                "Expected {} to {} items, got {}.",
                self.min_items,
                self.max_items,
                items.len()
            )));
        }

        let matches_signature = |positions: &&[&[ArgKind]]| {
            items.len() <= positions.len()
                && items
                    .iter()
                    .zip(positions.iter())
                    .all(|(item, kinds)| kinds.contains(&item.kind()))
        };

        if self.allowed.is_empty() || self.allowed.iter().any(matches_signature) {
            Ok(())
        } else {
            let kinds: Vec<_> = items.iter().map(ArgValue::kind).collect();
            Err(QueryError::invalid_argument(format!(
                "Unsupported argument types {kinds:?}."
            )))
        }
    }
}
