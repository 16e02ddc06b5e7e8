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

use super::{
    Arg, ArgKind, ArgValue, ArgsSpec, Clause, CustomSql, ExpressionBuilder, SQLBuilder, SqlValue,
};

/// Comparison operator of a leaf condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,
    In,
    NotIn,
    Is,
    IsNot,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "<>",
            Operator::Lt => "<",
            Operator::LtEq => "<=",
            Operator::Gt => ">",
            Operator::GtEq => ">=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Is => "IS",
            Operator::IsNot => "IS NOT",
        }
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_uppercase().as_str() {
            "=" | "==" => Ok(Operator::Eq),
            "<>" | "!=" => Ok(Operator::NotEq),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::LtEq),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::GtEq),
            "LIKE" => Ok(Operator::Like),
            "NOT LIKE" => Ok(Operator::NotLike),
            "IN" => Ok(Operator::In),
            "NOT IN" => Ok(Operator::NotIn),
            "IS" => Ok(Operator::Is),
            "IS NOT" => Ok(Operator::IsNot),
            _ => Err(QueryError::invalid_argument(format!(
                "Unknown operator '{s}'."
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    And,
    Or,
}

impl Separator {
    fn as_str(self) -> &'static str {
        match self {
            Separator::And => " AND ",
            Separator::Or => " OR ",
        }
    }
}

/// A leaf of a [`Conditions`] tree, constructed from one normalized argument.
pub trait ConditionLeaf: ExpressionBuilder + PartialEq + Sized {
    /// The argument shapes accepted when adding conditions of this kind
    fn args_spec() -> ArgsSpec;

    fn from_items(items: Vec<ArgValue>) -> Result<Self, QueryError>;
}

/// A `WHERE` comparison such as `` `age` >= 18 ``, or a raw SQL condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        column: ArgValue,
        operator: Operator,
        value: ArgValue,
    },
    Custom(CustomSql),
}

impl Condition {
    pub fn new(
        column: impl Into<ArgValue>,
        operator: Operator,
        value: impl Into<ArgValue>,
    ) -> Result<Self, QueryError> {
        Ok(Condition::Compare {
            column: column.into().into_column()?,
            operator,
            value: value.into(),
        })
    }
}

impl ConditionLeaf for Condition {
    fn args_spec() -> ArgsSpec {
        const COLUMN: &[ArgKind] = &[ArgKind::String, ArgKind::Reference, ArgKind::Sql];
        ArgsSpec::new(1, 3)
            .allow_map()
            .allow(&[&[ArgKind::Sql]])
            .allow(&[COLUMN, ArgKind::ANY])
            .allow(&[COLUMN, &[ArgKind::String], ArgKind::ANY])
    }

    fn from_items(items: Vec<ArgValue>) -> Result<Self, QueryError> {
        let mut items = items.into_iter();
        match (items.next(), items.next(), items.next()) {
            (Some(ArgValue::Value(SqlValue::Sql(sql))), None, None) => Ok(Condition::Custom(sql)),
            (Some(column), Some(value), None) => Condition::new(column, Operator::Eq, value),
            (Some(column), Some(operator), Some(value)) => {
                let operator = operator
                    .into_name()
                    .ok_or_else(|| QueryError::invalid_argument("Operator must be a string."))?
                    .parse()?;
                Condition::new(column, operator, value)
            }
            _ => Err(QueryError::invalid_argument(
                "Condition needs a column and a value.",
            )),
        }
    }
}

impl ExpressionBuilder for Condition {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        let (column, operator, value) = match self {
            Condition::Compare {
                column,
                operator,
                value,
            } => (column, *operator, value),
            Condition::Custom(sql) => return sql.build(builder),
        };

        let is_null = matches!(value, ArgValue::Value(value) if value.is_null());
        let is_list = matches!(value, ArgValue::Value(SqlValue::List(_)));
        let operator = match operator {
            Operator::Eq if is_null => Operator::Is,
            Operator::NotEq if is_null => Operator::IsNot,
            Operator::Eq if is_list => Operator::In,
            Operator::NotEq if is_list => Operator::NotIn,
            operator => operator,
        };

        // `x IN ()` is invalid SQL, but its meaning is clear
        if let ArgValue::Value(SqlValue::List(values)) = value {
            if values.is_empty() && matches!(operator, Operator::In | Operator::NotIn) {
                builder.push_str(if operator == Operator::In {
                    "FALSE"
                } else {
                    "TRUE"
                });
                return Ok(());
            }
        }

        column.build(builder)?;
        builder.push_space();
        builder.push_str(operator.symbol());
        builder.push_space();

        let needs_parens = matches!(operator, Operator::In | Operator::NotIn)
            && matches!(value, ArgValue::Value(value) if !matches!(value, SqlValue::List(_)));
        if needs_parens {
            builder.push('(');
            value.build(builder)?;
            builder.push(')');
            Ok(())
        } else {
            value.build(builder)
        }
    }
}

/// A join predicate `left = right` between two columns. Equality is symmetric, since
/// `t1.x = t2.y` and `t2.y = t1.x` describe the same join.
#[derive(Debug, Clone)]
pub struct OnCondition {
    left: String,
    right: String,
}

impl OnCondition {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

impl PartialEq for OnCondition {
    fn eq(&self, other: &Self) -> bool {
        (self.left == other.left && self.right == other.right)
            || (self.left == other.right && self.right == other.left)
    }
}

impl ConditionLeaf for OnCondition {
    fn args_spec() -> ArgsSpec {
        ArgsSpec::new(2, 2)
            .allow_map()
            .allow(&[ArgKind::NAME, ArgKind::NAME])
    }

    fn from_items(items: Vec<ArgValue>) -> Result<Self, QueryError> {
        let mut names = items.into_iter().filter_map(ArgValue::into_name);
        match (names.next(), names.next()) {
            (Some(left), Some(right)) => Ok(OnCondition::new(left, right)),
            _ => Err(QueryError::invalid_argument(
                "Join condition needs two columns.",
            )),
        }
    }
}

impl ExpressionBuilder for OnCondition {
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        builder.push_identifier(&self.left);
        builder.push_str(" = ");
        builder.push_identifier(&self.right);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionNode<C> {
    Leaf(C),
    Group(Conditions<C>),
}

/// An ordered tree of conditions joined by a separator (`AND` by default).
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions<C> {
    nodes: Vec<ConditionNode<C>>,
    separator: Separator,
}

pub type WhereConditions = Conditions<Condition>;
pub type OnConditions = Conditions<OnCondition>;

impl<C> Default for Conditions<C> {
    fn default() -> Self {
        Self {
            nodes: vec![],
            separator: Separator::And,
        }
    }
}

impl<C: ConditionLeaf> Conditions<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A group whose conditions must all hold
    pub fn all<I>(args: I) -> Result<Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        let mut conditions = Self::new();
        conditions.where_(args)?;
        Ok(conditions)
    }

    /// A group of which at least one condition must hold
    pub fn any<I>(args: I) -> Result<Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        let mut conditions = Self::all(args)?;
        conditions.separator = Separator::Or;
        Ok(conditions)
    }

    pub fn separator(&self) -> Separator {
        self.separator
    }

    pub fn nodes(&self) -> &[ConditionNode<C>] {
        &self.nodes
    }

    /// Add leaf conditions. A condition equal to one already present is not added again. If any
    /// argument is invalid, none of them is added.
    pub fn where_<I>(&mut self, args: I) -> Result<&mut Self, QueryError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        let leaves = C::args_spec()
            .parse(args)?
            .into_iter()
            .map(C::from_items)
            .collect::<Result<Vec<_>, _>>()?;

        for leaf in leaves {
            self.push_node(ConditionNode::Leaf(leaf));
        }
        Ok(self)
    }

    /// Add a nested group. Empty groups are ignored.
    pub fn push_group(&mut self, group: Conditions<C>) -> &mut Self {
        if group.is_set() {
            self.push_node(ConditionNode::Group(group));
        }
        self
    }

    fn push_node(&mut self, node: ConditionNode<C>) {
        if !self.nodes.contains(&node) {
            self.nodes.push(node);
        }
    }

    fn build_nested(&self, nested: bool, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        if let [node] = self.nodes.as_slice() {
            return build_node(node, nested, builder);
        }

        if nested {
            builder.push('(');
        }
        builder.push_iter(self.nodes.iter(), self.separator.as_str(), |builder, node| {
            build_node(node, true, builder)
        })?;
        if nested {
            builder.push(')');
        }
        Ok(())
    }
}

fn build_node<C: ConditionLeaf>(
    node: &ConditionNode<C>,
    nested: bool,
    builder: &mut SQLBuilder,
) -> Result<(), QueryError> {
    match node {
        ConditionNode::Leaf(leaf) => leaf.build(builder),
        ConditionNode::Group(group) => group.build_nested(nested, builder),
    }
}

impl<C: ConditionLeaf> ExpressionBuilder for Conditions<C> {
    /// Build the conditions without a keyword, as in `a = 1 AND (b = 2 OR c = 3)`.
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        self.build_nested(false, builder)
    }
}

impl<C: ConditionLeaf> Clause for Conditions<C> {
    fn is_set(&self) -> bool {
        !self.nodes.is_empty()
    }
}
