//! Query IR types for REST queries.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::value::Value;

/// Comparison operator of a match operation.
///
/// Each operator has a fixed lowercase wire code used in serialized paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Field less than value.
    #[serde(rename = "lt")]
    LessThan,
    /// Field less than or equal to value.
    #[serde(rename = "lte")]
    LessThanOrEqual,
    /// Field equals value.
    #[serde(rename = "eq")]
    Equal,
    /// Field not equals value.
    #[serde(rename = "neq")]
    NotEqual,
    /// Field greater than or equal to value.
    #[serde(rename = "gte")]
    GreaterThanOrEqual,
    /// Field greater than value.
    #[serde(rename = "gt")]
    GreaterThan,
    /// Field within an inclusive range.
    #[serde(rename = "between")]
    Between,
    /// Field is in a set of values.
    #[serde(rename = "contain")]
    Contain,
    /// Field is not in a set of values.
    #[serde(rename = "ncontain")]
    NotContain,
    /// Field matches a regular expression.
    #[serde(rename = "regexp")]
    RegExp,
}

impl Operator {
    /// All operators, in wire-code order.
    pub const ALL: [Operator; 10] = [
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::Equal,
        Operator::NotEqual,
        Operator::GreaterThanOrEqual,
        Operator::GreaterThan,
        Operator::Between,
        Operator::Contain,
        Operator::NotContain,
        Operator::RegExp,
    ];

    /// The wire code of this operator.
    pub fn code(&self) -> &'static str {
        match self {
            Operator::LessThan => "lt",
            Operator::LessThanOrEqual => "lte",
            Operator::Equal => "eq",
            Operator::NotEqual => "neq",
            Operator::GreaterThanOrEqual => "gte",
            Operator::GreaterThan => "gt",
            Operator::Between => "between",
            Operator::Contain => "contain",
            Operator::NotContain => "ncontain",
            Operator::RegExp => "regexp",
        }
    }

    /// Check if this operator takes a single scalar.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::LessThan
                | Operator::LessThanOrEqual
                | Operator::Equal
                | Operator::NotEqual
                | Operator::GreaterThanOrEqual
                | Operator::GreaterThan
        )
    }

    /// Check if this operator takes a list of scalars.
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Operator::Between | Operator::Contain | Operator::NotContain
        )
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.code() == code)
            .ok_or_else(|| Error::UnknownOperator(code.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A regular expression given as source and flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexLiteral {
    /// Pattern source, without delimiters.
    pub source: String,
    /// Flags string (e.g. "gi").
    pub flags: String,
}

impl RegexLiteral {
    /// Create a regex literal.
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: flags.into(),
        }
    }
}

/// Operand of a match operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    /// A single scalar, for comparison operators.
    Scalar(Value),
    /// A list of scalars, for range and set operators.
    List(Vec<Value>),
    /// A regular expression, for the regexp operator.
    Pattern(RegexLiteral),
}

impl Operand {
    /// Short name of the operand shape, used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Operand::Scalar(_) => "scalar",
            Operand::List(_) => "list",
            Operand::Pattern(_) => "pattern",
        }
    }
}

/// A single operation applied to one property path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// The operator.
    pub operator: Operator,
    /// The operand; its shape must match the operator class.
    pub value: Operand,
}

impl Operation {
    /// Create an operation from its parts.
    pub fn new(operator: Operator, value: Operand) -> Self {
        Self { operator, value }
    }

    fn scalar(operator: Operator, value: impl Into<Value>) -> Self {
        Self::new(operator, Operand::Scalar(value.into()))
    }

    /// Create a less-than operation.
    pub fn lt(value: impl Into<Value>) -> Self {
        Self::scalar(Operator::LessThan, value)
    }

    /// Create a less-than-or-equal operation.
    pub fn lte(value: impl Into<Value>) -> Self {
        Self::scalar(Operator::LessThanOrEqual, value)
    }

    /// Create an equality operation.
    pub fn eq(value: impl Into<Value>) -> Self {
        Self::scalar(Operator::Equal, value)
    }

    /// Create a not-equal operation.
    pub fn neq(value: impl Into<Value>) -> Self {
        Self::scalar(Operator::NotEqual, value)
    }

    /// Create a greater-than-or-equal operation.
    pub fn gte(value: impl Into<Value>) -> Self {
        Self::scalar(Operator::GreaterThanOrEqual, value)
    }

    /// Create a greater-than operation.
    pub fn gt(value: impl Into<Value>) -> Self {
        Self::scalar(Operator::GreaterThan, value)
    }

    /// Create an inclusive range operation.
    pub fn between(low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Self::new(Operator::Between, Operand::List(vec![low.into(), high.into()]))
    }

    /// Create a set membership operation.
    pub fn contain(values: Vec<Value>) -> Self {
        Self::new(Operator::Contain, Operand::List(values))
    }

    /// Create a negated set membership operation.
    pub fn not_contain(values: Vec<Value>) -> Self {
        Self::new(Operator::NotContain, Operand::List(values))
    }

    /// Create a regular expression operation.
    pub fn regexp(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self::new(
            Operator::RegExp,
            Operand::Pattern(RegexLiteral::new(source, flags)),
        )
    }
}

/// One alternative filter rule: property path to operation.
///
/// Paths keep their insertion order, which is also their wire order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Match {
    operations: IndexMap<String, Operation>,
}

impl Match {
    /// Create an empty match.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation for a path, replacing any previous one.
    pub fn with(mut self, path: impl Into<String>, operation: Operation) -> Self {
        self.insert(path, operation);
        self
    }

    /// Set the operation for a path, returning the replaced one.
    pub fn insert(&mut self, path: impl Into<String>, operation: Operation) -> Option<Operation> {
        self.operations.insert(path.into(), operation)
    }

    /// Get the operation for a path.
    pub fn get(&self, path: &str) -> Option<&Operation> {
        self.operations.get(path)
    }

    /// Iterate over path/operation pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Operation)> {
        self.operations.iter().map(|(path, op)| (path.as_str(), op))
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if there are no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// The rules of a `pre` or `post` section.
///
/// Several rules are alternatives: a record matches when any rule matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rules {
    /// A single rule.
    Single(Match),
    /// Several alternative rules.
    Multiple(Vec<Match>),
}

impl Rules {
    /// View the rules as a slice, regardless of variant.
    pub fn as_slice(&self) -> &[Match] {
        match self {
            Rules::Single(rule) => std::slice::from_ref(rule),
            Rules::Multiple(rules) => rules,
        }
    }

    /// Build rules from a list: `None` when empty, `Single` for one rule.
    pub fn from_vec(mut rules: Vec<Match>) -> Option<Self> {
        match rules.len() {
            0 => None,
            1 => rules.pop().map(Rules::Single),
            _ => Some(Rules::Multiple(rules)),
        }
    }
}

impl From<Match> for Rules {
    fn from(rule: Match) -> Self {
        Rules::Single(rule)
    }
}

impl From<Vec<Match>> for Rules {
    fn from(rules: Vec<Match>) -> Self {
        Rules::Multiple(rules)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    /// Ascending order.
    #[serde(rename = "asc")]
    Ascending,
    /// Descending order.
    #[serde(rename = "desc")]
    Descending,
}

impl Order {
    /// The wire code of this order.
    pub fn code(&self) -> &'static str {
        match self {
            Order::Ascending => "asc",
            Order::Descending => "desc",
        }
    }
}

impl FromStr for Order {
    type Err = Error;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "asc" => Ok(Order::Ascending),
            "desc" => Ok(Order::Descending),
            _ => Err(Error::UnknownOrder(code.to_string())),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Sort order: property path to direction, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sort {
    fields: IndexMap<String, Order>,
}

impl Sort {
    /// Create an empty sort.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an ascending path.
    pub fn asc(self, path: impl Into<String>) -> Self {
        self.with(path, Order::Ascending)
    }

    /// Append a descending path.
    pub fn desc(self, path: impl Into<String>) -> Self {
        self.with(path, Order::Descending)
    }

    /// Append a path with the given order.
    pub fn with(mut self, path: impl Into<String>, order: Order) -> Self {
        self.insert(path, order);
        self
    }

    /// Set the order of a path. A path already present keeps its position.
    pub fn insert(&mut self, path: impl Into<String>, order: Order) -> Option<Order> {
        self.fields.insert(path.into(), order)
    }

    /// Get the order of a path.
    pub fn get(&self, path: &str) -> Option<Order> {
        self.fields.get(path).copied()
    }

    /// Iterate over path/order pairs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Order)> {
        self.fields.iter().map(|(path, order)| (path.as_str(), *order))
    }

    /// Number of sorted paths.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if there are no sorted paths.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Pagination window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    /// Number of results to skip.
    #[serde(default)]
    pub start: u64,
    /// Maximum number of results to return.
    #[serde(default)]
    pub count: u64,
}

impl Limit {
    /// Create a limit with start and count.
    pub fn new(start: u64, count: u64) -> Self {
        Self { start, count }
    }

    /// Create a limit for the first `count` results.
    pub fn first(count: u64) -> Self {
        Self { start: 0, count }
    }
}

/// A query: filter rules, sorting and pagination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Rules evaluated before the result set is built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre: Option<Rules>,
    /// Rules evaluated on the built result set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Rules>,
    /// Sort order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
    /// Pagination window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Limit>,
}

impl Query {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pre-match rules.
    pub fn with_pre(mut self, rules: impl Into<Rules>) -> Self {
        self.pre = Some(rules.into());
        self
    }

    /// Set the post-match rules.
    pub fn with_post(mut self, rules: impl Into<Rules>) -> Self {
        self.post = Some(rules.into());
        self
    }

    /// Set the sort order.
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set the pagination window.
    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check if no section is set.
    pub fn is_empty(&self) -> bool {
        self.pre.is_none() && self.post.is_none() && self.sort.is_none() && self.limit.is_none()
    }
}

/// A query decoded from a URL path, with its viewed fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryUrl {
    /// Viewed fields; empty means all fields.
    #[serde(default)]
    pub fields: Vec<String>,
    /// The decoded query sections.
    #[serde(flatten)]
    pub query: Query,
}
