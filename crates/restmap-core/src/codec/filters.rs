//! Query serializer.
//!
//! A query is written as one `/`-joined path:
//!
//! ```text
//! query
//!   fields <n> <path>...
//!   pre    <rules> { <ops> { <path> <operator> <payload> }... }...
//!   post   <rules> { <ops> { <path> <operator> <payload> }... }...
//!   sort   <n> { <path> <order> }...
//!   limit  <start> <count>
//! ```
//!
//! Sections are emitted in that order, each only when present. The payload
//! of a comparison is one value, of a range or set operator a count followed
//! by that many values, and of a regexp the pattern source followed by its
//! flags. Payload values are percent-encoded; paths, counts and codes are not.
//!
//! Decoding is driven by the section prefixes and accepts sections in any
//! order.

use std::collections::HashSet;

use restmap_proto::{
    Limit, Match, Operand, Operation, Operator, Order, Query, QueryUrl, Rules, Sort,
};
use tracing::trace;

use super::tokens::Tokens;
use super::value::{decode_component, encode_component, pack_value, unpack_value};
use crate::catalog::{ColumnDescriptor, SchemaRegistry};
use crate::error::Error;

/// Magic query prefix.
pub const QUERY_PREFIX: &str = "query";

/// Magic viewed fields prefix.
pub const FIELDS_PREFIX: &str = "fields";

/// Magic pre-match prefix.
pub const PRE_MATCH_PREFIX: &str = "pre";

/// Magic post-match prefix.
pub const POST_MATCH_PREFIX: &str = "post";

/// Magic sort prefix.
pub const SORT_PREFIX: &str = "sort";

/// Magic limit prefix.
pub const LIMIT_PREFIX: &str = "limit";

const FIELDS_SECTION: &str = "array of viewed fields";
const MATCH_SECTION: &str = "array of matching rules";
const SORT_SECTION: &str = "array of sorting fields";
const LIMIT_SECTION: &str = "array of limits";

/// Build a query path from a query and a list of viewed fields.
///
/// Returns an empty string when there is nothing to serialize.
pub fn to_url<R, S>(
    registry: &R,
    model: &str,
    query: Option<&Query>,
    fields: &[S],
) -> Result<String, Error>
where
    R: SchemaRegistry + ?Sized,
    S: AsRef<str>,
{
    let mut tokens = Vec::new();

    if !fields.is_empty() {
        pack_viewed_fields(&mut tokens, fields);
    }
    if let Some(query) = query {
        if let Some(pre) = &query.pre {
            pack_match_rules(&mut tokens, PRE_MATCH_PREFIX, registry, model, pre)?;
        }
        if let Some(post) = &query.post {
            pack_match_rules(&mut tokens, POST_MATCH_PREFIX, registry, model, post)?;
        }
        if let Some(sort) = &query.sort {
            pack_sort(&mut tokens, registry, model, sort)?;
        }
        if let Some(limit) = &query.limit {
            pack_limit(&mut tokens, limit);
        }
    }

    if tokens.is_empty() {
        return Ok(String::new());
    }
    trace!(model, tokens = tokens.len(), "packed query path");
    Ok(format!("{}/{}", QUERY_PREFIX, tokens.join("/")))
}

/// Parse a query path back into a query and its viewed fields.
///
/// A path that does not start with the `query` prefix yields an empty
/// result. One trailing `/` after the last section is ignored. Any
/// malformed section is an error.
pub fn from_url<R>(registry: &R, model: &str, url: &str) -> Result<QueryUrl, Error>
where
    R: SchemaRegistry + ?Sized,
{
    let mut tokens = Tokens::new(url);
    let mut result = QueryUrl::default();

    if tokens.pop() != Some(QUERY_PREFIX) {
        return Ok(result);
    }

    while let Some(prefix) = tokens.peek() {
        match prefix {
            FIELDS_PREFIX => result.fields = unpack_viewed_fields(&mut tokens)?,
            PRE_MATCH_PREFIX => {
                result.query.pre =
                    unpack_match_rules(&mut tokens, PRE_MATCH_PREFIX, registry, model)?
            }
            POST_MATCH_PREFIX => {
                result.query.post =
                    unpack_match_rules(&mut tokens, POST_MATCH_PREFIX, registry, model)?
            }
            SORT_PREFIX => result.query.sort = Some(unpack_sort(&mut tokens, registry, model)?),
            LIMIT_PREFIX => result.query.limit = Some(unpack_limit(&mut tokens)?),
            // A single trailing separator.
            "" if tokens.remaining() == 1 => {
                tokens.pop();
            }
            other => return Err(Error::UnsupportedSerialization(other.to_string())),
        }
    }

    trace!(model, fields = result.fields.len(), "unpacked query path");
    Ok(result)
}

/// Resolve the leaf column of a path.
fn leaf_column<R>(
    registry: &R,
    model: &str,
    path: &str,
    usage: &'static str,
) -> Result<ColumnDescriptor, Error>
where
    R: SchemaRegistry + ?Sized,
{
    registry
        .resolve_path_columns(model, path)
        .and_then(|mut columns| columns.pop())
        .ok_or_else(|| Error::InvalidPath {
            usage,
            model: model.to_string(),
            path: path.to_string(),
        })
}

// The count is taken before de-duplication while the payload is
// de-duplicated; decoders reading the count will run past the payload when
// the list had duplicates.
fn pack_viewed_fields<S: AsRef<str>>(tokens: &mut Vec<String>, fields: &[S]) {
    tokens.push(FIELDS_PREFIX.to_string());
    tokens.push(fields.len().to_string());

    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        let field = field.as_ref();
        if seen.insert(field) {
            tokens.push(field.to_string());
        }
    }
}

fn unpack_viewed_fields(tokens: &mut Tokens<'_>) -> Result<Vec<String>, Error> {
    tokens.expect(FIELDS_PREFIX, FIELDS_SECTION)?;
    let length = tokens.take_count(FIELDS_SECTION)?;
    if tokens.remaining() < length {
        return Err(Error::InsufficientTokens {
            section: FIELDS_SECTION,
        });
    }

    let mut fields = Vec::with_capacity(length);
    for _ in 0..length {
        fields.push(tokens.take(FIELDS_SECTION)?.to_string());
    }
    Ok(fields)
}

fn pack_operation(
    tokens: &mut Vec<String>,
    column: &ColumnDescriptor,
    path: &str,
    operation: &Operation,
) -> Result<(), Error> {
    let operator = operation.operator;
    match (&operation.value, operator) {
        (Operand::Scalar(value), op) if op.is_comparison() => {
            tokens.push(path.to_string());
            tokens.push(op.code().to_string());
            tokens.push(encode_component(&pack_value(column, value)));
        }
        (Operand::List(values), op) if op.is_list() => {
            tokens.push(path.to_string());
            tokens.push(op.code().to_string());
            tokens.push(values.len().to_string());
            tokens.extend(
                values
                    .iter()
                    .map(|value| encode_component(&pack_value(column, value))),
            );
        }
        (Operand::Pattern(pattern), Operator::RegExp) => {
            tokens.push(path.to_string());
            tokens.push(Operator::RegExp.code().to_string());
            tokens.push(encode_component(&pattern.source));
            tokens.push(encode_component(&pattern.flags));
        }
        (value, op) => {
            let expected = if op.is_comparison() {
                "scalar"
            } else if op.is_list() {
                "list"
            } else {
                "pattern"
            };
            return Err(Error::InvalidOperand {
                path: path.to_string(),
                expected,
                actual: value.shape(),
            });
        }
    }
    Ok(())
}

fn pack_match_rules<R>(
    tokens: &mut Vec<String>,
    prefix: &str,
    registry: &R,
    model: &str,
    rules: &Rules,
) -> Result<(), Error>
where
    R: SchemaRegistry + ?Sized,
{
    let mut rules_list = Vec::new();
    let mut rules_counter = 0usize;

    for rule in rules.as_slice() {
        let mut operations = Vec::new();
        let mut operations_counter = 0usize;
        for (path, operation) in rule.iter() {
            let column = leaf_column(registry, model, path, "matching")?;
            pack_operation(&mut operations, &column, path, operation)?;
            operations_counter += 1;
        }
        if operations_counter > 0 {
            rules_list.push(operations_counter.to_string());
            rules_list.append(&mut operations);
            rules_counter += 1;
        }
    }

    tokens.push(prefix.to_string());
    tokens.push(rules_counter.to_string());
    tokens.append(&mut rules_list);
    Ok(())
}

fn unpack_operation(
    tokens: &mut Tokens<'_>,
    rule: &mut Match,
    column: &ColumnDescriptor,
    path: &str,
    code: &str,
) -> Result<(), Error> {
    let operator: Operator = code.parse().map_err(|_| Error::InvalidOperator {
        path: path.to_string(),
        operator: code.to_string(),
    })?;

    let value = if operator.is_comparison() {
        let token = tokens.take(MATCH_SECTION)?;
        Operand::Scalar(unpack_value(column, &decode_component(token)?)?)
    } else if operator.is_list() {
        let total = tokens.take_count(MATCH_SECTION)?;
        let mut values = Vec::new();
        for _ in 0..total {
            let token = tokens.take(MATCH_SECTION)?;
            values.push(unpack_value(column, &decode_component(token)?)?);
        }
        Operand::List(values)
    } else {
        let source = decode_component(tokens.take(MATCH_SECTION)?)?;
        let flags = decode_component(tokens.take(MATCH_SECTION)?)?;
        Operand::Pattern(restmap_proto::RegexLiteral { source, flags })
    };

    rule.insert(path, Operation::new(operator, value));
    Ok(())
}

fn unpack_match_rules<R>(
    tokens: &mut Tokens<'_>,
    prefix: &str,
    registry: &R,
    model: &str,
) -> Result<Option<Rules>, Error>
where
    R: SchemaRegistry + ?Sized,
{
    tokens.expect(prefix, MATCH_SECTION)?;

    let mut rules = Vec::new();
    for _ in 0..tokens.take_count(MATCH_SECTION)? {
        let mut rule = Match::new();
        for _ in 0..tokens.take_count(MATCH_SECTION)? {
            let path = tokens.take(MATCH_SECTION)?;
            let column = leaf_column(registry, model, path, "matching")?;
            let code = tokens.take(MATCH_SECTION)?;
            unpack_operation(tokens, &mut rule, &column, path, code)?;
        }
        rules.push(rule);
    }

    Ok(Rules::from_vec(rules))
}

fn pack_sort<R>(
    tokens: &mut Vec<String>,
    registry: &R,
    model: &str,
    sort: &Sort,
) -> Result<(), Error>
where
    R: SchemaRegistry + ?Sized,
{
    tokens.push(SORT_PREFIX.to_string());
    tokens.push(sort.len().to_string());
    for (path, order) in sort.iter() {
        leaf_column(registry, model, path, "sorting")?;
        tokens.push(path.to_string());
        tokens.push(order.code().to_string());
    }
    Ok(())
}

fn unpack_sort<R>(tokens: &mut Tokens<'_>, registry: &R, model: &str) -> Result<Sort, Error>
where
    R: SchemaRegistry + ?Sized,
{
    tokens.expect(SORT_PREFIX, SORT_SECTION)?;

    let mut sort = Sort::new();
    for _ in 0..tokens.take_count(SORT_SECTION)? {
        let path = tokens.take(SORT_SECTION)?;
        let code = tokens.take(SORT_SECTION)?;
        leaf_column(registry, model, path, "sorting")?;
        let order: Order = code.parse().map_err(|_| Error::InvalidOrder {
            path: path.to_string(),
            order: code.to_string(),
        })?;
        sort.insert(path, order);
    }
    Ok(sort)
}

fn pack_limit(tokens: &mut Vec<String>, limit: &Limit) {
    tokens.push(LIMIT_PREFIX.to_string());
    tokens.push(limit.start.to_string());
    tokens.push(limit.count.to_string());
}

fn unpack_limit(tokens: &mut Tokens<'_>) -> Result<Limit, Error> {
    tokens.expect(LIMIT_PREFIX, LIMIT_SECTION)?;

    let mut number = || {
        tokens
            .pop()
            .and_then(|token| token.parse::<u64>().ok())
            .unwrap_or(0)
    };
    let start = number();
    let count = number();
    Ok(Limit { start, count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, EntityDef, FieldDef, FieldType, ScalarType};
    use pretty_assertions::assert_eq;

    fn user_catalog() -> Catalog {
        Catalog::new().with_entity(
            EntityDef::new("User", "users", "id")
                .with_field(FieldDef::new("name", FieldType::scalar(ScalarType::String)))
                .with_field(FieldDef::new("age", FieldType::scalar(ScalarType::Int32))),
        )
    }

    #[test]
    fn test_pack_viewed_fields_dedups_payload() {
        let mut tokens = Vec::new();
        pack_viewed_fields(&mut tokens, &["name", "name", "age"]);
        assert_eq!(tokens, vec!["fields", "3", "name", "age"]);
    }

    #[test]
    fn test_unpack_viewed_fields() {
        let mut tokens = Tokens::new("fields/2/name/age");
        assert_eq!(
            unpack_viewed_fields(&mut tokens).unwrap(),
            vec!["name".to_string(), "age".to_string()]
        );
        assert_eq!(tokens.remaining(), 0);

        let mut short = Tokens::new("fields/3/name");
        assert_eq!(
            unpack_viewed_fields(&mut short),
            Err(Error::InsufficientTokens {
                section: FIELDS_SECTION
            })
        );
    }

    #[test]
    fn test_pack_operation_shapes() {
        let catalog = user_catalog();
        let column = leaf_column(&catalog, "User", "age", "matching").unwrap();

        let mut tokens = Vec::new();
        pack_operation(&mut tokens, &column, "age", &Operation::between(18, 65)).unwrap();
        assert_eq!(tokens, vec!["age", "between", "2", "18", "65"]);

        let mut tokens = Vec::new();
        pack_operation(&mut tokens, &column, "age", &Operation::regexp("^1", "g")).unwrap();
        assert_eq!(tokens, vec!["age", "regexp", "%5E1", "g"]);

        let err = pack_operation(
            &mut Vec::new(),
            &column,
            "age",
            &Operation::new(Operator::Contain, Operand::Scalar(1.into())),
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidOperand {
                path: "age".into(),
                expected: "list",
                actual: "scalar",
            }
        );
    }

    #[test]
    fn test_pack_match_rules_skips_empty_rules() {
        let catalog = user_catalog();
        let rules = Rules::Multiple(vec![
            Match::new(),
            Match::new().with("name", Operation::eq("Bob")),
            Match::new(),
        ]);

        let mut tokens = Vec::new();
        pack_match_rules(&mut tokens, PRE_MATCH_PREFIX, &catalog, "User", &rules).unwrap();
        assert_eq!(tokens, vec!["pre", "1", "1", "name", "eq", "Bob"]);
    }

    #[test]
    fn test_unpack_match_rules_arity() {
        let catalog = user_catalog();

        let mut none = Tokens::new("pre/0");
        assert_eq!(
            unpack_match_rules(&mut none, PRE_MATCH_PREFIX, &catalog, "User").unwrap(),
            None
        );

        let mut two = Tokens::new("post/2/1/age/gt/1/1/age/lt/9");
        let rules = unpack_match_rules(&mut two, POST_MATCH_PREFIX, &catalog, "User")
            .unwrap()
            .unwrap();
        assert_eq!(
            rules,
            Rules::Multiple(vec![
                Match::new().with("age", Operation::gt(1)),
                Match::new().with("age", Operation::lt(9)),
            ])
        );
    }

    #[test]
    fn test_unpack_limit_defaults() {
        let mut tokens = Tokens::new("limit/x");
        assert_eq!(unpack_limit(&mut tokens).unwrap(), Limit::new(0, 0));

        let mut tokens = Tokens::new("limit/5/20");
        assert_eq!(unpack_limit(&mut tokens).unwrap(), Limit::new(5, 20));
    }

    #[test]
    fn test_sort_wire_format() {
        let catalog = user_catalog();
        let query = Query::new()
            .with_sort(Sort::new().desc("age"))
            .with_limit(Limit::new(0, 10));

        let path = to_url(&catalog, "User", Some(&query), &[] as &[&str]).unwrap();
        assert_eq!(path, "query/sort/1/age/desc/limit/0/10");
    }
}
