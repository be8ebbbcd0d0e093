//! Integration tests for the query path codec.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use restmap_core::catalog::{Catalog, EntityDef, FieldDef, FieldType, ScalarType};
use restmap_core::{from_url, to_url, Error};
use restmap_proto::{Limit, Match, Operand, Operation, Operator, Query, QueryUrl, Rules, Sort, Value};

const NO_FIELDS: &[&str] = &[];

fn user_catalog() -> Catalog {
    let user = EntityDef::new("User", "users", "id")
        .with_field(FieldDef::new("id", FieldType::scalar(ScalarType::Uuid)))
        .with_field(FieldDef::new("name", FieldType::scalar(ScalarType::String)))
        .with_field(FieldDef::new("age", FieldType::scalar(ScalarType::Int32)))
        .with_field(FieldDef::optional(
            "email",
            FieldType::optional_scalar(ScalarType::String),
        ))
        .with_field(FieldDef::new("active", FieldType::scalar(ScalarType::Bool)))
        .with_field(FieldDef::new(
            "score",
            FieldType::scalar(ScalarType::Decimal {
                precision: 6,
                scale: 2,
            }),
        ))
        .with_field(FieldDef::new("created", FieldType::scalar(ScalarType::Date)))
        .with_field(FieldDef::new("address", FieldType::embedded("Address")));

    let address = EntityDef::new("Address", "addresses", "id")
        .with_field(FieldDef::new("city", FieldType::scalar(ScalarType::String)))
        .with_field(FieldDef::new("zip", FieldType::scalar(ScalarType::Int64)));

    Catalog::new().with_entity(user).with_entity(address)
}

#[test]
fn test_sort_and_limit_wire_format() {
    let catalog = user_catalog();
    let query = Query::new()
        .with_sort(Sort::new().desc("age"))
        .with_limit(Limit::new(0, 10));

    let path = to_url(&catalog, "User", Some(&query), NO_FIELDS).unwrap();
    assert_eq!(path, "query/sort/1/age/desc/limit/0/10");

    let decoded = from_url(&catalog, "User", &path).unwrap();
    assert_eq!(
        decoded,
        QueryUrl {
            fields: vec![],
            query: Query::new()
                .with_sort(Sort::new().desc("age"))
                .with_limit(Limit::new(0, 10)),
        }
    );
}

#[test]
fn test_empty_query() {
    let catalog = user_catalog();

    assert_eq!(to_url(&catalog, "User", None, NO_FIELDS).unwrap(), "");
    assert_eq!(
        to_url(&catalog, "User", Some(&Query::new()), NO_FIELDS).unwrap(),
        ""
    );

    let decoded = from_url(&catalog, "User", "").unwrap();
    assert_eq!(decoded, QueryUrl::default());
    assert!(decoded.fields.is_empty());
    assert!(decoded.query.is_empty());
}

#[test]
fn test_path_without_query_prefix_is_empty() {
    let catalog = user_catalog();
    assert_eq!(
        from_url(&catalog, "User", "users/42").unwrap(),
        QueryUrl::default()
    );
}

#[test]
fn test_full_roundtrip() {
    let catalog = user_catalog();
    let created = Utc.with_ymd_and_hms(2021, 6, 1, 12, 30, 0).unwrap();

    let query = Query::new()
        .with_pre(vec![
            Match::new()
                .with("name", Operation::eq("Ann Lee/ü & co"))
                .with("age", Operation::between(18, 65))
                .with("score", Operation::gte(9.5)),
            Match::new()
                .with("created", Operation::lt(created))
                .with("active", Operation::eq(true))
                .with("email", Operation::regexp("^a.+@x\\.com$", "i")),
        ])
        .with_post(
            Match::new()
                .with(
                    "address.city",
                    Operation::contain(vec!["Paris".into(), "São Paulo".into()]),
                )
                .with("address.zip", Operation::not_contain(vec![75001.into()])),
        )
        .with_sort(Sort::new().desc("age").asc("address.city"))
        .with_limit(Limit::new(20, 10));
    let fields = ["name", "age", "address.city"];

    let path = to_url(&catalog, "User", Some(&query), &fields).unwrap();
    assert!(path.starts_with("query/fields/3/name/age/address.city/pre/2/3/"));
    assert!(path.ends_with("/sort/2/age/desc/address.city/asc/limit/20/10"));
    assert!(path.contains("/name/eq/Ann%20Lee%2F%C3%BC%20%26%20co/"));
    assert!(path.contains("/created/lt/1622550600000/"));
    assert!(path.contains("/email/regexp/%5Ea.%2B%40x%5C.com%24/i/"));

    let decoded = from_url(&catalog, "User", &path).unwrap();
    assert_eq!(
        decoded.fields,
        vec!["name".to_string(), "age".to_string(), "address.city".to_string()]
    );

    // Decimal columns come back as floats, everything else unchanged.
    let expected = Query::new()
        .with_pre(vec![
            Match::new()
                .with("name", Operation::eq("Ann Lee/ü & co"))
                .with("age", Operation::between(18, 65))
                .with("score", Operation::gte(9.5)),
            Match::new()
                .with("created", Operation::lt(created))
                .with("active", Operation::eq(true))
                .with("email", Operation::regexp("^a.+@x\\.com$", "i")),
        ])
        .with_post(
            Match::new()
                .with(
                    "address.city",
                    Operation::contain(vec!["Paris".into(), "São Paulo".into()]),
                )
                .with("address.zip", Operation::not_contain(vec![75001.into()])),
        )
        .with_sort(Sort::new().desc("age").asc("address.city"))
        .with_limit(Limit::new(20, 10));
    assert_eq!(decoded.query, expected);
}

#[test]
fn test_decimal_integer_comes_back_as_float() {
    let catalog = user_catalog();
    let query = Query::new().with_pre(Match::new().with("score", Operation::eq(7)));

    let path = to_url(&catalog, "User", Some(&query), NO_FIELDS).unwrap();
    assert_eq!(path, "query/pre/1/1/score/eq/7");

    let decoded = from_url(&catalog, "User", &path).unwrap();
    assert_eq!(
        decoded.query.pre,
        Some(Rules::Single(Match::new().with("score", Operation::eq(7.0))))
    );
}

#[test]
fn test_boolean_and_null_share_a_token() {
    let catalog = user_catalog();
    let query = Query::new().with_pre(
        Match::new()
            .with("active", Operation::eq(Value::Null))
            .with("email", Operation::neq(false)),
    );

    let path = to_url(&catalog, "User", Some(&query), NO_FIELDS).unwrap();
    assert_eq!(path, "query/pre/1/2/active/eq/0/email/neq/0");

    // The column format decides: boolean column reads false, nullable
    // string column reads null.
    let decoded = from_url(&catalog, "User", &path).unwrap();
    assert_eq!(
        decoded.query.pre,
        Some(Rules::Single(
            Match::new()
                .with("active", Operation::eq(false))
                .with("email", Operation::neq(Value::Null))
        ))
    );
}

#[test]
fn test_empty_string_operand_roundtrip() {
    let catalog = user_catalog();
    let query = Query::new().with_pre(Match::new().with("name", Operation::eq("")));

    let path = to_url(&catalog, "User", Some(&query), NO_FIELDS).unwrap();
    assert_eq!(path, "query/pre/1/1/name/eq/");

    let decoded = from_url(&catalog, "User", &path).unwrap();
    assert_eq!(decoded.query, query);
}

#[test]
fn test_float_on_integer_column_truncates() {
    let catalog = user_catalog();
    let query = Query::new().with_pre(Match::new().with("age", Operation::gte(17.5)));

    let path = to_url(&catalog, "User", Some(&query), NO_FIELDS).unwrap();
    assert_eq!(path, "query/pre/1/1/age/gte/17.5");

    // The integer column keeps the leading integer of the token.
    let decoded = from_url(&catalog, "User", &path).unwrap();
    assert_eq!(
        decoded.query.pre,
        Some(Rules::Single(Match::new().with("age", Operation::gte(17))))
    );
}

#[test]
fn test_large_and_small_floats_use_exponent_form() {
    let catalog = user_catalog();
    let query = Query::new().with_pre(
        Match::new()
            .with("score", Operation::between(1e-7, 1e21))
            .with("age", Operation::neq(-0.0)),
    );

    let path = to_url(&catalog, "User", Some(&query), NO_FIELDS).unwrap();
    assert_eq!(path, "query/pre/1/2/score/between/2/1e-7/1e%2B21/age/neq/0");

    let decoded = from_url(&catalog, "User", &path).unwrap();
    assert_eq!(
        decoded.query.pre,
        Some(Rules::Single(
            Match::new()
                .with("score", Operation::between(1e-7, 1e21))
                .with("age", Operation::neq(0))
        ))
    );
}

#[test]
fn test_trailing_separator_is_ignored() {
    let catalog = user_catalog();

    let decoded = from_url(&catalog, "User", "query/limit/0/10/").unwrap();
    assert_eq!(decoded.query.limit, Some(Limit::new(0, 10)));

    let decoded = from_url(&catalog, "User", "/query/").unwrap();
    assert_eq!(decoded, QueryUrl::default());

    // An empty operand followed by the trailing separator.
    let decoded = from_url(&catalog, "User", "query/pre/1/1/name/eq//").unwrap();
    assert_eq!(
        decoded.query.pre,
        Some(Rules::Single(Match::new().with("name", Operation::eq(""))))
    );

    // Only one, and only where a section prefix is expected.
    assert_eq!(
        from_url(&catalog, "User", "query/limit/0/10//").unwrap_err(),
        Error::UnsupportedSerialization(String::new())
    );
}

#[test]
fn test_empty_rules_are_dropped() {
    let catalog = user_catalog();
    let query = Query::new().with_pre(vec![Match::new(), Match::new()]);

    let path = to_url(&catalog, "User", Some(&query), NO_FIELDS).unwrap();
    assert_eq!(path, "query/pre/0");

    let decoded = from_url(&catalog, "User", &path).unwrap();
    assert_eq!(decoded.query.pre, None);
}

#[test]
fn test_sections_in_any_order() {
    let catalog = user_catalog();
    let decoded = from_url(
        &catalog,
        "User",
        "./query/limit/5/10/sort/1/name/asc/fields/1/age/post/1/1/age/gt/3",
    )
    .unwrap();

    assert_eq!(decoded.fields, vec!["age".to_string()]);
    assert_eq!(decoded.query.limit, Some(Limit::new(5, 10)));
    assert_eq!(decoded.query.sort, Some(Sort::new().asc("name")));
    assert_eq!(
        decoded.query.post,
        Some(Rules::Single(Match::new().with("age", Operation::gt(3))))
    );
    assert_eq!(decoded.query.pre, None);
}

#[test]
fn test_limit_defaults_when_missing() {
    let catalog = user_catalog();
    let decoded = from_url(&catalog, "User", "query/limit").unwrap();
    assert_eq!(decoded.query.limit, Some(Limit::new(0, 0)));
}

#[test]
fn test_duplicate_fields_count_is_pre_dedup() {
    let catalog = user_catalog();

    let path = to_url(&catalog, "User", None, &["name", "name", "age"]).unwrap();
    assert_eq!(path, "query/fields/3/name/age");

    // The declared count is larger than the payload: decoding alone fails.
    let err = from_url(&catalog, "User", &path).unwrap_err();
    assert!(matches!(err, Error::InsufficientTokens { .. }));

    // Followed by another section, the decoder reads into it and then
    // trips over the leftover tokens.
    let query = Query::new().with_limit(Limit::new(0, 10));
    let path = to_url(&catalog, "User", Some(&query), &["name", "name", "age"]).unwrap();
    assert_eq!(path, "query/fields/3/name/age/limit/0/10");
    assert_eq!(
        from_url(&catalog, "User", &path).unwrap_err(),
        Error::UnsupportedSerialization("0".into())
    );
}

#[test]
fn test_unknown_prefix_is_rejected() {
    let catalog = user_catalog();
    let err = from_url(&catalog, "User", "query/bogus/1").unwrap_err();

    assert_eq!(err, Error::UnsupportedSerialization("bogus".into()));
    assert!(err.to_string().contains("unsupported data serialization"));
}

#[test]
fn test_operand_shape_is_enforced() {
    let catalog = user_catalog();

    let between = Query::new().with_pre(Match::new().with(
        "age",
        Operation::new(Operator::Between, Operand::Scalar(18.into())),
    ));
    assert!(matches!(
        to_url(&catalog, "User", Some(&between), NO_FIELDS),
        Err(Error::InvalidOperand {
            expected: "list",
            ..
        })
    ));

    let regexp = Query::new().with_pre(Match::new().with(
        "name",
        Operation::new(Operator::RegExp, Operand::Scalar("^a".into())),
    ));
    assert!(matches!(
        to_url(&catalog, "User", Some(&regexp), NO_FIELDS),
        Err(Error::InvalidOperand {
            expected: "pattern",
            ..
        })
    ));

    let equal = Query::new().with_pre(
        Match::new().with("age", Operation::new(Operator::Equal, Operand::List(vec![]))),
    );
    assert!(matches!(
        to_url(&catalog, "User", Some(&equal), NO_FIELDS),
        Err(Error::InvalidOperand {
            expected: "scalar",
            ..
        })
    ));
}

#[test]
fn test_invalid_paths() {
    let catalog = user_catalog();

    let pre = Query::new().with_pre(Match::new().with("missing", Operation::eq(1)));
    assert!(matches!(
        to_url(&catalog, "User", Some(&pre), NO_FIELDS),
        Err(Error::InvalidPath {
            usage: "matching",
            ..
        })
    ));

    let sort = Query::new().with_sort(Sort::new().asc("address.street"));
    assert!(matches!(
        to_url(&catalog, "User", Some(&sort), NO_FIELDS),
        Err(Error::InvalidPath {
            usage: "sorting",
            ..
        })
    ));

    assert!(matches!(
        from_url(&catalog, "User", "query/pre/1/1/missing/eq/1"),
        Err(Error::InvalidPath { .. })
    ));
    assert!(matches!(
        from_url(&catalog, "User", "query/sort/1/missing/asc"),
        Err(Error::InvalidPath { .. })
    ));
}

#[test]
fn test_invalid_codes() {
    let catalog = user_catalog();

    assert_eq!(
        from_url(&catalog, "User", "query/pre/1/1/age/like/1").unwrap_err(),
        Error::InvalidOperator {
            path: "age".into(),
            operator: "like".into(),
        }
    );
    assert_eq!(
        from_url(&catalog, "User", "query/sort/1/age/up").unwrap_err(),
        Error::InvalidOrder {
            path: "age".into(),
            order: "up".into(),
        }
    );
}

#[test]
fn test_truncated_input() {
    let catalog = user_catalog();

    for path in [
        "query/pre",
        "query/pre/1",
        "query/pre/1/2/age/eq/1",
        "query/post/1/1/age/between/3/1/2",
        "query/post/1/1/name/regexp/abc",
        "query/sort/2/age/asc",
        "query/fields/2/name",
    ] {
        assert!(
            matches!(
                from_url(&catalog, "User", path),
                Err(Error::InsufficientTokens { .. })
            ),
            "expected truncation error for {path}"
        );
    }
}

#[test]
fn test_invalid_counts_and_values() {
    let catalog = user_catalog();

    assert_eq!(
        from_url(&catalog, "User", "query/pre/many").unwrap_err(),
        Error::InvalidCount("many".into())
    );
    assert!(matches!(
        from_url(&catalog, "User", "query/pre/1/1/age/eq/old"),
        Err(Error::InvalidValue {
            format: "integer",
            ..
        })
    ));
    assert!(matches!(
        from_url(&catalog, "User", "query/pre/1/1/name/eq/%FF"),
        Err(Error::InvalidEncoding(_))
    ));
}
