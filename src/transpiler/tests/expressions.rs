//! Expression compiler tests.

use crate::ast::builders::*;
use crate::ast::*;
use crate::error::QailError;
use crate::transpiler::build_select;
use crate::transpiler::expr::{ExprContext, ParamContext};
use crate::transpiler::sources::{AliasMode, create_names};
use crate::transpiler::sql::sqlite::SqliteGenerator;

/// WHERE clause of `SELECT 1 FROM "model" AS m0` filtered by `expr`.
fn where_sql(expr: Expr) -> String {
    let query = Query::table("model").select(vec![lit(1)]).filter(expr);
    let sql = build_select(&query).unwrap().sql;
    sql.splitn(2, " WHERE ").nth(1).unwrap().to_string()
}

#[test]
fn test_comparison_operators() {
    assert_eq!(where_sql(eq(field(0, "x"), lit(1))), r#"(m0."x" = 1)"#);
    assert_eq!(where_sql(ne(field(0, "x"), lit(1))), r#"(m0."x" != 1)"#);
    assert_eq!(where_sql(lt(field(0, "x"), lit(1))), r#"(m0."x" < 1)"#);
    assert_eq!(where_sql(lte(field(0, "x"), lit(1))), r#"(m0."x" <= 1)"#);
    assert_eq!(where_sql(gt(field(0, "x"), lit(1))), r#"(m0."x" > 1)"#);
    assert_eq!(where_sql(gte(field(0, "x"), lit(-3))), r#"(m0."x" >= -3)"#);
    assert_eq!(where_sql(like(field(0, "x"), lit("a%"))), r#"(m0."x" LIKE 'a%')"#);
}

#[test]
fn test_nested_boolean_operands_are_parenthesized() {
    let expr = and(
        eq(field(0, "a"), param(1)),
        or(eq(field(0, "b"), param(2)), is_nil(field(0, "c"))),
    );
    assert_eq!(
        where_sql(expr),
        r#"((m0."a" = ?1) AND ((m0."b" = ?2) OR (m0."c" IS NULL)))"#
    );
}

#[test]
fn test_fragment_conjunct_keeps_its_own_precedence() {
    let expr = and(
        fragment("? = 1 OR ? = 2", vec![field(0, "a"), field(0, "b")]),
        eq(field(0, "c"), lit(3)),
    );
    assert_eq!(
        where_sql(expr),
        r#"((m0."a" = 1 OR m0."b" = 2) AND (m0."c" = 3))"#
    );
}

#[test]
fn test_compound_operands_are_parenthesized() {
    let expr = or(is_nil(field(0, "a")), in_params(field(0, "b"), [1, 2]));
    assert_eq!(
        where_sql(expr),
        r#"((m0."a" IS NULL) OR (m0."b" IN (?1, ?2)))"#
    );

    let expr = and(not(eq(field(0, "a"), lit(1))), field(0, "flag"));
    assert_eq!(where_sql(expr), r#"((NOT (m0."a" = 1)) AND m0."flag")"#);
}

#[test]
fn test_arithmetic() {
    let expr = gt(
        binary(BinaryOp::Mul, field(0, "price"), lit(2)),
        binary(BinaryOp::Add, field(0, "cost"), param(1.5)),
    );
    assert_eq!(where_sql(expr), r#"((m0."price" * 2) > (m0."cost" + ?1))"#);
}

#[test]
fn test_null_tests() {
    assert_eq!(where_sql(is_nil(field(0, "x"))), r#"(m0."x" IS NULL)"#);
    assert_eq!(where_sql(not(is_nil(field(0, "x")))), r#"(NOT (m0."x" IS NULL))"#);
}

#[test]
fn test_literals() {
    assert_eq!(where_sql(eq(field(0, "x"), lit(Value::Null))), r#"(m0."x" = NULL)"#);
    assert_eq!(where_sql(eq(field(0, "x"), lit(true))), r#"(m0."x" = 1)"#);
    assert_eq!(where_sql(eq(field(0, "x"), lit(false))), r#"(m0."x" = 0)"#);
    assert_eq!(where_sql(eq(field(0, "x"), lit("it's"))), r#"(m0."x" = 'it''s')"#);
    assert_eq!(
        where_sql(eq(field(0, "x"), lit(vec![0xde_u8, 0xad]))),
        r#"(m0."x" = X'DEAD')"#
    );
}

#[test]
fn test_in_list_mixes_literals_and_params() {
    let expr = in_list(field(0, "x"), vec![lit(1), param(2), lit("three")]);
    assert_eq!(where_sql(expr), r#"(m0."x" IN (1, ?1, 'three'))"#);
}

#[test]
fn test_in_params_one_placeholder_per_value() {
    let query = Query::table("model")
        .select(vec![lit(1)])
        .filter(eq(field(0, "y"), param("first")))
        .filter(in_params(field(0, "x"), [10, 20, 30]));
    let compiled = build_select(&query).unwrap();
    assert!(compiled.sql.ends_with(r#"WHERE (m0."y" = ?1) AND (m0."x" IN (?2, ?3, ?4))"#));
    assert_eq!(
        compiled.params,
        vec![
            Value::String("first".into()),
            Value::Int(10),
            Value::Int(20),
            Value::Int(30)
        ]
    );
}

#[test]
fn test_in_empty_list() {
    assert_eq!(
        where_sql(in_params(field(0, "x"), Vec::<i64>::new())),
        r#"(m0."x" IN ())"#
    );
    assert_eq!(where_sql(in_list(field(0, "x"), vec![])), r#"(m0."x" IN ())"#);
}

#[test]
fn test_in_fragment() {
    let sub = Fragment::new("SELECT id FROM banned WHERE reason = ?", vec![param("spam")]);
    assert_eq!(
        where_sql(in_fragment(field(0, "user_id"), sub)),
        r#"(m0."user_id" IN (SELECT id FROM banned WHERE reason = ?1))"#
    );
}

#[test]
fn test_fragment_splices_and_escaped_question_mark() {
    let expr = fragment(
        r"? LIKE 'what\?' OR ? > ?",
        vec![field(0, "title"), field(0, "score"), param(3)],
    );
    assert_eq!(
        where_sql(expr),
        r#"(m0."title" LIKE 'what?' OR m0."score" > ?1)"#
    );
}

#[test]
fn test_fragment_argument_count_mismatch() {
    let query = Query::table("model")
        .select(vec![lit(1)])
        .filter(fragment("? = ?", vec![field(0, "x")]));
    let err = build_select(&query).unwrap_err();
    assert!(matches!(err, QailError::InvalidQuery(_)));

    let query = Query::table("model")
        .select(vec![lit(1)])
        .filter(fragment("x = 1", vec![param(1)]));
    let err = build_select(&query).unwrap_err();
    assert!(matches!(err, QailError::InvalidQuery(_)));
}

#[test]
fn test_keyword_fragment_unsupported() {
    let expr = Expr::Fragment(Fragment::Keyword(vec![("x".into(), param(1))]));
    let query = Query::table("model").select(vec![lit(1)]).filter(expr);
    let err = build_select(&query).unwrap_err();
    assert!(err.is_unsupported());
}

#[test]
fn test_cast() {
    assert_eq!(
        where_sql(eq(cast(field(0, "x"), ColumnType::Decimal), lit(1))),
        r#"(CAST (m0."x" AS NUMERIC) = 1)"#
    );
    assert_eq!(
        where_sql(eq(cast(param("2"), ColumnType::Integer), field(0, "x"))),
        r#"(CAST (?1 AS INTEGER) = m0."x")"#
    );
    assert_eq!(
        where_sql(gt(cast(field(0, "ratio"), ColumnType::Float), lit(0.5))),
        r#"(CAST (m0."ratio" AS NUMERIC) > 0.5)"#
    );
}

#[test]
fn test_array_cast_unsupported() {
    let expr = eq(
        field(0, "tags"),
        cast(param("[]"), ColumnType::Array(Box::new(ColumnType::String))),
    );
    let query = Query::table("model").select(vec![lit(1)]).filter(expr);
    let err = build_select(&query).unwrap_err();
    assert_eq!(err.to_string(), "Array type is not supported by SQLite");
}

#[test]
fn test_functions() {
    let query = Query::table("model").select(vec![
        count(None),
        count(Some(field(0, "x"))),
        count_distinct(field(0, "x")),
        func("max", vec![field(0, "y")]),
    ]);
    assert_eq!(
        build_select(&query).unwrap().sql,
        r#"SELECT count(*), count(m0."x"), count(DISTINCT m0."x"), max(m0."y") FROM "model" AS m0"#
    );
}

#[test]
fn test_param_context_threads_across_compiles() {
    let query = Query::table("model");
    let generator = SqliteGenerator;
    let sources = create_names(&query, &generator, AliasMode::Select);
    let ctx = ExprContext::new(&generator, &sources);
    let mut params = ParamContext::new();

    let first = ctx.compile(&eq(field(0, "a"), param(1)), &mut params).unwrap();
    let second = ctx.compile(&in_params(field(0, "b"), ["x", "y"]), &mut params).unwrap();

    assert_eq!(first, r#"m0."a" = ?1"#);
    assert_eq!(second, r#"m0."b" IN (?2, ?3)"#);
    assert_eq!(params.len(), 3);
    assert_eq!(params.index, 3);
}

#[test]
fn test_error_in_later_filter_fails_statement() {
    let query = Query::table("model")
        .select(vec![field(0, "x")])
        .filter(eq(field(0, "a"), param(1)))
        .filter(eq(field(0, "b"), cast(param(2), ColumnType::Array(Box::new(ColumnType::Integer)))));
    assert!(build_select(&query).is_err());
}
