//! INSERT, UPDATE and DELETE tests, including bulk forms and RETURNING.

use crate::ast::builders::*;
use crate::ast::*;
use crate::error::QailError;
use crate::returning::{DmlOperation, split_returning};
use crate::transpiler::{
    build_delete, build_delete_all, build_insert, build_update, build_update_all,
};

#[test]
fn test_insert_with_returning() {
    let compiled = build_insert(
        None,
        "model",
        &[("x", Value::Int(1)), ("y", Value::Int(2))],
        &["id"],
    )
    .unwrap();
    assert_eq!(
        compiled.sql,
        r#"INSERT INTO "model" ("x", "y") VALUES (?1, ?2) ;--RETURNING ON INSERT "model","id""#
    );
    assert_eq!(compiled.params, vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_insert_without_returning() {
    let compiled = build_insert(Some("foo"), "model", &[("x", Value::from("a"))], &[]).unwrap();
    assert_eq!(compiled.sql, r#"INSERT INTO "foo"."model" ("x") VALUES (?1)"#);
}

#[test]
fn test_insert_default_values() {
    let compiled = build_insert(None, "model", &[], &[]).unwrap();
    assert_eq!(compiled.sql, r#"INSERT INTO "model" DEFAULT VALUES"#);
    assert!(compiled.params.is_empty());

    let compiled = build_insert(None, "model", &[], &["id", "inserted_at"]).unwrap();
    assert_eq!(
        compiled.sql,
        r#"INSERT INTO "model" DEFAULT VALUES ;--RETURNING ON INSERT "model","id","inserted_at""#
    );
}

#[test]
fn test_update_numbers_set_before_where() {
    let compiled = build_update(
        Some("foo"),
        "model",
        &[("x", Value::Int(1)), ("y", Value::from("a"))],
        &[("id", Value::Int(9)), ("rev", Value::Int(4))],
        &[],
    )
    .unwrap();
    assert_eq!(
        compiled.sql,
        r#"UPDATE "foo"."model" SET "x" = ?1, "y" = ?2 WHERE "id" = ?3 AND "rev" = ?4"#
    );
    assert_eq!(
        compiled.params,
        vec![
            Value::Int(1),
            Value::String("a".into()),
            Value::Int(9),
            Value::Int(4)
        ]
    );
}

#[test]
fn test_update_with_returning() {
    let compiled = build_update(
        Some("foo"),
        "model",
        &[("x", Value::Int(1))],
        &[("id", Value::Int(9))],
        &["id", "x"],
    )
    .unwrap();
    assert_eq!(
        compiled.sql,
        r#"UPDATE "foo"."model" SET "x" = ?1 WHERE "id" = ?2 ;--RETURNING ON UPDATE "foo"."model","id","x""#
    );
}

#[test]
fn test_update_without_fields() {
    let err = build_update(None, "model", &[], &[("id", Value::Int(1))], &[]).unwrap_err();
    assert!(matches!(err, QailError::InvalidQuery(_)));
}

#[test]
fn test_update_without_filters() {
    let err = build_update(None, "model", &[("x", Value::Int(1))], &[], &["id"]).unwrap_err();
    assert!(matches!(err, QailError::InvalidQuery(_)));
}

#[test]
fn test_delete_without_filters() {
    let err = build_delete(None, "model", &[], &["id"]).unwrap_err();
    assert!(matches!(err, QailError::InvalidQuery(_)));

    let err = build_delete(Some("foo"), "model", &[], &[]).unwrap_err();
    assert!(matches!(err, QailError::InvalidQuery(_)));
}

#[test]
fn test_delete() {
    let compiled = build_delete(
        None,
        "model",
        &[("id", Value::Int(1)), ("rev", Value::Int(2))],
        &[],
    )
    .unwrap();
    assert_eq!(compiled.sql, r#"DELETE FROM "model" WHERE "id" = ?1 AND "rev" = ?2"#);
}

#[test]
fn test_delete_with_returning_round_trips() {
    let compiled = build_delete(Some("foo"), "model", &[("id", Value::Int(1))], &["title"]).unwrap();
    let (statement, hint) = split_returning(&compiled.sql).unwrap();
    assert_eq!(statement, r#"DELETE FROM "foo"."model" WHERE "id" = ?1"#);
    let hint = hint.unwrap();
    assert_eq!(hint.operation, DmlOperation::Delete);
    assert_eq!(hint.prefix.as_deref(), Some("foo"));
    assert_eq!(hint.table, "model");
    assert_eq!(hint.columns, vec!["title"]);
}

#[test]
fn test_delete_all() {
    let query = Query::table("model").filter(eq(field(0, "x"), lit(123)));
    let compiled = build_delete_all(&query).unwrap();
    assert_eq!(compiled.sql, r#"DELETE FROM "model" WHERE ("model"."x" = 123)"#);
}

#[test]
fn test_delete_all_with_join_unsupported() {
    let query = Query::table("model")
        .inner_join(Source::table("other"), eq(field(1, "id"), field(0, "other_id")))
        .filter(eq(field(0, "x"), lit(123)));
    let err = build_delete_all(&query).unwrap_err();
    assert!(err.is_unsupported());
    assert_eq!(err.to_string(), "JOINs are not supported on DELETE statements by SQLite");
}

#[test]
fn test_delete_all_without_filters() {
    let compiled = build_delete_all(&Query::table("model").prefix("foo")).unwrap();
    assert_eq!(compiled.sql, r#"DELETE FROM "foo"."model""#);
}

#[test]
fn test_update_all() {
    let query = Query::table("posts")
        .prefix("foo")
        .set("title", param("new"))
        .inc("visits", lit(1))
        .filter(eq(field(0, "id"), param(3)));
    let compiled = build_update_all(&query).unwrap();
    assert_eq!(
        compiled.sql,
        r#"UPDATE "foo"."posts" SET "title" = ?1, "visits" = "visits" + 1 WHERE ("foo"."posts"."id" = ?2)"#
    );
    assert_eq!(compiled.params, vec![Value::String("new".into()), Value::Int(3)]);
}

#[test]
fn test_update_all_with_join_unsupported() {
    let query = Query::table("posts")
        .assoc_join(Source::table("comments"), Association::has_many(0, "post_id"))
        .set("title", param("new"));
    let err = build_update_all(&query).unwrap_err();
    assert_eq!(err.to_string(), "JOINs are not supported on UPDATE statements by SQLite");
}

#[test]
fn test_update_all_array_operations_unsupported() {
    let mut query = Query::table("posts");
    query.updates.push(UpdateOp::Push {
        field: "tags".into(),
        value: param("new"),
    });
    let err = build_update_all(&query).unwrap_err();
    assert_eq!(err.to_string(), "Array operations are not supported by SQLite");
}

#[test]
fn test_update_all_without_assignments() {
    let err = build_update_all(&Query::table("posts")).unwrap_err();
    assert!(matches!(err, QailError::InvalidQuery(_)));
}

#[test]
fn test_bulk_rejects_select_only_clauses() {
    let query = Query::table("posts")
        .filter(eq(field(0, "id"), param(1)))
        .order_by(field(0, "id"), SortOrder::Asc);
    assert!(matches!(build_delete_all(&query), Err(QailError::InvalidQuery(_))));

    let query = Query::table("posts").set("x", lit(1)).limit(lit(1));
    assert!(matches!(build_update_all(&query), Err(QailError::InvalidQuery(_))));

    let query = Query::table("posts").lock("FOR UPDATE");
    let err = build_delete_all(&query).unwrap_err();
    assert_eq!(err.to_string(), "locks are not supported by SQLite");
}

#[test]
fn test_delete_all_rejects_assignments() {
    let query = Query::table("posts").set("x", lit(1));
    assert!(matches!(build_delete_all(&query), Err(QailError::InvalidQuery(_))));
}
