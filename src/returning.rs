//! RETURNING emulation hints.
//!
//! SQLite statements compiled with a RETURNING list carry a trailing comment:
//!
//! ```text
//! INSERT INTO "model" ("x") VALUES (?1) ;--RETURNING ON INSERT "model","id"
//! ```
//!
//! The engine ignores it. A driver splits it off with [`split_returning`]
//! and re-fetches the named columns after the statement runs.

use std::fmt;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, none_of},
    combinator::{all_consuming, map, opt, value},
    multi::{fold_many0, many1},
    sequence::{delimited, preceded, tuple},
};
use serde::{Deserialize, Serialize};

use crate::error::{QailError, QailResult};

/// Marker that starts the hint comment.
pub const RETURNING_MARKER: &str = " ;--RETURNING ON ";

/// The DML statement a hint was attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DmlOperation {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for DmlOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DmlOperation::Insert => "INSERT",
            DmlOperation::Update => "UPDATE",
            DmlOperation::Delete => "DELETE",
        };
        write!(f, "{}", s)
    }
}

/// A parsed RETURNING hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturningHint {
    pub operation: DmlOperation,
    pub prefix: Option<String>,
    pub table: String,
    pub columns: Vec<String>,
}

impl fmt::Display for ReturningHint {
    /// Renders the suffix exactly as the DML builders emit it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quote = |s: &str| format!("\"{}\"", s.replace('"', "\"\""));
        write!(f, "{}{} ", RETURNING_MARKER, self.operation)?;
        if let Some(prefix) = &self.prefix {
            write!(f, "{}.", quote(prefix))?;
        }
        write!(f, "{}", quote(&self.table))?;
        for column in &self.columns {
            write!(f, ",{}", quote(column))?;
        }
        Ok(())
    }
}

/// Split compiled SQL into the executable statement and its hint, if any.
///
/// Text without the marker is returned unchanged with `None`. A marker
/// followed by anything other than a well-formed hint is a parse error.
pub fn split_returning(sql: &str) -> QailResult<(&str, Option<ReturningHint>)> {
    let Some(start) = sql.rfind(RETURNING_MARKER) else {
        return Ok((sql, None));
    };
    let statement = &sql[..start];
    let hint_start = start + RETURNING_MARKER.len();
    let hint = &sql[hint_start..];

    match all_consuming(parse_hint)(hint) {
        Ok((_, hint)) => Ok((statement, Some(hint))),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(QailError::parse(
            hint_start + hint.len() - e.input.len(),
            format!("malformed RETURNING hint: '{}'", hint),
        )),
        Err(nom::Err::Incomplete(_)) => Err(QailError::parse(
            sql.len(),
            "unexpected end of RETURNING hint",
        )),
    }
}

/// `INSERT "prefix"."table","col1","col2"`
fn parse_hint(input: &str) -> IResult<&str, ReturningHint> {
    let (input, (operation, _, (prefix, table), columns)) = tuple((
        parse_operation,
        char(' '),
        parse_qualified,
        many1(preceded(char(','), quoted_identifier)),
    ))(input)?;

    Ok((
        input,
        ReturningHint {
            operation,
            prefix,
            table,
            columns,
        },
    ))
}

fn parse_operation(input: &str) -> IResult<&str, DmlOperation> {
    alt((
        value(DmlOperation::Insert, tag("INSERT")),
        value(DmlOperation::Update, tag("UPDATE")),
        value(DmlOperation::Delete, tag("DELETE")),
    ))(input)
}

/// `"table"` or `"prefix"."table"`.
fn parse_qualified(input: &str) -> IResult<&str, (Option<String>, String)> {
    let (input, first) = quoted_identifier(input)?;
    let (input, second) = opt(preceded(char('.'), quoted_identifier))(input)?;
    Ok(match second {
        Some(table) => (input, (Some(first), table)),
        None => (input, (None, first)),
    })
}

/// Double-quoted identifier with `""` as an escaped quote.
fn quoted_identifier(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        fold_many0(
            alt((map(tag("\"\""), |_| '"'), none_of("\""))),
            String::new,
            |mut acc, c| {
                acc.push(c);
                acc
            },
        ),
        char('"'),
    )(input)
}
