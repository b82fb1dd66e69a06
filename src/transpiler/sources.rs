//! Source alias assignment.
//!
//! Aliases are a pure function of a source's kind, name and position, so
//! the same query always compiles to the same text.

use crate::ast::{Query, Source};
use crate::transpiler::traits::SqlGenerator;

/// Alias prefix used for fragment sources.
pub const FRAGMENT_ALIAS: char = 'f';

/// How sources are referenced inside the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasMode {
    /// `FROM "posts" AS p0`, fields render as `p0."x"`.
    Select,
    /// No alias; fields render against the quoted table, `"posts"."x"`.
    Bulk,
}

/// A source paired with the name expressions use to reach it.
#[derive(Debug, Clone)]
pub struct SourceRef<'a> {
    pub source: &'a Source,
    pub alias: String,
    /// Quoted, qualified table name. `None` for fragment sources.
    pub table: Option<String>,
}

/// Alias of the source at `position` in SELECT mode.
///
/// First character of the table name (or `t` if it is not an ASCII
/// letter) followed by the position; fragments use `f<position>`.
pub fn alias_for(source: &Source, position: usize) -> String {
    match source {
        Source::Table { name, .. } => {
            let first = name
                .chars()
                .next()
                .filter(|c| c.is_ascii_alphabetic())
                .unwrap_or('t');
            format!("{}{}", first, position)
        }
        Source::Fragment(_) => format!("{}{}", FRAGMENT_ALIAS, position),
    }
}

/// Resolve every source of `query`, primary source first.
pub fn create_names<'a>(
    query: &'a Query,
    generator: &dyn SqlGenerator,
    mode: AliasMode,
) -> Vec<SourceRef<'a>> {
    let prefix = query.prefix.as_deref();
    std::iter::once(&query.from)
        .chain(query.joins.iter().map(|j| j.source()))
        .enumerate()
        .map(|(position, source)| {
            let table = match source {
                Source::Table { name, .. } => Some(generator.quote_qualified(prefix, name)),
                Source::Fragment(_) => None,
            };
            let alias = match (mode, &table) {
                (AliasMode::Bulk, Some(table)) => table.clone(),
                _ => alias_for(source, position),
            };
            SourceRef {
                source,
                alias,
                table,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::ast::{Fragment, Query};
    use crate::transpiler::sql::sqlite::SqliteGenerator;

    #[test]
    fn test_alias_for_tables_and_fragments() {
        assert_eq!(alias_for(&Source::table("posts"), 0), "p0");
        assert_eq!(alias_for(&Source::table("comments"), 3), "c3");
        assert_eq!(alias_for(&Source::table("_private"), 1), "t1");
        assert_eq!(alias_for(&Source::Fragment(Fragment::raw("SELECT 1")), 2), "f2");
    }

    #[test]
    fn test_create_names_select_mode() {
        let query = Query::table("posts")
            .prefix("blog")
            .inner_join(Source::table("comments"), eq(field(1, "post_id"), field(0, "id")));
        let names = create_names(&query, &SqliteGenerator, AliasMode::Select);
        let aliases: Vec<&str> = names.iter().map(|s| s.alias.as_str()).collect();
        assert_eq!(aliases, vec!["p0", "c1"]);
        assert_eq!(names[0].table.as_deref(), Some("\"blog\".\"posts\""));
    }

    #[test]
    fn test_create_names_bulk_mode_uses_table() {
        let query = Query::table("model");
        let names = create_names(&query, &SqliteGenerator, AliasMode::Bulk);
        assert_eq!(names[0].alias, "\"model\"");
    }
}
