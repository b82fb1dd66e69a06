//! DDL generation for schema-change descriptors.

use tracing::debug;

use crate::ast::*;
use crate::error::{QailError, QailResult};
use crate::transpiler::sql::sqlite::{SqliteGenerator, column_type};
use crate::transpiler::traits::SqlGenerator;

/// Compile one schema change into SQL text.
///
/// ALTER TABLE batches are emitted as one `ALTER TABLE .. ADD COLUMN`
/// statement per column, joined with `"; "`.
pub fn build_schema_change(change: &SchemaChange) -> QailResult<String> {
    let generator = SqliteGenerator;
    let result = match change {
        SchemaChange::CreateTable {
            table,
            columns,
            if_not_exists,
        } => build_create_table(&generator, table, columns, *if_not_exists),
        SchemaChange::AlterTable { table, changes } => build_alter_table(&generator, table, changes),
        SchemaChange::DropTable { table, if_exists } => Ok(format!(
            "DROP TABLE {}{}",
            if_exists_sql(*if_exists),
            qualified(&generator, table)
        )),
        SchemaChange::RenameTable { from, to } => Ok(format!(
            "ALTER TABLE {} RENAME TO {}",
            qualified(&generator, from),
            qualified(&generator, to)
        )),
        SchemaChange::CreateIndex {
            index,
            if_not_exists,
        } => build_create_index(&generator, index, *if_not_exists),
        // Index names are database-wide in SQLite; the table prefix is not used.
        SchemaChange::DropIndex { index, if_exists } => Ok(format!(
            "DROP INDEX {}{}",
            if_exists_sql(*if_exists),
            generator.quote_identifier(&index.name)
        )),
        SchemaChange::Raw(sql) => Ok(sql.clone()),
    };
    match &result {
        Ok(sql) => debug!(sql = %sql, "compiled DDL"),
        Err(e) => debug!(error = %e, "DDL compilation failed"),
    }
    result
}

fn if_exists_sql(flag: bool) -> &'static str {
    if flag { "IF EXISTS " } else { "" }
}

fn qualified(generator: &dyn SqlGenerator, table: &Table) -> String {
    generator.quote_qualified(table.prefix.as_deref(), &table.name)
}

fn build_create_table(
    generator: &dyn SqlGenerator,
    table: &Table,
    columns: &[ColumnChange],
    if_not_exists: bool,
) -> QailResult<String> {
    if columns.is_empty() {
        return Err(QailError::invalid("CREATE TABLE needs at least one column"));
    }

    let mut has_serial = false;
    let mut pk_columns = Vec::new();
    for change in columns {
        let ColumnChange::Add {
            name,
            spec,
            options,
        } = change
        else {
            return Err(directive_error(change));
        };
        if matches!(spec, ColumnSpec::Type(ColumnType::Serial)) {
            has_serial = true;
        } else if options.primary_key {
            pk_columns.push(name.as_str());
        }
    }
    if has_serial && !pk_columns.is_empty() {
        return Err(QailError::unsupported(
            "a primary key cannot combine an AUTOINCREMENT column with other columns in SQLite",
        ));
    }
    let inline_pk = pk_columns.len() == 1;

    let mut defs = Vec::with_capacity(columns.len() + 1);
    for change in columns {
        if let ColumnChange::Add {
            name,
            spec,
            options,
        } = change
        {
            defs.push(column_definition(generator, table, name, spec, options, inline_pk)?);
        }
    }
    if pk_columns.len() > 1 {
        let cols = pk_columns
            .iter()
            .map(|c| generator.quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ");
        defs.push(format!("PRIMARY KEY ({})", cols));
    }

    let mut sql = format!(
        "CREATE TABLE {}{} ({})",
        if if_not_exists { "IF NOT EXISTS " } else { "" },
        qualified(generator, table),
        defs.join(", ")
    );
    if let Some(options) = &table.options {
        sql.push(' ');
        sql.push_str(options);
    }
    Ok(sql)
}

fn build_alter_table(
    generator: &dyn SqlGenerator,
    table: &Table,
    changes: &[ColumnChange],
) -> QailResult<String> {
    if changes.is_empty() {
        return Err(QailError::invalid("ALTER TABLE needs at least one change"));
    }
    let table_name = qualified(generator, table);
    let stmts = changes
        .iter()
        .map(|change| match change {
            ColumnChange::Add {
                name,
                spec,
                options,
            } => {
                // SQLite cannot add a PRIMARY KEY column to an existing table.
                if options.primary_key || matches!(spec, ColumnSpec::Type(ColumnType::Serial)) {
                    return Err(QailError::unsupported(format!(
                        "adding primary key column {} with ALTER TABLE is not supported by SQLite",
                        name
                    )));
                }
                Ok(format!(
                    "ALTER TABLE {} ADD COLUMN {}",
                    table_name,
                    column_definition(generator, table, name, spec, options, false)?
                ))
            }
            other => Err(directive_error(other)),
        })
        .collect::<QailResult<Vec<_>>>()?;
    Ok(stmts.join("; "))
}

/// The fixed error for column directives SQLite cannot run.
fn directive_error(change: &ColumnChange) -> QailError {
    let message = match change {
        ColumnChange::Modify { .. } => "ALTER COLUMN not supported by SQLite",
        ColumnChange::Rename { .. } => "RENAME COLUMN not supported by SQLite",
        ColumnChange::Remove { .. } => "DROP COLUMN not supported by SQLite",
        ColumnChange::Add { .. } => "ADD COLUMN is only valid inside CREATE or ALTER TABLE",
    };
    QailError::unsupported(message)
}

fn column_definition(
    generator: &dyn SqlGenerator,
    table: &Table,
    name: &str,
    spec: &ColumnSpec,
    options: &ColumnOptions,
    inline_pk: bool,
) -> QailResult<String> {
    let mut def = generator.quote_identifier(name);
    def.push(' ');
    match spec {
        ColumnSpec::Type(ty) => {
            def.push_str(&column_type(ty, options.precision, options.scale)?);
            def.push_str(&column_options(generator, options));
            if inline_pk && options.primary_key && *ty != ColumnType::Serial {
                def.push_str(" PRIMARY KEY");
            }
        }
        ColumnSpec::References(reference) => {
            let ty = match &reference.column_type {
                ColumnType::Serial => ColumnType::Integer,
                other => other.clone(),
            };
            def.push_str(&column_type(&ty, options.precision, options.scale)?);
            def.push_str(&column_options(generator, options));
            if inline_pk && options.primary_key {
                def.push_str(" PRIMARY KEY");
            }
            def.push_str(&reference_sql(generator, table, name, reference));
        }
    }
    Ok(def)
}

/// ` DEFAULT <literal>` then ` NOT NULL`.
fn column_options(generator: &dyn SqlGenerator, options: &ColumnOptions) -> String {
    let mut sql = String::new();
    match &options.default {
        Some(ColumnDefault::Value(value)) => {
            sql.push_str(" DEFAULT ");
            sql.push_str(&generator.render_literal(value));
        }
        Some(ColumnDefault::Raw(expr)) => {
            sql.push_str(&format!(" DEFAULT ({})", expr));
        }
        None => {}
    }
    if options.null == Some(false) {
        sql.push_str(" NOT NULL");
    }
    sql
}

/// ` CONSTRAINT "t_c_fkey" REFERENCES "target"("id")[ ON DELETE ..]`
fn reference_sql(
    generator: &dyn SqlGenerator,
    table: &Table,
    column: &str,
    reference: &Reference,
) -> String {
    let name = reference
        .name
        .clone()
        .unwrap_or_else(|| format!("{}_{}_fkey", table.name, column));
    let prefix = reference.prefix.as_deref().or(table.prefix.as_deref());
    let on_delete = match reference.on_delete {
        OnDelete::Nothing => "",
        OnDelete::Cascade => " ON DELETE CASCADE",
        OnDelete::SetNull => " ON DELETE SET NULL",
    };
    format!(
        " CONSTRAINT {} REFERENCES {}({}){}",
        generator.quote_identifier(&name),
        generator.quote_qualified(prefix, &reference.table),
        generator.quote_identifier(&reference.column),
        on_delete
    )
}

fn build_create_index(
    generator: &dyn SqlGenerator,
    index: &Index,
    if_not_exists: bool,
) -> QailResult<String> {
    if index.columns.is_empty() {
        return Err(QailError::invalid(format!(
            "index {} needs at least one column",
            index.name
        )));
    }
    let cols = index
        .columns
        .iter()
        .map(|c| match c {
            IndexColumn::Name(name) => generator.quote_identifier(name),
            IndexColumn::Raw(expr) => expr.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ");
    let mut sql = format!(
        "CREATE {}INDEX {}{} ON {} ({})",
        if index.unique { "UNIQUE " } else { "" },
        if if_not_exists { "IF NOT EXISTS " } else { "" },
        generator.quote_identifier(&index.name),
        generator.quote_qualified(index.prefix.as_deref(), &index.table),
        cols
    );
    if let Some(predicate) = &index.where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(predicate);
    }
    Ok(sql)
}
