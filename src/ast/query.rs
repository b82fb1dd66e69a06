use serde::{Deserialize, Serialize};

use crate::ast::{Association, Expr, Fragment, Join, JoinKind, SortOrder};

/// A FROM/JOIN source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// A table. `fields` is the associated schema's field list, `None`
    /// for a raw table name.
    Table {
        name: String,
        #[serde(default)]
        fields: Option<Vec<String>>,
    },
    /// A parenthesized raw subquery.
    Fragment(Fragment),
}

impl Source {
    /// A raw table name with no schema.
    pub fn table(name: impl Into<String>) -> Self {
        Source::Table {
            name: name.into(),
            fields: None,
        }
    }

    /// A table backed by a schema with the given fields.
    pub fn schema<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Source::Table {
            name: name.into(),
            fields: Some(fields.into_iter().map(Into::into).collect()),
        }
    }
}

/// One ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub expr: Expr,
    #[serde(default)]
    pub direction: SortOrder,
}

/// DISTINCT setting of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distinct {
    Flag(bool),
    /// DISTINCT over explicit expressions. SQLite cannot express it.
    Exprs(Vec<Expr>),
}

/// Assignment in a bulk UPDATE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOp {
    /// `"field" = value`
    Set { field: String, value: Expr },
    /// `"field" = "field" + value`
    Inc { field: String, value: Expr },
    /// Append to an array column.
    Push { field: String, value: Expr },
    /// Remove from an array column.
    Pull { field: String, value: Expr },
}

/// A planned query: SELECT, bulk UPDATE or bulk DELETE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Schema qualifier applied to every table source.
    #[serde(default)]
    pub prefix: Option<String>,
    pub from: Source,
    #[serde(default)]
    pub joins: Vec<Join>,
    /// Projection. `None` selects the primary source's whole row.
    #[serde(default)]
    pub select: Option<Vec<Expr>>,
    #[serde(default)]
    pub distinct: Option<Distinct>,
    /// Filters, combined with AND.
    #[serde(default)]
    pub wheres: Vec<Expr>,
    #[serde(default)]
    pub updates: Vec<UpdateOp>,
    #[serde(default)]
    pub group_by: Vec<Expr>,
    #[serde(default)]
    pub havings: Vec<Expr>,
    #[serde(default)]
    pub order_by: Vec<OrderBy>,
    #[serde(default)]
    pub limit: Option<Expr>,
    #[serde(default)]
    pub offset: Option<Expr>,
    #[serde(default)]
    pub lock: Option<String>,
}

impl Query {
    pub fn from(source: Source) -> Self {
        Self {
            prefix: None,
            from: source,
            joins: Vec::new(),
            select: None,
            distinct: None,
            wheres: Vec::new(),
            updates: Vec::new(),
            group_by: Vec::new(),
            havings: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            lock: None,
        }
    }

    /// Query over a raw table name.
    pub fn table(name: impl Into<String>) -> Self {
        Self::from(Source::table(name))
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn select<I>(mut self, exprs: I) -> Self
    where
        I: IntoIterator<Item = Expr>,
    {
        self.select = Some(exprs.into_iter().collect());
        self
    }

    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = Some(Distinct::Flag(distinct));
        self
    }

    pub fn distinct_on<I>(mut self, exprs: I) -> Self
    where
        I: IntoIterator<Item = Expr>,
    {
        self.distinct = Some(Distinct::Exprs(exprs.into_iter().collect()));
        self
    }

    /// Add a filter; repeated calls accumulate a conjunction.
    pub fn filter(mut self, expr: Expr) -> Self {
        self.wheres.push(expr);
        self
    }

    pub fn join(mut self, kind: JoinKind, source: Source, on: Expr) -> Self {
        self.joins.push(Join::On { kind, source, on });
        self
    }

    pub fn inner_join(self, source: Source, on: Expr) -> Self {
        self.join(JoinKind::Inner, source, on)
    }

    pub fn left_join(self, source: Source, on: Expr) -> Self {
        self.join(JoinKind::Left, source, on)
    }

    pub fn cross_join(mut self, source: Source) -> Self {
        self.joins.push(Join::Cross { source });
        self
    }

    pub fn assoc_join(mut self, source: Source, assoc: Association) -> Self {
        self.joins.push(Join::Assoc { source, assoc });
        self
    }

    pub fn set(mut self, field: impl Into<String>, value: Expr) -> Self {
        self.updates.push(UpdateOp::Set {
            field: field.into(),
            value,
        });
        self
    }

    pub fn inc(mut self, field: impl Into<String>, value: Expr) -> Self {
        self.updates.push(UpdateOp::Inc {
            field: field.into(),
            value,
        });
        self
    }

    pub fn group_by(mut self, expr: Expr) -> Self {
        self.group_by.push(expr);
        self
    }

    pub fn having(mut self, expr: Expr) -> Self {
        self.havings.push(expr);
        self
    }

    pub fn order_by(mut self, expr: Expr, direction: SortOrder) -> Self {
        self.order_by.push(OrderBy { expr, direction });
        self
    }

    pub fn limit(mut self, expr: Expr) -> Self {
        self.limit = Some(expr);
        self
    }

    pub fn offset(mut self, expr: Expr) -> Self {
        self.offset = Some(expr);
        self
    }

    pub fn lock(mut self, lock: impl Into<String>) -> Self {
        self.lock = Some(lock.into());
        self
    }

    /// Number of sources (primary plus joins).
    pub fn source_count(&self) -> usize {
        1 + self.joins.len()
    }
}
