use serde::{Deserialize, Serialize};

use crate::ast::{Cardinality, Expr, JoinKind, Source};

/// A join appended to the source list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Join {
    /// Explicit join with an ON condition.
    On {
        kind: JoinKind,
        source: Source,
        on: Expr,
    },
    /// `CROSS JOIN`, no condition.
    Cross { source: Source },
    /// Join resolved from a relationship; always rendered as INNER JOIN.
    Assoc { source: Source, assoc: Association },
}

impl Join {
    pub fn source(&self) -> &Source {
        match self {
            Join::On { source, .. } | Join::Cross { source } | Join::Assoc { source, .. } => source,
        }
    }
}

/// Relationship between an already-joined owner source and the source
/// being joined.
///
/// `foreign_key` lives on the owner for `BelongsTo` and on the joined
/// side otherwise; `key` is the column it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub cardinality: Cardinality,
    /// Position of the owning source in the statement's source list.
    pub owner: usize,
    pub foreign_key: String,
    #[serde(default = "default_key")]
    pub key: String,
}

fn default_key() -> String {
    "id".to_string()
}

impl Association {
    /// Owner holds `foreign_key`, referencing the joined source's `id`.
    pub fn belongs_to(owner: usize, foreign_key: impl Into<String>) -> Self {
        Self {
            cardinality: Cardinality::BelongsTo,
            owner,
            foreign_key: foreign_key.into(),
            key: default_key(),
        }
    }

    /// Joined source holds `foreign_key`, referencing the owner's `id`.
    pub fn has_many(owner: usize, foreign_key: impl Into<String>) -> Self {
        Self {
            cardinality: Cardinality::HasMany,
            owner,
            foreign_key: foreign_key.into(),
            key: default_key(),
        }
    }

    pub fn has_one(owner: usize, foreign_key: impl Into<String>) -> Self {
        Self {
            cardinality: Cardinality::HasOne,
            ..Self::has_many(owner, foreign_key)
        }
    }

    /// Override the referenced key column (defaults to `id`).
    pub fn references(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}
