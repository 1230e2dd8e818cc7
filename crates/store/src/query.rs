//! Query construction for the in-memory store.
//!
//! Filters are a closed conjunction of per-field matchers rather than an
//! open-ended dictionary: every clause must match for a document to be
//! included. Queries bundle a filter with an optional sort and a skip/limit
//! window, in the order the store applies them.

use serde_json::Value;

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending order (A to Z, 0 to 9, earliest to latest).
    Asc,
    /// Descending order (Z to A, 9 to 0, latest to earliest).
    Desc,
}

/// Sort specification: a single field and a direction.
///
/// Documents with equal keys (or without the field at all) keep their
/// relative insertion order; the store sorts stably.
#[derive(Debug, Clone)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

/// A per-field match condition.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Exact equality against a literal value. Numbers are compared
    /// numerically, so `1` and `1.0` are equal.
    Equals(Value),
    /// Regular-expression match against a string field. Non-string fields
    /// never match. The pattern is compiled when the query runs; a
    /// malformed pattern fails the operation with
    /// [`StoreError::InvalidQuery`](crate::error::StoreError::InvalidQuery).
    Matches {
        pattern: String,
        case_insensitive: bool,
    },
}

/// A conjunction of field matchers. The empty filter matches every document.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<(String, Matcher)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an exact-equality clause.
    pub fn equals(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clause(field, Matcher::Equals(value.into()))
    }

    /// Adds a regular-expression clause.
    pub fn matches(
        self,
        field: impl Into<String>,
        pattern: impl Into<String>,
        case_insensitive: bool,
    ) -> Self {
        self.clause(
            field,
            Matcher::Matches {
                pattern: pattern.into(),
                case_insensitive,
            },
        )
    }

    /// Adds an arbitrary clause.
    pub fn clause(mut self, field: impl Into<String>, matcher: Matcher) -> Self {
        self.clauses.push((field.into(), matcher));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub(crate) fn clauses(&self) -> &[(String, Matcher)] {
        &self.clauses
    }
}

/// A structured query: filter, then sort, then the `[skip, skip+limit)`
/// window over the remaining documents.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filter: Filter,
    pub sort: Option<Sort>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(Sort {
            field: field.into(),
            order,
        });
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
