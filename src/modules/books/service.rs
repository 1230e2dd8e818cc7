//! Catalog service: CRUD and search over the book collection.
//!
//! Translates normalized requests into store queries, owns id-adjacent
//! bookkeeping (timestamps, pagination math), and shapes store results back
//! into [`Book`] records.

use anyhow::anyhow;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use libris_http::response::Pagination;
use libris_store::{Document, Filter, MemoryStore, Query, SortOrder, StoreError};

use super::models::{Book, CreateBook, FieldError, UpdateBook};

/// Collection the catalog lives in.
pub const COLLECTION: &str = "books";

const DEFAULT_PAGE: usize = 1;
const DEFAULT_LIMIT: usize = 10;
const DEFAULT_SORT_FIELD: &str = "createdAt";

/// Millisecond-precision UTC timestamps, matching the original API's wire
/// format and ordering lexicographically.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

/// Errors produced by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("book {0} does not exist")]
    NotFound(String),
    #[error("book validation failed")]
    Validation(Vec<FieldError>),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Normalized list parameters.
///
/// The HTTP boundary builds this from raw query strings, so malformed
/// input degrades to the defaults here instead of failing the request.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub page: usize,
    pub limit: usize,
    pub sort_field: String,
    pub sort_order: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort_field: DEFAULT_SORT_FIELD.to_string(),
            sort_order: SortOrder::Desc,
        }
    }
}

impl ListQuery {
    /// Build from raw query-string values. Non-numeric page/limit input
    /// falls back to the defaults, numeric input is clamped to at least 1,
    /// and any sort order other than `asc` means descending.
    pub fn from_raw(
        page: Option<&str>,
        limit: Option<&str>,
        sort_field: Option<&str>,
        sort_order: Option<&str>,
    ) -> Self {
        let page = page
            .and_then(|value| value.parse::<i64>().ok())
            .map_or(DEFAULT_PAGE, |value| value.max(1) as usize);
        let limit = limit
            .and_then(|value| value.parse::<i64>().ok())
            .map_or(DEFAULT_LIMIT, |value| value.max(1) as usize);
        let sort_field = sort_field
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_SORT_FIELD)
            .to_string();
        let sort_order = match sort_order {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        };

        Self {
            page,
            limit,
            sort_field,
            sort_order,
        }
    }
}

/// The CRUD/search surface over the catalog collection.
///
/// Cheap to clone; all clones address the same store.
#[derive(Debug, Clone)]
pub struct CatalogService {
    store: MemoryStore,
}

impl CatalogService {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// One page of the catalog plus its pagination block. `total` counts
    /// the whole collection, before the page window is applied.
    pub async fn list(&self, query: &ListQuery) -> Result<(Vec<Book>, Pagination), CatalogError> {
        let total = self.store.count(COLLECTION, &Filter::new()).await?;

        let skip = query.page.saturating_sub(1).saturating_mul(query.limit);
        let documents = self
            .store
            .find(
                COLLECTION,
                &Query::new()
                    .sort(query.sort_field.clone(), query.sort_order)
                    .skip(skip)
                    .limit(query.limit),
            )
            .await?;

        let books = documents
            .into_iter()
            .map(into_book)
            .collect::<Result<Vec<_>, _>>()?;
        let pagination = Pagination {
            page: query.page,
            limit: query.limit,
            total,
            pages: total.div_ceil(query.limit),
        };

        Ok((books, pagination))
    }

    pub async fn get(&self, id: &str) -> Result<Book, CatalogError> {
        match self.store.find_by_id(COLLECTION, id).await {
            Some(document) => into_book(document),
            None => Err(CatalogError::NotFound(id.to_string())),
        }
    }

    /// Validate and store a new book; the store assigns the id and the
    /// service stamps both timestamps.
    pub async fn create(&self, input: CreateBook) -> Result<Book, CatalogError> {
        input.validate().map_err(CatalogError::Validation)?;

        let mut document = to_document(&input)?;
        let now = now_timestamp()?;
        document.insert("createdAt".to_string(), Value::String(now.clone()));
        document.insert("updatedAt".to_string(), Value::String(now));

        let stored = self.store.insert(COLLECTION, document).await;
        let book = into_book(stored)?;
        tracing::info!(id = %book.id, title = %book.title, "created book");
        Ok(book)
    }

    /// Merge the supplied fields into an existing book. Validation runs
    /// before the store is touched, so a bad patch leaves the record
    /// unchanged.
    pub async fn update(&self, id: &str, patch: UpdateBook) -> Result<Book, CatalogError> {
        patch.validate().map_err(CatalogError::Validation)?;

        let mut document = to_document(&patch)?;
        document.insert("updatedAt".to_string(), Value::String(now_timestamp()?));

        match self.store.update_by_id(COLLECTION, id, document).await {
            Some(updated) => {
                let book = into_book(updated)?;
                tracing::info!(id = %book.id, title = %book.title, "updated book");
                Ok(book)
            }
            None => Err(CatalogError::NotFound(id.to_string())),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), CatalogError> {
        match self.store.delete_by_id(COLLECTION, id).await {
            Some(deleted) => {
                let title = deleted.get("title").and_then(Value::as_str).unwrap_or("");
                tracing::info!(id, title, "deleted book");
                Ok(())
            }
            None => Err(CatalogError::NotFound(id.to_string())),
        }
    }

    /// Case-insensitive substring search over title, author, publisher,
    /// category, and description. An empty query returns the whole catalog
    /// in default order, unpaginated.
    pub async fn search(&self, query: &str) -> Result<Vec<Book>, CatalogError> {
        let documents = self
            .store
            .find(
                COLLECTION,
                &Query::new().sort(DEFAULT_SORT_FIELD, SortOrder::Desc),
            )
            .await?;
        let books = documents
            .into_iter()
            .map(into_book)
            .collect::<Result<Vec<_>, _>>()?;

        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(books);
        }

        Ok(books
            .into_iter()
            .filter(|book| matches_query(book, &needle))
            .collect())
    }

    /// Number of books in the catalog.
    pub async fn total(&self) -> Result<usize, CatalogError> {
        Ok(self.store.count(COLLECTION, &Filter::new()).await?)
    }
}

fn matches_query(book: &Book, needle: &str) -> bool {
    [
        Some(&book.title),
        Some(&book.author),
        Some(&book.publisher),
        Some(&book.category),
        book.description.as_ref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

fn into_book(document: Document) -> Result<Book, CatalogError> {
    serde_json::from_value(Value::Object(document))
        .map_err(|err| CatalogError::Unexpected(anyhow!("stored book is malformed: {err}")))
}

fn to_document<T: Serialize>(input: &T) -> Result<Document, CatalogError> {
    match serde_json::to_value(input) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CatalogError::Unexpected(anyhow!(
            "request did not serialize to an object"
        ))),
        Err(err) => Err(CatalogError::Unexpected(anyhow!(
            "failed to serialize request: {err}"
        ))),
    }
}

fn now_timestamp() -> Result<String, CatalogError> {
    OffsetDateTime::now_utc()
        .format(TIMESTAMP_FORMAT)
        .map_err(|err| CatalogError::Unexpected(anyhow!("failed to format timestamp: {err}")))
}
