//! The in-memory collection store.
//!
//! Collections are ordered sequences of JSON documents behind a single
//! async read-write lock, so every operation observes a consistent
//! snapshot. Insertion order is preserved and is the baseline order for
//! unsorted queries and for ties under the stable sort.

use std::collections::HashMap;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::compare::{compare, values_equal};
use crate::error::{StoreError, StoreResult};
use crate::query::{Filter, Matcher, Query, SortOrder};

/// A single stored record: a JSON object keyed by field name.
pub type Document = serde_json::Map<String, Value>;

/// Field that carries a document's unique id.
pub const ID_FIELD: &str = "id";

type Collections = HashMap<String, Vec<Document>>;

/// Shared in-memory document store.
///
/// Cloning is cheap and every clone addresses the same underlying
/// collections, so a handle can be passed freely to request handlers.
/// Individual operations are atomic; nothing coordinates across operations.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
}

enum CompiledMatcher<'a> {
    Equals(&'a Value),
    Matches(Regex),
}

fn compile_filter(filter: &Filter) -> StoreResult<Vec<(&str, CompiledMatcher<'_>)>> {
    filter
        .clauses()
        .iter()
        .map(|(field, matcher)| {
            let compiled = match matcher {
                Matcher::Equals(value) => CompiledMatcher::Equals(value),
                Matcher::Matches {
                    pattern,
                    case_insensitive,
                } => {
                    let regex = RegexBuilder::new(pattern)
                        .case_insensitive(*case_insensitive)
                        .build()
                        .map_err(|source| StoreError::InvalidQuery {
                            pattern: pattern.clone(),
                            source,
                        })?;
                    CompiledMatcher::Matches(regex)
                }
            };
            Ok((field.as_str(), compiled))
        })
        .collect()
}

fn document_matches(document: &Document, clauses: &[(&str, CompiledMatcher<'_>)]) -> bool {
    clauses.iter().all(|(field, matcher)| match matcher {
        CompiledMatcher::Equals(expected) => document
            .get(*field)
            .is_some_and(|value| values_equal(value, expected)),
        CompiledMatcher::Matches(regex) => document
            .get(*field)
            .and_then(Value::as_str)
            .is_some_and(|text| regex.is_match(text)),
    })
}

fn document_id(document: &Document) -> Option<&str> {
    document.get(ID_FIELD).and_then(Value::as_str)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a full query: filter, stable sort, then the skip/limit window.
    ///
    /// An unknown collection yields an empty result. Documents missing the
    /// sort field order as null. `skip` past the end yields empty; an
    /// absent `limit` returns everything after `skip`.
    pub async fn find(&self, collection: &str, query: &Query) -> StoreResult<Vec<Document>> {
        let clauses = compile_filter(&query.filter)?;

        let mut matched = {
            let collections = self.collections.read().await;
            match collections.get(collection) {
                Some(records) => records
                    .iter()
                    .filter(|document| document_matches(document, &clauses))
                    .cloned()
                    .collect::<Vec<_>>(),
                None => Vec::new(),
            }
        };

        if let Some(sort) = &query.sort {
            matched.sort_by(|a, b| {
                let left = a.get(&sort.field).unwrap_or(&Value::Null);
                let right = b.get(&sort.field).unwrap_or(&Value::Null);
                match sort.order {
                    SortOrder::Asc => compare(left, right),
                    SortOrder::Desc => compare(right, left),
                }
            });
        }

        Ok(matched
            .into_iter()
            .skip(query.skip.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .collect())
    }

    pub async fn find_by_id(&self, collection: &str, id: &str) -> Option<Document> {
        let collections = self.collections.read().await;
        collections
            .get(collection)?
            .iter()
            .find(|document| document_id(document) == Some(id))
            .cloned()
    }

    /// Appends a document, assigning a fresh UUID under [`ID_FIELD`] unless
    /// the document already carries one. Returns the stored copy.
    pub async fn insert(&self, collection: &str, mut document: Document) -> Document {
        if !document.contains_key(ID_FIELD) {
            document.insert(
                ID_FIELD.to_string(),
                Value::String(Uuid::new_v4().to_string()),
            );
        }

        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document.clone());

        tracing::debug!(collection, id = document_id(&document), "inserted document");
        document
    }

    /// Merges `patch` into the document with the given id: patch fields
    /// overwrite, everything else is untouched, and [`ID_FIELD`] is never
    /// replaced. Returns the updated copy, or `None` when the id is absent.
    pub async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
    ) -> Option<Document> {
        let mut collections = self.collections.write().await;
        let records = collections.get_mut(collection)?;
        let existing = records
            .iter_mut()
            .find(|document| document_id(document) == Some(id))?;

        for (field, value) in patch {
            if field == ID_FIELD {
                continue;
            }
            existing.insert(field, value);
        }

        Some(existing.clone())
    }

    /// Removes and returns the document with the given id, or `None` when
    /// the id is absent.
    pub async fn delete_by_id(&self, collection: &str, id: &str) -> Option<Document> {
        let mut collections = self.collections.write().await;
        let records = collections.get_mut(collection)?;
        let index = records
            .iter()
            .position(|document| document_id(document) == Some(id))?;
        Some(records.remove(index))
    }

    /// Cardinality of the filtered set; always equals `find(filter).len()`
    /// for a query without a skip/limit window.
    pub async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<usize> {
        let clauses = compile_filter(filter)?;
        let collections = self.collections.read().await;
        Ok(collections.get(collection).map_or(0, |records| {
            records
                .iter()
                .filter(|document| document_matches(document, &clauses))
                .count()
        }))
    }

    /// Empties every collection, keeping the collection names registered.
    pub async fn clear(&self) {
        let mut collections = self.collections.write().await;
        for records in collections.values_mut() {
            records.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().expect("test document").clone()
    }

    async fn store_with_books() -> MemoryStore {
        let store = MemoryStore::new();
        for book in [
            json!({"title": "三体", "author": "刘慈欣", "price": 23.00}),
            json!({"title": "百年孤独", "author": "加西亚·马尔克斯", "price": 39.50}),
            json!({"title": "活着", "author": "余华", "price": 20.00}),
            json!({"title": "解忧杂货店", "author": "东野圭吾", "price": 39.50}),
            json!({"title": "人类简史", "author": "尤瓦尔·赫拉利", "price": 68.00}),
        ] {
            store.insert("books", doc(book)).await;
        }
        store
    }

    #[tokio::test]
    async fn insert_assigns_id_and_returns_stored_copy() {
        let store = MemoryStore::new();
        let stored = store.insert("books", doc(json!({"title": "活着"}))).await;

        let id = stored.get(ID_FIELD).and_then(Value::as_str).unwrap();
        assert!(!id.is_empty());
        assert_eq!(stored.get("title"), Some(&json!("活着")));

        let found = store.find_by_id("books", id).await.unwrap();
        assert_eq!(found, stored);
    }

    #[tokio::test]
    async fn insert_keeps_a_supplied_id() {
        let store = MemoryStore::new();
        let stored = store
            .insert("books", doc(json!({"id": "fixed", "title": "活着"})))
            .await;
        assert_eq!(document_id(&stored), Some("fixed"));
    }

    #[tokio::test]
    async fn unfiltered_find_preserves_insertion_order() {
        let store = store_with_books().await;
        let all = store.find("books", &Query::new()).await.unwrap();
        let titles: Vec<_> = all.iter().map(|d| d.get("title").unwrap()).collect();
        assert_eq!(
            titles,
            vec![
                &json!("三体"),
                &json!("百年孤独"),
                &json!("活着"),
                &json!("解忧杂货店"),
                &json!("人类简史"),
            ]
        );
    }

    #[tokio::test]
    async fn equality_filter_is_a_conjunction() {
        let store = store_with_books().await;

        let by_price = Query::new().filter(Filter::new().equals("price", 39.5));
        assert_eq!(store.find("books", &by_price).await.unwrap().len(), 2);

        let by_price_and_author = Query::new().filter(
            Filter::new()
                .equals("price", 39.5)
                .equals("author", "东野圭吾"),
        );
        let matched = store.find("books", &by_price_and_author).await.unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].get("title"), Some(&json!("解忧杂货店")));
    }

    #[tokio::test]
    async fn equality_filter_never_matches_a_missing_field() {
        let store = store_with_books().await;
        let query = Query::new().filter(Filter::new().equals("isbn", "9787536692930"));
        assert!(store.find("books", &query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pattern_matcher_supports_case_insensitive_matching() {
        let store = MemoryStore::new();
        store
            .insert("books", doc(json!({"title": "The Left Hand of Darkness"})))
            .await;

        let sensitive = Query::new().filter(Filter::new().matches("title", "left hand", false));
        assert!(store.find("books", &sensitive).await.unwrap().is_empty());

        let insensitive = Query::new().filter(Filter::new().matches("title", "left hand", true));
        assert_eq!(store.find("books", &insensitive).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_pattern_is_an_invalid_query() {
        let store = store_with_books().await;
        let query = Query::new().filter(Filter::new().matches("title", "[unclosed", false));
        let err = store.find("books", &query).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuery { .. }));
    }

    #[tokio::test]
    async fn sort_by_price_is_stable() {
        let store = store_with_books().await;
        let sorted = store
            .find("books", &Query::new().sort("price", SortOrder::Asc))
            .await
            .unwrap();

        let prices: Vec<_> = sorted.iter().map(|d| d.get("price").unwrap()).collect();
        assert_eq!(
            prices,
            vec![
                &json!(20.00),
                &json!(23.00),
                &json!(39.50),
                &json!(39.50),
                &json!(68.00),
            ]
        );
        // The two 39.50 entries keep their insertion order.
        assert_eq!(sorted[2].get("title"), Some(&json!("百年孤独")));
        assert_eq!(sorted[3].get("title"), Some(&json!("解忧杂货店")));
    }

    #[tokio::test]
    async fn skip_and_limit_slice_the_sorted_sequence() {
        let store = store_with_books().await;
        let query = Query::new().sort("price", SortOrder::Asc).skip(2).limit(2);
        let page = store.find("books", &query).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].get("price"), Some(&json!(39.50)));
        assert_eq!(page[1].get("price"), Some(&json!(39.50)));
    }

    #[tokio::test]
    async fn skip_past_the_end_yields_empty() {
        let store = store_with_books().await;
        let page = store.find("books", &Query::new().skip(10)).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn absent_limit_returns_the_remainder() {
        let store = store_with_books().await;
        let page = store.find("books", &Query::new().skip(3)).await.unwrap();
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn update_merges_patch_and_preserves_the_id() {
        let store = MemoryStore::new();
        let stored = store
            .insert("books", doc(json!({"title": "活着", "price": 20.0})))
            .await;
        let id = document_id(&stored).unwrap().to_string();

        let updated = store
            .update_by_id(
                "books",
                &id,
                doc(json!({"id": "forged", "price": 25.0})),
            )
            .await
            .unwrap();

        assert_eq!(document_id(&updated), Some(id.as_str()));
        assert_eq!(updated.get("price"), Some(&json!(25.0)));
        assert_eq!(updated.get("title"), Some(&json!("活着")));
    }

    #[tokio::test]
    async fn update_of_an_unknown_id_is_none() {
        let store = store_with_books().await;
        let result = store
            .update_by_id("books", "missing", doc(json!({"price": 1.0})))
            .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_removes_the_document() {
        let store = MemoryStore::new();
        let stored = store.insert("books", doc(json!({"title": "活着"}))).await;
        let id = document_id(&stored).unwrap().to_string();

        let deleted = store.delete_by_id("books", &id).await.unwrap();
        assert_eq!(deleted, stored);
        assert!(store.find_by_id("books", &id).await.is_none());
        assert!(store.delete_by_id("books", &id).await.is_none());
    }

    #[tokio::test]
    async fn count_equals_find_length() {
        let store = store_with_books().await;

        for filter in [
            Filter::new(),
            Filter::new().equals("price", 39.5),
            Filter::new().equals("author", "nobody"),
        ] {
            let counted = store.count("books", &filter).await.unwrap();
            let found = store
                .find("books", &Query::new().filter(filter))
                .await
                .unwrap();
            assert_eq!(counted, found.len());
        }
    }

    #[tokio::test]
    async fn clear_empties_every_collection() {
        let store = store_with_books().await;
        store.clear().await;
        assert_eq!(store.count("books", &Filter::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn handles_share_the_same_collections() {
        let store = store_with_books().await;
        let other = store.clone();
        assert_eq!(other.count("books", &Filter::new()).await.unwrap(), 5);
    }
}
