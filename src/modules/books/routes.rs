//! HTTP handlers for the books module.
//!
//! Handlers stay thin: normalize raw parameters, call the catalog service,
//! wrap the result in the response envelope. Error mapping to HTTP status
//! codes lives in the `From<CatalogError>` impl at the bottom.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use libris_http::error::AppError;
use libris_http::response::ApiResponse;

use super::models::{Book, CreateBook, UpdateBook};
use super::service::{CatalogError, CatalogService, ListQuery};

/// Raw query parameters for the list endpoint. Values stay strings so that
/// malformed numbers degrade to the defaults instead of a rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    page: Option<String>,
    limit: Option<String>,
    sort_field: Option<String>,
    sort_order: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    query: Option<String>,
}

/// Build the books router with handlers bound to the catalog service.
pub fn router(service: CatalogService) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/search", get(search_books))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(service)
}

async fn list_books(
    State(service): State<CatalogService>,
    Query(params): Query<ListParams>,
) -> Result<ApiResponse<Vec<Book>>, AppError> {
    let query = ListQuery::from_raw(
        params.page.as_deref(),
        params.limit.as_deref(),
        params.sort_field.as_deref(),
        params.sort_order.as_deref(),
    );
    let (books, pagination) = service.list(&query).await?;
    Ok(ApiResponse::paginated(books, pagination))
}

async fn search_books(
    State(service): State<CatalogService>,
    Query(params): Query<SearchParams>,
) -> Result<ApiResponse<Vec<Book>>, AppError> {
    let books = service
        .search(params.query.as_deref().unwrap_or(""))
        .await?;
    let count = books.len();
    Ok(ApiResponse::counted(books, count))
}

async fn get_book(
    State(service): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Book>, AppError> {
    Ok(ApiResponse::ok(service.get(&id).await?))
}

async fn create_book(
    State(service): State<CatalogService>,
    Json(input): Json<CreateBook>,
) -> Result<ApiResponse<Book>, AppError> {
    Ok(ApiResponse::created(service.create(input).await?))
}

async fn update_book(
    State(service): State<CatalogService>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateBook>,
) -> Result<ApiResponse<Book>, AppError> {
    Ok(ApiResponse::ok(service.update(&id, patch).await?))
}

async fn delete_book(
    State(service): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    service.delete(&id).await?;
    Ok(ApiResponse::message("book deleted"))
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => {
                AppError::not_found(format!("book {id} does not exist"))
            }
            CatalogError::Validation(errors) => {
                let details = errors
                    .into_iter()
                    .map(|e| json!({ "field": e.field, "error": e.error }))
                    .collect();
                AppError::validation(details, "book validation failed")
            }
            CatalogError::Store(err) => AppError::bad_request(err.to_string()),
            CatalogError::Unexpected(err) => AppError::Internal(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use libris_store::MemoryStore;

    fn app() -> Router {
        router(CatalogService::new(MemoryStore::new()))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn put_json(uri: &str, body: Value) -> Request<Body> {
        Request::put(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn sample_body(title: &str) -> Value {
        json!({
            "title": title,
            "author": "刘慈欣",
            "publisher": "重庆出版社",
            "category": "科幻",
            "price": 23.0,
            "cover": "https://example.com/cover.jpg"
        })
    }

    #[tokio::test]
    async fn crud_round_trip_over_http() {
        let app = app();

        // create
        let response = app
            .clone()
            .oneshot(post_json("/", sample_body("三体")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["success"], json!(true));
        let id = created["data"]["id"].as_str().unwrap().to_string();

        // read
        let response = app
            .clone()
            .oneshot(Request::get(format!("/{id}")).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = body_json(response).await;
        assert_eq!(fetched["data"]["title"], json!("三体"));

        // update
        let response = app
            .clone()
            .oneshot(put_json(&format!("/{id}"), json!({"price": 25.0})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["data"]["price"], json!(25.0));
        assert_eq!(updated["data"]["title"], json!("三体"));

        // delete
        let response = app
            .clone()
            .oneshot(
                Request::delete(format!("/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let deleted = body_json(response).await;
        assert_eq!(deleted["message"], json!("book deleted"));

        // gone
        let response = app
            .clone()
            .oneshot(Request::get(format!("/{id}")).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let missing = body_json(response).await;
        assert!(missing["error"]["message"].as_str().unwrap().contains(&id));
    }

    #[tokio::test]
    async fn list_envelope_includes_pagination() {
        let app = app();
        for title in ["a", "b", "c"] {
            app.clone()
                .oneshot(post_json("/", sample_body(title)))
                .await
                .unwrap();
        }

        let response = app
            .clone()
            .oneshot(
                Request::get("/?page=1&limit=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(
            body["pagination"],
            json!({"page": 1, "limit": 2, "total": 3, "pages": 2})
        );
    }

    #[tokio::test]
    async fn malformed_page_param_degrades_to_default() {
        let app = app();
        app.clone()
            .oneshot(post_json("/", sample_body("a")))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(Request::get("/?page=abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["pagination"]["page"], json!(1));
    }

    #[tokio::test]
    async fn validation_failure_is_a_400_with_details() {
        let app = app();
        let response = app
            .clone()
            .oneshot(post_json("/", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], json!("validation_error"));
        let details = body["error"]["details"].as_array().unwrap();
        assert!(details.iter().any(|d| d["field"] == json!("title")));
    }

    #[tokio::test]
    async fn search_returns_matches_and_count() {
        let app = app();
        app.clone()
            .oneshot(post_json("/", sample_body("三体")))
            .await
            .unwrap();
        app.clone()
            .oneshot(post_json("/", sample_body("活着")))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::get("/search?query=%E4%B8%89%E4%BD%93")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["count"], json!(1));
        assert_eq!(body["data"][0]["title"], json!("三体"));
    }
}
