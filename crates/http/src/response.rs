//! Success envelope shared by API handlers.
//!
//! Every successful response carries `success: true` plus whichever of
//! `data`, `pagination`, `count`, and `message` the endpoint produces;
//! absent parts are omitted from the JSON entirely.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Pagination block returned alongside list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    /// `ceil(total / limit)`.
    pub pages: usize,
}

/// A successful API response with its HTTP status.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip)]
    status: StatusCode,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn new(status: StatusCode, data: Option<T>) -> Self {
        Self {
            status,
            success: true,
            data,
            pagination: None,
            count: None,
            message: None,
        }
    }

    /// 200 with a data payload.
    pub fn ok(data: T) -> Self {
        Self::new(StatusCode::OK, Some(data))
    }

    /// 201 with the created record.
    pub fn created(data: T) -> Self {
        Self::new(StatusCode::CREATED, Some(data))
    }

    /// 200 with a data page and its pagination block.
    pub fn paginated(data: T, pagination: Pagination) -> Self {
        let mut response = Self::new(StatusCode::OK, Some(data));
        response.pagination = Some(pagination);
        response
    }

    /// 200 with a data payload and a result count.
    pub fn counted(data: T, count: usize) -> Self {
        let mut response = Self::new(StatusCode::OK, Some(data));
        response.count = Some(count);
        response
    }
}

impl ApiResponse<()> {
    /// 200 with a confirmation message and no data.
    pub fn message(message: impl Into<String>) -> Self {
        let mut response = Self::new(StatusCode::OK, None);
        response.message = Some(message.into());
        response
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}
