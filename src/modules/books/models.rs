use serde::{Deserialize, Serialize};

/// A catalog record as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, assigned by the store at creation
    pub id: String,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Publisher of the book
    pub publisher: String,
    /// Category the book is shelved under
    pub category: String,
    /// Optional blurb
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Retail price, never negative
    pub price: f64,
    /// Cover image URL
    pub cover: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    /// Set once at creation
    pub created_at: String,
    /// Refreshed on every update; never earlier than `created_at`
    pub updated_at: String,
}

/// Request model for creating a new book.
///
/// Every field is optional at the wire level so that missing required
/// values surface as field-level validation errors instead of a
/// deserialization failure; [`CreateBook::validate`] enforces the catalog
/// constraints before anything reaches the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<i64>,
}

/// Partial update for a book.
///
/// Only supplied fields are validated and merged. `id` and `createdAt`
/// cannot be expressed here, so they are immutable by construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<i64>,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub error: String,
}

impl FieldError {
    fn new(field: &'static str, error: impl Into<String>) -> Self {
        Self {
            field,
            error: error.into(),
        }
    }
}

fn check_required_text(field: &'static str, value: &Option<String>, errors: &mut Vec<FieldError>) {
    match value {
        Some(text) if !text.trim().is_empty() => {}
        _ => errors.push(FieldError::new(field, format!("{field} is required"))),
    }
}

fn check_supplied_text(field: &'static str, value: &Option<String>, errors: &mut Vec<FieldError>) {
    if let Some(text) = value {
        if text.trim().is_empty() {
            errors.push(FieldError::new(field, format!("{field} must not be empty")));
        }
    }
}

fn check_price(value: Option<f64>, required: bool, errors: &mut Vec<FieldError>) {
    match value {
        Some(price) if price.is_finite() && price >= 0.0 => {}
        Some(_) => errors.push(FieldError::new(
            "price",
            "price must be a non-negative number",
        )),
        None if required => errors.push(FieldError::new("price", "price is required")),
        None => {}
    }
}

fn check_pages(value: Option<i64>, errors: &mut Vec<FieldError>) {
    if let Some(pages) = value {
        if pages < 1 {
            errors.push(FieldError::new("pages", "pages must be at least 1"));
        }
    }
}

impl CreateBook {
    /// Check all catalog constraints; collects every failing field.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        check_required_text("title", &self.title, &mut errors);
        check_required_text("author", &self.author, &mut errors);
        check_required_text("publisher", &self.publisher, &mut errors);
        check_required_text("category", &self.category, &mut errors);
        check_required_text("cover", &self.cover, &mut errors);
        check_price(self.price, true, &mut errors);
        check_pages(self.pages, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl UpdateBook {
    /// Check constraints on the supplied fields only.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        check_supplied_text("title", &self.title, &mut errors);
        check_supplied_text("author", &self.author, &mut errors);
        check_supplied_text("publisher", &self.publisher, &mut errors);
        check_supplied_text("category", &self.category, &mut errors);
        check_supplied_text("cover", &self.cover, &mut errors);
        check_price(self.price, false, &mut errors);
        check_pages(self.pages, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> CreateBook {
        CreateBook {
            title: Some("三体".to_string()),
            author: Some("刘慈欣".to_string()),
            publisher: Some("重庆出版社".to_string()),
            category: Some("科幻".to_string()),
            price: Some(23.0),
            cover: Some("https://example.com/cover.jpg".to_string()),
            pages: Some(302),
            ..CreateBook::default()
        }
    }

    #[test]
    fn valid_create_input_passes() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn empty_create_input_lists_every_required_field() {
        let errors = CreateBook::default().validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["title", "author", "publisher", "category", "cover", "price"]
        );
    }

    #[test]
    fn whitespace_only_title_is_rejected() {
        let input = CreateBook {
            title: Some("   ".to_string()),
            ..valid_input()
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors[0].field, "title");
    }

    #[test]
    fn negative_price_is_rejected() {
        let input = CreateBook {
            price: Some(-1.0),
            ..valid_input()
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors[0].field, "price");
    }

    #[test]
    fn zero_pages_is_rejected() {
        let input = CreateBook {
            pages: Some(0),
            ..valid_input()
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors[0].field, "pages");
    }

    #[test]
    fn empty_patch_is_valid() {
        assert!(UpdateBook::default().validate().is_ok());
    }

    #[test]
    fn patch_checks_only_supplied_fields() {
        let patch = UpdateBook {
            title: Some(String::new()),
            price: Some(-0.5),
            ..UpdateBook::default()
        };
        let errors = patch.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["title", "price"]);
    }

    #[test]
    fn book_serializes_with_camel_case_wire_names() {
        let book = Book {
            id: "b-1".to_string(),
            title: "活着".to_string(),
            author: "余华".to_string(),
            publisher: "作家出版社".to_string(),
            category: "当代文学".to_string(),
            description: None,
            price: 20.0,
            cover: "https://example.com/c.jpg".to_string(),
            publication_date: Some("2012-08-01".to_string()),
            isbn: None,
            pages: Some(191),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        };

        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["publicationDate"], "2012-08-01");
        assert_eq!(value["createdAt"], "2026-01-01T00:00:00.000Z");
        assert!(value.get("description").is_none());
    }

    #[test]
    fn create_request_serializes_only_supplied_fields() {
        let value = serde_json::to_value(valid_input()).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("description"));
        assert!(!object.contains_key("isbn"));
        assert_eq!(object["title"], "三体");
    }
}
