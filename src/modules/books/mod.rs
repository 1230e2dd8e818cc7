pub mod models;
pub mod routes;
pub mod seed;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use libris_kernel::{InitCtx, Module};
use libris_store::MemoryStore;

use self::service::CatalogService;

/// Books module: CRUD and search over the in-memory catalog.
pub struct BooksModule {
    service: CatalogService,
}

impl BooksModule {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            service: CatalogService::new(store),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> axum::Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books with pagination",
                        "tags": ["Books"],
                        "parameters": [
                            {"name": "page", "in": "query", "schema": {"type": "integer", "minimum": 1, "default": 1}},
                            {"name": "limit", "in": "query", "schema": {"type": "integer", "minimum": 1, "default": 10}},
                            {"name": "sortField", "in": "query", "schema": {"type": "string", "default": "createdAt"}},
                            {"name": "sortOrder", "in": "query", "schema": {"type": "string", "enum": ["asc", "desc"], "default": "desc"}}
                        ],
                        "responses": {
                            "200": {
                                "description": "One page of books plus pagination",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/BookPage"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/CreateBook"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Created book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Book"
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Validation failure",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/search": {
                    "get": {
                        "summary": "Search books by free text",
                        "tags": ["Books"],
                        "parameters": [
                            {"name": "query", "in": "query", "schema": {"type": "string"}}
                        ],
                        "responses": {
                            "200": {
                                "description": "Matching books and their count",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "success": {"type": "boolean"},
                                                "data": {
                                                    "type": "array",
                                                    "items": {"$ref": "#/components/schemas/Book"}
                                                },
                                                "count": {"type": "integer"}
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book by id",
                        "tags": ["Books"],
                        "parameters": [
                            {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}}
                        ],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Book"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with that id",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "put": {
                        "summary": "Update a book",
                        "tags": ["Books"],
                        "parameters": [
                            {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}}
                        ],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/UpdateBook"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Updated book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Book"
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Validation failure",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with that id",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [
                            {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}}
                        ],
                        "responses": {
                            "200": {
                                "description": "Deletion confirmation",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "success": {"type": "boolean"},
                                                "message": {"type": "string"}
                                            }
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with that id",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "string", "description": "Unique identifier for the book"},
                            "title": {"type": "string"},
                            "author": {"type": "string"},
                            "publisher": {"type": "string"},
                            "category": {"type": "string"},
                            "description": {"type": "string"},
                            "price": {"type": "number", "minimum": 0},
                            "cover": {"type": "string", "description": "Cover image URL"},
                            "publicationDate": {"type": "string"},
                            "isbn": {"type": "string"},
                            "pages": {"type": "integer", "minimum": 1},
                            "createdAt": {"type": "string"},
                            "updatedAt": {"type": "string"}
                        },
                        "required": ["id", "title", "author", "publisher", "category", "price", "cover", "createdAt", "updatedAt"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "title": {"type": "string"},
                            "author": {"type": "string"},
                            "publisher": {"type": "string"},
                            "category": {"type": "string"},
                            "description": {"type": "string"},
                            "price": {"type": "number", "minimum": 0},
                            "cover": {"type": "string"},
                            "publicationDate": {"type": "string"},
                            "isbn": {"type": "string"},
                            "pages": {"type": "integer", "minimum": 1}
                        },
                        "required": ["title", "author", "publisher", "category", "price", "cover"]
                    },
                    "UpdateBook": {
                        "type": "object",
                        "properties": {
                            "title": {"type": "string"},
                            "author": {"type": "string"},
                            "publisher": {"type": "string"},
                            "category": {"type": "string"},
                            "description": {"type": "string"},
                            "price": {"type": "number", "minimum": 0},
                            "cover": {"type": "string"},
                            "publicationDate": {"type": "string"},
                            "isbn": {"type": "string"},
                            "pages": {"type": "integer", "minimum": 1}
                        }
                    },
                    "BookPage": {
                        "type": "object",
                        "properties": {
                            "success": {"type": "boolean"},
                            "data": {
                                "type": "array",
                                "items": {"$ref": "#/components/schemas/Book"}
                            },
                            "pagination": {
                                "type": "object",
                                "properties": {
                                    "page": {"type": "integer"},
                                    "limit": {"type": "integer"},
                                    "total": {"type": "integer"},
                                    "pages": {"type": "integer"}
                                }
                            }
                        }
                    }
                }
            }
        }))
    }

    async fn start(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if ctx.settings.store.seed_on_start {
            seed::seed_catalog(&self.service).await?;
        }
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(store: MemoryStore) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
