//! View layer
//!
//! Renders HTML and Markdown templates and JSON/XML documents from
//! [`ViewData`], serving and populating the view cache on the way.

use std::path::PathBuf;
use thiserror::Error;

use crate::cache::CacheError;

pub mod data;
mod engine;
pub mod markdown;
pub mod template;
pub mod xml;

pub use crate::cache::CacheOverride;
pub use data::{HelperFn, ViewData, ViewValue};
pub use engine::ViewEngine;

/// Kinds of rendered output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Html,
    Markdown,
    Json,
    Xml,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::Html,
        ViewKind::Markdown,
        ViewKind::Json,
        ViewKind::Xml,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Html => "html",
            ViewKind::Markdown => "markdown",
            ViewKind::Json => "json",
            ViewKind::Xml => "xml",
        }
    }

    /// Template file extension, for kinds rendered from a template
    pub fn template_extension(&self) -> Option<&'static str> {
        match self {
            ViewKind::Html => Some("html"),
            ViewKind::Markdown => Some("md"),
            ViewKind::Json | ViewKind::Xml => None,
        }
    }

    /// Content type of the rendered output (Markdown renders to HTML)
    pub fn content_type(&self) -> &'static str {
        match self {
            ViewKind::Html | ViewKind::Markdown => "text/html; charset=utf-8",
            ViewKind::Json => "application/json",
            ViewKind::Xml => "application/xml",
        }
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("Invalid view name: {0:?}")]
    InvalidName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Cache(#[from] CacheError),
}
