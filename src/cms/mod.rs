//! Content source adapters
//!
//! The generator talks to the CMS through [`ContentSource`]. Two adapters
//! exist: [`PrismicClient`] for the hosted REST API and [`FixtureSource`]
//! for documents stored as JSON files on disk.

mod fixture;
mod prismic;

pub use fixture::FixtureSource;
pub use prismic::PrismicClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::CmsConfig;
use crate::content::Post;
use crate::error::{Error, Result};

/// Query predicate over document fields
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Field equals value, e.g. `at(document.type, "post")`
    At { path: String, value: String },
}

impl Predicate {
    pub fn at(path: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::At {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Restrict to one document type
    pub fn document_type(doc_type: &str) -> Self {
        Self::at("document.type", doc_type)
    }

    /// Match the uid field of a document type
    pub fn uid(doc_type: &str, uid: &str) -> Self {
        Self::at(format!("my.{}.uid", doc_type), uid)
    }

    /// Query-language form, e.g. `[at(document.type, "post")]`
    pub fn to_query(&self) -> String {
        match self {
            Predicate::At { path, value } => {
                format!(r#"[at({}, "{}")]"#, path, value.replace('"', "\\\""))
            }
        }
    }
}

/// Combine predicates into the `q` parameter
pub fn query_string(predicates: &[Predicate]) -> String {
    let inner: String = predicates.iter().map(Predicate::to_query).collect();
    format!("[{}]", inner)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryOptions {
    pub page_size: usize,
}

/// One page of search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse<T> {
    #[serde(default = "first_page")]
    pub page: usize,
    #[serde(default)]
    pub results_per_page: usize,
    #[serde(default)]
    pub total_results_size: usize,
    #[serde(default)]
    pub total_pages: usize,
    #[serde(default)]
    pub next_page: Option<String>,
    pub results: Vec<T>,
}

fn first_page() -> usize {
    1
}

/// Minimal view of a search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type", default)]
    pub doc_type: String,
}

pub type QueryResponse = SearchResponse<DocumentRef>;

/// A store of CMS documents
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// First page of documents matching every predicate
    async fn query(&self, predicates: &[Predicate], options: QueryOptions)
        -> Result<QueryResponse>;

    /// Fetch one document by its uid, or [`Error::NotFound`]
    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Post>;
}

/// Build the content source described by the configuration
pub fn from_config(config: &CmsConfig, base_dir: &Path) -> Result<Box<dyn ContentSource>> {
    if let Some(dir) = &config.fixtures_dir {
        tracing::debug!("Using fixture content source at {}", dir);
        return Ok(Box::new(FixtureSource::new(base_dir.join(dir))));
    }
    if !config.endpoint.is_empty() {
        tracing::debug!("Using CMS API at {}", config.endpoint);
        return Ok(Box::new(PrismicClient::new(
            &config.endpoint,
            config.access_token.clone(),
        )));
    }
    Err(Error::NoContentSource)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_query() {
        assert_eq!(
            Predicate::document_type("post").to_query(),
            r#"[at(document.type, "post")]"#
        );
        assert_eq!(
            Predicate::uid("post", "hello").to_query(),
            r#"[at(my.post.uid, "hello")]"#
        );
        assert_eq!(
            Predicate::at("my.post.title", r#"say "hi""#).to_query(),
            r#"[at(my.post.title, "say \"hi\"")]"#
        );
    }

    #[test]
    fn test_query_string() {
        let q = query_string(&[Predicate::document_type("post")]);
        assert_eq!(q, r#"[[at(document.type, "post")]]"#);
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "page": 1,
            "results_per_page": 2,
            "results_size": 2,
            "total_results_size": 5,
            "total_pages": 3,
            "next_page": "https://blog.cdn.prismic.io/api/v2/documents/search?page=2",
            "prev_page": null,
            "results": [
                { "id": "a", "uid": "primeiro", "type": "post", "data": {} },
                { "id": "b", "uid": null, "type": "post", "data": {} }
            ]
        }"#;
        let response: QueryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.total_pages, 3);
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].uid.as_deref(), Some("primeiro"));
        assert_eq!(response.results[1].uid, None);
        assert!(response.next_page.is_some());
    }

    #[test]
    fn test_from_config_requires_a_source() {
        let config = CmsConfig::default();
        let result = from_config(&config, Path::new("."));
        assert!(matches!(result, Err(Error::NoContentSource)));
    }
}
