//! Prismic REST API v2 client

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{query_string, ContentSource, Predicate, QueryOptions, QueryResponse, SearchResponse};
use crate::content::Post;
use crate::error::{Error, Result};

/// API root document; only the refs matter here
#[derive(Debug, Deserialize)]
struct ApiRoot {
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

/// HTTP client for a Prismic repository
#[derive(Debug, Clone)]
pub struct PrismicClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
}

impl PrismicClient {
    /// Create a client for an API root such as
    /// `https://my-repo.cdn.prismic.io/api/v2`
    pub fn new(endpoint: &str, access_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn search_url(&self) -> String {
        format!("{}/documents/search", self.endpoint)
    }

    /// Query parameters of a search request
    fn search_params(
        &self,
        master_ref: &str,
        predicates: &[Predicate],
        options: QueryOptions,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("ref", master_ref.to_string()),
            ("q", query_string(predicates)),
            ("pageSize", options.page_size.to_string()),
        ];
        if let Some(token) = &self.access_token {
            params.push(("access_token", token.clone()));
        }
        params
    }

    /// Resolve the ref of the currently published content
    async fn master_ref(&self) -> Result<String> {
        let mut request = self.http.get(&self.endpoint);
        if let Some(token) = &self.access_token {
            request = request.query(&[("access_token", token)]);
        }
        let root: ApiRoot = read_json(request.send().await?).await?;
        master_ref_of(root)
    }

    async fn search<T: DeserializeOwned>(
        &self,
        predicates: &[Predicate],
        options: QueryOptions,
    ) -> Result<SearchResponse<T>> {
        let master_ref = self.master_ref().await?;
        let params = self.search_params(&master_ref, predicates, options);
        tracing::debug!("GET {} q={}", self.search_url(), query_string(predicates));

        let response = self
            .http
            .get(self.search_url())
            .query(&params)
            .send()
            .await?;
        read_json(response).await
    }
}

fn master_ref_of(root: ApiRoot) -> Result<String> {
    root.refs
        .into_iter()
        .find(|r| r.is_master_ref)
        .map(|r| r.reference)
        .ok_or(Error::MissingMasterRef)
}

/// Decode a JSON body, turning non-success statuses into [`Error::Api`]
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

#[async_trait]
impl ContentSource for PrismicClient {
    async fn query(
        &self,
        predicates: &[Predicate],
        options: QueryOptions,
    ) -> Result<QueryResponse> {
        self.search(predicates, options).await
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Post> {
        let predicates = [Predicate::uid(doc_type, uid)];
        let response: SearchResponse<Post> =
            self.search(&predicates, QueryOptions { page_size: 1 }).await?;

        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }
}
