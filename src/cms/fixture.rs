//! Documents stored as JSON files in a local directory

use async_trait::async_trait;
use std::path::PathBuf;

use super::{ContentSource, DocumentRef, Predicate, QueryOptions, QueryResponse};
use crate::content::Post;
use crate::error::{Error, Result};

/// Reads every `*.json` file of a directory as one CMS document
///
/// Files are read on every call, ordered by file name.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    dir: PathBuf,
}

impl FixtureSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn load_all(&self) -> Result<Vec<Post>> {
        let mut paths = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut posts = Vec::with_capacity(paths.len());
        for path in paths {
            let raw = tokio::fs::read(&path).await?;
            let post: Post = serde_json::from_slice(&raw)?;
            posts.push(post);
        }
        Ok(posts)
    }
}

fn matches(post: &Post, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::At { path, value } => match path.as_str() {
            "document.type" => post.doc_type == *value,
            other => other
                .strip_prefix("my.")
                .and_then(|rest| rest.strip_suffix(".uid"))
                .is_some_and(|doc_type| post.doc_type == doc_type && post.uid == *value),
        },
    }
}

#[async_trait]
impl ContentSource for FixtureSource {
    async fn query(
        &self,
        predicates: &[Predicate],
        options: QueryOptions,
    ) -> Result<QueryResponse> {
        let hits: Vec<Post> = self
            .load_all()
            .await?
            .into_iter()
            .filter(|post| predicates.iter().all(|p| matches(post, p)))
            .collect();

        let total = hits.len();
        let page_size = options.page_size.max(1);
        let results = hits
            .into_iter()
            .take(page_size)
            .map(|post| DocumentRef {
                id: post.uid.clone(),
                uid: Some(post.uid),
                doc_type: post.doc_type,
            })
            .collect();

        Ok(QueryResponse {
            page: 1,
            results_per_page: page_size,
            total_results_size: total,
            total_pages: total.div_ceil(page_size),
            next_page: None,
            results,
        })
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Post> {
        let predicate = Predicate::uid(doc_type, uid);
        self.load_all()
            .await?
            .into_iter()
            .find(|post| matches(post, &predicate))
            .ok_or_else(|| Error::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }
}
