//! Generator module - turns CMS posts into static HTML pages
//!
//! Generation of one slug is self-contained: fetch the document, derive its
//! display fields, render, write. Pages are rendered to a string before
//! anything touches disk and land via rename, so a page is either complete
//! or absent.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::cms::{self, ContentSource, Predicate, QueryOptions};
use crate::comments::CommentWidget;
use crate::content::{reading_time, HtmlConverter, Post, RichTextConverter};
use crate::error::{Error, Result};
use crate::helpers::{
    date_xml, full_url_for, is_valid_slug, meta_generator, month_names, post_path,
    publication_date, truncate,
};
use crate::templates::{BlockView, PageState, PostView, SiteData, TemplateRenderer};
use crate::Blog;

/// Directory (under the post route) holding the loading shell
pub const FALLBACK_DIR: &str = "_fallback";

const DESCRIPTION_LENGTH: usize = 160;

/// Distinguishes temporary files of concurrent writes to the same page
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Route parameters of one pre-rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParams {
    pub slug: String,
}

/// Pages to pre-render at build time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPaths {
    pub paths: Vec<PathParams>,
    /// Slugs outside `paths` are generated on demand instead of 404ing
    pub fallback: bool,
}

/// Static site generator for CMS posts
pub struct Generator {
    blog: Blog,
    source: Arc<dyn ContentSource>,
    converter: Box<dyn HtmlConverter>,
    renderer: TemplateRenderer,
    timezone: chrono_tz::Tz,
    comments: Option<CommentWidget>,
}

impl Generator {
    /// Create a new generator using the configured content source
    pub fn new(blog: &Blog) -> Result<Self> {
        let source: Arc<dyn ContentSource> =
            Arc::from(cms::from_config(&blog.config.cms, &blog.base_dir)?);
        Self::with_source(blog, source)
    }

    /// Create a generator reading from an explicit content source
    pub fn with_source(blog: &Blog, source: Arc<dyn ContentSource>) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            source,
            converter: Box::new(RichTextConverter::new(blog.config.sanitize)),
            renderer: TemplateRenderer::new()?,
            timezone: blog.config.display_timezone()?,
            comments: CommentWidget::from_config(&blog.config.comments),
        })
    }

    pub fn blog(&self) -> &Blog {
        &self.blog
    }

    /// Enumerate the first page of known post slugs
    pub async fn static_paths(&self) -> Result<StaticPaths> {
        let cms = &self.blog.config.cms;
        let response = self
            .source
            .query(
                &[Predicate::document_type(&cms.document_type)],
                QueryOptions {
                    page_size: cms.page_size,
                },
            )
            .await?;

        if response.total_pages > 1 {
            tracing::debug!(
                "Pre-rendering {} of {} posts; the rest are generated on demand",
                response.results.len(),
                response.total_results_size
            );
        }

        let paths = response
            .results
            .into_iter()
            .filter_map(|doc| match doc.uid {
                Some(slug) => Some(PathParams { slug }),
                None => {
                    tracing::warn!("Skipping document {} without uid", doc.id);
                    None
                }
            })
            .collect();

        Ok(StaticPaths {
            paths,
            fallback: true,
        })
    }

    /// Fetch one post document by slug, unmodified
    pub async fn fetch_post(&self, slug: &str) -> Result<Post> {
        self.source
            .get_by_uid(&self.blog.config.cms.document_type, slug)
            .await
    }

    /// Derive the display fields of a post
    pub fn prepare(&self, post: &Post) -> PostView {
        let config = &self.blog.config;
        let path = post_path(&post.uid);

        let date = publication_date(
            post.publication_date.as_ref(),
            self.timezone,
            &config.date_format,
            month_names(&config.language),
            &config.date_placeholder,
        );

        let blocks = post
            .content()
            .iter()
            .map(|block| BlockView {
                heading: block.heading.clone(),
                html: self.converter.convert(&block.body),
            })
            .collect();

        PostView {
            slug: post.uid.clone(),
            title: post.data.title.clone(),
            banner_url: post.data.banner.url.clone(),
            author: post.data.author.clone(),
            date,
            date_iso: post.publication_date.as_ref().map(date_xml),
            reading_time: reading_time(post.content()),
            permalink: full_url_for(config, &path),
            path,
            description: description(post),
            blocks,
        }
    }

    fn site_data(&self) -> SiteData {
        let config = &self.blog.config;
        SiteData {
            title: config.title.clone(),
            language: config.language.clone(),
            root: config.root.clone(),
            generator: meta_generator(),
        }
    }

    /// Render a prepared post to a full HTML page
    pub fn render_post(&self, view: &PostView) -> Result<String> {
        let comments = self.comments.as_ref().map(CommentWidget::render);
        self.renderer.render_post(
            &self.site_data(),
            Some(view),
            PageState::Ready,
            comments.as_deref(),
        )
    }

    /// Render the loading shell
    pub fn render_loading(&self) -> Result<String> {
        self.renderer
            .render_post(&self.site_data(), None, PageState::Loading, None)
    }

    /// Render the not-found page
    pub fn render_not_found(&self) -> Result<String> {
        self.renderer.render_not_found(&self.site_data())
    }

    /// Fetch, prepare and render one slug without writing anything
    pub async fn build_page(&self, slug: &str) -> Result<String> {
        if !is_valid_slug(slug) {
            return Err(Error::NotFound {
                doc_type: self.blog.config.cms.document_type.clone(),
                uid: slug.to_string(),
            });
        }
        let post = self.fetch_post(slug).await?;
        let view = self.prepare(&post);
        self.render_post(&view)
    }

    /// Generate one post page and write it under the public directory
    pub async fn generate_post(&self, slug: &str) -> Result<GeneratedPage> {
        let html = self.build_page(slug).await?;
        let output = self.blog.post_dir(slug).join("index.html");
        write_atomic(&output, &html).await?;
        tracing::debug!("Generated post: {:?}", output);
        Ok(GeneratedPage { output, html })
    }

    /// Write the loading shell served while on-demand pages are produced
    pub async fn generate_fallback(&self) -> Result<PathBuf> {
        let output = self.blog.fallback_file();
        write_atomic(&output, &self.render_loading()?).await?;
        Ok(output)
    }

    /// Pre-render every enumerated slug plus the loading shell.
    ///
    /// Any failure aborts the build; pages already written stay valid.
    pub async fn generate(&self) -> Result<Vec<GeneratedPage>> {
        tokio::fs::create_dir_all(&self.blog.public_dir).await?;

        let static_paths = self.static_paths().await?;
        tracing::info!("Pre-rendering {} posts", static_paths.paths.len());

        let mut pages = Vec::with_capacity(static_paths.paths.len());
        for params in &static_paths.paths {
            pages.push(self.generate_post(&params.slug).await?);
        }

        if static_paths.fallback {
            self.generate_fallback().await?;
        }

        let not_found = self.blog.public_dir.join("404.html");
        write_atomic(&not_found, &self.render_not_found()?).await?;

        Ok(pages)
    }
}

/// A page written to disk
#[derive(Debug, Clone)]
pub struct GeneratedPage {
    pub output: PathBuf,
    pub html: String,
}

/// First non-empty body text of a post, shortened for a meta description
fn description(post: &Post) -> String {
    let text = post
        .content()
        .iter()
        .flat_map(|block| block.body.iter())
        .map(|span| span.text.trim())
        .find(|text| !text.is_empty())
        .unwrap_or("");
    truncate(text, DESCRIPTION_LENGTH, None)
}

/// Write through a temporary file so readers never see a partial page.
///
/// Every call gets its own temporary file in the target directory, so
/// concurrent writers of one page each land a complete copy.
async fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    tokio::fs::create_dir_all(parent).await?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = parent.join(format!(
        ".{}.{}-{}.tmp",
        name,
        std::process::id(),
        WRITE_SEQ.fetch_add(1, Ordering::Relaxed)
    ));

    tokio::fs::write(&tmp, contents).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}
