//! Built-in post theme using the Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping stays on; the only
//! values marked safe are rich text fragments, the comment widget and the
//! generator meta tag.

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::Result;

/// Title shown while a page is generated on demand
pub const LOADING_TEXT: &str = "Carregando...";

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("post.html", include_str!("theme/post.html")),
            ("not_found.html", include_str!("theme/not_found.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render a post page in the given state
    pub fn render_post(
        &self,
        site: &SiteData,
        post: Option<&PostView>,
        state: PageState,
        comments: Option<&str>,
    ) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("post", &post);
        context.insert("state", &state);
        context.insert("comments", &comments);
        context.insert("loading_text", LOADING_TEXT);
        self.render("post.html", &context)
    }

    /// Render the generic not-found page
    pub fn render_not_found(&self, site: &SiteData) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        self.render("not_found.html", &context)
    }
}

/// Externally visible page states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageState {
    /// Shell served while the page is produced on demand
    Loading,
    Ready,
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub language: String,
    pub root: String,
    pub generator: String,
}

/// Display-ready fields of one post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    pub slug: String,
    pub title: String,
    pub banner_url: String,
    pub author: String,
    pub date: String,
    pub date_iso: Option<String>,
    pub reading_time: usize,
    pub path: String,
    pub permalink: String,
    pub description: String,
    pub blocks: Vec<BlockView>,
}

/// One content block with its body converted to HTML
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockView {
    pub heading: String,
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteData {
        SiteData {
            title: "spacetraveling".to_string(),
            language: "pt-BR".to_string(),
            root: "/".to_string(),
            generator: crate::helpers::meta_generator(),
        }
    }

    fn view() -> PostView {
        PostView {
            slug: "hooks".to_string(),
            title: "Hooks & <Effects>".to_string(),
            banner_url: "https://images.prismic.io/banner.png".to_string(),
            author: "Joseph Oliveira".to_string(),
            date: "19 Mai 2021".to_string(),
            date_iso: Some("2021-05-19T00:00:00.000+00:00".to_string()),
            reading_time: 4,
            path: "/post/hooks/".to_string(),
            permalink: "http://localhost:4000/post/hooks/".to_string(),
            description: "Lorem ipsum".to_string(),
            blocks: vec![
                BlockView {
                    heading: "Intro".to_string(),
                    html: "<p><strong>one</strong></p>".to_string(),
                },
                BlockView {
                    heading: "Intro".to_string(),
                    html: "<p>two</p>".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_render_ready_post() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer
            .render_post(&site(), Some(&view()), PageState::Ready, None)
            .unwrap();

        assert!(html.contains("<h1>Hooks &amp; &lt;Effects&gt;</h1>"));
        assert!(html.contains("19 Mai 2021"));
        assert!(html.contains("4 min"));
        assert!(html.contains("Joseph Oliveira"));
        assert!(html.contains("<p><strong>one</strong></p>"));
        assert!(!html.contains(LOADING_TEXT));
        assert!(!html.contains("inject-comments"));

        let first = html.find("<p><strong>one</strong></p>").unwrap();
        let second = html.find("<p>two</p>").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_render_loading_shell() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer
            .render_post(&site(), None, PageState::Loading, None)
            .unwrap();
        assert!(html.contains(LOADING_TEXT));
        assert!(html.contains(r#"http-equiv="refresh""#));
        assert!(!html.contains("reading-time"));
    }

    #[test]
    fn test_render_with_comments() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer
            .render_post(
                &site(),
                Some(&view()),
                PageState::Ready,
                Some("<div id=\"inject-comments-for-uterances\"></div>"),
            )
            .unwrap();
        assert!(html.contains("<div id=\"inject-comments-for-uterances\"></div>"));
    }

    #[test]
    fn test_render_not_found() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer.render_not_found(&site()).unwrap();
        assert!(html.contains("404"));
    }
}
