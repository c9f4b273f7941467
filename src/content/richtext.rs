//! Rich text to HTML conversion
//!
//! Structured text nodes are rendered block by block. Consecutive list items
//! are grouped into a single `<ul>` or `<ol>`. Inline spans are applied over
//! the node text using UTF-16 offsets, the unit the CMS reports them in.

use super::{Embed, InlineSpan, RichTextSpan};
use crate::helpers::html_escape;

/// Converts a rich text body into an HTML fragment
pub trait HtmlConverter: Send + Sync {
    fn convert(&self, body: &[RichTextSpan]) -> String;
}

/// Default converter for structured text
#[derive(Debug, Clone, Default)]
pub struct RichTextConverter {
    sanitize: bool,
}

#[derive(PartialEq, Clone, Copy)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn of(node: &RichTextSpan) -> Option<Self> {
        match node.kind.as_str() {
            "list-item" => Some(ListKind::Unordered),
            "o-list-item" => Some(ListKind::Ordered),
            _ => None,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

impl HtmlConverter for RichTextConverter {
    fn convert(&self, body: &[RichTextSpan]) -> String {
        let mut html = String::new();
        let mut list: Option<ListKind> = None;

        for node in body {
            let kind = ListKind::of(node);
            if list != kind {
                if let Some(open) = list {
                    html.push_str(&format!("</{}>", open.tag()));
                }
                if let Some(new) = kind {
                    html.push_str(&format!("<{}>", new.tag()));
                }
                list = kind;
            }
            html.push_str(&self.render_node(node));
        }

        if let Some(open) = list {
            html.push_str(&format!("</{}>", open.tag()));
        }

        html
    }
}

impl RichTextConverter {
    pub fn new(sanitize: bool) -> Self {
        Self { sanitize }
    }

    fn render_node(&self, node: &RichTextSpan) -> String {
        match node.kind.as_str() {
            kind @ ("heading1" | "heading2" | "heading3" | "heading4" | "heading5"
            | "heading6") => {
                let level = &kind["heading".len()..];
                format!("<h{0}>{1}</h{0}>", level, self.render_inline(node))
            }
            "preformatted" => format!("<pre>{}</pre>", self.render_inline(node)),
            "list-item" | "o-list-item" => format!("<li>{}</li>", self.render_inline(node)),
            "image" => self.render_image(node),
            "embed" => match &node.oembed {
                Some(embed) => self.render_embed(embed),
                None => String::new(),
            },
            _ => format!("<p>{}</p>", self.render_inline(node)),
        }
    }

    fn render_image(&self, node: &RichTextSpan) -> String {
        let src = node.url.as_deref().unwrap_or("");
        let alt = node.alt.as_deref().unwrap_or("");
        format!(
            r#"<p class="block-img"><img src="{}" alt="{}" /></p>"#,
            html_escape(src),
            html_escape(alt)
        )
    }

    fn render_embed(&self, embed: &Embed) -> String {
        let provider = embed
            .provider_name
            .as_deref()
            .map(|p| format!(r#" data-oembed-provider="{}""#, html_escape(&p.to_lowercase())))
            .unwrap_or_default();
        let inner = match (&embed.html, self.sanitize) {
            (Some(raw), false) => raw.clone(),
            _ => format!(
                r#"<a href="{0}">{0}</a>"#,
                html_escape(&embed.embed_url)
            ),
        };
        format!(
            r#"<div data-oembed="{}" data-oembed-type="{}"{}>{}</div>"#,
            html_escape(&embed.embed_url),
            html_escape(&embed.kind),
            provider,
            inner
        )
    }

    /// Render node text with its inline spans applied
    fn render_inline(&self, node: &RichTextSpan) -> String {
        let mut spans: Vec<&InlineSpan> = node.spans.iter().filter(|s| s.start < s.end).collect();
        // Outer spans first when two start together
        spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut out = String::with_capacity(node.text.len());
        let mut open: Vec<&InlineSpan> = Vec::new();
        let mut next = 0;
        let mut pos = 0;

        for ch in node.text.chars() {
            self.close_ended(&mut out, &mut open, pos);
            while next < spans.len() && spans[next].start <= pos {
                out.push_str(&self.open_tag(spans[next]));
                open.push(spans[next]);
                next += 1;
            }
            push_escaped(&mut out, ch);
            pos += ch.len_utf16();
        }

        for span in open.iter().rev() {
            out.push_str(close_tag(span));
        }

        out
    }

    /// Close every span ending at `pos`, reopening spans that were nested
    /// inside it but continue past it
    fn close_ended<'a>(&self, out: &mut String, open: &mut Vec<&'a InlineSpan>, pos: usize) {
        let Some(first) = open.iter().position(|s| s.end <= pos) else {
            return;
        };
        let tail: Vec<&InlineSpan> = open.drain(first..).collect();
        for span in tail.iter().rev() {
            out.push_str(close_tag(span));
        }
        for span in tail {
            if span.end > pos {
                out.push_str(&self.open_tag(span));
                open.push(span);
            }
        }
    }

    fn open_tag(&self, span: &InlineSpan) -> String {
        match span.kind.as_str() {
            "strong" => "<strong>".to_string(),
            "em" => "<em>".to_string(),
            "hyperlink" => {
                let data = span.data.clone().unwrap_or_default();
                let url = data.url.unwrap_or_default();
                let href = if self.sanitize && is_script_url(&url) {
                    "#".to_string()
                } else {
                    html_escape(&url)
                };
                match data.target {
                    Some(target) => format!(
                        r#"<a href="{}" target="{}" rel="noopener">"#,
                        href,
                        html_escape(&target)
                    ),
                    None => format!(r#"<a href="{}">"#, href),
                }
            }
            "label" => {
                let label = span
                    .data
                    .as_ref()
                    .and_then(|d| d.label.as_deref())
                    .unwrap_or("");
                format!(r#"<span class="{}">"#, html_escape(label))
            }
            _ => "<span>".to_string(),
        }
    }
}

fn close_tag(span: &InlineSpan) -> &'static str {
    match span.kind.as_str() {
        "strong" => "</strong>",
        "em" => "</em>",
        "hyperlink" => "</a>",
        _ => "</span>",
    }
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '\n' => out.push_str("<br />"),
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(ch),
    }
}

fn is_script_url(url: &str) -> bool {
    let url = url.trim_start().to_ascii_lowercase();
    url.starts_with("javascript:") || url.starts_with("vbscript:") || url.starts_with("data:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SpanData;

    fn node(kind: &str, text: &str) -> RichTextSpan {
        RichTextSpan {
            kind: kind.to_string(),
            ..RichTextSpan::paragraph(text)
        }
    }

    fn span(kind: &str, start: usize, end: usize) -> InlineSpan {
        InlineSpan {
            start,
            end,
            kind: kind.to_string(),
            data: None,
        }
    }

    fn link(start: usize, end: usize, url: &str) -> InlineSpan {
        InlineSpan {
            data: Some(SpanData {
                url: Some(url.to_string()),
                ..SpanData::default()
            }),
            ..span("hyperlink", start, end)
        }
    }

    #[test]
    fn test_paragraphs_and_headings() {
        let converter = RichTextConverter::default();
        let body = vec![node("heading2", "Título"), node("paragraph", "Texto")];
        assert_eq!(converter.convert(&body), "<h2>Título</h2><p>Texto</p>");
    }

    #[test]
    fn test_escapes_text_and_line_breaks() {
        let converter = RichTextConverter::default();
        let body = vec![node("paragraph", "a < b & c\nd")];
        assert_eq!(converter.convert(&body), "<p>a &lt; b &amp; c<br />d</p>");
    }

    #[test]
    fn test_groups_list_items() {
        let converter = RichTextConverter::default();
        let body = vec![
            node("list-item", "um"),
            node("list-item", "dois"),
            node("o-list-item", "primeiro"),
            node("paragraph", "fim"),
        ];
        assert_eq!(
            converter.convert(&body),
            "<ul><li>um</li><li>dois</li></ul><ol><li>primeiro</li></ol><p>fim</p>"
        );
    }

    #[test]
    fn test_nested_inline_spans() {
        let converter = RichTextConverter::default();
        let mut p = node("paragraph", "bold and italic");
        p.spans = vec![span("em", 9, 15), span("strong", 0, 15)];
        assert_eq!(
            converter.convert(&[p]),
            "<p><strong>bold and <em>italic</em></strong></p>"
        );
    }

    #[test]
    fn test_overlapping_spans_stay_well_formed() {
        let converter = RichTextConverter::default();
        let mut p = node("paragraph", "abcdef");
        p.spans = vec![span("strong", 0, 4), span("em", 2, 6)];
        assert_eq!(
            converter.convert(&[p]),
            "<p><strong>ab<em>cd</em></strong><em>ef</em></p>"
        );
    }

    #[test]
    fn test_offsets_count_utf16_units() {
        let converter = RichTextConverter::default();
        // 🚀 is two UTF-16 units
        let mut p = node("paragraph", "🚀 go");
        p.spans = vec![span("strong", 3, 5)];
        assert_eq!(converter.convert(&[p]), "<p>🚀 <strong>go</strong></p>");
    }

    #[test]
    fn test_hyperlink() {
        let converter = RichTextConverter::default();
        let mut p = node("paragraph", "veja aqui");
        p.spans = vec![link(5, 9, "https://example.com/?a=1&b=2")];
        assert_eq!(
            converter.convert(&[p]),
            r#"<p>veja <a href="https://example.com/?a=1&amp;b=2">aqui</a></p>"#
        );
    }

    #[test]
    fn test_sanitize_neutralises_script_links() {
        let mut p = node("paragraph", "x");
        p.spans = vec![link(0, 1, "javascript:alert(1)")];

        let trusting = RichTextConverter::new(false);
        assert!(trusting.convert(&[p.clone()]).contains("javascript:"));

        let sanitizing = RichTextConverter::new(true);
        assert_eq!(sanitizing.convert(&[p]), r##"<p><a href="#">x</a></p>"##);
    }

    #[test]
    fn test_embed_html_is_trusted_unless_sanitizing() {
        let mut e = node("embed", "");
        e.oembed = Some(Embed {
            embed_url: "https://youtu.be/x".to_string(),
            kind: "video".to_string(),
            provider_name: Some("YouTube".to_string()),
            html: Some("<iframe src=\"https://youtube.com/embed/x\"></iframe>".to_string()),
        });

        let trusting = RichTextConverter::new(false).convert(&[e.clone()]);
        assert!(trusting.contains("<iframe"));
        assert!(trusting.contains(r#"data-oembed-provider="youtube""#));

        let sanitizing = RichTextConverter::new(true).convert(&[e]);
        assert!(!sanitizing.contains("<iframe"));
        assert!(sanitizing.contains(r#"<a href="https://youtu.be/x">"#));
    }

    #[test]
    fn test_image() {
        let converter = RichTextConverter::default();
        let mut img = node("image", "");
        img.url = Some("https://images.prismic.io/a.png".to_string());
        img.alt = Some("foto".to_string());
        assert_eq!(
            converter.convert(&[img]),
            r#"<p class="block-img"><img src="https://images.prismic.io/a.png" alt="foto" /></p>"#
        );
    }
}
