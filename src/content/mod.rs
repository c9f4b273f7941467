//! Content module - post documents, reading time and rich text rendering

mod post;
mod reading_time;
mod richtext;

pub use post::{Banner, ContentBlock, Embed, InlineSpan, Post, PostData, RichTextSpan, SpanData};
pub use reading_time::{count_words, reading_time, total_words, WORDS_PER_MINUTE};
pub use richtext::{HtmlConverter, RichTextConverter};
