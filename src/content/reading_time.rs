//! Reading time estimation

use super::ContentBlock;

/// Average reading speed
pub const WORDS_PER_MINUTE: usize = 200;

/// Count whitespace-separated words
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Total words across every heading and body span of a post
pub fn total_words(content: &[ContentBlock]) -> usize {
    content
        .iter()
        .map(|block| {
            let body_words: usize = block.body.iter().map(|span| count_words(&span.text)).sum();
            count_words(&block.heading) + body_words
        })
        .sum()
}

/// Estimated minutes needed to read `content`, rounded up.
///
/// An empty post reads in 0 minutes.
pub fn reading_time(content: &[ContentBlock]) -> usize {
    total_words(content).div_ceil(WORDS_PER_MINUTE)
}
