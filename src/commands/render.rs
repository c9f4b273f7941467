//! Render a single post on demand

use anyhow::{Context, Result};
use std::io::Write;

use crate::generator::Generator;
use crate::Blog;

/// Generate one slug and write it under the public directory, or print the
/// page to stdout when `stdout` is set
pub async fn run(blog: &Blog, slug: &str, stdout: bool) -> Result<()> {
    let generator = Generator::new(blog)?;

    if stdout {
        let html = generator
            .build_page(slug)
            .await
            .with_context(|| format!("Failed to render {}", slug))?;
        std::io::stdout().write_all(html.as_bytes())?;
        return Ok(());
    }

    let page = generator
        .generate_post(slug)
        .await
        .with_context(|| format!("Failed to render {}", slug))?;
    println!("Generated {}", page.output.display());
    Ok(())
}
