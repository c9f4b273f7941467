//! List the posts that would be pre-rendered

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Print the enumerated slugs with their display fields
pub async fn run(blog: &Blog) -> Result<()> {
    let generator = Generator::new(blog)?;
    let static_paths = generator.static_paths().await?;

    println!("Posts ({}):", static_paths.paths.len());
    for params in &static_paths.paths {
        let post = generator.fetch_post(&params.slug).await?;
        let view = generator.prepare(&post);
        println!(
            "  {} - {} ({} min) [{}]",
            view.date, view.title, view.reading_time, view.slug
        );
    }

    if static_paths.fallback {
        println!("Other slugs are generated on demand.");
    }

    Ok(())
}
