//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Pre-render the enumerated posts
pub async fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(blog)?;
    let pages = generator.generate().await?;

    for page in &pages {
        tracing::debug!("Wrote {:?}", page.output);
    }

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} posts in {:.2}s",
        pages.len(),
        duration.as_secs_f64()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_generate_from_fixtures() {
        let dir = TempDir::new().unwrap();
        let fixtures = dir.path().join("content");
        fs::create_dir_all(&fixtures).unwrap();
        let doc = serde_json::json!({
            "uid": "primeiro-post",
            "type": "post",
            "first_publication_date": "2021-05-19T00:00:00+0000",
            "data": { "title": "Primeiro post", "author": "Autor", "content": [] }
        });
        fs::write(fixtures.join("primeiro.json"), doc.to_string()).unwrap();

        let mut config = SiteConfig::default();
        config.cms.fixtures_dir = Some("content".to_string());
        let blog = Blog::with_config(dir.path(), config);

        run(&blog).await.unwrap();

        let html = fs::read_to_string(blog.post_dir("primeiro-post").join("index.html")).unwrap();
        assert!(html.contains("Primeiro post"));
        assert!(html.contains("19 Mai 2021"));
    }

    #[tokio::test]
    async fn test_generate_without_source_fails() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        assert!(run(&blog).await.is_err());
        assert!(!blog.public_dir.exists());
    }
}
