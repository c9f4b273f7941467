//! Initialize a new blog

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r#"# Blog Configuration

# Site
title: spacetraveling
description: ''
language: pt-BR
timezone: ''

# URL
url: http://localhost:4000
root: /

# Directory
public_dir: public

# Writing
date_format: DD MMM YYYY
date_placeholder: Não publicado
sanitize: false

# Content source
cms:
  # Prismic API root, e.g. https://my-repo.cdn.prismic.io/api/v2
  endpoint: ''
  access_token:
  # Local documents; remove to read from the endpoint instead
  fixtures_dir: content
  document_type: post
  # Posts pre-rendered at build time; others render on demand
  page_size: 2

# utterances comments
comments:
  enable: true
  repo: ''
  issue_term: pathname
  theme: github-dark
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }

    fs::create_dir_all(target_dir.join("content"))?;
    fs::write(&config_path, CONFIG_TEMPLATE)?;

    // A sample document so the site builds before a CMS is wired up
    let sample = serde_json::json!({
        "uid": "hello-world",
        "type": "post",
        "first_publication_date": chrono::Utc::now().to_rfc3339(),
        "data": {
            "title": "Hello World",
            "banner": { "url": "" },
            "author": "John Doe",
            "content": [
                {
                    "heading": "Primeiros passos",
                    "body": [
                        {
                            "type": "paragraph",
                            "text": "Este é o seu primeiro post. Configure cms.endpoint para ler posts do seu CMS.",
                            "spans": [{ "start": 10, "end": 25, "type": "strong" }]
                        }
                    ]
                }
            ]
        }
    });
    fs::write(
        target_dir.join("content/hello-world.json"),
        serde_json::to_string_pretty(&sample)?,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Blog;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.cms.fixtures_dir.as_deref(), Some("content"));
        assert_eq!(blog.config.date_format, "DD MMM YYYY");
        assert!(dir.path().join("content/hello-world.json").exists());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
