//! Content management for markdown-based pages.
//!
//! Pages are markdown files with YAML frontmatter. The description page is
//! compiled into the binary; a content directory can add pages or override
//! built-in ones by slug.
//!
//! ```markdown
//! ---
//! title: About Us
//! description: Short summary for the page header
//! ---
//!
//! Markdown body.
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;

/// Built-in pages: (slug, markdown source).
const BUILTIN_PAGES: &[(&str, &str)] = &[(
    "description",
    include_str!("../content/pages/description.md"),
)];

/// Metadata for static pages.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A rendered page with metadata and HTML content
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub meta: PageMeta,
    pub content_html: String,
}

/// Content store that holds all loaded pages in memory
#[derive(Debug, Clone)]
pub struct ContentStore {
    pages: Arc<HashMap<String, Page>>,
}

impl ContentStore {
    /// Load the built-in pages.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in page has invalid frontmatter.
    pub fn builtin() -> Result<Self, ContentError> {
        let pages = Self::builtin_pages()?;
        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    /// Load the built-in pages, then `content_dir/pages/*.md` on top.
    ///
    /// Files that fail to parse are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the pages directory exists but cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let mut pages = Self::builtin_pages()?;
        let dir = content_dir.join("pages");

        if !dir.exists() {
            tracing::warn!("Pages directory does not exist: {:?}", dir);
            return Ok(Self {
                pages: Arc::new(pages),
            });
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| ContentError::Io(e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                match Self::load_page(&path) {
                    Ok(page) => {
                        tracing::info!("Loaded page: {}", page.slug);
                        pages.insert(page.slug.clone(), page);
                    }
                    Err(e) => {
                        tracing::error!("Failed to load page {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    fn builtin_pages() -> Result<HashMap<String, Page>, ContentError> {
        BUILTIN_PAGES
            .iter()
            .map(|(slug, source)| {
                let page = parse_page(slug, source)?;
                Ok(((*slug).to_string(), page))
            })
            .collect()
    }

    /// Load a single page from a markdown file
    fn load_page(path: &Path) -> Result<Page, ContentError> {
        let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?;

        parse_page(slug, &content)
    }

    /// Get a page by slug
    #[must_use]
    pub fn get_page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }
}

/// Parse frontmatter and render the markdown body.
fn parse_page(slug: &str, source: &str) -> Result<Page, ContentError> {
    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<PageMeta> = matter
        .parse(source)
        .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

    Ok(Page {
        slug: slug.to_string(),
        meta,
        content_html: render_markdown(&parsed.content),
    })
}

/// Render markdown to HTML with GitHub Flavored Markdown support.
///
/// Raw HTML in the source is escaped.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;

    markdown_to_html(content, &options)
}

/// Content loading errors
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_description_page() {
        let store = ContentStore::builtin().unwrap();
        let page = store.get_page("description").unwrap();
        assert!(page.meta.title.contains("About"));
        assert!(page.content_html.contains("<p>"));
    }

    #[test]
    fn test_missing_page() {
        let store = ContentStore::builtin().unwrap();
        assert!(store.get_page("terms").is_none());
    }

    #[test]
    fn test_parse_page_requires_frontmatter() {
        let result = parse_page("bare", "# Just a heading\n");
        assert!(matches!(result, Err(ContentError::Parse(_))));
    }

    #[test]
    fn test_parse_page_renders_markdown() {
        let page = parse_page(
            "faq",
            "---\ntitle: FAQ\ndescription: Questions\n---\n\n**Bold** answer\n",
        )
        .unwrap();
        assert_eq!(page.slug, "faq");
        assert_eq!(page.meta.title, "FAQ");
        assert_eq!(page.meta.description.as_deref(), Some("Questions"));
        assert!(page.content_html.contains("<strong>Bold</strong>"));
    }

    #[test]
    fn test_load_missing_directory_keeps_builtins() {
        let store = ContentStore::load(Path::new("/nonexistent/minishop-content")).unwrap();
        assert!(store.get_page("description").is_some());
    }
}
