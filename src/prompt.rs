//! Composing the lyrics request from the selected article and a template.

use crate::models::Article;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
#[error("failed to read template {}: {source}", .path.display())]
pub struct TemplateError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Read the request template verbatim.
///
/// # Errors
///
/// Returns [`TemplateError`] if the file is missing or unreadable.
#[instrument(level = "info", fields(path = %path.display()))]
pub fn load_template(path: &Path) -> Result<String, TemplateError> {
    let template = std::fs::read_to_string(path).map_err(|source| TemplateError {
        path: path.to_path_buf(),
        source,
    })?;
    info!(bytes = template.len(), "Loaded request template");
    Ok(template)
}

/// Prepend the article block to the template.
///
/// Article text is inserted as-is, without escaping.
pub fn compose_request(article: &Article, body: &str, template: &str) -> String {
    format!(
        "Selected Article:\n\nTitle: {}\n\nContent: {}\n\nURL: {}\n\n{}",
        article.title, body, article.url, template
    )
}
