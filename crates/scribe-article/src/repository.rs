use async_trait::async_trait;

use crate::cursor;
use crate::domain::{Article, Author};
use crate::error::Result;

/// Article persistence
///
/// Lookups report a missing row as `DomainError::NotFound`. Writes expect to
/// touch exactly one row.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Page of articles created strictly after `cursor`, oldest first
    ///
    /// Returns the page and the cursor for the next one, empty when the page
    /// was not full.
    async fn fetch(&self, cursor: &str, num: i64) -> Result<(Vec<Article>, String)>;

    async fn get_by_id(&self, id: i64) -> Result<Article>;

    async fn get_by_title(&self, title: &str) -> Result<Article>;

    /// Insert and assign the generated id
    async fn store(&self, article: &mut Article) -> Result<()>;

    /// Overwrite title, content, author and `updated_at`
    async fn update(&self, article: &Article) -> Result<()>;

    async fn delete(&self, id: i64) -> Result<()>;
}

/// Author lookup
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<Author>;
}

/// Cursor for the page after `page`, empty unless the page is full
pub(crate) fn next_cursor(page: &[Article], num: i64) -> String {
    match page.last() {
        Some(last) if i64::try_from(page.len()).is_ok_and(|len| len == num) => cursor::encode(last.created_at),
        _ => String::new(),
    }
}
