//! In-memory stores
//!
//! Used when no database is configured, and by tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use scribe_core::DomainError;
use tokio::sync::RwLock;

use crate::cursor;
use crate::domain::{Article, Author};
use crate::error::{ArticleError, Result};
use crate::repository::{ArticleRepository, AuthorRepository, next_cursor};

#[derive(Debug, Default)]
struct ArticleTable {
    rows: BTreeMap<i64, Article>,
    last_id: i64,
}

/// Article store backed by a map, ids assigned from 1
#[derive(Debug, Clone, Default)]
pub struct InMemoryArticleRepository {
    table: Arc<RwLock<ArticleTable>>,
}

impl InMemoryArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn fetch(&self, cursor: &str, num: i64) -> Result<(Vec<Article>, String)> {
        let after = cursor::decode(cursor)?;
        let limit = usize::try_from(num).unwrap_or(0);
        let table = self.table.read().await;

        let mut page: Vec<Article> = table
            .rows
            .values()
            .filter(|article| article.created_at > after)
            .cloned()
            .collect();
        page.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        page.truncate(limit);

        let next = next_cursor(&page, num);
        Ok((page, next))
    }

    async fn get_by_id(&self, id: i64) -> Result<Article> {
        let table = self.table.read().await;
        table.rows.get(&id).cloned().ok_or_else(|| DomainError::NotFound.into())
    }

    async fn get_by_title(&self, title: &str) -> Result<Article> {
        let table = self.table.read().await;
        table
            .rows
            .values()
            .find(|article| article.title == title)
            .cloned()
            .ok_or_else(|| DomainError::NotFound.into())
    }

    async fn store(&self, article: &mut Article) -> Result<()> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        article.id = table.last_id;
        table.rows.insert(article.id, article.clone());
        Ok(())
    }

    async fn update(&self, article: &Article) -> Result<()> {
        let mut table = self.table.write().await;
        let row = table.rows.get_mut(&article.id).ok_or(ArticleError::AffectedRows(0))?;

        row.title.clone_from(&article.title);
        row.content.clone_from(&article.content);
        row.author.id = article.author.id;
        row.updated_at = article.updated_at;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut table = self.table.write().await;
        table.rows.remove(&id).map(|_| ()).ok_or(ArticleError::AffectedRows(0))
    }
}

/// Author store backed by a map
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuthorRepository {
    authors: Arc<RwLock<HashMap<i64, Author>>>,
}

impl InMemoryAuthorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an author
    pub async fn insert(&self, author: Author) {
        self.authors.write().await.insert(author.id, author);
    }
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {
    async fn get_by_id(&self, id: i64) -> Result<Author> {
        let authors = self.authors.read().await;
        authors.get(&id).cloned().ok_or_else(|| DomainError::NotFound.into())
    }
}
