use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::try_join_all;
use scribe_core::DomainError;

use crate::domain::{Article, Author};
use crate::error::Result;
use crate::repository::{ArticleRepository, AuthorRepository};

/// Article use cases consumed by the HTTP handlers
#[async_trait]
pub trait ArticleService: Send + Sync {
    async fn fetch(&self, cursor: &str, num: i64) -> Result<(Vec<Article>, String)>;

    async fn get_by_id(&self, id: i64) -> Result<Article>;

    async fn get_by_title(&self, title: &str) -> Result<Article>;

    async fn update(&self, article: &mut Article) -> Result<()>;

    async fn store(&self, article: &mut Article) -> Result<()>;

    async fn delete(&self, id: i64) -> Result<()>;
}

/// [`ArticleService`] over an article and an author repository
#[derive(Clone)]
pub struct Service {
    articles: Arc<dyn ArticleRepository>,
    authors: Arc<dyn AuthorRepository>,
}

impl Service {
    pub fn new(articles: Arc<dyn ArticleRepository>, authors: Arc<dyn AuthorRepository>) -> Self {
        Self { articles, authors }
    }

    /// Replace each article's bare author with the stored one
    ///
    /// Every distinct author id is looked up once, all lookups in flight
    /// together. An author missing from the store leaves the bare id in place.
    async fn fill_authors(&self, articles: &mut [Article]) -> Result<()> {
        let ids: BTreeSet<i64> = articles.iter().map(|article| article.author.id).collect();

        let lookups = ids.into_iter().map(|id| async move {
            match self.authors.get_by_id(id).await {
                Ok(author) => Ok((id, Some(author))),
                Err(e) if e.is_not_found() => {
                    tracing::debug!(author_id = id, "author not found, keeping bare id");
                    Ok((id, None))
                }
                Err(e) => Err(e),
            }
        });

        let resolved: HashMap<i64, Author> = try_join_all(lookups)
            .await?
            .into_iter()
            .filter_map(|(id, author)| author.map(|author| (id, author)))
            .collect();

        for article in articles {
            if let Some(author) = resolved.get(&article.author.id) {
                article.author = author.clone();
            }
        }

        Ok(())
    }

    async fn fill_author(&self, article: Article) -> Result<Article> {
        let mut articles = [article];
        self.fill_authors(&mut articles).await?;
        let [article] = articles;
        Ok(article)
    }
}

#[async_trait]
impl ArticleService for Service {
    async fn fetch(&self, cursor: &str, num: i64) -> Result<(Vec<Article>, String)> {
        let (mut articles, next) = self.articles.fetch(cursor, num).await?;
        self.fill_authors(&mut articles).await?;
        Ok((articles, next))
    }

    async fn get_by_id(&self, id: i64) -> Result<Article> {
        let article = self.articles.get_by_id(id).await?;
        self.fill_author(article).await
    }

    async fn get_by_title(&self, title: &str) -> Result<Article> {
        let article = self.articles.get_by_title(title).await?;
        self.fill_author(article).await
    }

    async fn update(&self, article: &mut Article) -> Result<()> {
        article.updated_at = Utc::now();
        self.articles.update(article).await
    }

    async fn store(&self, article: &mut Article) -> Result<()> {
        match self.articles.get_by_title(&article.title).await {
            Ok(existing) => {
                tracing::debug!(article_id = existing.id, title = %article.title, "title already taken");
                return Err(DomainError::Conflict.into());
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let now = Utc::now();
        article.created_at = now;
        article.updated_at = now;

        self.articles.store(article).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.articles.get_by_id(id).await?;
        self.articles.delete(id).await
    }
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service").finish_non_exhaustive()
    }
}
