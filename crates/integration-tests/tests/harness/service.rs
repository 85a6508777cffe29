//! Article services with scripted misbehaviour

use std::time::Duration;

use async_trait::async_trait;
use scribe_article::{Article, ArticleService, Result};

/// What every call of a [`MisbehavingService`] does
#[derive(Debug, Clone, Copy)]
pub enum Misbehaviour {
    Panic,
    Stall(Duration),
}

/// Service whose every operation panics or stalls
#[derive(Debug, Clone, Copy)]
pub struct MisbehavingService(pub Misbehaviour);

impl MisbehavingService {
    async fn misbehave<T>(&self) -> Result<T> {
        match self.0 {
            Misbehaviour::Panic => panic!("article store exploded"),
            Misbehaviour::Stall(duration) => {
                tokio::time::sleep(duration).await;
                panic!("stalled call should have been cancelled")
            }
        }
    }
}

#[async_trait]
impl ArticleService for MisbehavingService {
    async fn fetch(&self, _cursor: &str, _num: i64) -> Result<(Vec<Article>, String)> {
        self.misbehave().await
    }

    async fn get_by_id(&self, _id: i64) -> Result<Article> {
        self.misbehave().await
    }

    async fn get_by_title(&self, _title: &str) -> Result<Article> {
        self.misbehave().await
    }

    async fn update(&self, _article: &mut Article) -> Result<()> {
        self.misbehave().await
    }

    async fn store(&self, _article: &mut Article) -> Result<()> {
        self.misbehave().await
    }

    async fn delete(&self, _id: i64) -> Result<()> {
        self.misbehave().await
    }
}
