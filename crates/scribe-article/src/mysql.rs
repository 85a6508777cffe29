//! MySQL stores
//!
//! ```sql
//! CREATE TABLE author (
//!     id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
//!     name VARCHAR(200) NOT NULL DEFAULT '',
//!     created_at DATETIME(6) NOT NULL,
//!     updated_at DATETIME(6) NOT NULL
//! );
//!
//! CREATE TABLE article (
//!     id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
//!     title VARCHAR(45) NOT NULL,
//!     content LONGTEXT NOT NULL,
//!     author_id BIGINT NOT NULL DEFAULT 0,
//!     updated_at DATETIME(6) NOT NULL,
//!     created_at DATETIME(6) NOT NULL
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scribe_config::DatabaseConfig;
use scribe_core::DomainError;
use secrecy::ExposeSecret;
use sqlx::MySqlPool;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};

use crate::cursor;
use crate::domain::{Article, Author};
use crate::error::{ArticleError, Result};
use crate::repository::{ArticleRepository, AuthorRepository, next_cursor};

const FETCH_ARTICLES: &str = "SELECT id, title, content, author_id, updated_at, created_at \
     FROM article WHERE created_at > ? ORDER BY created_at LIMIT ?";
const ARTICLE_BY_ID: &str = "SELECT id, title, content, author_id, updated_at, created_at FROM article WHERE id = ?";
const ARTICLE_BY_TITLE: &str =
    "SELECT id, title, content, author_id, updated_at, created_at FROM article WHERE title = ? LIMIT 1";
const INSERT_ARTICLE: &str =
    "INSERT INTO article (title, content, author_id, updated_at, created_at) VALUES (?, ?, ?, ?, ?)";
const UPDATE_ARTICLE: &str = "UPDATE article SET title = ?, content = ?, author_id = ?, updated_at = ? WHERE id = ?";
const DELETE_ARTICLE: &str = "DELETE FROM article WHERE id = ?";
const AUTHOR_BY_ID: &str = "SELECT id, name, created_at, updated_at FROM author WHERE id = ?";

/// Open a connection pool and verify the database is reachable
///
/// # Errors
///
/// Returns an error if no connection can be established
pub async fn connect(config: &DatabaseConfig) -> std::result::Result<MySqlPool, sqlx::Error> {
    let options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(config.password.expose_secret())
        .database(&config.name);

    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout_duration())
        .connect_with(options)
        .await
}

#[derive(sqlx::FromRow)]
struct ArticleRow {
    id: i64,
    title: String,
    content: String,
    author_id: i64,
    updated_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            author: Author {
                id: row.author_id,
                ..Author::default()
            },
            updated_at: row.updated_at,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AuthorRow {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn expect_one_row(affected: u64) -> Result<()> {
    if affected == 1 { Ok(()) } else { Err(ArticleError::AffectedRows(affected)) }
}

/// Article store over the `article` table
#[derive(Debug, Clone)]
pub struct MySqlArticleRepository {
    pool: MySqlPool,
}

impl MySqlArticleRepository {
    pub const fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleRepository for MySqlArticleRepository {
    async fn fetch(&self, cursor: &str, num: i64) -> Result<(Vec<Article>, String)> {
        let after = cursor::decode(cursor)?;

        let page: Vec<Article> = sqlx::query_as::<_, ArticleRow>(FETCH_ARTICLES)
            .bind(after)
            .bind(num)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Article::from)
            .collect();

        let next = next_cursor(&page, num);
        Ok((page, next))
    }

    async fn get_by_id(&self, id: i64) -> Result<Article> {
        sqlx::query_as::<_, ArticleRow>(ARTICLE_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Article::from)
            .ok_or_else(|| DomainError::NotFound.into())
    }

    async fn get_by_title(&self, title: &str) -> Result<Article> {
        sqlx::query_as::<_, ArticleRow>(ARTICLE_BY_TITLE)
            .bind(title)
            .fetch_optional(&self.pool)
            .await?
            .map(Article::from)
            .ok_or_else(|| DomainError::NotFound.into())
    }

    async fn store(&self, article: &mut Article) -> Result<()> {
        let result = sqlx::query(INSERT_ARTICLE)
            .bind(article.title.as_str())
            .bind(article.content.as_str())
            .bind(article.author.id)
            .bind(article.updated_at)
            .bind(article.created_at)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_id();
        article.id = i64::try_from(id).map_err(|_| ArticleError::IdOutOfRange(id))?;
        Ok(())
    }

    async fn update(&self, article: &Article) -> Result<()> {
        let result = sqlx::query(UPDATE_ARTICLE)
            .bind(article.title.as_str())
            .bind(article.content.as_str())
            .bind(article.author.id)
            .bind(article.updated_at)
            .bind(article.id)
            .execute(&self.pool)
            .await?;

        expect_one_row(result.rows_affected())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query(DELETE_ARTICLE).bind(id).execute(&self.pool).await?;
        expect_one_row(result.rows_affected())
    }
}

/// Author store over the `author` table
#[derive(Debug, Clone)]
pub struct MySqlAuthorRepository {
    pool: MySqlPool,
}

impl MySqlAuthorRepository {
    pub const fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepository for MySqlAuthorRepository {
    async fn get_by_id(&self, id: i64) -> Result<Author> {
        sqlx::query_as::<_, AuthorRow>(AUTHOR_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Author::from)
            .ok_or_else(|| DomainError::NotFound.into())
    }
}
