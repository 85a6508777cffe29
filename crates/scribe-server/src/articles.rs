use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use http::{HeaderValue, StatusCode};
use scribe_article::{Article, ArticleError, ArticleService};
use scribe_core::{AppError, HttpError, status_message};
use serde::Deserialize;

use crate::dispatch::HandlerError;

const DEFAULT_NUM: i64 = 10;
const X_CURSOR: &str = "x-cursor";

type ArticleState = Arc<dyn ArticleService>;

/// Routes for the article resource under `/api/v1`
pub fn article_router(service: ArticleState) -> Router {
    Router::new()
        .route("/api/v1/articles", get(fetch_articles).post(store_article))
        .route(
            "/api/v1/articles/{id}",
            get(get_article).put(update_article).delete(delete_article),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
struct FetchParams {
    num: Option<String>,
    cursor: Option<String>,
}

impl FetchParams {
    /// Page size; missing, unparsable and non-positive values fall back
    fn num(&self) -> i64 {
        self.num
            .as_deref()
            .and_then(|num| num.trim().parse::<i64>().ok())
            .filter(|num| *num > 0)
            .unwrap_or(DEFAULT_NUM)
    }
}

/// Wrap a service failure under an operation message
///
/// Domain conditions keep their status, anything else answers 500. The
/// service error stays attached as the cause for the log line.
fn service_failure(message: &'static str, error: ArticleError) -> HandlerError {
    let status = match &error {
        ArticleError::Domain(domain) => domain.status_code(),
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    AppError::with_cause(status, message, error).into()
}

/// Numeric article id from the path, a bad-request failure otherwise
fn parse_id(path: Result<Path<String>, PathRejection>) -> Result<i64, HandlerError> {
    let Path(raw) = path?;

    raw.parse::<i64>().map_err(|e| {
        let status = StatusCode::BAD_REQUEST;
        AppError::with_cause(status, status_message(status), e).into()
    })
}

fn bind_article(payload: Result<Json<Article>, JsonRejection>) -> Result<Article, HandlerError> {
    let Json(article) = payload?;

    article
        .validate()
        .map_err(|violations| AppError::with_details(StatusCode::BAD_REQUEST, "参数验证失败", violations.to_string()))?;

    Ok(article)
}

async fn fetch_articles(
    State(service): State<ArticleState>,
    params: Result<Query<FetchParams>, QueryRejection>,
) -> Result<Response, HandlerError> {
    let Query(params) = params?;
    let cursor = params.cursor.as_deref().unwrap_or_default();

    let (articles, next) = service
        .fetch(cursor, params.num())
        .await
        .map_err(|e| service_failure("获取文章列表失败", e))?;

    let mut response = Json(articles).into_response();
    if let Ok(value) = HeaderValue::from_str(&next) {
        response.headers_mut().insert(X_CURSOR, value);
    }

    Ok(response)
}

async fn get_article(
    State(service): State<ArticleState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Article>, HandlerError> {
    let id = parse_id(id)?;
    let article = service.get_by_id(id).await.map_err(|e| service_failure("获取文章失败", e))?;

    Ok(Json(article))
}

async fn store_article(
    State(service): State<ArticleState>,
    payload: Result<Json<Article>, JsonRejection>,
) -> Result<(StatusCode, Json<Article>), HandlerError> {
    let mut article = bind_article(payload)?;
    article.id = 0;

    service.store(&mut article).await.map_err(|e| service_failure("创建文章失败", e))?;

    Ok((StatusCode::CREATED, Json(article)))
}

async fn update_article(
    State(service): State<ArticleState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<Article>, JsonRejection>,
) -> Result<Json<Article>, HandlerError> {
    let id = parse_id(id)?;
    let mut article = bind_article(payload)?;

    let existing = service.get_by_id(id).await.map_err(|e| service_failure("更新文章失败", e))?;
    article.id = id;
    article.created_at = existing.created_at;
    if article.author.id == 0 {
        article.author = existing.author;
    }

    service.update(&mut article).await.map_err(|e| service_failure("更新文章失败", e))?;

    let updated = service.get_by_id(id).await.map_err(|e| service_failure("更新文章失败", e))?;
    Ok(Json(updated))
}

async fn delete_article(
    State(service): State<ArticleState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, HandlerError> {
    let id = parse_id(id)?;
    service.delete(id).await.map_err(|e| service_failure("删除文章失败", e))?;

    Ok(StatusCode::NO_CONTENT)
}
