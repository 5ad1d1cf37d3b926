use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{
        CommentResponse, CreateCommentRequest, CreateMovieRequest, MovieRecord, MovieResponse,
        TopMovie,
    },
    movies,
    ranking::{self, TimeWindow, parse_timestamp},
    store::NewComment,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/movies/", get(list_movies).post(create_movie))
        .route("/movies/{id}", get(get_movie).delete(delete_movie))
        .route("/top/", get(top_movies))
        .route("/comments/", get(list_comments).post(create_comment))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn bad_path(rejection: PathRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

fn bad_query(rejection: QueryRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

#[derive(Debug, Deserialize)]
pub struct MovieQuery {
    title: Option<String>,
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MovieQuery>, QueryRejection>,
) -> AppResult<Json<Vec<MovieResponse>>> {
    let Query(q) = query.map_err(bad_query)?;
    let movies = state.store.list_movies(q.title.as_deref()).await?;
    Ok(Json(movies.into_iter().map(MovieResponse::from).collect()))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateMovieRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MovieRecord>)> {
    let title = body
        .ok()
        .and_then(|Json(req)| req.title)
        .filter(|t| !t.trim().is_empty())
        .ok_or(AppError::MissingParameter("Title is a required parameter"))?;

    let record = movies::create_movie(&state.store, &*state.provider, &title).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<MovieResponse>> {
    let Path(id) = path.map_err(bad_path)?;
    let movie = state.store.get_movie(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(movie.into()))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = path.map_err(bad_path)?;
    if !state.store.delete_movie(id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    from: Option<String>,
    to: Option<String>,
}

pub async fn top_movies(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TopQuery>, QueryRejection>,
) -> AppResult<Json<Vec<TopMovie>>> {
    let Query(q) = query.map_err(bad_query)?;
    let window = TimeWindow::from_query(q.from.as_deref(), q.to.as_deref())?;
    let counts = state.store.comment_counts(window).await?;
    Ok(Json(ranking::dense_rank(counts)))
}

#[derive(Debug, Deserialize)]
pub struct CommentQuery {
    movie_id: Option<i32>,
}

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CommentQuery>, QueryRejection>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    let Query(q) = query.map_err(bad_query)?;
    let comments = state
        .store
        .list_comments(q.movie_id)
        .await?
        .into_iter()
        .map(CommentResponse::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(Json(comments))
}

pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CommentResponse>)> {
    let Json(req) = body.map_err(|_| AppError::MissingParameter("Movie and text are required"))?;
    let movie_id = req.movie_id.ok_or(AppError::MissingParameter("Movie is a required parameter"))?;
    let text = req
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or(AppError::MissingParameter("Text is a required parameter"))?;

    if !state.store.movie_exists(movie_id).await? {
        return Err(AppError::Validation(format!("Movie {movie_id} does not exist")));
    }

    let created_at = match req.created_at.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            parse_timestamp(raw)
                .map_err(|e| AppError::Validation(format!("created_at: {e}")))?
                .as_millisecond(),
        ),
        None => None,
    };
    let author = req.author.map(|a| a.trim().to_string()).filter(|a| !a.is_empty());

    let comment =
        state.store.insert_comment(NewComment { movie_id, author, text, created_at }).await?;
    let comment = CommentResponse::try_from(comment).map_err(|e| AppError::Internal(e.into()))?;
    Ok((StatusCode::CREATED, Json(comment)))
}
