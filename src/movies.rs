use tracing::debug;

use crate::{
    error::{AppError, AppResult, is_unique_violation, storage_error_text},
    models::{MovieRecord, RatingEntry},
    omdb::MetadataProvider,
    store::MovieStore,
};

/// Fetches `title` from the provider and stores it unless the canonical title
/// is already known.
///
/// The provider record is returned either way. Ratings are attached to
/// whichever row ends up owning the title; a rating the store refuses is
/// dropped without failing the request.
pub async fn create_movie(
    store: &MovieStore,
    provider: &dyn MetadataProvider,
    title: &str,
) -> AppResult<MovieRecord> {
    let mut record = provider.fetch(title).await?;
    let ratings = std::mem::take(&mut record.ratings);

    validate(&record)?;

    let movie_id = match store.find_by_title(&record.title).await? {
        Some(existing) => {
            debug!(title = %record.title, movie_id = existing.id, "movie already stored");
            existing.id
        },
        None => insert_or_adopt(store, &record).await?,
    };

    for rating in &ratings {
        if let Err(err) = attach_rating(store, movie_id, rating).await {
            debug!(movie_id, source = %rating.source, error = %err, "skipping rating");
        }
    }

    record.ratings = ratings;
    Ok(record)
}

/// Inserts `record`, or returns the id of the row a concurrent request stored
/// under the same title after this request's lookup missed.
async fn insert_or_adopt(store: &MovieStore, record: &MovieRecord) -> AppResult<i32> {
    match store.insert_movie(record.clone()).await {
        Ok(movie) => {
            debug!(title = %movie.title, movie_id = movie.id, "stored new movie");
            Ok(movie.id)
        },
        Err(err) if is_unique_violation(&err) => {
            debug!(title = %record.title, "lost insert race, using existing movie");
            let existing = store.find_by_title(&record.title).await?;
            Ok(existing.ok_or(AppError::Database(err))?.id)
        },
        Err(err) => Err(AppError::Storage(storage_error_text(&err))),
    }
}

async fn attach_rating(store: &MovieStore, movie_id: i32, rating: &RatingEntry) -> AppResult<()> {
    if rating.source.trim().is_empty() || rating.value.trim().is_empty() {
        return Err(AppError::Validation("rating source and value are required".to_string()));
    }
    store
        .insert_rating(movie_id, rating)
        .await
        .map_err(|e| AppError::Storage(storage_error_text(&e)))
}

fn validate(record: &MovieRecord) -> AppResult<()> {
    if record.title.trim().is_empty() {
        return Err(AppError::Validation("Title: This field may not be blank.".to_string()));
    }
    Ok(())
}
