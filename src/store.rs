use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, JoinType, ModelTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Set,
    sea_query::{Expr, LikeExpr},
};

use crate::{
    entities::{comment, movie, rating},
    error::AppResult,
    models::{MovieRecord, RatingEntry},
    ranking::TimeWindow,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromQueryResult)]
pub struct CommentCount {
    pub movie_id: i32,
    pub total_comments: i64,
}

#[derive(Clone, Debug)]
pub struct NewComment {
    pub movie_id: i32,
    pub author: Option<String>,
    pub text: String,
    /// Unix milliseconds; `None` means now.
    pub created_at: Option<i64>,
}

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_title(&self, title: &str) -> AppResult<Option<movie::Model>> {
        let movie = movie::Entity::find()
            .filter(movie::Column::Title.eq(title))
            .one(&self.db)
            .await?;
        Ok(movie)
    }

    /// Raw insert; callers inspect the error to tell a lost race from bad data.
    pub async fn insert_movie(&self, record: MovieRecord) -> Result<movie::Model, DbErr> {
        record.into_active_model().insert(&self.db).await
    }

    pub async fn insert_rating(&self, movie_id: i32, entry: &RatingEntry) -> Result<(), DbErr> {
        let model = rating::ActiveModel {
            id: Default::default(),
            movie_id: Set(movie_id),
            source: Set(entry.source.clone()),
            value: Set(entry.value.clone()),
        };
        rating::Entity::insert(model).exec(&self.db).await?;
        Ok(())
    }

    pub async fn list_movies(
        &self,
        title: Option<&str>,
    ) -> AppResult<Vec<(movie::Model, Vec<rating::Model>)>> {
        let mut query = movie::Entity::find();
        if let Some(title) = title {
            // SQLite LIKE is case-insensitive for ASCII
            let pattern = LikeExpr::new(format!("%{}%", escape_like(title))).escape('\\');
            query = query.filter(Expr::col((movie::Entity, movie::Column::Title)).like(pattern));
        }
        let movies = query
            .order_by_asc(movie::Column::Id)
            .find_with_related(rating::Entity)
            .all(&self.db)
            .await?;
        Ok(movies)
    }

    pub async fn get_movie(
        &self,
        id: i32,
    ) -> AppResult<Option<(movie::Model, Vec<rating::Model>)>> {
        let Some(movie) = movie::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let ratings = movie
            .find_related(rating::Entity)
            .order_by_asc(rating::Column::Id)
            .all(&self.db)
            .await?;
        Ok(Some((movie, ratings)))
    }

    /// Returns whether a row was removed. Ratings and comments go with it.
    pub async fn delete_movie(&self, id: i32) -> AppResult<bool> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }

    /// Per-movie count of comments inside `window`.
    ///
    /// The window is part of the join condition rather than a WHERE clause, so
    /// movies without a qualifying comment still come back with a count of 0.
    pub async fn comment_counts(&self, window: TimeWindow) -> AppResult<Vec<CommentCount>> {
        let mut join = movie::Relation::Comment.def();
        if !window.is_unbounded() {
            join = join.on_condition(move |_movie, comments| {
                let created_at = || Expr::col((comments.clone(), comment::Column::CreatedAt));
                let mut cond = Condition::all();
                if let Some(from) = window.from {
                    cond = cond.add(created_at().gte(from));
                }
                if let Some(to) = window.to {
                    cond = cond.add(created_at().lte(to));
                }
                cond
            });
        }

        let counts = movie::Entity::find()
            .select_only()
            .column_as(movie::Column::Id, "movie_id")
            .column_as(Expr::col((comment::Entity, comment::Column::Id)).count(), "total_comments")
            .join(JoinType::LeftJoin, join)
            .group_by(movie::Column::Id)
            .order_by_asc(movie::Column::Id)
            .into_model::<CommentCount>()
            .all(&self.db)
            .await?;
        Ok(counts)
    }

    pub async fn movie_exists(&self, id: i32) -> AppResult<bool> {
        Ok(movie::Entity::find_by_id(id).one(&self.db).await?.is_some())
    }

    pub async fn insert_comment(&self, new: NewComment) -> AppResult<comment::Model> {
        let model = comment::ActiveModel {
            id: Default::default(),
            movie_id: Set(new.movie_id),
            author: Set(new.author.unwrap_or_else(|| "Anonymous".to_string())),
            text: Set(new.text),
            created_at: Set(new.created_at.unwrap_or_else(now_ms)),
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn list_comments(&self, movie_id: Option<i32>) -> AppResult<Vec<comment::Model>> {
        let mut query = comment::Entity::find();
        if let Some(movie_id) = movie_id {
            query = query.filter(comment::Column::MovieId.eq(movie_id));
        }
        let comments = query
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await?;
        Ok(comments)
    }
}

/// Makes `%`, `_` and the escape character itself match literally.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn now_ms() -> i64 {
    jiff::Timestamp::now().as_millisecond()
}
