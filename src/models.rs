use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::entities::{comment, movie, rating};

/// A movie as the metadata provider describes it, keyed by its canonical title.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct MovieRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(flatten)]
    pub details: MovieDetails,
    #[serde(rename = "Ratings", default)]
    pub ratings: Vec<RatingEntry>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MovieDetails {
    pub year: Option<String>,
    pub rated: Option<String>,
    pub released: Option<String>,
    pub runtime: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub awards: Option<String>,
    pub poster: Option<String>,
    pub metascore: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    #[serde(rename = "DVD")]
    pub dvd: Option<String>,
    pub box_office: Option<String>,
    pub production: Option<String>,
    pub website: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RatingEntry {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// A stored movie together with its ratings.
#[derive(Clone, Debug, Serialize)]
pub struct MovieResponse {
    pub id: i32,
    #[serde(flatten)]
    pub record: MovieRecord,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct TopMovie {
    pub movie_id: i32,
    pub rank: u32,
    pub total_comments: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct CommentResponse {
    pub id: i32,
    pub movie_id: i32,
    pub author: String,
    pub text: String,
    pub created_at: jiff::Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub movie_id: Option<i32>,
    pub text: Option<String>,
    pub author: Option<String>,
    pub created_at: Option<String>,
}

impl MovieRecord {
    pub fn into_active_model(self) -> movie::ActiveModel {
        let d = self.details;
        movie::ActiveModel {
            id: NotSet,
            title: Set(self.title),
            year: Set(d.year),
            rated: Set(d.rated),
            released: Set(d.released),
            runtime: Set(d.runtime),
            genre: Set(d.genre),
            director: Set(d.director),
            writer: Set(d.writer),
            actors: Set(d.actors),
            plot: Set(d.plot),
            language: Set(d.language),
            country: Set(d.country),
            awards: Set(d.awards),
            poster: Set(d.poster),
            metascore: Set(d.metascore),
            imdb_rating: Set(d.imdb_rating),
            imdb_votes: Set(d.imdb_votes),
            imdb_id: Set(d.imdb_id),
            kind: Set(d.kind),
            dvd: Set(d.dvd),
            box_office: Set(d.box_office),
            production: Set(d.production),
            website: Set(d.website),
        }
    }
}

impl From<(movie::Model, Vec<rating::Model>)> for MovieResponse {
    fn from((m, ratings): (movie::Model, Vec<rating::Model>)) -> Self {
        let details = MovieDetails {
            year: m.year,
            rated: m.rated,
            released: m.released,
            runtime: m.runtime,
            genre: m.genre,
            director: m.director,
            writer: m.writer,
            actors: m.actors,
            plot: m.plot,
            language: m.language,
            country: m.country,
            awards: m.awards,
            poster: m.poster,
            metascore: m.metascore,
            imdb_rating: m.imdb_rating,
            imdb_votes: m.imdb_votes,
            imdb_id: m.imdb_id,
            kind: m.kind,
            dvd: m.dvd,
            box_office: m.box_office,
            production: m.production,
            website: m.website,
        };
        let ratings = ratings
            .into_iter()
            .map(|r| RatingEntry { source: r.source, value: r.value })
            .collect();
        Self { id: m.id, record: MovieRecord { title: m.title, details, ratings } }
    }
}

impl TryFrom<comment::Model> for CommentResponse {
    type Error = jiff::Error;

    fn try_from(c: comment::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: c.id,
            movie_id: c.movie_id,
            author: c.author,
            text: c.text,
            created_at: jiff::Timestamp::from_millisecond(c.created_at)?,
        })
    }
}
