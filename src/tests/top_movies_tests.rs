use std::sync::Arc;

use axum::http::StatusCode;
use jiff::{SignedDuration, Timestamp};
use serde_json::json;

use super::test_utils::*;

async fn state() -> Arc<crate::AppState> {
    setup_test_state(Arc::new(StaticProvider::new(citizen_kane()))).await
}

fn days(n: i64) -> SignedDuration {
    SignedDuration::from_hours(24 * n)
}

#[tokio::test]
async fn endpoint_on_empty_db() {
    let state = state().await;

    let (status, body) = send(&state, get_request("/top/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn single_movie_without_comments_is_returned() {
    let state = state().await;
    let movie = add_movie(&state, "Godfather").await;

    let (status, body) = send(&state, get_request("/top/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"movie_id": movie, "rank": 1, "total_comments": 0}]));
}

#[tokio::test]
async fn movies_without_comments_all_share_first_rank() {
    let state = state().await;
    let ids = [
        add_movie(&state, "Godfather").await,
        add_movie(&state, "Gone With The Wind").await,
        add_movie(&state, "The Room").await,
    ];

    let (_, body) = send(&state, get_request("/top/")).await;

    assert_eq!(
        sorted_by(&body, "movie_id"),
        ids.iter()
            .map(|id| json!({"movie_id": id, "rank": 1, "total_comments": 0}))
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn comments_are_counted() {
    let state = state().await;
    let movie = add_movie(&state, "Godfather").await;
    add_comment(&state, movie, "It was ok").await;
    add_comment(&state, movie, "I fell asleep after half an hour").await;
    add_comment(&state, movie, "I think Marlon Brando was hot").await;

    let (_, body) = send(&state, get_request("/top/")).await;

    assert_eq!(body, json!([{"movie_id": movie, "rank": 1, "total_comments": 3}]));
}

#[tokio::test]
async fn distinct_counts_get_consecutive_ranks() {
    let state = state().await;
    let godfather = add_movie(&state, "Godfather").await;
    for text in ["It was ok", "I fell asleep", "Brando"] {
        add_comment(&state, godfather, text).await;
    }
    let room = add_movie(&state, "The Room").await;
    add_comment(&state, room, "Masterpiece beyond our understanding").await;
    add_comment(&state, room, "New look at modern drama").await;
    let fantastic_four = add_movie(&state, "Fantastic Four").await;

    let (_, body) = send(&state, get_request("/top/")).await;

    // Emitted in rank order
    assert_eq!(
        body,
        json!([
            {"movie_id": godfather, "rank": 1, "total_comments": 3},
            {"movie_id": room, "rank": 2, "total_comments": 2},
            {"movie_id": fantastic_four, "rank": 3, "total_comments": 0},
        ])
    );
}

#[tokio::test]
async fn tie_in_comment_number_results_in_the_same_rank() {
    let state = state().await;
    let godfather = add_movie(&state, "Godfather").await;
    add_comment(&state, godfather, "It was ok").await;
    let room = add_movie(&state, "The Room").await;
    add_comment(&state, room, "Masterpiece beyond our understanding").await;
    let fantastic_four = add_movie(&state, "Fantastic Four").await;

    let (_, body) = send(&state, get_request("/top/")).await;

    assert_eq!(
        sorted_by(&body, "movie_id"),
        vec![
            json!({"movie_id": godfather, "rank": 1, "total_comments": 1}),
            json!({"movie_id": room, "rank": 1, "total_comments": 1}),
            json!({"movie_id": fantastic_four, "rank": 2, "total_comments": 0}),
        ]
    );
    assert_eq!(body[2]["movie_id"], fantastic_four);
}

#[tokio::test]
async fn wide_window_counts_everything_and_keeps_uncommented_movies() {
    let state = state().await;
    let godfather = add_movie(&state, "Godfather").await;
    for text in ["It was ok", "I fell asleep", "Brando"] {
        add_comment(&state, godfather, text).await;
    }
    let room = add_movie(&state, "The Room").await;
    add_comment(&state, room, "Masterpiece").await;
    add_comment(&state, room, "New look at modern drama").await;
    let fantastic_four = add_movie(&state, "Fantastic Four").await;

    let now = Timestamp::now();
    let uri = format!("/top/?from={}&to={}", now - days(1), now + days(1));
    let (status, body) = send(&state, get_request(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"movie_id": godfather, "rank": 1, "total_comments": 3},
            {"movie_id": room, "rank": 2, "total_comments": 2},
            {"movie_id": fantastic_four, "rank": 3, "total_comments": 0},
        ])
    );
}

#[tokio::test]
async fn narrow_window_excludes_comments_outside_it() {
    let state = state().await;
    let now = Timestamp::now();
    let godfather = add_movie(&state, "Godfather").await;
    add_comment_at(&state, godfather, "It was ok", Some(now - days(2))).await;
    add_comment(&state, godfather, "I fell asleep after half an hour").await;
    add_comment(&state, godfather, "I think Marlon Brando was hot").await;
    add_comment_at(&state, godfather, "A crossover episode?", Some(now + days(2))).await;
    let room = add_movie(&state, "The Room").await;
    add_comment(&state, room, "Masterpiece beyond our understanding").await;
    add_comment(&state, room, "New look at modern drama").await;

    let uri = format!("/top/?from={}&to={}", now - days(1), now + days(1));
    let (_, body) = send(&state, get_request(&uri)).await;

    assert_eq!(
        sorted_by(&body, "movie_id"),
        vec![
            json!({"movie_id": godfather, "rank": 1, "total_comments": 2}),
            json!({"movie_id": room, "rank": 1, "total_comments": 2}),
        ]
    );
}

#[tokio::test]
async fn half_open_windows() {
    let state = state().await;
    let now = Timestamp::now();
    let old = add_movie(&state, "Nosferatu").await;
    add_comment_at(&state, old, "Classic", Some(now - days(10))).await;
    let new = add_movie(&state, "Dune").await;
    add_comment(&state, new, "Loud").await;
    add_comment(&state, new, "Sandy").await;

    let uri = format!("/top/?from={}", now - days(1));
    let (_, body) = send(&state, get_request(&uri)).await;
    assert_eq!(
        body,
        json!([
            {"movie_id": new, "rank": 1, "total_comments": 2},
            {"movie_id": old, "rank": 2, "total_comments": 0},
        ])
    );

    let uri = format!("/top/?to={}", now - days(1));
    let (_, body) = send(&state, get_request(&uri)).await;
    assert_eq!(
        body,
        json!([
            {"movie_id": old, "rank": 1, "total_comments": 1},
            {"movie_id": new, "rank": 2, "total_comments": 0},
        ])
    );
}

#[tokio::test]
async fn bounds_are_inclusive() {
    let state = state().await;
    let at: Timestamp = "2024-03-01T12:00:00Z".parse().unwrap();
    let movie = add_movie(&state, "Godfather").await;
    add_comment_at(&state, movie, "On the dot", Some(at)).await;

    let uri = "/top/?from=2024-03-01T12:00:00Z&to=2024-03-01T12:00:00Z";
    let (_, body) = send(&state, get_request(uri)).await;

    assert_eq!(body, json!([{"movie_id": movie, "rank": 1, "total_comments": 1}]));
}

#[tokio::test]
async fn empty_bounds_are_ignored() {
    let state = state().await;
    let movie = add_movie(&state, "Godfather").await;
    add_comment(&state, movie, "It was ok").await;

    let (status, body) = send(&state, get_request("/top/?from=&to=")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"movie_id": movie, "rank": 1, "total_comments": 1}]));
}

#[tokio::test]
async fn unparseable_bound_is_rejected() {
    let state = state().await;
    add_movie(&state, "Godfather").await;

    let (status, body) = send(&state, get_request("/top/?from=last-tuesday")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["string"].as_str().unwrap().starts_with("from: invalid timestamp"));
}
