
mod top_movies_tests;
