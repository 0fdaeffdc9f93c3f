/// Movie metadata providers.
///
/// The booking core only needs two reads from a metadata source: a single
/// movie by its numeric id and a page of popular movies. Handlers and the
/// ticket renderer depend on the trait so tests can swap in a mock.
use crate::{
    error::AppResult,
    models::{Movie, MoviePage},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    /// Details for one movie
    async fn get_movie(&self, id: u64) -> AppResult<Movie>;

    /// One page of the popular listing, 1-based
    async fn popular(&self, page: u32) -> AppResult<MoviePage>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
