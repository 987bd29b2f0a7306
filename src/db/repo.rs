use async_trait::async_trait;

use super::model::*;

#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> DbResult<Profile>;
    /// Fails with `AlreadyExists` when a profile for the user id is stored.
    async fn create_profile(&self, profile: &Profile) -> DbResult<()>;
}

#[async_trait]
pub trait MovieRepo: Send + Sync {
    async fn list_movies(&self) -> DbResult<Vec<Movie>>;
    async fn count_movies(&self) -> DbResult<i64>;
    async fn insert_movie(&self, movie: &Movie) -> DbResult<()>;
    /// Inserts all movies in one transaction; either all are stored or none.
    async fn insert_movies(&self, movies: &[Movie]) -> DbResult<u64>;
}

pub trait Repository: ProfileRepo + MovieRepo + Send + Sync {}

impl<T: ProfileRepo + MovieRepo + Send + Sync> Repository for T {}
