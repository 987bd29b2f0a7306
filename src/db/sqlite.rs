use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use super::model::*;
use super::repo::*;

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens (creating if needed) the database at `db_url` and makes sure
    /// the schema exists. Fails if no connection can be made. In-memory URLs
    /// get the single-connection pool of [`SqliteRepository::in_memory`].
    pub async fn new(db_url: &str) -> DbResult<Self> {
        if is_memory_url(db_url) {
            info!("Using in-memory database, contents are lost on exit");
            return Self::in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let repo = Self { pool };
        repo.init_schema().await?;

        info!("Database initialized at {}", db_url);

        Ok(repo)
    }

    /// Private in-memory database. A single connection is kept open for the
    /// lifetime of the pool, since the data lives only as long as it does.
    pub async fn in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let repo = Self { pool };
        repo.init_schema().await?;
        Ok(repo)
    }

    async fn init_schema(&self) -> DbResult<()> {
        let schema = include_str!("schema.sql");
        sqlx::raw_sql(schema).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Every connection to an in-memory URL opens its own empty database.
fn is_memory_url(db_url: &str) -> bool {
    db_url.contains(":memory:") || db_url.contains("mode=memory")
}

fn parse_timestamp(s: Option<String>) -> Option<DateTime<Utc>> {
    s.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

async fn insert_movie_with<'e, E>(executor: E, movie: &Movie) -> DbResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let attributes = serde_json::to_string(&movie.attributes)?;
    sqlx::query("INSERT INTO movies (id, genre, attributes, created) VALUES (?, ?, ?, ?)")
        .bind(&movie.id)
        .bind(&movie.genre)
        .bind(attributes)
        .bind(Utc::now().to_rfc3339())
        .execute(executor)
        .await?;
    Ok(())
}

#[async_trait]
impl ProfileRepo for SqliteRepository {
    async fn get_profile(&self, user_id: &str) -> DbResult<Profile> {
        let result = sqlx::query_as::<_, (String, String, String, Option<String>)>(
            "SELECT userid, username, genre, created FROM profiles WHERE userid = ?",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                DbError::NotFound(format!("Profile not found: {}", user_id))
            }
            _ => DbError::Sqlx(e),
        })?;

        Ok(Profile {
            user_id: result.0,
            username: result.1,
            genre: result.2,
            created_at: parse_timestamp(result.3),
        })
    }

    async fn create_profile(&self, profile: &Profile) -> DbResult<()> {
        match self.get_profile(&profile.user_id).await {
            Ok(_) => {
                return Err(DbError::AlreadyExists(format!(
                    "Profile already exists: {}",
                    profile.user_id
                )))
            }
            Err(DbError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        // A concurrent insert can still win the race; the primary key
        // rejects the second one.
        sqlx::query("INSERT INTO profiles (userid, username, genre, created) VALUES (?, ?, ?, ?)")
            .bind(&profile.user_id)
            .bind(&profile.username)
            .bind(&profile.genre)
            .bind(profile.created_at.as_ref().map(|dt| dt.to_rfc3339()))
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    DbError::AlreadyExists(format!("Profile already exists: {}", profile.user_id))
                }
                _ => DbError::Sqlx(e),
            })?;

        debug!(user_id = %profile.user_id, genre = %profile.genre, "profile created");
        Ok(())
    }
}

#[async_trait]
impl MovieRepo for SqliteRepository {
    async fn list_movies(&self) -> DbResult<Vec<Movie>> {
        let results = sqlx::query_as::<_, (String, Option<String>, String)>(
            "SELECT id, genre, attributes FROM movies ORDER BY seq",
        )
        .fetch_all(&self.pool)
        .await?;

        results
            .into_iter()
            .map(|r| -> DbResult<Movie> {
                Ok(Movie {
                    id: r.0,
                    genre: r.1,
                    attributes: serde_json::from_str(&r.2)?,
                })
            })
            .collect()
    }

    async fn count_movies(&self) -> DbResult<i64> {
        let count = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await?
            .0;
        Ok(count)
    }

    async fn insert_movie(&self, movie: &Movie) -> DbResult<()> {
        insert_movie_with(&self.pool, movie).await
    }

    async fn insert_movies(&self, movies: &[Movie]) -> DbResult<u64> {
        let mut tx = self.pool.begin().await?;
        for movie in movies {
            insert_movie_with(&mut *tx, movie).await?;
        }
        tx.commit().await?;
        Ok(movies.len() as u64)
    }
}
