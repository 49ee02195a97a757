mod diesel_queries;

use std::fmt::Debug;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::pooled_connection::deadpool::{Object, Pool};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use diesel_async_migrations::{embed_migrations, EmbeddedMigrations};
use tracing::info;

use crate::models::{Blog, BlogComment, BlogPost, Profile, User};
use crate::persistence::{EntityStore, Persistence, StoreError};

/// A PostgreSQL-backed [`Persistence`] implementation. It uses a connection
/// pool internally, so it's cheaply cloneable.
#[derive(Clone)]
pub struct Store {
    pool: Pool<AsyncPgConnection>,
}

impl Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // It might contain sensitive data, so don't print it.
        f.debug_struct("Store").finish()
    }
}

impl Store {
    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

    /// Connects to the database and runs all pending migrations.
    pub async fn new(db_url: &str) -> anyhow::Result<Self> {
        info!("Initializing database connection pool");

        let manager = AsyncDieselConnectionManager::new(db_url);
        let pool = Pool::builder(manager).build()?;
        let store = Self { pool };

        store.run_migrations().await?;

        Ok(store)
    }

    async fn run_migrations(&self) -> anyhow::Result<()> {
        let mut conn = self.pool.get().await?;

        // Several API instances may start against the same database; only one
        // of them may run migrations at a time.
        diesel::sql_query("select pg_advisory_lock(1)")
            .execute(&mut conn)
            .await?;
        info!("Run database migrations");

        let res = Self::MIGRATIONS
            .run_pending_migrations(&mut conn)
            .await
            .map_err(|e| anyhow::anyhow!(e));

        diesel::sql_query("select pg_advisory_unlock(1)")
            .execute(&mut conn)
            .await?;

        res
    }

    pub async fn conn(&self) -> Result<Object<AsyncPgConnection>, StoreError> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Backend(e.into()))
    }
}

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(
                kind @ (DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::NotNullViolation
                | DatabaseErrorKind::CheckViolation),
                info,
            ) => StoreError::Constraint(format!("{:?}: {}", kind, info.message())),
            err => StoreError::Backend(err.into()),
        }
    }
}

impl Persistence for Store {
    fn users(&self) -> &dyn EntityStore<User> {
        self
    }

    fn profiles(&self) -> &dyn EntityStore<Profile> {
        self
    }

    fn blogs(&self) -> &dyn EntityStore<Blog> {
        self
    }

    fn blog_posts(&self) -> &dyn EntityStore<BlogPost> {
        self
    }

    fn blog_comments(&self) -> &dyn EntityStore<BlogComment> {
        self
    }
}
