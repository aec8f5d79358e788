use crate::config::Config;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub fn create_pool(config: &Config) -> Result<DbPool, r2d2::PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(&config.database_url);
    r2d2::Pool::builder()
        .max_size(config.db_pool_size)
        .build(manager)
}

/// Check a connection out of the pool, turning failure into an `ApiError`.
#[macro_export]
macro_rules! get_conn {
    ($pool:expr) => {
        $pool.get().map_err($crate::error::ApiError::from)?
    };
}
