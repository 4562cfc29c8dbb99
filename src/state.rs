use crate::db::{DbPool, OrmConn};

/// Shared handles passed to every handler. The sqlx pool backs the raw
/// reporting queries and migrations, the SeaORM connection backs entity CRUD.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
}
