//! Existence lookups for `unique:<table>` validation rules.

use async_trait::async_trait;
use sea_orm::sea_query::{Alias, Expr, Query};
use sea_orm::{ConnectionTrait, DbConn};

use postboard_core::error::RepoError;
use postboard_core::ports::UniquenessChecker;

use super::base::db_error;

pub struct OrmUniquenessChecker {
    db: DbConn,
}

impl OrmUniquenessChecker {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UniquenessChecker for OrmUniquenessChecker {
    async fn is_taken(&self, table: &str, column: &str, value: &str) -> Result<bool, RepoError> {
        let query = Query::select()
            .expr(Expr::val(1))
            .from(Alias::new(table))
            .and_where(Expr::col(Alias::new(column)).eq(value))
            .limit(1)
            .to_owned();

        let backend = self.db.get_database_backend();
        let row = self
            .db
            .query_one(backend.build(&query))
            .await
            .map_err(db_error)?;

        tracing::debug!(table, column, taken = row.is_some(), "Checked uniqueness");
        Ok(row.is_some())
    }
}
