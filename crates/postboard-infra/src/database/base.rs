use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    DbConn, DbErr, EntityTrait, Iterable, PrimaryKeyToColumn, PrimaryKeyTrait, QueryOrder, SqlErr,
};

use postboard_core::error::RepoError;
use postboard_core::ports::BaseRepository;

use super::entity::{post, tag, user};

/// Name used for an entity in `NotFound` errors.
pub trait Labeled {
    const LABEL: &'static str;
}

impl Labeled for post::Entity {
    const LABEL: &'static str = "post";
}

impl Labeled for tag::Entity {
    const LABEL: &'static str = "tag";
}

impl Labeled for user::Entity {
    const LABEL: &'static str = "user";
}

/// Map a SeaORM error onto the repository error taxonomy.
pub(crate) fn db_error(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg))
        | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
            return RepoError::Constraint(msg);
        }
        _ => {}
    }

    match err {
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}

/// Generic SeaORM repository over an integer-keyed entity.
pub struct OrmBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> OrmBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E, T> BaseRepository<T, i32> for OrmBaseRepository<E>
where
    E: EntityTrait + Labeled,
    E::Model: Sync + Send,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
    T: From<E::Model> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i32) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id).one(&self.db).await.map_err(db_error)?;

        Ok(result.map(Into::into))
    }

    async fn all(&self) -> Result<Vec<T>, RepoError> {
        let mut select = E::find();
        for key in E::PrimaryKey::iter() {
            select = select.order_by_asc(key.into_column());
        }

        let rows = select.all(&self.db).await.map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let result = E::delete_by_id(id).exec(&self.db).await.map_err(db_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::not_found(E::LABEL, id));
        }

        Ok(())
    }
}
