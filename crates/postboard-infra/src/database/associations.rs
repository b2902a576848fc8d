//! Post/tag association through the `post_tag` join table.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbConn, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};

use postboard_core::domain::TagSet;
use postboard_core::error::RepoError;
use postboard_core::ports::TagAssociations;

use super::base::db_error;
use super::entity::post_tag;
use super::entity::prelude::{PostEntity, PostTagEntity, TagEntity};
use super::entity::{post, tag};

/// SeaORM implementation of the post/tag association.
pub struct OrmTagAssociations {
    db: DbConn,
}

impl OrmTagAssociations {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

async fn ensure_post_exists<C: ConnectionTrait>(conn: &C, post_id: i32) -> Result<(), RepoError> {
    let found = PostEntity::find()
        .select_only()
        .column(post::Column::Id)
        .filter(post::Column::Id.eq(post_id))
        .into_tuple::<i32>()
        .one(conn)
        .await
        .map_err(db_error)?;

    found
        .map(|_| ())
        .ok_or(RepoError::not_found("post", post_id))
}

/// Fails with the smallest tag id that has no row.
async fn ensure_tags_exist<C: ConnectionTrait>(conn: &C, tags: &TagSet) -> Result<(), RepoError> {
    if tags.is_empty() {
        return Ok(());
    }

    let found: TagSet = TagEntity::find()
        .select_only()
        .column(tag::Column::Id)
        .filter(tag::Column::Id.is_in(tags.to_vec()))
        .into_tuple::<i32>()
        .all(conn)
        .await
        .map_err(db_error)?
        .into_iter()
        .collect();

    match tags.missing_from(&found).first() {
        Some(&missing) => Err(RepoError::not_found("tag", missing)),
        None => Ok(()),
    }
}

async fn current_tag_ids<C: ConnectionTrait>(conn: &C, post_id: i32) -> Result<TagSet, RepoError> {
    let ids = PostTagEntity::find()
        .select_only()
        .column(post_tag::Column::TagId)
        .filter(post_tag::Column::PostId.eq(post_id))
        .into_tuple::<i32>()
        .all(conn)
        .await
        .map_err(db_error)?;

    Ok(ids.into_iter().collect())
}

async fn insert_links<C: ConnectionTrait>(
    conn: &C,
    post_id: i32,
    tag_ids: &[i32],
) -> Result<(), RepoError> {
    if tag_ids.is_empty() {
        return Ok(());
    }

    let rows = tag_ids.iter().map(|&tag_id| post_tag::ActiveModel {
        post_id: Set(post_id),
        tag_id: Set(tag_id),
    });

    PostTagEntity::insert_many(rows)
        .exec_without_returning(conn)
        .await
        .map_err(db_error)?;

    Ok(())
}

/// Delete every join row of a post. Shared with post destruction.
pub(crate) async fn detach_all_in<C: ConnectionTrait>(
    conn: &C,
    post_id: i32,
) -> Result<u64, RepoError> {
    let result = PostTagEntity::delete_many()
        .filter(post_tag::Column::PostId.eq(post_id))
        .exec(conn)
        .await
        .map_err(db_error)?;

    Ok(result.rows_affected)
}

#[async_trait]
impl TagAssociations for OrmTagAssociations {
    async fn attach(&self, post_id: i32, tags: &TagSet) -> Result<(), RepoError> {
        if tags.is_empty() {
            return Ok(());
        }

        let txn = self.db.begin().await.map_err(db_error)?;
        ensure_post_exists(&txn, post_id).await?;
        ensure_tags_exist(&txn, tags).await?;

        let current = current_tag_ids(&txn, post_id).await?;
        let additions = tags.missing_from(&current);
        insert_links(&txn, post_id, &additions).await?;

        txn.commit().await.map_err(db_error)?;
        tracing::debug!(post_id, added = ?additions, "Attached tags");

        Ok(())
    }

    async fn sync(&self, post_id: i32, tags: &TagSet) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(db_error)?;
        ensure_post_exists(&txn, post_id).await?;
        ensure_tags_exist(&txn, tags).await?;

        let current = current_tag_ids(&txn, post_id).await?;
        let diff = TagSet::diff(&current, tags);
        if diff.is_empty() {
            txn.commit().await.map_err(db_error)?;
            tracing::debug!(post_id, "Tags already in sync");
            return Ok(());
        }

        if !diff.removals.is_empty() {
            PostTagEntity::delete_many()
                .filter(post_tag::Column::PostId.eq(post_id))
                .filter(post_tag::Column::TagId.is_in(diff.removals.clone()))
                .exec(&txn)
                .await
                .map_err(db_error)?;
        }
        insert_links(&txn, post_id, &diff.additions).await?;

        txn.commit().await.map_err(db_error)?;
        tracing::debug!(
            post_id,
            added = ?diff.additions,
            removed = ?diff.removals,
            "Synced tags"
        );

        Ok(())
    }

    async fn ensure_tags(&self, tags: &TagSet) -> Result<(), RepoError> {
        ensure_tags_exist(&self.db, tags).await
    }

    async fn detach_all(&self, post_id: i32) -> Result<u64, RepoError> {
        let removed = detach_all_in(&self.db, post_id).await?;
        tracing::debug!(post_id, removed, "Detached all tags");

        Ok(removed)
    }

    async fn tag_ids(&self, post_id: i32) -> Result<TagSet, RepoError> {
        current_tag_ids(&self.db, post_id).await
    }
}
