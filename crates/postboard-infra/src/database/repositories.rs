//! SeaORM repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, TransactionTrait,
};

use postboard_core::domain::{
    Author, NewPost, NewUser, Page, Post, PostChanges, PostSummary, Profile, Tag, User,
};
use postboard_core::error::RepoError;
use postboard_core::ports::{PostRepository, TagRepository, UserRepository};

use super::associations::detach_all_in;
use super::base::{OrmBaseRepository, db_error};
use super::entity::prelude::{PostEntity, ProfileEntity, TagEntity, UserEntity};
use super::entity::{post, post_tag, profile, tag, user};

/// SeaORM user repository.
pub type OrmUserRepository = OrmBaseRepository<UserEntity>;

/// SeaORM post repository.
pub type OrmPostRepository = OrmBaseRepository<PostEntity>;

/// SeaORM tag repository.
pub type OrmTagRepository = OrmBaseRepository<TagEntity>;

fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

#[async_trait]
impl UserRepository for OrmUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        let now = now();
        let model = user::ActiveModel {
            username: Set(new_user.username),
            email: Set(new_user.email),
            password: Set(new_user.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error)?;

        tracing::info!(user_id = model.id, "User created");
        Ok(model.into())
    }
}

impl OrmPostRepository {
    async fn load(&self, id: i32) -> Result<post::Model, RepoError> {
        PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(RepoError::not_found("post", id))
    }

    async fn profiles_for(&self, user_ids: Vec<i32>) -> Result<HashMap<i32, Profile>, RepoError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let profiles = ProfileEntity::find()
            .filter(profile::Column::UserId.is_in(user_ids))
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(profiles
            .into_iter()
            .map(|p| (p.user_id, Profile::from(p)))
            .collect())
    }
}

#[async_trait]
impl PostRepository for OrmPostRepository {
    async fn create(&self, user_id: i32, new_post: NewPost) -> Result<Post, RepoError> {
        let now = now();
        let model = post::ActiveModel {
            user_id: Set(user_id),
            title: Set(new_post.title),
            content: Set(new_post.content),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error)?;

        tracing::info!(post_id = model.id, user_id, "Post created");
        Ok(model.into())
    }

    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError> {
        let mut active: post::ActiveModel = self.load(id).await?.into();

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        active.updated_at = Set(now());

        let model = active.update(&self.db).await.map_err(db_error)?;
        Ok(model.into())
    }

    async fn associate_user(&self, id: i32, user_id: i32) -> Result<Post, RepoError> {
        let mut active: post::ActiveModel = self.load(id).await?.into();
        active.user_id = Set(user_id);
        active.updated_at = Set(now());

        let model = active.update(&self.db).await.map_err(db_error)?;
        Ok(model.into())
    }

    async fn paginate(&self, page: u64, per_page: u64) -> Result<Page<PostSummary>, RepoError> {
        let page = page.max(1);
        let per_page = per_page.max(1);

        let paginator = PostEntity::find()
            .find_also_related(UserEntity)
            .order_by_desc(post::Column::UpdatedAt)
            .order_by_desc(post::Column::Id)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await.map_err(db_error)?;
        if page > total.div_ceil(per_page).max(1) {
            tracing::debug!(page, per_page, total, "Page past the end");
            return Ok(Page::new(Vec::new(), total, page, per_page));
        }
        let rows = paginator.fetch_page(page - 1).await.map_err(db_error)?;

        let user_ids: Vec<i32> = rows
            .iter()
            .filter_map(|(_, user)| user.as_ref().map(|u| u.id))
            .collect();
        let mut profiles = self.profiles_for(user_ids).await?;

        let data = rows
            .into_iter()
            .map(|(post, user)| PostSummary {
                post: post.into(),
                user: user.map(|u| Author {
                    id: u.id,
                    profile: profiles.remove(&u.id),
                    username: u.username,
                }),
            })
            .collect();

        tracing::debug!(page, per_page, total, "Listed posts");
        Ok(Page::new(data, total, page, per_page))
    }

    async fn destroy(&self, id: i32) -> Result<bool, RepoError> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let exists = PostEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .is_some();

        if !exists {
            txn.commit().await.map_err(db_error)?;
            return Ok(false);
        }

        let detached = detach_all_in(&txn, id).await?;
        PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_error)?;
        txn.commit().await.map_err(db_error)?;

        tracing::info!(post_id = id, detached, "Post deleted");
        Ok(true)
    }
}

#[async_trait]
impl TagRepository for OrmTagRepository {
    async fn create(&self, title: &str) -> Result<Tag, RepoError> {
        let model = tag::ActiveModel {
            title: Set(title.to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error)?;

        Ok(model.into())
    }

    async fn find_by_post(&self, post_id: i32) -> Result<Vec<Tag>, RepoError> {
        let tags = TagEntity::find()
            .join(JoinType::InnerJoin, tag::Relation::PostTag.def())
            .filter(post_tag::Column::PostId.eq(post_id))
            .order_by_asc(tag::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(tags.into_iter().map(Into::into).collect())
    }
}
