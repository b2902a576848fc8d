use chrono::{Duration, TimeZone, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

use postboard_core::domain::{NewPost, NewUser, Post, PostChanges, TagSet, User};
use postboard_core::error::RepoError;
use postboard_core::ports::{
    BaseRepository, PostRepository, TagAssociations, TagRepository, UniquenessChecker,
    UserRepository,
};

use super::entity::prelude::PostTagEntity;
use super::entity::{post, profile};
use super::{
    DatabaseConfig, DatabasePool, OrmPostRepository, OrmTagAssociations, OrmTagRepository,
    OrmUniquenessChecker, OrmUserRepository,
};

struct Fixture {
    pool: DatabasePool,
    users: OrmUserRepository,
    posts: OrmPostRepository,
    tags: OrmTagRepository,
    links: OrmTagAssociations,
}

async fn fixture() -> Fixture {
    let pool = DatabasePool::init(&DatabaseConfig::sqlite_memory())
        .await
        .unwrap();
    Migrator::up(&pool.main, None).await.unwrap();

    Fixture {
        users: OrmUserRepository::new(pool.main.clone()),
        posts: OrmPostRepository::new(pool.main.clone()),
        tags: OrmTagRepository::new(pool.main.clone()),
        links: OrmTagAssociations::new(pool.main.clone()),
        pool,
    }
}

impl Fixture {
    async fn user(&self, username: &str) -> User {
        self.users
            .create(NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: "$argon2id$stub".to_string(),
            })
            .await
            .unwrap()
    }

    async fn post(&self, user_id: i32, title: &str) -> Post {
        self.posts
            .create(
                user_id,
                NewPost {
                    title: title.to_string(),
                    content: format!("{title} content"),
                },
            )
            .await
            .unwrap()
    }

    async fn tag_ids(&self, titles: &[&str]) -> Vec<i32> {
        let mut ids = Vec::new();
        for title in titles {
            ids.push(self.tags.create(title).await.unwrap().id);
        }
        ids
    }

    async fn link_count(&self) -> u64 {
        PostTagEntity::find().count(&self.pool.main).await.unwrap()
    }
}

fn set(ids: &[i32]) -> TagSet {
    ids.iter().copied().collect()
}

#[tokio::test]
async fn test_find_post_by_id() {
    let fx = fixture().await;
    let author = fx.user("alice").await;
    let created = fx.post(author.id, "Test Post").await;

    let found: Option<Post> = fx.posts.find_by_id(created.id).await.unwrap();
    let post = found.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, created.id);
    assert_eq!(post.user_id, author.id);

    let missing: Option<Post> = fx.posts.find_by_id(created.id + 100).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_attach_is_a_union() {
    let fx = fixture().await;
    let author = fx.user("alice").await;
    let post = fx.post(author.id, "First").await;
    let ids = fx.tag_ids(&["rust", "web", "orm"]).await;

    fx.links.attach(post.id, &set(&[ids[0], ids[1]])).await.unwrap();
    fx.links.attach(post.id, &set(&[ids[1], ids[2]])).await.unwrap();

    assert_eq!(fx.links.tag_ids(post.id).await.unwrap(), set(&ids));
    assert_eq!(fx.link_count().await, 3);
}

#[tokio::test]
async fn test_attach_unknown_tag_writes_nothing() {
    let fx = fixture().await;
    let author = fx.user("alice").await;
    let post = fx.post(author.id, "First").await;
    let ids = fx.tag_ids(&["rust"]).await;

    let err = fx
        .links
        .attach(post.id, &set(&[ids[0], 999]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::NotFound {
            entity_type: "tag",
            id: 999
        }
    ));
    assert_eq!(fx.link_count().await, 0);
}

#[tokio::test]
async fn test_sync_converges_to_latest_set() {
    let fx = fixture().await;
    let author = fx.user("alice").await;
    let post = fx.post(author.id, "First").await;
    let ids = fx.tag_ids(&["a", "b", "c", "d"]).await;

    fx.links.sync(post.id, &set(&ids[..3])).await.unwrap();
    fx.links.sync(post.id, &set(&ids[2..])).await.unwrap();
    assert_eq!(fx.links.tag_ids(post.id).await.unwrap(), set(&ids[2..]));

    // Same set again changes nothing.
    fx.links.sync(post.id, &set(&ids[2..])).await.unwrap();
    assert_eq!(fx.links.tag_ids(post.id).await.unwrap(), set(&ids[2..]));

    fx.links.sync(post.id, &TagSet::new()).await.unwrap();
    assert!(fx.links.tag_ids(post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sync_leaves_other_posts_alone() {
    let fx = fixture().await;
    let author = fx.user("alice").await;
    let first = fx.post(author.id, "First").await;
    let second = fx.post(author.id, "Second").await;
    let ids = fx.tag_ids(&["a", "b"]).await;

    fx.links.attach(second.id, &set(&ids)).await.unwrap();
    fx.links.sync(first.id, &set(&ids[..1])).await.unwrap();
    fx.links.sync(first.id, &TagSet::new()).await.unwrap();

    assert_eq!(fx.links.tag_ids(second.id).await.unwrap(), set(&ids));
}

#[tokio::test]
async fn test_detach_all_without_links_is_noop() {
    let fx = fixture().await;
    let author = fx.user("alice").await;
    let post = fx.post(author.id, "First").await;

    assert_eq!(fx.links.detach_all(post.id).await.unwrap(), 0);
    assert_eq!(fx.links.detach_all(12345).await.unwrap(), 0);
}

#[tokio::test]
async fn test_destroy_removes_join_rows() {
    let fx = fixture().await;
    let author = fx.user("alice").await;
    let post = fx.post(author.id, "First").await;
    let ids = fx.tag_ids(&["a", "b"]).await;
    fx.links.attach(post.id, &set(&ids)).await.unwrap();

    assert!(fx.posts.destroy(post.id).await.unwrap());
    assert_eq!(fx.link_count().await, 0);
    let gone: Option<Post> = fx.posts.find_by_id(post.id).await.unwrap();
    assert!(gone.is_none());

    assert!(!fx.posts.destroy(post.id).await.unwrap());
}

#[tokio::test]
async fn test_paginate_orders_by_updated_at_desc() {
    let fx = fixture().await;
    let author = fx.user("alice").await;
    profile::ActiveModel {
        user_id: Set(author.id),
        avatar: Set(Some("/avatars/alice.png".to_string())),
        ..Default::default()
    }
    .insert(&fx.pool.main)
    .await
    .unwrap();

    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    for i in 0..10 {
        let stamp: DateTimeWithTimeZone = (base + Duration::minutes(i)).into();
        post::ActiveModel {
            user_id: Set(author.id),
            title: Set(format!("Post {i}")),
            content: Set("body".to_string()),
            created_at: Set(stamp),
            updated_at: Set(stamp),
            ..Default::default()
        }
        .insert(&fx.pool.main)
        .await
        .unwrap();
    }

    let first = fx.posts.paginate(1, 6).await.unwrap();
    assert_eq!(first.total, 10);
    assert_eq!(first.last_page, 2);
    assert_eq!(first.data.len(), 6);
    let titles: Vec<&str> = first.data.iter().map(|s| s.post.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Post 9", "Post 8", "Post 7", "Post 6", "Post 5", "Post 4"]
    );

    let author_view = first.data[0].user.as_ref().unwrap();
    assert_eq!(author_view.username, "alice");
    assert_eq!(
        author_view.profile.as_ref().and_then(|p| p.avatar.as_deref()),
        Some("/avatars/alice.png")
    );

    let second = fx.posts.paginate(2, 6).await.unwrap();
    assert_eq!(second.page, 2);
    let titles: Vec<&str> = second.data.iter().map(|s| s.post.title.as_str()).collect();
    assert_eq!(titles, vec!["Post 3", "Post 2", "Post 1", "Post 0"]);

    let past_end = fx.posts.paginate(5, 6).await.unwrap();
    assert!(past_end.data.is_empty());
    assert_eq!(past_end.total, 10);

    let far_past_end = fx.posts.paginate(u64::MAX, 6).await.unwrap();
    assert!(far_past_end.data.is_empty());
    assert_eq!(far_past_end.page, u64::MAX);
    assert_eq!(far_past_end.last_page, 2);
}

#[tokio::test]
async fn test_ensure_tags_names_unknown_id() {
    let fx = fixture().await;
    let ids = fx.tag_ids(&["a", "b"]).await;

    fx.links.ensure_tags(&set(&ids)).await.unwrap();
    fx.links.ensure_tags(&TagSet::new()).await.unwrap();

    let err = fx.links.ensure_tags(&set(&[ids[0], 77, 88])).await.unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity_type: "tag",
            id: 77
        }
    ));
}

#[tokio::test]
async fn test_update_merges_and_reassigns_owner() {
    let fx = fixture().await;
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let post = fx.post(alice.id, "Draft").await;

    let updated = fx
        .posts
        .update(
            post.id,
            PostChanges {
                title: Some("Final".to_string()),
                content: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.content, "Draft content");
    assert!(updated.updated_at >= post.updated_at);

    let moved = fx.posts.associate_user(post.id, bob.id).await.unwrap();
    assert_eq!(moved.user_id, bob.id);

    let missing = fx
        .posts
        .update(404, Default::default())
        .await
        .unwrap_err();
    assert!(matches!(missing, RepoError::NotFound { entity_type: "post", .. }));
}

#[tokio::test]
async fn test_find_tags_by_post() {
    let fx = fixture().await;
    let author = fx.user("alice").await;
    let post = fx.post(author.id, "First").await;
    let other = fx.post(author.id, "Second").await;
    let ids = fx.tag_ids(&["a", "b", "c"]).await;
    fx.links.attach(post.id, &set(&[ids[2], ids[0]])).await.unwrap();
    fx.links.attach(other.id, &set(&[ids[1]])).await.unwrap();

    let tags = fx.tags.find_by_post(post.id).await.unwrap();
    let titles: Vec<&str> = tags.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "c"]);
}

#[tokio::test]
async fn test_uniqueness_and_duplicate_insert() {
    let fx = fixture().await;
    fx.user("alice").await;
    let checker = OrmUniquenessChecker::new(fx.pool.main.clone());

    assert!(checker.is_taken("users", "username", "alice").await.unwrap());
    assert!(
        checker
            .is_taken("users", "email", "alice@example.com")
            .await
            .unwrap()
    );
    assert!(!checker.is_taken("users", "username", "bob").await.unwrap());

    let duplicate = fx
        .users
        .create(NewUser {
            username: "alice".to_string(),
            email: "other@example.com".to_string(),
            password_hash: "x".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(duplicate, RepoError::Constraint(_)));
}

#[tokio::test]
async fn test_all_and_ping() {
    let fx = fixture().await;
    fx.user("carol").await;
    fx.user("alice").await;

    let users: Vec<User> = fx.users.all().await.unwrap();
    let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["carol", "alice"]);

    fx.pool.ping().await.unwrap();
}
