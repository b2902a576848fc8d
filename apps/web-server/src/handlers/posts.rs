//! Post resource handlers.

use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, web};

use postboard_core::domain::{Page, PostChanges, PostSummary, Tag, TagSet, User};
use postboard_core::validation::validate_all;
use postboard_shared::{Flash, FlashNotice, PageLinks, TagOption, UserOption};

use super::{
    back_url, back_with_errors, redirect, redirect_with_flash, url_for, validation_failure,
};
use crate::forms::FormFields;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views;

fn user_options(users: Vec<User>, selected: Option<i32>) -> Vec<UserOption> {
    users
        .into_iter()
        .map(|u| UserOption {
            checked: Some(u.id) == selected,
            id: u.id,
            username: u.username,
        })
        .collect()
}

fn tag_options(tags: Vec<Tag>, checked: &TagSet) -> Vec<TagOption> {
    tags.into_iter()
        .map(|t| TagOption {
            checked: checked.contains(t.id),
            id: t.id,
            title: t.title,
        })
        .collect()
}

/// Selections echoed back after a failed submission.
fn old_selection(flash: &Flash) -> (Option<i32>, TagSet) {
    let user_id = flash.old.get("user_id").and_then(|v| v.parse::<i32>().ok());
    let tags = flash
        .old
        .get("tags")
        .map(|joined| joined.split(',').filter_map(|v| v.parse::<i32>().ok()).collect())
        .unwrap_or_default();
    (user_id, tags)
}

/// GET /
pub async fn home() -> HttpResponse {
    redirect("/posts")
}

/// First `page` value of the query string. Unreadable queries mean page 1.
fn requested_page(query: &str) -> u64 {
    let pairs = web::Query::<Vec<(String, String)>>::from_query(query)
        .map(web::Query::into_inner)
        .unwrap_or_default();
    let raw = pairs.iter().find(|(k, _)| k == "page").map(|(_, v)| v.as_str());
    Page::<PostSummary>::parse_number(raw)
}

/// GET /posts
pub async fn index(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    let number = requested_page(req.query_string());
    let page = state.posts.paginate(number, state.per_page).await?;
    let links = PageLinks::new("/posts", page.page, page.last_page);

    let flash = state.flash.take(&req).await;
    let mut ctx = views::context(&flash);
    ctx.insert("page", &page);
    ctx.insert("links", &links);

    views::render(&state.views, "posts/index.html", &ctx)
}

/// GET /posts/create
pub async fn create(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    let flash = state.flash.take(&req).await;
    let (user_id, tag_ids) = old_selection(&flash);

    let users = state.users.all().await?;
    let tags = state.tags.all().await?;

    let mut ctx = views::context(&flash);
    ctx.insert("users", &user_options(users, user_id));
    ctx.insert("tags", &tag_options(tags, &tag_ids));

    views::render(&state.views, "posts/create.html", &ctx)
}

/// POST /posts
pub async fn store(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<Vec<(String, String)>>,
) -> AppResult<HttpResponse> {
    let form = FormFields::new(form.into_inner());
    let input = form.post_form();

    let outcome = validate_all(&input, state.uniqueness.as_ref()).await;
    if let Some(failure) = validation_failure(outcome)? {
        tracing::debug!(%failure, "Post rejected");
        return back_with_errors(&state, &req, &form, failure, &[]).await;
    }

    let tags = form.tag_set()?;
    let user = state.users.find_or_fail(form.user_id()?).await?;
    state.post_tags.ensure_tags(&tags).await?;
    let new_post = input
        .into_new_post()
        .ok_or_else(|| AppError::BadRequest("title and content are required".to_string()))?;

    let post = state.posts.create(user.id, new_post).await?;
    state.post_tags.attach(post.id, &tags).await?;

    tracing::info!(post_id = post.id, user_id = user.id, tags = tags.len(), "Post stored");
    Ok(redirect(&url_for(&req, "posts.show", post.id)?))
}

/// GET /posts/{id}
pub async fn show(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state.posts.find_or_fail(id).await?;
    let tags = state.tags.find_by_post(id).await?;
    let author = state.users.find_by_id(post.user_id).await?;

    let flash = state.flash.take(&req).await;
    let mut ctx = views::context(&flash);
    ctx.insert("post", &post);
    ctx.insert("tags", &tags);
    ctx.insert("author", &author.map(|u| u.username));

    views::render(&state.views, "posts/show.html", &ctx)
}

/// GET /posts/{id}/edit
pub async fn edit(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state.posts.find_or_fail(id).await?;
    let users = state.users.all().await?;
    let tags = state.tags.all().await?;
    let current = state.post_tags.tag_ids(id).await?;

    let flash = state.flash.take(&req).await;
    let mut ctx = views::context(&flash);
    ctx.insert("users", &user_options(users, Some(post.user_id)));
    ctx.insert("tags", &tag_options(tags, &current));
    ctx.insert("post", &post);

    views::render(&state.views, "posts/edit.html", &ctx)
}

/// PUT|PATCH /posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
    form: web::Form<Vec<(String, String)>>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let form = FormFields::new(form.into_inner());
    let tags = form.tag_set()?;

    let changes = PostChanges {
        title: form.text("title"),
        content: form.text("content"),
    };
    if changes.is_empty() {
        state.posts.find_or_fail(id).await?;
    } else {
        state.posts.update(id, changes).await?;
    }

    let user = state.users.find_or_fail(form.user_id()?).await?;
    state.posts.associate_user(id, user.id).await?;
    state.post_tags.sync(id, &tags).await?;

    tracing::info!(post_id = id, user_id = user.id, tags = tags.len(), "Post updated");

    let preview = url_for(&req, "posts.show", id)?;
    let flash = Flash::with_notice(FlashNotice::new(
        "primary",
        format!(r#"Post updated. <a href="{preview}" class="alert-link">Preview Post.</a>"#),
    ));
    redirect_with_flash(&state, &req, &back_url(&req), &flash).await
}

/// DELETE /posts/{id}
///
/// A post that no longer exists counts as deleted.
pub async fn destroy(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    match state.posts.destroy(id).await {
        Ok(true) => tracing::info!(post_id = id, "Post destroyed"),
        Ok(false) => tracing::debug!(post_id = id, "Post already gone"),
        Err(e) => {
            tracing::error!(post_id = id, error = %e, "Post deletion failed");
            return Err(e.into());
        }
    }

    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body("success"))
}

#[cfg(test)]
mod tests {
    use super::requested_page;

    #[test]
    fn test_requested_page_reads_first_value() {
        assert_eq!(requested_page("page=3"), 3);
        assert_eq!(requested_page("page=2&page=1"), 2);
        assert_eq!(requested_page("sort=asc"), 1);
        assert_eq!(requested_page("page=abc"), 1);
        assert_eq!(requested_page("page=0"), 1);
        assert_eq!(requested_page(""), 1);
    }
}
