//! HTTP handlers and route configuration.

mod health;
mod posts;
mod users;


use actix_web::http::{Uri, header};
use actix_web::{HttpRequest, HttpResponse, web};

use postboard_core::error::DomainError;
use postboard_core::validation::ValidationFailure;
use postboard_shared::{FieldMessage, Flash};

use crate::forms::FormFields;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Configure all application routes.
///
/// `/posts/create` is registered ahead of `/posts/{id}` so it is never read as an id.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(posts::home))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::resource("/posts")
                .name("posts.index")
                .route(web::get().to(posts::index))
                .route(web::post().to(posts::store)),
        )
        .service(
            web::resource("/posts/create")
                .name("posts.create")
                .route(web::get().to(posts::create)),
        )
        .service(
            web::resource("/posts/{id}")
                .name("posts.show")
                .route(web::get().to(posts::show))
                .route(web::put().to(posts::update))
                .route(web::patch().to(posts::update))
                .route(web::delete().to(posts::destroy)),
        )
        .service(
            web::resource("/posts/{id}/edit")
                .name("posts.edit")
                .route(web::get().to(posts::edit)),
        )
        .service(
            web::resource("/users/create")
                .name("users.create")
                .route(web::get().to(users::create)),
        )
        .service(
            web::resource("/users")
                .name("users.store")
                .route(web::post().to(users::store)),
        );
}

/// Where "back" points: the `Referer` header when it names a page of this
/// site, otherwise the post listing.
fn back_url(req: &HttpRequest) -> String {
    let referer = req
        .headers()
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok());

    referer
        .and_then(|r| same_origin_path(r, req.connection_info().host()))
        .unwrap_or_else(|| "/posts".to_string())
}

/// Path and query of `referer` if it stays on `host`.
fn same_origin_path(referer: &str, host: &str) -> Option<String> {
    if referer.starts_with('/') {
        // `//evil` and `/\evil` are protocol-relative to browsers.
        let relative = !referer.starts_with("//") && !referer.starts_with("/\\");
        return relative.then(|| referer.to_string());
    }

    let uri: Uri = referer.parse().ok()?;
    if !matches!(uri.scheme_str(), Some("http" | "https")) {
        return None;
    }
    if !uri.authority()?.as_str().eq_ignore_ascii_case(host) {
        return None;
    }
    Some(uri.path_and_query().map_or("/", |pq| pq.as_str()).to_string())
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Redirect carrying flash data for the next request.
async fn redirect_with_flash(
    state: &AppState,
    req: &HttpRequest,
    location: &str,
    flash: &Flash,
) -> AppResult<HttpResponse> {
    let cookie = state.flash.put(req, flash).await?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(cookie)
        .finish())
}

/// Flash the failed fields plus the submitted input, then go back.
async fn back_with_errors(
    state: &AppState,
    req: &HttpRequest,
    form: &FormFields,
    failure: ValidationFailure,
    except: &[&str],
) -> AppResult<HttpResponse> {
    let flash = Flash {
        errors: failure
            .into_errors()
            .into_iter()
            .map(|e| FieldMessage {
                field: e.field.to_string(),
                message: e.message,
            })
            .collect(),
        old: form.old_input(except),
        notice: None,
    };

    redirect_with_flash(state, req, &back_url(req), &flash).await
}

/// Split a validation outcome into "keep going" or the failure to flash.
fn validation_failure(result: Result<(), DomainError>) -> AppResult<Option<ValidationFailure>> {
    match result {
        Ok(()) => Ok(None),
        Err(DomainError::Validation(failure)) => Ok(Some(failure)),
        Err(other) => Err(AppError::from(other)),
    }
}

fn url_for(req: &HttpRequest, name: &str, id: i32) -> AppResult<String> {
    req.url_for(name, [id.to_string()])
        .map(|url| url.path().to_string())
        .map_err(|e| AppError::Internal(format!("cannot build url for {name}: {e:?}")))
}
