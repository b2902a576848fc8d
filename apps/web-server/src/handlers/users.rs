//! User registration handlers.

use actix_web::{HttpRequest, HttpResponse, web};

use postboard_core::domain::NewUser;
use postboard_core::validation::validate_all;
use postboard_shared::{Flash, FlashNotice};

use super::{back_with_errors, redirect_with_flash, validation_failure};
use crate::forms::FormFields;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views;

/// Never flashed back into the form.
const SECRET_FIELDS: &[&str] = &["password", "password_confirmation"];

/// GET /users/create
pub async fn create(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    let flash = state.flash.take(&req).await;
    let ctx = views::context(&flash);

    views::render(&state.views, "users/create.html", &ctx)
}

/// POST /users
pub async fn store(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<Vec<(String, String)>>,
) -> AppResult<HttpResponse> {
    let form = FormFields::new(form.into_inner());
    let input = form.register_user();

    let outcome = validate_all(&input, state.uniqueness.as_ref()).await;
    if let Some(failure) = validation_failure(outcome)? {
        tracing::debug!(%failure, "Registration rejected");
        return back_with_errors(&state, &req, &form, failure, SECRET_FIELDS).await;
    }

    let (Some(username), Some(email), Some(password)) =
        (input.username, input.email, input.password)
    else {
        return Err(AppError::BadRequest(
            "username, email and password are required".to_string(),
        ));
    };

    let password_hash = state
        .passwords
        .hash(&password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = state
        .users
        .create(NewUser {
            username,
            email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = user.id, "User registered");

    let flash = Flash::with_notice(FlashNotice::new("success", "Account created."));
    redirect_with_flash(&state, &req, "/posts", &flash).await
}
