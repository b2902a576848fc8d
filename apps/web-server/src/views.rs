//! Tera views, compiled into the binary.

use std::collections::BTreeMap;

use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use tera::{Context, Tera};

use postboard_shared::Flash;

use crate::middleware::error::AppResult;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("posts/index.html", include_str!("../templates/posts/index.html")),
    ("posts/create.html", include_str!("../templates/posts/create.html")),
    ("posts/show.html", include_str!("../templates/posts/show.html")),
    ("posts/edit.html", include_str!("../templates/posts/edit.html")),
    ("users/create.html", include_str!("../templates/users/create.html")),
];

/// Parse every template. Fails on the first syntax error.
pub fn load() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES.iter().copied())?;
    Ok(tera)
}

/// Context seeded with the flash of the current request.
///
/// Exposes `errors` (field to message), `old` (previous input) and `notice`.
pub fn context(flash: &Flash) -> Context {
    let errors: BTreeMap<&str, &str> = flash
        .errors
        .iter()
        .map(|e| (e.field.as_str(), e.message.as_str()))
        .collect();

    let mut context = Context::new();
    context.insert("errors", &errors);
    context.insert("old", &flash.old);
    context.insert("notice", &flash.notice);
    context
}

pub fn render(tera: &Tera, template: &str, context: &Context) -> AppResult<HttpResponse> {
    let body = tera.render(template, context)?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use postboard_shared::{FieldMessage, FlashNotice};

    #[test]
    fn test_templates_parse() {
        let tera = load().unwrap();
        assert!(tera.get_template_names().any(|n| n == "posts/edit.html"));
    }

    #[test]
    fn test_notice_markup_is_not_escaped() {
        let tera = load().unwrap();
        let mut flash = Flash::with_notice(FlashNotice::new(
            "primary",
            r#"Post updated. <a href="/posts/1" class="alert-link">Preview Post.</a>"#,
        ));
        flash.errors.push(FieldMessage {
            field: "title".to_string(),
            message: "Title can't be blank".to_string(),
        });

        let mut ctx = context(&flash);
        ctx.insert("users", &Vec::<()>::new());
        ctx.insert("tags", &Vec::<()>::new());
        let html = tera.render("posts/create.html", &ctx).unwrap();

        assert!(html.contains(r#"<a href="/posts/1" class="alert-link">"#));
        assert!(html.contains("Title can&#x27;t be blank"));
    }
}
