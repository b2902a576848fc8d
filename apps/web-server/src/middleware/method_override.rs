//! HTML form method spoofing.
//!
//! Browsers only submit GET and POST. A POST carrying `?_method=PUT`,
//! `PATCH` or `DELETE` is rewritten to that method before routing.

use std::future::{Ready, ready};

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::Method,
    web,
};
use serde::Deserialize;

#[derive(Deserialize)]
struct Override {
    #[serde(rename = "_method")]
    method: Option<String>,
}

/// The method a POST should be treated as, if it asks for one.
fn spoofed_method(query: &str) -> Option<Method> {
    let requested = web::Query::<Override>::from_query(query).ok()?.into_inner().method?;

    match requested.to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

/// Method override middleware factory.
pub struct MethodOverride;

impl<S, B> Transform<S, ServiceRequest> for MethodOverride
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = MethodOverrideService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MethodOverrideService { service }))
    }
}

pub struct MethodOverrideService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for MethodOverrideService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        if *req.method() == Method::POST {
            if let Some(method) = spoofed_method(req.query_string()) {
                tracing::debug!(path = %req.path(), %method, "Method override");
                req.head_mut().method = method;
            }
        }

        self.service.call(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spoofed_method() {
        assert_eq!(spoofed_method("_method=PUT"), Some(Method::PUT));
        assert_eq!(spoofed_method("_method=patch"), Some(Method::PATCH));
        assert_eq!(spoofed_method("page=2&_method=DELETE"), Some(Method::DELETE));
        assert_eq!(spoofed_method("_method=GET"), None);
        assert_eq!(spoofed_method(""), None);
    }
}
