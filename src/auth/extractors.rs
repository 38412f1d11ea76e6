use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;

/// The identity a verified token asserts.
///
/// `AuthMiddleware` stores it on the request; handlers take it as a parameter.
/// On a route without the middleware the extractor fails with
/// `AppError::Unauthenticated`, so a wiring mistake can never run a handler
/// without an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
}

impl FromRequest for AuthUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => {
                log::warn!("no authenticated identity on {}", req.path());
                let err = AppError::Unauthenticated("User not authenticated".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
