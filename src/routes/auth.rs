use crate::{
    auth::{AuthResponse, AuthService, LoginRequest, RegisterRequest},
    error::AppError,
    response::ApiResponse,
};
use actix_web::{post, web, HttpResponse};
use validator::Validate;

/// Register a new user
///
/// Creates the account and returns an access token for it.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    register_data.validate()?;
    let RegisterRequest { email, password } = register_data.into_inner();

    let token = auth.register(&email, password).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(
        "Registration successful",
        AuthResponse { token },
    )))
}

/// Login user
///
/// Authenticates a user and returns an access token.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    login_data: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    login_data.validate()?;
    let LoginRequest { email, password } = login_data.into_inner();

    let token = auth.login(&email, password).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(
        "Login successful",
        AuthResponse { token },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::auth::TokenKeys;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;
    use std::sync::Arc;

    #[actix_rt::test]
    async fn test_register_validation() {
        let auth = AuthService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(TokenKeys::new("route_test_secret")),
            4,
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(auth))
                .service(register)
                .service(login),
        )
        .await;

        let cases = [
            ("/register", json!({ "email": "invalid-email", "password": "password123" })),
            ("/register", json!({ "email": "test@example.com", "password": "short" })),
            ("/login", json!({ "email": "invalid-email", "password": "password123" })),
            ("/login", json!({ "email": "test@example.com", "password": "" })),
        ];

        for (uri, payload) in cases {
            let req = test::TestRequest::post()
                .uri(uri)
                .set_json(&payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{} {}", uri, payload);
        }
    }
}
