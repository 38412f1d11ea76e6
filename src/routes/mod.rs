pub mod auth;
pub mod health;
pub mod tasks;

use std::sync::Arc;

use actix_web::{
    error::{JsonPayloadError, PathError},
    web, HttpRequest,
};

use crate::auth::{AuthMiddleware, AuthService, TokenKeys};
use crate::error::AppError;
use crate::store::Store;

/// Everything the routes need, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub keys: Arc<TokenKeys>,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, jwt_secret: &str, bcrypt_cost: u32) -> Self {
        Self {
            store,
            keys: Arc::new(TokenKeys::new(jwt_secret)),
            bcrypt_cost,
        }
    }
}

/// Registers `/health`, `/auth/*` and the token-protected `/tasks` scope.
pub fn config(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let auth_service =
            AuthService::new(state.store.clone(), state.keys.clone(), state.bcrypt_cost);

        cfg.app_data(web::Data::from(state.store.clone()))
            .app_data(web::Data::new(auth_service))
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .app_data(web::PathConfig::default().error_handler(path_error))
            .service(health::health)
            .service(
                web::scope("/auth")
                    .service(auth::register)
                    .service(auth::login),
            )
            .service(
                web::scope("/tasks")
                    .wrap(AuthMiddleware::new(state.keys.clone()))
                    .service(tasks::get_tasks)
                    .service(tasks::create_task)
                    .service(tasks::get_task)
                    .service(tasks::update_task)
                    .service(tasks::delete_task),
            );
    }
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(format!("Invalid request body: {}", err)).into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(format!("Invalid path parameter: {}", err)).into()
}
