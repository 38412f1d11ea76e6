use crate::{error::AppError, response::ApiResponse, store::Store};
use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use serde_json::json;

/// Health check endpoint
///
/// Reports `ok` once the store answers a round-trip.
#[get("/health")]
pub async fn health(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    store.ping().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(
        "ok",
        json!({
            "status": "ok",
            "timestamp": Utc::now()
        }),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use actix_web::{test, App};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_health_endpoint() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(store))
                .service(health),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());

        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["message"], "ok");
        assert_eq!(json["data"]["status"], "ok");
        assert!(json["data"]["timestamp"].is_string());
    }
}
