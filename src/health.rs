use actix_web::get;
use actix_web::web::Data;
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::database::Database;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HealthBody {
    pub status: String,
    pub database: String,
}

/// Liveness plus store reachability. Failure detail goes to the log, not the
/// response body.
#[get("/health")]
#[tracing::instrument(skip(db))]
async fn health_check(db: Data<Box<dyn Database>>) -> HttpResponse {
    match db.ping().await {
        Ok(()) => HttpResponse::Ok().json(HealthBody {
            status: "healthy".to_string(),
            database: "connected".to_string(),
        }),
        Err(err) => {
            error!("health check failed: {}", err);
            HttpResponse::ServiceUnavailable().json(HealthBody {
                status: "unhealthy".to_string(),
                database: "disconnected".to_string(),
            })
        }
    }
}
