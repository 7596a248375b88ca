use actix_cors::Cors;
use actix_web::web::{self, Data, JsonConfig, PathConfig, QueryConfig, ServiceConfig};
use actix_web::{App, HttpResponse, HttpServer, ResponseError};
use mongodb::Client;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub mod campaign;
pub mod config;
pub mod dashboard;
pub mod database;
pub mod error;
pub mod health;
pub mod insight;
pub mod seed;
pub mod typedid;

pub use campaign::CampaignBody;
pub use config::Config;
pub use dashboard::DashboardMetrics;
pub use error::{Error, FieldError};
pub use insight::{EngagementBody, InsightBody};

use database::{Database, MongoDatabase};

/// Registers every route plus the extractor error handlers, so the test
/// harness and the real server serve identical behavior.
pub fn routes(cfg: &mut ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
        // format json errors with custom format
        Error::InvalidJson(err).into()
    }))
    .app_data(PathConfig::default().error_handler(|err, _req| {
        // format path errors with custom format
        Error::InvalidPath(err).into()
    }))
    .app_data(QueryConfig::default().error_handler(|err, _req| {
        // format query errors with custom format
        Error::InvalidQuery(err).into()
    }))
    .service(campaign::endpoints::get_campaigns)
    .service(campaign::endpoints::create_campaign)
    .service(campaign::endpoints::get_campaign_by_id)
    .service(campaign::endpoints::update_campaign)
    .service(campaign::endpoints::delete_campaign)
    .service(insight::endpoints::get_campaign_insights)
    .service(dashboard::endpoints::get_metrics)
    .service(health::health_check)
    // known paths hit with an unsupported verb land here, after the
    // method-guarded services above have passed on them
    .service(web::resource("/campaigns").default_service(web::to(method_not_allowed)))
    .service(web::resource("/campaigns/{campaign_id}").default_service(web::to(method_not_allowed)))
    .service(
        web::resource("/campaigns/{campaign_id}/insights")
            .default_service(web::to(method_not_allowed)),
    )
    .service(web::resource("/dashboard/metrics").default_service(web::to(method_not_allowed)))
    .service(web::resource("/health").default_service(web::to(method_not_allowed)))
    .default_service(web::to(path_not_found));
}

async fn method_not_allowed() -> HttpResponse {
    Error::MethodNotAllowed.error_response()
}

async fn path_not_found() -> HttpResponse {
    Error::PathNotFound.error_response()
}

pub async fn run(config: Config) -> Result<(), Error> {
    info!("connecting to database: {}", config.database_uri);
    let client = Client::with_uri_str(&config.database_uri).await?;
    let db = MongoDatabase::new(client.database(&config.database_name));

    if config.seed {
        seed::seed(&db).await?;
    }

    let db: Data<Box<dyn Database>> = Data::new(Box::new(db));
    info!("listening on {}", config.bind_address);
    HttpServer::new(move || {
        App::new()
            .app_data(db.clone())
            .wrap(TracingLogger::default())
            .wrap(cors())
            .configure(routes)
    })
    .bind(&config.bind_address)?
    .run()
    .await?;

    Ok(())
}

// The dashboard is a browser app; it needs to read the total-count header.
fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .expose_headers(["x-total-count"])
}
