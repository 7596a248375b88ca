use actix_web::get;
use actix_web::web::{Data, Json};

use crate::database::Database;
use crate::error::Error;

use super::{manager, DashboardMetrics};

#[get("/dashboard/metrics")]
#[tracing::instrument(skip(db))]
async fn get_metrics(db: Data<Box<dyn Database>>) -> Result<Json<DashboardMetrics>, Error> {
    let metrics = manager::get_metrics(db.as_ref().as_ref()).await?;

    Ok(Json(metrics))
}
