use std::collections::HashMap;

use actix_web::web::{Data, Json, Path, Query};
use actix_web::{delete, get, patch, post, HttpResponse};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::database::Database;
use crate::error::Error;

use super::{manager, schema, Campaign, CampaignId, CampaignStatus, Platform};

/// External representation of a campaign. Field names follow the API's
/// camelCase convention; dates render as `YYYY-MM-DD`.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignBody {
    pub id: CampaignId,
    pub name: String,
    pub status: CampaignStatus,
    pub platform: Platform,
    pub budget: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: String,
    pub target_audience: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Campaign> for CampaignBody {
    fn from(campaign: Campaign) -> CampaignBody {
        CampaignBody {
            id: campaign.id,
            name: campaign.name,
            status: campaign.status,
            platform: campaign.platform,
            budget: campaign.budget,
            start_date: campaign.start_date,
            end_date: campaign.end_date,
            description: campaign.description,
            target_audience: campaign.target_audience,
            created_at: campaign.created_at,
            updated_at: campaign.updated_at,
        }
    }
}

#[get("/campaigns")]
#[tracing::instrument(skip(db))]
async fn get_campaigns(
    db: Data<Box<dyn Database>>,
    params: Query<HashMap<String, String>>,
) -> Result<HttpResponse, Error> {
    let query = schema::validate_list_query(&params.into_inner())
        .map_err(|errors| Error::Validation { errors })?;

    let (campaigns, total) = manager::list_campaigns(db.as_ref().as_ref(), &query).await?;

    let body: Vec<CampaignBody> = campaigns.into_iter().map(CampaignBody::from).collect();
    Ok(HttpResponse::Ok()
        .insert_header(("X-Total-Count", total.to_string()))
        .json(body))
}

#[post("/campaigns")]
#[tracing::instrument(skip(db))]
async fn create_campaign(
    db: Data<Box<dyn Database>>,
    body: Json<Value>,
) -> Result<HttpResponse, Error> {
    let data =
        schema::validate_create(&body.into_inner()).map_err(|errors| Error::Validation { errors })?;

    let campaign = manager::create_campaign(db.as_ref().as_ref(), data).await?;

    Ok(HttpResponse::Created().json(CampaignBody::from(campaign)))
}

#[get("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
async fn get_campaign_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<CampaignBody>, Error> {
    let campaign_id = params.into_inner();

    let campaign = manager::get_campaign_by_id(db.as_ref().as_ref(), campaign_id).await?;

    Ok(Json(CampaignBody::from(campaign)))
}

#[patch("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
async fn update_campaign(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
    body: Json<Value>,
) -> Result<Json<CampaignBody>, Error> {
    let campaign_id = params.into_inner();
    let data =
        schema::validate_update(&body.into_inner()).map_err(|errors| Error::Validation { errors })?;

    let campaign = manager::update_campaign(db.as_ref().as_ref(), campaign_id, data).await?;

    Ok(Json(CampaignBody::from(campaign)))
}

#[delete("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
async fn delete_campaign(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<HttpResponse, Error> {
    let campaign_id = params.into_inner();

    manager::delete_campaign(db.as_ref().as_ref(), campaign_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
