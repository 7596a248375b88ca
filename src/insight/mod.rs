use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::campaign::CampaignId;
use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;

pub use endpoints::{EngagementBody, InsightBody};

pub type InsightId = TypedId<CampaignInsight>;

/// An immutable point-in-time performance snapshot owned by one campaign.
/// Snapshots are written by the seeding/ingestion path only; this API never
/// mutates them.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CampaignInsight {
    #[serde(rename = "_id")]
    pub id: InsightId,
    pub campaign_id: CampaignId,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub captured_at: DateTime<Utc>,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub ctr: f64,
    pub cpc: f64,
    pub roi: f64,
    pub engagement_likes: i64,
    pub engagement_shares: i64,
    pub engagement_comments: i64,
}

impl TypedIdMarker for CampaignInsight {
    fn tag() -> &'static str {
        "INS"
    }
}
