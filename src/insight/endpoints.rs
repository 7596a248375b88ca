use actix_web::get;
use actix_web::web::{Data, Json, Path};
use serde::{Deserialize, Serialize};

use crate::campaign::CampaignId;
use crate::database::Database;
use crate::error::Error;

use super::{manager, CampaignInsight};

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct EngagementBody {
    pub likes: i64,
    pub shares: i64,
    pub comments: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct InsightBody {
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub ctr: f64,
    pub cpc: f64,
    pub roi: f64,
    pub engagement: EngagementBody,
}

impl InsightBody {
    pub fn zeroed() -> InsightBody {
        InsightBody::default()
    }
}

impl From<CampaignInsight> for InsightBody {
    fn from(insight: CampaignInsight) -> InsightBody {
        InsightBody {
            impressions: insight.impressions,
            clicks: insight.clicks,
            conversions: insight.conversions,
            ctr: insight.ctr,
            cpc: insight.cpc,
            roi: insight.roi,
            engagement: EngagementBody {
                likes: insight.engagement_likes,
                shares: insight.engagement_shares,
                comments: insight.engagement_comments,
            },
        }
    }
}

#[get("/campaigns/{campaign_id}/insights")]
#[tracing::instrument(skip(db))]
async fn get_campaign_insights(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<InsightBody>, Error> {
    let campaign_id = params.into_inner();

    let body = manager::get_campaign_insights(db.as_ref().as_ref(), campaign_id).await?;

    Ok(Json(body))
}
