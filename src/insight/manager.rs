use tracing::debug;

use crate::campaign::CampaignId;
use crate::database::Database;
use crate::error::Error;

use super::endpoints::InsightBody;

/// The latest snapshot for a campaign, shaped for the API. A campaign with
/// no snapshots yet yields a well-formed all-zero body, never an absent one;
/// only a missing campaign is an error.
#[tracing::instrument(skip(db))]
pub async fn get_campaign_insights(
    db: &dyn Database,
    campaign_id: CampaignId,
) -> Result<InsightBody, Error> {
    db.campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    let body = match db.insights().fetch_latest_insight(campaign_id).await? {
        Some(insight) => InsightBody::from(insight),
        None => {
            debug!("no insights for campaign {}, returning zeros", campaign_id);
            InsightBody::zeroed()
        }
    };

    Ok(body)
}
