use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::FindOneOptions;
use mongodb::Collection;

use crate::campaign::CampaignId;
use crate::error::Error;

use super::CampaignInsight;

#[async_trait]
pub trait InsightStore: Send + Sync {
    async fn insert_insight(&self, insight: &CampaignInsight) -> Result<(), Error>;

    /// The snapshot with the latest `captured_at` for the campaign, if any.
    async fn fetch_latest_insight(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<CampaignInsight>, Error>;

    /// Removes every snapshot owned by the campaign, returning the count.
    async fn delete_insights_by_campaign(&self, campaign_id: CampaignId) -> Result<u64, Error>;
}

#[async_trait]
impl InsightStore for Collection<CampaignInsight> {
    #[tracing::instrument(skip(self))]
    async fn insert_insight(&self, insight: &CampaignInsight) -> Result<(), Error> {
        self.insert_one(insight, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_latest_insight(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<CampaignInsight>, Error> {
        let options = FindOneOptions::builder()
            .sort(doc! { "captured_at": -1 })
            .build();
        let insight = self
            .find_one(doc! { "campaign_id": campaign_id }, options)
            .await?;

        Ok(insight)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_insights_by_campaign(&self, campaign_id: CampaignId) -> Result<u64, Error> {
        let result = self
            .delete_many(doc! { "campaign_id": campaign_id }, None)
            .await?;

        Ok(result.deleted_count)
    }
}
