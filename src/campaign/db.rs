use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::FindOptions;
use mongodb::Collection;

use crate::error::Error;

use super::schema::ListQuery;
use super::{Campaign, CampaignId, CampaignStatus, Platform};

/// Repository surface for campaigns. The mongo-backed implementation lives
/// here; an in-memory one lives in `crate::database`.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error>;

    /// Filtered, paginated page of campaigns ordered by `updated_at`
    /// descending, plus the total match count before pagination.
    async fn fetch_campaigns(&self, query: &ListQuery) -> Result<(Vec<Campaign>, u64), Error>;

    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error>;

    async fn update_campaign(&self, campaign: &Campaign) -> Result<(), Error>;

    /// Returns false when no campaign had this id.
    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<bool, Error>;

    /// Observed statuses only; absent statuses are zero-filled by the caller.
    async fn count_campaigns_by_status(&self) -> Result<Vec<(CampaignStatus, u64)>, Error>;

    async fn sum_budget_by_platform(&self) -> Result<Vec<(Platform, f64)>, Error>;

    async fn sum_active_budget(&self) -> Result<f64, Error>;
}

#[async_trait]
impl CampaignStore for Collection<Campaign> {
    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
        self.insert_one(campaign, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(&self, query: &ListQuery) -> Result<(Vec<Campaign>, u64), Error> {
        let filter = list_filter(query);
        let total = self.count_documents(filter.clone(), None).await?;

        let options = FindOptions::builder()
            .sort(doc! { "updated_at": -1 })
            .skip(query.offset)
            .limit(query.limit)
            .build();
        let campaigns = self.find(filter, options).await?.try_collect().await?;

        Ok((campaigns, total))
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let campaign = self.find_one(doc! { "_id": campaign_id }, None).await?;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self, campaign))]
    async fn update_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
        self.replace_one(doc! { "_id": campaign.id }, campaign, None)
            .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<bool, Error> {
        let result = self.delete_one(doc! { "_id": campaign_id }, None).await?;

        Ok(result.deleted_count > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn count_campaigns_by_status(&self) -> Result<Vec<(CampaignStatus, u64)>, Error> {
        let pipeline = vec![doc! {
            "$group": { "_id": "$status", "count": { "$sum": 1 } }
        }];
        let mut cursor = self.aggregate(pipeline, None).await?;

        let mut counts = Vec::new();
        while let Some(row) = cursor.try_next().await? {
            let status = group_key(&row)?
                .parse::<CampaignStatus>()
                .map_err(|()| malformed_row(&row))?;
            counts.push((status, integer_value(&row, "count")?));
        }

        Ok(counts)
    }

    #[tracing::instrument(skip(self))]
    async fn sum_budget_by_platform(&self) -> Result<Vec<(Platform, f64)>, Error> {
        let pipeline = vec![doc! {
            "$group": { "_id": "$platform", "total": { "$sum": "$budget" } }
        }];
        let mut cursor = self.aggregate(pipeline, None).await?;

        let mut totals = Vec::new();
        while let Some(row) = cursor.try_next().await? {
            let platform = group_key(&row)?
                .parse::<Platform>()
                .map_err(|()| malformed_row(&row))?;
            totals.push((platform, number_value(&row, "total")?));
        }

        Ok(totals)
    }

    #[tracing::instrument(skip(self))]
    async fn sum_active_budget(&self) -> Result<f64, Error> {
        let pipeline = vec![
            doc! { "$match": { "status": CampaignStatus::Active.as_str() } },
            doc! { "$group": { "_id": Bson::Null, "total": { "$sum": "$budget" } } },
        ];
        let mut cursor = self.aggregate(pipeline, None).await?;

        match cursor.try_next().await? {
            Some(row) => number_value(&row, "total"),
            None => Ok(0.0),
        }
    }
}

fn list_filter(query: &ListQuery) -> Document {
    let mut filter = Document::new();

    if let Some(status) = query.status {
        filter.insert("status", status.as_str());
    }
    if let Some(platform) = query.platform {
        filter.insert("platform", platform.as_str());
    }

    // The search alternatives OR together, then AND with the exact filters:
    // substring of the name, or an enum value containing the search text.
    if let Some(search) = query.search.as_deref() {
        let needle = search.to_lowercase();
        let mut alternatives = vec![doc! {
            "name": { "$regex": regex_escape(search), "$options": "i" }
        }];

        let statuses: Vec<&str> = CampaignStatus::matching(&needle)
            .into_iter()
            .map(CampaignStatus::as_str)
            .collect();
        if !statuses.is_empty() {
            alternatives.push(doc! { "status": { "$in": statuses } });
        }

        let platforms: Vec<&str> = Platform::matching(&needle)
            .into_iter()
            .map(Platform::as_str)
            .collect();
        if !platforms.is_empty() {
            alternatives.push(doc! { "platform": { "$in": platforms } });
        }

        filter.insert("$or", alternatives);
    }

    filter
}

// Search text is matched literally, never as a pattern.
fn regex_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if "\\^$.|?*+()[]{}".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn group_key(row: &Document) -> Result<&str, Error> {
    row.get_str("_id").map_err(|_| malformed_row(row))
}

fn integer_value(row: &Document, key: &str) -> Result<u64, Error> {
    match row.get(key) {
        Some(Bson::Int32(n)) if *n >= 0 => Ok(*n as u64),
        Some(Bson::Int64(n)) if *n >= 0 => Ok(*n as u64),
        _ => Err(malformed_row(row)),
    }
}

fn number_value(row: &Document, key: &str) -> Result<f64, Error> {
    match row.get(key) {
        Some(Bson::Double(n)) => Ok(*n),
        Some(Bson::Int32(n)) => Ok(f64::from(*n)),
        Some(Bson::Int64(n)) => Ok(*n as f64),
        _ => Err(malformed_row(row)),
    }
}

fn malformed_row(row: &Document) -> Error {
    Error::ExistentialState(format!("malformed aggregation row: {}", row))
}
