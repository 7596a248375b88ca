use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::Collection;

use crate::campaign::db::CampaignStore;
use crate::campaign::schema::ListQuery;
use crate::campaign::{Campaign, CampaignId, CampaignStatus, Platform};
use crate::error::Error;
use crate::insight::db::InsightStore;
use crate::insight::CampaignInsight;

/// Storage abstraction for the whole API. Everything behind this trait is an
/// implementation detail: the production backend is mongo, tests and
/// storeless development use the in-memory backend.
#[async_trait]
pub trait Database: Send + Sync {
    fn campaigns(&self) -> &dyn CampaignStore;

    fn insights(&self) -> &dyn InsightStore;

    /// Store reachability probe for the health endpoint.
    async fn ping(&self) -> Result<(), Error>;
}

#[derive(Clone, Debug)]
pub struct MongoDatabase {
    campaigns: Collection<Campaign>,
    insights: Collection<CampaignInsight>,
    db: mongodb::Database,
}

impl MongoDatabase {
    pub fn new(db: mongodb::Database) -> MongoDatabase {
        MongoDatabase {
            campaigns: db.collection("campaigns"),
            insights: db.collection("campaign_insights"),
            db,
        }
    }
}

#[async_trait]
impl Database for MongoDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }

    fn insights(&self) -> &dyn InsightStore {
        &self.insights
    }

    async fn ping(&self) -> Result<(), Error> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}

/// In-memory backend with the same observable semantics as the mongo one.
#[derive(Default)]
pub struct MemoryDatabase {
    campaigns: MemoryCampaignStore,
    insights: MemoryInsightStore,
}

impl MemoryDatabase {
    pub fn new() -> MemoryDatabase {
        MemoryDatabase::default()
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }

    fn insights(&self) -> &dyn InsightStore {
        &self.insights
    }

    async fn ping(&self) -> Result<(), Error> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCampaignStore {
    rows: RwLock<Vec<Campaign>>,
}

#[derive(Default)]
pub struct MemoryInsightStore {
    rows: RwLock<Vec<CampaignInsight>>,
}

#[async_trait]
impl CampaignStore for MemoryCampaignStore {
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
        write_lock(&self.rows)?.push(campaign.clone());
        Ok(())
    }

    async fn fetch_campaigns(&self, query: &ListQuery) -> Result<(Vec<Campaign>, u64), Error> {
        let rows = read_lock(&self.rows)?;
        let mut matches: Vec<Campaign> = rows
            .iter()
            .filter(|campaign| query_matches(campaign, query))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let total = matches.len() as u64;
        let page = matches
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect();

        Ok((page, total))
    }

    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let rows = read_lock(&self.rows)?;
        Ok(rows
            .iter()
            .find(|campaign| campaign.id == campaign_id)
            .cloned())
    }

    async fn update_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
        let mut rows = write_lock(&self.rows)?;
        if let Some(row) = rows.iter_mut().find(|row| row.id == campaign.id) {
            *row = campaign.clone();
        }
        Ok(())
    }

    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<bool, Error> {
        let mut rows = write_lock(&self.rows)?;
        let before = rows.len();
        rows.retain(|campaign| campaign.id != campaign_id);
        Ok(rows.len() < before)
    }

    async fn count_campaigns_by_status(&self) -> Result<Vec<(CampaignStatus, u64)>, Error> {
        let rows = read_lock(&self.rows)?;
        let mut counts = Vec::new();
        for status in CampaignStatus::ALL {
            let count = rows.iter().filter(|c| c.status == status).count() as u64;
            if count > 0 {
                counts.push((status, count));
            }
        }
        Ok(counts)
    }

    async fn sum_budget_by_platform(&self) -> Result<Vec<(Platform, f64)>, Error> {
        let rows = read_lock(&self.rows)?;
        let mut totals = Vec::new();
        for platform in Platform::ALL {
            let campaigns: Vec<&Campaign> =
                rows.iter().filter(|c| c.platform == platform).collect();
            if !campaigns.is_empty() {
                totals.push((platform, campaigns.iter().map(|c| c.budget).sum()));
            }
        }
        Ok(totals)
    }

    async fn sum_active_budget(&self) -> Result<f64, Error> {
        let rows = read_lock(&self.rows)?;
        Ok(rows
            .iter()
            .filter(|c| c.status == CampaignStatus::Active)
            .map(|c| c.budget)
            .sum())
    }
}

#[async_trait]
impl InsightStore for MemoryInsightStore {
    async fn insert_insight(&self, insight: &CampaignInsight) -> Result<(), Error> {
        write_lock(&self.rows)?.push(insight.clone());
        Ok(())
    }

    async fn fetch_latest_insight(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<CampaignInsight>, Error> {
        let rows = read_lock(&self.rows)?;
        Ok(rows
            .iter()
            .filter(|insight| insight.campaign_id == campaign_id)
            .max_by_key(|insight| insight.captured_at)
            .cloned())
    }

    async fn delete_insights_by_campaign(&self, campaign_id: CampaignId) -> Result<u64, Error> {
        let mut rows = write_lock(&self.rows)?;
        let before = rows.len();
        rows.retain(|insight| insight.campaign_id != campaign_id);
        Ok((before - rows.len()) as u64)
    }
}

// Mirrors the mongo list filter: AND across the exact filters and the search
// condition; the search ORs a name substring with enum values containing the
// lowercased search text.
fn query_matches(campaign: &Campaign, query: &ListQuery) -> bool {
    if let Some(status) = query.status {
        if campaign.status != status {
            return false;
        }
    }
    if let Some(platform) = query.platform {
        if campaign.platform != platform {
            return false;
        }
    }
    if let Some(search) = query.search.as_deref() {
        let needle = search.to_lowercase();
        let hit = campaign.name.to_lowercase().contains(&needle)
            || campaign.status.as_str().contains(&needle)
            || campaign.platform.as_str().contains(&needle);
        if !hit {
            return false;
        }
    }
    true
}

fn read_lock<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, Error> {
    lock.read()
        .map_err(|_| Error::ExistentialState("store lock poisoned".to_string()))
}

fn write_lock<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, Error> {
    lock.write()
        .map_err(|_| Error::ExistentialState("store lock poisoned".to_string()))
}
