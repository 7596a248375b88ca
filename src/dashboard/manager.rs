use std::collections::BTreeMap;

use crate::campaign::{CampaignStatus, Platform};
use crate::database::Database;
use crate::error::Error;

use super::DashboardMetrics;

/// Three independent aggregates over the whole campaign set: status counts,
/// per-platform budget sums, and the active-budget total. The stores report
/// observed groups only; zero-filling the full enum key sets happens here.
#[tracing::instrument(skip(db))]
pub async fn get_metrics(db: &dyn Database) -> Result<DashboardMetrics, Error> {
    let mut campaigns_by_status: BTreeMap<CampaignStatus, u64> = CampaignStatus::ALL
        .iter()
        .map(|status| (*status, 0))
        .collect();
    for (status, count) in db.campaigns().count_campaigns_by_status().await? {
        campaigns_by_status.insert(status, count);
    }

    let mut budget_by_platform: BTreeMap<Platform, f64> = Platform::ALL
        .iter()
        .map(|platform| (*platform, 0.0))
        .collect();
    for (platform, total) in db.campaigns().sum_budget_by_platform().await? {
        budget_by_platform.insert(platform, total);
    }

    let total_active_budget = db.campaigns().sum_active_budget().await?;

    Ok(DashboardMetrics {
        campaigns_by_status,
        budget_by_platform,
        total_active_budget,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test::MockDatabase;

    #[tokio::test]
    async fn zero_fills_absent_categories() {
        let mut db = MockDatabase::new();
        db.campaigns.on_count_campaigns_by_status = Box::new(|| Ok(vec![]));
        db.campaigns.on_sum_budget_by_platform = Box::new(|| Ok(vec![]));
        db.campaigns.on_sum_active_budget = Box::new(|| Ok(0.0));

        let metrics = get_metrics(&db).await.unwrap();

        assert_eq!(metrics.campaigns_by_status.len(), 4);
        assert!(metrics.campaigns_by_status.values().all(|count| *count == 0));
        assert_eq!(metrics.budget_by_platform.len(), 5);
        assert!(metrics.budget_by_platform.values().all(|total| *total == 0.0));
        assert_eq!(metrics.total_active_budget, 0.0);
    }

    #[tokio::test]
    async fn merges_observed_groups_over_the_zero_fill() {
        let mut db = MockDatabase::new();
        db.campaigns.on_count_campaigns_by_status =
            Box::new(|| Ok(vec![(CampaignStatus::Active, 2), (CampaignStatus::Paused, 1)]));
        db.campaigns.on_sum_budget_by_platform = Box::new(|| {
            Ok(vec![
                (Platform::Facebook, 3000.0),
                (Platform::Google, 500.0),
            ])
        });
        db.campaigns.on_sum_active_budget = Box::new(|| Ok(3000.0));

        let metrics = get_metrics(&db).await.unwrap();

        assert_eq!(metrics.campaigns_by_status[&CampaignStatus::Active], 2);
        assert_eq!(metrics.campaigns_by_status[&CampaignStatus::Paused], 1);
        assert_eq!(metrics.campaigns_by_status[&CampaignStatus::Draft], 0);
        assert_eq!(metrics.budget_by_platform[&Platform::Facebook], 3000.0);
        assert_eq!(metrics.budget_by_platform[&Platform::Twitter], 0.0);
        assert_eq!(metrics.total_active_budget, 3000.0);
    }

    #[tokio::test]
    async fn metrics_serialize_with_external_names() {
        let mut db = MockDatabase::new();
        db.campaigns.on_count_campaigns_by_status = Box::new(|| Ok(vec![]));
        db.campaigns.on_sum_budget_by_platform = Box::new(|| Ok(vec![]));
        db.campaigns.on_sum_active_budget = Box::new(|| Ok(0.0));

        let metrics = get_metrics(&db).await.unwrap();
        let json = serde_json::to_value(&metrics).unwrap();

        assert!(json.get("campaignsByStatus").is_some());
        assert_eq!(json["campaignsByStatus"]["draft"], 0);
        assert_eq!(json["budgetByPlatform"]["linkedin"], 0.0);
        assert_eq!(json["totalActiveBudget"], 0.0);
    }
}
