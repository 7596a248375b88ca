use chrono::Utc;
use tracing::info;

use crate::database::Database;
use crate::error::Error;

use super::schema::{CreateCampaign, ListQuery, UpdateCampaign};
use super::{Campaign, CampaignId};

#[tracing::instrument(skip(db))]
pub async fn create_campaign(db: &dyn Database, data: CreateCampaign) -> Result<Campaign, Error> {
    let now = Utc::now();
    let campaign = Campaign {
        id: CampaignId::new(),
        name: data.name,
        status: data.status,
        platform: data.platform,
        budget: data.budget,
        start_date: data.start_date,
        end_date: data.end_date,
        description: data.description,
        target_audience: data.target_audience,
        created_at: now,
        updated_at: now,
    };

    db.campaigns().insert_campaign(&campaign).await?;
    info!("campaign created: {}", campaign.id);

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn list_campaigns(
    db: &dyn Database,
    query: &ListQuery,
) -> Result<(Vec<Campaign>, u64), Error> {
    let (campaigns, total) = db.campaigns().fetch_campaigns(query).await?;

    Ok((campaigns, total))
}

#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: &dyn Database,
    campaign_id: CampaignId,
) -> Result<Campaign, Error> {
    let campaign = db
        .campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn update_campaign(
    db: &dyn Database,
    campaign_id: CampaignId,
    data: UpdateCampaign,
) -> Result<Campaign, Error> {
    let mut campaign = db
        .campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    // Only the provided fields change; the rest keep their prior values.
    if let Some(name) = data.name {
        campaign.name = name;
    }
    if let Some(status) = data.status {
        campaign.status = status;
    }
    if let Some(platform) = data.platform {
        campaign.platform = platform;
    }
    if let Some(budget) = data.budget {
        campaign.budget = budget;
    }
    if let Some(start_date) = data.start_date {
        campaign.start_date = start_date;
    }
    if let Some(end_date) = data.end_date {
        campaign.end_date = end_date;
    }
    if let Some(description) = data.description {
        campaign.description = description;
    }
    if let Some(target_audience) = data.target_audience {
        campaign.target_audience = target_audience;
    }
    campaign.updated_at = Utc::now();

    db.campaigns().update_campaign(&campaign).await?;
    info!("campaign updated: {}", campaign.id);

    Ok(campaign)
}

/// Deletes the campaign and all of its insight snapshots. The snapshots go
/// first so a fault between the two deletes never leaves orphaned insights.
#[tracing::instrument(skip(db))]
pub async fn delete_campaign(db: &dyn Database, campaign_id: CampaignId) -> Result<(), Error> {
    db.campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    let removed_insights = db
        .insights()
        .delete_insights_by_campaign(campaign_id)
        .await?;
    db.campaigns().delete_campaign(campaign_id).await?;
    info!(
        "campaign deleted: {} ({} insights removed)",
        campaign_id, removed_insights
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::{CampaignStatus, Platform};
    use crate::database::test::MockDatabase;
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};

    fn create_data() -> CreateCampaign {
        CreateCampaign {
            name: "Blue Man Group".to_string(),
            status: CampaignStatus::Draft,
            platform: Platform::Facebook,
            budget: 1000.0,
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
            description: "A very blue campaign".to_string(),
            target_audience: "Adults 25-45".to_string(),
        }
    }

    fn stored_campaign(campaign_id: CampaignId) -> Campaign {
        let now = Utc::now();
        Campaign {
            id: campaign_id,
            name: "Blue Man Group".to_string(),
            status: CampaignStatus::Draft,
            platform: Platform::Facebook,
            budget: 1000.0,
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
            description: "A very blue campaign".to_string(),
            target_audience: "Adults 25-45".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn can_create_campaign() {
        let mut db = MockDatabase::new();
        let called_insert = Arc::new(Mutex::new(false));
        let called_insert_clone = Arc::clone(&called_insert);
        db.campaigns.on_insert_campaign = Box::new(move |campaign| {
            *called_insert_clone.lock().unwrap() = true;
            assert_eq!(campaign.name, "Blue Man Group".to_string());
            assert_eq!(campaign.created_at, campaign.updated_at);
            Ok(())
        });

        let campaign = create_campaign(&db, create_data()).await.unwrap();

        assert_eq!(campaign.name, "Blue Man Group".to_string());
        assert_eq!(campaign.status, CampaignStatus::Draft);
        assert_eq!(campaign.created_at, campaign.updated_at);
        assert!(
            *called_insert.lock().unwrap(),
            "db.insert_campaign was not called"
        );
    }

    #[tokio::test]
    async fn get_campaign_by_id_returns_campaign() {
        let mut db = MockDatabase::new();
        let test_campaign_id = CampaignId::new();
        db.campaigns.on_fetch_campaign_by_id = Box::new(move |campaign_id| {
            assert_eq!(campaign_id, test_campaign_id);
            Ok(Some(stored_campaign(campaign_id)))
        });

        let campaign = get_campaign_by_id(&db, test_campaign_id).await.unwrap();

        assert_eq!(campaign.id, test_campaign_id);
        assert_eq!(campaign.name, "Blue Man Group".to_string());
    }

    #[tokio::test]
    async fn get_campaign_by_id_returns_error_if_doesnt_exist() {
        let mut db = MockDatabase::new();
        let test_campaign_id = CampaignId::new();
        db.campaigns.on_fetch_campaign_by_id = Box::new(|_| Ok(None));

        let result = get_campaign_by_id(&db, test_campaign_id).await;

        assert_eq!(
            result.unwrap_err(),
            Error::CampaignNotFound {
                campaign_id: test_campaign_id
            }
        );
    }

    #[tokio::test]
    async fn update_applies_only_provided_fields() {
        let mut db = MockDatabase::new();
        let test_campaign_id = CampaignId::new();
        db.campaigns.on_fetch_campaign_by_id =
            Box::new(move |campaign_id| Ok(Some(stored_campaign(campaign_id))));
        let updated = Arc::new(Mutex::new(None));
        let updated_clone = Arc::clone(&updated);
        db.campaigns.on_update_campaign = Box::new(move |campaign| {
            *updated_clone.lock().unwrap() = Some(campaign.clone());
            Ok(())
        });

        let data = UpdateCampaign {
            budget: Some(5000.0),
            ..UpdateCampaign::default()
        };
        let campaign = update_campaign(&db, test_campaign_id, data).await.unwrap();

        assert_eq!(campaign.budget, 5000.0);
        assert_eq!(campaign.name, "Blue Man Group".to_string());
        assert!(campaign.updated_at >= campaign.created_at);
        let persisted = updated.lock().unwrap().clone().unwrap();
        assert_eq!(persisted.budget, 5000.0);
    }

    #[tokio::test]
    async fn update_missing_campaign_is_not_found() {
        let mut db = MockDatabase::new();
        let test_campaign_id = CampaignId::new();
        db.campaigns.on_fetch_campaign_by_id = Box::new(|_| Ok(None));

        let data = UpdateCampaign {
            name: Some("New Name".to_string()),
            ..UpdateCampaign::default()
        };
        let result = update_campaign(&db, test_campaign_id, data).await;

        assert_eq!(
            result.unwrap_err(),
            Error::CampaignNotFound {
                campaign_id: test_campaign_id
            }
        );
    }

    #[tokio::test]
    async fn delete_cascades_to_insights() {
        let mut db = MockDatabase::new();
        let test_campaign_id = CampaignId::new();
        db.campaigns.on_fetch_campaign_by_id =
            Box::new(move |campaign_id| Ok(Some(stored_campaign(campaign_id))));
        let deleted_campaign = Arc::new(Mutex::new(false));
        let deleted_campaign_clone = Arc::clone(&deleted_campaign);
        db.campaigns.on_delete_campaign = Box::new(move |campaign_id| {
            assert_eq!(campaign_id, test_campaign_id);
            *deleted_campaign_clone.lock().unwrap() = true;
            Ok(true)
        });
        let deleted_insights = Arc::new(Mutex::new(false));
        let deleted_insights_clone = Arc::clone(&deleted_insights);
        db.insights.on_delete_insights_by_campaign = Box::new(move |campaign_id| {
            assert_eq!(campaign_id, test_campaign_id);
            *deleted_insights_clone.lock().unwrap() = true;
            Ok(2)
        });

        delete_campaign(&db, test_campaign_id).await.unwrap();

        assert!(
            *deleted_campaign.lock().unwrap(),
            "db.delete_campaign was not called"
        );
        assert!(
            *deleted_insights.lock().unwrap(),
            "db.delete_insights_by_campaign was not called"
        );
    }

    #[tokio::test]
    async fn delete_missing_campaign_is_not_found() {
        let mut db = MockDatabase::new();
        let test_campaign_id = CampaignId::new();
        db.campaigns.on_fetch_campaign_by_id = Box::new(|_| Ok(None));

        let result = delete_campaign(&db, test_campaign_id).await;

        assert_eq!(
            result.unwrap_err(),
            Error::CampaignNotFound {
                campaign_id: test_campaign_id
            }
        );
    }
}
