use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::campaign::{Campaign, CampaignId, CampaignStatus, Platform};
use crate::database::Database;
use crate::error::Error;
use crate::insight::{CampaignInsight, InsightId};

const SAMPLE_CAMPAIGNS: &[(&str, &str, &str)] = &[
    (
        "Summer Sale 2025",
        "Annual summer sale across all platforms",
        "Adults 25-45, fashion & lifestyle",
    ),
    (
        "Product Launch - Widget X",
        "Launch campaign for the new Widget X product line",
        "Tech enthusiasts 18-35",
    ),
    (
        "Brand Awareness Q1",
        "Q1 brand awareness push for new markets",
        "General audience 18-65",
    ),
    (
        "Holiday Season Promo",
        "Holiday discounts and giveaways",
        "Families, gift shoppers 25-55",
    ),
    (
        "Back to School Drive",
        "Targeted campaign for the back-to-school season",
        "Parents with children 5-18",
    ),
    (
        "B2B Lead Generation",
        "Generate qualified leads from LinkedIn and Google",
        "Business decision-makers, SMBs",
    ),
    (
        "Retargeting - Cart Abandonment",
        "Retarget users who abandoned their shopping carts",
        "Previous website visitors",
    ),
    (
        "App Install Campaign",
        "Drive mobile app installs across platforms",
        "Smartphone users 18-40",
    ),
];

/// Populates the store with sample campaigns carrying 1-3 insight snapshots
/// each. Skipped when campaigns already exist.
pub async fn seed(db: &dyn Database) -> Result<(), Error> {
    let (existing, _) = db
        .campaigns()
        .fetch_campaigns(&Default::default())
        .await?;
    if !existing.is_empty() {
        info!("store already has campaigns, skipping seed");
        return Ok(());
    }

    let mut rng = rand::thread_rng();
    let now = Utc::now();

    for (name, description, target_audience) in SAMPLE_CAMPAIGNS {
        let start = now.date_naive() - Duration::days(rng.gen_range(1..90));
        let end = start + Duration::days(rng.gen_range(30..180));

        let campaign = Campaign {
            id: CampaignId::new(),
            name: (*name).to_string(),
            status: *CampaignStatus::ALL.choose(&mut rng).unwrap_or(&CampaignStatus::Draft),
            platform: *Platform::ALL.choose(&mut rng).unwrap_or(&Platform::Facebook),
            budget: (rng.gen_range(500.0..50_000.0f64) * 100.0).round() / 100.0,
            start_date: start,
            end_date: end,
            description: (*description).to_string(),
            target_audience: (*target_audience).to_string(),
            created_at: now,
            updated_at: now,
        };
        db.campaigns().insert_campaign(&campaign).await?;

        for _ in 0..rng.gen_range(1..=3) {
            let impressions = rng.gen_range(1_000..200_000);
            let clicks = rng.gen_range(50..impressions / 3);
            let conversions = rng.gen_range(5..(clicks / 5).max(6));

            let insight = CampaignInsight {
                id: InsightId::new(),
                campaign_id: campaign.id,
                captured_at: now - Duration::days(rng.gen_range(0..30)),
                impressions,
                clicks,
                conversions,
                ctr: ((clicks as f64 / impressions as f64) * 10_000.0).round() / 100.0,
                cpc: (rng.gen_range(0.10..8.00f64) * 100.0).round() / 100.0,
                roi: (rng.gen_range(-20.0..400.0f64) * 100.0).round() / 100.0,
                engagement_likes: rng.gen_range(20..10_000),
                engagement_shares: rng.gen_range(5..2_000),
                engagement_comments: rng.gen_range(2..800),
            };
            db.insights().insert_insight(&insight).await?;
        }
    }

    info!("seeded {} campaigns with insights", SAMPLE_CAMPAIGNS.len());
    Ok(())
}
