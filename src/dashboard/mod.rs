use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::campaign::{CampaignStatus, Platform};

pub mod endpoints;
pub mod manager;

/// Cross-campaign aggregates for the dashboard UI. Both maps always carry
/// the full enum key set; categories with no campaigns report zero.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub campaigns_by_status: BTreeMap<CampaignStatus, u64>,
    pub budget_by_platform: BTreeMap<Platform, f64>,
    pub total_active_budget: f64,
}
