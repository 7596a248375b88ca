//! Explicit validators for campaign request payloads.
//!
//! Each validator takes raw, untyped input (a JSON body or the query-string
//! key/value pairs) and returns either a normalized parameter object or the
//! full list of field errors found in one pass. Schemas are closed: a field
//! that is not declared is itself an error. Field paths in errors use the
//! external camelCase names.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::campaign::{CampaignStatus, Platform};
use crate::error::FieldError;

const CAMPAIGN_FIELDS: &[&str] = &[
    "name",
    "status",
    "platform",
    "budget",
    "startDate",
    "endDate",
    "description",
    "targetAudience",
];

const LIST_PARAMS: &[&str] = &["search", "status", "platform", "limit", "offset"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fully validated POST /campaigns payload, internal field names.
#[derive(Clone, Debug, PartialEq)]
pub struct CreateCampaign {
    pub name: String,
    pub status: CampaignStatus,
    pub platform: Platform,
    pub budget: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: String,
    pub target_audience: String,
}

/// Validated PATCH /campaigns/{id} payload. Every field is optional, but the
/// validator guarantees at least one was provided.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateCampaign {
    pub name: Option<String>,
    pub status: Option<CampaignStatus>,
    pub platform: Option<Platform>,
    pub budget: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub target_audience: Option<String>,
}

/// Validated GET /campaigns query parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<CampaignStatus>,
    pub platform: Option<Platform>,
    pub limit: i64,
    pub offset: u64,
}

impl Default for ListQuery {
    fn default() -> ListQuery {
        ListQuery {
            search: None,
            status: None,
            platform: None,
            limit: 50,
            offset: 0,
        }
    }
}

pub fn validate_create(body: &Value) -> Result<CreateCampaign, Vec<FieldError>> {
    let map = match body.as_object() {
        Some(map) => map,
        None => return Err(vec![FieldError::new("_schema", "Invalid input type.")]),
    };

    let mut errors = Vec::new();
    reject_unknown_fields(map, CAMPAIGN_FIELDS, &mut errors);
    for key in CAMPAIGN_FIELDS {
        if !map.contains_key(*key) {
            errors.push(FieldError::new(*key, "Missing data for required field."));
        }
    }

    let name = non_empty_string(map, "name", &mut errors);
    let status = status_field(map, "status", &mut errors);
    let platform = platform_field(map, "platform", &mut errors);
    let budget = positive_number(map, "budget", &mut errors);
    let start_date = date_field(map, "startDate", &mut errors);
    let end_date = date_field(map, "endDate", &mut errors);
    let description = non_empty_string(map, "description", &mut errors);
    let target_audience = non_empty_string(map, "targetAudience", &mut errors);

    check_date_order(start_date, end_date, &mut errors);

    match (
        name,
        status,
        platform,
        budget,
        start_date,
        end_date,
        description,
        target_audience,
    ) {
        (
            Some(name),
            Some(status),
            Some(platform),
            Some(budget),
            Some(start_date),
            Some(end_date),
            Some(description),
            Some(target_audience),
        ) if errors.is_empty() => Ok(CreateCampaign {
            name,
            status,
            platform,
            budget,
            start_date,
            end_date,
            description,
            target_audience,
        }),
        _ => Err(errors),
    }
}

pub fn validate_update(body: &Value) -> Result<UpdateCampaign, Vec<FieldError>> {
    let map = match body.as_object() {
        Some(map) => map,
        None => return Err(vec![FieldError::new("_schema", "Invalid input type.")]),
    };

    let mut errors = Vec::new();
    reject_unknown_fields(map, CAMPAIGN_FIELDS, &mut errors);
    if map.is_empty() {
        errors.push(FieldError::new(
            "_schema",
            "At least one field must be provided.",
        ));
    }

    let update = UpdateCampaign {
        name: non_empty_string(map, "name", &mut errors),
        status: status_field(map, "status", &mut errors),
        platform: platform_field(map, "platform", &mut errors),
        budget: positive_number(map, "budget", &mut errors),
        start_date: date_field(map, "startDate", &mut errors),
        end_date: date_field(map, "endDate", &mut errors),
        description: non_empty_string(map, "description", &mut errors),
        target_audience: non_empty_string(map, "targetAudience", &mut errors),
    };

    check_date_order(update.start_date, update.end_date, &mut errors);

    if errors.is_empty() {
        Ok(update)
    } else {
        Err(errors)
    }
}

pub fn validate_list_query(params: &HashMap<String, String>) -> Result<ListQuery, Vec<FieldError>> {
    let mut errors = Vec::new();
    for key in params.keys() {
        if !LIST_PARAMS.contains(&key.as_str()) {
            errors.push(FieldError::new(key, "Unknown field."));
        }
    }

    let search = params.get("search").cloned();

    let status = match params.get("status") {
        Some(raw) => match raw.parse::<CampaignStatus>() {
            Ok(status) => Some(status),
            Err(()) => {
                errors.push(FieldError::new("status", one_of_message(CampaignStatus::ALL.map(CampaignStatus::as_str))));
                None
            }
        },
        None => None,
    };

    let platform = match params.get("platform") {
        Some(raw) => match raw.parse::<Platform>() {
            Ok(platform) => Some(platform),
            Err(()) => {
                errors.push(FieldError::new("platform", one_of_message(Platform::ALL.map(Platform::as_str))));
                None
            }
        },
        None => None,
    };

    // Out-of-range values fail validation rather than clamp.
    let limit = match params.get("limit") {
        Some(raw) => match raw.parse::<i64>() {
            Ok(limit) if (1..=100).contains(&limit) => limit,
            Ok(_) => {
                errors.push(FieldError::new(
                    "limit",
                    "Must be greater than or equal to 1 and less than or equal to 100.",
                ));
                0
            }
            Err(_) => {
                errors.push(FieldError::new("limit", "Not a valid integer."));
                0
            }
        },
        None => 50,
    };

    let offset = match params.get("offset") {
        Some(raw) => match raw.parse::<i64>() {
            Ok(offset) if offset >= 0 => offset as u64,
            Ok(_) => {
                errors.push(FieldError::new(
                    "offset",
                    "Must be greater than or equal to 0.",
                ));
                0
            }
            Err(_) => {
                errors.push(FieldError::new("offset", "Not a valid integer."));
                0
            }
        },
        None => 0,
    };

    if errors.is_empty() {
        Ok(ListQuery {
            search,
            status,
            platform,
            limit,
            offset,
        })
    } else {
        Err(errors)
    }
}

fn reject_unknown_fields(
    map: &Map<String, Value>,
    allowed: &[&str],
    errors: &mut Vec<FieldError>,
) {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            errors.push(FieldError::new(key, "Unknown field."));
        }
    }
}

fn non_empty_string(
    map: &Map<String, Value>,
    key: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match map.get(key)? {
        Value::String(s) if s.is_empty() => {
            errors.push(FieldError::new(key, "Shorter than minimum length 1."));
            None
        }
        Value::String(s) => Some(s.clone()),
        _ => {
            errors.push(FieldError::new(key, "Not a valid string."));
            None
        }
    }
}

fn status_field(
    map: &Map<String, Value>,
    key: &str,
    errors: &mut Vec<FieldError>,
) -> Option<CampaignStatus> {
    let raw = plain_string(map, key, errors)?;
    match raw.parse() {
        Ok(status) => Some(status),
        Err(()) => {
            errors.push(FieldError::new(
                key,
                one_of_message(CampaignStatus::ALL.map(CampaignStatus::as_str)),
            ));
            None
        }
    }
}

fn platform_field(
    map: &Map<String, Value>,
    key: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Platform> {
    let raw = plain_string(map, key, errors)?;
    match raw.parse() {
        Ok(platform) => Some(platform),
        Err(()) => {
            errors.push(FieldError::new(
                key,
                one_of_message(Platform::ALL.map(Platform::as_str)),
            ));
            None
        }
    }
}

fn positive_number(
    map: &Map<String, Value>,
    key: &str,
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    let value = map.get(key)?;
    let number = match value.as_f64() {
        Some(number) => number,
        None => {
            errors.push(FieldError::new(key, "Not a valid number."));
            return None;
        }
    };
    if number <= 0.0 {
        errors.push(FieldError::new(key, "Must be greater than 0."));
        return None;
    }
    Some(number)
}

fn date_field(
    map: &Map<String, Value>,
    key: &str,
    errors: &mut Vec<FieldError>,
) -> Option<NaiveDate> {
    let raw = plain_string(map, key, errors)?;
    match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new(key, "Not a valid date."));
            None
        }
    }
}

fn plain_string(
    map: &Map<String, Value>,
    key: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        _ => {
            errors.push(FieldError::new(key, "Not a valid string."));
            None
        }
    }
}

// The violation is reported against the end-date field.
fn check_date_order(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    errors: &mut Vec<FieldError>,
) {
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            errors.push(FieldError::new(
                "endDate",
                "End date must be on or after start date.",
            ));
        }
    }
}

fn one_of_message<const N: usize>(values: [&str; N]) -> String {
    format!("Must be one of: {}.", values.join(", "))
}
