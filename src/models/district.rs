//! District result shapes.

use schemars::JsonSchema;
use serde::Serialize;

use super::school::RankSnapshot;

/// City and state of a district office. Both or neither.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Locality {
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct DistrictSummary {
    /// SchoolDigger district id
    pub id: String,
    pub name: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub locality: Option<Locality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_count: Option<u32>,
    /// Most recent statewide rank (1 = best)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct DistrictDetail {
    #[serde(flatten)]
    pub summary: DistrictSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elementary_schools: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_schools: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_schools: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_schools: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_of: Option<u32>,
    pub rank_history: Vec<RankSnapshot>,
}
