//! Canonical result shapes returned to MCP callers.
//!
//! These are independent of SchoolDigger's endpoint-specific JSON; the
//! normalizer is the only place that knows both sides.

pub mod district;
pub mod school;

pub use district::*;
pub use school::*;

use schemars::JsonSchema;
use serde::Serialize;

/// A page of schools.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct SchoolList {
    /// Total matches reported upstream across all pages
    pub total: u64,
    pub page_count: u32,
    pub schools: Vec<SchoolSummary>,
}

/// A page of districts.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct DistrictList {
    pub total: u64,
    pub page_count: u32,
    pub districts: Vec<DistrictSummary>,
}

/// Ranked schools, best first.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RankedList {
    pub entries: Vec<RankedListEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct SchoolMatches {
    pub matches: Vec<SchoolMatch>,
}
