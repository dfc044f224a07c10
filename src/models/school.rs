//! School result shapes.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::Serialize;

/// School level as used both for filtering and in results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SchoolLevel {
    Elementary,
    Middle,
    High,
    Alternative,
    Public,
    Private,
}

impl SchoolLevel {
    pub const ALL: [SchoolLevel; 6] = [
        SchoolLevel::Elementary,
        SchoolLevel::Middle,
        SchoolLevel::High,
        SchoolLevel::Alternative,
        SchoolLevel::Public,
        SchoolLevel::Private,
    ];

    /// Value SchoolDigger expects in the `level` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            SchoolLevel::Elementary => "Elementary",
            SchoolLevel::Middle => "Middle",
            SchoolLevel::High => "High",
            SchoolLevel::Alternative => "Alt",
            SchoolLevel::Public => "Public",
            SchoolLevel::Private => "Private",
        }
    }

    /// Short description, used by the school-levels resource.
    pub fn describe(&self) -> &'static str {
        match self {
            SchoolLevel::Elementary => "Grades K-5",
            SchoolLevel::Middle => "Grades 6-8",
            SchoolLevel::High => "Grades 9-12",
            SchoolLevel::Alternative => "Alternative education programs",
            SchoolLevel::Public => "All public Elementary, Middle, High and Alternative schools",
            SchoolLevel::Private => "Private institutions",
        }
    }
}

impl FromStr for SchoolLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "elementary" => Ok(SchoolLevel::Elementary),
            "middle" => Ok(SchoolLevel::Middle),
            "high" => Ok(SchoolLevel::High),
            "alt" | "alternative" => Ok(SchoolLevel::Alternative),
            "public" => Ok(SchoolLevel::Public),
            "private" => Ok(SchoolLevel::Private),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SchoolLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

/// Street address block. Either fully populated or absent.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Location {
    /// Street address
    pub address: String,
    pub city: String,
    /// Two-letter state code
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct SchoolSummary {
    /// SchoolDigger school id
    pub id: String,
    pub name: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<SchoolLevel>,
    /// Most recent statewide rank (1 = best)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

/// One year of statewide ranking.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RankSnapshot {
    pub year: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_of: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_stars: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statewide_percentile: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct TestScore {
    pub test: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    /// Percent of the school's students meeting the standard
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_percent_met: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_percent_met: Option<f64>,
}

/// Full school record: the summary plus everything the detail endpoint adds.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct SchoolDetail {
    #[serde(flatten)]
    pub summary: SchoolSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_charter: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_magnet: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_virtual: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_title_i: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    /// Students enrolled in the most recent reported year
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pupil_teacher_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_of: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_stars: Option<u32>,
    pub rank_history: Vec<RankSnapshot>,
    pub test_scores: Vec<TestScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RankedListEntry {
    pub school: SchoolSummary,
    pub rank: u32,
    /// Number of schools ranked in the same state and level
    pub rank_of: u32,
}

/// Autocomplete suggestion. Only carries what the autocomplete endpoint
/// returns, so no street address.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct SchoolMatch {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<SchoolLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_of: Option<u32>,
}
