//! Tool parameter types and their endpoint mappings.
//!
//! Required parameters are declared as `Option` so that a missing value is
//! reported as a validation error naming the field, rather than a generic
//! deserialization failure. Unknown keys are ignored.

use schemars::JsonSchema;
use serde::Deserialize;

use super::validation::{self as v, SortBy};
use super::ApiRequest;
use crate::error::Result;

fn school_sort(sort: SortBy) -> &'static str {
    match sort {
        SortBy::Rank => "rank",
        SortBy::Name => "schoolname",
    }
}

fn district_sort(sort: SortBy) -> &'static str {
    match sort {
        SortBy::Rank => "rank",
        SortBy::Name => "districtname",
    }
}

// ── search_schools ──

/// Parameters for searching schools within a state.
#[derive(Debug, Clone, Deserialize, JsonSchema, Default)]
pub struct SearchSchoolsParams {
    /// Two-letter US state code like CA, NY, TX (REQUIRED)
    #[serde(default)]
    pub state: Option<String>,
    /// City name (e.g., "Palo Alto")
    #[serde(default)]
    pub city: Option<String>,
    /// Partial school name to search for (e.g., "Lincoln")
    #[serde(default)]
    pub query: Option<String>,
    /// Elementary, Middle, High, Alt, Public or Private
    #[serde(default, alias = "school_level")]
    pub level: Option<String>,
    /// Page number, starting at 1
    #[serde(default)]
    pub page: Option<u32>,
    /// Results per page (1-50, default 10)
    #[serde(default)]
    pub per_page: Option<u32>,
    /// "rank" (default) or "name"
    #[serde(default)]
    pub sort_by: Option<String>,
}

impl SearchSchoolsParams {
    pub fn to_request(&self) -> Result<ApiRequest> {
        let state = v::required_state("state", &self.state)?;
        let level = v::level("level", &self.level)?;
        let page = v::page(self.page)?;
        let per_page = v::page_size("per_page", self.per_page)?;
        let sort = v::sort_by(&self.sort_by)?;

        Ok(ApiRequest::new("schools")
            .param("st", state)
            .opt_param("q", v::optional(&self.query))
            .opt_param("city", v::optional(&self.city))
            .opt_param("level", level.map(|l| l.as_query()))
            .param("page", page)
            .param("perPage", per_page)
            .param("sortBy", school_sort(sort)))
    }
}

// ── get_school_details ──

/// Parameters for fetching one school.
#[derive(Debug, Clone, Deserialize, JsonSchema, Default)]
pub struct SchoolDetailParams {
    /// SchoolDigger school id (REQUIRED)
    #[serde(default)]
    pub school_id: Option<String>,
    /// Two-letter state code of the school (REQUIRED)
    #[serde(default)]
    pub state: Option<String>,
}

impl SchoolDetailParams {
    pub fn to_request(&self) -> Result<ApiRequest> {
        let id = v::identifier("school_id", &self.school_id)?;
        // Checked for the caller's benefit; the detail endpoint keys by id only.
        v::required_state("state", &self.state)?;
        Ok(ApiRequest::new(format!("schools/{id}")))
    }
}

// ── search_schools_by_zip ──

/// Parameters for listing schools in a ZIP code.
#[derive(Debug, Clone, Deserialize, JsonSchema, Default)]
pub struct SearchByZipParams {
    /// Five-digit ZIP code (REQUIRED)
    #[serde(default, alias = "zip_code")]
    pub zip: Option<String>,
    /// Two-letter state code, narrows the search when given
    #[serde(default)]
    pub state: Option<String>,
    /// Elementary, Middle, High, Alt, Public or Private
    #[serde(default, alias = "school_level")]
    pub level: Option<String>,
    /// Page number, starting at 1
    #[serde(default)]
    pub page: Option<u32>,
    /// Results per page (1-50, default 10)
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl SearchByZipParams {
    pub fn to_request(&self) -> Result<ApiRequest> {
        let zip = v::zip_code("zip", v::required("zip", &self.zip)?)?;
        let state = v::optional_state("state", &self.state)?;
        let level = v::level("level", &self.level)?;
        let page = v::page(self.page)?;
        let per_page = v::page_size("per_page", self.per_page)?;

        Ok(ApiRequest::new("schools")
            .param("zip", zip)
            .opt_param("st", state)
            .opt_param("level", level.map(|l| l.as_query()))
            .param("page", page)
            .param("perPage", per_page)
            .param("sortBy", "rank"))
    }
}

// ── top_ranked_schools ──

/// Parameters for the best ranked schools of a city.
#[derive(Debug, Clone, Deserialize, JsonSchema, Default)]
pub struct TopRankedParams {
    /// City name (REQUIRED)
    #[serde(default)]
    pub city: Option<String>,
    /// Two-letter state code (REQUIRED)
    #[serde(default)]
    pub state: Option<String>,
    /// Elementary, Middle, High, Alt, Public or Private
    #[serde(default, alias = "school_level")]
    pub level: Option<String>,
    /// How many schools to return (1-50, default 10)
    #[serde(default)]
    pub count: Option<u32>,
}

impl TopRankedParams {
    pub fn to_request(&self) -> Result<ApiRequest> {
        let city = v::required("city", &self.city)?;
        let state = v::required_state("state", &self.state)?;
        let level = v::level("level", &self.level)?;
        let count = v::page_size("count", self.count)?;

        Ok(ApiRequest::new("schools")
            .param("st", state)
            .param("city", city)
            .opt_param("level", level.map(|l| l.as_query()))
            .param("page", 1)
            .param("perPage", count)
            .param("sortBy", "rank"))
    }
}

// ── search_districts ──

/// Parameters for searching districts within a state.
#[derive(Debug, Clone, Deserialize, JsonSchema, Default)]
pub struct SearchDistrictsParams {
    /// Two-letter state code (REQUIRED)
    #[serde(default)]
    pub state: Option<String>,
    /// Partial district name (e.g., "San")
    #[serde(default)]
    pub query: Option<String>,
    /// City name
    #[serde(default)]
    pub city: Option<String>,
    /// Five-digit ZIP code
    #[serde(default, alias = "zip_code")]
    pub zip: Option<String>,
    /// Page number, starting at 1
    #[serde(default)]
    pub page: Option<u32>,
    /// Results per page (1-50, default 10)
    #[serde(default)]
    pub per_page: Option<u32>,
    /// "rank" (default) or "name"
    #[serde(default)]
    pub sort_by: Option<String>,
}

impl SearchDistrictsParams {
    pub fn to_request(&self) -> Result<ApiRequest> {
        let state = v::required_state("state", &self.state)?;
        let zip = v::optional(&self.zip)
            .map(|z| v::zip_code("zip", z))
            .transpose()?;
        let page = v::page(self.page)?;
        let per_page = v::page_size("per_page", self.per_page)?;
        let sort = v::sort_by(&self.sort_by)?;

        Ok(ApiRequest::new("districts")
            .param("st", state)
            .opt_param("q", v::optional(&self.query))
            .opt_param("city", v::optional(&self.city))
            .opt_param("zip", zip)
            .param("page", page)
            .param("perPage", per_page)
            .param("sortBy", district_sort(sort)))
    }
}

// ── schools_in_district ──

/// Parameters for listing the schools of one district.
#[derive(Debug, Clone, Deserialize, JsonSchema, Default)]
pub struct SchoolsInDistrictParams {
    /// SchoolDigger district id (REQUIRED)
    #[serde(default)]
    pub district_id: Option<String>,
    /// Two-letter state code (REQUIRED)
    #[serde(default)]
    pub state: Option<String>,
    /// Elementary, Middle, High, Alt, Public or Private
    #[serde(default, alias = "school_level")]
    pub level: Option<String>,
    /// Page number, starting at 1
    #[serde(default)]
    pub page: Option<u32>,
    /// Results per page (1-50, default 10)
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl SchoolsInDistrictParams {
    pub fn to_request(&self) -> Result<ApiRequest> {
        let district_id = v::identifier("district_id", &self.district_id)?;
        let state = v::required_state("state", &self.state)?;
        let level = v::level("level", &self.level)?;
        let page = v::page(self.page)?;
        let per_page = v::page_size("per_page", self.per_page)?;

        Ok(ApiRequest::new("schools")
            .param("st", state)
            .param("districtID", district_id)
            .opt_param("level", level.map(|l| l.as_query()))
            .param("page", page)
            .param("perPage", per_page)
            .param("sortBy", "rank"))
    }
}

// ── autocomplete_schools ──

/// Parameters for school name suggestions.
#[derive(Debug, Clone, Deserialize, JsonSchema, Default)]
pub struct AutocompleteParams {
    /// Partial school name (REQUIRED)
    #[serde(default)]
    pub query: Option<String>,
    /// Two-letter state code to restrict suggestions
    #[serde(default)]
    pub state: Option<String>,
    /// Elementary, Middle, High, Alt, Public or Private
    #[serde(default, alias = "school_level")]
    pub level: Option<String>,
    /// Maximum suggestions (1-50, default 10)
    #[serde(default)]
    pub max_results: Option<u32>,
}

impl AutocompleteParams {
    pub fn to_request(&self) -> Result<ApiRequest> {
        let query = v::required("query", &self.query)?;
        let state = v::optional_state("state", &self.state)?;
        let level = v::level("level", &self.level)?;
        let max = v::page_size("max_results", self.max_results)?;

        Ok(ApiRequest::new("autocomplete/schools")
            .param("q", query)
            .opt_param("st", state)
            .opt_param("level", level.map(|l| l.as_query()))
            .param("returnCount", max))
    }
}

// ── get_district_details ──

/// Parameters for fetching one district.
#[derive(Debug, Clone, Deserialize, JsonSchema, Default)]
pub struct DistrictDetailParams {
    /// SchoolDigger district id (REQUIRED)
    #[serde(default)]
    pub district_id: Option<String>,
}

impl DistrictDetailParams {
    pub fn to_request(&self) -> Result<ApiRequest> {
        let id = v::identifier("district_id", &self.district_id)?;
        Ok(ApiRequest::new(format!("districts/{id}")))
    }
}
