//! Endpoint mappers.
//!
//! Each supported tool call is one [`Operation`] variant. Mapping a variant to
//! an [`ApiRequest`] is pure and validates every parameter first, so invalid
//! input never reaches the network.

pub mod params;
pub mod validation;

pub use params::*;

use crate::error::Result;

/// Endpoint path (relative to the versioned API root) plus query pairs.
/// Credentials are added later by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub path: String,
    pub query: Vec<(&'static str, String)>,
}

impl ApiRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub fn opt_param<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Which result shape an operation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    SearchSchools,
    SchoolDetail,
    SearchByZip,
    TopRankedByCity,
    SearchDistricts,
    SchoolsInDistrict,
    AutocompleteSchools,
    DistrictDetail,
}

impl OperationKind {
    pub const ALL: [OperationKind; 8] = [
        OperationKind::SearchSchools,
        OperationKind::SchoolDetail,
        OperationKind::SearchByZip,
        OperationKind::TopRankedByCity,
        OperationKind::SearchDistricts,
        OperationKind::SchoolsInDistrict,
        OperationKind::AutocompleteSchools,
        OperationKind::DistrictDetail,
    ];

    /// MCP tool name.
    pub fn tool_name(&self) -> &'static str {
        match self {
            OperationKind::SearchSchools => "search_schools",
            OperationKind::SchoolDetail => "get_school_details",
            OperationKind::SearchByZip => "search_schools_by_zip",
            OperationKind::TopRankedByCity => "top_ranked_schools",
            OperationKind::SearchDistricts => "search_districts",
            OperationKind::SchoolsInDistrict => "schools_in_district",
            OperationKind::AutocompleteSchools => "autocomplete_schools",
            OperationKind::DistrictDetail => "get_district_details",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Operation {
    SearchSchools(SearchSchoolsParams),
    SchoolDetail(SchoolDetailParams),
    SearchByZip(SearchByZipParams),
    TopRankedByCity(TopRankedParams),
    SearchDistricts(SearchDistrictsParams),
    SchoolsInDistrict(SchoolsInDistrictParams),
    AutocompleteSchools(AutocompleteParams),
    DistrictDetail(DistrictDetailParams),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::SearchSchools(_) => OperationKind::SearchSchools,
            Operation::SchoolDetail(_) => OperationKind::SchoolDetail,
            Operation::SearchByZip(_) => OperationKind::SearchByZip,
            Operation::TopRankedByCity(_) => OperationKind::TopRankedByCity,
            Operation::SearchDistricts(_) => OperationKind::SearchDistricts,
            Operation::SchoolsInDistrict(_) => OperationKind::SchoolsInDistrict,
            Operation::AutocompleteSchools(_) => OperationKind::AutocompleteSchools,
            Operation::DistrictDetail(_) => OperationKind::DistrictDetail,
        }
    }

    pub fn to_request(&self) -> Result<ApiRequest> {
        match self {
            Operation::SearchSchools(p) => p.to_request(),
            Operation::SchoolDetail(p) => p.to_request(),
            Operation::SearchByZip(p) => p.to_request(),
            Operation::TopRankedByCity(p) => p.to_request(),
            Operation::SearchDistricts(p) => p.to_request(),
            Operation::SchoolsInDistrict(p) => p.to_request(),
            Operation::AutocompleteSchools(p) => p.to_request(),
            Operation::DistrictDetail(p) => p.to_request(),
        }
    }
}
