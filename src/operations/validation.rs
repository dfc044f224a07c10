//! Parameter checks shared by the endpoint mappers. Everything here runs
//! before a request is built.

use crate::error::{Result, SchoolDiggerError};
use crate::models::SchoolLevel;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// SchoolDigger refuses larger pages.
pub const MAX_PAGE_SIZE: u32 = 50;
const MAX_ID_LEN: usize = 16;

/// Trimmed value of a required text parameter.
pub fn required<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SchoolDiggerError::missing(field)),
    }
}

/// Trimmed value of an optional text parameter; blank counts as absent.
pub fn optional(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

pub fn state_code(field: &'static str, value: &str) -> Result<String> {
    if value.len() == 2 && value.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(value.to_ascii_uppercase())
    } else {
        Err(SchoolDiggerError::validation(
            field,
            format!("'{value}' is not a two-letter state code"),
        ))
    }
}

pub fn required_state(field: &'static str, value: &Option<String>) -> Result<String> {
    state_code(field, required(field, value)?)
}

pub fn optional_state(field: &'static str, value: &Option<String>) -> Result<Option<String>> {
    optional(value).map(|v| state_code(field, v)).transpose()
}

pub fn zip_code(field: &'static str, value: &str) -> Result<String> {
    if value.len() == 5 && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(value.to_string())
    } else {
        Err(SchoolDiggerError::validation(
            field,
            format!("'{value}' is not a five-digit ZIP code"),
        ))
    }
}

/// School and district ids become path segments, so only plain
/// alphanumerics pass.
pub fn identifier(field: &'static str, value: &Option<String>) -> Result<String> {
    let value = required(field, value)?;
    if value.len() <= MAX_ID_LEN && value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(value.to_string())
    } else {
        Err(SchoolDiggerError::validation(
            field,
            format!("'{value}' is not a valid SchoolDigger id"),
        ))
    }
}

pub fn level(field: &'static str, value: &Option<String>) -> Result<Option<SchoolLevel>> {
    optional(value)
        .map(|v| {
            v.parse::<SchoolLevel>().map_err(|_| {
                SchoolDiggerError::validation(
                    field,
                    format!("'{v}' is not one of Elementary, Middle, High, Alt, Public, Private"),
                )
            })
        })
        .transpose()
}

pub fn page(value: Option<u32>) -> Result<u32> {
    match value {
        None => Ok(1),
        Some(0) => Err(SchoolDiggerError::validation("page", "must be 1 or greater")),
        Some(p) => Ok(p),
    }
}

/// Page size style parameter in `1..=MAX_PAGE_SIZE`.
pub fn page_size(field: &'static str, value: Option<u32>) -> Result<u32> {
    match value {
        None => Ok(DEFAULT_PAGE_SIZE),
        Some(n) if (1..=MAX_PAGE_SIZE).contains(&n) => Ok(n),
        Some(n) => Err(SchoolDiggerError::validation(
            field,
            format!("{n} is outside 1..={MAX_PAGE_SIZE}"),
        )),
    }
}

/// Sort order for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Rank,
    Name,
}

pub fn sort_by(value: &Option<String>) -> Result<SortBy> {
    match optional(value).map(str::to_ascii_lowercase).as_deref() {
        None | Some("rank") => Ok(SortBy::Rank),
        Some("name") | Some("schoolname") | Some("districtname") => Ok(SortBy::Name),
        Some(other) => Err(SchoolDiggerError::validation(
            "sort_by",
            format!("'{other}' is not one of rank, name"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    fn field_of(err: SchoolDiggerError) -> &'static str {
        match err {
            SchoolDiggerError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn blank_required_is_missing() {
        assert_eq!(field_of(required("city", &None).unwrap_err()), "city");
        assert_eq!(field_of(required("city", &some("   ")).unwrap_err()), "city");
        assert_eq!(required("city", &some(" Austin ")).unwrap(), "Austin");
    }

    #[test]
    fn state_is_uppercased() {
        assert_eq!(required_state("state", &some("ca")).unwrap(), "CA");
        assert_eq!(
            field_of(required_state("state", &some("Cal")).unwrap_err()),
            "state"
        );
        assert_eq!(optional_state("state", &some("")).unwrap(), None);
    }

    #[test]
    fn zip_needs_five_digits() {
        assert!(zip_code("zip", "94301").is_ok());
        assert!(zip_code("zip", "9430").is_err());
        assert!(zip_code("zip", "94301-1234").is_err());
        assert!(zip_code("zip", "9430a").is_err());
    }

    #[test]
    fn identifiers_reject_path_tricks() {
        assert_eq!(identifier("school_id", &some("060000000001")).unwrap(), "060000000001");
        assert!(identifier("school_id", &some("../admin")).is_err());
        assert!(identifier("school_id", &some("12345678901234567")).is_err());
    }

    #[test]
    fn numeric_bounds() {
        assert_eq!(page(None).unwrap(), 1);
        assert!(page(Some(0)).is_err());
        assert_eq!(page_size("per_page", None).unwrap(), DEFAULT_PAGE_SIZE);
        assert_eq!(page_size("per_page", Some(50)).unwrap(), 50);
        let err = page_size("count", Some(51)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert_eq!(field_of(err), "count");
    }

    #[test]
    fn level_and_sort() {
        assert_eq!(level("level", &None).unwrap(), None);
        assert_eq!(
            level("level", &some("high")).unwrap(),
            Some(SchoolLevel::High)
        );
        assert!(level("level", &some("college")).is_err());
        assert_eq!(sort_by(&None).unwrap(), SortBy::Rank);
        assert_eq!(sort_by(&some("Name")).unwrap(), SortBy::Name);
        assert!(sort_by(&some("distance")).is_err());
    }
}
