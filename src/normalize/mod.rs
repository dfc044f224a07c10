//! Response normalizer.
//!
//! Turns SchoolDigger's endpoint-specific envelopes into the canonical shapes
//! in [`crate::models`]. List records without an id or name, or with a
//! partially populated address, are dropped; an empty or missing list is an
//! empty result, never an error.

pub mod fields;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, SchoolDiggerError};
use crate::models::{
    DistrictDetail, DistrictList, DistrictSummary, Locality, Location, RankSnapshot, RankedList,
    RankedListEntry, SchoolDetail, SchoolLevel, SchoolList, SchoolMatch, SchoolMatches,
    SchoolSummary, TestScore,
};
use crate::operations::OperationKind;
use fields::{Group, Object};

/// Result of normalizing one upstream payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Schools(SchoolList),
    School(Box<SchoolDetail>),
    Ranked(RankedList),
    Districts(DistrictList),
    District(Box<DistrictDetail>),
    Matches(SchoolMatches),
    /// The detail payload held no usable record.
    NotFound(String),
}

impl Normalized {
    /// JSON returned to the tool caller. `NotFound` becomes an error so that
    /// callers see a stable `not_found` kind.
    pub fn into_value(self) -> Result<Value> {
        let value = match self {
            Normalized::Schools(list) => serde_json::to_value(list)?,
            Normalized::School(detail) => serde_json::to_value(*detail)?,
            Normalized::Ranked(list) => serde_json::to_value(list)?,
            Normalized::Districts(list) => serde_json::to_value(list)?,
            Normalized::District(detail) => serde_json::to_value(*detail)?,
            Normalized::Matches(matches) => serde_json::to_value(matches)?,
            Normalized::NotFound(what) => return Err(SchoolDiggerError::NotFound(what)),
        };
        Ok(value)
    }
}

pub fn normalize(kind: OperationKind, raw: &Value) -> Result<Normalized> {
    match kind {
        OperationKind::SearchSchools
        | OperationKind::SearchByZip
        | OperationKind::SchoolsInDistrict => school_list(raw).map(Normalized::Schools),
        OperationKind::TopRankedByCity => ranked_list(raw).map(Normalized::Ranked),
        OperationKind::SchoolDetail => school_detail(raw),
        OperationKind::SearchDistricts => district_list(raw).map(Normalized::Districts),
        OperationKind::DistrictDetail => district_detail(raw),
        OperationKind::AutocompleteSchools => school_matches(raw).map(Normalized::Matches),
    }
}

// ============================================================================
// Envelopes
// ============================================================================

fn root(raw: &Value) -> Result<&Object> {
    raw.as_object().ok_or_else(|| {
        SchoolDiggerError::Parse(format!(
            "expected a JSON object, got {}",
            json_type_name(raw)
        ))
    })
}

/// The record array under `key`; missing or null means zero matches.
fn records<'a>(obj: &'a Object, key: &str) -> Result<Vec<&'a Object>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.iter().filter_map(Value::as_object).collect()),
        Some(other) => Err(SchoolDiggerError::Parse(format!(
            "expected '{key}' to be an array, got {}",
            json_type_name(other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn log_dropped(list: &str, received: usize, kept: usize) {
    if kept < received {
        debug!(
            list,
            received,
            dropped = received - kept,
            "Dropped malformed upstream records"
        );
    }
}

// ============================================================================
// Schools
// ============================================================================

#[derive(Clone, Copy, PartialEq)]
enum PartialAddress {
    /// List context: drop the whole record.
    Drop,
    /// Detail context: keep the record, report no address.
    Omit,
}

fn school_location(school: &Object) -> Group<Location> {
    let Some(address) = fields::object(school, "address") else {
        return Group::Absent;
    };
    Group::collect(
        [
            fields::text(address, "street"),
            fields::text(address, "city"),
            fields::text(address, "state"),
            fields::text(address, "zip"),
        ],
        |[address, city, state, zip]| Location {
            address,
            city,
            state,
            zip,
        },
    )
}

fn school_level(school: &Object) -> Option<SchoolLevel> {
    fields::text(school, "schoolLevel").and_then(|level| level.parse().ok())
}

/// Latest year's rank snapshot, if it carries a usable rank.
fn latest_rank(record: &Object) -> Option<RankSnapshot> {
    fields::latest(record, "rankHistory")
        .and_then(rank_snapshot)
        .filter(|snapshot| snapshot.rank.is_some())
}

fn rank_snapshot(entry: &Object) -> Option<RankSnapshot> {
    Some(RankSnapshot {
        year: fields::count(entry, "year")?,
        rank: fields::rank(entry, "rank"),
        rank_of: fields::rank(entry, "rankOf"),
        rank_stars: fields::count(entry, "rankStars"),
        statewide_percentile: fields::number(entry, "rankStatewidePercentage"),
    })
}

fn rank_history(record: &Object) -> Vec<RankSnapshot> {
    let mut history: Vec<RankSnapshot> = fields::objects(record, "rankHistory")
        .filter_map(rank_snapshot)
        .collect();
    history.sort_by(|a, b| b.year.cmp(&a.year));
    history
}

fn school_summary(school: &Object, partial: PartialAddress) -> Option<SchoolSummary> {
    let id = fields::text(school, "schoolid")?;
    let name = fields::text(school, "schoolName")?;
    let location = match school_location(school) {
        Group::Complete(location) => Some(location),
        Group::Absent => None,
        Group::Partial if partial == PartialAddress::Omit => {
            warn!(school_id = %id, "School has a partial address; omitting it");
            None
        }
        Group::Partial => return None,
    };

    Some(SchoolSummary {
        id,
        name,
        location,
        district_id: fields::object(school, "district")
            .and_then(|district| fields::text(district, "districtID")),
        level: school_level(school),
        rank: latest_rank(school).and_then(|snapshot| snapshot.rank),
    })
}

fn school_list(raw: &Value) -> Result<SchoolList> {
    let envelope = root(raw)?;
    let records = records(envelope, "schoolList")?;
    let schools: Vec<SchoolSummary> = records
        .iter()
        .filter_map(|school| school_summary(school, PartialAddress::Drop))
        .collect();
    log_dropped("schoolList", records.len(), schools.len());

    Ok(SchoolList {
        total: fields::count(envelope, "numberOfSchools")
            .map(u64::from)
            .unwrap_or(schools.len() as u64),
        page_count: fields::count(envelope, "numberOfPages").unwrap_or(0),
        schools,
    })
}

fn ranked_list(raw: &Value) -> Result<RankedList> {
    let envelope = root(raw)?;
    let records = records(envelope, "schoolList")?;
    let mut entries: Vec<RankedListEntry> = records
        .iter()
        .filter_map(|school| {
            let summary = school_summary(school, PartialAddress::Drop)?;
            let snapshot = latest_rank(school)?;
            Some(RankedListEntry {
                rank: snapshot.rank?,
                rank_of: snapshot.rank_of?,
                school: summary,
            })
        })
        .collect();
    log_dropped("schoolList", records.len(), entries.len());

    entries.sort_by_key(|entry| entry.rank);
    Ok(RankedList { entries })
}

fn school_detail(raw: &Value) -> Result<Normalized> {
    let school = root(raw)?;
    let Some(summary) = school_summary(school, PartialAddress::Omit) else {
        return Ok(Normalized::NotFound(
            "school record has no id or name".to_string(),
        ));
    };

    // Coordinates belong to the address: a dropped address takes them along,
    // and a lone latitude or longitude is discarded.
    let coordinates = fields::object(school, "address")
        .filter(|_| summary.location.is_some())
        .and_then(|a| fields::object(a, "latLong"))
        .and_then(|ll| {
            Group::collect(
                [fields::number(ll, "latitude"), fields::number(ll, "longitude")],
                |[lat, lon]| (lat, lon),
            )
            .complete()
        });
    let latest_year = fields::latest(school, "schoolYearlyDetails");
    let current_rank = latest_rank(school);

    let test_scores = fields::objects(school, "testScores")
        .filter_map(|score| {
            Some(TestScore {
                test: fields::text(score, "test")?,
                subject: fields::text(score, "subject")?,
                year: fields::count(score, "year"),
                grade: fields::text(score, "grade"),
                school_percent_met: fields::object(score, "schoolTestScore")
                    .and_then(|s| fields::number(s, "percentMetStandard")),
                state_percent_met: fields::object(score, "stateTestScore")
                    .and_then(|s| fields::number(s, "percentMetStandard")),
            })
        })
        .collect();

    Ok(Normalized::School(Box::new(SchoolDetail {
        summary,
        phone: fields::text(school, "phone"),
        website: fields::text(school, "url"),
        low_grade: fields::text(school, "lowGrade"),
        high_grade: fields::text(school, "highGrade"),
        district_name: fields::object(school, "district")
            .and_then(|d| fields::text(d, "districtName")),
        county: fields::object(school, "county").and_then(|c| fields::text(c, "countyName")),
        latitude: coordinates.map(|(lat, _)| lat),
        longitude: coordinates.map(|(_, lon)| lon),
        is_charter: fields::flag(school, "isCharterSchool"),
        is_magnet: fields::flag(school, "isMagnetSchool"),
        is_virtual: fields::flag(school, "isVirtualSchool"),
        is_title_i: fields::flag(school, "isTitleISchool"),
        is_private: fields::flag(school, "isPrivate"),
        enrollment: latest_year.and_then(|y| fields::count(y, "numberOfStudents")),
        pupil_teacher_ratio: latest_year.and_then(|y| fields::number(y, "pupilTeacherRatio")),
        rank_of: current_rank.as_ref().and_then(|r| r.rank_of),
        rank_stars: current_rank.as_ref().and_then(|r| r.rank_stars),
        rank_history: rank_history(school),
        test_scores,
    })))
}

fn school_matches(raw: &Value) -> Result<SchoolMatches> {
    let envelope = root(raw)?;
    let records = records(envelope, "schoolMatches")?;
    let matches: Vec<SchoolMatch> = records
        .iter()
        .filter_map(|m| {
            Some(SchoolMatch {
                id: fields::text(m, "schoolid")?,
                name: fields::text(m, "schoolName")?,
                city: fields::text(m, "city"),
                state: fields::text(m, "state"),
                zip: fields::text(m, "zip"),
                level: school_level(m),
                rank: fields::rank(m, "rank"),
                rank_of: fields::rank(m, "rankOf"),
            })
        })
        .collect();
    log_dropped("schoolMatches", records.len(), matches.len());
    Ok(SchoolMatches { matches })
}

// ============================================================================
// Districts
// ============================================================================

fn district_locality(district: &Object) -> Group<Locality> {
    let Some(address) = fields::object(district, "address") else {
        return Group::Absent;
    };
    Group::collect(
        [fields::text(address, "city"), fields::text(address, "state")],
        |[city, state]| Locality { city, state },
    )
}

fn district_summary(district: &Object, partial: PartialAddress) -> Option<DistrictSummary> {
    let id = fields::text(district, "districtID")?;
    let name = fields::text(district, "districtName")?;
    let locality = match district_locality(district) {
        Group::Complete(locality) => Some(locality),
        Group::Absent => None,
        Group::Partial if partial == PartialAddress::Omit => {
            warn!(district_id = %id, "District has a partial address; omitting it");
            None
        }
        Group::Partial => return None,
    };

    Some(DistrictSummary {
        id,
        name,
        locality,
        school_count: fields::count(district, "numberTotalSchools"),
        rank: latest_rank(district).and_then(|snapshot| snapshot.rank),
    })
}

fn district_list(raw: &Value) -> Result<DistrictList> {
    let envelope = root(raw)?;
    let records = records(envelope, "districtList")?;
    let districts: Vec<DistrictSummary> = records
        .iter()
        .filter_map(|district| district_summary(district, PartialAddress::Drop))
        .collect();
    log_dropped("districtList", records.len(), districts.len());

    Ok(DistrictList {
        total: fields::count(envelope, "numberOfDistricts")
            .map(u64::from)
            .unwrap_or(districts.len() as u64),
        page_count: fields::count(envelope, "numberOfPages").unwrap_or(0),
        districts,
    })
}

fn district_detail(raw: &Value) -> Result<Normalized> {
    let district = root(raw)?;
    let Some(summary) = district_summary(district, PartialAddress::Omit) else {
        return Ok(Normalized::NotFound(
            "district record has no id or name".to_string(),
        ));
    };

    let address = fields::object(district, "address");
    let latest_year = fields::latest(district, "districtYearlyDetails");
    // Street and zip only make sense next to a city/state pair.
    let has_locality = summary.locality.is_some();

    Ok(Normalized::District(Box::new(DistrictDetail {
        street: address
            .filter(|_| has_locality)
            .and_then(|a| fields::text(a, "street")),
        zip: address
            .filter(|_| has_locality)
            .and_then(|a| fields::text(a, "zip")),
        phone: fields::text(district, "phone"),
        website: fields::text(district, "url"),
        county: fields::object(district, "county").and_then(|c| fields::text(c, "countyName")),
        low_grade: fields::text(district, "lowGrade"),
        high_grade: fields::text(district, "highGrade"),
        enrollment: latest_year.and_then(|y| fields::count(y, "numberOfStudents")),
        elementary_schools: fields::count(district, "numberPrimarySchools"),
        middle_schools: fields::count(district, "numberMiddleSchools"),
        high_schools: fields::count(district, "numberHighSchools"),
        alternative_schools: fields::count(district, "numberAlternativeSchools"),
        rank_of: latest_rank(district).and_then(|r| r.rank_of),
        rank_history: rank_history(district),
        summary,
    })))
}
