//! Decoding of raw API payloads into typed models.
//!
//! List resources (search results, credits) fall back to a salvage pass when
//! strict validation fails: malformed entries are dropped and the rest kept.
//! Single-object resources are all-or-nothing.

use crate::error::{ApiError, ApiResult};
use crate::schema::{self, Schema};
use crate::validate::validate;
use marquee_models::{CastMember, Credits, CrewMember, MovieSummary, Page};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Decode a search response, salvaging valid movies from a partially broken page.
///
/// Paging numbers are copied from the payload when they are well-formed
/// non-negative integers and otherwise defaulted (`page = 1`, `total_pages = 1`,
/// `total_results` = number of survivors). Defaulted totals may disagree with
/// the real listing size; that is accepted.
pub fn decode_search_results(raw: &Value) -> ApiResult<Page<MovieSummary>> {
    let mismatch = match validate::<Page<MovieSummary>>(schema::movie_list(), raw) {
        Ok(page) => return Ok(page),
        Err(mismatch) => mismatch,
    };

    let results = match raw.get("results") {
        Some(Value::Array(results)) => results,
        Some(_) => {
            return Err(ApiError::UnrecoverableSchemaMismatch {
                reason: "`results` is not an array".to_string(),
            })
        }
        None => {
            return Err(ApiError::UnrecoverableSchemaMismatch {
                reason: "`results` is missing".to_string(),
            })
        }
    };

    let survivors = salvage(results, schema::movie_summary());
    let dropped = results.len() - survivors.len();
    warn!(
        "Search response failed validation ({}); kept {} of {} results, dropped {}",
        mismatch,
        survivors.len(),
        results.len(),
        dropped
    );

    let total_results = raw
        .get("total_results")
        .and_then(Value::as_u64)
        .unwrap_or(survivors.len() as u64);

    Ok(Page {
        page: paging_number(raw, "page").unwrap_or(1),
        total_pages: paging_number(raw, "total_pages").unwrap_or(1),
        total_results,
        results: survivors,
        recovered: true,
    })
}

/// Decode a credits response. Never fails.
///
/// The salvage pass keeps any cast or crew entry with a numeric `id` and a
/// string `name`; other fields default when missing or mistyped. A missing or
/// non-array `cast`/`crew` becomes an empty list.
pub fn decode_credits(raw: &Value) -> Credits {
    let mismatch = match validate::<Credits>(schema::credits(), raw) {
        Ok(credits) => return credits,
        Err(mismatch) => mismatch,
    };

    let cast: Vec<CastMember> = entries(raw, "cast").filter_map(loose_cast_member).collect();
    let crew: Vec<CrewMember> = entries(raw, "crew").filter_map(loose_crew_member).collect();

    warn!(
        "Credits response failed validation ({}); kept {} of {} cast and {} of {} crew",
        mismatch,
        cast.len(),
        entries(raw, "cast").count(),
        crew.len(),
        entries(raw, "crew").count()
    );

    Credits { cast, crew, recovered: true }
}

/// Strict decode with no salvage path, for single-object resources
pub fn decode_strict<T: DeserializeOwned>(schema: &Schema, raw: &Value) -> ApiResult<T> {
    validate(schema, raw).map_err(ApiError::from)
}

fn salvage<T: DeserializeOwned>(items: &[Value], schema: &Schema) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match validate::<T>(schema, item) {
            Ok(value) => Some(value),
            Err(mismatch) => {
                debug!("Dropping entry {}: {}", index, mismatch);
                None
            }
        })
        .collect()
}

fn paging_number(raw: &Value, key: &str) -> Option<u32> {
    raw.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

fn entries<'a>(raw: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    raw.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}

fn identity(entry: &Value) -> Option<(u64, String)> {
    let id = entry.get("id").and_then(Value::as_u64)?;
    let name = entry.get("name").and_then(Value::as_str)?;
    Some((id, name.to_string()))
}

fn text(entry: &Value, key: &str) -> String {
    entry.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn optional_text(entry: &Value, key: &str) -> Option<String> {
    entry.get(key).and_then(Value::as_str).map(str::to_string)
}

fn loose_cast_member(entry: &Value) -> Option<CastMember> {
    let (id, name) = identity(entry)?;
    Some(CastMember {
        id,
        name,
        character: text(entry, "character"),
        profile_path: optional_text(entry, "profile_path"),
        // Unbilled entries sort after every billed one
        order: entry
            .get("order")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(u32::MAX),
    })
}

fn loose_crew_member(entry: &Value) -> Option<CrewMember> {
    let (id, name) = identity(entry)?;
    Some(CrewMember {
        id,
        name,
        job: text(entry, "job"),
        department: text(entry, "department"),
        profile_path: optional_text(entry, "profile_path"),
    })
}
