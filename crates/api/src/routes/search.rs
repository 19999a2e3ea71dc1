//! Search route handler.
//!
//! The endpoint validates and maps query parameters, then delegates entirely
//! to the hosted search service. No database access happens here.

use axum::{Json, extract::State};
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use tracing::instrument;

use quadmarket_core::{ItemCondition, ListingKind};

use crate::error::{AppError, Result};
use crate::services::SearchRequest;
use crate::state::AppState;

/// Queries shorter than this are rejected before reaching the service.
pub const MIN_QUERY_CHARS: usize = 2;

/// Default hit cap when the caller does not ask for one.
pub const DEFAULT_LIMIT: u32 = 40;

/// Raw query parameters as they arrive on the wire.
///
/// Everything is optional and string-typed at the edge; validation turns this
/// into a [`SearchRequest`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub min_price: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub max_price: Option<f64>,
    pub category: Option<String>,
    pub condition: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub max_turnaround_days: Option<u32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub limit: Option<u32>,
}

/// Treat `?key=` the same as an absent key.
fn empty_string_as_none<'de, D, T>(de: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Full-text search over listings.
///
/// GET /search
///
/// # Errors
///
/// 400 for a too-short query or invalid filters, 502 if the service fails.
#[instrument(skip(state), fields(q = %params.q))]
pub async fn search(
    State(state): State<AppState>,
    axum::extract::Query(params): axum::extract::Query<SearchParams>,
) -> Result<Json<Value>> {
    let request = build_request(params).map_err(AppError::BadRequest)?;
    let results = state.search().search(&request).await?;

    Ok(Json(json!({ "results": results })))
}

/// Validate raw parameters into a service request.
pub fn build_request(params: SearchParams) -> std::result::Result<SearchRequest, String> {
    let q = params.q.trim().to_owned();
    if q.chars().count() < MIN_QUERY_CHARS {
        return Err(format!(
            "Query must be at least {MIN_QUERY_CHARS} characters"
        ));
    }

    let condition = params
        .condition
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|raw| {
            raw.parse::<ItemCondition>()
                .map_err(|_| format!("Invalid condition: {raw}"))
        })
        .transpose()?;

    let kind = params
        .kind
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|raw| {
            raw.parse::<ListingKind>()
                .map_err(|_| "Invalid item type".to_owned())
        })
        .transpose()?;

    if let (Some(min), Some(max)) = (params.min_price, params.max_price)
        && min > max
    {
        return Err("minPrice cannot exceed maxPrice".to_owned());
    }

    Ok(SearchRequest {
        q,
        min_price: params.min_price,
        max_price: params.max_price,
        category: params.category.filter(|s| !s.is_empty()),
        condition,
        max_turnaround_days: params.max_turnaround_days,
        kind,
        limit: params.limit.unwrap_or(DEFAULT_LIMIT),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params(q: &str) -> SearchParams {
        SearchParams {
            q: q.to_owned(),
            ..SearchParams::default()
        }
    }

    #[test]
    fn test_short_query_rejected() {
        for q in ["", "a", " a ", "  "] {
            assert_eq!(
                build_request(params(q)).unwrap_err(),
                "Query must be at least 2 characters",
                "q: {q:?}"
            );
        }
    }

    #[test]
    fn test_two_chars_after_trim_is_enough() {
        let request = build_request(params("  ab  ")).unwrap();
        assert_eq!(request.q, "ab");
        assert_eq!(request.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_filters_pass_through() {
        let request = build_request(SearchParams {
            q: "lamp".to_owned(),
            min_price: Some(5.0),
            max_price: Some(50.0),
            category: Some("Furniture".to_owned()),
            condition: Some("Like New".to_owned()),
            kind: Some("marketplace".to_owned()),
            limit: Some(10),
            ..SearchParams::default()
        })
        .unwrap();
        assert_eq!(request.condition, Some(ItemCondition::LikeNew));
        assert_eq!(request.kind, Some(ListingKind::Marketplace));
        assert_eq!(request.limit, 10);
    }

    #[test]
    fn test_invalid_condition_rejected() {
        let mut p = params("lamp");
        p.condition = Some("Mint".to_owned());
        assert_eq!(build_request(p).unwrap_err(), "Invalid condition: Mint");
    }

    #[test]
    fn test_invalid_kind_rejected() {
        let mut p = params("lamp");
        p.kind = Some("sublet".to_owned());
        assert_eq!(build_request(p).unwrap_err(), "Invalid item type");
    }

    #[test]
    fn test_inverted_price_range_rejected() {
        let mut p = params("lamp");
        p.min_price = Some(50.0);
        p.max_price = Some(5.0);
        assert_eq!(
            build_request(p).unwrap_err(),
            "minPrice cannot exceed maxPrice"
        );
    }

    #[test]
    fn test_empty_strings_mean_absent() {
        let p: SearchParams =
            serde_urlencoded::from_str("q=lamp&minPrice=&condition=&type=&limit=").unwrap();
        let request = build_request(p).unwrap();
        assert!(request.min_price.is_none());
        assert!(request.condition.is_none());
        assert!(request.kind.is_none());
        assert_eq!(request.limit, DEFAULT_LIMIT);
    }
}
