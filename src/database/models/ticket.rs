use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

use crate::filter::{FilterOp, FilterWhereInfo, SqlParam};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: i64,
    pub user_id: i64,
    pub ticket_status_id: i64,
    pub vendor_id: Option<String>,
    pub client_id: Option<String>,
    pub influencer: Option<String>,
    pub campaign_name: Option<String>,
    pub live_date: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Ticket {
    pub const TABLE: &'static str = "tickets";

    /// Business columns stored verbatim and filtered by substring
    pub const LIKE_FILTER_FIELDS: [&'static str; 5] = [
        "vendor_id",
        "client_id",
        "influencer",
        "campaign_name",
        "live_date",
    ];

    /// Listing scope built from query parameters.
    ///
    /// Every recognised, non-blank parameter adds one condition; the caller
    /// ANDs them. Values that cannot be read as the column's type produce a
    /// condition that matches nothing instead of an error.
    pub fn scope_filter(params: &HashMap<String, String>) -> Vec<FilterWhereInfo> {
        let present = |key: &str| params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());
        let mut conditions = Vec::new();

        if let Some(v) = present("id") {
            conditions.push(int_eq("id", v));
        }
        if let Some(v) = present("ids") {
            let ids = v
                .split(',')
                .filter_map(|s| s.trim().parse::<i64>().ok())
                .map(SqlParam::Int)
                .collect();
            conditions.push(FilterWhereInfo::any_of("id", ids));
        }
        if let Some(v) = present("user_id") {
            conditions.push(int_eq("user_id", v));
        }
        if let Some(v) = present("ticket_status_id") {
            conditions.push(int_eq("ticket_status_id", v));
        }
        if let Some(v) = present("from") {
            conditions.push(created_at_bound(FilterOp::Gte, v));
        }
        if let Some(v) = present("to") {
            conditions.push(created_at_bound(FilterOp::Lte, v));
        }
        for field in Self::LIKE_FILTER_FIELDS {
            if let Some(v) = present(field) {
                let pattern = format!("%{}%", escape_like(v));
                conditions.push(FilterWhereInfo::new(field, FilterOp::ILike, SqlParam::Text(Some(pattern))));
            }
        }

        conditions
    }
}

fn int_eq(column: &str, value: &str) -> FilterWhereInfo {
    match value.parse::<i64>() {
        Ok(id) => FilterWhereInfo::new(column, FilterOp::Eq, SqlParam::Int(id)),
        Err(_) => FilterWhereInfo::never(column),
    }
}

fn created_at_bound(op: FilterOp, value: &str) -> FilterWhereInfo {
    match parse_timestamp(value) {
        Some(ts) => FilterWhereInfo::new("created_at", op, SqlParam::Timestamp(ts)),
        None => FilterWhereInfo::never("created_at"),
    }
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS]`, the `T`-separated forms and RFC 3339.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 5] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for format in FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.naive_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
