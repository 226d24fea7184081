//! Item assignment data service
//!
//! Reads item-to-default-customer assignments from the integration API and
//! maps them into the flat records the assignments table shows.

use crate::error::{DpwError, Result};
use crate::table_search::Record;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use tracing::{debug, info};

pub const ITEM_ASSIGNMENT_PATH: &str = "/Integration/DPW/ItemDefaultCustomer/Get";

/// Rows requested in the single page the service asks for. Anything beyond
/// it is not fetched.
pub const FETCH_PAGE_SIZE: u32 = 1000;

pub const INVALID_DATE: &str = "Invalid Date";

/// Fields the global search box looks at
pub const SEARCHABLE_FIELDS: &[&str] = &["itemName", "itemId", "customerGroup"];

/// Table columns as (field, header)
pub const TABLE_COLUMNS: &[(&str, &str)] = &[
    ("itemId", "ITEM ID"),
    ("itemName", "ITEM NAME"),
    ("customerGroup", "CUSTOMER GROUP"),
    ("assignedDate", "ASSIGNED DATE"),
    ("lastModifiedBy", "LAST MODIFIED BY"),
];

pub fn is_table_column(field: &str) -> bool {
    TABLE_COLUMNS.iter().any(|(f, _)| *f == field)
}

/// Missing or `null` strings read as empty
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw record as served by the API. One sparse row must not fail the page,
/// so every field tolerates `null` or absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiItemDefaultCustomer {
    #[serde(rename = "ItemNumber", default, deserialize_with = "null_as_empty")]
    pub item_number: String,
    #[serde(rename = "DefaultCustomerNumber", default, deserialize_with = "null_as_empty")]
    pub default_customer_number: String,
    /// Last change timestamp
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dtea: String,
    /// Last change user
    #[serde(default, deserialize_with = "null_as_empty")]
    pub usra: String,
}

/// Paginated API envelope. Only `Items` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub page_number: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub has_previous_page: bool,
    #[serde(default)]
    pub has_next_page: bool,
}

/// Table row for one assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAssignment {
    pub key: String,
    pub item_id: String,
    /// Placeholder until the API serves item names
    pub item_name: String,
    pub customer_group: String,
    pub assigned_date: String,
    pub last_modified_by: String,
    #[serde(skip)]
    pub assigned_at: Option<DateTime<Utc>>,
}

impl ItemAssignment {
    pub fn from_api(raw: &ApiItemDefaultCustomer) -> Self {
        let assigned_at = parse_timestamp(&raw.dtea);
        Self {
            key: format!("{}-{}-{}", raw.item_number, raw.default_customer_number, raw.dtea),
            item_id: raw.item_number.clone(),
            item_name: format!("Item Name for {}", raw.item_number),
            customer_group: format!("{} - CUST_NAME", raw.default_customer_number),
            assigned_date: assigned_at
                .map(|at| format_timestamp(&at, &Local))
                .unwrap_or_else(|| INVALID_DATE.to_string()),
            last_modified_by: raw.usra.clone(),
            assigned_at,
        }
    }
}

impl Record for ItemAssignment {
    fn field(&self, field: &str) -> Option<Cow<'_, str>> {
        let value = match field {
            "key" => &self.key,
            "itemId" => &self.item_id,
            "itemName" => &self.item_name,
            "customerGroup" => &self.customer_group,
            "assignedDate" => &self.assigned_date,
            "lastModifiedBy" => &self.last_modified_by,
            _ => return None,
        };
        Some(Cow::Borrowed(value.as_str()))
    }

    fn compare_field(&self, other: &Self, field: &str) -> Ordering {
        if field == "assignedDate" {
            return self.assigned_at.cmp(&other.assigned_at);
        }
        let a = self.field(field).map(|v| v.to_lowercase());
        let b = other.field(field).map(|v| v.to_lowercase());
        a.cmp(&b)
    }
}

/// Parse an API timestamp. Values without an offset are local time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `1/1/2024, 12:00:00 AM` in the given zone
pub fn format_timestamp<Tz>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Client for the item assignment endpoint
#[derive(Clone)]
pub struct ItemAssignmentService {
    http: reqwest::Client,
    endpoint: String,
}

impl ItemAssignmentService {
    pub fn new(http: reqwest::Client, api_base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}{}", api_base_url.trim_end_matches('/'), ITEM_ASSIGNMENT_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the first (and only) page of raw records.
    pub async fn fetch_page(&self) -> Result<PagedResponse<ApiItemDefaultCustomer>> {
        debug!(endpoint = %self.endpoint, page_size = FETCH_PAGE_SIZE, "Fetching item assignments");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("entity.pageSize", FETCH_PAGE_SIZE.to_string())])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| DpwError::network(&self.endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DpwError::Http { status });
        }

        response
            .json::<PagedResponse<ApiItemDefaultCustomer>>()
            .await
            .map_err(|e| DpwError::decode(&self.endpoint, e))
    }

    /// Fetch and map all assignments the single page holds.
    pub async fn fetch_all(&self) -> Result<Vec<ItemAssignment>> {
        let page = self.fetch_page().await?;

        if page.has_next_page {
            debug!(
                total = page.total_count,
                fetched = page.items.len(),
                "More assignments exist than one page holds; the rest are not fetched"
            );
        }

        let rows: Vec<ItemAssignment> = page.items.iter().map(ItemAssignment::from_api).collect();
        info!(count = rows.len(), "Item assignments loaded");
        Ok(rows)
    }
}
