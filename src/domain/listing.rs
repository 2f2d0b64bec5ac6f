// src/domain/listing.rs

use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::errors::ServerError;

/// Prices above this are rejected as typos rather than stored.
const MAX_PRICE: f64 = 1.0e12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Rent,
    Sell,
    Farm,
}

impl ListingType {
    pub const ALL: [ListingType; 3] = [ListingType::Rent, ListingType::Sell, ListingType::Farm];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Rent => "rent",
            ListingType::Sell => "sell",
            ListingType::Farm => "farm",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ServerError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "rent" => Ok(ListingType::Rent),
            "sell" => Ok(ListingType::Sell),
            "farm" => Ok(ListingType::Farm),
            other => Err(ServerError::BadRequest(format!(
                "invalid property_type '{other}' (expected rent, sell or farm)"
            ))),
        }
    }

    /// Marker / badge colour used by the dashboard.
    pub fn color(&self) -> &'static str {
        match self {
            ListingType::Rent => "#007bff",
            ListingType::Sell => "#dc3545",
            ListingType::Farm => "#ffc107",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for ListingType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ListingType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;
        ListingType::parse(raw).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// A listing position relative to the full block image, `x` across the width
/// and `y` down the height. Expected in [0,1] but not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCoordinates {
    x: f64,
    y: f64,
}

impl Coordinates {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Parse the `{"x":…,"y":…}` string sent with the upload form.
    /// Anything other than exactly two finite numbers is a validation error.
    pub fn parse_json(raw: &str) -> Result<Self, ServerError> {
        let invalid = |e: serde_json::Error| ServerError::BadRequest(format!("invalid coordinates: {e}"));

        // derived visitors also take `[x, y]`; only an object is accepted here
        let value: Value = serde_json::from_str(raw.trim()).map_err(invalid)?;
        if !value.is_object() {
            return Err(ServerError::BadRequest(
                "invalid coordinates: expected an object with x and y".into(),
            ));
        }
        let parsed: RawCoordinates = serde_json::from_value(value).map_err(invalid)?;

        if !parsed.x.is_finite() || !parsed.y.is_finite() {
            return Err(ServerError::BadRequest(
                "invalid coordinates: values must be finite".into(),
            ));
        }
        Ok(Self::new(parsed.x, parsed.y))
    }

    pub fn to_json(&self) -> String {
        serde_json::json!({ "x": self.x, "y": self.y }).to_string()
    }

    /// True when the point lies on the image itself.
    pub fn in_image(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// Block names double as image file names (`images/{block}.jpg`).
pub fn validate_block_name(raw: &str) -> Result<String, ServerError> {
    let block = raw.trim();
    if block.is_empty() {
        return Err(ServerError::BadRequest("block_name is required".into()));
    }
    if block.len() > 64
        || !block
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ServerError::BadRequest(format!(
            "invalid block_name '{block}'"
        )));
    }
    Ok(block.to_string())
}

/// A listing as returned to clients: the row joined with its poster.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub id: i64,
    pub user_id: i64,
    pub block_name: String,
    pub property_type: ListingType,
    pub coordinates: Coordinates,
    pub measures: String,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub kitchens: i64,
    pub description: String,
    pub price: f64,
    pub video_path: Option<String>,
    pub created_at: NaiveDateTime,
    pub fullname: String,
    pub user_photo: Option<String>,
}

/// Validated input for a new listing.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub user_id: i64,
    pub block_name: String,
    pub property_type: ListingType,
    pub coordinates: Coordinates,
    pub measures: String,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub kitchens: i64,
    pub description: String,
    pub price: f64,
    pub video_path: Option<String>,
}

impl NewListing {
    /// Builds a listing from the text fields of the upload form.
    /// `field` looks a form value up by name.
    pub fn from_fields<'a, F>(
        user_id: i64,
        field: F,
        video_path: Option<String>,
    ) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let required = |name: &str| -> Result<&'a str, ServerError> {
            field(name)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ServerError::BadRequest(format!("{name} is required")))
        };

        let block_name = validate_block_name(required("block_name")?)?;
        let property_type = ListingType::parse(required("property_type")?)?;
        let coordinates = Coordinates::parse_json(required("coordinates")?)?;

        let bedrooms = parse_count("bedrooms", required("bedrooms")?)?;
        let bathrooms = parse_count("bathrooms", required("bathrooms")?)?;
        let kitchens = parse_count("kitchens", required("kitchens")?)?;
        let price = parse_price(required("price")?)?;

        Ok(Self {
            user_id,
            block_name,
            property_type,
            coordinates,
            measures: field("measures").unwrap_or("").trim().to_string(),
            bedrooms,
            bathrooms,
            kitchens,
            description: field("description").unwrap_or("").trim().to_string(),
            price,
            video_path,
        })
    }
}

fn parse_count(name: &str, raw: &str) -> Result<i64, ServerError> {
    match raw.parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(ServerError::BadRequest(format!(
            "{name} must be a non-negative whole number"
        ))),
    }
}

fn parse_price(raw: &str) -> Result<f64, ServerError> {
    match raw.replace(',', "").parse::<f64>() {
        Ok(p) if p.is_finite() && (0.0..=MAX_PRICE).contains(&p) => Ok(p),
        _ => Err(ServerError::BadRequest("price must be a non-negative number".into())),
    }
}

/// Optional filters for the listing query, combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub block: Option<String>,
    pub kind: Option<ListingType>,
}

/// Counts shown in the dashboard header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingStats {
    pub total: usize,
    pub rent: usize,
    pub sell: usize,
    pub farm: usize,
}

impl ListingStats {
    pub fn from_listings(listings: &[Listing]) -> Self {
        listings.iter().fold(Self::default(), |mut acc, l| {
            acc.total += 1;
            match l.property_type {
                ListingType::Rent => acc.rent += 1,
                ListingType::Sell => acc.sell += 1,
                ListingType::Farm => acc.farm += 1,
            }
            acc
        })
    }
}
