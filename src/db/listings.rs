use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use tracing::debug;

use crate::domain::{Coordinates, Listing, ListingFilter, NewListing};
use crate::errors::ServerError;

/// Most rows the filtered listing endpoint returns.
pub const LIST_LIMIT: usize = 20;
/// Most rows the "recent" endpoint returns.
pub const RECENT_LIMIT: usize = 10;

const SELECT_LISTING: &str = r#"
    SELECT
        p.id, p.user_id, p.block_name, p.property_type, p.coord_x, p.coord_y,
        p.measures, p.bedrooms, p.bathrooms, p.kitchens, p.description,
        p.price, p.video_path, p.created_at, u.fullname, u.photo
    FROM properties p
    JOIN users u ON p.user_id = u.id
"#;

fn map_listing(row: &Row<'_>) -> rusqlite::Result<Listing> {
    Ok(Listing {
        id: row.get(0)?,
        user_id: row.get(1)?,
        block_name: row.get(2)?,
        property_type: row.get(3)?,
        coordinates: Coordinates::new(row.get(4)?, row.get(5)?),
        measures: row.get(6)?,
        bedrooms: row.get(7)?,
        bathrooms: row.get(8)?,
        kitchens: row.get(9)?,
        description: row.get(10)?,
        price: row.get(11)?,
        video_path: row.get(12)?,
        created_at: row.get(13)?,
        fullname: row.get(14)?,
        user_photo: row.get(15)?,
    })
}

/// Inserts a listing and returns its id. A `user_id` with no matching user
/// fails with the store's foreign-key message.
pub fn insert_listing(conn: &Connection, listing: &NewListing) -> Result<i64, ServerError> {
    conn.execute(
        r#"
        INSERT INTO properties (
            user_id, block_name, property_type, coord_x, coord_y, measures,
            bedrooms, bathrooms, kitchens, description, price, video_path, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
        params![
            listing.user_id,
            &listing.block_name,
            listing.property_type,
            listing.coordinates.x,
            listing.coordinates.y,
            &listing.measures,
            listing.bedrooms,
            listing.bathrooms,
            listing.kitchens,
            &listing.description,
            listing.price,
            &listing.video_path,
            Utc::now().naive_utc(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Newest-first listings matching every filter that is set.
pub fn list_listings(
    conn: &Connection,
    filter: &ListingFilter,
    limit: usize,
) -> Result<Vec<Listing>, ServerError> {
    let limit = limit as i64;
    let mut sql = format!("{SELECT_LISTING} WHERE 1=1");
    let mut args: Vec<&dyn ToSql> = Vec::new();

    if let Some(block) = &filter.block {
        sql.push_str(" AND p.block_name = ?");
        args.push(block);
    }
    if let Some(kind) = &filter.kind {
        sql.push_str(" AND p.property_type = ?");
        args.push(kind);
    }

    sql.push_str(" ORDER BY p.created_at DESC, p.id DESC LIMIT ?");
    args.push(&limit);

    debug!(?filter, limit, "listing query");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(args.as_slice(), map_listing)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn recent_listings(conn: &Connection) -> Result<Vec<Listing>, ServerError> {
    list_listings(conn, &ListingFilter::default(), RECENT_LIMIT)
}

pub fn find_listing(conn: &Connection, id: i64) -> Result<Option<Listing>, ServerError> {
    let sql = format!("{SELECT_LISTING} WHERE p.id = ?");
    let listing = conn
        .query_row(&sql, params![id], map_listing)
        .optional()?;
    Ok(listing)
}

/// Deletes a listing on behalf of `user_id`.
///
/// The ownership check and the delete are two statements without a
/// transaction; the delete is still keyed on the owner so a concurrent change
/// of hands can never remove someone else's row. Returns the stored video
/// file name, if any, so the caller can clean it up.
pub fn delete_owned_listing(
    conn: &Connection,
    id: i64,
    user_id: i64,
) -> Result<Option<String>, ServerError> {
    let row: Option<(i64, Option<String>)> = conn
        .query_row(
            "SELECT user_id, video_path FROM properties WHERE id = ?",
            params![id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;

    let Some((owner_id, video_path)) = row else {
        return Err(ServerError::NotFound("Property not found".into()));
    };

    if owner_id != user_id {
        return Err(ServerError::Forbidden(
            "You can only delete your own properties".into(),
        ));
    }

    let deleted = conn.execute(
        "DELETE FROM properties WHERE id = ? AND user_id = ?",
        params![id, user_id],
    )?;

    if deleted == 0 {
        return Err(ServerError::NotFound("Property not found".into()));
    }
    Ok(video_path)
}
