//! PostgreSQL fact retrieval
//!
//! Reads the externally-owned mall schema (shops, operating hours,
//! promotions, directory) and synthesizes one human-readable
//! `FactDocument` per joined row. The service never writes to this schema.

use async_trait::async_trait;
use chrono::NaiveTime;
use sqlx::{Connection, FromRow, PgConnection};

use crate::{AssistError, FactDocument, Result};

/// Source of retrievable mall facts.
#[async_trait]
pub trait FactSource: Send + Sync {
    /// Fetch up to `limit` fact documents.
    async fn fetch_documents(&self, limit: i64) -> Result<Vec<FactDocument>>;
}

/// PostgreSQL-backed fact source.
///
/// The store itself is process-scoped and injected into the pipeline; the
/// actual connection is opened and closed inside each call, bounding its
/// lifetime to the request.
pub struct FactStore {
    database_url: String,
}

impl FactStore {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }
}

/// One row of the shop/hours/promotion/directory join.
///
/// Everything past the shop columns comes from a LEFT JOIN and can be NULL.
#[derive(Debug, FromRow)]
struct StoreFactRow {
    shop_name: String,
    category: String,
    floor: Option<i32>,
    day_of_week: Option<String>,
    open_time: Option<NaiveTime>,
    close_time: Option<NaiveTime>,
    is_closed: Option<bool>,
    offer: Option<String>,
}

#[async_trait]
impl FactSource for FactStore {
    async fn fetch_documents(&self, limit: i64) -> Result<Vec<FactDocument>> {
        let mut conn = PgConnection::connect(&self.database_url)
            .await
            .map_err(|e| AssistError::DataSource(format!("PostgreSQL connection failed: {e}")))?;

        let rows: Vec<StoreFactRow> = sqlx::query_as(
            r#"
            SELECT
                s.shop_name,
                s.category,
                d.floor,
                h.day_of_week,
                h.open_time,
                h.close_time,
                h.is_closed,
                p.title AS offer
            FROM shops s
            LEFT JOIN store_operating_hours h ON s.shop_id = h.shop_id
            LEFT JOIN store_promotions p ON s.shop_id = p.shop_id
            LEFT JOIN store_directory d ON s.shop_id = d.store_id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&mut conn)
        .await
        .map_err(|e| AssistError::DataSource(format!("fact query failed: {e}")))?;

        conn.close()
            .await
            .map_err(|e| AssistError::DataSource(format!("failed to close connection: {e}")))?;

        tracing::debug!("fetched {} fact rows", rows.len());

        Ok(rows
            .iter()
            .map(|row| FactDocument::new(format_row(row)))
            .collect())
    }
}

/// Render one joined row as a spoken-style fact sentence.
fn format_row(row: &StoreFactRow) -> String {
    let mut text = match row.floor {
        Some(floor) => format!("{} is located on floor {}. ", row.shop_name, floor),
        None => format!("{} has no floor listed in the directory. ", row.shop_name),
    };

    text.push_str(&format!("It belongs to the '{}' category. ", row.category));

    match (
        row.day_of_week.as_deref(),
        row.is_closed,
        row.open_time,
        row.close_time,
    ) {
        (Some(day), Some(true), _, _) => {
            text.push_str(&format!("On {day}, it is closed. "));
        }
        (Some(day), _, Some(open), Some(close)) => {
            text.push_str(&format!(
                "On {day}, it is open from {} to {}. ",
                open.format("%H:%M"),
                close.format("%H:%M"),
            ));
        }
        (Some(day), _, _, _) => {
            text.push_str(&format!("Operating hours for {day} are not listed. "));
        }
        (None, _, _, _) => {
            text.push_str("No operating hours are listed. ");
        }
    }

    text.push_str(&format!(
        "Current offer: {}.",
        row.offer.as_deref().unwrap_or("No current offers")
    ));

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> StoreFactRow {
        StoreFactRow {
            shop_name: "Shop A".to_string(),
            category: "Electronics".to_string(),
            floor: Some(2),
            day_of_week: Some("Monday".to_string()),
            open_time: NaiveTime::from_hms_opt(10, 0, 0),
            close_time: NaiveTime::from_hms_opt(22, 0, 0),
            is_closed: Some(false),
            offer: Some("10% off".to_string()),
        }
    }

    #[test]
    fn test_format_row_open_shop() {
        let text = format_row(&sample_row());
        assert_eq!(
            text,
            "Shop A is located on floor 2. It belongs to the 'Electronics' \
             category. On Monday, it is open from 10:00 to 22:00. \
             Current offer: 10% off."
        );
    }

    #[test]
    fn test_format_row_closed_shop() {
        let row = StoreFactRow {
            is_closed: Some(true),
            ..sample_row()
        };
        let text = format_row(&row);
        assert!(text.contains("On Monday, it is closed."));
        assert!(!text.contains("open from"));
    }

    #[test]
    fn test_format_row_without_promotion() {
        let row = StoreFactRow {
            offer: None,
            ..sample_row()
        };
        assert!(format_row(&row).ends_with("Current offer: No current offers."));
    }

    #[test]
    fn test_format_row_with_missing_joins() {
        let row = StoreFactRow {
            floor: None,
            day_of_week: None,
            open_time: None,
            close_time: None,
            is_closed: None,
            offer: None,
            ..sample_row()
        };
        let text = format_row(&row);
        assert!(text.starts_with("Shop A has no floor listed in the directory."));
        assert!(text.contains("No operating hours are listed."));
    }

    #[test]
    fn test_format_row_day_without_times() {
        let row = StoreFactRow {
            open_time: None,
            close_time: None,
            is_closed: Some(false),
            ..sample_row()
        };
        assert!(format_row(&row).contains("Operating hours for Monday are not listed."));
    }
}
