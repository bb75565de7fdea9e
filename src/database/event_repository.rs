use async_trait::async_trait;
use sqlx::{postgres::PgRow, FromRow, Postgres, Row};

use super::DatabasePool;
use crate::error::StoreError;
use crate::models::{Event, SellMode};
use crate::services::event_store::EventStore;

const UPSERT_EVENT: &str = r#"
    INSERT INTO events (id, name, start_date, end_date, sell_mode, updated_at)
    VALUES ($1, $2, $3, $4, $5, NOW())
    ON CONFLICT (id)
    DO UPDATE SET name = $2, start_date = $3, end_date = $4, sell_mode = $5, updated_at = NOW()
"#;

impl<'r> FromRow<'r, PgRow> for Event {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let sell_mode: String = row.try_get("sell_mode")?;
        let sell_mode = SellMode::from_feed(&sell_mode).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "sell_mode".to_string(),
            source: format!("unknown sell mode {:?}", sell_mode).into(),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            sell_mode,
        })
    }
}

/// Events persisted in the `events` table.
#[derive(Clone)]
pub struct PgEventStore {
    pool: DatabasePool,
}

impl PgEventStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn upsert_query(event: &Event) -> sqlx::query::Query<'_, Postgres, sqlx::postgres::PgArguments> {
        sqlx::query(UPSERT_EVENT)
            .bind(&event.id)
            .bind(&event.name)
            .bind(&event.start_date)
            .bind(&event.end_date)
            .bind(event.sell_mode.as_str())
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn upsert(&self, event: Event) -> Result<(), StoreError> {
        Self::upsert_query(&event).execute(&*self.pool).await?;
        Ok(())
    }

    async fn upsert_many(&self, events: Vec<Event>) -> Result<(), StoreError> {
        // All or nothing: a failed batch rolls back when `tx` is dropped
        let mut tx = self.pool.begin().await?;
        for event in &events {
            Self::upsert_query(event).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn query(&self, starts_at: &str, ends_at: &str) -> Result<Vec<Event>, StoreError> {
        // COLLATE "C" keeps ordering byte-wise, same as Event::is_within
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, name, start_date, end_date, sell_mode
            FROM events
            WHERE start_date COLLATE "C" >= $1 COLLATE "C"
              AND end_date COLLATE "C" <= $2 COLLATE "C"
            "#,
        )
        .bind(starts_at)
        .bind(ends_at)
        .fetch_all(&*self.pool)
        .await?;

        Ok(events)
    }

    async fn len(&self) -> Result<usize, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&*self.pool)
            .await?;
        Ok(count as usize)
    }
}
