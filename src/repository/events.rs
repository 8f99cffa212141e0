//! Events repository

use chrono::Utc;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::EventStatus,
        event::{CreateEvent, Event, EventQuery, UpdateEvent},
    },
};

/// Event columns plus the organizer id set
const EVENT_SELECT: &str = r#"
    SELECT e.*,
        ARRAY(SELECT o.user_id FROM event_organizers o WHERE o.event_id = e.id ORDER BY o.user_id)
            AS organizer_ids
    FROM events e
"#;

#[derive(Clone)]
pub struct EventsRepository {
    pool: Pool<Postgres>,
}

impl EventsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List events with optional status, text and creator filters
    pub async fn list(&self, query: &EventQuery) -> AppResult<Vec<Event>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.status.is_some() {
            conditions.push(format!("e.status = ${}", idx));
            idx += 1;
        }
        if query.search.is_some() {
            conditions.push(format!(
                "(e.title ILIKE ${i} OR e.description ILIKE ${i} OR e.location ILIKE ${i})",
                i = idx
            ));
            idx += 1;
        }
        if query.created_by.is_some() {
            conditions.push(format!("e.created_by = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let select_q = format!("{} {} ORDER BY e.start_date DESC", EVENT_SELECT, where_clause);
        let mut builder = sqlx::query_as::<_, Event>(&select_q);
        if let Some(status) = query.status {
            builder = builder.bind(status);
        }
        if let Some(ref search) = query.search {
            builder = builder.bind(format!("%{}%", search));
        }
        if let Some(created_by) = query.created_by {
            builder = builder.bind(created_by);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Get event by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Event> {
        let query = format!("{} WHERE e.id = $1", EVENT_SELECT);
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
    }

    /// Load an event and lock its row until the surrounding transaction ends
    pub async fn lock(&self, conn: &mut PgConnection, id: i64) -> AppResult<Event> {
        let query = format!("{} WHERE e.id = $1 FOR UPDATE OF e", EVENT_SELECT);
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
    }

    /// Create an event in PENDING state
    pub async fn create(&self, data: &CreateEvent, created_by: i64, organizer_ids: &[i64]) -> AppResult<Event> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO events (
                title, description, location, start_date, end_date, organizer,
                capacity, image, target_audience, speaker, travel_plan, transportation,
                status, registrations, created_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 0, $14)
            RETURNING id
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.location)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(&data.organizer)
        .bind(data.capacity)
        .bind(&data.image)
        .bind(&data.target_audience)
        .bind(&data.speaker)
        .bind(&data.travel_plan)
        .bind(&data.transportation)
        .bind(EventStatus::Pending)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_organizers(&mut tx, id, organizer_ids).await?;
        tx.commit().await?;

        self.get_by_id(id).await
    }

    async fn replace_organizers(conn: &mut PgConnection, event_id: i64, organizer_ids: &[i64]) -> AppResult<()> {
        sqlx::query("DELETE FROM event_organizers WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *conn)
            .await?;
        sqlx::query(
            "INSERT INTO event_organizers (event_id, user_id) SELECT $1, UNNEST($2::BIGINT[]) ON CONFLICT DO NOTHING",
        )
        .bind(event_id)
        .bind(organizer_ids)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Update an event's editable fields, status and rejection reason.
    /// Runs on the caller's connection so it can share the event row lock.
    pub async fn update(
        &self,
        conn: &mut PgConnection,
        id: i64,
        data: &UpdateEvent,
        status: EventStatus,
        rejection_reason: Option<&str>,
        organizer_ids: Option<&[i64]>,
    ) -> AppResult<()> {
        let now = Utc::now();
        let mut sets = vec![
            "updated_at = $1".to_string(),
            "status = $2".to_string(),
            "rejection_reason = $3".to_string(),
        ];
        let mut idx = 4;

        macro_rules! add_f {
            ($field:expr, $name:expr) => {
                if $field.is_some() { sets.push(format!("{} = ${}", $name, idx)); idx += 1; }
            };
        }

        add_f!(data.title, "title");
        add_f!(data.description, "description");
        add_f!(data.location, "location");
        add_f!(data.start_date, "start_date");
        add_f!(data.end_date, "end_date");
        add_f!(data.organizer, "organizer");
        add_f!(data.capacity, "capacity");
        add_f!(data.image, "image");
        add_f!(data.target_audience, "target_audience");
        add_f!(data.speaker, "speaker");
        add_f!(data.travel_plan, "travel_plan");
        add_f!(data.transportation, "transportation");

        let query = format!("UPDATE events SET {} WHERE id = ${}", sets.join(", "), idx);

        let mut builder = sqlx::query(&query).bind(now).bind(status).bind(rejection_reason);

        macro_rules! bind_f {
            ($field:expr) => {
                if let Some(ref val) = $field { builder = builder.bind(val); }
            };
        }

        bind_f!(data.title);
        bind_f!(data.description);
        bind_f!(data.location);
        bind_f!(data.start_date);
        bind_f!(data.end_date);
        bind_f!(data.organizer);
        bind_f!(data.capacity);
        bind_f!(data.image);
        bind_f!(data.target_audience);
        bind_f!(data.speaker);
        bind_f!(data.travel_plan);
        bind_f!(data.transportation);

        let result = builder.bind(id).execute(&mut *conn).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event {} not found", id)));
        }
        if let Some(organizer_ids) = organizer_ids {
            Self::replace_organizers(conn, id, organizer_ids).await?;
        }
        Ok(())
    }

    /// Move an event from `expected` to `next`. Returns false when the event
    /// was no longer in `expected` (changed concurrently).
    pub async fn transition(
        &self,
        id: i64,
        expected: EventStatus,
        next: EventStatus,
        rejection_reason: Option<&str>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE events SET status = $1, rejection_reason = $2, updated_at = NOW()
            WHERE id = $3 AND status = $4
            "#,
        )
        .bind(next)
        .bind(rejection_reason)
        .bind(id)
        .bind(expected)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Recompute the cached registration count from CONFIRMED rows
    pub async fn refresh_registration_count(&self, conn: &mut PgConnection, id: i64) -> AppResult<i32> {
        let count: i32 = sqlx::query_scalar(
            r#"
            UPDATE events SET registrations = (
                SELECT COUNT(*)::INT FROM registrations WHERE event_id = $1 AND status = 'CONFIRMED'
            ), updated_at = NOW()
            WHERE id = $1
            RETURNING registrations
            "#,
        )
        .bind(id)
        .fetch_one(conn)
        .await?;
        Ok(count)
    }

    /// Delete an event with its registrations and organizer links
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM registrations WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM event_organizers WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event {} not found", id)));
        }
        tx.commit().await?;
        Ok(())
    }
}
