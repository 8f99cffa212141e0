//! Statistics service

use chrono::NaiveDate;
use sqlx::Row;

use crate::{
    api::stats::{DailyCount, EventCounts, RegistrationCounts, StatEntry, StatsSummary, UserCounts},
    error::AppResult,
    models::enums::{EventStatus, Role},
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Round-trip to the database
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.repository.pool).await?;
        Ok(())
    }

    /// Aggregate counts plus chart data
    pub async fn summary(&self) -> AppResult<StatsSummary> {
        let pool = &self.repository.pool;

        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'PENDING') AS pending,
                COUNT(*) FILTER (WHERE status = 'APPROVED') AS approved,
                COUNT(*) FILTER (WHERE status = 'COMPLETED') AS completed,
                COUNT(*) FILTER (WHERE status = 'CANCELLED') AS cancelled,
                COUNT(*) FILTER (WHERE start_date > NOW()) AS upcoming
            FROM events
            "#,
        )
        .fetch_one(pool)
        .await?;

        let events = EventCounts {
            total: row.get("total"),
            pending: row.get("pending"),
            approved: row.get("approved"),
            completed: row.get("completed"),
            cancelled: row.get("cancelled"),
            upcoming: row.get("upcoming"),
        };

        let status_rows: Vec<(EventStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM events GROUP BY status")
                .fetch_all(pool)
                .await?;
        let role_rows: Vec<(Role, i64)> =
            sqlx::query_as("SELECT role, COUNT(*) FROM users GROUP BY role")
                .fetch_all(pool)
                .await?;

        let events_by_status = fill_breakdown(EventStatus::ALL, &status_rows);
        let users_by_role = fill_breakdown(Role::ALL, &role_rows);
        let users = user_counts(&role_rows);

        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'CONFIRMED') AS confirmed,
                COUNT(*) FILTER (WHERE status = 'CANCELLED') AS cancelled
            FROM registrations
            "#,
        )
        .fetch_one(pool)
        .await?;

        let registrations = RegistrationCounts {
            total: row.get("total"),
            confirmed: row.get("confirmed"),
            cancelled: row.get("cancelled"),
        };

        let total_departments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM departments")
            .fetch_one(pool)
            .await?;
        let total_offices: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM offices")
            .fetch_one(pool)
            .await?;

        // One row per day, including days without registrations
        let daily: Vec<(NaiveDate, i64)> = sqlx::query_as(
            r#"
            SELECT d::date AS day, COUNT(r.id) AS count
            FROM generate_series(CURRENT_DATE - 29, CURRENT_DATE, INTERVAL '1 day') AS d
            LEFT JOIN registrations r ON r.registration_date::date = d::date
            GROUP BY d
            ORDER BY d
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(StatsSummary {
            events,
            users,
            registrations,
            total_departments,
            total_offices,
            events_by_status,
            users_by_role,
            registrations_last_30_days: daily
                .into_iter()
                .map(|(date, count)| DailyCount { date, count })
                .collect(),
        })
    }
}

/// One entry per known label, zero when the database has no rows for it
fn fill_breakdown<T>(all: &[T], rows: &[(T, i64)]) -> Vec<StatEntry>
where
    T: PartialEq + std::fmt::Display,
{
    all.iter()
        .map(|label| StatEntry {
            label: label.to_string(),
            count: rows
                .iter()
                .find(|(l, _)| l == label)
                .map(|(_, c)| *c)
                .unwrap_or(0),
        })
        .collect()
}

fn user_counts(rows: &[(Role, i64)]) -> UserCounts {
    let count = |role: Role| rows.iter().find(|(r, _)| *r == role).map(|(_, c)| *c).unwrap_or(0);
    UserCounts {
        total: rows.iter().map(|(_, c)| c).sum(),
        admins: count(Role::Admin),
        managers: count(Role::Manager),
        organizers: count(Role::Organizer),
        staff: count(Role::Staff),
        regular_users: count(Role::User),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_breakdown_includes_missing_labels() {
        let rows = vec![(EventStatus::Approved, 3), (EventStatus::Pending, 1)];
        let entries = fill_breakdown(EventStatus::ALL, &rows);
        assert_eq!(entries.len(), EventStatus::ALL.len());
        assert_eq!(entries[0].label, "PENDING");
        assert_eq!(entries[0].count, 1);
        assert_eq!(entries[1].count, 3);
        assert!(entries.iter().filter(|e| e.count == 0).count() == 4);
    }

    #[test]
    fn test_user_counts() {
        let rows = vec![(Role::Admin, 1), (Role::User, 10), (Role::Staff, 2)];
        let counts = user_counts(&rows);
        assert_eq!(counts.total, 13);
        assert_eq!(counts.admins, 1);
        assert_eq!(counts.regular_users, 10);
        assert_eq!(counts.managers, 0);
    }
}
