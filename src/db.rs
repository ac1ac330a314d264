use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::engagement;
use crate::error::Result;
use crate::summary::SummaryStore;
use crate::week;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub const DEMO_USER_ID: &str = "3d7f5d6f-24f7-4e8e-8b4b-3e7e44b4a7b2";

/// Inserts a demo participant with a recent history. Re-running replaces
/// that participant's rows.
pub async fn seed(pool: &PgPool) -> anyhow::Result<Uuid> {
    let user_id = Uuid::parse_str(DEMO_USER_ID)?;
    let now = Utc::now();
    let today = engagement::start_of_day(now);
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO profiles (id, research_id)
        VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE SET research_id = EXCLUDED.research_id
        "#,
    )
    .bind(user_id)
    .bind("demo-001.ex")
    .execute(&mut *tx)
    .await?;

    for table in ["daily_sliders", "voice_recordings", "main_questionnaire_responses"] {
        sqlx::query(&format!("DELETE FROM {table} WHERE user_id = $1"))
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    }

    // Unbroken run ending yesterday, plus an older isolated entry.
    for (days_ago, mood, stress, sleep) in [
        (1, 4, 2, 7),
        (2, 3, 3, 6),
        (3, 5, 1, 8),
        (4, 3, 4, 5),
        (9, 2, 4, 5),
    ] {
        sqlx::query(
            r#"
            INSERT INTO daily_sliders (id, user_id, mood, stress, sleep, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(mood as i16)
        .bind(stress as i16)
        .bind(sleep as i16)
        .bind(today - Duration::days(days_ago) + Duration::hours(20))
        .execute(&mut *tx)
        .await?;
    }

    for weeks_ago in [0, 1, 3] {
        let recorded_at = now - Duration::weeks(weeks_ago);
        sqlx::query(
            r#"
            INSERT INTO voice_recordings (id, user_id, file_key, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(week::weekly_upload_key(user_id, recorded_at, "m4a"))
        .bind(recorded_at)
        .execute(&mut *tx)
        .await?;
    }

    for (question_id, answer) in [(1, 3), (2, 4), (3, 2)] {
        sqlx::query(
            r#"
            INSERT INTO main_questionnaire_responses (id, user_id, question_id, answer, submitted_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(question_id)
        .bind(answer)
        .bind(engagement::start_of_month(now) + Duration::hours(10))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(user_id)
}

/// Postgres-backed store. The pool is owned by the process entry point.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SummaryStore for PgStore {
    async fn check_in_times(&self, user_id: Uuid) -> Result<Vec<DateTime<Utc>>> {
        let rows = sqlx::query(
            "SELECT created_at FROM daily_sliders WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|row| row.get("created_at")).collect())
    }

    async fn count_check_ins_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<i64> {
        let count: i64 = sqlx::query(
            "SELECT COUNT(*) AS count FROM daily_sliders WHERE user_id = $1 AND created_at >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?
        .get("count");

        Ok(count)
    }

    async fn voice_recording_times_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>> {
        let rows = sqlx::query(
            "SELECT created_at FROM voice_recordings WHERE user_id = $1 AND created_at >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|row| row.get("created_at")).collect())
    }

    async fn count_questionnaire_responses_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64> {
        let count: i64 = sqlx::query(
            r#"
            SELECT COUNT(*) AS count
            FROM main_questionnaire_responses
            WHERE user_id = $1 AND submitted_at >= $2
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?
        .get("count");

        Ok(count)
    }

    async fn research_id(&self, user_id: Uuid) -> Result<Option<String>> {
        let row = sqlx::query("SELECT research_id FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.and_then(|row| row.get::<Option<String>, _>("research_id")))
    }
}
