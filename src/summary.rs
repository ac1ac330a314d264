use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::engagement;
use crate::error::Result;
use crate::models::{CompletionStatus, EngagementSummary};

/// Read side of the data store used by the summary aggregator.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// All check-in timestamps for the user, newest first.
    async fn check_in_times(&self, user_id: Uuid) -> Result<Vec<DateTime<Utc>>>;

    async fn count_check_ins_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<i64>;

    async fn voice_recording_times_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>>;

    async fn count_questionnaire_responses_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64>;

    /// `None` when the profile is missing or has no research id.
    async fn research_id(&self, user_id: Uuid) -> Result<Option<String>>;
}

#[derive(Clone)]
pub struct SummaryService {
    store: Arc<dyn SummaryStore>,
}

impl SummaryService {
    pub fn new(store: Arc<dyn SummaryStore>) -> Self {
        Self { store }
    }

    pub async fn user_summary(&self, user_id: Uuid) -> Result<EngagementSummary> {
        self.summarize_at(user_id, Utc::now()).await
    }

    pub async fn summarize_at(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<EngagementSummary> {
        let store = self.store.as_ref();
        let six_months_ago = engagement::six_months_ago(now);

        // The first failed read aborts the join and drops the rest.
        let (check_ins, total_completed, recent_count, recordings, monthly_responses, research_id) =
            tokio::try_join!(
                store.check_in_times(user_id),
                store.count_check_ins_since(user_id, six_months_ago),
                store.count_check_ins_since(user_id, engagement::thirty_days_ago(now)),
                store.voice_recording_times_since(user_id, six_months_ago),
                store.count_questionnaire_responses_since(
                    user_id,
                    engagement::start_of_month(now)
                ),
                store.research_id(user_id),
            )?;

        let streak = engagement::compute_streak(&check_ins, now);
        let weekly = engagement::weekly_progress(&recordings, now);

        tracing::debug!(
            %user_id,
            streak = streak.streak,
            distinct_weeks = weekly.distinct_weeks,
            "computed engagement summary"
        );

        Ok(EngagementSummary {
            streak: streak.streak,
            consistency: engagement::consistency(recent_count),
            weekly_progress: weekly.percent,
            total_completed,
            status: CompletionStatus {
                daily_done: streak.daily_done,
                weekly_done: weekly.weekly_done,
                monthly_done: monthly_responses > 0,
            },
            group: engagement::research_group(research_id.as_deref()),
        })
    }
}
