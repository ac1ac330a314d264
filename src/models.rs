use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchGroup {
    /// Experimental cohort, research id ends in `.ex`.
    Ex,
    /// Control cohort, research id ends in `.cg`.
    Cg,
    #[serde(rename = "")]
    Unclassified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStatus {
    pub daily_done: bool,
    pub weekly_done: bool,
    pub monthly_done: bool,
}

/// Snapshot of one participant's engagement, as returned by `GET /summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementSummary {
    pub streak: u32,
    pub consistency: u32,
    pub weekly_progress: u32,
    pub total_completed: i64,
    pub status: CompletionStatus,
    pub group: ResearchGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakInfo {
    pub streak: u32,
    pub daily_done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyProgress {
    pub percent: u32,
    pub distinct_weeks: usize,
    pub weekly_done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_serializes_to_flat_camel_case_json() {
        let summary = EngagementSummary {
            streak: 3,
            consistency: 40,
            weekly_progress: 12,
            total_completed: 27,
            status: CompletionStatus {
                daily_done: true,
                weekly_done: false,
                monthly_done: true,
            },
            group: ResearchGroup::Unclassified,
        };

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "streak": 3,
                "consistency": 40,
                "weeklyProgress": 12,
                "totalCompleted": 27,
                "status": { "dailyDone": true, "weeklyDone": false, "monthlyDone": true },
                "group": ""
            })
        );
    }

    #[test]
    fn groups_serialize_as_short_labels() {
        assert_eq!(serde_json::to_string(&ResearchGroup::Ex).unwrap(), "\"ex\"");
        assert_eq!(serde_json::to_string(&ResearchGroup::Cg).unwrap(), "\"cg\"");
    }
}
