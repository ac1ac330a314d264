use std::fmt::Write;

use uuid::Uuid;

use crate::models::{EngagementSummary, ResearchGroup};

fn check(done: bool) -> &'static str {
    if done {
        "done"
    } else {
        "pending"
    }
}

fn group_label(group: ResearchGroup) -> &'static str {
    match group {
        ResearchGroup::Ex => "experimental (ex)",
        ResearchGroup::Cg => "control (cg)",
        ResearchGroup::Unclassified => "unclassified",
    }
}

pub fn render_summary(user_id: Uuid, summary: &EngagementSummary) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Engagement summary for {user_id}");
    let _ = writeln!(output, "- Group: {}", group_label(summary.group));
    let _ = writeln!(
        output,
        "- Streak: {} day{}",
        summary.streak,
        if summary.streak == 1 { "" } else { "s" }
    );
    let _ = writeln!(output, "- Consistency (30 days): {}%", summary.consistency);
    let _ = writeln!(output, "- Weekly recordings (26 weeks): {}%", summary.weekly_progress);
    let _ = writeln!(output, "- Check-ins (6 months): {}", summary.total_completed);
    let _ = writeln!(output);
    let _ = writeln!(output, "Today: {}", check(summary.status.daily_done));
    let _ = writeln!(output, "This week: {}", check(summary.status.weekly_done));
    let _ = writeln!(output, "This month: {}", check(summary.status.monthly_done));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompletionStatus;

    #[test]
    fn renders_metrics_and_status() {
        let summary = EngagementSummary {
            streak: 1,
            consistency: 7,
            weekly_progress: 4,
            total_completed: 2,
            status: CompletionStatus {
                daily_done: true,
                weekly_done: false,
                monthly_done: false,
            },
            group: ResearchGroup::Cg,
        };

        let text = render_summary(Uuid::nil(), &summary);
        assert!(text.contains("- Group: control (cg)"));
        assert!(text.contains("- Streak: 1 day\n"));
        assert!(text.contains("- Consistency (30 days): 7%"));
        assert!(text.contains("Today: done"));
        assert!(text.contains("This week: pending"));
    }
}
