//! Final shape transformation into the canonical report.

use aggregator_core::models::{DailyTopUser, StructuredReport, UserStat};

/// Packs the stats engine output into the serialisable report consumed by
/// the presentation layer. No business logic lives here.
pub struct ResultExporter;

impl ResultExporter {
    /// Build the `{ user_stats, daily_top_user }` report structure.
    pub fn export(
        user_stats: Vec<UserStat>,
        daily_top_user: Vec<DailyTopUser>,
    ) -> StructuredReport {
        StructuredReport {
            user_stats,
            daily_top_user,
        }
    }
}
