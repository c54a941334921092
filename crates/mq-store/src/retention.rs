//! Retention sweep of old upload sessions

use chrono::NaiveDate;
use serde::Serialize;

use mq_core::SessionId;
use mq_pipeline::QtlToolkit;

use crate::error::StoreResult;
use crate::repository::ExperimentRepository;
use crate::store::ExperimentStore;

/// Outcome of a retention sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RetentionReport {
    /// Sessions removed, or that would be removed in a dry run
    pub removed: Vec<SessionId>,
    /// Expired sessions kept because one of their experiments is recent
    pub kept_recent: Vec<SessionId>,
    /// Whether the sweep only reported what it would remove
    pub dry_run: bool,
}

/// Whole days from `date` to `today`.
fn age_in_days(date: NaiveDate, today: NaiveDate) -> i64 {
    (today - date).num_days()
}

impl<R: ExperimentRepository, T: QtlToolkit> ExperimentStore<R, T> {
    /// Remove sessions older than the retention window.
    ///
    /// A session whose age exceeds the window is kept while any of its
    /// experiments is younger than the window. The configured sample session
    /// is never removed. Sessions whose id carries no date are skipped.
    pub fn sweep_sessions(&self, today: NaiveDate, dry_run: bool) -> StoreResult<RetentionReport> {
        let limit = i64::from(self.config().retention_days);
        let mut report = RetentionReport {
            dry_run,
            ..RetentionReport::default()
        };

        for session in self.list_sessions()? {
            let Some(created) = session.created_at() else {
                log::warn!("Session {session} has no date in its name, skipping");
                continue;
            };
            if age_in_days(created.date(), today) <= limit {
                continue;
            }
            log::debug!("Session {session} is older than {limit} days");

            let recent = self.list_experiments(&session)?.into_iter().find(|experiment| {
                experiment
                    .run_at()
                    .is_some_and(|at| age_in_days(at.date(), today) < limit)
            });
            if let Some(experiment) = recent {
                log::info!("Keeping session {session}, experiment {experiment} is recent");
                report.kept_recent.push(session);
                continue;
            }

            if self.config().sample_session.as_ref() == Some(&session) {
                log::info!("Keeping sample session {session}");
                continue;
            }

            if dry_run {
                log::info!("Would remove session {session}");
            } else {
                self.repository().remove_session(&session)?;
                log::info!("Removed session {session}");
            }
            report.removed.push(session);
        }

        if report.removed.is_empty() {
            log::info!("No old sessions, nothing to remove");
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_in_days() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(age_in_days(date, today), 9);
        assert_eq!(age_in_days(today, today), 0);
    }
}
