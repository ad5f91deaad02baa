#![forbid(unsafe_code)]

//! Themed design contests.

use chrono::{DateTime, Duration, Utc};
use pizzart_core::{ArtifactId, PizzaArtifact};
use serde::{Deserialize, Serialize};

const DAY_MS: i64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContestId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContestError {
    #[error("contest has closed")]
    Closed,
    #[error("pizza {0} was already submitted")]
    DuplicateSubmission(ArtifactId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contest {
    pub id: ContestId,
    pub title: String,
    pub description: String,
    pub theme: String,
    pub prize: String,
    pub end_date: DateTime<Utc>,
    pub submissions: Vec<PizzaArtifact>,
}

impl Contest {
    /// The launch contest, closing `days` after `now`.
    pub fn summer_vibes(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            id: ContestId(1),
            title: "Summer Vibes Pizza".to_owned(),
            description: "Create a pizza that captures the essence of summer!".to_owned(),
            theme: "Summer".to_owned(),
            prize: "Rp 500,000 + Pizza for a Year".to_owned(),
            end_date: now + Duration::days(days),
            submissions: Vec::new(),
        }
    }

    /// Whole days left, rounded up. Zero or negative once closed.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        let ms = (self.end_date - now).num_milliseconds();
        let whole = ms.div_euclid(DAY_MS);
        if ms.rem_euclid(DAY_MS) == 0 { whole } else { whole + 1 }
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        now < self.end_date
    }

    /// Enter `artifact`. Each artifact may be entered once, while open.
    pub fn submit(&mut self, artifact: PizzaArtifact, now: DateTime<Utc>) -> Result<(), ContestError> {
        if !self.is_open(now) {
            return Err(ContestError::Closed);
        }
        if self.submissions.iter().any(|s| s.id == artifact.id) {
            return Err(ContestError::DuplicateSubmission(artifact.id));
        }
        self.submissions.push(artifact);
        Ok(())
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pizzart_core::{Catalog, PizzaConfig, finalize};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap()
    }

    fn artifact() -> PizzaArtifact {
        let catalog = Catalog::builtin();
        finalize(&catalog, &PizzaConfig::default_for(&catalog), "Sunburst").unwrap()
    }

    #[test]
    fn days_remaining_rounds_up() {
        let contest = Contest::summer_vibes(now(), 3);
        assert_eq!(contest.days_remaining(now()), 3);
        assert_eq!(contest.days_remaining(now() + Duration::hours(1)), 3);
        assert_eq!(contest.days_remaining(now() + Duration::days(3)), 0);
        assert_eq!(contest.days_remaining(now() + Duration::days(4)), -1);
        assert_eq!(
            contest.days_remaining(now() + Duration::days(3) + Duration::milliseconds(1)),
            0
        );
    }

    #[test]
    fn submit_once_while_open() {
        let mut contest = Contest::summer_vibes(now(), 3);
        let entry = artifact();
        contest.submit(entry.clone(), now()).unwrap();
        assert_eq!(
            contest.submit(entry.clone(), now()),
            Err(ContestError::DuplicateSubmission(entry.id))
        );
        assert_eq!(contest.submission_count(), 1);
    }

    #[test]
    fn closed_contest_rejects() {
        let mut contest = Contest::summer_vibes(now(), 1);
        let later = now() + Duration::days(2);
        assert!(!contest.is_open(later));
        assert_eq!(contest.submit(artifact(), later), Err(ContestError::Closed));
    }
}
