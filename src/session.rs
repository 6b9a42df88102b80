use serde::Serialize;
use tracing::debug;

use crate::assignment::{check_grade, check_weight, parse_name, Assignment, Category};
use crate::config::GradingPolicy;
use crate::error::EntryError;
use crate::report::Report;

/// Total weight available across all assignments.
pub const FULL_WEIGHT: f64 = 100.0;
/// Slack allowed when comparing accumulated weights, so 33.3 + 33.3 + 33.4 fills the course.
pub const WEIGHT_EPSILON: f64 = 1e-9;

/// Snapshot of the running totals, handed back after each accepted entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunningTotals {
    pub formative: f64,
    pub summative: f64,
    pub total_weight: f64,
    pub remaining: f64,
}

/// The entry-phase state. Operations never mutate a session; they return a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeSession {
    policy: GradingPolicy,
    assignments: Vec<Assignment>,
    formative_total: f64,
    summative_total: f64,
    total_weight: f64,
}

impl Default for GradeSession {
    fn default() -> Self {
        Self::new(GradingPolicy::default())
    }
}

impl GradeSession {
    pub fn new(policy: GradingPolicy) -> Self {
        Self {
            policy,
            assignments: Vec::new(),
            formative_total: 0.0,
            summative_total: 0.0,
            total_weight: 0.0,
        }
    }

    pub fn policy(&self) -> &GradingPolicy {
        &self.policy
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn formative_total(&self) -> f64 {
        self.formative_total
    }

    pub fn summative_total(&self) -> f64 {
        self.summative_total
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Weight that can still be assigned before the course reaches 100%.
    pub fn remaining_capacity(&self) -> f64 {
        (FULL_WEIGHT - self.total_weight).max(0.0)
    }

    pub fn is_full(&self) -> bool {
        self.remaining_capacity() <= WEIGHT_EPSILON
    }

    pub fn totals(&self) -> RunningTotals {
        RunningTotals {
            formative: self.formative_total,
            summative: self.summative_total,
            total_weight: self.total_weight,
            remaining: self.remaining_capacity(),
        }
    }

    /// Validate one assignment and return the session with it recorded.
    ///
    /// On rejection `self` is left as it was and the error names the failing field.
    pub fn record_assignment(
        &self,
        name: &str,
        category: Category,
        weight: f64,
        grade: f64,
    ) -> Result<(GradeSession, RunningTotals), EntryError> {
        let name = parse_name(name)?;
        check_weight(weight, self.remaining_capacity())?;
        check_grade(grade)?;

        let assignment = Assignment {
            name,
            category,
            weight,
            grade,
        };
        let contribution = assignment.contribution();

        let mut next = self.clone();
        match category {
            Category::Formative => next.formative_total += contribution,
            Category::Summative => next.summative_total += contribution,
        }
        next.total_weight = (next.total_weight + weight).min(FULL_WEIGHT);
        next.assignments.push(assignment);

        debug!(
            category = %category,
            weight,
            grade,
            contribution,
            total_weight = next.total_weight,
            "assignment recorded"
        );

        let totals = next.totals();
        Ok((next, totals))
    }

    /// End the entry phase. Yields nothing when no assignment was recorded,
    /// in which case no report is produced.
    pub fn close(self) -> Option<ClosedSession> {
        if self.is_empty() {
            return None;
        }
        Some(ClosedSession { session: self })
    }
}

/// A session whose entry phase is over; the only place a report comes from.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedSession {
    session: GradeSession,
}

impl ClosedSession {
    pub fn session(&self) -> &GradeSession {
        &self.session
    }

    pub fn finalize_report(&self) -> Report {
        Report::derive(
            &self.session.policy,
            self.session.formative_total,
            self.session.summative_total,
            &self.session.assignments,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::Field;
    use crate::report::Status;
    use assert_matches::assert_matches;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn record_returns_new_session_and_leaves_old_one() {
        let empty = GradeSession::default();
        let (next, totals) = empty
            .record_assignment("Quiz1", Category::Formative, 20.0, 80.0)
            .unwrap();

        assert!(empty.is_empty());
        assert_eq!(empty.total_weight(), 0.0);

        assert_eq!(next.assignments().len(), 1);
        assert!(approx(totals.formative, 16.0));
        assert_eq!(totals.summative, 0.0);
        assert_eq!(totals.total_weight, 20.0);
        assert_eq!(totals.remaining, 80.0);
    }

    #[test]
    fn quiz_and_final_scenario() {
        let (s, _) = GradeSession::default()
            .record_assignment("Quiz1", Category::Formative, 20.0, 80.0)
            .unwrap();
        let (s, _) = s
            .record_assignment("Final", Category::Summative, 80.0, 60.0)
            .unwrap();
        assert!(s.is_full());

        let report = s.close().unwrap().finalize_report();
        assert!(approx(report.formative_total, 16.0));
        assert!(approx(report.summative_total, 48.0));
        assert!(approx(report.total, 64.0));
        assert!(approx(report.gpa, 3.2));
        // both categories must reach the threshold on their own
        assert_eq!(report.status, Status::Fail);
        assert_eq!(report.shortfalls.len(), 2);
    }

    #[test]
    fn single_formative_fails_both_categories() {
        let (s, _) = GradeSession::default()
            .record_assignment("Project", Category::Formative, 100.0, 40.0)
            .unwrap();
        let report = s.close().unwrap().finalize_report();

        assert!(approx(report.formative_total, 40.0));
        assert_eq!(report.summative_total, 0.0);
        assert_eq!(report.status, Status::Fail);
        let failed: Vec<Category> = report.shortfalls.iter().map(|s| s.category).collect();
        assert_eq!(failed, vec![Category::Formative, Category::Summative]);
    }

    #[test]
    fn weight_over_remaining_is_rejected() {
        let (s, _) = GradeSession::default()
            .record_assignment("Midterm", Category::Summative, 70.0, 90.0)
            .unwrap();
        let err = s
            .record_assignment("Final", Category::Summative, 31.0, 90.0)
            .unwrap_err();
        assert_matches!(err, EntryError::CapacityExceeded { remaining, .. } if approx(remaining, 30.0));
        assert_eq!(s.total_weight(), 70.0);
    }

    #[test]
    fn invalid_grade_leaves_state_unchanged() {
        let (s, _) = GradeSession::default()
            .record_assignment("Quiz1", Category::Formative, 20.0, 80.0)
            .unwrap();
        let before = s.clone();

        let err = s
            .record_assignment("Bad", Category::Formative, 10.0, 150.0)
            .unwrap_err();
        assert_eq!(err.field(), Field::Grade);
        assert_eq!(s, before);

        let err = s
            .record_assignment("   ", Category::Formative, 10.0, 50.0)
            .unwrap_err();
        assert_eq!(err, EntryError::EmptyName);
        assert_eq!(s, before);
    }

    #[test]
    fn thirds_fill_the_course_without_exceeding_it() {
        let mut s = GradeSession::default();
        for (name, w) in [("A", 33.3), ("B", 33.3), ("C", 33.4)] {
            s = s
                .record_assignment(name, Category::Summative, w, 100.0)
                .unwrap()
                .0;
        }
        assert!(s.is_full());
        assert!(s.total_weight() <= FULL_WEIGHT);
    }

    #[test]
    fn zero_weight_is_accepted() {
        let (s, totals) = GradeSession::default()
            .record_assignment("Practice", Category::Formative, 0.0, 100.0)
            .unwrap();
        assert_eq!(totals.formative, 0.0);
        assert_eq!(s.assignments().len(), 1);
    }

    #[test]
    fn empty_session_closes_to_nothing() {
        assert!(GradeSession::default().close().is_none());
    }

    #[test]
    fn names_are_stored_trimmed_in_order() {
        let (s, _) = GradeSession::default()
            .record_assignment("  Essay ", Category::Summative, 10.0, 70.0)
            .unwrap();
        let (s, _) = s
            .record_assignment("Lab", Category::Formative, 10.0, 70.0)
            .unwrap();
        let names: Vec<&str> = s.assignments().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Essay", "Lab"]);
    }
}
