use gradecalc::{Category, GradeSession, GradingPolicy, Status};
use proptest::prelude::*;

fn category() -> impl Strategy<Value = Category> {
    prop_oneof![Just(Category::Formative), Just(Category::Summative)]
}

/// Raw attempts; some weights will overflow the remaining capacity and get rejected.
fn attempts() -> impl Strategy<Value = Vec<(Category, f64, f64)>> {
    prop::collection::vec((category(), 0.0f64..60.0, 0.0f64..=100.0), 0..12)
}

proptest! {
    #[test]
    fn totals_match_contributions_and_weight_stays_capped(entries in attempts()) {
        let mut session = GradeSession::default();
        for (i, (category, weight, grade)) in entries.into_iter().enumerate() {
            let remaining = session.remaining_capacity();
            match session.record_assignment(&format!("A{i}"), category, weight, grade) {
                Ok((next, totals)) => {
                    prop_assert!(weight <= remaining + 1e-9);
                    prop_assert!(totals.total_weight <= 100.0);
                    session = next;
                }
                Err(_) => {
                    prop_assert!(weight > remaining);
                }
            }
            prop_assert!(session.total_weight() <= 100.0);
        }

        let expected: f64 = session.assignments().iter().map(|a| a.contribution()).sum();
        let actual = session.formative_total() + session.summative_total();
        prop_assert!((expected - actual).abs() < 1e-6);

        let weights: f64 = session.assignments().iter().map(|a| a.weight).sum();
        prop_assert!((weights - session.total_weight()).abs() < 1e-6);
    }

    #[test]
    fn rejected_entries_leave_session_untouched(
        weight in 0.0f64..=100.0,
        bad_grade in prop_oneof![100.01f64..1000.0, -1000.0f64..-0.01],
    ) {
        let session = GradeSession::default();
        let before = session.clone();
        prop_assert!(session
            .record_assignment("X", Category::Formative, weight, bad_grade)
            .is_err());
        prop_assert_eq!(session, before);
    }

    #[test]
    fn report_follows_policy(
        formative in 0.0f64..=100.0,
        summative in 0.0f64..=100.0,
    ) {
        // split the course evenly so each category total is grade / 2
        let (s, _) = GradeSession::default()
            .record_assignment("F", Category::Formative, 50.0, formative)
            .unwrap();
        let (s, _) = s
            .record_assignment("S", Category::Summative, 50.0, summative)
            .unwrap();
        let report = s.close().unwrap().finalize_report();
        let policy = GradingPolicy::default();

        prop_assert!((report.gpa - report.total / 100.0 * policy.gpa_scale).abs() < 1e-9);
        let should_pass = report.formative_total >= policy.pass_threshold
            && report.summative_total >= policy.pass_threshold;
        prop_assert_eq!(report.status == Status::Pass, should_pass);
        prop_assert_eq!(report.shortfalls.is_empty(), should_pass);
    }
}
