use itertools::Itertools;
use serde::Serialize;
use std::fmt;

use crate::assignment::{Assignment, Category};
use crate::config::GradingPolicy;

const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pass => write!(f, "PASS"),
            Status::Fail => write!(f, "FAIL (Must repeat course)"),
        }
    }
}

/// A category whose total fell below the pass threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Shortfall {
    pub category: Category,
    pub actual: f64,
    pub threshold: f64,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} grade ({:.1}% < {:.1}%)",
            self.category, self.actual, self.threshold
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLine {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub formative_total: f64,
    pub summative_total: f64,
    pub total: f64,
    pub gpa: f64,
    pub gpa_scale: f64,
    pub pass_threshold: f64,
    pub status: Status,
    pub shortfalls: Vec<Shortfall>,
    pub assignments: Vec<ReportLine>,
}

impl Report {
    pub(crate) fn derive(
        policy: &GradingPolicy,
        formative_total: f64,
        summative_total: f64,
        assignments: &[Assignment],
    ) -> Self {
        let total = formative_total + summative_total;
        let gpa = total / 100.0 * policy.gpa_scale;

        let shortfalls: Vec<Shortfall> = [
            (Category::Formative, formative_total),
            (Category::Summative, summative_total),
        ]
        .into_iter()
        .filter(|(_, actual)| *actual < policy.pass_threshold)
        .map(|(category, actual)| Shortfall {
            category,
            actual,
            threshold: policy.pass_threshold,
        })
        .collect();

        let status = if shortfalls.is_empty() {
            Status::Pass
        } else {
            Status::Fail
        };

        Self {
            formative_total,
            summative_total,
            total,
            gpa,
            gpa_scale: policy.gpa_scale,
            pass_threshold: policy.pass_threshold,
            status,
            shortfalls,
            assignments: assignments
                .iter()
                .map(|a| ReportLine {
                    contribution: a.contribution(),
                    assignment: a.clone(),
                })
                .collect(),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == Status::Pass
    }

    /// Shortfalls joined for a one-line reason, empty on a pass.
    pub fn reason(&self) -> String {
        self.shortfalls.iter().map(|s| s.to_string()).join(" | ")
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);

        writeln!(f, "{heavy}")?;
        writeln!(f, "{:^50}", "FINAL GRADE REPORT")?;
        writeln!(f, "{heavy}")?;
        writeln!(
            f,
            "{:<20}{:>10.2}%",
            "Formative Total:", self.formative_total
        )?;
        writeln!(
            f,
            "{:<20}{:>10.2}%",
            "Summative Total:", self.summative_total
        )?;
        writeln!(f, "{light}")?;
        writeln!(
            f,
            "{:<20}{:>10.2}%",
            "COURSE TOTAL:", self.total
        )?;
        writeln!(
            f,
            "{:<20}{:>10.2}/{:.1}",
            "GPA:", self.gpa, self.gpa_scale
        )?;
        writeln!(f, "{heavy}")?;
        writeln!(f, "STATUS: {}", self.status)?;
        if !self.shortfalls.is_empty() {
            writeln!(f, "REASON: {}", self.reason())?;
        }
        writeln!(f, "{heavy}")?;

        writeln!(f)?;
        writeln!(f, "ASSIGNMENT DETAILS:")?;
        for (idx, line) in self.assignments.iter().enumerate() {
            let a = &line.assignment;
            writeln!(f, "{}. {}:", idx + 1, a.name)?;
            writeln!(f, "   - Category: {}", a.category)?;
            writeln!(f, "   - Weight: {}%", a.weight)?;
            writeln!(f, "   - Grade: {}%", a.grade)?;
            writeln!(f, "   - Contribution: {:.2}%", line.contribution)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(name: &str, category: Category, weight: f64, grade: f64) -> Assignment {
        Assignment {
            name: name.into(),
            category,
            weight,
            grade,
        }
    }

    #[test]
    fn pass_requires_both_categories() {
        let policy = GradingPolicy::default();
        let report = Report::derive(&policy, 50.0, 49.9, &[]);
        assert_eq!(report.status, Status::Fail);
        assert_eq!(report.shortfalls.len(), 1);
        assert_eq!(report.shortfalls[0].category, Category::Summative);
        assert_eq!(report.reason(), "Summative grade (49.9% < 50.0%)");

        let report = Report::derive(&policy, 50.0, 50.0, &[]);
        assert!(report.passed());
        assert!(report.shortfalls.is_empty());
        assert_eq!(report.reason(), "");
    }

    #[test]
    fn gpa_is_linear_in_total() {
        let policy = GradingPolicy::default();
        let report = Report::derive(&policy, 60.0, 0.0, &[]);
        assert_eq!(report.total, 60.0);
        assert!((report.gpa - 3.0).abs() < 1e-9);

        let report = Report::derive(&policy, 50.0, 50.0, &[]);
        assert!((report.gpa - 5.0).abs() < 1e-9);
    }

    #[test]
    fn policy_drives_threshold_and_scale() {
        let policy = GradingPolicy::new(40.0, 4.0).unwrap();
        let report = Report::derive(&policy, 40.0, 45.0, &[]);
        assert!(report.passed());
        assert!((report.gpa - 3.4).abs() < 1e-9);
    }

    #[test]
    fn both_shortfalls_listed_formative_first() {
        let report = Report::derive(&GradingPolicy::default(), 40.0, 0.0, &[]);
        assert_eq!(
            report.reason(),
            "Formative grade (40.0% < 50.0%) | Summative grade (0.0% < 50.0%)"
        );
    }

    #[test]
    fn lines_keep_order_and_contribution() {
        let items = vec![
            assignment("Quiz1", Category::Formative, 20.0, 80.0),
            assignment("Final", Category::Summative, 80.0, 60.0),
        ];
        let report = Report::derive(&GradingPolicy::default(), 16.0, 48.0, &items);
        assert_eq!(report.assignments.len(), 2);
        assert_eq!(report.assignments[0].assignment.name, "Quiz1");
        assert_eq!(report.assignments[0].contribution, 16.0);
        assert_eq!(report.assignments[1].contribution, 48.0);
    }

    #[test]
    fn text_rendering() {
        let items = vec![assignment("Quiz1", Category::Formative, 20.0, 80.0)];
        let text = Report::derive(&GradingPolicy::default(), 16.0, 0.0, &items).to_string();

        assert!(text.contains("FINAL GRADE REPORT"));
        assert!(text.contains("Formative Total:         16.00%"));
        assert!(text.contains("GPA:                      0.80/5.0"));
        assert!(text.contains("STATUS: FAIL (Must repeat course)"));
        assert!(text.contains("REASON: Formative grade (16.0% < 50.0%)"));
        assert!(text.contains("1. Quiz1:"));
        assert!(text.contains("   - Contribution: 16.00%"));
    }

    #[test]
    fn json_shape() {
        let items = vec![assignment("Quiz1", Category::Formative, 20.0, 80.0)];
        let report = Report::derive(&GradingPolicy::default(), 16.0, 0.0, &items);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["status"], "FAIL");
        assert_eq!(value["assignments"][0]["name"], "Quiz1");
        assert_eq!(value["assignments"][0]["category"], "Formative");
        assert_eq!(value["assignments"][0]["contribution"], 16.0);
        assert_eq!(value["shortfalls"][1]["category"], "Summative");
    }
}
