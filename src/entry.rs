//! Entry-phase state machine: turns lines of user input into prompts,
//! per-field validation and calls on [`GradeSession`].
//!
//! ```text
//! AwaitingDecision --add--> Entering(Name -> Category -> Weight -> Grade) --ok--> AwaitingDecision
//!        |                                  |
//!        |                                cancel --> AwaitingDecision
//!        +--stop / course full--> Finalized
//!        +--abort--> Terminated
//! ```

use tracing::{debug, info};

use crate::assignment::{parse_grade, parse_name, parse_weight, Category, Field};
use crate::config::GradingPolicy;
use crate::error::EntryError;
use crate::report::Report;
use crate::session::{GradeSession, RunningTotals};

/// Keyword that throws away the entry being typed.
pub const CANCEL_KEYWORD: &str = "cancel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Add,
    Stop,
    Abort,
}

impl Decision {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "add" | "a" => Some(Decision::Add),
            "stop" | "s" => Some(Decision::Stop),
            "abort" | "q" => Some(Decision::Abort),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingDecision,
    Entering(Field),
    Finalized,
    Terminated,
}

impl Phase {
    pub fn is_over(&self) -> bool {
        matches!(self, Phase::Finalized | Phase::Terminated)
    }
}

/// Fields collected so far for the entry in progress.
#[derive(Debug, Clone, PartialEq)]
enum Draft {
    Empty,
    Named(String),
    Categorized(String, Category),
    Weighted(String, Category, f64),
}

impl Draft {
    fn next_field(&self) -> Field {
        match self {
            Draft::Empty => Field::Name,
            Draft::Named(_) => Field::Category,
            Draft::Categorized(..) => Field::Weight,
            Draft::Weighted(..) => Field::Grade,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Stage {
    Deciding,
    Entering(Draft),
    Finalized,
    Terminated,
}

/// What happened in response to one line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    EntryStarted,
    /// A field was accepted and the next one is being asked for.
    Accepted(Field),
    Rejected(EntryError),
    Recorded {
        name: String,
        category: Category,
        weight: f64,
        grade: f64,
        totals: RunningTotals,
    },
    Cancelled,
    Unrecognized(String),
    Finalized,
    Terminated,
    /// Input arrived after the entry phase ended.
    Ignored,
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feedback::EntryStarted => write!(
                f,
                "New assignment entry (type '{CANCEL_KEYWORD}' after the name to discard it)"
            ),
            Feedback::Accepted(field) => write!(f, "{field} accepted"),
            Feedback::Rejected(err) => write!(f, "Error: {err}"),
            Feedback::Recorded {
                name,
                category,
                weight,
                grade,
                totals,
            } => write!(
                f,
                "Added '{name}' ({category}, {weight}%, Grade: {grade}%)\nCurrent totals: Formative={:.1}%, Summative={:.1}%",
                totals.formative, totals.summative
            ),
            Feedback::Cancelled => write!(f, "Entry cancelled"),
            Feedback::Unrecognized(input) => {
                write!(f, "Unrecognized choice '{input}': enter 'add', 'stop' or 'abort'")
            }
            Feedback::Finalized => write!(f, "Entry finished"),
            Feedback::Terminated => write!(f, "Session aborted"),
            Feedback::Ignored => write!(f, "Session is over"),
        }
    }
}

/// How a session ended, once it has.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Report(Report),
    /// Entry finished with nothing recorded; no report is produced.
    Empty,
    Aborted,
}

#[derive(Debug, Clone)]
pub struct EntryFlow {
    session: GradeSession,
    stage: Stage,
}

impl Default for EntryFlow {
    fn default() -> Self {
        Self::new(GradingPolicy::default())
    }
}

impl EntryFlow {
    pub fn new(policy: GradingPolicy) -> Self {
        Self {
            session: GradeSession::new(policy),
            stage: Stage::Deciding,
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.stage {
            Stage::Deciding => Phase::AwaitingDecision,
            Stage::Entering(draft) => Phase::Entering(draft.next_field()),
            Stage::Finalized => Phase::Finalized,
            Stage::Terminated => Phase::Terminated,
        }
    }

    pub fn session(&self) -> &GradeSession {
        &self.session
    }

    /// Text asking for whatever the current phase needs next.
    pub fn prompt(&self) -> String {
        match self.phase() {
            Phase::AwaitingDecision => "Add new assignment? (add/stop/abort): ".to_string(),
            Phase::Entering(Field::Name) => "Assignment name: ".to_string(),
            Phase::Entering(Field::Category) => "Category (Formative/Summative): ".to_string(),
            Phase::Entering(Field::Weight) => format!(
                "Weight (% of total grade, max {}%): ",
                self.session.remaining_capacity()
            ),
            Phase::Entering(Field::Grade) => "Grade obtained (0-100%): ".to_string(),
            Phase::Finalized | Phase::Terminated => String::new(),
        }
    }

    /// Feed one line of input to the state machine.
    pub fn submit(&mut self, input: &str) -> Feedback {
        let draft = match std::mem::replace(&mut self.stage, Stage::Deciding) {
            Stage::Deciding => return self.decide(input),
            Stage::Entering(draft) => draft,
            over @ (Stage::Finalized | Stage::Terminated) => {
                self.stage = over;
                return Feedback::Ignored;
            }
        };

        let field = draft.next_field();
        // "cancel" is a legal assignment name; it only discards from the category on
        if field != Field::Name && input.trim().eq_ignore_ascii_case(CANCEL_KEYWORD) {
            debug!(?field, "entry cancelled");
            return Feedback::Cancelled;
        }

        match self.fill(draft.clone(), input) {
            Ok(feedback) => feedback,
            Err(err) => {
                debug!(?field, error = %err, "field rejected");
                self.stage = Stage::Entering(draft);
                Feedback::Rejected(err)
            }
        }
    }

    /// Ends the entry phase as if the user had typed `stop`.
    pub fn stop(&mut self) -> Feedback {
        if self.phase().is_over() {
            return Feedback::Ignored;
        }
        self.finalize()
    }

    /// Ends the session without a report.
    pub fn abort(&mut self) -> Feedback {
        if self.phase().is_over() {
            return Feedback::Ignored;
        }
        info!(recorded = self.session.assignments().len(), "session aborted");
        self.stage = Stage::Terminated;
        Feedback::Terminated
    }

    /// The final report, available only once entry finished with at least one assignment.
    pub fn report(&self) -> Option<Report> {
        if self.stage != Stage::Finalized {
            return None;
        }
        self.session
            .clone()
            .close()
            .map(|closed| closed.finalize_report())
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        match self.stage {
            Stage::Finalized => Some(
                self.report()
                    .map_or(SessionOutcome::Empty, SessionOutcome::Report),
            ),
            Stage::Terminated => Some(SessionOutcome::Aborted),
            Stage::Deciding | Stage::Entering(_) => None,
        }
    }

    fn decide(&mut self, input: &str) -> Feedback {
        match Decision::parse(input) {
            Some(Decision::Add) => {
                self.stage = Stage::Entering(Draft::Empty);
                Feedback::EntryStarted
            }
            Some(Decision::Stop) => self.finalize(),
            Some(Decision::Abort) => self.abort(),
            None => Feedback::Unrecognized(input.trim().to_string()),
        }
    }

    /// Validate `input` as the draft's next field. On error the caller restores the draft.
    fn fill(&mut self, draft: Draft, input: &str) -> Result<Feedback, EntryError> {
        let (next, field) = match draft {
            Draft::Empty => (Draft::Named(parse_name(input)?), Field::Name),
            Draft::Named(name) => (
                Draft::Categorized(name, input.parse::<Category>()?),
                Field::Category,
            ),
            Draft::Categorized(name, category) => (
                Draft::Weighted(
                    name,
                    category,
                    parse_weight(input, self.session.remaining_capacity())?,
                ),
                Field::Weight,
            ),
            Draft::Weighted(name, category, weight) => {
                let grade = parse_grade(input)?;
                return self.record(name, category, weight, grade);
            }
        };
        self.stage = Stage::Entering(next);
        Ok(Feedback::Accepted(field))
    }

    fn record(
        &mut self,
        name: String,
        category: Category,
        weight: f64,
        grade: f64,
    ) -> Result<Feedback, EntryError> {
        let (next, totals) = self
            .session
            .record_assignment(&name, category, weight, grade)?;
        self.session = next;

        if self.session.is_full() {
            self.stage = Stage::Finalized;
            info!(
                recorded = self.session.assignments().len(),
                "course weight reached 100%, entry finished"
            );
        } else {
            self.stage = Stage::Deciding;
        }

        Ok(Feedback::Recorded {
            name,
            category,
            weight,
            grade,
            totals,
        })
    }

    fn finalize(&mut self) -> Feedback {
        info!(
            recorded = self.session.assignments().len(),
            total_weight = self.session.total_weight(),
            "entry finished"
        );
        self.stage = Stage::Finalized;
        Feedback::Finalized
    }
}
