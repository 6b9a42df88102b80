//! Line-oriented front end: prompts on one stream, answers from another.

use std::io::{self, BufRead, Write};
use tracing::info;

use crate::config::GradingPolicy;
use crate::entry::{EntryFlow, Feedback, SessionOutcome};

pub fn write_header<W: Write>(out: &mut W, policy: &GradingPolicy) -> io::Result<()> {
    let rule = "=".repeat(50);
    writeln!(out, "{rule}")?;
    writeln!(out, "{:^50}", "GRADE CALCULATOR")?;
    writeln!(out, "{rule}")?;
    writeln!(
        out,
        "Passing requires >={:.1}% in both categories\n",
        policy.pass_threshold
    )
}

/// Drive a whole session from `input`. End of input counts as an abort.
pub fn run<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    policy: GradingPolicy,
) -> io::Result<SessionOutcome> {
    let mut flow = EntryFlow::new(policy);
    write_header(out, &policy)?;

    let mut lines = input.lines();
    loop {
        if let Some(outcome) = flow.outcome() {
            return Ok(outcome);
        }

        write!(out, "{}", flow.prompt())?;
        out.flush()?;

        let feedback = match lines.next() {
            Some(line) => flow.submit(&line?),
            None => {
                info!("input closed before the session finished");
                writeln!(out)?;
                flow.abort()
            }
        };

        match feedback {
            // the next prompt is enough
            Feedback::Accepted(_) | Feedback::Finalized | Feedback::Terminated => {}
            Feedback::EntryStarted => {
                let rule = "-".repeat(50);
                writeln!(out, "\n{rule}\n{feedback}\n{rule}")?;
            }
            Feedback::Recorded { .. } => writeln!(out, "\n{feedback}\n")?,
            other => writeln!(out, "{other}")?,
        }
    }
}
