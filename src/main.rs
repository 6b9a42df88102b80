use clap::{ArgAction, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use gradecalc::{
    app::App,
    config::{Config, FrontEnd, OutputFormat},
    entry::SessionOutcome,
    output, plain,
    runtime::{self, CrosstermEventSource},
    ui,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// terminal grade calculator for weighted formative and summative assignments
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Enter weighted assignments in two categories (formative, summative) and get category totals, a course total, a GPA on a 5-point scale and a pass/fail verdict. Passing requires at least 50% in each category."
)]
pub struct Cli {
    /// use the line-by-line prompt instead of the full-screen interface (implied when stdin is not a tty)
    #[clap(long)]
    plain: bool,

    /// print the final report as JSON
    #[clap(long)]
    json: bool,

    /// increase log verbosity on stderr (-v info, -vv debug); RUST_LOG overrides
    #[clap(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Self {
            policy: Default::default(),
            output: if cli.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            front_end: if cli.plain {
                FrontEnd::Plain
            } else {
                FrontEnd::Tui
            },
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from(&cli).with_tty(stdin().is_tty());
    debug!(?config, "resolved configuration");

    let outcome = match config.front_end {
        FrontEnd::Plain => plain::run(
            stdin().lock(),
            &mut transcript_stream(config.output),
            config.policy,
        )?,
        FrontEnd::Tui => run_tui(&config)?,
    };

    // with --json, stdout carries the report document and nothing else
    let mut out: Box<dyn Write> = match outcome {
        SessionOutcome::Report(_) => Box::new(io::stdout()),
        SessionOutcome::Empty | SessionOutcome::Aborted => transcript_stream(config.output),
    };
    output::write_outcome(&mut out, &outcome, config.output)?;
    Ok(())
}

/// Where prompts, feedback and "no report" notices go.
fn transcript_stream(format: OutputFormat) -> Box<dyn Write> {
    match format {
        OutputFormat::Text => Box::new(io::stdout()),
        OutputFormat::Json => Box::new(io::stderr()),
    }
}

fn run_tui(config: &Config) -> Result<SessionOutcome, Box<dyn Error>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.policy);
    let result = start_tui(&mut terminal, &mut app);

    // restore the terminal before reporting anything, including errors
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    // quitting from the entry screen without abort or stop is treated as an abort
    Ok(app.outcome().unwrap_or(SessionOutcome::Aborted))
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    runtime::drive(app, CrosstermEventSource::new(), |app| {
        terminal.draw(|f| ui::draw(app, f)).map(|_| ())
    })?;

    info!(phase = ?app.flow.phase(), "leaving interactive session");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["gradecalc"]);

        assert!(!cli.plain);
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["gradecalc", "--plain", "--json", "-vv"]);
        assert!(cli.plain);
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_config_from_cli() {
        let cli = Cli::parse_from(["gradecalc", "--json"]);
        let config = Config::from(&cli);

        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.front_end, FrontEnd::Tui);
        assert_eq!(config.policy, gradecalc::GradingPolicy::default());

        let config = Config::from(&Cli::parse_from(["gradecalc", "--plain"]));
        assert_eq!(config.output, OutputFormat::Text);
        assert_eq!(config.front_end, FrontEnd::Plain);
    }

    #[test]
    fn test_cli_rejects_threshold_flag() {
        assert!(Cli::try_parse_from(["gradecalc", "--pass-threshold", "40"]).is_err());
    }
}
