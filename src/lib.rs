// Library surface for the binary, headless/integration tests and reuse.
pub mod app;
pub mod assignment;
pub mod config;
pub mod entry;
pub mod error;
pub mod output;
pub mod plain;
pub mod report;
pub mod runtime;
pub mod session;
pub mod ui;

pub use assignment::{Assignment, Category};
pub use config::GradingPolicy;
pub use error::EntryError;
pub use report::{Report, Status};
pub use session::{ClosedSession, GradeSession, RunningTotals};
