//! CLI command implementations

mod init;
mod report;
mod run;

pub use init::cmd_init;
pub use report::{cmd_report, print_report};
pub use run::{cmd_once, cmd_run};
