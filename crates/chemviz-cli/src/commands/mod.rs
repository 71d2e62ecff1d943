//! CLI command implementations.

use std::time::Duration;

use anyhow::Result;
use chemviz_session::DashboardSession;
use indicatif::ProgressBar;

use crate::output::OutputContext;

pub mod auth;
pub mod datasets;
pub mod report;
pub mod stats;

/// Spinner shown while a session action is in flight.
pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Turn the session's status slot into a command outcome: success text is
/// printed, an error status fails the command.
pub(crate) fn status_outcome(session: &DashboardSession, ctx: &OutputContext) -> Result<()> {
    match session.store().status() {
        Some(status) if status.is_error() => anyhow::bail!("{}", status.text),
        Some(status) => {
            ctx.success(&status.text);
            Ok(())
        }
        None => Ok(()),
    }
}
