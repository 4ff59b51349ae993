use log::{debug, warn};
use std::time::Duration;

use crate::buddy::{BuddyApi, ExecutionStatus};
use crate::output::{self, Spinner};
use crate::prompt::Prompter;

/// Delay between two status checks while an execution is still running.
pub const POLL_INTERVAL: Duration = Duration::from_secs(7);

/// The execution being observed.
#[derive(Debug, Clone)]
pub struct ExecutionRef {
    pub project: String,
    pub pipeline_id: u64,
    pub execution_id: u64,
    pub html_url: String,
}

/// How observing an execution ended. The execution itself keeps running
/// server-side in every case but `Finished`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The user stopped watching (or could not be asked)
    Abandoned,
    /// A non-pending status was reached
    Finished(ExecutionStatus),
    /// Fetching the status failed
    PollFailed(String),
}

/// Ask before every status check, wait `interval` while the execution is
/// pending and stop at the first settled status.
///
/// Never fails: prompt and API errors end the watch with a report.
pub async fn watch_execution(
    api: &dyn BuddyApi,
    prompter: &dyn Prompter,
    target: &ExecutionRef,
    interval: Duration,
) -> WatchOutcome {
    loop {
        match prompter.confirm("Want to check the status") {
            Ok(true) => {}
            Ok(false) => {
                eprintln!("Goodbye!");
                return WatchOutcome::Abandoned;
            }
            Err(e) => {
                warn!("Status prompt failed: {e}");
                eprintln!(
                    "Unable to check status: {e}\nCheck the execution at: {}",
                    output::cyan(&target.html_url)
                );
                return WatchOutcome::Abandoned;
            }
        }

        let status = match api
            .get_execution_status(&target.project, target.pipeline_id, target.execution_id)
            .await
        {
            Ok(status) => status,
            Err(e) => {
                warn!("Failed to fetch status of execution {}: {e}", target.execution_id);
                eprintln!("{} {e}", output::bright_red("Error:"));
                return WatchOutcome::PollFailed(e.to_string());
            }
        };

        eprintln!("Current status: {}", output::status(&status));

        if status.is_pending() {
            debug!("Execution {} still {status}", target.execution_id);
            let spinner = Spinner::start("Waiting...");
            tokio::time::sleep(interval).await;
            spinner.finish();
            continue;
        }

        if matches!(status, ExecutionStatus::Unknown(_)) {
            warn!("Execution {} reported unrecognised status {status}", target.execution_id);
        }
        eprintln!("Goodbye!");
        return WatchOutcome::Finished(status);
    }
}
