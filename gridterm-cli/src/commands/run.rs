//! Headless pane session command.
//!
//! Drives one pane's session through the same controller a graphical front
//! end uses, with standard output as the rendering surface.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use gridterm_core::NativePtyBackend;
use gridterm_core::session::{Dimensions, PaneKey, PaneStatus, SessionController, WriterSurface};
use gridterm_core::tracing::span_names;

use crate::error::CliError;
use crate::util::{create_config_manager, find_project, load_workspace};

/// Longest sleep between two polls of the controller
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Polls after the shell exited, to pick up its last output
const EXIT_DRAIN_ROUNDS: usize = 25;

/// Parameters for the run command
pub struct RunParams<'a> {
    pub project: &'a str,
    pub pane: usize,
    pub cols: u16,
    pub rows: u16,
    pub command: Option<&'a str>,
    pub send: Option<&'a str>,
    pub timeout_secs: u64,
}

/// How a headless session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunOutcome {
    Exited,
    TimedOut,
}

/// Run command handler
pub fn cmd_run(config_path: Option<&Path>, params: RunParams<'_>) -> Result<(), CliError> {
    let config_manager = create_config_manager(config_path)?;
    let settings = config_manager.load_settings()?;
    let workspace = load_workspace(&config_manager)?;

    let id = find_project(&workspace, params.project)?;
    let project = workspace.project(id)?;
    let pane_count = project.layout().pane_count;
    if params.pane >= pane_count {
        return Err(CliError::Grid(format!(
            "Pane {} does not exist; '{}' has {pane_count} panes",
            params.pane, project.name
        )));
    }
    if workspace.is_pane_closed(id, params.pane) {
        return Err(CliError::Grid(format!(
            "Pane {} of '{}' is closed; reopen it first",
            params.pane, project.name
        )));
    }
    let size = Dimensions::new(params.cols, params.rows);
    if !size.is_positive() {
        return Err(CliError::Config(
            "--cols and --rows must be greater than zero".to_string(),
        ));
    }

    let mut shell = settings.shell.shell_config();
    if let Some(command) = params.command {
        shell = shell.with_command(command);
    }
    let backend = Arc::new(NativePtyBackend::new(shell));
    let key = PaneKey::new(id, params.pane);
    let mut controller = SessionController::new(
        key.session_id(),
        project.working_directory().map(Path::to_path_buf),
        backend.clone(),
        Box::new(WriterSurface::new(size, std::io::stdout())),
        settings.session.timing(),
    );
    let _span = tracing::info_span!(span_names::CLI_RUN, project_id = %id, index = params.pane)
        .entered();
    tracing::info!(%size, "Running pane session");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| CliError::Session(format!("Failed to create async runtime: {e}")))?;

    let timeout = Duration::from_secs(params.timeout_secs);
    let outcome = runtime.block_on(drive(&mut controller, &backend, params.send, timeout));
    controller.dispose();

    match outcome? {
        RunOutcome::Exited => Ok(()),
        RunOutcome::TimedOut => {
            eprintln!("Session stopped after {}s", params.timeout_secs);
            Ok(())
        }
    }
}

/// Polls the controller until the shell exits, fails or the timeout hits.
async fn drive(
    controller: &mut SessionController,
    backend: &NativePtyBackend,
    mut send: Option<&str>,
    timeout: Duration,
) -> Result<RunOutcome, CliError> {
    let deadline = Instant::now() + timeout;
    controller.mount(Instant::now());

    loop {
        let now = Instant::now();
        controller.poll(now);

        match controller.status() {
            PaneStatus::StartFailed(reason) => {
                return Err(CliError::Session(format!("Failed to start shell: {reason}")));
            }
            PaneStatus::Interactive => {
                if let Some(text) = send.take() {
                    controller.send_input(text.as_bytes());
                }
                if !backend.contains(controller.id()) {
                    drain_remaining(controller).await;
                    return Ok(RunOutcome::Exited);
                }
            }
            PaneStatus::Starting | PaneStatus::Closed => {}
        }

        if now >= deadline {
            if controller.status() == PaneStatus::Starting {
                return Err(CliError::Session(format!(
                    "Session did not start within {}s",
                    timeout.as_secs()
                )));
            }
            return Ok(RunOutcome::TimedOut);
        }

        let wake = controller
            .next_deadline()
            .map_or(now + FRAME_INTERVAL, |at| at.min(now + FRAME_INTERVAL))
            .min(deadline);
        tokio::time::sleep_until(tokio::time::Instant::from_std(wake)).await;
    }
}

/// Drains output until two consecutive polls find nothing.
async fn drain_remaining(controller: &mut SessionController) {
    let mut quiet = 0;
    for _ in 0..EXIT_DRAIN_ROUNDS {
        tokio::time::sleep(FRAME_INTERVAL).await;
        if controller.drain_output() == 0 {
            quiet += 1;
            if quiet == 2 {
                break;
            }
        } else {
            quiet = 0;
        }
    }
}
