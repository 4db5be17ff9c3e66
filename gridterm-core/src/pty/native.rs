//! Native PTY backend built on `portable-pty`

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use portable_pty::{Child, ChildKiller, CommandBuilder, MasterPty, PtySize, native_pty_system};

use super::output::spawn_output_pipeline;
use super::shell::{ShellConfig, is_denied_env};
use crate::session::{
    BackendError, BackendResult, CreateRequest, Dimensions, PtyBackend, SessionId,
};

/// Ordered work for a session's I/O thread.
enum IoCommand {
    Write(Vec<u8>),
    Resize(Dimensions),
}

struct RunningSession {
    generation: u64,
    commands: Sender<IoCommand>,
    killer: Box<dyn ChildKiller + Send + Sync>,
    size: Dimensions,
}

enum Slot {
    /// Spawn in progress on a worker thread
    Starting { generation: u64 },
    Running(RunningSession),
}

impl Slot {
    const fn generation(&self) -> u64 {
        match self {
            Self::Starting { generation } => *generation,
            Self::Running(session) => session.generation,
        }
    }
}

type SessionTable = Arc<Mutex<HashMap<SessionId, Slot>>>;

struct SpawnedPty {
    master: Box<dyn MasterPty + Send>,
    child: Box<dyn Child + Send + Sync>,
    writer: Box<dyn Write + Send>,
}

/// [`PtyBackend`] that runs shells on local pseudo-terminals.
///
/// Every call returns immediately. Creation runs on a worker thread and is
/// acknowledged through the request. Writes and resizes of one session go
/// through a single I/O thread, so they reach the PTY in call order.
#[derive(Clone)]
pub struct NativePtyBackend {
    shell: Arc<ShellConfig>,
    sessions: SessionTable,
    next_generation: Arc<AtomicU64>,
}

impl NativePtyBackend {
    /// Creates a backend that launches shells as configured.
    #[must_use]
    pub fn new(shell: ShellConfig) -> Self {
        Self {
            shell: Arc::new(shell),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            next_generation: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Shell configuration in use.
    #[must_use]
    pub fn shell(&self) -> &ShellConfig {
        &self.shell
    }

    /// Number of sessions that are starting or running.
    #[must_use]
    pub fn session_count(&self) -> usize {
        lock(&self.sessions).len()
    }

    /// Returns true if a session with this id is starting or running.
    #[must_use]
    pub fn contains(&self, id: &SessionId) -> bool {
        lock(&self.sessions).contains_key(id)
    }
}

impl Default for NativePtyBackend {
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}

impl std::fmt::Debug for NativePtyBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativePtyBackend")
            .field("shell", &self.shell)
            .field("sessions", &self.session_count())
            .finish_non_exhaustive()
    }
}

impl PtyBackend for NativePtyBackend {
    fn create(&self, request: CreateRequest) -> BackendResult<()> {
        let size = request.size;
        if !size.is_positive() {
            return Err(BackendError::InvalidDimensions {
                cols: size.cols,
                rows: size.rows,
            });
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        {
            let mut sessions = lock(&self.sessions);
            if sessions.contains_key(&request.id) {
                return Err(BackendError::DuplicateSession(request.id));
            }
            sessions.insert(request.id.clone(), Slot::Starting { generation });
        }

        let shell = Arc::clone(&self.shell);
        let sessions = Arc::clone(&self.sessions);
        let id = request.id.clone();
        let spawned = thread::Builder::new()
            .name(format!("gridterm-pty-spawn-{id}"))
            .spawn(move || start_session(&shell, &sessions, generation, request));
        if let Err(e) = spawned {
            lock(&self.sessions).remove(&id);
            return Err(BackendError::SpawnFailed(e.to_string()));
        }
        Ok(())
    }

    fn write(&self, id: &SessionId, data: &[u8]) -> BackendResult<()> {
        let sessions = lock(&self.sessions);
        let Some(Slot::Running(session)) = sessions.get(id) else {
            return Err(BackendError::SessionNotFound(id.clone()));
        };
        session
            .commands
            .send(IoCommand::Write(data.to_vec()))
            .map_err(|_| BackendError::Io(format!("I/O thread of {id} has stopped")))
    }

    fn resize(&self, id: &SessionId, size: Dimensions) -> BackendResult<()> {
        if !size.is_positive() {
            return Err(BackendError::InvalidDimensions {
                cols: size.cols,
                rows: size.rows,
            });
        }
        let mut sessions = lock(&self.sessions);
        let Some(Slot::Running(session)) = sessions.get_mut(id) else {
            return Err(BackendError::SessionNotFound(id.clone()));
        };
        if session.size == size {
            return Ok(());
        }
        session
            .commands
            .send(IoCommand::Resize(size))
            .map_err(|_| BackendError::Io(format!("I/O thread of {id} has stopped")))?;
        session.size = size;
        Ok(())
    }

    fn close(&self, id: &SessionId) -> BackendResult<()> {
        let removed = lock(&self.sessions).remove(id);
        match removed {
            None => Ok(()),
            // The spawn thread finds its slot gone and kills the child itself.
            Some(Slot::Starting { .. }) => {
                tracing::debug!(session_id = %id, "Cancelled starting session");
                Ok(())
            }
            Some(Slot::Running(mut session)) => {
                drop(session.commands);
                tracing::debug!(session_id = %id, "Closing session");
                session.killer.kill().map_err(|e| BackendError::Io(e.to_string()))
            }
        }
    }
}

fn lock(sessions: &SessionTable) -> MutexGuard<'_, HashMap<SessionId, Slot>> {
    sessions.lock().unwrap_or_else(PoisonError::into_inner)
}

fn to_pty_size(size: Dimensions) -> PtySize {
    PtySize {
        rows: size.rows,
        cols: size.cols,
        pixel_width: 0,
        pixel_height: 0,
    }
}

fn spawn_error(error: impl std::fmt::Display) -> BackendError {
    BackendError::SpawnFailed(error.to_string())
}

fn build_command(shell: &ShellConfig, size: Dimensions, cwd: Option<&Path>) -> CommandBuilder {
    let mut cmd = CommandBuilder::new(&shell.program);
    cmd.args(&shell.args);

    if shell.sanitize_env {
        for (key, _) in std::env::vars_os() {
            if key.to_str().is_some_and(is_denied_env) {
                cmd.env_remove(&key);
            }
        }
    }
    for (key, value) in shell.session_env(size) {
        cmd.env(key, value);
    }

    if let Some(dir) = cwd {
        let expanded = shellexpand::tilde(&dir.to_string_lossy()).into_owned();
        cmd.cwd(expanded);
    }
    cmd
}

fn spawn_pty(
    shell: &ShellConfig,
    request: &CreateRequest,
) -> BackendResult<(SpawnedPty, Box<dyn Read + Send>)> {
    let pair = native_pty_system()
        .openpty(to_pty_size(request.size))
        .map_err(spawn_error)?;

    let cmd = build_command(shell, request.size, request.working_directory.as_deref());
    let mut child = pair.slave.spawn_command(cmd).map_err(spawn_error)?;
    drop(pair.slave);

    let reader = pair.master.try_clone_reader();
    let writer = pair.master.take_writer();
    match (reader, writer) {
        (Ok(reader), Ok(writer)) => Ok((
            SpawnedPty {
                master: pair.master,
                child,
                writer,
            },
            reader,
        )),
        (Err(e), _) | (_, Err(e)) => {
            let _ = child.kill();
            let _ = child.wait();
            Err(spawn_error(e))
        }
    }
}

/// Body of the spawn worker thread.
fn start_session(
    shell: &ShellConfig,
    sessions: &SessionTable,
    generation: u64,
    request: CreateRequest,
) {
    let id = request.id.clone();
    let spawned = spawn_pty(shell, &request);

    let mut table = lock(sessions);
    let still_wanted = table.get(&id).is_some_and(|slot| {
        matches!(slot, Slot::Starting { .. }) && slot.generation() == generation
    });

    let (pty, reader) = match spawned {
        Ok(spawned) if still_wanted => spawned,
        Ok((mut pty, _reader)) => {
            drop(table);
            let _ = pty.child.kill();
            let _ = pty.child.wait();
            tracing::debug!(session_id = %id, "Session closed before it started");
            request.ack.fail(BackendError::Cancelled(id));
            return;
        }
        Err(e) => {
            if still_wanted {
                table.remove(&id);
            }
            drop(table);
            tracing::error!(session_id = %id, %e, "Failed to spawn shell");
            request.ack.fail(e);
            return;
        }
    };

    let SpawnedPty {
        master,
        child,
        writer,
    } = pty;
    let pid = child.process_id();
    let killer = child.clone_killer();
    let (commands, command_rx) = mpsc::channel();

    let started = spawn_output_pipeline(&id, reader, request.output)
        .and_then(|()| spawn_io_thread(&id, master, writer, command_rx))
        .and_then(|()| spawn_wait_thread(&id, Arc::clone(sessions), generation, child));
    if let Err(e) = started {
        table.remove(&id);
        drop(table);
        tracing::error!(session_id = %id, %e, "Failed to start session threads");
        request.ack.fail(BackendError::SpawnFailed(e.to_string()));
        return;
    }

    table.insert(
        id.clone(),
        Slot::Running(RunningSession {
            generation,
            commands,
            killer,
            size: request.size,
        }),
    );
    drop(table);

    tracing::info!(session_id = %id, ?pid, size = %request.size, "Shell started");
    request.ack.acknowledge();
}

fn spawn_io_thread(
    id: &SessionId,
    master: Box<dyn MasterPty + Send>,
    mut writer: Box<dyn Write + Send>,
    commands: Receiver<IoCommand>,
) -> std::io::Result<()> {
    let session_id = id.clone();
    thread::Builder::new()
        .name(format!("gridterm-pty-io-{id}"))
        .spawn(move || {
            while let Ok(command) = commands.recv() {
                match command {
                    IoCommand::Write(bytes) => {
                        if let Err(e) = writer.write_all(&bytes).and_then(|()| writer.flush()) {
                            tracing::warn!(%session_id, %e, "PTY write failed");
                            break;
                        }
                    }
                    IoCommand::Resize(size) => {
                        if let Err(e) = master.resize(to_pty_size(size)) {
                            tracing::warn!(%session_id, %e, %size, "PTY resize failed");
                        }
                    }
                }
            }
        })?;
    Ok(())
}

fn spawn_wait_thread(
    id: &SessionId,
    sessions: SessionTable,
    generation: u64,
    mut child: Box<dyn Child + Send + Sync>,
) -> std::io::Result<()> {
    let session_id = id.clone();
    thread::Builder::new()
        .name(format!("gridterm-pty-wait-{id}"))
        .spawn(move || {
            let status = child.wait();
            let mut table = lock(&sessions);
            if table
                .get(&session_id)
                .is_some_and(|slot| slot.generation() == generation)
            {
                table.remove(&session_id);
            }
            drop(table);
            match status {
                Ok(status) => {
                    tracing::info!(%session_id, code = status.exit_code(), "Shell exited");
                }
                Err(e) => tracing::warn!(%session_id, %e, "Failed to reap shell"),
            }
        })?;
    Ok(())
}
