//! PTY output pipeline
//!
//! A reader thread pulls bytes from the PTY as fast as they arrive. A
//! forwarder thread drains every chunk that is already pending into one
//! batch, so multi-part escape sequences reach the surface in a single
//! write, and holds back a trailing partial UTF-8 sequence until the rest
//! of it arrives.

use std::io::{ErrorKind, Read};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::session::{OutputSink, SessionId};

const READ_CHUNK_SIZE: usize = 16 * 1024;

/// Length of the longest prefix of `data` that does not end inside a
/// multi-byte UTF-8 sequence.
#[must_use]
pub fn utf8_boundary(data: &[u8]) -> usize {
    let Some(&last) = data.last() else {
        return 0;
    };
    if last.is_ascii() {
        return data.len();
    }
    let start = data
        .iter()
        .rposition(|byte| byte & 0xC0 != 0x80)
        .unwrap_or(0);
    let expected = match data[start] {
        b if b < 0xC0 => 1,
        b if b < 0xE0 => 2,
        b if b < 0xF0 => 3,
        _ => 4,
    };
    if data.len() - start >= expected {
        data.len()
    } else {
        start
    }
}

/// Starts the reader and forwarder threads for one session.
pub(crate) fn spawn_output_pipeline(
    id: &SessionId,
    reader: Box<dyn Read + Send>,
    sink: OutputSink,
) -> std::io::Result<()> {
    let (tx, rx) = mpsc::channel::<Vec<u8>>();
    thread::Builder::new()
        .name(format!("gridterm-pty-read-{id}"))
        .spawn(move || read_loop(reader, &tx))?;
    thread::Builder::new()
        .name(format!("gridterm-pty-out-{id}"))
        .spawn(move || forward_loop(&rx, &sink))?;
    Ok(())
}

fn read_loop(mut reader: Box<dyn Read + Send>, tx: &Sender<Vec<u8>>) {
    let mut buf = vec![0_u8; READ_CHUNK_SIZE];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => {
                tracing::trace!(%e, "PTY reader stopped");
                break;
            }
        }
    }
}

/// Batches pending chunks and forwards them on UTF-8 boundaries until
/// either side goes away.
pub(crate) fn forward_loop(rx: &Receiver<Vec<u8>>, sink: &OutputSink) {
    let mut leftover: Vec<u8> = Vec::new();
    while let Ok(first) = rx.recv() {
        let mut batch = std::mem::take(&mut leftover);
        batch.extend(first);
        // Let the reader push the rest of the same burst before batching.
        thread::yield_now();
        while let Ok(more) = rx.try_recv() {
            batch.extend(more);
        }

        let boundary = utf8_boundary(&batch);
        leftover = batch.split_off(boundary);
        if !batch.is_empty() && !sink.send(batch) {
            return;
        }
    }
    if !leftover.is_empty() {
        sink.send(leftover);
    }
}
