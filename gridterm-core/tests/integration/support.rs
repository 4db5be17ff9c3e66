//! Shared fakes for integration tests

use std::collections::HashMap;
use std::sync::Mutex;

use gridterm_core::session::{
    BackendResult, CreateAck, CreateRequest, Dimensions, OutputSink, PtyBackend, RenderSurface,
    SessionId,
};

/// A backend call as seen by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(SessionId, Dimensions),
    Write(SessionId, Vec<u8>),
    Resize(SessionId, Dimensions),
    Close(SessionId),
}

/// Backend that records every call and holds create requests until the
/// test acknowledges them.
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<Call>>,
    pending: Mutex<HashMap<SessionId, (CreateAck, OutputSink)>>,
    sinks: Mutex<HashMap<SessionId, OutputSink>>,
}

impl RecordingBackend {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn creates(&self) -> Vec<SessionId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Create(id, _) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn closes(&self) -> Vec<SessionId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Close(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Acknowledges every outstanding create.
    pub fn acknowledge_all(&self) {
        let pending: Vec<_> = self.pending.lock().unwrap().drain().collect();
        let mut sinks = self.sinks.lock().unwrap();
        for (id, (ack, sink)) in pending {
            ack.acknowledge();
            sinks.insert(id, sink);
        }
    }

    /// Emits output for an acknowledged session.
    pub fn emit(&self, id: &SessionId, chunk: &[u8]) -> bool {
        self.sinks
            .lock()
            .unwrap()
            .get(id)
            .is_some_and(|sink| sink.send(chunk.to_vec()))
    }
}

impl PtyBackend for RecordingBackend {
    fn create(&self, request: CreateRequest) -> BackendResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Create(request.id.clone(), request.size));
        self.pending
            .lock()
            .unwrap()
            .insert(request.id, (request.ack, request.output));
        Ok(())
    }

    fn write(&self, id: &SessionId, data: &[u8]) -> BackendResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Write(id.clone(), data.to_vec()));
        Ok(())
    }

    fn resize(&self, id: &SessionId, size: Dimensions) -> BackendResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Resize(id.clone(), size));
        Ok(())
    }

    fn close(&self, id: &SessionId) -> BackendResult<()> {
        self.calls.lock().unwrap().push(Call::Close(id.clone()));
        self.pending.lock().unwrap().remove(id);
        Ok(())
    }
}

/// Surface with a fixed size that discards output.
pub struct FixedSurface(pub Dimensions);

impl RenderSurface for FixedSurface {
    fn fit(&mut self) -> Dimensions {
        self.0
    }

    fn write_output(&mut self, _chunk: &[u8]) {}
}
