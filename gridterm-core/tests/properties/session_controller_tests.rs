//! Property tests for the session controller lifecycle
//!
//! The controller is driven with explicit instants against a recording
//! backend, so timer behaviour is checked without sleeping.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use gridterm_core::session::{
    BackendResult, CreateAck, CreateRequest, Dimensions, OutputSink, PtyBackend, RenderSurface,
    SessionController, SessionId, SessionPhase, SessionTiming,
};
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Create(Dimensions),
    Write(Vec<u8>),
    Resize(Dimensions),
    Close,
}

#[derive(Default)]
struct RecordingBackend {
    calls: Mutex<Vec<Call>>,
    pending: Mutex<VecDeque<(CreateAck, OutputSink)>>,
}

impl RecordingBackend {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn acknowledge(&self) -> OutputSink {
        let (ack, sink) = self.pending.lock().unwrap().pop_front().unwrap();
        ack.acknowledge();
        sink
    }
}

impl PtyBackend for RecordingBackend {
    fn create(&self, request: CreateRequest) -> BackendResult<()> {
        self.calls.lock().unwrap().push(Call::Create(request.size));
        self.pending
            .lock()
            .unwrap()
            .push_back((request.ack, request.output));
        Ok(())
    }

    fn write(&self, _id: &SessionId, data: &[u8]) -> BackendResult<()> {
        self.calls.lock().unwrap().push(Call::Write(data.to_vec()));
        Ok(())
    }

    fn resize(&self, _id: &SessionId, size: Dimensions) -> BackendResult<()> {
        self.calls.lock().unwrap().push(Call::Resize(size));
        Ok(())
    }

    fn close(&self, _id: &SessionId) -> BackendResult<()> {
        self.calls.lock().unwrap().push(Call::Close);
        Ok(())
    }
}

/// Surface reporting queued sizes, repeating the last one.
#[derive(Clone, Default)]
struct QueuedSurface {
    sizes: Rc<RefCell<VecDeque<Dimensions>>>,
    current: Rc<RefCell<Dimensions>>,
    written: Rc<RefCell<Vec<u8>>>,
}

impl RenderSurface for QueuedSurface {
    fn fit(&mut self) -> Dimensions {
        if let Some(next) = self.sizes.borrow_mut().pop_front() {
            *self.current.borrow_mut() = next;
        }
        *self.current.borrow()
    }

    fn write_output(&mut self, chunk: &[u8]) {
        self.written.borrow_mut().extend_from_slice(chunk);
    }
}

struct Harness {
    controller: SessionController,
    backend: Arc<RecordingBackend>,
    surface: QueuedSurface,
    now: Instant,
    timing: SessionTiming,
    sink: Option<OutputSink>,
}

impl Harness {
    fn new(sizes: impl IntoIterator<Item = Dimensions>) -> Self {
        let backend = Arc::new(RecordingBackend::default());
        let surface = QueuedSurface::default();
        surface.sizes.borrow_mut().extend(sizes);
        let timing = SessionTiming::default();
        let controller = SessionController::new(
            SessionId::new("prop-0"),
            Some(PathBuf::from("/tmp")),
            backend.clone(),
            Box::new(surface.clone()),
            timing,
        );
        Self {
            controller,
            backend,
            surface,
            now: Instant::now(),
            timing,
            sink: None,
        }
    }

    fn advance(&mut self, by: Duration) {
        self.now += by;
        self.controller.poll(self.now);
    }

    /// Polls exactly at the next deadline, if any.
    fn run_next_deadline(&mut self) -> bool {
        match self.controller.next_deadline() {
            Some(at) => {
                self.now = self.now.max(at);
                self.controller.poll(self.now);
                true
            }
            None => false,
        }
    }

    fn ready(size: Dimensions) -> Self {
        let mut h = Self::new([size]);
        h.controller.mount(h.now);
        h.run_next_deadline();
        h.sink = Some(h.backend.acknowledge());
        h.advance(Duration::from_millis(1));
        assert_eq!(h.controller.phase(), SessionPhase::Ready);
        h
    }
}

fn zero_dimensions_strategy() -> impl Strategy<Value = Dimensions> {
    prop_oneof![
        Just(Dimensions::new(0, 0)),
        (1u16..300).prop_map(|c| Dimensions::new(c, 0)),
        (1u16..300).prop_map(|r| Dimensions::new(0, r)),
    ]
}

fn positive_dimensions_strategy() -> impl Strategy<Value = Dimensions> {
    (1u16..400, 1u16..200).prop_map(|(c, r)| Dimensions::new(c, r))
}

#[derive(Debug, Clone, Copy)]
enum TeardownPoint {
    AwaitingDimensions,
    Creating,
    Ready,
    Resizing,
}

fn teardown_point_strategy() -> impl Strategy<Value = TeardownPoint> {
    prop_oneof![
        Just(TeardownPoint::AwaitingDimensions),
        Just(TeardownPoint::Creating),
        Just(TeardownPoint::Ready),
        Just(TeardownPoint::Resizing),
    ]
}

proptest! {
    /// Property: Probes that read a zero dimension never create; the first
    /// positive probe creates exactly once with the probed size
    #[test]
    fn prop_create_waits_for_positive_dimensions(
        zeros in prop::collection::vec(zero_dimensions_strategy(), 0..12),
        size in positive_dimensions_strategy(),
    ) {
        let mut h = Harness::new(zeros.iter().copied().chain([size]));
        prop_assert!(h.controller.mount(h.now));

        for _ in &zeros {
            prop_assert!(h.run_next_deadline());
            prop_assert_eq!(h.controller.phase(), SessionPhase::AwaitingDimensions);
            prop_assert!(h.backend.calls().is_empty());
        }
        prop_assert_eq!(h.controller.probe_attempts(), u32::try_from(zeros.len()).unwrap());

        prop_assert!(h.run_next_deadline());
        prop_assert_eq!(h.controller.phase(), SessionPhase::Creating);
        prop_assert_eq!(h.backend.calls(), vec![Call::Create(size)]);
        prop_assert_eq!(h.controller.last_applied(), Some(size));

        // Nothing left to probe; further polls and mounts never create again.
        prop_assert!(!h.controller.mount(h.now));
        h.advance(Duration::from_secs(5));
        prop_assert_eq!(h.backend.calls().len(), 1);
    }

    /// Property: Teardown from any live phase sends exactly one close and
    /// nothing afterwards
    #[test]
    fn prop_teardown_closes_exactly_once(
        point in teardown_point_strategy(),
        size in positive_dimensions_strategy(),
        later in positive_dimensions_strategy(),
        extra_disposes in 0usize..3,
    ) {
        let mut h = Harness::new([Dimensions::new(0, 0), size]);
        h.controller.mount(h.now);
        match point {
            TeardownPoint::AwaitingDimensions => {
                h.run_next_deadline();
                prop_assert_eq!(h.controller.phase(), SessionPhase::AwaitingDimensions);
            }
            TeardownPoint::Creating => {
                h.run_next_deadline();
                h.run_next_deadline();
                prop_assert_eq!(h.controller.phase(), SessionPhase::Creating);
            }
            TeardownPoint::Ready | TeardownPoint::Resizing => {
                h.run_next_deadline();
                h.run_next_deadline();
                h.sink = Some(h.backend.acknowledge());
                h.advance(Duration::from_millis(1));
                if matches!(point, TeardownPoint::Resizing) {
                    h.controller.notify_geometry_changed(h.now);
                    prop_assert_eq!(h.controller.phase(), SessionPhase::Resizing);
                }
            }
        }

        let before = h.backend.calls().len();
        h.controller.dispose();
        for _ in 0..extra_disposes {
            h.controller.dispose();
        }
        prop_assert_eq!(h.controller.phase(), SessionPhase::Closed);
        prop_assert!(h.controller.next_deadline().is_none());

        // Late events of every kind after teardown.
        h.surface.sizes.borrow_mut().push_back(later);
        prop_assert!(!h.controller.send_input(b"ls\r"));
        h.controller.notify_geometry_changed(h.now);
        h.advance(h.timing.resize_debounce + h.timing.initial_probe_delay);
        h.advance(Duration::from_secs(1));
        prop_assert!(h.controller.retry_start(h.now).is_err());
        drop(h.controller);

        let after: Vec<Call> = h.backend.calls().split_off(before);
        prop_assert_eq!(after, vec![Call::Close]);
    }

    /// Property: Output reaches the surface in production order however
    /// its delivery is interleaved with polling
    #[test]
    fn prop_output_keeps_production_order(
        chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..16), 1..24),
        poll_after in prop::collection::vec(any::<bool>(), 24),
    ) {
        let mut h = Harness::ready(Dimensions::new(80, 24));
        let sink = h.sink.take().unwrap();

        for (chunk, poll) in chunks.iter().zip(poll_after) {
            prop_assert!(sink.send(chunk.clone()));
            if poll {
                h.advance(Duration::from_millis(1));
            }
        }
        h.advance(Duration::from_millis(1));
        prop_assert_eq!(h.surface.written.borrow().clone(), chunks.concat());

        h.controller.dispose();
        prop_assert!(!sink.send(b"late".to_vec()));
        prop_assert_eq!(h.surface.written.borrow().len(), chunks.concat().len());
    }
}
