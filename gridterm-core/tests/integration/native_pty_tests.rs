//! Real shell sessions through the native PTY backend

#![cfg(unix)]

use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use gridterm_core::pty::{NativePtyBackend, ShellConfig};
use gridterm_core::session::{
    Dimensions, PaneStatus, RenderSurface, SessionController, SessionId, SessionPhase,
    SessionTiming,
};

/// Fixed-size surface that hands output to the test thread.
struct ChannelSurface {
    size: Dimensions,
    tx: mpsc::Sender<Vec<u8>>,
}

impl RenderSurface for ChannelSurface {
    fn fit(&mut self) -> Dimensions {
        self.size
    }

    fn write_output(&mut self, chunk: &[u8]) {
        let _ = self.tx.send(chunk.to_vec());
    }
}

fn controller_for(
    command: &str,
) -> (
    SessionController,
    mpsc::Receiver<Vec<u8>>,
    Arc<NativePtyBackend>,
) {
    let shell = ShellConfig {
        program: "/bin/sh".into(),
        args: vec!["-c".into(), command.into()],
        ..ShellConfig::default()
    };
    let backend = Arc::new(NativePtyBackend::new(shell));
    let (tx, rx) = mpsc::channel();
    let surface = ChannelSurface {
        size: Dimensions::new(91, 33),
        tx,
    };
    let timing = SessionTiming {
        initial_probe_delay: Duration::ZERO,
        ..SessionTiming::default()
    };
    let controller = SessionController::new(
        SessionId::new("native-0"),
        Some(std::env::temp_dir()),
        backend.clone(),
        Box::new(surface),
        timing,
    );
    (controller, rx, backend)
}

/// Polls until `done` holds or five seconds pass.
fn poll_until(
    controller: &mut SessionController,
    mut done: impl FnMut(&SessionController) -> bool,
) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        controller.poll(Instant::now());
        if done(controller) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

fn collect_output(
    controller: &mut SessionController,
    rx: &mpsc::Receiver<Vec<u8>>,
    needle: &str,
) -> String {
    let mut output = Vec::new();
    poll_until(controller, |_| {
        output.extend(rx.try_iter().flatten());
        String::from_utf8_lossy(&output).contains(needle)
    });
    String::from_utf8_lossy(&output).into_owned()
}

#[test]
fn shell_sees_pane_size_and_working_directory() {
    let (mut controller, rx, backend) =
        controller_for("printf 'size=%s:%s cwd=%s\\n' \"$COLUMNS\" \"$LINES\" \"$PWD\"; sleep 1");
    let start = Instant::now();
    assert!(controller.mount(start));
    assert!(poll_until(&mut controller, |c| c.phase() == SessionPhase::Ready));
    assert_eq!(controller.status(), PaneStatus::Interactive);
    assert_eq!(backend.session_count(), 1);

    let output = collect_output(&mut controller, &rx, "cwd=");
    assert!(output.contains("size=91:33"), "unexpected output: {output}");

    controller.dispose();
    assert_eq!(controller.phase(), SessionPhase::Closed);
}

#[test]
fn input_is_echoed_back_in_order() {
    let (mut controller, rx, _backend) = controller_for("cat");
    controller.mount(Instant::now());
    assert!(poll_until(&mut controller, |c| c.phase() == SessionPhase::Ready));

    for line in ["one\n", "two\n", "three\n"] {
        assert!(controller.send_input(line.as_bytes()));
    }
    let output = collect_output(&mut controller, &rx, "three");
    let one = output.find("one").expect("one echoed");
    let two = output.find("two").expect("two echoed");
    let three = output.find("three").expect("three echoed");
    assert!(one < two && two < three, "out of order: {output}");
}

#[test]
fn missing_shell_fails_to_start_and_can_retry() {
    let shell = ShellConfig {
        program: "/nonexistent/gridterm-shell".into(),
        ..ShellConfig::default()
    };
    let backend = Arc::new(NativePtyBackend::new(shell));
    let (tx, _rx) = mpsc::channel();
    let mut controller = SessionController::new(
        SessionId::new("native-missing"),
        None,
        backend,
        Box::new(ChannelSurface {
            size: Dimensions::new(80, 24),
            tx,
        }),
        SessionTiming {
            initial_probe_delay: Duration::ZERO,
            ..SessionTiming::default()
        },
    );
    controller.mount(Instant::now());
    assert!(poll_until(&mut controller, |c| c.phase() == SessionPhase::StartFailed));
    assert!(matches!(controller.status(), PaneStatus::StartFailed(_)));

    controller.retry_start(Instant::now()).unwrap();
    assert_eq!(controller.phase(), SessionPhase::AwaitingDimensions);
    assert!(poll_until(&mut controller, |c| c.phase() == SessionPhase::StartFailed));
}
