//! Owns the flow table; drives the producer loop over an abstract capture
//! source. The capture *source* is deliberately out of the core's scope
//! (spec §6: "capture source interface (consumed)") — `Monitor` depends
//! only on the [`FrameSource`] trait, never on a concrete capture library,
//! which keeps it unit-testable without an OS-level packet capture.
//!
//! Grounded on the teacher's `CaptureEngine` (`capture/mod.rs`): a named
//! background thread, an `Arc<AtomicBool>` shutdown flag polled between
//! blocking reads, and a `Drop` impl that releases resources on panic or
//! early exit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::dissect::dissect;
use crate::error::MonitorError;
use crate::flowkey::FlowKey;
use crate::flowtable::{FlowStats, FlowTable};

/// One delivered frame: wall-clock timestamp (seconds, microseconds),
/// and the captured octets (`caplen` is simply `bytes.len()`, possibly
/// less than the on-the-wire length).
pub struct RawFrame {
    pub timestamp_secs: i64,
    pub timestamp_micros: i64,
    pub bytes: Vec<u8>,
}

/// The capture source's external interface: a blocking "give me the next
/// frame" call that returns `None` on a read timeout (so the caller can
/// poll its shutdown flag) and propagates unrecoverable errors.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Result<Option<RawFrame>, MonitorError>;
}

/// Drives a blocking capture loop on a dedicated thread, integrating every
/// dissected frame into the shared [`FlowTable`].
pub struct Monitor {
    table: Arc<FlowTable>,
    shutdown: Arc<AtomicBool>,
    capture_thread: Option<std::thread::JoinHandle<()>>,
}

impl Monitor {
    pub fn new(table: Arc<FlowTable>) -> Self {
        Self {
            table,
            shutdown: Arc::new(AtomicBool::new(false)),
            capture_thread: None,
        }
    }

    /// Spawn the producer thread over `source`. Each delivered frame is
    /// dissected; on success the table is updated; on `Skip` the frame is
    /// silently dropped. Any unrecoverable capture error ends the loop (it
    /// is logged, not propagated further — the caller discovers this by
    /// the next `stop`/join, or simply sees the table stop growing).
    pub fn start<S>(&mut self, mut source: S) -> Result<(), MonitorError>
    where
        S: FrameSource + 'static,
    {
        let table = Arc::clone(&self.table);
        let shutdown = Arc::clone(&self.shutdown);

        let thread = std::thread::Builder::new()
            .name("netbwtop-capture".into())
            .spawn(move || run_capture_loop(&mut source, &table, &shutdown))
            .map_err(|e| MonitorError::Capture(format!("failed to spawn capture thread: {e}")))?;

        self.capture_thread = Some(thread);
        Ok(())
    }

    /// Request the capture loop to exit and join it. Idempotent.
    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(thread) = self.capture_thread.take() {
            let _ = thread.join();
        }
    }

    /// Delegate to [`FlowTable::drain`].
    pub fn snapshot(&self) -> Vec<(FlowKey, FlowStats)> {
        self.table.drain()
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

fn run_capture_loop<S: FrameSource>(source: &mut S, table: &FlowTable, shutdown: &AtomicBool) {
    while !shutdown.load(Ordering::Relaxed) {
        match source.next_frame() {
            Ok(Some(frame)) => {
                if let Ok((key, wire_length)) = dissect(&frame.bytes) {
                    table.update(key, wire_length);
                }
            }
            Ok(None) => {
                // kernel read timeout, no traffic — loop back and check shutdown.
            }
            Err(e) => {
                tracing::error!("capture loop exiting: {e}");
                return;
            }
        }
    }
}
