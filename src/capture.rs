//! Live capture source: a thin wrapper over `pcap`, the registry crate
//! this pack's closest example (a network listener built on `pnet`/`pcap`)
//! reaches for to open a live link-layer capture. Lives outside the
//! library crate's `FrameSource` abstraction (`monitor.rs`) on purpose —
//! the capture source is an external collaborator per spec §6, not core.

use netbwtop::config::{CAPTURE_SNAPLEN, CAPTURE_TIMEOUT_MS};
use netbwtop::error::MonitorError;
use netbwtop::monitor::{FrameSource, RawFrame};

/// Opens a live capture on a named interface: promiscuous mode, a snaplen
/// large enough to never truncate a full-size frame, and the 1000 ms
/// kernel read timeout the concurrency model relies on to bound shutdown
/// latency.
pub struct CaptureSource {
    capture: pcap::Capture<pcap::Active>,
}

impl CaptureSource {
    pub fn open(iface: &str) -> Result<Self, MonitorError> {
        let capture = pcap::Capture::from_device(iface)
            .map_err(|e| MonitorError::Capture(format!("no such device {iface}: {e}")))?
            .promisc(true)
            .snaplen(CAPTURE_SNAPLEN)
            .timeout(CAPTURE_TIMEOUT_MS)
            .open()
            .map_err(|e| MonitorError::Capture(format!("failed to open {iface}: {e}")))?;
        Ok(Self { capture })
    }
}

impl FrameSource for CaptureSource {
    /// Block for the next frame. Returns `None` on the kernel read timeout
    /// (no traffic) so the caller can poll its shutdown flag; propagates
    /// any other capture error as unrecoverable.
    fn next_frame(&mut self) -> Result<Option<RawFrame>, MonitorError> {
        match self.capture.next_packet() {
            Ok(packet) => Ok(Some(RawFrame {
                timestamp_secs: packet.header.ts.tv_sec,
                timestamp_micros: packet.header.ts.tv_usec,
                bytes: packet.data.to_vec(),
            })),
            Err(pcap::Error::TimeoutExpired) => Ok(None),
            Err(e) => Err(MonitorError::Capture(e.to_string())),
        }
    }
}
