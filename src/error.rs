//! Unified error type for the monitor's public surface.
//!
//! Per-frame dissection failures never reach this type — they are the
//! `Skip` arm of [`crate::dissect::dissect`] and are dropped silently, not
//! surfaced as errors (see §7 of the design notes).

/// Top-level error returned by configuration, capture, and I/O boundaries.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Bad flags, missing interface, bad integer, or anything else
    /// rejected after argument parsing.
    #[error("{0}")]
    Config(String),

    /// Cannot open the capture interface, or a fatal capture-loop error.
    #[error("{0}")]
    Capture(String),

    /// Snapshot-file or terminal I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_and_capture_display_their_message() {
        assert_eq!(
            MonitorError::Config("missing -i".into()).to_string(),
            "missing -i"
        );
        assert_eq!(
            MonitorError::Capture("no such device eth9".into()).to_string(),
            "no such device eth9"
        );
    }

    #[test]
    fn io_error_wraps_and_displays_the_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "dir missing");
        let err: MonitorError = io_err.into();
        assert!(err.to_string().contains("dir missing"));
    }
}
