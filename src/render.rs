//! Table layout for the top-N flow view.
//!
//! The width-break rules are grounded in the original tool's ncurses
//! layout (`ncurses_terminal_view.cpp`): columns are dropped narrowest
//! terminal first — `Proto` below 42 columns, `Rx` below 34, `Tx` below
//! 16 — and `Src`/`Dst` are truncated to `(width - 48) / 2` each. This
//! module is pure layout math, independent of `ratatui`, so it is testable
//! without a terminal.

use crate::config::{MIN_WIDTH_FOR_PROTO, MIN_WIDTH_FOR_RX, MIN_WIDTH_FOR_TX};
use crate::flowkey::FlowKey;
use crate::flowtable::FlowStats;

/// Which optional column groups fit in the available terminal width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPlan {
    pub show_proto: bool,
    pub show_rx: bool,
    pub show_tx: bool,
    pub endpoint_width: u16,
}

impl ColumnPlan {
    pub fn for_width(width: u16) -> Self {
        let show_proto = width >= MIN_WIDTH_FOR_PROTO;
        let show_rx = width >= MIN_WIDTH_FOR_RX;
        let show_tx = width >= MIN_WIDTH_FOR_TX;
        let endpoint_width = width.saturating_sub(48) / 2;
        Self {
            show_proto,
            show_rx,
            show_tx,
            endpoint_width,
        }
    }
}

/// One flow rendered as b/s and p/s per direction, over `interval_secs`.
pub struct FlowRow {
    pub src: String,
    pub dst: String,
    pub proto: String,
    pub rx_bps: f64,
    pub rx_pps: f64,
    pub tx_bps: f64,
    pub tx_pps: f64,
}

impl FlowRow {
    pub fn from_snapshot(key: &FlowKey, stats: &FlowStats, interval_secs: u64) -> Self {
        let interval = interval_secs.max(1) as f64;
        Self {
            src: key.format_src(),
            dst: key.format_dst(),
            proto: key.protocol.to_string(),
            rx_bps: stats.rx_bytes as f64 / interval,
            rx_pps: stats.rx_packets as f64 / interval,
            tx_bps: stats.tx_bytes as f64 / interval,
            tx_pps: stats.tx_packets as f64 / interval,
        }
    }
}

/// Build the rows for one sample tick, ordered last-to-first (busiest
/// first) — the drained snapshot arrives ascending, consumers print it
/// reversed.
pub fn build_rows(snapshot: &[(FlowKey, FlowStats)], interval_secs: u64) -> Vec<FlowRow> {
    snapshot
        .iter()
        .rev()
        .map(|(key, stats)| FlowRow::from_snapshot(key, stats, interval_secs))
        .collect()
}
