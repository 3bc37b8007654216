//! The bidirectional flow table: direction-canonical lookup, counter
//! accumulation, and a bounded top-N view — the sole cross-thread coupling
//! between the capture producer and the sampling consumer.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::flowkey::FlowKey;

/// Number of entries kept in the top-N view.
pub const TOP_N: usize = 10;

/// Counters for one flow. All fields are monotonically non-decreasing for
/// the lifetime of the entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowStats {
    pub rx_bytes: u64,
    pub rx_packets: u64,
    pub tx_bytes: u64,
    pub tx_packets: u64,
}

impl FlowStats {
    fn projection(&self, key: SortKey) -> u64 {
        match key {
            SortKey::Bytes => self.rx_bytes.max(self.tx_bytes),
            SortKey::Packets => self.rx_packets.max(self.tx_packets),
        }
    }
}

/// Which counter the top-N view is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Bytes,
    Packets,
}

struct Inner {
    table: HashMap<FlowKey, FlowStats>,
    top_n: Vec<(FlowKey, FlowStats)>,
    sort_key: SortKey,
}

/// Concurrent aggregator guarded by a single exclusive lock. The packet
/// rate vastly exceeds the once-per-second sample rate, so a single
/// `Mutex` is sufficient — no lock-free structure is warranted here.
pub struct FlowTable {
    inner: Mutex<Inner>,
}

impl FlowTable {
    pub fn new(sort_key: SortKey) -> Self {
        Self {
            inner: Mutex::new(Inner {
                table: HashMap::new(),
                top_n: Vec::with_capacity(TOP_N),
                sort_key,
            }),
        }
    }

    /// Change the sort key. Takes effect on the next [`FlowTable::update`];
    /// does not reorder the current `top_n`.
    pub fn set_sort_key(&self, key: SortKey) {
        self.inner.lock().unwrap().sort_key = key;
    }

    /// Integrate one packet: `key` is the direction the packet was
    /// observed in, `wire_length` the IP-layer octet count to charge.
    pub fn update(&self, key: FlowKey, wire_length: u32) {
        let mut inner = self.inner.lock().unwrap();

        let (stored_key, stats) = if let Some(stats) = inner.table.get_mut(&key) {
            stats.tx_bytes += wire_length as u64;
            stats.tx_packets += 1;
            (key, *stats)
        } else {
            let reversed = key.swap_directions();
            if let Some(stats) = inner.table.get_mut(&reversed) {
                stats.rx_bytes += wire_length as u64;
                stats.rx_packets += 1;
                (reversed, *stats)
            } else {
                let stats = FlowStats {
                    rx_bytes: 0,
                    rx_packets: 0,
                    tx_bytes: wire_length as u64,
                    tx_packets: 1,
                };
                inner.table.insert(key.clone(), stats);
                (key, stats)
            }
        };

        inner.refresh_top(stored_key, stats);
    }

    /// Return the current top-N, ascending (least-busy first, per the
    /// rendering convention that consumers print last-to-first), and
    /// atomically clear all table state.
    pub fn drain(&self) -> Vec<(FlowKey, FlowStats)> {
        let mut inner = self.inner.lock().unwrap();
        let result = std::mem::take(&mut inner.top_n);
        inner.table.clear();
        result
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().unwrap().table.len()
    }
}

impl Inner {
    fn refresh_top(&mut self, key: FlowKey, stats: FlowStats) {
        if let Some(slot) = self.top_n.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = stats;
        } else {
            self.top_n.insert(0, (key, stats));
        }

        let sort_key = self.sort_key;
        self.top_n.sort_by_key(|entry| entry.1.projection(sort_key));

        while self.top_n.len() > TOP_N {
            self.top_n.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Protocol;
    use std::net::{IpAddr, Ipv4Addr};

    fn key(src: u8, dst: u8, src_port: u16, dst_port: u16) -> FlowKey {
        FlowKey::new(
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, src)),
            src_port,
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, dst)),
            dst_port,
            Protocol::Tcp,
        )
    }

    #[test]
    fn single_packet_then_drain() {
        let table = FlowTable::new(SortKey::Bytes);
        let k = key(1, 2, 443, 51000);
        table.update(k.clone(), 60);
        let drained = table.drain();
        assert_eq!(drained.len(), 1);
        let (got_key, stats) = &drained[0];
        assert_eq!(*got_key, k);
        assert_eq!(stats.tx_bytes, 60);
        assert_eq!(stats.tx_packets, 1);
        assert_eq!(stats.rx_bytes, 0);
        assert_eq!(stats.rx_packets, 0);
    }

    #[test]
    fn bidirectional_pair_accumulates_against_first_observed_orientation() {
        let table = FlowTable::new(SortKey::Bytes);
        let a = key(1, 2, 5000, 80); // src=10.0.0.1:5000 dst=10.0.0.2:80
        let b = a.swap_directions(); // src=10.0.0.2:80 dst=10.0.0.1:5000

        table.update(a.clone(), 100);
        table.update(b, 200);

        assert_eq!(table.len(), 1);
        let drained = table.drain();
        assert_eq!(drained.len(), 1);
        let (stored_key, stats) = &drained[0];
        assert_eq!(*stored_key, a);
        assert_eq!(stats.tx_bytes, 100);
        assert_eq!(stats.tx_packets, 1);
        assert_eq!(stats.rx_bytes, 200);
        assert_eq!(stats.rx_packets, 1);
    }

    #[test]
    fn key_canonicalisation_leaves_exactly_one_table_entry() {
        let table = FlowTable::new(SortKey::Bytes);
        let k = key(1, 2, 1111, 2222);
        table.update(k.clone(), 10);
        table.update(k.swap_directions(), 20);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn top_n_eviction_keeps_the_ten_largest_ascending() {
        let table = FlowTable::new(SortKey::Bytes);
        for i in 1..=12u8 {
            table.update(key(i, i.wrapping_add(100), 1000 + i as u16, 80), i as u32 * 10);
        }
        let drained = table.drain();
        assert_eq!(drained.len(), TOP_N);
        let bytes: Vec<u64> = drained.iter().map(|(_, s)| s.tx_bytes).collect();
        assert_eq!(bytes, vec![30, 40, 50, 60, 70, 80, 90, 100, 110, 120]);
        // ascending: last element is the busiest.
        assert!(bytes.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn drain_is_idempotent_on_empty_state_and_always_empties_the_table() {
        let table = FlowTable::new(SortKey::Bytes);
        assert!(table.drain().is_empty());
        assert!(table.drain().is_empty());

        table.update(key(1, 2, 80, 443), 10);
        assert_eq!(table.drain().len(), 1);
        assert_eq!(table.len(), 0);
        assert!(table.drain().is_empty());
    }

    #[test]
    fn packets_sort_key_uses_packet_counts_not_bytes() {
        let table = FlowTable::new(SortKey::Packets);
        let a = key(1, 2, 80, 1);
        let b = key(3, 4, 80, 2);
        // a: few big packets, b: many small packets.
        table.update(a.clone(), 9000);
        table.update(b.clone(), 1);
        table.update(b.clone(), 1);
        table.update(b.clone(), 1);

        let drained = table.drain();
        // ascending by packet count: a (1 packet) before b (3 packets).
        assert_eq!(drained[0].0, a);
        assert_eq!(drained[1].0, b);
    }

    #[test]
    fn ties_are_broken_by_stable_prepend_order() {
        // New entries are prepended then stable-sorted: among exact ties, the
        // most recently inserted lands nearer the front (the first-inserted
        // entry keeps its place at the busier/tail end).
        let table = FlowTable::new(SortKey::Bytes);
        let a = key(1, 2, 1, 1);
        let b = key(3, 4, 2, 2);
        table.update(a.clone(), 50);
        table.update(b.clone(), 50);
        let drained = table.drain();
        assert_eq!(drained[0].0, b);
        assert_eq!(drained[1].0, a);
    }

    #[test]
    fn update_followed_by_drain_never_exceeds_top_n() {
        let table = FlowTable::new(SortKey::Bytes);
        for i in 0..50u8 {
            table.update(key(i, i.wrapping_add(1), i as u16, 1), 1);
        }
        assert!(table.drain().len() <= TOP_N);
    }
}
