//! Pure, caplen-checked walk of one captured frame: Ethernet -> IPv4/IPv6
//! -> TCP/UDP/ICMP. No state, no I/O, never panics on attacker-controlled
//! bytes — truncation and anything unrecognised simply yields [`Skip`].

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::flowkey::FlowKey;
use crate::protocol::Protocol;

const ETHERNET_HEADER_LEN: usize = 14;
const IPV4_MIN_HEADER_LEN: usize = 20;
const IPV6_HEADER_LEN: usize = 40;
const ETHERTYPE_IPV4: u16 = 0x0800;
const ETHERTYPE_IPV6: u16 = 0x86DD;

/// The frame was truncated, carried an unrecognised EtherType/protocol, or
/// otherwise fell outside what this dissector understands. Never an error
/// in the `std::error::Error` sense — per-frame oddities are routine on a
/// live capture, not exceptional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skip;

pub type DissectResult = Result<(FlowKey, u32), Skip>;

/// Dissect one captured frame. `frame` is exactly the `caplen` octets the
/// capture source delivered — possibly fewer than the on-the-wire length.
pub fn dissect(frame: &[u8]) -> DissectResult {
    let caplen = frame.len();
    if caplen < ETHERNET_HEADER_LEN {
        return Err(Skip);
    }
    let ether_type = u16::from_be_bytes([frame[12], frame[13]]);
    let ip_bytes = &frame[ETHERNET_HEADER_LEN..];

    match ether_type {
        ETHERTYPE_IPV4 => dissect_ipv4(ip_bytes),
        ETHERTYPE_IPV6 => dissect_ipv6(ip_bytes),
        _ => Err(Skip),
    }
}

fn dissect_ipv4(buf: &[u8]) -> DissectResult {
    if buf.len() < IPV4_MIN_HEADER_LEN {
        return Err(Skip);
    }

    let ihl = ((buf[0] & 0x0F) as usize) * 4;
    if ihl < IPV4_MIN_HEADER_LEN {
        return Err(Skip);
    }
    let total_len = u16::from_be_bytes([buf[2], buf[3]]) as u32;
    let protocol_number = buf[9];
    let src_addr = Ipv4Addr::new(buf[12], buf[13], buf[14], buf[15]);
    let dst_addr = Ipv4Addr::new(buf[16], buf[17], buf[18], buf[19]);

    let protocol = match Protocol::from_ip_number(protocol_number) {
        Some(p) => p,
        None => return Err(Skip),
    };

    let (src_port, dst_port) = if protocol.has_ports() {
        match read_ports(buf, ihl) {
            Some(ports) => ports,
            None => return Err(Skip),
        }
    } else {
        (0, 0)
    };

    let key = FlowKey::new(
        IpAddr::V4(src_addr),
        src_port,
        IpAddr::V4(dst_addr),
        dst_port,
        protocol,
    );
    Ok((key, total_len))
}

fn dissect_ipv6(buf: &[u8]) -> DissectResult {
    if buf.len() < IPV6_HEADER_LEN {
        return Err(Skip);
    }

    let payload_len = u16::from_be_bytes([buf[4], buf[5]]) as u32;
    let next_header = buf[6];
    let src_addr = Ipv6Addr::from(<[u8; 16]>::try_from(&buf[8..24]).unwrap());
    let dst_addr = Ipv6Addr::from(<[u8; 16]>::try_from(&buf[24..40]).unwrap());
    let wire_length = payload_len + IPV6_HEADER_LEN as u32;

    // ICMP6 carries no ports but is a recognised terminal protocol; any
    // other next-header (extension headers are not followed, per Non-goals)
    // that isn't TCP/UDP/ICMP6 is dropped.
    let protocol = match Protocol::from_ip_number(next_header) {
        Some(p) => p,
        None => return Err(Skip),
    };
    if matches!(protocol, Protocol::Icmp) {
        // ICMP (v4) proto number reused as next-header is not meaningful for v6.
        return Err(Skip);
    }

    let (src_port, dst_port) = if protocol.has_ports() {
        match read_ports(buf, IPV6_HEADER_LEN) {
            Some(ports) => ports,
            None => return Err(Skip),
        }
    } else {
        (0, 0)
    };

    let key = FlowKey::new(
        IpAddr::V6(src_addr),
        src_port,
        IpAddr::V6(dst_addr),
        dst_port,
        protocol,
    );
    Ok((key, wire_length))
}

fn read_ports(buf: &[u8], offset: usize) -> Option<(u16, u16)> {
    if buf.len() < offset + 4 {
        return None;
    }
    let src_port = u16::from_be_bytes([buf[offset], buf[offset + 1]]);
    let dst_port = u16::from_be_bytes([buf[offset + 2], buf[offset + 3]]);
    Some((src_port, dst_port))
}
