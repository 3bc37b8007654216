//! Tagged transport-protocol and address-family enums.
//!
//! Re-architected away from the string-typed protocol names the original
//! tool used: a small enum hashes and compares for free and only becomes
//! text at the render boundary.

use std::fmt;

/// Transport protocol carried by a flow. Any IP protocol number outside
/// this set causes the frame to be dropped before a [`crate::flowkey::FlowKey`]
/// is ever built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
    Icmp6,
}

impl Protocol {
    /// Map an IPv4/IPv6 protocol (next-header) number to a `Protocol`.
    /// `None` for anything not in {1, 6, 17, 58}.
    pub fn from_ip_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Protocol::Icmp),
            6 => Some(Protocol::Tcp),
            17 => Some(Protocol::Udp),
            58 => Some(Protocol::Icmp6),
            _ => None,
        }
    }

    /// True for the two protocols that carry a 4-octet port header.
    pub fn has_ports(self) -> bool {
        matches!(self, Protocol::Tcp | Protocol::Udp)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::Icmp => "icmp",
            Protocol::Icmp6 => "icmp6",
        };
        f.write_str(name)
    }
}

/// IP address family. Not part of a flow key's identity — derivable from
/// the address itself — but carried through to drive rendering (IPv6
/// endpoints are bracketed, IPv4 are not).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    V4,
    V6,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_mapping_matches_glossary() {
        assert_eq!(Protocol::from_ip_number(1), Some(Protocol::Icmp));
        assert_eq!(Protocol::from_ip_number(6), Some(Protocol::Tcp));
        assert_eq!(Protocol::from_ip_number(17), Some(Protocol::Udp));
        assert_eq!(Protocol::from_ip_number(58), Some(Protocol::Icmp6));
        assert_eq!(Protocol::from_ip_number(2), None);
        assert_eq!(Protocol::from_ip_number(0), None);
    }

    #[test]
    fn only_tcp_and_udp_have_ports() {
        assert!(Protocol::Tcp.has_ports());
        assert!(Protocol::Udp.has_ports());
        assert!(!Protocol::Icmp.has_ports());
        assert!(!Protocol::Icmp6.has_ports());
    }

    #[test]
    fn display_uses_lowercase_glossary_names() {
        assert_eq!(Protocol::Tcp.to_string(), "tcp");
        assert_eq!(Protocol::Udp.to_string(), "udp");
        assert_eq!(Protocol::Icmp.to_string(), "icmp");
        assert_eq!(Protocol::Icmp6.to_string(), "icmp6");
    }
}
