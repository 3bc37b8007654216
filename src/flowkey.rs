//! Identity of a unidirectional conversation endpoint pair.

use std::net::IpAddr;

use crate::protocol::{AddressFamily, Protocol};

/// The identity of a flow as observed from one direction.
///
/// `family` is carried for rendering only — it is derivable from
/// `src_addr`/`dst_addr` and deliberately excluded from equality and
/// hashing so the table can't split one conversation across two entries
/// that differ only in how the family tag happened to be set.
#[derive(Debug, Clone)]
pub struct FlowKey {
    pub src_addr: IpAddr,
    pub src_port: u16,
    pub dst_addr: IpAddr,
    pub dst_port: u16,
    pub protocol: Protocol,
    pub family: AddressFamily,
}

impl FlowKey {
    pub fn new(
        src_addr: IpAddr,
        src_port: u16,
        dst_addr: IpAddr,
        dst_port: u16,
        protocol: Protocol,
    ) -> Self {
        let family = match src_addr {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        };
        Self {
            src_addr,
            src_port,
            dst_addr,
            dst_port,
            protocol,
            family,
        }
    }

    /// The same conversation, viewed from the other endpoint.
    pub fn swap_directions(&self) -> Self {
        Self::new(
            self.dst_addr,
            self.dst_port,
            self.src_addr,
            self.src_port,
            self.protocol,
        )
    }

    /// Unbracketed textual form of `src_addr:src_port` (IPv6 bracketed per
    /// family at render time via [`FlowKey::format_endpoint`]).
    pub fn format_src(&self) -> String {
        Self::format_endpoint(self.src_addr, self.src_port, self.family)
    }

    pub fn format_dst(&self) -> String {
        Self::format_endpoint(self.dst_addr, self.dst_port, self.family)
    }

    fn format_endpoint(addr: IpAddr, port: u16, family: AddressFamily) -> String {
        match family {
            AddressFamily::V4 => format!("{addr}:{port}"),
            AddressFamily::V6 => format!("[{addr}]:{port}"),
        }
    }
}

impl PartialEq for FlowKey {
    fn eq(&self, other: &Self) -> bool {
        self.src_addr == other.src_addr
            && self.src_port == other.src_port
            && self.dst_addr == other.dst_addr
            && self.dst_port == other.dst_port
            && self.protocol == other.protocol
    }
}

impl Eq for FlowKey {}

impl std::hash::Hash for FlowKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.src_addr.hash(state);
        self.src_port.hash(state);
        self.dst_addr.hash(state);
        self.dst_port.hash(state);
        self.protocol.hash(state);
    }
}
