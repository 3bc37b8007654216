//! Core of the live terminal bandwidth monitor: frame dissection, the
//! bidirectional flow table, and the producer/consumer monitor contract.
//! Capture-source and terminal-rendering wiring live in the `netbwtop`
//! binary (`src/main.rs`, `src/capture.rs`) since they are external
//! collaborators, not part of the core.

pub mod cli;
pub mod config;
pub mod dissect;
pub mod error;
pub mod flowkey;
pub mod flowtable;
pub mod monitor;
pub mod protocol;
pub mod render;
