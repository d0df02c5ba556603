//! Netwatch Types - Core types for local network presence monitoring
//!
//! Netwatch continuously observes a host's network state (visible wireless
//! networks and active local interface addresses) and raises alerts when a
//! previously unseen address appears. This crate holds the data model shared
//! between the monitor core and its consumers.
//!
//! ## Architectural Boundaries
//!
//! - **netwatch-types** owns: immutable snapshot, connection, and alert records
//! - **netwatch-monitor** owns: diffing, alert generation, the polling loop
//! - **netwatch-daemon** owns: platform providers, presentation, process wiring
//!
//! ## Key Concepts
//!
//! - **NetworkSnapshot**: one point-in-time capture of wireless networks and
//!   active connection addresses
//! - **ConnectionRecord**: one active local address; diff identity is the
//!   address alone
//! - **Alert**: a record describing one newly observed connection

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod alert;
pub mod snapshot;

// Re-export main types
pub use alert::Alert;
pub use snapshot::{ConnectionRecord, NetworkSnapshot};
