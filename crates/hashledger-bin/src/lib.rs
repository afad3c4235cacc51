//! # Hashledger Host
//!
//! Startup wiring and the line-oriented invocation loop behind the
//! `hashledger` binary.

#![deny(unsafe_code)]

pub mod initialization;
pub mod shim;
