//! Provide the pure, shared pieces of the framejudge protocol.
//!
//! Both the harness generator and the Rust runtime linked into generated harnesses depend on this crate, so the two
//! sides agree on:
//! - the separator frame and how a sink history is split on it ([`framing`]),
//! - what a secret token looks like ([`token`]),
//! - the record envelope written to the value and exception sinks ([`payload`], behind the `json` feature),
//! - the target-language vocabulary and capability tables ([`lang`]).
//!
//! ## Notes
//!
//! - This crate does **no IO** and holds no global state.
//! - Without the `json` feature the crate has zero dependencies.

pub mod framing;
pub mod lang;
pub mod token;

#[cfg(feature = "json")]
pub mod payload;

pub use framing::{frame, split_frames};
pub use token::{Token, TokenError};
