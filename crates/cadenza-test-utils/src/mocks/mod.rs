//! Mock implementations of Cadenza interfaces.
//!
//! These mocks let tests script the activity dispatch boundary precisely and
//! verify how often, and with which arguments, the interpreter calls it.

pub mod dispatcher;

pub use dispatcher::*;
