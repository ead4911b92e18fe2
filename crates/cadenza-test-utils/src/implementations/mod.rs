//! Test implementations (fakes) of Cadenza interfaces.
//!
//! Unlike mocks, fakes carry working behavior: the recording dispatcher answers
//! from a script and remembers every call, and the concurrency probe measures
//! how many tasks were in flight at once.

mod concurrency_probe;
mod recording_dispatcher;

pub use concurrency_probe::{ConcurrencyProbe, ProbeGuard};
pub use recording_dispatcher::{DispatchCall, RecordingDispatcher};
