/// Activity traits, dispatch boundary and registry
pub mod activity;

/// Shared variable store
pub mod bindings;

/// Execution events and handlers
pub mod events;
