// # Session State
//
// Per-authenticator state that lives for one host invocation.

pub mod tracker;

pub use tracker::{RecordTracker, TrackedRecord};
