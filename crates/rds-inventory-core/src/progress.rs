//! Progress reporting for inventory runs
//!
//! The run loop emits a [`ProgressEvent`] at each account and region
//! boundary. The CLI turns these into console lines; library callers can
//! pass `None` and rely on tracing instead.

/// Progress events emitted during a run
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// About to resolve the account behind a profile
    AccountStarted { profile: String },
    /// Account identity resolved
    AccountResolved {
        profile: String,
        account_id: String,
        alias: String,
    },
    /// About to list resources in a region
    RegionStarted { profile: String, region: String },
    /// Region listed
    RegionCompleted {
        profile: String,
        region: String,
        records: usize,
    },
}

/// Callback type for progress updates
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

/// Helper to emit progress events
pub(crate) fn emit(callback: &Option<ProgressCallback>, event: ProgressEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}
