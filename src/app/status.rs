//! Status service: read side of the shared state.
//!
//! Implements [`SnapshotProvider`] for the HTTP endpoint.  Each call
//! copies the latest published generation out of [`SharedState`] and
//! annotates it with threshold descriptions; it never waits on the
//! sampler beyond the short critical section of the copy.

use crate::snapshot::SnapshotRecord;
use crate::state::SharedState;
use crate::thresholds::Thresholds;

use super::ports::SnapshotProvider;

#[derive(Clone)]
pub struct StatusService {
    state: SharedState,
    thresholds: Thresholds,
}

impl StatusService {
    pub fn new(state: SharedState, thresholds: Thresholds) -> Self {
        Self { state, thresholds }
    }
}

impl SnapshotProvider for StatusService {
    fn snapshot(&self) -> SnapshotRecord {
        SnapshotRecord::from_state(&self.state.load(), &self.thresholds)
    }
}
