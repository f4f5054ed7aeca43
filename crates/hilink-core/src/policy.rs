//! Authorization policy for control-class request kinds

use crate::CollectDataType;

/// Static partition of request kinds into read-only and control.
///
/// Read-only kinds are always permitted. Control kinds are permitted only
/// when control was enabled at process start; the flag never changes after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessPolicy {
    control_enabled: bool,
}

impl AccessPolicy {
    pub fn new(control_enabled: bool) -> Self {
        Self { control_enabled }
    }

    pub fn control_enabled(&self) -> bool {
        self.control_enabled
    }

    /// Whether a request of this kind may be dispatched
    pub fn permits(&self, kind: CollectDataType) -> bool {
        kind.is_read_only() || self.control_enabled
    }
}
