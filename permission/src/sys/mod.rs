//! Platform-specific permission implementations.

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod linux;
        pub(crate) use linux::{request, status};
    } else {
        // Fallback for platforms without a location permission backend.
        use crate::{PermissionError, PermissionState};

        pub(crate) async fn status() -> PermissionState {
            PermissionState::BLOCKED
        }

        pub(crate) async fn request() -> Result<PermissionState, PermissionError> {
            Err(PermissionError::NotSupported)
        }
    }
}
