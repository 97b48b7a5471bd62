//! Platform-specific location implementations.

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod linux;
        pub(crate) use linux::{current, is_enabled, last_known};
    } else {
        // Fallback for platforms without a location backend.
        use crate::{CachedQuery, Coordinates, CurrentQuery, LocationError};

        pub(crate) async fn is_enabled() -> Result<bool, LocationError> {
            Ok(false)
        }

        pub(crate) async fn last_known(
            _query: &CachedQuery,
        ) -> Result<Option<Coordinates>, LocationError> {
            Ok(None)
        }

        pub(crate) async fn current(_query: &CurrentQuery) -> Result<Coordinates, LocationError> {
            Err(LocationError::NotAvailable)
        }
    }
}
