/// Where a result handed out by [`crate::DataService`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataOrigin {
    /// Freshly fetched from the remote service (and persisted to the snapshot).
    Remote,
    /// The remote fetch failed or came back empty; served from the local snapshot.
    Snapshot,
}

/// A result together with the origin it was served from.
///
/// Callers use [`Fetched::is_fallback`] to decide whether to tell the user that
/// cached data is shown instead of live data.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub origin: DataOrigin,
}

impl<T> Fetched<T> {
    pub fn remote(data: T) -> Self {
        Self {
            data,
            origin: DataOrigin::Remote,
        }
    }

    pub fn snapshot(data: T) -> Self {
        Self {
            data,
            origin: DataOrigin::Snapshot,
        }
    }

    /// `true` when the data was served from the local snapshot (offline mode).
    pub fn is_fallback(&self) -> bool {
        self.origin == DataOrigin::Snapshot
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}
