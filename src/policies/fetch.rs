//! # Fetch coordination for the descriptor cache.

/// How [`AppDescriptorCache`](crate::AppDescriptorCache) behaves when several
/// callers miss the cache at the same time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FetchMode {
    /// Each caller that observes an absent descriptor issues its own fetch (default).
    ///
    /// The first successful result is kept; later results are discarded.
    #[default]
    Uncoordinated,
    /// Callers that miss while a fetch is already running wait for that fetch
    /// and share its outcome, success or failure.
    SingleFlight,
}
