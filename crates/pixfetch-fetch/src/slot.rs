//! Configure-once holder for a [`Fetcher`].

use std::sync::OnceLock;

use tracing::warn;

use crate::{FetchError, Fetcher, FetcherConfig};

static GLOBAL: FetcherSlot = FetcherSlot::new();

/// A slot that can be configured with a [`Fetcher`] exactly once.
///
/// Most callers own their [`Fetcher`] directly. The slot exists for code that
/// wants one fetcher for the lifetime of a process, see [`FetcherSlot::global`].
///
/// # Example
///
/// ```
/// use pixfetch_fetch::{FetchError, FetcherConfig, FetcherSlot};
///
/// # fn main() -> Result<(), FetchError> {
/// let slot = FetcherSlot::new();
/// assert!(matches!(slot.get(), Err(FetchError::NotConfigured)));
///
/// slot.configure(FetcherConfig::new("42_secret")?)?;
/// assert_eq!(slot.get()?.user_id(), 42);
/// assert!(!slot.try_configure(FetcherConfig::new("43_secret")?));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct FetcherSlot {
    cell: OnceLock<Fetcher>,
}

impl FetcherSlot {
    /// Creates an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Returns the process-wide slot.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Builds a fetcher from `config` and stores it.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::AlreadyConfigured`] if the slot already holds a
    /// fetcher, or the error from [`Fetcher::new`].
    pub fn configure(&self, config: FetcherConfig) -> Result<&Fetcher, FetchError> {
        if self.is_configured() {
            return Err(FetchError::AlreadyConfigured);
        }
        self.cell
            .set(Fetcher::new(config)?)
            .map_err(|_| FetchError::AlreadyConfigured)?;
        self.get()
    }

    /// Like [`FetcherSlot::configure`], returning whether this call
    /// configured the slot.
    pub fn try_configure(&self, config: FetcherConfig) -> bool {
        match self.configure(config) {
            Ok(_) => true,
            Err(FetchError::AlreadyConfigured) => false,
            Err(e) => {
                warn!(error = %e, "fetcher configuration failed");
                false
            }
        }
    }

    /// Returns the configured fetcher.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotConfigured`] before the slot is configured.
    pub fn get(&self) -> Result<&Fetcher, FetchError> {
        self.cell.get().ok_or(FetchError::NotConfigured)
    }

    /// Returns true once the slot holds a fetcher.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.cell.get().is_some()
    }
}
