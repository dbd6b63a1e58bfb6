//! Resource - The contract every allocatable resource kind implements.

use std::fmt;

use crate::error::ResourceError;

/// An allocatable resource with a declared capacity and live availability.
///
/// `init` declares the capacity and derives the live state, `deinit` tears
/// both down, and `allocate`/`deallocate` move values in and out of the live
/// state.
///
/// Implementations do a read-modify-write against the store on every
/// `allocate`/`deallocate` with no version check. Callers must serialize all
/// calls for a given resource id (single writer, or an external lock such as
/// [`QueuedResource`](crate::QueuedResource)); two unserialized concurrent
/// calls can hand out the same value twice.
pub trait Resource {
    /// Declared capacity handed to `init`.
    type Config;
    /// What `allocate` hands out and `deallocate` takes back.
    type Value;

    fn id(&self) -> &str;

    /// Stable kind string used to namespace storage keys.
    fn description(&self) -> &'static str;

    fn init(&mut self, config: Self::Config) -> Result<(), ResourceError>;

    fn deinit(&self) -> Result<TeardownReport, ResourceError>;

    fn allocate(&self) -> Result<Self::Value, ResourceError>;

    fn deallocate(&self, value: Self::Value) -> Result<(), ResourceError>;
}

/// Something teardown noticed and stepped over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownWarning {
    /// The operational record was already gone.
    OperMissing { key: String },
    /// The operational record could not be read; its key was cleared anyway.
    OperUnreadable { key: String, reason: String },
}

impl fmt::Display for TeardownWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeardownWarning::OperMissing { key } => {
                write!(f, "operational state {} already absent", key)
            }
            TeardownWarning::OperUnreadable { key, reason } => {
                write!(f, "operational state {} unreadable: {}", key, reason)
            }
        }
    }
}

/// Outcome of a successful `deinit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub warnings: Vec<TeardownWarning>,
}

impl TeardownReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
