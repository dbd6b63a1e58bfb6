//! Store - Pluggable key/value persistence for resource state.
//!
//! The allocator never talks to a concrete database. Every resource holds an
//! `Arc<dyn StateStore>` and goes through the four operations below; any
//! backend that can put, get, delete and list-by-prefix byte blobs can be
//! plugged in (etcd, consul, a SQL table, the in-memory store for tests).
//!
//! There are no multi-key transactions and no compare-and-swap here. Callers
//! that need atomicity across keys compensate themselves.
//!
//! ## Example
//!
//! ```ignore
//! use netalloc::{InMemoryStateStore, StateStoreExt};
//!
//! let store = InMemoryStateStore::new();
//! store.write_state("/netalloc/config/auto-vxlan/default", &record)?;
//! let loaded: Record = store.read_state("/netalloc/config/auto-vxlan/default")?;
//! ```

mod ext;
mod in_memory;
mod store;

pub use ext::StateStoreExt;
pub use in_memory::InMemoryStateStore;
pub use store::{StateStore, StoreError};
