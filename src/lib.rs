//! Allocation of paired VXLAN segment ids and host-local VLAN tags for
//! overlay networks, persisted through a pluggable key/value store.
//!
//! A resource is split in two records: the declared capacity (config) and the
//! live free-lists (operational) derived from it. Allocation reads the
//! operational record, takes the lowest free id of each pool and writes the
//! record back; nothing is cached in memory between calls.
//!
//! Calls for one resource id must be serialized by the caller, either by
//! running a single writer or by wrapping the resource in [`QueuedResource`].

mod audit;
mod bitpool;
mod error;
mod lock;
mod pool_config;
mod queued;
mod resource;
mod state;
mod store;
mod vxlan;

pub use audit::find_orphans;
pub use bitpool::{BitPool, BitPoolError};
pub use error::ResourceError;
pub use lock::{InMemoryLock, InMemoryLockManager, Lock, LockError, LockManager};
pub use pool_config::{PoolSpec, VxlanPoolConfig, MAX_POOL_ID};
pub use queued::QueuedResource;
pub use resource::{Resource, TeardownReport, TeardownWarning};
pub use state::{
    config_key, config_prefix, oper_key, oper_prefix, CommonState, State, CONFIG_ROOT, OPER_ROOT,
};
pub use store::{InMemoryStateStore, StateStore, StateStoreExt, StoreError};
pub use vxlan::{
    AutoVxlanConfig, AutoVxlanOper, PoolUsage, VxlanConfigRecord, VxlanOperRecord, VxlanVlanPair,
    AUTO_VXLAN_RESOURCE,
};
