//! Auto-VXLAN - Paired VXLAN/VLAN id allocation.
//!
//! Each network gets a global VXLAN segment id plus a host-local VLAN tag.
//! The declared universe of both lives in an [`AutoVxlanConfig`] record; the
//! live free-lists live in a separate [`AutoVxlanOper`] record derived from
//! it. Allocation always takes the lowest free id of each pool, so identical
//! call sequences hand out identical pairs and low ids are reused first.
//!
//! ## Example
//!
//! ```ignore
//! use netalloc::{AutoVxlanConfig, InMemoryStateStore, Resource, VxlanPoolConfig};
//!
//! let store = Arc::new(InMemoryStateStore::new());
//! let mut pool = AutoVxlanConfig::new("tenant-a", store);
//! pool.init(VxlanPoolConfig::with_capacity(3, 2))?;
//!
//! let pair = pool.allocate()?;        // VxlanVlanPair { vxlan: 0, vlan: 0 }
//! pool.deallocate(pair)?;
//! pool.deinit()?;
//! ```

mod config;
mod oper;

use serde::{Deserialize, Serialize};

pub use config::{AutoVxlanConfig, VxlanConfigRecord};
pub use oper::{AutoVxlanOper, VxlanOperRecord};

/// Resource kind; also the key segment under both state roots.
pub const AUTO_VXLAN_RESOURCE: &str = "auto-vxlan";

pub(crate) const VXLAN_POOL: &str = "vxlans";
pub(crate) const VLAN_POOL: &str = "local vlans";

/// A VXLAN id and the local VLAN tag paired with it.
///
/// Not persisted anywhere by the allocator: whoever receives it must hand it
/// back to `deallocate`, or the pair stays allocated until the resource is
/// destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VxlanVlanPair {
    pub vxlan: usize,
    pub vlan: usize,
}

impl VxlanVlanPair {
    pub fn new(vxlan: usize, vlan: usize) -> Self {
        VxlanVlanPair { vxlan, vlan }
    }
}

/// Free id counts of a live resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolUsage {
    pub free_vxlans: usize,
    pub free_vlans: usize,
}
