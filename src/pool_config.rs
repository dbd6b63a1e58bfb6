//! PoolConfig - Administrator-facing declaration of a pool's ids.
//!
//! A pool is declared either by capacity (ids `0..capacity`) or by an id range
//! list such as `"1-4094,5000"`. In both cases bit index == id.
//!
//! ```json
//! { "vxlans": "10000-10999", "localVlans": { "capacity": 4094 } }
//! ```

use serde::{Deserialize, Serialize};

use crate::bitpool::BitPool;
use crate::error::ResourceError;

/// Ids at or above this are refused; 2^24 is the VXLAN segment id space.
pub const MAX_POOL_ID: usize = 1 << 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PoolSpec {
    Capacity { capacity: usize },
    Ranges(String),
}

impl PoolSpec {
    pub fn capacity(capacity: usize) -> Self {
        PoolSpec::Capacity { capacity }
    }

    pub fn ranges(ranges: impl Into<String>) -> Self {
        PoolSpec::Ranges(ranges.into())
    }

    /// Build the declared pool. `what` names the pool in error messages.
    pub fn to_bit_pool(&self, what: &str) -> Result<BitPool, ResourceError> {
        match self {
            PoolSpec::Capacity { capacity } => {
                if *capacity == 0 || *capacity > MAX_POOL_ID {
                    return Err(ResourceError::InvalidArgument(format!(
                        "{} capacity {} outside 1..={}",
                        what, capacity, MAX_POOL_ID
                    )));
                }
                Ok(BitPool::full(*capacity))
            }
            PoolSpec::Ranges(text) => {
                let ranges = parse_ranges(text)
                    .map_err(|e| ResourceError::InvalidArgument(format!("{}: {}", what, e)))?;
                let capacity = ranges.iter().map(|(_, hi)| hi + 1).max().unwrap_or(0);
                let mut pool = BitPool::with_capacity(capacity);
                for (lo, hi) in ranges {
                    for id in lo..=hi {
                        pool.set(id)?;
                    }
                }
                Ok(pool)
            }
        }
    }
}

/// Declared capacity of an `auto-vxlan` resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VxlanPoolConfig {
    pub vxlans: PoolSpec,
    pub local_vlans: PoolSpec,
}

impl VxlanPoolConfig {
    pub fn new(vxlans: PoolSpec, local_vlans: PoolSpec) -> Self {
        VxlanPoolConfig {
            vxlans,
            local_vlans,
        }
    }

    /// Ids `0..vxlans` and `0..vlans`.
    pub fn with_capacity(vxlans: usize, vlans: usize) -> Self {
        Self::new(PoolSpec::capacity(vxlans), PoolSpec::capacity(vlans))
    }

    pub fn from_json(json: &str) -> Result<Self, ResourceError> {
        serde_json::from_str(json)
            .map_err(|e| ResourceError::InvalidArgument(format!("pool config: {}", e)))
    }
}

/// Parse `"a-b,c,d-e"` into inclusive `(lo, hi)` pairs.
fn parse_ranges(text: &str) -> Result<Vec<(usize, usize)>, String> {
    let mut ranges = Vec::new();
    for part in text.split(',').map(str::trim) {
        if part.is_empty() {
            return Err(format!("empty range in {:?}", text));
        }
        let (lo, hi) = match part.split_once('-') {
            Some((lo, hi)) => (parse_id(lo)?, parse_id(hi)?),
            None => {
                let id = parse_id(part)?;
                (id, id)
            }
        };
        if lo > hi {
            return Err(format!("range {} is backwards", part));
        }
        ranges.push((lo, hi));
    }
    Ok(ranges)
}

fn parse_id(text: &str) -> Result<usize, String> {
    let id: usize = text
        .trim()
        .parse()
        .map_err(|_| format!("{:?} is not an id", text.trim()))?;
    if id >= MAX_POOL_ID {
        return Err(format!("id {} exceeds {}", id, MAX_POOL_ID - 1));
    }
    Ok(id)
}
