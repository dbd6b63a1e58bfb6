use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{AutoVxlanOper, PoolUsage, VxlanVlanPair, AUTO_VXLAN_RESOURCE, VLAN_POOL, VXLAN_POOL};
use crate::bitpool::BitPool;
use crate::error::ResourceError;
use crate::pool_config::VxlanPoolConfig;
use crate::resource::{Resource, TeardownReport, TeardownWarning};
use crate::state::{config_key, config_prefix, oper_key, CommonState, State};
use crate::store::{StateStore, StateStoreExt};

/// Persisted declared capacity. A set bit is an id that belongs to the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VxlanConfigRecord {
    pub id: String,
    pub vxlans: BitPool,
    pub local_vlans: BitPool,
}

/// Config side of an `auto-vxlan` resource, and the entry point for the
/// whole lifecycle: `init`, `allocate`, `deallocate`, `deinit`.
#[derive(Debug, Clone)]
pub struct AutoVxlanConfig {
    common: CommonState,
    pub record: VxlanConfigRecord,
}

impl AutoVxlanConfig {
    /// Handle for resource `id`. Touches nothing in the store.
    pub fn new(id: impl Into<String>, store: Arc<dyn StateStore>) -> Self {
        let common = CommonState::new(id, store);
        let record = VxlanConfigRecord {
            id: common.id.clone(),
            vxlans: BitPool::with_capacity(0),
            local_vlans: BitPool::with_capacity(0),
        };
        AutoVxlanConfig { common, record }
    }

    /// Handle for an existing resource, with its config read from the store.
    pub fn load(id: impl Into<String>, store: Arc<dyn StateStore>) -> Result<Self, ResourceError> {
        let mut resource = Self::new(id, store);
        let id = resource.common.id.clone();
        resource.read(&id)?;
        Ok(resource)
    }

    pub fn key(&self) -> String {
        config_key(AUTO_VXLAN_RESOURCE, &self.common.id)
    }

    /// Free id counts, read from the live state.
    pub fn available(&self) -> Result<PoolUsage, ResourceError> {
        let oper = AutoVxlanOper::load(self.common.clone())?;
        Ok(PoolUsage {
            free_vxlans: oper.record.free_vxlans.count_set(),
            free_vlans: oper.record.free_local_vlans.count_set(),
        })
    }

    fn ensure_absent(&self) -> Result<(), ResourceError> {
        match self.common.store.read_raw(&self.key()) {
            Ok(_) => Err(ResourceError::InvalidArgument(format!(
                "{} resource {} already exists",
                AUTO_VXLAN_RESOURCE, self.common.id
            ))),
            Err(err) if err.is_not_found() => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

impl State for AutoVxlanConfig {
    fn common(&self) -> &CommonState {
        &self.common
    }

    fn write(&self) -> Result<(), ResourceError> {
        self.common.store.write_state(&self.key(), &self.record)?;
        Ok(())
    }

    fn read(&mut self, id: &str) -> Result<(), ResourceError> {
        let record = self
            .common
            .store
            .read_state(&config_key(AUTO_VXLAN_RESOURCE, id))?;
        self.common.id = id.to_string();
        self.record = record;
        Ok(())
    }

    fn clear(&self) -> Result<(), ResourceError> {
        self.common.store.clear(&self.key())?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Self>, ResourceError> {
        let records: Vec<VxlanConfigRecord> = self
            .common
            .store
            .read_all_state(&config_prefix(AUTO_VXLAN_RESOURCE))?;
        Ok(records
            .into_iter()
            .map(|record| AutoVxlanConfig {
                common: self.common.with_id(record.id.clone()),
                record,
            })
            .collect())
    }
}

impl Resource for AutoVxlanConfig {
    type Config = VxlanPoolConfig;
    type Value = VxlanVlanPair;

    fn id(&self) -> &str {
        &self.common.id
    }

    fn description(&self) -> &'static str {
        AUTO_VXLAN_RESOURCE
    }

    /// Write the config record, then the derived operational record.
    ///
    /// There is no transaction across the two keys: if the second write fails
    /// the first is cleared again and the second write's error returned. A
    /// crash between the writes leaves a config without operational state,
    /// which `find_orphans` reports and `deinit` cleans up.
    fn init(&mut self, config: VxlanPoolConfig) -> Result<(), ResourceError> {
        if self.common.id.is_empty() {
            return Err(ResourceError::InvalidArgument(
                "resource id must not be empty".into(),
            ));
        }
        let vxlans = config.vxlans.to_bit_pool(VXLAN_POOL)?;
        let local_vlans = config.local_vlans.to_bit_pool(VLAN_POOL)?;
        if vxlans.is_empty() || local_vlans.is_empty() {
            return Err(ResourceError::InvalidArgument(format!(
                "{} resource {} declares an empty pool",
                AUTO_VXLAN_RESOURCE, self.common.id
            )));
        }
        self.ensure_absent()?;

        self.record = VxlanConfigRecord {
            id: self.common.id.clone(),
            vxlans,
            local_vlans,
        };
        self.write()?;

        let oper = AutoVxlanOper::derive(
            self.common.clone(),
            &self.record.vxlans,
            &self.record.local_vlans,
        );
        if let Err(err) = oper.write() {
            warn!(id = %self.common.id, error = %err, "operational write failed, rolling back config");
            if let Err(rollback) = self.clear() {
                warn!(id = %self.common.id, error = %rollback, "config rollback failed");
            }
            return Err(err);
        }

        info!(
            id = %self.common.id,
            vxlans = self.record.vxlans.count_set(),
            vlans = self.record.local_vlans.count_set(),
            "auto-vxlan resource created"
        );
        Ok(())
    }

    /// Clear the operational record, then the config record.
    ///
    /// Both clears are always attempted. A missing or unreadable operational
    /// record is reported in the returned warnings; a failing clear is
    /// returned as the error once both have been tried.
    fn deinit(&self) -> Result<TeardownReport, ResourceError> {
        let mut report = TeardownReport::default();
        let key = oper_key(AUTO_VXLAN_RESOURCE, &self.common.id);

        let oper_cleared = match AutoVxlanOper::load(self.common.clone()) {
            Ok(oper) => oper.clear(),
            Err(err) if err.is_not_found() => {
                report
                    .warnings
                    .push(TeardownWarning::OperMissing { key: key.clone() });
                Ok(())
            }
            Err(err) => {
                report.warnings.push(TeardownWarning::OperUnreadable {
                    key: key.clone(),
                    reason: err.to_string(),
                });
                self.common.store.clear(&key).map_err(ResourceError::from)
            }
        };
        let config_cleared = self.clear();

        for warning in &report.warnings {
            warn!(id = %self.common.id, "teardown: {}", warning);
        }
        oper_cleared?;
        config_cleared?;

        info!(id = %self.common.id, "auto-vxlan resource destroyed");
        Ok(report)
    }

    fn allocate(&self) -> Result<VxlanVlanPair, ResourceError> {
        let mut oper = AutoVxlanOper::load(self.common.clone())?;

        let vxlan = oper
            .record
            .free_vxlans
            .first_set()
            .ok_or(ResourceError::Exhausted { pool: VXLAN_POOL })?;
        // Nothing is written until both pools yield an id, so running out of
        // vlans here leaves the vxlan free in the store.
        let vlan = oper
            .record
            .free_local_vlans
            .first_set()
            .ok_or(ResourceError::Exhausted { pool: VLAN_POOL })?;

        oper.record.free_vxlans.clear(vxlan)?;
        oper.record.free_local_vlans.clear(vlan)?;
        oper.write()?;

        debug!(id = %self.common.id, vxlan, vlan, "allocated vxlan/vlan pair");
        Ok(VxlanVlanPair { vxlan, vlan })
    }

    /// Return `pair` to the free pools.
    ///
    /// Ids the config record does not declare are rejected before anything is
    /// written. Freeing an id that is already free is accepted and logged. If
    /// the write fails the ids stay allocated in the store; retry until it
    /// succeeds.
    fn deallocate(&self, pair: VxlanVlanPair) -> Result<(), ResourceError> {
        let mut oper = AutoVxlanOper::load(self.common.clone())?;
        let declared: VxlanConfigRecord = self.common.store.read_state(&self.key())?;
        if !declared.vxlans.is_set(pair.vxlan) {
            return Err(ResourceError::InvalidArgument(format!(
                "vxlan {} is not declared by {} resource {}",
                pair.vxlan, AUTO_VXLAN_RESOURCE, self.common.id
            )));
        }
        if !declared.local_vlans.is_set(pair.vlan) {
            return Err(ResourceError::InvalidArgument(format!(
                "vlan {} is not declared by {} resource {}",
                pair.vlan, AUTO_VXLAN_RESOURCE, self.common.id
            )));
        }

        let vxlan_was_free = oper.record.free_vxlans.set(pair.vxlan)?;
        let vlan_was_free = oper.record.free_local_vlans.set(pair.vlan)?;
        if vxlan_was_free || vlan_was_free {
            warn!(
                id = %self.common.id,
                vxlan = pair.vxlan,
                vlan = pair.vlan,
                vxlan_was_free,
                vlan_was_free,
                "deallocating ids that were already free"
            );
        }
        oper.write()?;

        debug!(id = %self.common.id, vxlan = pair.vxlan, vlan = pair.vlan, "released vxlan/vlan pair");
        Ok(())
    }
}
