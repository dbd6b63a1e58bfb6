use serde::{Deserialize, Serialize};

use super::AUTO_VXLAN_RESOURCE;
use crate::bitpool::BitPool;
use crate::error::ResourceError;
use crate::state::{oper_key, oper_prefix, CommonState, State};
use crate::store::StateStoreExt;

/// Persisted live availability. A set bit is a free id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VxlanOperRecord {
    pub id: String,
    pub free_vxlans: BitPool,
    pub free_local_vlans: BitPool,
}

/// Operational side of an `auto-vxlan` resource.
///
/// Always read fresh from the store before use and written straight back;
/// nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct AutoVxlanOper {
    common: CommonState,
    pub record: VxlanOperRecord,
}

impl AutoVxlanOper {
    /// Operational state in which every declared id is free.
    pub fn derive(common: CommonState, vxlans: &BitPool, local_vlans: &BitPool) -> Self {
        let record = VxlanOperRecord {
            id: common.id.clone(),
            free_vxlans: vxlans.clone(),
            free_local_vlans: local_vlans.clone(),
        };
        AutoVxlanOper { common, record }
    }

    /// Read the operational state for `common.id`.
    pub fn load(common: CommonState) -> Result<Self, ResourceError> {
        let key = oper_key(AUTO_VXLAN_RESOURCE, &common.id);
        let record = common.store.read_state(&key)?;
        Ok(AutoVxlanOper { common, record })
    }

    pub fn key(&self) -> String {
        oper_key(AUTO_VXLAN_RESOURCE, &self.common.id)
    }
}

impl State for AutoVxlanOper {
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
            .read_state(&oper_key(AUTO_VXLAN_RESOURCE, id))?;
        self.common.id = id.to_string();
        self.record = record;
        Ok(())
    }

    fn clear(&self) -> Result<(), ResourceError> {
        self.common.store.clear(&self.key())?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Self>, ResourceError> {
        let records: Vec<VxlanOperRecord> = self
            .common
            .store
            .read_all_state(&oper_prefix(AUTO_VXLAN_RESOURCE))?;
        Ok(records
            .into_iter()
            .map(|record| AutoVxlanOper {
                common: self.common.with_id(record.id.clone()),
                record,
            })
            .collect())
    }
}
