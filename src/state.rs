//! State - Identity, store ownership and key layout shared by every resource.

use std::fmt;
use std::sync::Arc;

use crate::error::ResourceError;
use crate::store::StateStore;

/// Root of the declared-capacity namespace.
pub const CONFIG_ROOT: &str = "/netalloc/config/";

/// Root of the live-availability namespace.
pub const OPER_ROOT: &str = "/netalloc/oper/";

/// `<config-root>/<kind>/`
pub fn config_prefix(kind: &str) -> String {
    format!("{}{}/", CONFIG_ROOT, kind)
}

/// `<config-root>/<kind>/<id>`
pub fn config_key(kind: &str, id: &str) -> String {
    format!("{}{}", config_prefix(kind), id)
}

/// `<oper-root>/<kind>/`
pub fn oper_prefix(kind: &str) -> String {
    format!("{}{}/", OPER_ROOT, kind)
}

/// `<oper-root>/<kind>/<id>`
pub fn oper_key(kind: &str, id: &str) -> String {
    format!("{}{}", oper_prefix(kind), id)
}

/// Identity and store handle embedded in every resource.
///
/// Never persisted itself; each resource writes its own record type.
#[derive(Clone)]
pub struct CommonState {
    pub id: String,
    pub store: Arc<dyn StateStore>,
}

impl CommonState {
    pub fn new(id: impl Into<String>, store: Arc<dyn StateStore>) -> Self {
        CommonState {
            id: id.into(),
            store,
        }
    }

    /// Same store, different id.
    pub fn with_id(&self, id: impl Into<String>) -> Self {
        CommonState::new(id, Arc::clone(&self.store))
    }
}

impl fmt::Debug for CommonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommonState").field("id", &self.id).finish()
    }
}

/// A persisted piece of resource state.
pub trait State: Sized {
    fn common(&self) -> &CommonState;

    /// Persist the current in-memory value.
    fn write(&self) -> Result<(), ResourceError>;

    /// Replace the in-memory value with the record stored for `id`.
    fn read(&mut self, id: &str) -> Result<(), ResourceError>;

    /// Delete the stored record.
    fn clear(&self) -> Result<(), ResourceError>;

    /// Every record of this kind in the store.
    fn read_all(&self) -> Result<Vec<Self>, ResourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStateStore;

    #[test]
    fn keys_are_namespaced_by_kind() {
        assert_eq!(
            config_key("auto-vxlan", "tenant-a"),
            "/netalloc/config/auto-vxlan/tenant-a"
        );
        assert_eq!(
            oper_key("auto-vxlan", "tenant-a"),
            "/netalloc/oper/auto-vxlan/tenant-a"
        );
        assert!(config_key("auto-vxlan", "x").starts_with(&config_prefix("auto-vxlan")));
    }

    #[test]
    fn with_id_shares_store() {
        let store: Arc<dyn StateStore> = Arc::new(InMemoryStateStore::new());
        let a = CommonState::new("a", Arc::clone(&store));
        let b = a.with_id("b");
        assert_eq!(b.id, "b");
        assert!(Arc::ptr_eq(&a.store, &b.store));
    }
}
