//! Audit - Detect state left behind by a crash between creation writes.

use std::collections::BTreeSet;

use crate::error::ResourceError;
use crate::state::{config_prefix, oper_prefix};
use crate::store::StateStore;

/// Ids of `kind` whose config record exists without an operational record.
///
/// Such a resource cannot allocate (`NotFound`) and cannot be re-created
/// until its config is cleared; `deinit` handles both cases.
pub fn find_orphans(store: &dyn StateStore, kind: &str) -> Result<Vec<String>, ResourceError> {
    let config_prefix = config_prefix(kind);
    let oper_prefix = oper_prefix(kind);

    let live: BTreeSet<String> = store
        .read_all_raw(&oper_prefix)?
        .into_iter()
        .filter_map(|(key, _)| key.strip_prefix(&oper_prefix).map(str::to_string))
        .collect();

    Ok(store
        .read_all_raw(&config_prefix)?
        .into_iter()
        .filter_map(|(key, _)| key.strip_prefix(&config_prefix).map(str::to_string))
        .filter(|id| !live.contains(id))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{config_key, oper_key};
    use crate::store::InMemoryStateStore;

    #[test]
    fn config_without_oper_is_orphaned() {
        let store = InMemoryStateStore::new();
        store.write_raw(&config_key("auto-vxlan", "a"), vec![]).unwrap();
        store.write_raw(&oper_key("auto-vxlan", "a"), vec![]).unwrap();
        store.write_raw(&config_key("auto-vxlan", "b"), vec![]).unwrap();
        store.write_raw(&config_key("other", "c"), vec![]).unwrap();

        assert_eq!(find_orphans(&store, "auto-vxlan").unwrap(), vec!["b"]);
    }

    #[test]
    fn empty_store_has_no_orphans() {
        let store = InMemoryStateStore::new();
        assert!(find_orphans(&store, "auto-vxlan").unwrap().is_empty());
    }
}
