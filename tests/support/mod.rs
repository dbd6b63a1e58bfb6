#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use netalloc::{
    AutoVxlanConfig, InMemoryStateStore, Resource, StateStore, StoreError, VxlanPoolConfig,
};

/// Route library logs to the test harness; `RUST_LOG=netalloc=debug` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
struct Faults {
    writes: Vec<String>,
    reads: Vec<String>,
    clears: Vec<String>,
}

/// In-memory store that fails chosen operations on keys under a prefix.
#[derive(Clone, Default)]
pub struct FaultyStore {
    pub inner: InMemoryStateStore,
    faults: Arc<Mutex<Faults>>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes_to(&self, prefix: &str) {
        self.faults.lock().unwrap().writes.push(prefix.to_string());
    }

    pub fn fail_reads_of(&self, prefix: &str) {
        self.faults.lock().unwrap().reads.push(prefix.to_string());
    }

    pub fn fail_clears_of(&self, prefix: &str) {
        self.faults.lock().unwrap().clears.push(prefix.to_string());
    }

    pub fn heal(&self) {
        *self.faults.lock().unwrap() = Faults::default();
    }

    fn check(&self, prefixes: impl Fn(&Faults) -> &Vec<String>, key: &str) -> Result<(), StoreError> {
        let faults = self.faults.lock().unwrap();
        if prefixes(&faults).iter().any(|p| key.starts_with(p.as_str())) {
            return Err(StoreError::Backend(format!("injected failure on {}", key)));
        }
        Ok(())
    }
}

impl StateStore for FaultyStore {
    fn write_raw(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.check(|f| &f.writes, key)?;
        self.inner.write_raw(key, value)
    }

    fn read_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.check(|f| &f.reads, key)?;
        self.inner.read_raw(key)
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.check(|f| &f.clears, key)?;
        self.inner.clear(key)
    }

    fn read_all_raw(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        self.inner.read_all_raw(prefix)
    }
}

/// A created `auto-vxlan` resource over a fresh in-memory store.
pub fn vxlan_resource(id: &str, vxlans: usize, vlans: usize) -> (InMemoryStateStore, AutoVxlanConfig) {
    let store = InMemoryStateStore::new();
    let mut resource = AutoVxlanConfig::new(id, Arc::new(store.clone()));
    resource
        .init(VxlanPoolConfig::with_capacity(vxlans, vlans))
        .unwrap();
    (store, resource)
}
