use super::NetworkModel;
use indexmap::IndexMap;

/// Explicit by-name registry of networks, passed to any component that
/// needs cross-network lookup (for example a validator consulting a
/// companion roadway network). Never a process-wide singleton: callers own
/// the registry and hand out references.
#[derive(Debug, Default)]
pub struct NetworkRegistry {
    networks: IndexMap<String, NetworkModel>,
}

impl NetworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, network: NetworkModel) {
        self.networks.insert(name.into(), network);
    }

    pub fn get(&self, name: &str) -> Option<&NetworkModel> {
        self.networks.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut NetworkModel> {
        self.networks.get_mut(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.networks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::NetworkRegistry;
    use crate::network::NetworkModel;

    #[test]
    fn test_insert_and_lookup() {
        let mut registry = NetworkRegistry::new();
        registry.insert("base", NetworkModel::new());
        registry.insert("build", NetworkModel::new());
        assert!(registry.get("base").is_some());
        assert!(registry.get("roadway").is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["base", "build"]);
    }
}
