use std::collections::{BTreeMap, HashMap};

use platesearch_core::error::CoordinateError;
use platesearch_core::traits::NameResolver;
use platesearch_core::types::SkyPosition;

/// Resolves names from a fixed table. Lookup ignores case and surrounding
/// whitespace.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    objects: HashMap<String, SkyPosition>,
}

fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

impl StaticResolver {
    pub fn new(objects: &BTreeMap<String, SkyPosition>) -> Self {
        Self { objects: objects.iter().map(|(name, pos)| (normalize_name(name), *pos)).collect() }
    }

    pub fn len(&self) -> usize { self.objects.len() }

    pub fn is_empty(&self) -> bool { self.objects.is_empty() }
}

impl NameResolver for StaticResolver {
    fn resolve(&self, name: &str) -> Result<SkyPosition, CoordinateError> {
        self.objects.get(&normalize_name(name)).copied().ok_or_else(|| CoordinateError::Unresolved {
            name: name.to_string(),
            reason: "not in object table".to_string(),
        })
    }
}
