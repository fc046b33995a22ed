use crate::error::Result;
use crate::nuclide::{Nuclide, NuclideRecord};
use std::collections::{BTreeMap, BTreeSet};

/// Lowest and highest neutron number present for each atomic number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkLimits {
    /// Atomic numbers, ascending.
    pub z: Vec<u32>,
    pub n_min: Vec<u32>,
    pub n_max: Vec<u32>,
}

/// Collection of nuclides keyed by species name.
#[derive(Debug, Clone, Default)]
pub struct NuclideCatalog {
    nuclides: BTreeMap<String, Nuclide>,
}

impl NuclideCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        NuclideCatalog {
            nuclides: BTreeMap::new(),
        }
    }

    /// Decode every record; a record with several states adds one entry per
    /// state.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = NuclideRecord>,
    {
        let mut catalog = NuclideCatalog::new();
        for record in records {
            for nuclide in Nuclide::from_record(record)? {
                catalog.insert(nuclide);
            }
        }
        log::debug!("Decoded {} nuclide(s)", catalog.len());
        Ok(catalog)
    }

    /// Decode a JSON array of nuclide records.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<NuclideRecord> = serde_json::from_str(json)?;
        NuclideCatalog::from_records(records)
    }

    /// Add a nuclide, replacing any with the same name.
    pub fn insert(&mut self, nuclide: Nuclide) -> Option<Nuclide> {
        self.nuclides.insert(nuclide.name(), nuclide)
    }

    pub fn get(&self, name: &str) -> Option<&Nuclide> {
        self.nuclides.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nuclides.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nuclides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nuclides.is_empty()
    }

    /// Iterate over (name, nuclide) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Nuclide)> {
        self.nuclides.iter()
    }

    /// Range of neutron numbers per Z across all states in the catalog.
    pub fn network_limits(&self) -> NetworkLimits {
        let mut by_z: BTreeMap<u32, BTreeSet<u32>> = BTreeMap::new();
        for nuclide in self.nuclides.values() {
            by_z.entry(nuclide.z).or_default().insert(nuclide.n());
        }

        let mut limits = NetworkLimits::default();
        for (z, ns) in by_z {
            if let (Some(&lo), Some(&hi)) = (ns.first(), ns.last()) {
                limits.z.push(z);
                limits.n_min.push(lo);
                limits.n_max.push(hi);
            }
        }
        limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUCLIDES: &str = r#"[
        {"z": 0, "a": 1, "mass_excess": 8.071, "spin": 0.5},
        {"z": 1, "a": 1, "mass_excess": 7.289, "spin": 0.5},
        {"z": 1, "a": 2, "mass_excess": 13.136, "spin": 1.0},
        {"z": 1, "a": 3, "mass_excess": 14.950, "spin": 0.5},
        {"z": 2, "a": 4, "mass_excess": 2.425, "spin": 0.0},
        {"z": 13, "a": 26, "states": [
            {"id": "g", "mass_excess": -12.21, "spin": 5.0},
            {"id": "m", "mass_excess": -11.98, "spin": 0.0}
        ]}
    ]"#;

    #[test]
    fn test_from_json_names() {
        let catalog = NuclideCatalog::from_json(NUCLIDES).unwrap();
        assert_eq!(catalog.len(), 7);
        for name in ["n", "h1", "h2", "h3", "he4", "al26g", "al26m"] {
            assert!(catalog.contains(name), "missing {}", name);
        }
        assert_eq!(catalog.get("al26g").unwrap().spin, 5.0);
    }

    #[test]
    fn test_network_limits() {
        let catalog = NuclideCatalog::from_json(NUCLIDES).unwrap();
        let limits = catalog.network_limits();
        assert_eq!(limits.z, vec![0, 1, 2, 13]);
        assert_eq!(limits.n_min, vec![1, 0, 2, 13]);
        assert_eq!(limits.n_max, vec![1, 2, 2, 13]);
    }

    #[test]
    fn test_invalid_record_propagates() {
        let bad = r#"[{"z": 0, "a": 5, "mass_excess": 0.0, "spin": 0.0}]"#;
        assert!(NuclideCatalog::from_json(bad).is_err());
    }

    #[test]
    fn test_empty_catalog_limits() {
        let catalog = NuclideCatalog::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.network_limits(), NetworkLimits::default());
    }
}
