// Zone (timestep) data: properties and mass fractions, and abundances derived
// from them.
use crate::error::{Result, WnError};
use crate::naming::create_nuclide_name;
use crate::property::{collect_properties, PropertyKey, PropertyRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Nucleon number to sum abundances over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nucleon {
    /// Atomic number.
    Z,
    /// Neutron number.
    N,
    /// Mass number.
    A,
}

impl FromStr for Nucleon {
    type Err = WnError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "z" => Ok(Nucleon::Z),
            "n" => Ok(Nucleon::N),
            "a" => Ok(Nucleon::A),
            other => Err(WnError::InvalidNucleon(other.to_string())),
        }
    }
}

/// Mass fraction of one species in a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassFraction {
    /// Species name; derived from Z and A when absent in the record.
    #[serde(default)]
    pub name: Option<String>,
    pub z: u32,
    pub a: u32,
    pub x: f64,
}

impl MassFraction {
    pub fn species(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| create_nuclide_name(self.z, self.a, ""))
    }

    /// N = A - Z, or `None` when A is zero or below Z.
    pub fn neutron_number(&self) -> Option<u32> {
        if self.a == 0 {
            return None;
        }
        self.a.checked_sub(self.z)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneRecord {
    #[serde(default)]
    pub properties: Vec<PropertyRecord>,
    #[serde(default)]
    pub mass_fractions: Vec<MassFraction>,
}

/// One zone: string-valued properties and species mass fractions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Zone {
    pub properties: HashMap<PropertyKey, String>,
    pub mass_fractions: Vec<MassFraction>,
}

impl Zone {
    /// Fails with [`WnError::InvalidNuclide`] on a mass fraction whose A is
    /// zero or below Z.
    pub fn from_record(record: ZoneRecord) -> Result<Self> {
        if let Some(m) = record
            .mass_fractions
            .iter()
            .find(|m| m.neutron_number().is_none())
        {
            return Err(WnError::InvalidNuclide { z: m.z, a: m.a });
        }
        Ok(Zone {
            properties: collect_properties(&record.properties),
            mass_fractions: record.mass_fractions,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let record: ZoneRecord = serde_json::from_str(json)?;
        Zone::from_record(record)
    }

    /// Mass fractions paired with their neutron number. Entries with A = 0
    /// or A < Z are skipped with a warning.
    fn valid_mass_fractions(&self) -> impl Iterator<Item = (&MassFraction, u32)> {
        self.mass_fractions.iter().filter_map(|m| match m.neutron_number() {
            Some(n) => Some((m, n)),
            None => {
                log::warn!("Skipping mass fraction with Z={}, A={}", m.z, m.a);
                None
            }
        })
    }

    pub fn property(&self, key: &PropertyKey) -> Result<&str> {
        self.properties
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| WnError::PropertyNotFound(key.to_string()))
    }

    pub fn property_as_f64(&self, key: &PropertyKey) -> Result<f64> {
        let value = self.property(key)?;
        value
            .trim()
            .parse()
            .map_err(|_| WnError::InvalidPropertyValue {
                property: key.to_string(),
                value: value.to_string(),
            })
    }

    /// Mass fraction of `species`, 0 when absent.
    pub fn mass_fraction(&self, species: &str) -> f64 {
        self.mass_fractions
            .iter()
            .find(|m| m.species() == species)
            .map(|m| m.x)
            .unwrap_or(0.0)
    }

    /// Abundances `Y = X / A` indexed `[z][n]`, summed over the states of a
    /// species. The grid spans Z = 0..=max Z and N = 0..=max N in the zone.
    pub fn abundances(&self) -> Vec<Vec<f64>> {
        let valid: Vec<(&MassFraction, u32)> = self.valid_mass_fractions().collect();
        let z_max = valid.iter().map(|(m, _)| m.z).max().unwrap_or(0) as usize;
        let n_max = valid.iter().map(|&(_, n)| n).max().unwrap_or(0) as usize;

        let mut y = vec![vec![0.0; n_max + 1]; z_max + 1];
        for (m, n) in valid {
            y[m.z as usize][n as usize] += m.x / m.a as f64;
        }
        y
    }

    /// Abundances summed by Z, N or A; index i holds the total for nucleon
    /// number i.
    pub fn abundances_vs_nucleon_number(&self, nucleon: Nucleon) -> Vec<f64> {
        let y = self.abundances();
        let n_len = y.first().map_or(0, |row| row.len());
        match nucleon {
            Nucleon::Z => y.iter().map(|row| row.iter().sum()).collect(),
            Nucleon::N => (0..n_len).map(|n| y.iter().map(|row| row[n]).sum()).collect(),
            Nucleon::A => {
                let mut result = vec![0.0; y.len() + n_len - 1];
                for (z, row) in y.iter().enumerate() {
                    for (n, value) in row.iter().enumerate() {
                        result[z + n] += value;
                    }
                }
                result
            }
        }
    }

    /// Abundances along the chain with fixed Z (`Nucleon::Z`) or fixed N
    /// (`Nucleon::N`), indexed by the other nucleon number.
    pub fn chain_abundances(&self, nucleon: Nucleon, value: u32) -> Result<Vec<f64>> {
        let y = self.abundances();
        let n_len = y.first().map_or(0, |row| row.len());
        let value = value as usize;
        match nucleon {
            Nucleon::Z => Ok(y.get(value).cloned().unwrap_or_else(|| vec![0.0; n_len])),
            Nucleon::N => Ok(y
                .iter()
                .map(|row| row.get(value).copied().unwrap_or(0.0))
                .collect()),
            Nucleon::A => Err(WnError::InvalidNucleon("a".to_string())),
        }
    }
}
