// Nuclide (species state) data decoded from webnucleo nuclear data records.
use crate::error::{Result, WnError};
use crate::naming::create_nuclide_name;
use serde::{Deserialize, Serialize};

/// Partition function table of one nuclide state, sorted by `t9`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartitionFunction {
    pub t9: Vec<f64>,
    /// Partition function values, `10^log10_partf * (2 * spin + 1)`.
    pub partf: Vec<f64>,
}

impl PartitionFunction {
    /// Build from `(t9, log10_partf)` points in any order. Temperatures must
    /// be distinct.
    pub fn from_log10(points: &[PartfPoint], spin: f64) -> Result<Self> {
        let mut points: Vec<&PartfPoint> = points.iter().collect();
        points.sort_by(|a, b| a.t9.total_cmp(&b.t9));
        if let Some(w) = points.windows(2).find(|w| w[0].t9 == w[1].t9) {
            return Err(WnError::DuplicateTableTemperature(w[0].t9));
        }
        let degeneracy = 2.0 * spin + 1.0;
        Ok(PartitionFunction {
            t9: points.iter().map(|p| p.t9).collect(),
            partf: points
                .iter()
                .map(|p| 10f64.powf(p.log10_partf) * degeneracy)
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.t9.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t9.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartfPoint {
    pub t9: f64,
    pub log10_partf: f64,
}

/// Data of one nuclear state (ground state or isomer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateRecord {
    /// State label ("g", "m", ...). Empty for nuclides without states.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub source: String,
    pub mass_excess: f64,
    pub spin: f64,
    #[serde(default)]
    pub partf_table: Vec<PartfPoint>,
}

/// A nuclide record: Z and A plus either a list of states or the data of a
/// single (unlabelled) state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NuclideRecord {
    WithStates {
        z: u32,
        a: u32,
        states: Vec<StateRecord>,
    },
    Single {
        z: u32,
        a: u32,
        #[serde(flatten)]
        state: StateRecord,
    },
}

/// One nuclear species state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nuclide {
    /// Atomic number Z.
    pub z: u32,
    /// Mass number A.
    pub a: u32,
    /// State label; empty for a nuclide with a single state.
    pub state: String,
    pub source: String,
    /// Mass excess in MeV.
    pub mass_excess: f64,
    pub spin: f64,
    pub partition_function: PartitionFunction,
}

/// A must be at least Z. Z = 0 is only valid for the neutron (A = 1) and
/// dineutron (A = 2).
fn validate_z_a(z: u32, a: u32) -> Result<()> {
    if a < z || (z == 0 && !(a == 1 || a == 2)) {
        return Err(WnError::InvalidNuclide { z, a });
    }
    Ok(())
}

impl Nuclide {
    fn from_state(z: u32, a: u32, state: StateRecord) -> Result<Self> {
        validate_z_a(z, a)?;
        if state.spin < 0.0 {
            return Err(WnError::InvalidNuclide { z, a });
        }
        Ok(Nuclide {
            z,
            a,
            partition_function: PartitionFunction::from_log10(&state.partf_table, state.spin)?,
            state: state.id,
            source: state.source,
            mass_excess: state.mass_excess,
            spin: state.spin,
        })
    }

    /// Decode a record into one `Nuclide` per state.
    pub fn from_record(record: NuclideRecord) -> Result<Vec<Self>> {
        match record {
            NuclideRecord::WithStates { z, a, states } => states
                .into_iter()
                .map(|s| Nuclide::from_state(z, a, s))
                .collect(),
            NuclideRecord::Single { z, a, state } => Ok(vec![Nuclide::from_state(z, a, state)?]),
        }
    }

    /// Neutron number N = A - Z. Decoding rejects A < Z.
    pub fn n(&self) -> u32 {
        self.a.saturating_sub(self.z)
    }

    /// Canonical species name (e.g. "fe56", "al26g", "n").
    pub fn name(&self) -> String {
        create_nuclide_name(self.z, self.a, &self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(id: &str, spin: f64) -> StateRecord {
        StateRecord {
            id: id.to_string(),
            source: "test".to_string(),
            mass_excess: -8.0,
            spin,
            partf_table: vec![],
        }
    }

    #[test]
    fn test_partition_function_sorted_and_scaled() {
        let points = vec![
            PartfPoint { t9: 2.0, log10_partf: 1.0 },
            PartfPoint { t9: 1.0, log10_partf: 0.0 },
        ];
        let pf = PartitionFunction::from_log10(&points, 1.5).unwrap();
        assert_eq!(pf.t9, vec![1.0, 2.0]);
        assert!((pf.partf[0] - 4.0).abs() < 1e-12);
        assert!((pf.partf[1] - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_partition_function_rejects_repeated_t9() {
        let points = vec![
            PartfPoint { t9: 1.0, log10_partf: 0.0 },
            PartfPoint { t9: 2.0, log10_partf: 1.0 },
            PartfPoint { t9: 1.0, log10_partf: 0.1 },
        ];
        assert!(matches!(
            PartitionFunction::from_log10(&points, 0.0),
            Err(WnError::DuplicateTableTemperature(t)) if t == 1.0
        ));

        let mut record = state("", 0.0);
        record.partf_table = points;
        assert!(Nuclide::from_record(NuclideRecord::Single { z: 2, a: 4, state: record }).is_err());
    }

    #[test]
    fn test_mass_below_charge_rejected() {
        assert!(matches!(
            Nuclide::from_record(NuclideRecord::Single { z: 26, a: 20, state: state("", 0.0) }),
            Err(WnError::InvalidNuclide { z: 26, a: 20 })
        ));
        let h1 = Nuclide::from_record(NuclideRecord::Single { z: 1, a: 1, state: state("", 0.5) }).unwrap();
        assert_eq!(h1[0].n(), 0);
    }

    #[test]
    fn test_single_state_record() {
        let record = NuclideRecord::Single {
            z: 26,
            a: 56,
            state: state("", 0.0),
        };
        let nuclides = Nuclide::from_record(record).unwrap();
        assert_eq!(nuclides.len(), 1);
        assert_eq!(nuclides[0].name(), "fe56");
        assert_eq!(nuclides[0].n(), 30);
    }

    #[test]
    fn test_multi_state_record() {
        let record = NuclideRecord::WithStates {
            z: 13,
            a: 26,
            states: vec![state("g", 5.0), state("m", 0.0)],
        };
        let names: Vec<String> = Nuclide::from_record(record)
            .unwrap()
            .iter()
            .map(|n| n.name())
            .collect();
        assert_eq!(names, vec!["al26g", "al26m"]);
    }

    #[test]
    fn test_neutron_names_and_invalid_z0() {
        let n = Nuclide::from_record(NuclideRecord::Single { z: 0, a: 1, state: state("", 0.5) }).unwrap();
        assert_eq!(n[0].name(), "n");
        let nn = Nuclide::from_record(NuclideRecord::Single { z: 0, a: 2, state: state("", 0.0) }).unwrap();
        assert_eq!(nn[0].name(), "nn");
        assert!(matches!(
            Nuclide::from_record(NuclideRecord::Single { z: 0, a: 3, state: state("", 0.0) }),
            Err(WnError::InvalidNuclide { z: 0, a: 3 })
        ));
    }

    #[test]
    fn test_negative_spin_rejected() {
        assert!(Nuclide::from_record(NuclideRecord::Single { z: 2, a: 4, state: state("", -1.0) }).is_err());
    }

    #[test]
    fn test_record_from_json() {
        let record: NuclideRecord = serde_json::from_str(
            r#"{"z": 2, "a": 4, "source": "audi", "mass_excess": 2.4249, "spin": 0.0,
                "partf_table": [{"t9": 0.1, "log10_partf": 0.0}]}"#,
        )
        .unwrap();
        let he4 = &Nuclide::from_record(record).unwrap()[0];
        assert_eq!(he4.name(), "he4");
        assert_eq!(he4.source, "audi");
        assert_eq!(he4.partition_function.partf, vec![1.0]);
    }
}
