//! Typed die pad → finger → edge pad mapping.
//!
//! Three index spaces meet here: die pads (position in the pad table),
//! landing fingers and edge pads. The raw `Option` tables from the
//! configuration are checked once and turned into a [`BondMap`].

use std::fmt;

use serde::Serialize;

use crate::config::Config;
use crate::error::ConfigError;

/// Index of a landing finger, `0..landing_pads`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FingerIndex(pub usize);

/// Index of an edge pad, `0..edge_pad_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EdgePadIndex(pub usize);

impl fmt::Display for FingerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "finger {}", self.0)
    }
}

impl fmt::Display for EdgePadIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge pad {}", self.0)
    }
}

/// Where one bonded die pad goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bond {
    /// Landing finger receiving the bond wire.
    pub finger: FingerIndex,
    /// Edge pad at the end of the trace.
    pub edge: EdgePadIndex,
}

/// Validated mapping between die pads, fingers and edge pads.
#[derive(Debug, Clone)]
pub struct BondMap {
    bonds: Vec<Option<Bond>>,
    finger_to_pad: Vec<Option<usize>>,
    ground_pads: Vec<bool>,
}

impl BondMap {
    /// Checks the raw tables and builds the map.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if a table has the wrong
    /// length and [`ConfigError::MappingIntegrity`] naming the first die pad
    /// that has half a mapping, an out-of-range or reused index, or an
    /// invalid ground entry.
    pub fn new(
        die_to_finger: &[Option<usize>],
        die_to_edge: &[Option<usize>],
        ground_pads: &[usize],
        finger_count: usize,
        edge_count: usize,
    ) -> Result<Self, ConfigError> {
        let pad_count = die_to_finger.len();
        if die_to_edge.len() != pad_count {
            return Err(ConfigError::validation(format!(
                "mapping tables disagree: die_to_finger has {pad_count} entries, \
                 die_to_edge has {}",
                die_to_edge.len()
            )));
        }

        let mut finger_to_pad = vec![None; finger_count];
        let mut edge_used = vec![false; edge_count];
        let mut bonds = Vec::with_capacity(pad_count);

        for (pad, (finger, edge)) in die_to_finger.iter().zip(die_to_edge).enumerate() {
            let bond = match (*finger, *edge) {
                (None, None) => None,
                (Some(finger), None) => {
                    return Err(ConfigError::mapping(
                        pad,
                        format!("bonded to finger {finger} but has no edge pad"),
                    ))
                }
                (None, Some(edge)) => {
                    return Err(ConfigError::mapping(
                        pad,
                        format!("routed to edge pad {edge} but has no finger"),
                    ))
                }
                (Some(finger), Some(edge)) => {
                    let slot = finger_to_pad.get_mut(finger).ok_or_else(|| {
                        ConfigError::mapping(
                            pad,
                            format!("finger {finger} out of range (0..{finger_count})"),
                        )
                    })?;
                    if let Some(other) = *slot {
                        return Err(ConfigError::mapping(
                            pad,
                            format!("finger {finger} already used by die pad {other}"),
                        ));
                    }
                    *slot = Some(pad);

                    let used = edge_used.get_mut(edge).ok_or_else(|| {
                        ConfigError::mapping(
                            pad,
                            format!("edge pad {edge} out of range (0..{edge_count})"),
                        )
                    })?;
                    if *used {
                        return Err(ConfigError::mapping(
                            pad,
                            format!("edge pad {edge} already used"),
                        ));
                    }
                    *used = true;

                    Some(Bond {
                        finger: FingerIndex(finger),
                        edge: EdgePadIndex(edge),
                    })
                }
            };
            bonds.push(bond);
        }

        let mut ground = vec![false; pad_count];
        for &pad in ground_pads {
            match ground.get_mut(pad) {
                None => {
                    return Err(ConfigError::mapping(
                        pad,
                        format!("ground pad out of range (0..{pad_count})"),
                    ))
                }
                Some(true) => {
                    return Err(ConfigError::mapping(pad, "listed twice as a ground pad"));
                }
                Some(flag) => *flag = true,
            }
        }

        Ok(Self {
            bonds,
            finger_to_pad,
            ground_pads: ground,
        })
    }

    /// Builds the map from the configuration's tables.
    ///
    /// # Errors
    ///
    /// See [`BondMap::new`]. Also fails if the tables do not have one entry
    /// per die pad.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let pad_count = config.die.pads.len();
        let table_len = config.mapping.die_to_finger.len();
        if table_len != pad_count {
            return Err(ConfigError::validation(format!(
                "mapping.die_to_finger has {table_len} entries but there are {pad_count} die pads"
            )));
        }
        Self::new(
            &config.mapping.die_to_finger,
            &config.mapping.die_to_edge,
            &config.die.ground_pads,
            config.pattern.landing_pads,
            config.footprint.edge_pad_count(),
        )
    }

    /// Number of die pads.
    #[must_use]
    pub fn pad_count(&self) -> usize {
        self.bonds.len()
    }

    /// Number of landing fingers.
    #[must_use]
    pub fn finger_count(&self) -> usize {
        self.finger_to_pad.len()
    }

    /// The bond of die pad `pad`, if it is bonded.
    #[must_use]
    pub fn bond(&self, pad: usize) -> Option<Bond> {
        self.bonds.get(pad).copied().flatten()
    }

    /// Bonded die pads with their bonds, in die pad order.
    pub fn bonded(&self) -> impl Iterator<Item = (usize, Bond)> + '_ {
        self.bonds
            .iter()
            .enumerate()
            .filter_map(|(pad, bond)| bond.map(|b| (pad, b)))
    }

    /// Number of bonded die pads.
    #[must_use]
    pub fn bonded_count(&self) -> usize {
        self.bonds.iter().flatten().count()
    }

    /// The die pad bonded to `finger`, if any.
    #[must_use]
    pub fn pad_for_finger(&self, finger: FingerIndex) -> Option<usize> {
        self.finger_to_pad.get(finger.0).copied().flatten()
    }

    /// True if die pad `pad` is tied to ground.
    #[must_use]
    pub fn is_ground_pad(&self, pad: usize) -> bool {
        self.ground_pads.get(pad).copied().unwrap_or(false)
    }

    /// True if `finger` is unbonded or bonded to a ground pad.
    ///
    /// Unbonded fingers stay connected to the ground ring as shielding
    /// between neighbouring signals.
    #[must_use]
    pub fn is_ground_finger(&self, finger: FingerIndex) -> bool {
        self.pad_for_finger(finger)
            .map_or(true, |pad| self.is_ground_pad(pad))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::reference;

    fn reference_map() -> BondMap {
        BondMap::new(
            &reference::die_to_finger(),
            &reference::die_to_edge(),
            &reference::GROUND_PADS,
            72,
            64,
        )
        .unwrap()
    }

    #[test]
    fn reference_tables_are_consistent() {
        let map = reference_map();
        assert_eq!(map.pad_count(), 63);
        assert_eq!(map.finger_count(), 72);
        assert_eq!(map.bonded_count(), 63);
        assert_eq!(
            map.bond(3),
            Some(Bond {
                finger: FingerIndex(29),
                edge: EdgePadIndex(0),
            })
        );
    }

    #[test]
    fn reference_ground_fingers() {
        let map = reference_map();
        let ground: Vec<usize> = (0..72)
            .filter(|&f| map.is_ground_finger(FingerIndex(f)))
            .collect();
        assert_eq!(
            ground,
            vec![11, 12, 14, 18, 24, 25, 29, 38, 47, 48, 49, 52, 58, 60, 61, 62, 70, 71]
        );
    }

    #[test]
    fn finger_lookup_is_inverse_of_bond() {
        let map = reference_map();
        for (pad, bond) in map.bonded() {
            assert_eq!(map.pad_for_finger(bond.finger), Some(pad));
        }
        assert_eq!(map.pad_for_finger(FingerIndex(11)), None);
    }

    #[test]
    fn duplicate_finger_names_second_pad() {
        let err = BondMap::new(
            &[Some(0), Some(0)],
            &[Some(0), Some(1)],
            &[],
            4,
            4,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MappingIntegrity { pad: 1, .. }));
        assert!(err.to_string().contains("die pad 0"));
    }

    #[test]
    fn duplicate_edge_is_rejected() {
        let err = BondMap::new(&[Some(0), Some(1)], &[Some(2), Some(2)], &[], 4, 4).unwrap_err();
        assert!(matches!(err, ConfigError::MappingIntegrity { pad: 1, .. }));
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let finger = BondMap::new(&[Some(4)], &[Some(0)], &[], 4, 4).unwrap_err();
        assert!(finger.to_string().contains("finger 4 out of range"));
        let edge = BondMap::new(&[Some(0)], &[Some(9)], &[], 4, 4).unwrap_err();
        assert!(edge.to_string().contains("edge pad 9 out of range"));
    }

    #[test]
    fn ground_pads_must_be_unique_and_in_range() {
        assert!(BondMap::new(&[None], &[None], &[1], 4, 4).is_err());
        assert!(BondMap::new(&[None, None], &[None, None], &[1, 1], 4, 4).is_err());
        assert!(BondMap::new(&[None, None], &[None, None], &[1], 4, 4).is_ok());
    }

    #[test]
    fn mismatched_table_lengths() {
        let err = BondMap::new(&[None, None], &[None], &[], 4, 4).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }
}
