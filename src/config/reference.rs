//! Built-in reference design: the Caravel open-frame die on a 15 × 17 mm
//! carrier with 72 landing fingers and 64 edge pads.
//!
//! Pad numbering follows the die pad table, not the QFN pin numbering.

use std::ops::Range;

/// Die pad centres relative to the die centre, in drawing orientation (mm).
pub const PAD_CENTERS: [[f64; 2]; 63] = [
    [-1.729785, -2.2195], [-1.7294, -2.0035], [-1.7294, -1.7925],
    [-1.7294, -1.5815], [-1.729785, -1.3705], [-1.729785, -1.1545],
    [-1.729785, -0.9385], [-1.729785, -0.7225], [-1.729785, -0.5065],
    [-1.729785, -0.2905], [-1.729785, -0.0745], [-1.7294, 0.1415],
    [-1.7294, 0.3525], [-1.729785, 0.5635], [-1.729785, 0.7795],
    [-1.729785, 0.9955], [-1.729785, 1.2115], [-1.729785, 1.4275],
    [-1.729785, 1.6435], [-1.7294, 2.0055], [-1.7294, 2.2165],
    [-1.3625, 2.5294], [-1.0935, 2.5294], [-0.8245, 2.529785],
    [-0.5505, 2.5294], [-0.2815, 2.529785], [-0.0075, 2.529785],
    [0.2665, 2.529785], [0.5405, 2.529785], [0.8145, 2.529785],
    [1.0885, 2.5294], [1.3575, 2.5294], [1.729785, 2.0565],
    [1.729785, 1.8305], [1.729785, 1.6055], [1.729785, 1.3795],
    [1.729785, 1.1545], [1.729785, 0.9295], [1.729785, 0.7035],
    [1.7294, 0.4785], [1.7294, 0.2575], [1.7294, 0.0375],
    [1.729785, -0.1825], [1.729785, -0.4085], [1.729785, -0.6335],
    [1.729785, -0.8595], [1.729785, -1.0845], [1.729785, -1.3095],
    [1.7294, -1.5355], [1.729785, -1.7555], [1.7294, -1.9815],
    [1.729785, -2.2015], [1.3785, -2.529785], [1.1215, -2.5294],
    [0.8695, -2.529785], [0.6125, -2.529785], [0.1675, -2.529785],
    [-0.0895, -2.5294], [-0.3415, -2.529785], [-0.5995, -2.529785],
    [-0.8565, -2.529785], [-1.1135, -2.529785], [-1.3705, -2.529785],
];

/// Die pads tied to ground.
pub const GROUND_PADS: [usize; 9] = [3, 12, 21, 24, 30, 39, 40, 53, 57];

/// Finger runs assigned to consecutive die pads.
const FINGER_RUNS: [Range<usize>; 5] = [26..47, 49..60, 63..72, 0..11, 13..24];

/// Edge pad runs assigned to consecutive die pads.
const EDGE_RUNS: [Range<usize>; 3] = [61..64, 0..18, 19..61];

fn expand(runs: &[Range<usize>]) -> Vec<Option<usize>> {
    runs.iter().cloned().flatten().map(Some).collect()
}

/// Die pad → landing finger table.
#[must_use]
pub fn die_to_finger() -> Vec<Option<usize>> {
    expand(&FINGER_RUNS)
}

/// Die pad → edge pad table.
#[must_use]
pub fn die_to_edge() -> Vec<Option<usize>> {
    expand(&EDGE_RUNS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_cover_every_pad() {
        assert_eq!(die_to_finger().len(), PAD_CENTERS.len());
        assert_eq!(die_to_edge().len(), PAD_CENTERS.len());
    }

    #[test]
    fn pad_three_lands_on_finger_29() {
        assert_eq!(die_to_finger()[3], Some(29));
        assert_eq!(die_to_edge()[0], Some(61));
        assert_eq!(die_to_edge()[3], Some(0));
    }
}
