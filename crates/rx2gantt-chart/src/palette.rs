//! Deterministic subject color palette.

use image::Rgb;

/// Fixed pastel palette (matplotlib's Pastel1 listed colormap).
pub const PASTEL1: [Rgb<u8>; 9] = [
    Rgb([251, 180, 174]),
    Rgb([179, 205, 227]),
    Rgb([204, 235, 197]),
    Rgb([222, 203, 228]),
    Rgb([254, 217, 166]),
    Rgb([255, 255, 204]),
    Rgb([229, 216, 189]),
    Rgb([253, 218, 236]),
    Rgb([242, 242, 242]),
];

/// Color for subject `index` of `total` distinct subjects.
///
/// Subjects sample the palette evenly: index `i` of `k` maps to position
/// `i/k` along the palette. Two runs over the same record set always agree;
/// different record sets with the same subject count may reuse slots.
#[must_use]
pub fn palette_color(index: usize, total: usize) -> Rgb<u8> {
    if total == 0 {
        return PASTEL1[0];
    }
    let position = index as f32 / total as f32;
    let slot = (position * PASTEL1.len() as f32).floor() as usize;
    PASTEL1[slot.min(PASTEL1.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_subjects_get_three_distinct_colors() {
        let colors: Vec<_> = (0..3).map(|i| palette_color(i, 3)).collect();
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn sampling_is_deterministic() {
        for i in 0..7 {
            assert_eq!(palette_color(i, 7), palette_color(i, 7));
        }
    }

    #[test]
    fn last_subject_stays_inside_palette() {
        // index == total-1 of a large set must clamp to the final slot.
        let c = palette_color(99, 100);
        assert_eq!(c, PASTEL1[8]);
    }
}
