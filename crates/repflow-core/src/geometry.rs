//! Planar geometry on landmarks
//!
//! All helpers work in normalized image space (y grows downward) and ignore
//! depth.

use crate::Landmark;

/// Image-plane distance between two landmarks
#[inline]
pub fn distance(a: &Landmark, b: &Landmark) -> f32 {
    a.distance_2d(b)
}

/// Absolute horizontal separation
#[inline]
pub fn horizontal_gap(a: &Landmark, b: &Landmark) -> f32 {
    (a.x - b.x).abs()
}

/// Absolute vertical separation
#[inline]
pub fn vertical_gap(a: &Landmark, b: &Landmark) -> f32 {
    (a.y - b.y).abs()
}

/// `a` is higher in the image than `b`
#[inline]
pub fn is_above(a: &Landmark, b: &Landmark) -> bool {
    a.y < b.y
}

/// Every consecutive pair in `chain` is within `tolerance` horizontally
pub fn vertically_aligned(chain: &[&Landmark], tolerance: f32) -> bool {
    chain
        .windows(2)
        .all(|pair| horizontal_gap(pair[0], pair[1]) < tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_alignment() {
        let a = Landmark::at(0.50, 0.2);
        let b = Landmark::at(0.55, 0.5);
        let c = Landmark::at(0.52, 0.7);
        assert!(vertically_aligned(&[&a, &b, &c], 0.1));

        let d = Landmark::at(0.70, 0.9);
        assert!(!vertically_aligned(&[&a, &b, &c, &d], 0.1));
        assert!(vertically_aligned(&[&a], 0.1));
    }

    #[test]
    fn test_is_above() {
        let head = Landmark::at(0.5, 0.1);
        let hip = Landmark::at(0.5, 0.5);
        assert!(is_above(&head, &hip));
        assert!(!is_above(&hip, &head));
    }

    proptest! {
        #[test]
        fn prop_gaps_symmetric(a in (0.0f32..1.0, 0.0f32..1.0), b in (0.0f32..1.0, 0.0f32..1.0)) {
            let (a, b) = (Landmark::at(a.0, a.1), Landmark::at(b.0, b.1));
            prop_assert_eq!(horizontal_gap(&a, &b), horizontal_gap(&b, &a));
            prop_assert_eq!(vertical_gap(&a, &b), vertical_gap(&b, &a));
        }
    }
}
