//! Line of sight between actor centres.

use bevy::math::IVec2;

use crate::geometry::Bounds;

/// True when the segment `from..=to` crosses none of `solids`.
pub fn has_line_of_sight(from: IVec2, to: IVec2, solids: &[Bounds]) -> bool {
    solids.iter().all(|solid| !solid.intersects_segment(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_corridor() {
        let solids = [Bounds::new(0, 0, 500, 50), Bounds::new(0, 100, 500, 50)];
        assert!(has_line_of_sight(IVec2::new(25, 75), IVec2::new(475, 75), &solids));
    }

    #[test]
    fn wall_blocks_sight() {
        let solids = [Bounds::new(200, 0, 50, 200)];
        assert!(!has_line_of_sight(IVec2::new(25, 75), IVec2::new(475, 75), &solids));
    }

    #[test]
    fn no_solids_means_visible() {
        assert!(has_line_of_sight(IVec2::ZERO, IVec2::new(1000, 1000), &[]));
    }

    #[test]
    fn grazing_the_far_edge_counts_as_blocked() {
        // Rect spans x 50..=99 and y 0..=49; the segment runs along y = 49.
        let solids = [Bounds::new(50, 0, 50, 50)];
        assert!(!has_line_of_sight(IVec2::new(0, 49), IVec2::new(200, 49), &solids));
        assert!(has_line_of_sight(IVec2::new(0, 50), IVec2::new(200, 50), &solids));
    }
}
