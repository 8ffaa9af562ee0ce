//! Universe ↔ display coordinate transforms.
//!
//! Both directions are pure integer maps parameterized by the current
//! zoom radius. The forward direction truncates toward zero (i64
//! widening, then `/`); keeping that truncation identical everywhere is
//! what stops body positions jittering between frames.

use glam::IVec2;
pub use procgen::consts::{MAX_ZOOM_RADIUS, MIN_ZOOM_RADIUS};

/// View width in pixels.
pub const SIS_SCREEN_WIDTH: i32 = 242;
/// View height in pixels.
pub const SIS_SCREEN_HEIGHT: i32 = 188;

/// Pixel throw of the view: a body at `scale_radius` universe units
/// lands this many half-pixels from center.
pub const DISPLAY_FACTOR: i32 = (SIS_SCREEN_WIDTH >> 1) - 8;
pub const DISPLAY_TO_LOC: i32 = DISPLAY_FACTOR >> 1;

pub const fn screen_center() -> IVec2 {
    IVec2::new(SIS_SCREEN_WIDTH >> 1, SIS_SCREEN_HEIGHT >> 1)
}

/// Universe location → screen pixel at the given zoom radius.
/// Out-of-range locations land off screen, which is fine; callers use
/// that for off-screen body tracking.
pub fn location_to_display(pt: IVec2, scale_radius: i32) -> IVec2 {
    IVec2::new(
        (SIS_SCREEN_WIDTH >> 1) + (pt.x as i64 * DISPLAY_TO_LOC as i64 / scale_radius as i64) as i32,
        (SIS_SCREEN_HEIGHT >> 1) + (pt.y as i64 * DISPLAY_TO_LOC as i64 / scale_radius as i64) as i32,
    )
}

/// Screen pixel → universe location at the given zoom radius.
pub fn display_to_location(pt: IVec2, scale_radius: i32) -> IVec2 {
    IVec2::new(
        ((pt.x - (SIS_SCREEN_WIDTH >> 1)) as i64 * scale_radius as i64 / DISPLAY_TO_LOC as i64)
            as i32,
        ((pt.y - (SIS_SCREEN_HEIGHT >> 1)) as i64 * scale_radius as i64 / DISPLAY_TO_LOC as i64)
            as i32,
    )
}

/// Whether a screen point is on the visible view at all.
pub fn on_screen(pt: IVec2) -> bool {
    pt.x >= 0 && pt.x < SIS_SCREEN_WIDTH && pt.y >= 0 && pt.y < SIS_SCREEN_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Round trip differs from the original point by at most one
    /// truncation unit (`scale_radius / DISPLAY_TO_LOC`) per axis,
    /// across the whole zoom range.
    #[test]
    fn display_round_trip_within_one_truncation_unit() {
        let mut radius = MIN_ZOOM_RADIUS;
        while radius <= MAX_ZOOM_RADIUS {
            let unit = radius / DISPLAY_TO_LOC + 1;
            for &pt in &[
                IVec2::new(0, 0),
                IVec2::new(radius, -radius),
                IVec2::new(-radius / 3, radius / 7),
                IVec2::new(1, -1),
            ] {
                let back = display_to_location(location_to_display(pt, radius), radius);
                assert!(
                    (back.x - pt.x).abs() <= unit && (back.y - pt.y).abs() <= unit,
                    "round trip drifted: {pt:?} -> {back:?} at radius {radius}"
                );
            }
            radius <<= 1;
        }
    }

    #[test]
    fn origin_maps_to_screen_center() {
        assert_eq!(
            location_to_display(IVec2::ZERO, MAX_ZOOM_RADIUS),
            screen_center()
        );
    }

    #[test]
    fn truncation_is_toward_zero_both_sides() {
        // Symmetric locations must land symmetrically around center.
        let r = MAX_ZOOM_RADIUS;
        let a = location_to_display(IVec2::new(1000, 0), r);
        let b = location_to_display(IVec2::new(-1000, 0), r);
        assert_eq!(a.x - screen_center().x, screen_center().x - b.x);
    }
}
