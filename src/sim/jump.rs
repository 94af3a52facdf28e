//! Jump magnitude resolution
//!
//! A springboard zone is one tile above a springboard tile. A player whose
//! center is inside any zone jumps with the boosted magnitude.

use glam::Vec2;

use super::geom::Rect;

/// Zone above a springboard tile, anchored at the tile's top-left corner
pub fn springboard_zone(tile: &Rect, tile_width: f32, tile_height: f32) -> Rect {
    Rect::new(tile.left(), tile.top(), tile_width, tile_height)
}

/// `boosted` if `center` lies in any zone (half-open), otherwise `base`
pub fn compute_jump_magnitude(center: Vec2, zones: &[Rect], base: f32, boosted: f32) -> f32 {
    if zones.iter().any(|zone| zone.contains_point(center)) {
        boosted
    } else {
        base
    }
}
