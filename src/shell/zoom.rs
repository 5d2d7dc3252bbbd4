//! Zoom steps for the "Larger"/"Smaller" menu actions.

/// Amount added or removed per step.
pub const ZOOM_STEP: f64 = 0.1;

/// "Smaller" only applies while the zoom is strictly above this.
pub const ZOOM_FLOOR: f64 = 0.1;

/// Float drift tolerated on the floor comparison, so `0.7` stepped down six
/// times stops at the floor instead of going one step past it.
const FLOOR_TOLERANCE: f64 = 1e-9;

pub fn larger(zoom: f64) -> f64 {
    zoom + ZOOM_STEP
}

/// One step down, or `zoom` unchanged when it is already at or below the floor.
pub fn smaller(zoom: f64) -> f64 {
    if zoom > ZOOM_FLOOR + FLOOR_TOLERANCE {
        zoom - ZOOM_STEP
    } else {
        zoom
    }
}
