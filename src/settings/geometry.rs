//! Window geometry persistence.

use serde::{Deserialize, Serialize};

/// Width of a freshly placed window, in logical pixels.
pub const DEFAULT_WIDTH: f64 = 200.0;

/// Vertical space left free below a freshly placed window, in logical pixels.
pub const SCREEN_HEIGHT_MARGIN: f64 = 60.0;

/// Height used when no monitor can be queried.
const FALLBACK_HEIGHT: f64 = 600.0;

/// Saved window rectangle in physical pixels: outer position, inner size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub maximized: bool,
}

/// A monitor's work area, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenArea {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
}

/// Where the window goes at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Reuse the saved rectangle.
    Restore(WindowGeometry),
    /// Fresh placement, sized in logical pixels and centered by the caller.
    Default { width: f64, height: f64 },
}

impl WindowGeometry {
    fn intersects(&self, screen: &ScreenArea) -> bool {
        let (left, top) = (i64::from(self.x), i64::from(self.y));
        let (right, bottom) = (left + i64::from(self.width), top + i64::from(self.height));
        let (s_left, s_top) = (i64::from(screen.x), i64::from(screen.y));
        let (s_right, s_bottom) = (
            s_left + i64::from(screen.width),
            s_top + i64::from(screen.height),
        );
        left < s_right && s_left < right && top < s_bottom && s_top < bottom
    }

    /// A saved rectangle is usable when it has a size and is at least partly
    /// on a connected monitor. With no monitor information only the size is
    /// checked.
    pub fn is_valid(&self, screens: &[ScreenArea]) -> bool {
        if self.width == 0 || self.height == 0 {
            return false;
        }
        screens.is_empty() || screens.iter().any(|screen| self.intersects(screen))
    }
}

/// Decide the startup placement from the saved geometry and the monitors.
pub fn initial_placement(
    saved: Option<WindowGeometry>,
    screens: &[ScreenArea],
    primary: Option<&ScreenArea>,
) -> Placement {
    if let Some(geometry) = saved {
        if geometry.is_valid(screens) {
            return Placement::Restore(geometry);
        }
        log::info!("[GEOMETRY] Saved geometry {:?} is off-screen, resetting", geometry);
    }

    let height = primary
        .map(|screen| f64::from(screen.height) / screen.scale_factor - SCREEN_HEIGHT_MARGIN)
        .filter(|height| *height > 0.0)
        .unwrap_or(FALLBACK_HEIGHT);

    Placement::Default {
        width: DEFAULT_WIDTH,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(x: i32, y: i32, width: u32, height: u32, scale_factor: f64) -> ScreenArea {
        ScreenArea {
            x,
            y,
            width,
            height,
            scale_factor,
        }
    }

    fn geometry(x: i32, y: i32, width: u32, height: u32) -> WindowGeometry {
        WindowGeometry {
            x,
            y,
            width,
            height,
            maximized: false,
        }
    }

    #[test]
    fn test_restores_valid_geometry() {
        let screens = [screen(0, 0, 1920, 1080, 1.0)];
        let saved = geometry(1700, 20, 220, 1000);

        assert_eq!(
            initial_placement(Some(saved), &screens, screens.first()),
            Placement::Restore(saved)
        );
    }

    #[test]
    fn test_restores_on_secondary_monitor() {
        let screens = [screen(0, 0, 1920, 1080, 1.0), screen(-1280, 0, 1280, 1024, 1.0)];
        let saved = geometry(-400, 100, 200, 800);

        assert!(saved.is_valid(&screens));
    }

    #[test]
    fn test_off_screen_geometry_falls_back() {
        let screens = [screen(0, 0, 1920, 1080, 1.0)];
        let saved = geometry(4000, 4000, 200, 800);

        assert_eq!(
            initial_placement(Some(saved), &screens, screens.first()),
            Placement::Default {
                width: 200.0,
                height: 1020.0
            }
        );
    }

    #[test]
    fn test_zero_size_is_invalid() {
        assert!(!geometry(0, 0, 0, 500).is_valid(&[]));
        assert!(geometry(0, 0, 10, 500).is_valid(&[]));
    }

    #[test]
    fn test_default_height_uses_logical_pixels() {
        let screens = [screen(0, 0, 2880, 1800, 2.0)];

        assert_eq!(
            initial_placement(None, &screens, screens.first()),
            Placement::Default {
                width: 200.0,
                height: 840.0
            }
        );
    }

    #[test]
    fn test_default_without_monitor() {
        assert_eq!(
            initial_placement(None, &[], None),
            Placement::Default {
                width: 200.0,
                height: 600.0
            }
        );
    }

    #[test]
    fn test_geometry_json_without_maximized() {
        let parsed: WindowGeometry =
            serde_json::from_str(r#"{"x":1,"y":2,"width":3,"height":4}"#).unwrap();
        assert_eq!(parsed, geometry(1, 2, 3, 4));
    }
}
