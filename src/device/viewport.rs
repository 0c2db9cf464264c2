use serde::{Deserialize, Serialize};

use crate::math::Rect;

/// Defines the window dimensions of a render target onto which a 3D volume
/// projects.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(0, 0, 0, 0)
    }
}

impl Viewport {
    /// Creates a new viewport with the default depth range `[0, 1]`.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Viewport {
            x,
            y,
            width,
            height,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// The orientation of the display the back-buffer is presented on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayOrientation {
    Default,
    LandscapeLeft,
    LandscapeRight,
    Portrait,
    PortraitUpsideDown,
}

impl Default for DisplayOrientation {
    fn default() -> Self {
        DisplayOrientation::Default
    }
}

impl DisplayOrientation {
    /// Transforms a scissor rectangle given in logical, top-left based space
    /// into the native space of a display with this orientation.
    pub fn orient_scissor(self, rect: Rect, vp: &Viewport) -> Rect {
        match self {
            DisplayOrientation::Default | DisplayOrientation::Portrait => Rect {
                y: vp.height - rect.y - rect.height,
                ..rect
            },

            DisplayOrientation::LandscapeLeft => Rect {
                x: vp.width - rect.height - rect.y,
                y: vp.height - rect.width - rect.x,
                width: rect.height,
                height: rect.width,
            },

            DisplayOrientation::LandscapeRight => Rect {
                x: rect.y,
                y: rect.x,
                width: rect.height,
                height: rect.width,
            },

            DisplayOrientation::PortraitUpsideDown => Rect {
                x: vp.width - rect.width - rect.x,
                y: vp.height - rect.height - rect.y,
                ..rect
            },
        }
    }
}
