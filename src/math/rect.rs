use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in pixels. `x` and `y` name the lower corner of
/// the rectangle in the space it is expressed in.
///
/// Rectangles with negative dimensions are representable and are never
/// corrected by the device.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[inline]
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}
