//! Value types consumed by the device. Vectors and matrices come from `cgmath`.

pub use cgmath::{Vector2, Vector4};

pub mod color;
pub use self::color::Color;

pub mod rect;
pub use self::rect::Rect;

pub mod prelude {
    pub use super::color::Color;
    pub use super::rect::Rect;
    pub use cgmath::{Vector2, Vector4};
}
