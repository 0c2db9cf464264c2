use cgmath::BaseFloat;
use serde::{Deserialize, Serialize};

/// A linear RGBA color, with components in `[0, 1]`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color<S> {
    pub r: S,
    pub g: S,
    pub b: S,
    pub a: S,
}

impl<S: BaseFloat> Color<S> {
    #[inline]
    pub fn new(r: S, g: S, b: S, a: S) -> Self {
        Color { r, g, b, a }
    }

    pub fn white() -> Self {
        Color::new(S::one(), S::one(), S::one(), S::one())
    }

    pub fn black() -> Self {
        Color::new(S::zero(), S::zero(), S::zero(), S::one())
    }

    /// Black with zero alpha, the color discarded render targets get cleared
    /// to.
    pub fn transparent() -> Self {
        Color::new(S::zero(), S::zero(), S::zero(), S::zero())
    }

    pub fn cornflower_blue() -> Self {
        Color::from([100, 149, 237, 255])
    }
}

impl<S: BaseFloat> From<[u8; 4]> for Color<S> {
    fn from(v: [u8; 4]) -> Self {
        let max = S::from(255u8).unwrap_or_else(S::one);
        let channel = |c: u8| S::from(c).unwrap_or_else(S::zero) / max;
        Color::new(channel(v[0]), channel(v[1]), channel(v[2]), channel(v[3]))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bytes() {
        let c: Color<f32> = [255, 0, 255, 0].into();
        assert_eq!(c, Color::new(1.0, 0.0, 1.0, 0.0));

        let c: Color<f64> = [0, 0, 0, 255].into();
        assert_eq!(c, Color::black());
    }
}
