use cgmath::BaseFloat;
use serde::{Deserialize, Serialize};

/// A RGBA `Color` with linear components in the range from 0 to 1.
///
/// `Default` is fully transparent black, the implicit background color of the vector
/// shader.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color<S> {
    pub r: S,
    pub g: S,
    pub b: S,
    pub a: S,
}

impl<S: Copy> From<[S; 4]> for Color<S> {
    fn from(v: [S; 4]) -> Self {
        Color {
            r: v[0],
            g: v[1],
            b: v[2],
            a: v[3],
        }
    }
}

impl From<[u8; 4]> for Color<f32> {
    fn from(v: [u8; 4]) -> Self {
        let unorm = |v: u8| f32::from(v) / 255.0;
        Color::new(unorm(v[0]), unorm(v[1]), unorm(v[2]), unorm(v[3]))
    }
}

impl<S: BaseFloat> Color<S> {
    pub fn new(r: S, g: S, b: S, a: S) -> Self {
        Color { r, g, b, a }
    }

    pub fn splat(v: S) -> Self {
        Color::new(v, v, v, v)
    }

    /// Opaque gray of intensity `v`.
    pub fn gray(v: S) -> Self {
        Color::new(v, v, v, S::one())
    }

    #[inline]
    pub fn rgba(&self) -> [S; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn white() -> Self {
        Color::splat(S::one())
    }

    pub fn black() -> Self {
        Color::gray(S::zero())
    }

    pub fn red() -> Self {
        Color::new(S::one(), S::zero(), S::zero(), S::one())
    }

    pub fn transparent() -> Self {
        Color::splat(S::zero())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn constants() {
        assert_eq!(Color::<f32>::default(), Color::transparent());
        assert_eq!(Color::<f32>::white().rgba(), [1.0; 4]);
        assert_eq!(Color::<f32>::black().rgba(), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn unorm() {
        let color: Color<f32> = [255u8, 0, 0, 255].into();
        assert_eq!(color, Color::red());

        let color: Color<f32> = [0.5f32, 0.5, 0.5, 1.0].into();
        assert_eq!(color, Color::gray(0.5));
    }
}
