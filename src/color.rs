use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Sub};

use crate::config::ChannelWeights;

/// RGBA value in the encoder's working range, where 65536 is full intensity.
#[derive(Clone, Copy, Default, PartialEq)]
pub struct ColorF32(pub [f32; 4]);

impl ColorF32 {
    pub const ZERO: Self = Self([0.0; 4]);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    pub fn from_unorm8(rgba: [u8; 4]) -> Self {
        Self(rgba.map(|c| (c as f32 / 255.0) * 65536.0))
    }

    pub fn dot(self, other: Self) -> f32 {
        self[0] * other[0] + self[1] * other[1] + self[2] * other[2] + self[3] * other[3]
    }

    pub fn dot3(self, other: Self) -> f32 {
        self[0] * other[0] + self[1] * other[1] + self[2] * other[2]
    }

    /// Squared distance with each channel scaled by its error weight.
    pub fn weighted_distance(self, other: Self, weights: &ChannelWeights) -> f32 {
        let d = self - other;
        d[0] * d[0] * weights[0] + d[1] * d[1] * weights[1] + d[2] * d[2] * weights[2] + d[3] * d[3] * weights[3]
    }

    /// Unit vector in the same direction, or zero for the zero vector.
    pub fn normalized(self) -> Self {
        let norm = self.dot(self);
        if norm == 0.0 {
            return Self::ZERO;
        }
        let norm = norm.sqrt();
        Self(self.0.map(|c| c / norm))
    }

    pub fn without_alpha(self) -> Self {
        Self([self[0], self[1], self[2], 0.0])
    }
}

impl fmt::Debug for ColorF32 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self[0], self[1], self[2], self[3])
    }
}

impl Index<usize> for ColorF32 {
    type Output = f32;
    fn index(&self, i: usize) -> &Self::Output {
        &self.0[i]
    }
}

impl IndexMut<usize> for ColorF32 {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.0[i]
    }
}

impl Add for ColorF32 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self([self[0] + rhs[0], self[1] + rhs[1], self[2] + rhs[2], self[3] + rhs[3]])
    }
}

impl AddAssign for ColorF32 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for ColorF32 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self([self[0] - rhs[0], self[1] - rhs[1], self[2] - rhs[2], self[3] - rhs[3]])
    }
}

impl Mul<f32> for ColorF32 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self(self.0.map(|c| c * rhs))
    }
}
