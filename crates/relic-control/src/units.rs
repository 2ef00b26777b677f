//! 角度单位
//!
//! 关节角度在 API 边界上以度（[`Deg`]）表示，三角函数运算前转换为弧度（[`Rad`]）。
//! 用 NewType 区分两者，避免把度数直接喂给 `cos()`。
//!
//! ```rust
//! use relic_control::units::Deg;
//!
//! let level = Deg(60.0).to_rad();
//! assert!((level.cos() - 0.5).abs() < 1e-9);
//! ```

use std::fmt;
use std::ops::{Add, Neg, Sub};

/// 角度（度）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deg(pub f64);

/// 角度（弧度）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rad(pub f64);

impl Deg {
    pub const ZERO: Self = Deg(0.0);

    #[inline]
    pub fn to_rad(self) -> Rad {
        Rad(self.0.to_radians())
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn clamp(self, min: Self, max: Self) -> Self {
        Deg(self.0.clamp(min.0, max.0))
    }
}

impl Rad {
    pub const ZERO: Self = Rad(0.0);

    #[inline]
    pub fn to_deg(self) -> Deg {
        Deg(self.0.to_degrees())
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn sin(self) -> f64 {
        self.0.sin()
    }

    #[inline]
    pub fn cos(self) -> f64 {
        self.0.cos()
    }
}

impl fmt::Display for Deg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}°", self.0)
    }
}

impl fmt::Display for Rad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad", self.0)
    }
}

macro_rules! impl_angle_ops {
    ($ty:ident) => {
        impl Add for $ty {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                $ty(self.0 + rhs.0)
            }
        }

        impl Sub for $ty {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                $ty(self.0 - rhs.0)
            }
        }

        impl Neg for $ty {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                $ty(-self.0)
            }
        }
    };
}

impl_angle_ops!(Deg);
impl_angle_ops!(Rad);
