//! 重力补偿
//!
//! 关节所受重力矩与力臂在水平面上的投影成正比：水平时最大，竖直时为零。
//! 因此保持功率按 `cos(angle)` 缩放：
//!
//! ```text
//! compensation = cos(angle) * level_hold_power
//! ```
//!
//! 超过水平 ±90° 后余弦变号，补偿方向随之反转。
//! 只有关节范围不超出 ±90° 时这个方向才符合物理实际。

use relic_control::Deg;

/// 计算给定角度下的重力补偿功率
///
/// # 示例
///
/// ```rust
/// use relic_arm::gravity_compensation;
/// use relic_control::Deg;
///
/// assert!((gravity_compensation(Deg(0.0), 0.2) - 0.2).abs() < 1e-9);
/// assert!((gravity_compensation(Deg(60.0), 0.2) - 0.1).abs() < 1e-9);
/// assert!(gravity_compensation(Deg(90.0), 0.2).abs() < 1e-9);
/// ```
#[inline]
pub fn gravity_compensation(angle: Deg, level_hold_power: f64) -> f64 {
    angle.to_rad().cos() * level_hold_power
}
