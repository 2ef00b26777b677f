//! 带限位保护的伺服
//!
//! 在普通位置伺服之上增加两项能力：
//!
//! - 上/下限位开关门控：朝已触发限位方向的移动被拒绝，保持当前位置
//! - 连续模式：`set_power()` 后每个 `tick()` 按速率推进位置，模拟连续旋转
//!
//! 用于伸缩臂这类由伺服驱动、但行程由限位开关界定的线性机构。

use parking_lot::Mutex;
use relic_hal::{DigitalInput, Servo};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// 默认连续模式速率（位置单位/秒）
pub const DEFAULT_STEP_RATE: f64 = 0.5;

pub struct EnhancedServo {
    name: String,
    servo: Arc<dyn Servo>,
    lower_limit: Option<Arc<dyn DigitalInput>>,
    upper_limit: Option<Arc<dyn DigitalInput>>,
    step_rate: f64,
    power: Mutex<f64>,
}

impl EnhancedServo {
    pub fn new(
        name: impl Into<String>,
        servo: Arc<dyn Servo>,
        lower_limit: Option<Arc<dyn DigitalInput>>,
        upper_limit: Option<Arc<dyn DigitalInput>>,
    ) -> Self {
        Self {
            name: name.into(),
            servo,
            lower_limit,
            upper_limit,
            step_rate: DEFAULT_STEP_RATE,
            power: Mutex::new(0.0),
        }
    }

    pub fn with_step_rate(mut self, step_rate: f64) -> Self {
        self.step_rate = step_rate.abs();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn step_rate(&self) -> f64 {
        self.step_rate
    }

    pub fn position(&self) -> f64 {
        self.servo.position()
    }

    pub fn power(&self) -> f64 {
        *self.power.lock()
    }

    pub fn is_lower_limit_active(&self) -> bool {
        self.lower_limit.as_ref().is_some_and(|s| s.is_active())
    }

    pub fn is_upper_limit_active(&self) -> bool {
        self.upper_limit.as_ref().is_some_and(|s| s.is_active())
    }

    /// 移动到指定位置并退出连续模式
    ///
    /// 返回伺服最终所在的位置。
    pub fn set_position(&self, position: f64) -> f64 {
        *self.power.lock() = 0.0;
        self.move_to(position.clamp(0.0, 1.0))
    }

    /// 连续模式：`power` 的符号决定方向，幅值决定速度
    pub fn set_power(&self, power: f64) {
        *self.power.lock() = power.clamp(-1.0, 1.0);
    }

    pub fn stop(&self) {
        *self.power.lock() = 0.0;
    }

    /// 连续模式下推进一个时间步，到达限位或行程端点后自动停止
    pub fn tick(&self, dt: Duration) {
        let step = self.power() * self.step_rate * dt.as_secs_f64();
        if step == 0.0 {
            return;
        }

        let requested = (self.position() + step).clamp(0.0, 1.0);
        let reached = self.move_to(requested);
        // 被限位挡住或到达行程端点
        if reached != requested || reached <= 0.0 || reached >= 1.0 {
            self.stop();
        }
    }

    fn move_to(&self, position: f64) -> f64 {
        let current = self.position();
        let blocked = (position > current && self.is_upper_limit_active())
            || (position < current && self.is_lower_limit_active());
        if blocked {
            debug!(servo = %self.name, current, position, "limit active, holding position");
            return current;
        }
        self.servo.set_position(position);
        position
    }
}
