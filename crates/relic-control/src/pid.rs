//! PID Controller - 比例-积分-微分位置控制器
//!
//! # 算法
//!
//! ```text
//! output = Kp * e + Ki * ∫e dt + Kd * de/dt + Kf * target
//! ```
//!
//! 其中 `e = target - input`。
//!
//! # 反馈输入
//!
//! 控制器本身不读取传感器。每次计算时，它通过 [`PidInput`] 向反馈源查询当前测量值，
//! 并把自身作为身份参数传入，这样一个反馈源可以同时服务多个控制器。
//!
//! 控制器只持有反馈源的 [`Weak`] 引用：反馈源通常就是拥有该控制器的子系统，
//! 强引用会形成循环。反馈源尚未构造完成或已被释放时，测量值按 `0.0` 处理。

use parking_lot::Mutex;
use std::sync::Weak;
use std::time::Duration;
use tracing::{debug, trace};

/// 反馈输入能力
///
/// # 约定
///
/// - 必须是纯读取，没有副作用
/// - 在控制循环内被调用，必须在可忽略的时间内返回
/// - 不能失败：无法识别的 `pid_ctrl` 应返回 `0.0`
pub trait PidInput: Send + Sync {
    /// 返回 `pid_ctrl` 所控制对象的当前测量值
    fn get_input(&self, pid_ctrl: &PidController) -> f64;
}

/// PID 系数
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PidCoefficients {
    /// 比例增益
    pub kp: f64,
    /// 积分增益
    pub ki: f64,
    /// 微分增益
    pub kd: f64,
    /// 前馈增益（乘以目标值）
    pub kf: f64,
}

impl PidCoefficients {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            kf: 0.0,
        }
    }

    pub fn with_kf(mut self, kf: f64) -> Self {
        self.kf = kf;
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct PidState {
    target: f64,
    integral: f64,
    /// `None` 表示尚无历史误差（刚创建、刚重置或刚换目标）
    prev_error: Option<f64>,
    last_input: f64,
    last_output: f64,
}

/// PID 控制器
///
/// 系数和容差在构造后不可变；目标值和积分状态放在内部锁中，
/// 因此所有方法都只需要 `&self`。
pub struct PidController {
    name: String,
    coefficients: PidCoefficients,
    tolerance: f64,
    output_limit: f64,
    integral_limit: f64,
    input: Weak<dyn PidInput>,
    state: Mutex<PidState>,
}

impl PidController {
    /// 创建新的 PID 控制器
    ///
    /// # 参数
    ///
    /// - `name`: 控制器名称（用于日志）
    /// - `coefficients`: PID 系数
    /// - `tolerance`: 到位容差，`|error| <= tolerance` 视为到达目标
    /// - `input`: 反馈源的非拥有引用
    ///
    /// # 默认参数
    ///
    /// - 输出限制 = 1.0（电机功率单位）
    /// - 积分限制 = 1.0
    pub fn new(
        name: impl Into<String>,
        coefficients: PidCoefficients,
        tolerance: f64,
        input: Weak<dyn PidInput>,
    ) -> Self {
        Self {
            name: name.into(),
            coefficients,
            tolerance: tolerance.abs(),
            output_limit: 1.0,
            integral_limit: 1.0,
            input,
            state: Mutex::new(PidState::default()),
        }
    }

    /// 设置输出限制（绝对值）
    pub fn with_output_limit(mut self, limit: f64) -> Self {
        self.output_limit = limit.abs();
        self
    }

    /// 设置积分项限制（绝对值），防止积分饱和
    pub fn with_integral_limit(mut self, limit: f64) -> Self {
        self.integral_limit = limit.abs();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coefficients(&self) -> PidCoefficients {
        self.coefficients
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn output_limit(&self) -> f64 {
        self.output_limit
    }

    /// 设置新目标，同时清空积分和微分历史
    pub fn set_target(&self, target: f64) {
        let mut state = self.state.lock();
        state.target = target;
        state.integral = 0.0;
        state.prev_error = None;
    }

    pub fn target(&self) -> f64 {
        self.state.lock().target
    }

    /// 通过反馈回调读取当前测量值
    ///
    /// 反馈源不存在时返回 `0.0`。
    pub fn current_input(&self) -> f64 {
        match self.input.upgrade() {
            Some(source) => source.get_input(self),
            None => {
                trace!(pid = %self.name, "feedback source unavailable, using 0.0");
                0.0
            },
        }
    }

    /// 当前误差（目标 - 测量值）
    pub fn error(&self) -> f64 {
        let input = self.current_input();
        self.target() - input
    }

    /// 误差是否在容差范围内
    pub fn is_on_target(&self) -> bool {
        self.error().abs() <= self.tolerance
    }

    /// 最近一次 `compute()` 使用的测量值
    pub fn last_input(&self) -> f64 {
        self.state.lock().last_input
    }

    /// 最近一次 `compute()` 的输出
    pub fn last_output(&self) -> f64 {
        self.state.lock().last_output
    }

    /// 计算一个控制周期的输出
    ///
    /// 先调用反馈回调取得测量值，再更新积分和微分状态。
    /// `dt` 为零时跳过积分项和微分项，只输出比例项和前馈项。
    pub fn compute(&self, dt: Duration) -> f64 {
        // 回调在加锁前调用，反馈源可以安全地查询本控制器的其它只读方法
        let input = self.current_input();
        let dt_sec = dt.as_secs_f64();
        let PidCoefficients { kp, ki, kd, kf } = self.coefficients;

        let mut state = self.state.lock();
        let error = state.target - input;

        let derivative = if dt_sec > 0.0 {
            state.integral =
                (state.integral + error * dt_sec).clamp(-self.integral_limit, self.integral_limit);
            state.prev_error.map_or(0.0, |prev| (error - prev) / dt_sec)
        } else {
            debug!(pid = %self.name, ?dt, "zero dt, skipping I and D terms");
            0.0
        };

        let output = (kp * error + ki * state.integral + kd * derivative + kf * state.target)
            .clamp(-self.output_limit, self.output_limit);

        state.prev_error = Some(error);
        state.last_input = input;
        state.last_output = output;

        trace!(
            pid = %self.name,
            target = state.target,
            input,
            error,
            output,
            "PID compute"
        );

        output
    }

    /// 完全重置积分和微分状态（保留目标值）
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.integral = 0.0;
        state.prev_error = None;
        state.last_output = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// 返回固定测量值的反馈源
    struct FixedInput(AtomicU64);

    impl FixedInput {
        fn new(value: f64) -> Arc<Self> {
            Arc::new(Self(AtomicU64::new(value.to_bits())))
        }

        fn set(&self, value: f64) {
            self.0.store(value.to_bits(), Ordering::SeqCst);
        }
    }

    impl PidInput for FixedInput {
        fn get_input(&self, _pid_ctrl: &PidController) -> f64 {
            f64::from_bits(self.0.load(Ordering::SeqCst))
        }
    }

    fn pid_with(source: &Arc<FixedInput>, coefficients: PidCoefficients) -> PidController {
        let weak: Weak<FixedInput> = Arc::downgrade(source);
        PidController::new("test", coefficients, 0.5, weak)
            .with_output_limit(100.0)
            .with_integral_limit(10.0)
    }

    #[test]
    fn test_pid_new() {
        let source = FixedInput::new(0.0);
        let weak: Weak<FixedInput> = Arc::downgrade(&source);
        let pid = PidController::new("elbowPidCtrl", PidCoefficients::new(0.1, 0.0, 0.0), -2.0, weak);

        assert_eq!(pid.name(), "elbowPidCtrl");
        assert_eq!(pid.tolerance(), 2.0);
        assert_eq!(pid.output_limit(), 1.0);
        assert_eq!(pid.target(), 0.0);
    }

    #[test]
    fn test_pid_proportional_only() {
        let source = FixedInput::new(0.5);
        let pid = pid_with(&source, PidCoefficients::new(10.0, 0.0, 0.0));
        pid.set_target(1.0);

        let output = pid.compute(Duration::from_millis(10));
        // 误差 = 0.5, 输出 = 10.0 * 0.5
        assert!((output - 5.0).abs() < 1e-10);
        assert_eq!(pid.last_output(), output);
    }

    #[test]
    fn test_pid_integral_accumulation_and_limit() {
        let source = FixedInput::new(0.0);
        let pid = pid_with(&source, PidCoefficients::new(0.0, 1.0, 0.0));
        pid.set_target(1.0);

        let out1 = pid.compute(Duration::from_millis(100));
        assert!((out1 - 0.1).abs() < 1e-10);
        let out2 = pid.compute(Duration::from_millis(100));
        assert!((out2 - 0.2).abs() < 1e-10);

        for _ in 0..200 {
            pid.compute(Duration::from_millis(100));
        }
        // 积分被钳位到 10.0
        assert!((pid.last_output() - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_pid_derivative_uses_error_history() {
        let source = FixedInput::new(0.5);
        let pid = pid_with(&source, PidCoefficients::new(0.0, 0.0, 1.0));
        pid.set_target(1.0);

        // 第一次没有历史误差，微分项为 0
        let out1 = pid.compute(Duration::from_millis(100));
        assert_eq!(out1, 0.0);

        // 误差从 0.5 变为 0.3，变化率 = -0.2 / 0.1
        source.set(0.7);
        let out2 = pid.compute(Duration::from_millis(100));
        assert!((out2 + 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_pid_feedforward() {
        let source = FixedInput::new(0.0);
        let pid = pid_with(&source, PidCoefficients::new(0.0, 0.0, 0.0).with_kf(0.5));
        pid.set_target(4.0);
        assert!((pid.compute(Duration::from_millis(10)) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_pid_output_clamping() {
        let source = FixedInput::new(0.0);
        let weak: Weak<FixedInput> = Arc::downgrade(&source);
        let pid = PidController::new("clamp", PidCoefficients::new(100.0, 0.0, 0.0), 1.0, weak);
        pid.set_target(90.0);
        assert_eq!(pid.compute(Duration::from_millis(10)), 1.0);
        pid.set_target(-90.0);
        assert_eq!(pid.compute(Duration::from_millis(10)), -1.0);
    }

    #[test]
    fn test_pid_zero_dt_skips_integral_and_derivative() {
        let source = FixedInput::new(0.5);
        let pid = pid_with(&source, PidCoefficients::new(2.0, 1.0, 1.0));
        pid.set_target(1.0);

        let output = pid.compute(Duration::ZERO);
        assert!((output - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_pid_repeated_zero_dt_is_stable() {
        let source = FixedInput::new(0.5);
        let pid = pid_with(&source, PidCoefficients::new(2.0, 1.0, 1.0));
        pid.set_target(1.0);

        for _ in 0..100 {
            let output = pid.compute(Duration::ZERO);
            assert!((output - 1.0).abs() < 1e-10);
        }
        assert!((pid.last_output() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_pid_on_target() {
        let source = FixedInput::new(9.8);
        let pid = pid_with(&source, PidCoefficients::new(1.0, 0.0, 0.0));
        pid.set_target(10.0);
        assert!(pid.is_on_target());
        assert!((pid.error() - 0.2).abs() < 1e-10);

        source.set(5.0);
        assert!(!pid.is_on_target());
    }

    #[test]
    fn test_pid_dropped_source_reads_zero() {
        let source = FixedInput::new(42.0);
        let pid = pid_with(&source, PidCoefficients::new(1.0, 0.0, 0.0));
        assert_eq!(pid.current_input(), 42.0);

        drop(source);
        assert_eq!(pid.current_input(), 0.0);
    }

    #[test]
    fn test_pid_set_target_resets_history() {
        let source = FixedInput::new(0.0);
        let pid = pid_with(&source, PidCoefficients::new(0.0, 1.0, 0.0));
        pid.set_target(1.0);
        pid.compute(Duration::from_secs(1));
        assert!(pid.last_output() > 0.0);

        pid.set_target(2.0);
        // 新目标：积分从零开始累积
        let output = pid.compute(Duration::from_millis(100));
        assert!((output - 0.2).abs() < 1e-10);
    }

    #[test]
    fn test_pid_reset() {
        let source = FixedInput::new(0.0);
        let pid = pid_with(&source, PidCoefficients::new(0.0, 1.0, 0.0));
        pid.set_target(1.0);
        pid.compute(Duration::from_secs(1));

        pid.reset();
        assert_eq!(pid.last_output(), 0.0);
        assert_eq!(pid.target(), 1.0);
        let output = pid.compute(Duration::from_millis(100));
        assert!((output - 0.1).abs() < 1e-10);
    }
}
