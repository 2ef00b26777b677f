//! Mock 硬件
//!
//! 无硬件依赖的模拟设备，用于单元测试、集成测试和命令行仿真。
//! 所有设备都是线程安全的，可以在测试中持有具体类型的句柄直接操纵状态。

use crate::{DcMotor, DeviceKind, DigitalInput, HalError, HardwareMap, Servo};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// 模拟限位开关
pub struct MockDigitalInput {
    name: String,
    active: AtomicBool,
}

impl MockDigitalInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: AtomicBool::new(false),
        }
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }
}

impl DigitalInput for MockDigitalInput {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// 模拟伺服
pub struct MockServo {
    name: String,
    inverted: AtomicBool,
    position: Mutex<f64>,
}

impl MockServo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inverted: AtomicBool::new(false),
            position: Mutex::new(0.0),
        }
    }

    /// 经过反向映射后的物理位置
    pub fn physical_position(&self) -> f64 {
        let position = *self.position.lock();
        if self.is_inverted() { 1.0 - position } else { position }
    }
}

impl Servo for MockServo {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_inverted(&self, inverted: bool) {
        self.inverted.store(inverted, Ordering::SeqCst);
    }

    fn is_inverted(&self) -> bool {
        self.inverted.load(Ordering::SeqCst)
    }

    fn set_position(&self, position: f64) {
        *self.position.lock() = position.clamp(0.0, 1.0);
    }

    fn position(&self) -> f64 {
        *self.position.lock()
    }
}

/// 满功率下的默认编码器速度（counts/s）
pub const DEFAULT_COUNTS_PER_SECOND: f64 = 1000.0;

/// 模拟直流电机
///
/// 编码器计数不会自行变化：测试可以用 [`set_counts`](Self::set_counts) 直接设定，
/// 或用 [`simulate`](Self::simulate) 按当前功率积分一个时间步。
pub struct MockMotor {
    name: String,
    counts_per_second: f64,
    power: Mutex<f64>,
    counts: Mutex<f64>,
}

impl MockMotor {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_speed(name, DEFAULT_COUNTS_PER_SECOND)
    }

    pub fn with_speed(name: impl Into<String>, counts_per_second: f64) -> Self {
        Self {
            name: name.into(),
            counts_per_second,
            power: Mutex::new(0.0),
            counts: Mutex::new(0.0),
        }
    }

    pub fn set_counts(&self, counts: f64) {
        *self.counts.lock() = counts;
    }

    /// 按当前功率推进一个时间步
    pub fn simulate(&self, dt: Duration) {
        let power = *self.power.lock();
        *self.counts.lock() += power * self.counts_per_second * dt.as_secs_f64();
    }
}

impl DcMotor for MockMotor {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_power(&self, power: f64) {
        *self.power.lock() = power.clamp(-1.0, 1.0);
    }

    fn power(&self) -> f64 {
        *self.power.lock()
    }

    fn position(&self) -> f64 {
        *self.counts.lock()
    }

    fn reset_position(&self) {
        *self.counts.lock() = 0.0;
    }
}

#[derive(Clone)]
enum MockDevice {
    DigitalInput(Arc<MockDigitalInput>),
    Servo(Arc<MockServo>),
    DcMotor(Arc<MockMotor>),
}

impl MockDevice {
    fn kind(&self) -> DeviceKind {
        match self {
            MockDevice::DigitalInput(_) => DeviceKind::DigitalInput,
            MockDevice::Servo(_) => DeviceKind::Servo,
            MockDevice::DcMotor(_) => DeviceKind::DcMotor,
        }
    }
}

/// 模拟硬件配置表
///
/// # 示例
///
/// 需要启用 `mock` feature：
///
/// ```rust,ignore
/// use relic_hal::HardwareMap;
/// use relic_hal::mock::MockHardwareMap;
///
/// let hw = MockHardwareMap::new();
/// let limit = hw.add_digital_input("elbowLowerLimit");
/// limit.set_active(true);
///
/// let resolved = hw.digital_input("elbowLowerLimit").unwrap();
/// assert!(resolved.is_active());
/// assert!(hw.servo("missing").is_err());
/// ```
#[derive(Default)]
pub struct MockHardwareMap {
    devices: Mutex<HashMap<String, MockDevice>>,
}

impl MockHardwareMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_digital_input(&self, name: &str) -> Arc<MockDigitalInput> {
        let device = Arc::new(MockDigitalInput::new(name));
        self.insert(name, MockDevice::DigitalInput(device.clone()));
        device
    }

    pub fn add_servo(&self, name: &str) -> Arc<MockServo> {
        let device = Arc::new(MockServo::new(name));
        self.insert(name, MockDevice::Servo(device.clone()));
        device
    }

    pub fn add_dc_motor(&self, name: &str, counts_per_second: f64) -> Arc<MockMotor> {
        let device = Arc::new(MockMotor::with_speed(name, counts_per_second));
        self.insert(name, MockDevice::DcMotor(device.clone()));
        device
    }

    pub fn remove(&self, name: &str) -> bool {
        self.devices.lock().remove(name).is_some()
    }

    fn insert(&self, name: &str, device: MockDevice) {
        self.devices.lock().insert(name.to_string(), device);
    }

    fn lookup(&self, name: &str, expected: DeviceKind) -> Result<MockDevice, HalError> {
        self.devices
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| HalError::DeviceNotFound {
                kind: expected,
                name: name.to_string(),
            })
    }
}

fn kind_mismatch(name: &str, expected: DeviceKind, actual: &MockDevice) -> HalError {
    HalError::KindMismatch {
        name: name.to_string(),
        expected,
        actual: actual.kind(),
    }
}

impl HardwareMap for MockHardwareMap {
    fn digital_input(&self, name: &str) -> Result<Arc<dyn DigitalInput>, HalError> {
        match self.lookup(name, DeviceKind::DigitalInput)? {
            MockDevice::DigitalInput(device) => Ok(device),
            other => Err(kind_mismatch(name, DeviceKind::DigitalInput, &other)),
        }
    }

    fn servo(&self, name: &str) -> Result<Arc<dyn Servo>, HalError> {
        match self.lookup(name, DeviceKind::Servo)? {
            MockDevice::Servo(device) => Ok(device),
            other => Err(kind_mismatch(name, DeviceKind::Servo, &other)),
        }
    }

    fn dc_motor(&self, name: &str) -> Result<Arc<dyn DcMotor>, HalError> {
        match self.lookup(name, DeviceKind::DcMotor)? {
            MockDevice::DcMotor(device) => Ok(device),
            other => Err(kind_mismatch(name, DeviceKind::DcMotor, &other)),
        }
    }
}
