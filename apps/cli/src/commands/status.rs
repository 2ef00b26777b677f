//! 状态查询命令
//!
//! 构造仿真机械臂并打印上电后的状态

use anyhow::Result;
use clap::Args;
use relic_arm::ArmConfig;
use relic_hal::Servo;

use crate::sim::SimulatedArm;

/// 状态命令参数
#[derive(Args, Debug)]
pub struct StatusCommand {
    /// 肘关节角度（度），默认停在下止点
    #[arg(long, allow_hyphen_values = true)]
    pub angle: Option<f64>,
}

impl StatusCommand {
    pub fn execute(&self, config: &ArmConfig) -> Result<()> {
        let sim = SimulatedArm::at_angle(config, self.angle.unwrap_or(config.elbow.min_pos))?;
        let arm = sim.arm();
        let limits = arm.limit_states();

        println!("📐 肘关节: {}", arm.elbow_angle());
        println!("   重力补偿: {:.3}", arm.elbow().compensation());
        println!("📏 伸缩臂: {:.2}", arm.extender().position());
        println!("✋ 夹爪: {:.2}", arm.grabber().position());
        println!("🔘 限位:");
        println!("   伸缩臂 下/上: {} / {}", limits.extender_lower, limits.extender_upper);
        println!("   肘关节 下/上: {} / {}", limits.elbow_lower, limits.elbow_upper);
        Ok(())
    }
}
