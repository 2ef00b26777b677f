//! 肘关节保持命令
//!
//! 在仿真机械臂上运行肘关节位置闭环，报告最终角度

use anyhow::Result;
use clap::Args;
use relic_arm::ArmConfig;
use std::time::Duration;
use tracing::{debug, info};

use crate::sim::SimulatedArm;

/// 保持命令参数
#[derive(Args, Debug)]
pub struct HoldCommand {
    /// 目标角度（度，水平为 0）
    #[arg(short, long, allow_hyphen_values = true)]
    pub target: f64,

    /// 初始角度（度），默认停在下止点
    #[arg(long, allow_hyphen_values = true)]
    pub start: Option<f64>,

    /// 控制周期数
    #[arg(short, long, default_value_t = 250)]
    pub cycles: u32,

    /// 控制周期（毫秒）
    #[arg(long, default_value_t = 20)]
    pub dt_ms: u64,
}

/// 保持结果
#[derive(Debug, Clone, Copy)]
pub struct HoldReport {
    pub target: f64,
    pub angle: f64,
    pub power: f64,
    pub on_target: bool,
}

impl HoldCommand {
    pub fn run(&self, config: &ArmConfig) -> Result<HoldReport> {
        let start = self.start.unwrap_or(config.elbow.min_pos);
        let mut sim = SimulatedArm::at_angle(config, start)?;
        let dt = Duration::from_millis(self.dt_ms);

        let target = sim.arm().elbow().set_target(self.target);
        if target != self.target {
            info!(requested = self.target, target, "target clamped to elbow range");
        }

        for cycle in 0..self.cycles {
            let power = sim.cycle(dt);
            debug!(cycle, angle = sim.arm().elbow().position(), power, "hold");
        }

        let elbow = sim.arm().elbow();
        Ok(HoldReport {
            target,
            angle: elbow.position(),
            power: sim.motor_power(),
            on_target: elbow.is_on_target(),
        })
    }

    pub fn execute(&self, config: &ArmConfig) -> Result<()> {
        let report = self.run(config)?;
        println!("🎯 目标角度: {:.2}°", report.target);
        println!("📐 最终角度: {:.2}°", report.angle);
        println!("⚡ 电机功率: {:.3}", report.power);
        if report.on_target {
            println!("✅ 已到位");
        } else {
            println!("⚠️  未到位（可增加 --cycles）");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hold(target: f64, cycles: u32) -> HoldReport {
        HoldCommand {
            target,
            start: None,
            cycles,
            dt_ms: 20,
        }
        .run(&ArmConfig::default())
        .unwrap()
    }

    #[test]
    fn test_hold_converges() {
        let report = hold(30.0, 500);
        assert!(report.on_target);
        assert!((report.angle - 30.0).abs() <= 2.0);
    }

    #[test]
    fn test_target_clamped() {
        let report = hold(120.0, 1);
        assert_eq!(report.target, ArmConfig::default().elbow.max_pos);
    }
}
