//! 肘关节归零命令
//!
//! 以标定功率把肘关节压向下限位，触发后编码器清零

use anyhow::{Result, bail};
use clap::Args;
use relic_arm::ArmConfig;
use relic_control::ActuatorMode;
use std::time::Duration;
use tracing::debug;

use crate::sim::SimulatedArm;

/// 归零命令参数
#[derive(Args, Debug)]
pub struct CalibrateCommand {
    /// 初始角度（度）
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub start: f64,

    /// 上电时编码器零点偏差（counts）
    #[arg(long, default_value_t = 150.0, allow_hyphen_values = true)]
    pub drift: f64,

    /// 最多执行的控制周期数
    #[arg(long, default_value_t = 1000)]
    pub max_cycles: u32,

    /// 控制周期（毫秒）
    #[arg(long, default_value_t = 20)]
    pub dt_ms: u64,
}

/// 归零结果
#[derive(Debug, Clone, Copy)]
pub struct CalibrateReport {
    pub cycles: u32,
    pub angle_before: f64,
    pub angle_after: f64,
    pub raw_after: f64,
}

impl CalibrateCommand {
    pub fn run(&self, config: &ArmConfig) -> Result<CalibrateReport> {
        let travel = (self.start - config.elbow.pos_offset) / config.elbow.degrees_per_count;
        let mut sim = SimulatedArm::new(config, travel, self.drift)?;
        let dt = Duration::from_millis(self.dt_ms);
        let angle_before = sim.arm().elbow().position();

        sim.arm().calibrate_elbow();
        for cycle in 1..=self.max_cycles {
            let power = sim.cycle(dt);
            debug!(cycle, raw = sim.arm().elbow().raw_position(), power, "calibrating");
            if sim.arm().elbow().mode() == ActuatorMode::Idle {
                let elbow = sim.arm().elbow();
                return Ok(CalibrateReport {
                    cycles: cycle,
                    angle_before,
                    angle_after: elbow.position(),
                    raw_after: elbow.raw_position(),
                });
            }
        }

        sim.arm().elbow().cancel();
        bail!("{} 个周期内未触发下限位", self.max_cycles)
    }

    pub fn execute(&self, config: &ArmConfig) -> Result<()> {
        let report = self.run(config)?;
        println!("🔧 归零完成（{} 个周期）", report.cycles);
        println!("   标定前读数: {:.2}°", report.angle_before);
        println!("   标定后读数: {:.2}°（编码器 {:.0}）", report.angle_after, report.raw_after);
        Ok(())
    }
}
