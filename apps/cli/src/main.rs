//! # Relic CLI
//!
//! Relic arm 的命令行仿真器。所有命令都在 mock 硬件上构造完整的机械臂，
//! 用一个带重力负载的简单物理模型推进肘关节。
//!
//! ```bash
//! # 查看生效配置
//! relic-cli config show
//! relic-cli --config arm.toml config show
//!
//! # 肘关节从下止点移动到 30° 并保持
//! relic-cli hold --target 30 --cycles 500
//!
//! # 肘关节归零
//! relic-cli calibrate --drift 200
//!
//! # 夹爪
//! relic-cli grabber open
//! ```
//!
//! 日志级别由 `RUST_LOG` 控制，例如 `RUST_LOG=relic_control=trace`。

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod sim;

use commands::{
    CalibrateCommand, ConfigCommand, GrabberCommand, HoldCommand, StatusCommand, load_config,
};

/// Relic CLI - 机械臂仿真命令行工具
#[derive(Parser, Debug)]
#[command(name = "relic-cli")]
#[command(about = "Command-line simulator for the relic arm", long_about = None)]
#[command(version)]
struct Cli {
    /// 机械臂配置文件（TOML），缺省使用内置默认值
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 肘关节闭环保持目标角度
    Hold {
        #[command(flatten)]
        args: HoldCommand,
    },

    /// 肘关节向下限位归零
    Calibrate {
        #[command(flatten)]
        args: CalibrateCommand,
    },

    /// 夹爪开合
    #[command(subcommand)]
    Grabber(GrabberCommand),

    /// 显示机械臂状态
    Status {
        #[command(flatten)]
        args: StatusCommand,
    },
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("relic_cli=info".parse()?)
                .add_directive("relic_arm=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Config(cmd) => cmd.execute(&config),
        Commands::Hold { args } => args.execute(&config),
        Commands::Calibrate { args } => args.execute(&config),
        Commands::Grabber(cmd) => cmd.execute(&config),
        Commands::Status { args } => args.execute(&config),
    }
}
