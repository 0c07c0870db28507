//! # vrepsim CLI
//!
//! Command-line interface for controlling V-REP simulations through the remote API.
//!
//! 每个命令都是 one-shot：连接 -> 执行 -> 断开。
//!
//! ```bash
//! # 配置默认服务端
//! vrepsim-cli config set --addr 192.168.1.20 --port 19997
//!
//! # 查询服务端信息
//! vrepsim-cli info
//!
//! # 加载场景、启动仿真、走 10 步
//! vrepsim-cli load scenes/pioneer.ttt
//! vrepsim-cli start
//! vrepsim-cli step -n 10
//! vrepsim-cli pose Pioneer_p3dx
//! vrepsim-cli stop
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod connection;

use commands::{ConfigCommand, InfoCommand, LoadCommand, PoseCommand, StepCommand};
use connection::ConnectionArgs;

/// vrepsim CLI - V-REP 仿真命令行工具
#[derive(Parser, Debug)]
#[command(name = "vrepsim-cli")]
#[command(about = "Command-line interface for V-REP simulations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 查询服务端信息（版本、引擎、步长、场景）
    Info(InfoCommand),

    /// 以同步模式启动仿真
    Start,

    /// 停止仿真
    Stop,

    /// 触发仿真步
    Step(StepCommand),

    /// 查询对象位姿
    Pose(PoseCommand),

    /// 加载场景
    Load(LoadCommand),
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,vrepsim_cli=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config(cmd) => cmd.execute(&cli.connection),

        Commands::Info(cmd) => cmd.execute(&cli.connection),

        Commands::Start => {
            let sim = cli.connection.connect()?;
            sim.start_sim()?;
            println!("✅ 仿真已启动（同步模式）");
            Ok(())
        },

        Commands::Stop => {
            let sim = cli.connection.connect()?;
            sim.stop_sim()?;
            println!("✅ 仿真已停止");
            Ok(())
        },

        Commands::Step(cmd) => cmd.execute(&cli.connection),

        Commands::Pose(cmd) => cmd.execute(&cli.connection),

        Commands::Load(cmd) => cmd.execute(&cli.connection),
    }
}
