//! vrepsim - V-REP 仿真器远程 API 的面向对象封装
//!
//! # 架构设计
//!
//! 从底层到高层：
//!
//! - **远程 API 层** (`remote`): `RemoteApi` trait、常量、返回码，动态库后端与 Mock 后端
//! - **客户端层** (`client`): 会话、场景对象、传感器、电机、集合、模型、数据交换桥
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use vrepsim::prelude::*;
//!
//! # fn main() -> vrepsim::Result<()> {
//! vrepsim::init_logger();
//!
//! let sim = SimulatorBuilder::new().connect()?;
//! let bot = PioneerBot::with_default_names(&sim)?;
//!
//! sim.start_sim()?;
//! for _ in 0..100 {
//!     bot.set_wheel_velocities(1.0, 1.0)?;
//!     sim.trig_sim_step()?;
//! }
//! sim.stop_sim()?;
//! # Ok(())
//! # }
//! ```

pub use vrepsim_client as client;
pub use vrepsim_remote as remote;

pub mod prelude;

// --- 常用类型 ---
pub use vrepsim_client::{
    BoundingBox, Collection, DynamicsEngine, Dummy, ErrorKind, Model, Motor, MotorArray,
    ObjectVelocity, PioneerBot, ProximitySensor, ProximitySensorArray, Result, SceneObject,
    SensorArray, Simulator, SimulatorBuilder, SimulatorConfig, SimulatorVersion, StepExchange,
    VisionSensor, VrepError,
};
pub use vrepsim_remote::{
    ClientId, ImageFormat, ObjectHandle, ProximityReading, RemoteApi, ReturnCode, VisionImage,
};

/// 默认日志过滤规则（未设置 `RUST_LOG` 时使用）
pub const DEFAULT_LOG_FILTER: &str = "vrepsim=info,vrepsim_client=info,vrepsim_remote=info";

/// 初始化日志输出
///
/// 过滤规则取自 `RUST_LOG`，未设置时使用 [`DEFAULT_LOG_FILTER`]。
/// 重复调用是安全的：已有全局 subscriber 时直接返回 `false`。
pub fn init_logger() -> bool {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
}
