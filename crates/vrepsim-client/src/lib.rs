//! # V-REP 客户端接口
//!
//! 在 V-REP 远程 API 之上提供面向对象的句柄：
//!
//! - [`Simulator`]: 与远程 API 服务端的会话（连接、仿真控制、场景）
//! - [`SceneObject`] 及其包装类型: [`Dummy`]、[`ProximitySensor`]、[`VisionSensor`]、[`Motor`]
//! - 数组: [`ProximitySensorArray`]、[`MotorArray`]
//! - [`Collection`]: 场景中定义的对象集合
//! - [`Model`]、[`PioneerBot`]: 预先组合好的模型
//! - [`StepExchange`]: 与外部步进仿真交换数据
//!
//! 每个方法都是一次（或几次）远程调用：转发参数、检查返回码、转换结果。
//! 本层不做缓存、重试或调度。
//!
//! # 示例
//!
//! ```rust,no_run
//! use vrepsim_client::{SceneObject, SimulatorBuilder};
//!
//! # fn main() -> vrepsim_client::Result<()> {
//! let sim = SimulatorBuilder::new().connect()?;
//! let cuboid = SceneObject::new(&sim, "Cuboid")?;
//!
//! sim.start_sim()?;
//! sim.trig_sim_step()?;
//! println!("{} at {:?}", cuboid.name(), cuboid.get_position()?);
//! sim.stop_sim()?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod collections;
pub mod config;
pub mod error;
pub mod exchange;
pub mod models;
pub mod objects;
pub mod simulator;

pub use builder::SimulatorBuilder;
pub use collections::Collection;
pub use config::SimulatorConfig;
pub use error::{ErrorKind, Result, VrepError};
pub use exchange::StepExchange;
pub use models::{Model, PioneerBot};
pub use objects::{
    BoundingBox, Dummy, Motor, MotorArray, ObjectVelocity, ProximitySensor, ProximitySensorArray,
    SceneObject, SensorArray, VisionSensor,
};
pub use simulator::{DynamicsEngine, Simulator, SimulatorVersion};

// 重新导出远程 API 层常用类型
pub use vrepsim_remote::{
    ClientId, CollectionHandle, ConnectParams, ImageFormat, ObjectHandle, ProximityReading,
    RemoteApi, ReturnCode, VisionImage,
};
