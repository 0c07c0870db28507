//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use vrepsim::prelude::*;
//! ```

// 会话
pub use crate::client::{Simulator, SimulatorBuilder, SimulatorConfig};

// 场景对象
pub use crate::client::{
    Collection, Dummy, Model, Motor, MotorArray, PioneerBot, ProximitySensor,
    ProximitySensorArray, SceneObject, VisionSensor,
};

// 数据交换
pub use crate::client::StepExchange;

// 远程 API（常用 Trait 与类型）
pub use crate::remote::{ImageFormat, RemoteApi};

// 错误类型
pub use crate::client::{ErrorKind, VrepError};
