//! # 场景对象
//!
//! [`SceneObject`] 是所有场景对象句柄的基础：名称 + 句柄 + 会话。
//! 具体对象类型（[`Dummy`]、[`ProximitySensor`]、[`VisionSensor`]、[`Motor`]、
//! [`Model`](crate::Model)）包装一个 `SceneObject`，并通过 `Deref` 暴露其通用方法。
//!
//! 所有方法都以阻塞模式调用远程 API，失败时返回 [`VrepError::Simulation`]，
//! 错误上下文中包含对象名称。

mod arrays;
mod motor;
mod sensors;

pub use arrays::{MotorArray, ProximitySensorArray, SensorArray};
pub use motor::Motor;
pub use sensors::{ProximitySensor, VisionSensor};

use crate::error::{ErrorKind, Result, VrepError};
use crate::simulator::Simulator;
use std::fmt;
use tracing::debug;
use vrepsim_remote::{ClientId, ObjectFloatParam, ObjectHandle, OpMode, RemoteApi, SimxResult};

/// 未命名对象的名称
pub const UNNAMED: &str = "_Unnamed_";

/// 对象速度
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObjectVelocity {
    /// 线速度 (m/s)
    pub linear: [f32; 3],
    /// 角速度 (rad/s)
    pub angular: [f32; 3],
}

/// 对象自身坐标系下的包围盒
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoundingBox {
    /// 各轴尺寸
    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// 场景对象
///
/// 不实现 `Clone`：[`remove`](Self::remove) 消耗句柄，移除后的对象无法再被使用。
pub struct SceneObject {
    sim: Simulator,
    name: String,
    handle: ObjectHandle,
}

impl fmt::Debug for SceneObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneObject")
            .field("name", &self.name)
            .field("handle", &self.handle)
            .finish()
    }
}

impl SceneObject {
    /// 按名称获取场景对象句柄（阻塞）
    ///
    /// 名称为空时创建未命名对象（名称 `_Unnamed_`，句柄 -1），不访问服务端。
    pub fn new(sim: &Simulator, name: &str) -> Result<Self> {
        if name.is_empty() {
            return Ok(Self::unnamed(sim));
        }
        let handle = sim.call(
            ErrorKind::Simulation,
            || format!("retrieve handle to {}", name),
            |api, client| api.get_object_handle(client, name, OpMode::Blocking),
        )?;
        debug!("Resolved {} to handle {}", name, handle);
        Ok(Self {
            sim: sim.clone(),
            name: name.to_string(),
            handle,
        })
    }

    /// 未命名对象
    pub fn unnamed(sim: &Simulator) -> Self {
        Self {
            sim: sim.clone(),
            name: UNNAMED.to_string(),
            handle: ObjectHandle::NONE,
        }
    }

    /// 由已知句柄构造，名称从场景中查询
    ///
    /// 场景中找不到该句柄时名称为 `_Unnamed_`。
    pub fn from_handle(sim: &Simulator, handle: ObjectHandle) -> Result<Self> {
        let name = sim
            .get_object_name(handle)?
            .unwrap_or_else(|| UNNAMED.to_string());
        Ok(Self {
            sim: sim.clone(),
            name,
            handle,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    /// 所属会话
    pub fn sim(&self) -> &Simulator {
        &self.sim
    }

    /// 在本对象上执行仿真类远程调用
    pub(crate) fn call<T>(
        &self,
        what: &str,
        f: impl FnOnce(&dyn RemoteApi, ClientId, ObjectHandle) -> SimxResult<T>,
    ) -> Result<T> {
        self.sim.call(
            ErrorKind::Simulation,
            || format!("{} {}", what, self.name),
            |api, client| f(api, client, self.handle),
        )
    }

    /// 绝对坐标系下的位置
    pub fn get_position(&self) -> Result<[f32; 3]> {
        self.call("retrieve position of", |api, client, handle| {
            api.get_object_position(client, handle, ObjectHandle::NONE, OpMode::Blocking)
        })
    }

    /// 相对另一对象坐标系的位置
    pub fn get_position_relative(&self, other: &SceneObject) -> Result<[f32; 3]> {
        self.call("retrieve relative position of", |api, client, handle| {
            api.get_object_position(client, handle, other.handle, OpMode::Blocking)
        })
    }

    pub fn set_position(&self, position: [f32; 3]) -> Result<()> {
        self.call("set position of", |api, client, handle| {
            api.set_object_position(client, handle, ObjectHandle::NONE, position, OpMode::Blocking)
        })
    }

    pub fn set_position_relative(&self, other: &SceneObject, position: [f32; 3]) -> Result<()> {
        self.call("set relative position of", |api, client, handle| {
            api.set_object_position(client, handle, other.handle, position, OpMode::Blocking)
        })
    }

    /// 绝对坐标系下的姿态（绕 x、y、z 轴的欧拉角，每个角度在 -pi..pi 之间）
    pub fn get_orientation(&self) -> Result<[f32; 3]> {
        self.call("retrieve orientation of", |api, client, handle| {
            api.get_object_orientation(client, handle, ObjectHandle::NONE, OpMode::Blocking)
        })
    }

    pub fn get_orientation_relative(&self, other: &SceneObject) -> Result<[f32; 3]> {
        self.call("retrieve relative orientation of", |api, client, handle| {
            api.get_object_orientation(client, handle, other.handle, OpMode::Blocking)
        })
    }

    pub fn set_orientation(&self, euler_angles: [f32; 3]) -> Result<()> {
        self.call("set orientation of", |api, client, handle| {
            api.set_object_orientation(
                client,
                handle,
                ObjectHandle::NONE,
                euler_angles,
                OpMode::Blocking,
            )
        })
    }

    pub fn set_orientation_relative(
        &self,
        other: &SceneObject,
        euler_angles: [f32; 3],
    ) -> Result<()> {
        self.call("set relative orientation of", |api, client, handle| {
            api.set_object_orientation(client, handle, other.handle, euler_angles, OpMode::Blocking)
        })
    }

    pub fn get_velocity(&self) -> Result<ObjectVelocity> {
        let (linear, angular) = self.call("retrieve velocity of", |api, client, handle| {
            api.get_object_velocity(client, handle, OpMode::Blocking)
        })?;
        Ok(ObjectVelocity { linear, angular })
    }

    /// 父对象；没有父对象时为 `None`
    pub fn get_parent(&self) -> Result<Option<SceneObject>> {
        let parent = self.call("retrieve parent of", |api, client, handle| {
            api.get_object_parent(client, handle, OpMode::Blocking)
        })?;
        if parent.is_none() {
            return Ok(None);
        }
        SceneObject::from_handle(&self.sim, parent).map(Some)
    }

    /// 设置父对象；`parent` 为 `None` 时挂到场景根节点
    ///
    /// `keep_in_place` 为 true 时保持对象的绝对位姿不变。
    pub fn set_parent(&self, parent: Option<&SceneObject>, keep_in_place: bool) -> Result<()> {
        let parent = parent.map_or(ObjectHandle::NONE, |p| p.handle);
        self.call("set parent of", |api, client, handle| {
            api.set_object_parent(client, handle, parent, keep_in_place, OpMode::Blocking)
        })
    }

    pub fn get_bounding_box(&self) -> Result<BoundingBox> {
        let read = |param: ObjectFloatParam| {
            self.call("retrieve bounding box of", |api, client, handle| {
                api.get_object_float_parameter(client, handle, param, OpMode::Blocking)
            })
        };
        Ok(BoundingBox {
            min: [
                read(ObjectFloatParam::BboxMinX)?,
                read(ObjectFloatParam::BboxMinY)?,
                read(ObjectFloatParam::BboxMinZ)?,
            ],
            max: [
                read(ObjectFloatParam::BboxMaxX)?,
                read(ObjectFloatParam::BboxMaxY)?,
                read(ObjectFloatParam::BboxMaxZ)?,
            ],
        })
    }

    /// 复制粘贴本对象，返回新对象
    pub fn copy(&self) -> Result<SceneObject> {
        let handles = self.call("copy", |api, client, handle| {
            api.copy_paste_objects(client, &[handle], OpMode::Blocking)
        })?;
        let Some(&handle) = handles.first() else {
            return Err(VrepError::UnexpectedValue {
                context: format!("copy {}", self.name),
                value: "no object handle".to_string(),
            });
        };
        SceneObject::from_handle(&self.sim, handle)
    }

    /// 从场景中移除本对象
    pub fn remove(self) -> Result<()> {
        self.call("remove", |api, client, handle| {
            api.remove_object(client, handle, OpMode::Blocking)
        })?;
        debug!("Removed {}", self.name);
        Ok(())
    }
}

/// 为包装 `SceneObject` 的对象类型实现 `Deref`、转换与 `remove`
macro_rules! scene_object_wrapper {
    ($ty:ident) => {
        impl std::ops::Deref for $ty {
            type Target = $crate::objects::SceneObject;

            fn deref(&self) -> &Self::Target {
                &self.object
            }
        }

        impl AsRef<$crate::objects::SceneObject> for $ty {
            fn as_ref(&self) -> &$crate::objects::SceneObject {
                &self.object
            }
        }

        impl From<$ty> for $crate::objects::SceneObject {
            fn from(value: $ty) -> Self {
                value.object
            }
        }

        impl $ty {
            /// 包装已有的场景对象
            pub fn from_object(object: $crate::objects::SceneObject) -> Self {
                Self { object }
            }

            /// 取出底层场景对象
            pub fn into_object(self) -> $crate::objects::SceneObject {
                self.object
            }

            /// 从场景中移除
            pub fn remove(self) -> $crate::error::Result<()> {
                self.object.remove()
            }
        }
    };
}

pub(crate) use scene_object_wrapper;

/// Dummy 对象
#[derive(Debug)]
pub struct Dummy {
    object: SceneObject,
}

impl Dummy {
    pub fn new(sim: &Simulator, name: &str) -> Result<Self> {
        SceneObject::new(sim, name).map(Self::from_object)
    }
}

scene_object_wrapper!(Dummy);
