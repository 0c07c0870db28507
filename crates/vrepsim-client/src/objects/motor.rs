//! 电机（关节）

use super::{SceneObject, scene_object_wrapper};
use crate::error::Result;
use crate::simulator::Simulator;
use vrepsim_remote::{ObjectFloatParam, OpMode};

/// 电机，对应场景中的旋转或移动关节
///
/// 角度单位为弧度（旋转关节）或米（移动关节）。
#[derive(Debug)]
pub struct Motor {
    object: SceneObject,
}

impl Motor {
    pub fn new(sim: &Simulator, name: &str) -> Result<Self> {
        SceneObject::new(sim, name).map(Self::from_object)
    }

    /// 关节当前位置
    pub fn get_joint_position(&self) -> Result<f32> {
        self.object.call("retrieve joint position of", |api, client, handle| {
            api.get_joint_position(client, handle, OpMode::Blocking)
        })
    }

    /// 直接设置关节位置（不经过动力学）
    pub fn set_joint_position(&self, position: f32) -> Result<()> {
        self.object.call("set joint position of", |api, client, handle| {
            api.set_joint_position(client, handle, position, OpMode::Blocking)
        })
    }

    /// 位置控制模式下的目标位置
    pub fn set_target_position(&self, position: f32) -> Result<()> {
        self.object.call("set target position of", |api, client, handle| {
            api.set_joint_target_position(client, handle, position, OpMode::Blocking)
        })
    }

    /// 关节当前速度
    pub fn get_velocity(&self) -> Result<f32> {
        self.object.call("retrieve velocity of", |api, client, handle| {
            api.get_object_float_parameter(
                client,
                handle,
                ObjectFloatParam::JointVelocity,
                OpMode::Blocking,
            )
        })
    }

    /// 设置目标速度
    pub fn set_velocity(&self, velocity: f32) -> Result<()> {
        self.object.call("set velocity of", |api, client, handle| {
            api.set_joint_target_velocity(client, handle, velocity, OpMode::Blocking)
        })
    }
}

scene_object_wrapper!(Motor);
