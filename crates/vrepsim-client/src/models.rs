//! # 模型
//!
//! - [`Model`]: 通用模型（以模型基对象命名）
//! - [`PioneerBot`]: Pioneer P3-DX 差速移动机器人，16 个超声波传感器 + 左右两个轮子电机

use crate::error::Result;
use crate::objects::{MotorArray, ProximitySensorArray, SceneObject, scene_object_wrapper};
use crate::simulator::Simulator;

/// 通用模型
#[derive(Debug)]
pub struct Model {
    object: SceneObject,
}

impl Model {
    pub fn new(sim: &Simulator, name: &str) -> Result<Self> {
        SceneObject::new(sim, name).map(Self::from_object)
    }
}

scene_object_wrapper!(Model);

/// Pioneer P3-DX 默认模型名称
pub const PIONEER_P3DX: &str = "Pioneer_p3dx";

/// Pioneer P3-DX 超声波传感器数量
pub const PIONEER_SONAR_COUNT: usize = 16;

/// Pioneer P3-DX 机器人
#[derive(Debug)]
pub struct PioneerBot {
    model: Model,
    /// 超声波传感器
    pub us_sensors: ProximitySensorArray,
    /// [左轮, 右轮]
    pub wheels: MotorArray,
}

impl PioneerBot {
    pub fn new<S: AsRef<str>, M: AsRef<str>>(
        sim: &Simulator,
        name: &str,
        us_sensor_names: &[S],
        motor_names: &[M],
    ) -> Result<Self> {
        Ok(Self {
            model: Model::new(sim, name)?,
            us_sensors: ProximitySensorArray::new(sim, us_sensor_names)?,
            wheels: MotorArray::new(sim, motor_names)?,
        })
    }

    /// 使用 V-REP 自带 Pioneer P3-DX 模型的默认对象名称
    pub fn with_default_names(sim: &Simulator) -> Result<Self> {
        let sensors: Vec<String> = (1..=PIONEER_SONAR_COUNT)
            .map(|i| format!("{}_ultrasonicSensor{}", PIONEER_P3DX, i))
            .collect();
        let motors = [
            format!("{}_leftMotor", PIONEER_P3DX),
            format!("{}_rightMotor", PIONEER_P3DX),
        ];
        Self::new(sim, PIONEER_P3DX, &sensors, &motors)
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// 设置左右轮目标速度 (rad/s)
    pub fn set_wheel_velocities(&self, left: f32, right: f32) -> Result<()> {
        self.wheels.set_velocities(&[left, right])
    }

    /// 各超声波传感器的检测距离
    pub fn get_sonar_distances(&self) -> Result<Vec<Option<f32>>> {
        self.us_sensors.get_distances()
    }
}

impl std::ops::Deref for PioneerBot {
    type Target = SceneObject;

    fn deref(&self) -> &SceneObject {
        &self.model
    }
}
