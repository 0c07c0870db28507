//! 传感器与电机数组

use super::{Motor, ProximitySensor};
use crate::error::{Result, VrepError};
use crate::simulator::Simulator;
use std::ops::Deref;

/// 有序传感器数组
#[derive(Debug)]
pub struct SensorArray<S> {
    sensors: Vec<S>,
}

/// 接近传感器数组
pub type ProximitySensorArray = SensorArray<ProximitySensor>;

impl<S> SensorArray<S> {
    pub fn from_sensors(sensors: Vec<S>) -> Self {
        Self { sensors }
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sensors
    }
}

impl<S> Deref for SensorArray<S> {
    type Target = [S];

    fn deref(&self) -> &[S] {
        &self.sensors
    }
}

impl SensorArray<ProximitySensor> {
    /// 按名称依次获取传感器句柄
    pub fn new<N: AsRef<str>>(sim: &Simulator, names: &[N]) -> Result<Self> {
        names
            .iter()
            .map(|name| ProximitySensor::new(sim, name.as_ref()))
            .collect::<Result<Vec<_>>>()
            .map(Self::from_sensors)
    }

    /// 各传感器的检测距离，顺序与构造时一致
    pub fn get_distances(&self) -> Result<Vec<Option<f32>>> {
        self.sensors.iter().map(ProximitySensor::get_distance).collect()
    }
}

/// 有序电机数组
#[derive(Debug)]
pub struct MotorArray {
    motors: Vec<Motor>,
}

impl MotorArray {
    pub fn new<N: AsRef<str>>(sim: &Simulator, names: &[N]) -> Result<Self> {
        names
            .iter()
            .map(|name| Motor::new(sim, name.as_ref()))
            .collect::<Result<Vec<_>>>()
            .map(Self::from_motors)
    }

    pub fn from_motors(motors: Vec<Motor>) -> Self {
        Self { motors }
    }

    pub fn into_inner(self) -> Vec<Motor> {
        self.motors
    }

    pub fn get_velocities(&self) -> Result<Vec<f32>> {
        self.motors.iter().map(Motor::get_velocity).collect()
    }

    /// 依次设置目标速度
    ///
    /// `velocities` 长度必须与电机数量一致。
    pub fn set_velocities(&self, velocities: &[f32]) -> Result<()> {
        if velocities.len() != self.motors.len() {
            return Err(VrepError::InvalidArgument(format!(
                "expected {} velocities, got {}",
                self.motors.len(),
                velocities.len()
            )));
        }
        self.motors
            .iter()
            .zip(velocities)
            .try_for_each(|(motor, &velocity)| motor.set_velocity(velocity))
    }

    pub fn get_joint_positions(&self) -> Result<Vec<f32>> {
        self.motors.iter().map(Motor::get_joint_position).collect()
    }
}

impl Deref for MotorArray {
    type Target = [Motor];

    fn deref(&self) -> &[Motor] {
        &self.motors
    }
}
