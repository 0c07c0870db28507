//! 传感器

use super::{SceneObject, scene_object_wrapper};
use crate::error::{Result, VrepError};
use crate::simulator::Simulator;
use vrepsim_remote::{ImageFormat, OpMode, ProximityReading, VisionImage};

/// 接近传感器（例如 Pioneer 的超声波传感器）
#[derive(Debug)]
pub struct ProximitySensor {
    object: SceneObject,
}

impl ProximitySensor {
    pub fn new(sim: &Simulator, name: &str) -> Result<Self> {
        SceneObject::new(sim, name).map(Self::from_object)
    }

    /// 读取传感器状态
    pub fn read(&self) -> Result<ProximityReading> {
        self.object.call("read proximity sensor", |api, client, handle| {
            api.read_proximity_sensor(client, handle, OpMode::Blocking)
        })
    }

    /// 到检测点的距离；未检测到物体时为 `None`
    pub fn get_distance(&self) -> Result<Option<f32>> {
        Ok(self.read()?.distance())
    }
}

scene_object_wrapper!(ProximitySensor);

/// 视觉传感器
#[derive(Debug)]
pub struct VisionSensor {
    object: SceneObject,
}

impl VisionSensor {
    pub fn new(sim: &Simulator, name: &str) -> Result<Self> {
        SceneObject::new(sim, name).map(Self::from_object)
    }

    /// 读取图像
    ///
    /// 返回的数据长度必须等于 宽 × 高 × 通道数。
    pub fn get_image(&self, format: ImageFormat) -> Result<VisionImage> {
        let image = self.object.call("retrieve image from", |api, client, handle| {
            api.get_vision_sensor_image(client, handle, format, OpMode::Blocking)
        })?;
        if image.data.len() != image.expected_len() {
            return Err(VrepError::UnexpectedValue {
                context: format!("retrieve image from {}", self.name()),
                value: format!(
                    "{} bytes for {}x{} image",
                    image.data.len(),
                    image.width(),
                    image.height()
                ),
            });
        }
        Ok(image)
    }

    /// 图像分辨率 [宽, 高]
    pub fn get_resolution(&self) -> Result<[u32; 2]> {
        Ok(self.get_image(ImageFormat::Grayscale)?.resolution)
    }
}

scene_object_wrapper!(VisionSensor);
