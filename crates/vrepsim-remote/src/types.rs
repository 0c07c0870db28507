//! Remote API 数据类型
//!
//! 远程调用的参数与返回值，全部是自包含的值类型。

use std::fmt;

/// 客户端连接 ID（`simxStart` 的返回值）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClientId(pub i32);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 场景对象句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectHandle(pub i32);

impl ObjectHandle {
    /// 无效句柄；作为 `relative_to` 参数时表示绝对坐标系，
    /// 作为父对象时表示没有父对象。
    pub const NONE: Self = Self(-1);

    pub fn is_none(self) -> bool {
        self.0 == -1
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 集合句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectionHandle(pub i32);

/// `simxStart` 的连接参数
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectParams {
    /// 服务端地址
    pub address: String,
    /// 服务端端口
    pub port: u16,
    /// 是否阻塞直到连接建立
    pub wait_until_connected: bool,
    /// 断开后不再自动重连
    pub do_not_reconnect: bool,
    /// 连接超时（毫秒）
    pub timeout_ms: i32,
    /// 通信线程周期（毫秒）
    pub comm_thread_cycle_ms: i32,
}

impl Default for ConnectParams {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 19997,
            wait_until_connected: true,
            do_not_reconnect: true,
            timeout_ms: 5000,
            comm_thread_cycle_ms: 5,
        }
    }
}

/// 接近传感器读数（`simxReadProximitySensor`）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProximityReading {
    /// 是否检测到物体
    pub detected: bool,
    /// 检测点（传感器坐标系）
    pub point: [f32; 3],
    /// 被检测物体的句柄
    pub object: i32,
    /// 被检测表面的法向量
    pub surface_normal: [f32; 3],
}

impl ProximityReading {
    /// 检测点到传感器的距离；未检测到物体时为 `None`
    pub fn distance(&self) -> Option<f32> {
        if !self.detected {
            return None;
        }
        let [x, y, z] = self.point;
        Some((x * x + y * y + z * z).sqrt())
    }
}

/// `simxGetObjectGroupData` 的返回数据
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupData {
    pub handles: Vec<i32>,
    pub int_data: Vec<i32>,
    pub float_data: Vec<f32>,
    pub string_data: Vec<String>,
}

/// 视觉传感器图像格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageFormat {
    /// 每像素 3 字节
    #[default]
    Rgb,
    /// 每像素 1 字节
    Grayscale,
}

impl ImageFormat {
    /// 每像素字节数
    pub fn channels(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Grayscale => 1,
        }
    }

    /// `simxGetVisionSensorImage` 的 options 参数
    pub fn options(self) -> u8 {
        match self {
            Self::Rgb => 0,
            Self::Grayscale => 1,
        }
    }
}

/// 视觉传感器图像
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisionImage {
    /// 分辨率 `[宽, 高]`
    pub resolution: [u32; 2],
    pub format: ImageFormat,
    /// 逐行像素数据，第一行是图像底部
    pub data: Vec<u8>,
}

impl VisionImage {
    pub fn width(&self) -> u32 {
        self.resolution[0]
    }

    pub fn height(&self) -> u32 {
        self.resolution[1]
    }

    /// 分辨率与格式决定的字节数
    pub fn expected_len(&self) -> usize {
        self.resolution[0] as usize * self.resolution[1] as usize * self.format.channels()
    }
}
