//! Remote API 常量定义
//!
//! 与 V-REP 自带的 `simConst.h` / `vrepConst.py` 保持一致的数值。
//! 只收录本仓库实际用到的常量，每一组都用强类型枚举包装，避免裸整数到处传递。

use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

/// 浮点返回值的默认舍入精度（小数位数）
///
/// 仿真步长等参数在远端以 `f32` 存储，读回时第 10 位小数附近会有误差。
pub const VREP_FLOAT_PREC: i32 = 4;

/// 将浮点数按 [`VREP_FLOAT_PREC`] 舍入
pub fn round_float(value: f32) -> f64 {
    let scale = 10f64.powi(VREP_FLOAT_PREC);
    (f64::from(value) * scale).round() / scale
}

/// 远程调用的操作模式（`simx_opmode_*`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum OpMode {
    /// 发送后立即返回，不等待回复
    Oneshot = 0x00_0000,
    /// 发送并阻塞等待回复
    Blocking = 0x01_0000,
    /// 持续流式传输
    Streaming = 0x02_0000,
    OneshotSplit = 0x03_0000,
    StreamingSplit = 0x04_0000,
    Discontinue = 0x05_0000,
    /// 读取已缓存的流式数据
    Buffer = 0x06_0000,
    Remove = 0x07_0000,
}

impl OpMode {
    /// 原始数值
    pub fn raw(self) -> i32 {
        self.into()
    }
}

bitflags! {
    /// 远程调用返回码（`simx_return_*`）
    ///
    /// 返回码是位标志，一次调用可能同时置位多个标志。
    /// 空集合即 `simx_return_ok`。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ReturnCode: i32 {
        /// 输入缓冲区中还没有对应的回复
        const NOVALUE = 0x01;
        /// 阻塞模式下等待超时
        const TIMEOUT = 0x02;
        /// 该命令不支持所给的操作模式
        const ILLEGAL_OPMODE = 0x04;
        /// 服务端执行出错（例如句柄无效）
        const REMOTE_ERROR = 0x08;
        /// 上一条 split 命令尚未处理完
        const SPLIT_PROGRESS = 0x10;
        /// 客户端本地错误
        const LOCAL_ERROR = 0x20;
        /// 尚未调用 simxStart
        const INITIALIZE_ERROR = 0x40;
    }
}

impl ReturnCode {
    /// `simx_return_ok`
    pub const OK: Self = Self::empty();

    /// 从原始返回值构造，保留未知位
    pub fn from_raw(raw: i32) -> Self {
        Self::from_bits_retain(raw)
    }

    /// 原始返回值
    pub fn raw(self) -> i32 {
        self.bits()
    }

    pub fn is_ok(self) -> bool {
        self.is_empty()
    }

    /// 将原始返回值转换为 `Result`
    pub fn check(raw: i32) -> Result<(), ReturnCode> {
        let code = Self::from_raw(raw);
        if code.is_ok() { Ok(()) } else { Err(code) }
    }

    /// 是否只包含 novalue 标志
    ///
    /// 启动/停止仿真时服务端经常不回复，这种情况视为成功。
    pub fn is_only_novalue(self) -> bool {
        self == Self::NOVALUE
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            return write!(f, "ok");
        }

        let mut first = true;
        for (name, _) in self.iter_names() {
            if !first {
                write!(f, " | ")?;
            }
            write!(f, "{}", name.to_ascii_lowercase())?;
            first = false;
        }

        let unknown = self.bits() & !Self::all().bits();
        if unknown != 0 {
            if !first {
                write!(f, " | ")?;
            }
            write!(f, "unknown")?;
        }

        write!(f, " (0x{:02X})", self.bits())
    }
}

impl std::error::Error for ReturnCode {}

/// 整型全局参数（`sim_intparam_*`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum IntParam {
    /// 程序版本，格式 `xyyzz`
    ProgramVersion = 0,
    /// 动力学引擎编号
    DynamicEngine = 8,
}

/// 浮点全局参数（`sim_floatparam_*`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum FloatParam {
    SimulationTimeStep = 1,
    /// 数值取自 `simConst.h`
    DynamicStepSize = 3,
}

/// 布尔全局参数（`sim_boolparam_*`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum BoolParam {
    WaitingForTrigger = 45,
}

/// 字符串全局参数（`sim_stringparam_*`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum StringParam {
    ScenePathAndName = 13,
}

/// 最近一条入站消息的头部信息（`simx_headeroffset_*`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum MessageInfo {
    ServerState = 17,
}

/// 服务端状态位：仿真未处于停止状态
pub const SERVER_STATE_SIM_NOT_STOPPED: i32 = 0x01;

/// 对象浮点参数（`sim_objfloatparam_*` / `sim_jointfloatparam_*`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum ObjectFloatParam {
    /// 对象自身的包围盒（`sim_objfloatparam_objbbox_*`），不是模型包围盒
    BboxMinX = 15,
    BboxMinY = 16,
    BboxMinZ = 17,
    BboxMaxX = 18,
    BboxMaxY = 19,
    BboxMaxZ = 20,
    JointVelocity = 2012,
}

/// `simxGetObjectGroupData` 的数据类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum GroupDataType {
    /// 对象名称（字符串数据）
    Names = 0,
    /// 绝对位置（每个对象 3 个浮点数）
    AbsolutePositions = 3,
    /// 欧拉角姿态（每个对象 3 个浮点数）
    Orientations = 5,
}

/// `simxGetObjectGroupData` 中表示"所有场景对象"的对象类型
pub const SIM_APPOBJ_OBJECT_TYPE: i32 = 109;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_code_check() {
        assert!(ReturnCode::check(0).is_ok());
        assert_eq!(ReturnCode::check(2), Err(ReturnCode::TIMEOUT));
        assert_eq!(
            ReturnCode::check(0x09),
            Err(ReturnCode::NOVALUE | ReturnCode::REMOTE_ERROR)
        );
    }

    #[test]
    fn test_return_code_display() {
        assert_eq!(ReturnCode::OK.to_string(), "ok");
        assert_eq!(ReturnCode::TIMEOUT.to_string(), "timeout (0x02)");
        assert_eq!(
            (ReturnCode::NOVALUE | ReturnCode::LOCAL_ERROR).to_string(),
            "novalue | local_error (0x21)"
        );
        assert_eq!(ReturnCode::from_raw(0x100).to_string(), "unknown (0x100)");
    }

    #[test]
    fn test_only_novalue() {
        assert!(ReturnCode::NOVALUE.is_only_novalue());
        assert!(!(ReturnCode::NOVALUE | ReturnCode::TIMEOUT).is_only_novalue());
        assert!(!ReturnCode::OK.is_only_novalue());
    }

    #[test]
    fn test_round_float() {
        assert_eq!(round_float(0.050_000_001), 0.05);
        assert_eq!(round_float(0.005), 0.005);
        assert_eq!(round_float(0.012_345_6), 0.0123);
    }

    #[test]
    fn test_object_bbox_param_ids() {
        assert_eq!(i32::from(ObjectFloatParam::BboxMinX), 15);
        assert_eq!(i32::from(ObjectFloatParam::BboxMinY), 16);
        assert_eq!(i32::from(ObjectFloatParam::BboxMinZ), 17);
        assert_eq!(i32::from(ObjectFloatParam::BboxMaxX), 18);
        assert_eq!(i32::from(ObjectFloatParam::BboxMaxY), 19);
        assert_eq!(i32::from(ObjectFloatParam::BboxMaxZ), 20);
        assert_eq!(i32::from(ObjectFloatParam::JointVelocity), 2012);
    }

    #[test]
    fn test_opmode_values() {
        assert_eq!(OpMode::Blocking.raw(), 0x01_0000);
        assert_eq!(OpMode::Buffer.raw(), 0x06_0000);
        assert_eq!(OpMode::try_from(0x02_0000).unwrap(), OpMode::Streaming);
        assert!(OpMode::try_from(0x08_0000).is_err());
    }
}
