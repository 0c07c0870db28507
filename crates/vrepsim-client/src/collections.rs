//! # 集合
//!
//! 集合是场景中定义的一组命名对象，可以一次性读取所有成员的名称、位置和姿态。

use crate::error::{ErrorKind, Result, VrepError};
use crate::simulator::Simulator;
use std::fmt;
use vrepsim_remote::{CollectionHandle, GroupData, GroupDataType, OpMode};

/// 场景对象集合
pub struct Collection {
    sim: Simulator,
    name: String,
    handle: CollectionHandle,
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("handle", &self.handle)
            .finish()
    }
}

impl Collection {
    /// 按名称获取集合句柄（阻塞）
    pub fn new(sim: &Simulator, name: &str) -> Result<Self> {
        let handle = sim.call(
            ErrorKind::Server,
            || format!("retrieve handle to {}", name),
            |api, client| api.get_collection_handle(client, name, OpMode::Blocking),
        )?;
        Ok(Self {
            sim: sim.clone(),
            name: name.to_string(),
            handle,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> CollectionHandle {
        self.handle
    }

    fn group_data(&self, what: &str, data_type: GroupDataType) -> Result<GroupData> {
        self.sim.call(
            ErrorKind::Server,
            || format!("retrieve {} of {}", what, self.name),
            |api, client| {
                api.get_object_group_data(client, self.handle.0, data_type, OpMode::Blocking)
            },
        )
    }

    /// 成员对象名称
    pub fn get_names(&self) -> Result<Vec<String>> {
        Ok(self.group_data("names", GroupDataType::Names)?.string_data)
    }

    /// 成员对象的绝对位置
    pub fn get_positions(&self) -> Result<Vec<[f32; 3]>> {
        let data = self.group_data("positions", GroupDataType::AbsolutePositions)?;
        triples(&data.float_data).ok_or_else(|| self.bad_length("positions", &data))
    }

    /// 成员对象的姿态（绝对坐标系下绕 x、y、z 轴的欧拉角）
    pub fn get_orientations(&self) -> Result<Vec<[f32; 3]>> {
        let data = self.group_data("orientations", GroupDataType::Orientations)?;
        triples(&data.float_data).ok_or_else(|| self.bad_length("orientations", &data))
    }

    fn bad_length(&self, what: &str, data: &GroupData) -> VrepError {
        VrepError::UnexpectedValue {
            context: format!("retrieve {} of {}", what, self.name),
            value: format!("{} floats (not a multiple of 3)", data.float_data.len()),
        }
    }
}

/// 按三个一组切分；长度不是 3 的倍数时返回 `None`
fn triples(values: &[f32]) -> Option<Vec<[f32; 3]>> {
    if values.len() % 3 != 0 {
        return None;
    }
    Some(
        values
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triples() {
        assert_eq!(
            triples(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            Some(vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])
        );
        assert_eq!(triples(&[]), Some(vec![]));
        assert_eq!(triples(&[1.0, 2.0]), None);
    }
}
