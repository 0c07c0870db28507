//! 集成测试公共工具

#![allow(dead_code)]

use std::sync::Arc;
use vrepsim_client::{Simulator, SimulatorBuilder};
use vrepsim_remote::MockRemoteApi;

/// 创建使用 Mock 后端的未连接会话
pub fn mock_sim() -> (Arc<MockRemoteApi>, Simulator) {
    let api = Arc::new(MockRemoteApi::new());
    let sim = SimulatorBuilder::new()
        .api(api.clone())
        .build()
        .expect("build simulator with mock backend");
    (api, sim)
}

/// 创建已连接的会话，并清空连接过程中记录的调用
pub fn connected_sim() -> (Arc<MockRemoteApi>, Simulator) {
    let (api, sim) = mock_sim();
    sim.connect().expect("connect to mock server");
    api.take_calls();
    (api, sim)
}
