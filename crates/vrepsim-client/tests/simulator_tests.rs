//! Simulator 会话集成测试
//!
//! 使用 MockRemoteApi 验证：
//! - 连接 / 断开的前置条件与调用顺序
//! - 服务端查询的参数转发与结果转换
//! - 仿真控制（同步模式、novalue 容忍、运行标志）
//! - 返回码到错误类别的映射

mod common;

use common::{connected_sim, mock_sim};
use vrepsim_client::{DynamicsEngine, ErrorKind, VrepError};
use vrepsim_remote::mock::MockSimState;
use vrepsim_remote::{
    BoolParam, ClientId, FloatParam, IntParam, MessageInfo, MockCall, OpMode, ReturnCode,
    StringParam,
};

const CLIENT: ClientId = ClientId(0);

#[test]
fn test_connect_finishes_stale_connections_first() {
    let (api, sim) = mock_sim();
    assert!(!sim.is_connected());

    sim.connect().unwrap();

    assert!(sim.is_connected());
    assert_eq!(sim.client_id(), Some(CLIENT));
    assert_eq!(
        api.calls(),
        vec![
            MockCall::FinishAll,
            MockCall::Start {
                address: "127.0.0.1".to_string(),
                port: 19997,
            },
        ]
    );
}

#[test]
fn test_connect_twice_is_connection_error() {
    let (api, sim) = connected_sim();

    let err = sim.connect().unwrap_err();
    assert!(matches!(err, VrepError::AlreadyConnected { .. }));
    assert!(err.is_connection_error());
    // 不应再次调用 start
    assert!(api.calls().is_empty());
}

#[test]
fn test_connect_refused() {
    let (api, sim) = mock_sim();
    api.set_accept_connections(false);

    let err = sim.connect().unwrap_err();
    assert!(matches!(err, VrepError::ConnectFailed { .. }));
    assert_eq!(err.kind(), ErrorKind::Connection);
    assert!(err.to_string().contains("127.0.0.1:19997"));
    assert!(!sim.is_connected());
}

#[test]
fn test_disconnect() {
    let (api, sim) = connected_sim();

    assert!(sim.disconnect());
    assert!(!sim.is_connected());
    assert_eq!(api.calls(), vec![MockCall::Finish { client: CLIENT }]);
    assert_eq!(api.client_count(), 0);

    // 再次断开：只记录警告
    assert!(!sim.disconnect());
    assert_eq!(api.calls().len(), 1);
}

#[test]
fn test_drop_last_handle_disconnects() {
    let (api, sim) = connected_sim();
    let clone = sim.clone();
    assert!(clone.same_session(&sim));

    drop(sim);
    assert_eq!(api.client_count(), 1);

    drop(clone);
    assert_eq!(api.client_count(), 0);
    assert_eq!(api.last_call(), Some(MockCall::Finish { client: CLIENT }));
}

#[test]
fn test_reconnect_after_disconnect() {
    let (_api, sim) = connected_sim();
    sim.disconnect();
    sim.connect().unwrap();
    assert_eq!(sim.client_id(), Some(ClientId(1)));
}

#[test]
fn test_calls_when_not_connected() {
    let (api, sim) = mock_sim();

    let err = sim.get_version().unwrap_err();
    assert!(matches!(err, VrepError::NotConnected { .. }));
    assert_eq!(
        err.to_string(),
        "Could not retrieve V-REP version: not connected to V-REP remote API server"
    );

    assert!(sim.start_sim().unwrap_err().is_connection_error());
    assert!(sim.trig_sim_step().unwrap_err().is_connection_error());
    assert!(sim.get_last_cmd_time().unwrap_err().is_connection_error());
    assert!(api.calls().is_empty());
}

#[test]
fn test_get_version() {
    let (api, sim) = connected_sim();
    api.set_int_parameter(IntParam::ProgramVersion, 30_402);

    assert_eq!(sim.get_version().unwrap().to_string(), "3.4.2");
    assert_eq!(
        api.last_call(),
        Some(MockCall::GetIntegerParameter {
            client: CLIENT,
            param: IntParam::ProgramVersion,
            mode: OpMode::Blocking,
        })
    );
}

#[test]
fn test_get_version_failure_is_server_error() {
    let (api, sim) = connected_sim();
    api.fail("get_integer_parameter", ReturnCode::TIMEOUT);

    let err = sim.get_version().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert!(err.is_timeout());
    assert_eq!(err.return_code(), Some(ReturnCode::TIMEOUT));
}

#[test]
fn test_dynamics_engine() {
    let (api, sim) = connected_sim();

    for (id, engine) in [
        (0, DynamicsEngine::Bullet),
        (1, DynamicsEngine::Ode),
        (2, DynamicsEngine::Vortex),
        (3, DynamicsEngine::Newton),
    ] {
        api.set_int_parameter(IntParam::DynamicEngine, id);
        assert_eq!(sim.get_dyn_eng_name().unwrap(), engine);
    }
    assert_eq!(
        api.last_call(),
        Some(MockCall::GetIntegerParameter {
            client: CLIENT,
            param: IntParam::DynamicEngine,
            mode: OpMode::Blocking,
        })
    );

    api.set_int_parameter(IntParam::DynamicEngine, 9);
    let err = sim.get_dyn_eng_name().unwrap_err();
    assert!(matches!(err, VrepError::UnexpectedValue { .. }));
    assert_eq!(err.kind(), ErrorKind::Server);
}

#[test]
fn test_time_steps_are_rounded() {
    let (api, sim) = connected_sim();
    api.set_float_parameter(FloatParam::SimulationTimeStep, 0.05);
    api.set_float_parameter(FloatParam::DynamicStepSize, 0.005);

    assert_eq!(sim.get_sim_dt().unwrap(), 0.05);
    assert_eq!(sim.get_dyn_eng_dt().unwrap(), 0.005);

    api.set_float_parameter(FloatParam::SimulationTimeStep, 0.123_456);
    assert_eq!(sim.get_sim_dt().unwrap(), 0.1235);
    assert_eq!(
        api.last_call(),
        Some(MockCall::GetFloatingParameter {
            client: CLIENT,
            param: FloatParam::SimulationTimeStep,
            mode: OpMode::Blocking,
        })
    );
}

#[test]
fn test_time_step_failure_is_simulation_error() {
    let (api, sim) = connected_sim();
    api.fail("get_floating_parameter", ReturnCode::REMOTE_ERROR);

    assert_eq!(sim.get_sim_dt().unwrap_err().kind(), ErrorKind::Simulation);
    assert_eq!(sim.get_dyn_eng_dt().unwrap_err().kind(), ErrorKind::Simulation);
}

#[test]
fn test_scene_path() {
    let (api, sim) = connected_sim();
    api.set_string_parameter(StringParam::ScenePathAndName, "/scenes/pioneer.ttt");

    assert_eq!(sim.get_scene_path().unwrap(), "/scenes/pioneer.ttt");
    assert_eq!(
        api.last_call(),
        Some(MockCall::GetStringParameter {
            client: CLIENT,
            param: StringParam::ScenePathAndName,
            mode: OpMode::Blocking,
        })
    );
}

#[test]
fn test_start_step_stop() {
    let (api, sim) = connected_sim();
    assert!(!sim.is_sim_running());

    sim.start_sim().unwrap();
    assert!(sim.is_sim_running());
    assert!(api.is_synchronous());
    assert_eq!(api.sim_state(), MockSimState::Running);
    assert_eq!(
        api.take_calls(),
        vec![
            MockCall::Synchronous {
                client: CLIENT,
                enable: true,
            },
            MockCall::StartSimulation {
                client: CLIENT,
                mode: OpMode::Blocking,
            },
        ]
    );

    for _ in 0..3 {
        sim.trig_sim_step().unwrap();
    }
    assert_eq!(api.steps(), 3);
    assert_eq!(sim.get_last_cmd_time().unwrap(), 150);

    sim.stop_sim().unwrap();
    assert!(!sim.is_sim_running());
    assert_eq!(api.sim_state(), MockSimState::Stopped);
}

#[test]
fn test_pause_clears_running_flag() {
    let (api, sim) = connected_sim();
    sim.start_sim().unwrap();

    sim.pause_sim().unwrap();
    assert!(!sim.is_sim_running());
    assert_eq!(api.sim_state(), MockSimState::Paused);
    assert_eq!(
        api.last_call(),
        Some(MockCall::PauseSimulation {
            client: CLIENT,
            mode: OpMode::Blocking,
        })
    );
}

#[test]
fn test_novalue_accepted_for_simulation_control() {
    let (api, sim) = connected_sim();
    api.fail("start_simulation", ReturnCode::NOVALUE);
    api.fail("stop_simulation", ReturnCode::NOVALUE);
    api.fail("pause_simulation", ReturnCode::NOVALUE);

    sim.start_sim().unwrap();
    assert!(sim.is_sim_running());
    sim.pause_sim().unwrap();
    sim.stop_sim().unwrap();
    assert!(!sim.is_sim_running());
}

#[test]
fn test_start_failures() {
    let (api, sim) = connected_sim();
    api.fail("synchronous", ReturnCode::REMOTE_ERROR);
    let err = sim.start_sim().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Simulation);
    assert!(err.to_string().contains("synchronous"));
    // 同步模式失败时不再启动仿真
    assert_eq!(api.calls().len(), 1);

    api.clear_failures();
    api.fail("start_simulation", ReturnCode::NOVALUE | ReturnCode::TIMEOUT);
    let err = sim.start_sim().unwrap_err();
    assert!(err.is_timeout());
    assert!(!sim.is_sim_running());
}

#[test]
fn test_trigger_failure() {
    let (api, sim) = connected_sim();
    api.fail("synchronous_trigger", ReturnCode::LOCAL_ERROR);

    let err = sim.trig_sim_step().unwrap_err();
    assert!(matches!(err, VrepError::Simulation { .. }));
    assert_eq!(err.return_code(), Some(ReturnCode::LOCAL_ERROR));
}

#[test]
fn test_is_sim_started() {
    let (api, sim) = connected_sim();
    assert!(!sim.is_sim_started().unwrap());
    assert_eq!(
        api.take_calls(),
        vec![
            MockCall::GetBooleanParameter {
                client: CLIENT,
                param: BoolParam::WaitingForTrigger,
                mode: OpMode::Blocking,
            },
            MockCall::GetInMessageInfo {
                client: CLIENT,
                info: MessageInfo::ServerState,
            },
        ]
    );

    sim.start_sim().unwrap();
    assert!(sim.is_sim_started().unwrap());

    // 暂停也算已启动
    sim.pause_sim().unwrap();
    assert!(sim.is_sim_started().unwrap());

    sim.stop_sim().unwrap();
    assert!(!sim.is_sim_started().unwrap());
}

#[test]
fn test_is_sim_started_failures_are_server_errors() {
    let (api, sim) = connected_sim();

    api.fail("get_boolean_parameter", ReturnCode::TIMEOUT);
    assert_eq!(sim.is_sim_started().unwrap_err().kind(), ErrorKind::Server);

    api.clear_failures();
    api.fail("get_in_message_info", ReturnCode::LOCAL_ERROR);
    let err = sim.is_sim_started().unwrap_err();
    assert!(matches!(err, VrepError::Server { .. }));
}

#[test]
fn test_load_and_close_scene() {
    let (api, sim) = connected_sim();

    sim.load_scene("scenes/pioneer.ttt", true).unwrap();
    assert_eq!(
        api.last_call(),
        Some(MockCall::LoadScene {
            client: CLIENT,
            path: "scenes/pioneer.ttt".to_string(),
            client_side: true,
            mode: OpMode::Blocking,
        })
    );
    assert_eq!(sim.get_scene_path().unwrap(), "scenes/pioneer.ttt");

    sim.close_scene().unwrap();
    assert_eq!(sim.get_scene_path().unwrap(), "");
}

#[test]
fn test_load_scene_while_running_fails() {
    let (_api, sim) = connected_sim();
    sim.start_sim().unwrap();

    let err = sim.load_scene("other.ttt", false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Simulation);
    assert!(err.is_remote_error());
    assert!(err.to_string().contains("other.ttt"));
}

#[test]
fn test_connection_alive() {
    let (_api, sim) = connected_sim();
    assert!(sim.is_connection_alive());
    sim.disconnect();
    assert!(!sim.is_connection_alive());
}

#[test]
fn test_simulator_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<vrepsim_client::Simulator>();
    assert_send_sync::<vrepsim_client::SceneObject>();
}
