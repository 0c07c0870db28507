//! Facade 集成测试：通过 prelude 使用 Mock 后端驱动 Pioneer 场景

use std::sync::Arc;
use vrepsim::prelude::*;
use vrepsim::remote::MockRemoteApi;
use vrepsim::remote::mock::MockObjectKind;

fn pioneer_api() -> Arc<MockRemoteApi> {
    let api = Arc::new(MockRemoteApi::new());
    api.add_object("Pioneer_p3dx", MockObjectKind::Shape);
    for i in 1..=16 {
        api.add_object(
            format!("Pioneer_p3dx_ultrasonicSensor{}", i),
            MockObjectKind::ProximitySensor,
        );
    }
    api.add_object("Pioneer_p3dx_leftMotor", MockObjectKind::Joint);
    api.add_object("Pioneer_p3dx_rightMotor", MockObjectKind::Joint);
    api
}

#[test]
fn test_prelude_drives_pioneer() {
    let api = pioneer_api();
    let sim = SimulatorBuilder::new().api(api.clone()).connect().unwrap();
    let bot = PioneerBot::with_default_names(&sim).unwrap();

    sim.start_sim().unwrap();
    for _ in 0..10 {
        bot.set_wheel_velocities(1.0, 0.5).unwrap();
        sim.trig_sim_step().unwrap();
    }
    sim.stop_sim().unwrap();

    assert_eq!(api.steps(), 10);
    assert_eq!(bot.wheels.get_velocities().unwrap(), vec![1.0, 0.5]);
    assert!(sim.disconnect());
}

#[test]
fn test_error_types_are_reexported() {
    let api = Arc::new(MockRemoteApi::new());
    let sim = SimulatorBuilder::new().api(api).build().unwrap();

    let err: VrepError = sim.get_version().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connection);
}

#[test]
fn test_init_logger_is_idempotent() {
    vrepsim::init_logger();
    assert!(!vrepsim::init_logger());
}
