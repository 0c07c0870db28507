//! 集合与模型集成测试

mod common;

use common::{connected_sim, mock_sim};
use vrepsim_client::{Collection, ErrorKind, Model, PioneerBot, VrepError};
use vrepsim_remote::mock::{MockObject, MockObjectKind};
use vrepsim_remote::{ClientId, GroupDataType, MockCall, OpMode, ReturnCode};

const CLIENT: ClientId = ClientId(0);

/// 两个成员的集合 "Obstacles"
fn obstacles(api: &vrepsim_remote::MockRemoteApi) -> vrepsim_remote::CollectionHandle {
    let a = api.insert_object(MockObject {
        position: [1.0, 0.0, 0.25],
        orientation: [0.0, 0.0, 0.5],
        ..MockObject::new("Wall", MockObjectKind::Shape)
    });
    let b = api.insert_object(MockObject {
        position: [-2.0, 1.5, 0.25],
        orientation: [0.0, 0.0, -1.0],
        ..MockObject::new("Box", MockObjectKind::Shape)
    });
    api.add_object("Floor", MockObjectKind::Shape);
    api.add_collection("Obstacles", &[a, b])
}

#[test]
fn test_collection_handle() {
    let (api, sim) = connected_sim();
    let handle = obstacles(&api);

    let collection = Collection::new(&sim, "Obstacles").unwrap();
    assert_eq!(collection.name(), "Obstacles");
    assert_eq!(collection.handle(), handle);
    assert_eq!(
        api.last_call(),
        Some(MockCall::GetCollectionHandle {
            client: CLIENT,
            name: "Obstacles".to_string(),
            mode: OpMode::Blocking,
        })
    );
}

#[test]
fn test_collection_errors() {
    let (_api, sim) = mock_sim();
    let err = Collection::new(&sim, "Obstacles").unwrap_err();
    assert!(err.is_connection_error());
    assert_eq!(
        err.to_string(),
        "Could not retrieve handle to Obstacles: not connected to V-REP remote API server"
    );

    let (_api, sim) = connected_sim();
    let err = Collection::new(&sim, "Missing").unwrap_err();
    assert!(matches!(err, VrepError::Server { .. }));
}

#[test]
fn test_collection_group_data() {
    let (api, sim) = connected_sim();
    let handle = obstacles(&api);
    let collection = Collection::new(&sim, "Obstacles").unwrap();

    assert_eq!(collection.get_names().unwrap(), vec!["Wall", "Box"]);
    assert_eq!(
        api.last_call(),
        Some(MockCall::GetObjectGroupData {
            client: CLIENT,
            object_type: handle.0,
            data_type: GroupDataType::Names,
            mode: OpMode::Blocking,
        })
    );

    assert_eq!(
        collection.get_positions().unwrap(),
        vec![[1.0, 0.0, 0.25], [-2.0, 1.5, 0.25]]
    );
    assert_eq!(
        api.last_call(),
        Some(MockCall::GetObjectGroupData {
            client: CLIENT,
            object_type: handle.0,
            data_type: GroupDataType::AbsolutePositions,
            mode: OpMode::Blocking,
        })
    );

    assert_eq!(
        collection.get_orientations().unwrap(),
        vec![[0.0, 0.0, 0.5], [0.0, 0.0, -1.0]]
    );
    assert_eq!(
        api.last_call(),
        Some(MockCall::GetObjectGroupData {
            client: CLIENT,
            object_type: handle.0,
            data_type: GroupDataType::Orientations,
            mode: OpMode::Blocking,
        })
    );
}

#[test]
fn test_collection_group_data_failure() {
    let (api, sim) = connected_sim();
    obstacles(&api);
    let collection = Collection::new(&sim, "Obstacles").unwrap();
    api.fail("get_object_group_data", ReturnCode::TIMEOUT);

    let err = collection.get_positions().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(
        err.to_string(),
        "Could not retrieve positions of Obstacles: timeout (0x02)"
    );
}

#[test]
fn test_model() {
    let (api, sim) = connected_sim();
    api.insert_object(MockObject {
        position: [0.0, 0.0, 0.14],
        ..MockObject::new("Quadricopter", MockObjectKind::Shape)
    });

    let model = Model::new(&sim, "Quadricopter").unwrap();
    assert_eq!(model.get_position().unwrap(), [0.0, 0.0, 0.14]);
}

/// 按 V-REP 自带 Pioneer P3-DX 模型的命名构建场景
fn pioneer_scene(api: &vrepsim_remote::MockRemoteApi) {
    api.add_object("Pioneer_p3dx", MockObjectKind::Shape);
    for i in 1..=16 {
        let handle = api.add_object(
            format!("Pioneer_p3dx_ultrasonicSensor{}", i),
            MockObjectKind::ProximitySensor,
        );
        if i == 4 {
            api.update_object(handle, |object| {
                object.proximity.detected = true;
                object.proximity.point = [0.0, 0.0, 0.25];
            });
        }
    }
    api.add_object("Pioneer_p3dx_leftMotor", MockObjectKind::Joint);
    api.add_object("Pioneer_p3dx_rightMotor", MockObjectKind::Joint);
}

#[test]
fn test_pioneer_bot_default_names() {
    let (api, sim) = connected_sim();
    pioneer_scene(&api);

    let bot = PioneerBot::with_default_names(&sim).unwrap();
    assert_eq!(bot.name(), "Pioneer_p3dx");
    assert_eq!(bot.model().name(), "Pioneer_p3dx");
    assert_eq!(bot.us_sensors.len(), 16);
    assert_eq!(bot.us_sensors[0].name(), "Pioneer_p3dx_ultrasonicSensor1");
    assert_eq!(bot.us_sensors[15].name(), "Pioneer_p3dx_ultrasonicSensor16");
    assert_eq!(bot.wheels.len(), 2);
    assert_eq!(bot.wheels[0].name(), "Pioneer_p3dx_leftMotor");
    assert_eq!(bot.wheels[1].name(), "Pioneer_p3dx_rightMotor");

    let distances = bot.get_sonar_distances().unwrap();
    assert_eq!(distances.len(), 16);
    assert_eq!(distances[3], Some(0.25));
    assert_eq!(distances.iter().filter(|d| d.is_some()).count(), 1);
}

#[test]
fn test_pioneer_bot_wheels() {
    let (api, sim) = connected_sim();
    pioneer_scene(&api);
    let bot = PioneerBot::with_default_names(&sim).unwrap();

    bot.set_wheel_velocities(2.0, 1.5).unwrap();
    assert_eq!(bot.wheels.get_velocities().unwrap(), vec![2.0, 1.5]);
    let left = api.object(bot.wheels[0].handle()).unwrap();
    assert_eq!(left.joint_velocity, 2.0);
}

#[test]
fn test_pioneer_bot_custom_names() {
    let (api, sim) = connected_sim();
    api.add_object("Robot", MockObjectKind::Shape);
    api.add_object("FrontSonar", MockObjectKind::ProximitySensor);
    api.add_object("L", MockObjectKind::Joint);
    api.add_object("R", MockObjectKind::Joint);

    let bot = PioneerBot::new(&sim, "Robot", &["FrontSonar"], &["L", "R"]).unwrap();
    assert_eq!(bot.us_sensors.len(), 1);
    assert_eq!(bot.get_sonar_distances().unwrap(), vec![None]);
}

#[test]
fn test_pioneer_bot_missing_part() {
    let (api, sim) = connected_sim();
    pioneer_scene(&api);
    api.add_object("Other", MockObjectKind::Shape);

    let err = PioneerBot::new(&sim, "Pioneer_p3dx", &["Pioneer_p3dx_ultrasonicSensor1"], &[
        "Pioneer_p3dx_leftMotor",
        "Pioneer_p3dx_middleMotor",
    ])
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Simulation);
    assert!(err.to_string().contains("Pioneer_p3dx_middleMotor"));
}
