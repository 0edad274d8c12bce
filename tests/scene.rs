use std::f32::consts::FRAC_PI_2;

use blocky::*;

fn close(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-5
}

#[test]
fn rest_pose_body_sits_at_fixed_offset() {
    let controls = Controls::new();
    let frame = compose(
        &Rig::blocky_animal(),
        &controls.animation.pose(),
        controls.camera.global_rotation(),
    );

    let body = frame.part(BodyPart::Body).unwrap();
    assert!(close(body.model.translation(), Vec3::new(-0.25, -0.25, 0.5)));
    assert_eq!(
        frame.global_rotation,
        CameraController::new().global_rotation()
    );
}

#[test]
fn neck_animation_is_independent_of_frame_rate() {
    let mut slow = FrameDriver::new(Rig::blocky_animal(), Solids::default());
    let mut fast = FrameDriver::new(Rig::blocky_animal(), Solids::default());
    for driver in [&mut slow, &mut fast] {
        driver.controls.apply_input(InputEvent::ToggleAnimation {
            joint: Joint::Neck,
            running: true,
        });
    }

    let mut recorder = DrawRecorder::new();
    for i in 1..=10 {
        slow.frame(i as f32 * 0.25, &mut recorder);
    }
    for i in 1..=250 {
        fast.frame(i as f32 * 0.01, &mut recorder);
    }

    let expected = 45.0 * 2.5f32.sin();
    for driver in [&slow, &fast] {
        let angle = driver.controls.animation.channel(Joint::Neck).angle;
        assert!((angle - expected).abs() < 1e-3, "{angle} != {expected}");
    }
}

#[test]
fn slider_takes_over_from_animation() {
    let mut driver = FrameDriver::new(Rig::blocky_animal(), Solids::default());
    let mut recorder = DrawRecorder::new();

    driver.controls.apply_input(InputEvent::ToggleAnimation {
        joint: Joint::Head,
        running: true,
    });
    driver.frame(0.3, &mut recorder);
    driver.controls.apply_input(InputEvent::SliderChanged {
        slider: Slider::Head,
        value: 10.0,
    });

    for t in [1.0, 2.0, 3.0] {
        driver.frame(t, &mut recorder);
        assert_eq!(driver.controls.animation.channel(Joint::Head).angle, 10.0);
    }
    assert!(!driver.controls.animation.is_running(Joint::Head));
}

#[test]
fn reset_returns_everything_to_defaults() {
    let mut driver = FrameDriver::new(Rig::blocky_animal(), Solids::default());
    let mut recorder = DrawRecorder::new();

    for joint in Joint::ALL {
        driver.controls.apply_input(InputEvent::ToggleAnimation {
            joint,
            running: true,
        });
    }
    driver.controls.apply_input(InputEvent::Click {
        modifiers: Modifiers::SHIFT,
    });
    driver.controls.apply_input(InputEvent::DragMove { dx: -4.0, dy: 9.0 });
    for i in 0..30 {
        driver.frame(i as f32 * 0.1, &mut recorder);
    }

    driver.controls.apply_input(InputEvent::Reset);

    let controls = &driver.controls;
    assert_eq!(controls.camera.angle_x, 30.0);
    assert_eq!(controls.camera.angle_y, 0.0);
    assert_eq!(controls.animation.pose(), Pose::default());
    assert!(Joint::ALL.iter().all(|&j| !controls.animation.is_running(j)));
    assert!(!controls.animation.walk().running);
}

#[test]
fn walk_cycle_at_quarter_period() {
    let mut driver = FrameDriver::new(Rig::blocky_animal(), Solids::default());
    driver.controls.apply_input(InputEvent::Click {
        modifiers: Modifiers::SHIFT,
    });

    let mut recorder = DrawRecorder::new();
    driver.frame(0.0, &mut recorder);
    driver.frame(FRAC_PI_2, &mut recorder);

    let walk = driver.controls.animation.walk();
    assert!((walk.left_leg - 7.5).abs() < 1e-4);
    assert!((walk.right_leg - 7.5).abs() < 1e-4);
}

#[test]
fn stride_pose_moves_legs_and_lifts_body() {
    let rig = Rig::blocky_animal();
    let rest = compose(&rig, &Pose::default(), Matrix4::identity());
    let stride = compose(
        &rig,
        &Pose {
            left_leg: 12.0,
            right_leg: 3.0,
            ..Pose::default()
        },
        Matrix4::identity(),
    );

    for part in [BodyPart::LeftUpperLeg, BodyPart::RightLowerLeg] {
        assert_ne!(rest.part(part).unwrap().model, stride.part(part).unwrap().model);
    }
    let lift = stride.part(BodyPart::Body).unwrap().model.translation()
        - rest.part(BodyPart::Body).unwrap().model.translation();
    assert!(lift.length() > 0.0);
}

#[test]
fn drag_down_tilts_camera_and_every_frame_draws_whole_figure() {
    let mut driver = FrameDriver::new(Rig::blocky_animal(), Solids::new(8));
    let mut recorder = DrawRecorder::new();

    driver.controls.apply_input(InputEvent::DragMove { dx: 0.0, dy: 15.0 });
    driver.controls.apply_input(InputEvent::DragMove { dx: 0.0, dy: 1.0 });
    assert_eq!(driver.controls.camera.angle_y, 2.0);

    driver.frame(0.0, &mut recorder);
    driver.frame(0.5, &mut recorder);
    assert_eq!(recorder.frames, 2);
    assert_eq!(recorder.commands.len(), 11 * 6 + 3);
    assert_eq!(
        recorder.global_rotation,
        driver.controls.camera.global_rotation().as_mat4()
    );
}

#[test]
fn malformed_rig_is_rejected() {
    let mut table = BLOCKY_ANIMAL;
    table.swap(0, 1);
    assert!(matches!(
        Rig::new(&table),
        Err(RigError::ParentDeclaredLater { .. })
    ));
}
