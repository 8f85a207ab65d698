//! End-to-end checks of the physics/scene coupling through the public API

use std::sync::Arc;

use cgmath::{One, Quaternion, Vector3};
use parking_lot::Mutex;

use kiln_engine::math::rotation_from_direction;
use kiln_engine::physics::system;
use kiln_engine::{
    BodyType, CategoryProperties, ColliderParameters, ContactEventKind, DoodadParameters,
    FieldParameters, InputState, RigidBodyParameters, Scene, SceneParameters, Shape, Transform,
    LEFT, RIGHT,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn at(position: Vector3<f32>) -> Transform {
    Transform::new(position, Quaternion::one(), Vector3::new(1.0, 1.0, 1.0))
}

fn vec3_eq(a: Vector3<f32>, b: Vector3<f32>) -> bool {
    (a.x - b.x).abs() <= 1e-5 && (a.y - b.y).abs() <= 1e-5 && (a.z - b.z).abs() <= 1e-5
}

/// Shared event log a contact callback appends to
type EventLog = Arc<Mutex<Vec<ContactEventKind>>>;

fn logging_collider(shape: Shape, log: &EventLog) -> ColliderParameters {
    let (start, stay, end) = (Arc::clone(log), Arc::clone(log), Arc::clone(log));
    ColliderParameters {
        shape,
        on_start: Some(Box::new(move |e| start.lock().push(e.kind))),
        on_stay: Some(Box::new(move |e| stay.lock().push(e.kind))),
        on_end: Some(Box::new(move |e| end.lock().push(e.kind))),
        ..Default::default()
    }
}

#[test]
fn kinematic_linear_motion_with_accumulator() {
    init_logger();
    let field = system::create_field(FieldParameters {
        gravity: Vector3::new(0.0, 0.0, 0.0),
        fixed_step: 1.0,
    });
    let body = system::create_rigid_body(
        field,
        &at(Vector3::new(0.0, 0.0, 0.0)),
        RigidBodyParameters {
            body_type: BodyType::Kinematic,
            ..Default::default()
        },
    )
    .expect("body created");

    system::with_field_mut(field, |f| {
        f.body_mut(body)
            .expect("body exists")
            .set_linear_velocity(Vector3::new(1.0, 2.0, 3.0));

        let alpha = f.fixed_update(2.0);
        assert_eq!(alpha, 0.0);
        assert!(vec3_eq(
            f.body(body).expect("body exists").position(),
            Vector3::new(2.0, 4.0, 6.0)
        ));

        f.fixed_update(1.0);
        assert!(vec3_eq(
            f.body(body).expect("body exists").position(),
            Vector3::new(3.0, 6.0, 9.0)
        ));

        // Less than a full step: nothing advances, alpha reports the leftover.
        let alpha = f.fixed_update(0.5);
        assert_eq!(alpha, 0.5);
        assert!(vec3_eq(
            f.body(body).expect("body exists").position(),
            Vector3::new(3.0, 6.0, 9.0)
        ));
        assert_eq!(f.substeps(), 3);
    })
    .expect("field exists");

    system::destroy_field(field).expect("field destroyed");
}

#[test]
fn free_fall_is_semi_implicit() {
    init_logger();
    let field = system::create_field(FieldParameters {
        gravity: Vector3::new(0.0, -4.0, 0.0),
        fixed_step: 1.0,
    });
    let body = system::create_rigid_body(
        field,
        &at(Vector3::new(0.0, 10.0, 0.0)),
        RigidBodyParameters::default(),
    )
    .expect("body created");

    system::with_field_mut(field, |f| {
        // Velocity updates before position, so the first step already moves
        // by a full g*dt.
        let expected_y = [6.0, -2.0, -14.0];
        for y in expected_y {
            f.step_once();
            let p = f.body(body).expect("body exists").position();
            assert!(vec3_eq(p, Vector3::new(0.0, y, 0.0)), "got {:?}", p);
        }
    })
    .expect("field exists");

    system::destroy_field(field).expect("field destroyed");
}

#[test]
fn contact_lifecycle_start_stay_end() {
    init_logger();
    let field = system::create_field(FieldParameters {
        gravity: Vector3::new(0.0, -1.0, 0.0),
        fixed_step: 1.0,
    });
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));

    let sphere = system::create_rigid_body(
        field,
        &at(Vector3::new(0.0, 0.4, 0.0)),
        RigidBodyParameters {
            collider: logging_collider(Shape::new_sphere(1.0), &log),
            ..Default::default()
        },
    )
    .expect("sphere created");
    system::create_rigid_body(
        field,
        &at(Vector3::new(0.0, -1.0, 0.0)),
        RigidBodyParameters {
            body_type: BodyType::Static,
            collider: ColliderParameters {
                shape: Shape::new_box(Vector3::new(5.0, 0.5, 5.0)),
                ..Default::default()
            },
            ..Default::default()
        },
    )
    .expect("floor created");

    system::with_field_mut(field, |f| {
        f.step_once();
        assert_eq!(*log.lock(), vec![ContactEventKind::Start]);

        f.step_once();
        f.step_once();
        assert_eq!(
            *log.lock(),
            vec![
                ContactEventKind::Start,
                ContactEventKind::Stay,
                ContactEventKind::Stay
            ]
        );

        // Teleporting out of contact produces exactly one End.
        f.body_mut(sphere)
            .expect("sphere exists")
            .set_position(Vector3::new(1000.0, 1000.0, 1000.0));
        f.step_once();
        assert_eq!(log.lock().last(), Some(&ContactEventKind::End));

        // Teleporting back restarts the sequence with a fresh Start.
        f.body_mut(sphere)
            .expect("sphere exists")
            .set_position(Vector3::new(0.0, 0.0, 0.0));
        f.step_once();
        assert_eq!(log.lock().last(), Some(&ContactEventKind::Start));
    })
    .expect("field exists");

    system::destroy_field(field).expect("field destroyed");
}

#[test]
fn trigger_reports_without_resolution() {
    init_logger();
    let field = system::create_field(FieldParameters {
        gravity: Vector3::new(0.0, 0.0, 0.0),
        fixed_step: 1.0,
    });
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));

    let sphere = system::create_rigid_body(
        field,
        &at(Vector3::new(0.0, 100.0, 0.0)),
        RigidBodyParameters {
            collider: logging_collider(Shape::new_sphere(1.0), &log),
            ..Default::default()
        },
    )
    .expect("sphere created");
    system::create_rigid_body(
        field,
        &at(Vector3::new(0.0, -1.0, 0.0)),
        RigidBodyParameters {
            body_type: BodyType::Static,
            collider: ColliderParameters {
                shape: Shape::new_box(Vector3::new(5.0, 0.5, 5.0)),
                is_trigger: true,
                ..Default::default()
            },
            ..Default::default()
        },
    )
    .expect("trigger volume created");

    system::with_field_mut(field, |f| {
        f.step_once();
        assert!(log.lock().is_empty());

        f.body_mut(sphere)
            .expect("sphere exists")
            .set_position(Vector3::new(0.0, 0.0, 0.0));
        f.step_once();
        assert_eq!(*log.lock(), vec![ContactEventKind::Start]);
        // The solver never corrects a trigger overlap.
        assert!(vec3_eq(
            f.body(sphere).expect("sphere exists").position(),
            Vector3::new(0.0, 0.0, 0.0)
        ));

        f.step_once();
        assert_eq!(log.lock().last(), Some(&ContactEventKind::Stay));
        assert!(vec3_eq(
            f.body(sphere).expect("sphere exists").position(),
            Vector3::new(0.0, 0.0, 0.0)
        ));

        f.body_mut(sphere)
            .expect("sphere exists")
            .set_position(Vector3::new(0.0, 100.0, 0.0));
        f.step_once();
        assert_eq!(log.lock().last(), Some(&ContactEventKind::End));
    })
    .expect("field exists");

    system::destroy_field(field).expect("field destroyed");
}

#[test]
fn doodad_snaps_pose_and_scale_reshapes_collider() {
    init_logger();
    let mut scene = Scene::new(SceneParameters {
        gravity: Vector3::new(0.0, 0.0, 0.0),
        fixed_step: 1.0,
    });

    let id = scene
        .add_doodad(DoodadParameters {
            transform: Transform::new(
                Vector3::new(1.0, 2.0, 3.0),
                rotation_from_direction(RIGHT),
                Vector3::new(4.0, 5.0, 6.0),
            ),
            rigid_body: Some(RigidBodyParameters {
                body_type: BodyType::Kinematic,
                collider: ColliderParameters {
                    shape: Shape::new_box(Vector3::new(1.0, 1.0, 1.0)),
                    ..Default::default()
                },
                ..Default::default()
            }),
            fixed_update: Some(Box::new(|doodad, ctx, _| {
                let id = doodad.rigid_body().expect("has body");
                let body = ctx.field.body_mut(id).expect("body exists");
                body.set_position(Vector3::new(99.0, 100.0, 101.0));
                body.set_rotation(rotation_from_direction(LEFT));
                doodad.transform.scale = Vector3::new(88.0, 777.0, 66.0);
            })),
            ..Default::default()
        })
        .expect("doodad added");

    let input = InputState::new();
    scene.tick(&input, 1.0).expect("tick");

    let doodad = scene.doodad(id).expect("doodad exists");
    assert!(vec3_eq(
        doodad.transform.position,
        Vector3::new(99.0, 100.0, 101.0)
    ));
    let expected_rot = rotation_from_direction(LEFT);
    let rot = doodad.transform.rotation;
    assert!((rot.s - expected_rot.s).abs() <= 1e-5);
    assert!(vec3_eq(rot.v, expected_rot.v));
    assert!(vec3_eq(doodad.transform.scale, Vector3::new(88.0, 777.0, 66.0)));

    // The collider shape follows the doodad scale.
    let body = doodad.rigid_body().expect("has body");
    let half = system::with_field(scene.field_id(), |f| {
        f.body(body)
            .expect("body exists")
            .collider()
            .expect("has collider")
            .scaled_shape()
    })
    .expect("field exists");
    match half {
        Shape::Box { half_extents } => {
            assert!(vec3_eq(half_extents, Vector3::new(88.0, 777.0, 66.0)))
        }
        other => panic!("expected a box, got {:?}", other),
    }
}

#[test]
fn category_mask_must_agree_both_ways() {
    init_logger();
    let field = system::create_field(FieldParameters {
        gravity: Vector3::new(0.0, 0.0, 0.0),
        fixed_step: 1.0,
    });
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));

    let mut a = logging_collider(Shape::new_sphere(1.0), &log);
    a.category = CategoryProperties {
        category_bits: 0b01,
        collide_mask_bits: 0b01,
    };
    let mut b = logging_collider(Shape::new_sphere(1.0), &log);
    b.category = CategoryProperties {
        category_bits: 0b10,
        collide_mask_bits: 0b01,
    };

    // Fully overlapping spheres; the filter alone keeps them silent.
    system::create_rigid_body(
        field,
        &at(Vector3::new(0.0, 0.0, 0.0)),
        RigidBodyParameters {
            collider: a,
            ..Default::default()
        },
    )
    .expect("body a created");
    system::create_rigid_body(
        field,
        &at(Vector3::new(0.5, 0.0, 0.0)),
        RigidBodyParameters {
            collider: b,
            ..Default::default()
        },
    )
    .expect("body b created");

    system::with_field_mut(field, |f| {
        for _ in 0..3 {
            f.step_once();
        }
    })
    .expect("field exists");
    assert!(log.lock().is_empty());

    system::destroy_field(field).expect("field destroyed");
}

#[test]
fn identical_fields_step_bit_identically() {
    init_logger();
    let make = || {
        let field = system::create_field(FieldParameters {
            gravity: Vector3::new(0.0, -9.81, 0.0),
            fixed_step: 1.0 / 60.0,
        });
        for i in 0..8 {
            system::create_rigid_body(
                field,
                &at(Vector3::new(i as f32 * 0.6, 3.0 + i as f32, 0.0)),
                RigidBodyParameters {
                    collider: ColliderParameters {
                        shape: Shape::new_sphere(0.5),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
            .expect("body created");
        }
        system::create_rigid_body(
            field,
            &at(Vector3::new(0.0, -1.0, 0.0)),
            RigidBodyParameters {
                body_type: BodyType::Static,
                collider: ColliderParameters {
                    shape: Shape::new_box(Vector3::new(20.0, 0.5, 20.0)),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .expect("floor created");
        field
    };

    let first = make();
    let second = make();
    let positions = |field| {
        system::with_field_mut(field, |f| {
            for _ in 0..120 {
                f.step_once();
            }
            f.bodies()
                .map(|b| {
                    let p = b.position();
                    [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
                })
                .collect::<Vec<_>>()
        })
        .expect("field exists")
    };

    assert_eq!(positions(first), positions(second));

    system::destroy_field(first).expect("field destroyed");
    system::destroy_field(second).expect("field destroyed");
}
