use std::f64::consts::{FRAC_PI_2, TAU};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use galaxysim::simulation::galaxy::{circular_speed, init_galaxies};
use galaxysim::simulation::projection::{pick_nearest, to_camera_space};
use galaxysim::simulation::vecmath::{normalize, rotate};
use galaxysim::{
    semi_implicit_euler, view_matrix, projection_matrix, world_to_screen, AccelSet, BodyInit, BodyStore, Camera,
    CameraParams, Engine, Frame, GalaxyParams, Intent, ManualScheduler, NVec3, Parameters, ProjectionParams, Pursuit,
    Scenario, ScenarioConfig, Scheduler, SoftenedGravity, StepBuffers, StepOutcome, TickGate, ViewMode,
};

/// Plain white slot at `x` moving with `v`
pub fn slot(x: NVec3, v: NVec3) -> BodyInit {
    BodyInit {
        x,
        v,
        color: [1.0, 1.0, 1.0, 1.0],
        point_size: 1.0,
    }
}

/// Store holding only massive bodies at the given positions, at rest
pub fn bodies_at(points: &[NVec3]) -> BodyStore {
    let mut store = BodyStore::new();
    for p in points {
        store.push_body(slot(*p, NVec3::zeros()), Frame::identity());
    }
    store
}

/// Engine around a hand-built store, everything else default
pub fn engine_with(store: BodyStore, parameters: Parameters) -> Engine {
    Engine::with_store(
        parameters,
        GalaxyParams::default(),
        Camera::default(),
        ProjectionParams::default(),
        store,
        StdRng::seed_from_u64(0),
    )
}

/// Small generated engine for intent tests
pub fn small_engine(bh: usize, particles: usize, seed: u64) -> Engine {
    let parameters = Parameters {
        seed,
        ..Parameters::default()
    };
    let galaxy = GalaxyParams {
        bh_count: bh,
        particle_count: particles,
        ..GalaxyParams::default()
    };
    Engine::new(parameters, galaxy, Camera::default(), ProjectionParams::default())
}

fn assert_orthonormal(f: &Frame, tol: f64) {
    for v in [f.x, f.y, f.z] {
        assert!((v.norm() - 1.0).abs() < tol, "basis vector not unit: {v:?}");
    }
    assert!(f.x.dot(&f.y).abs() < tol, "X.Y = {}", f.x.dot(&f.y));
    assert!(f.x.dot(&f.z).abs() < tol, "X.Z = {}", f.x.dot(&f.z));
    assert!(f.y.dot(&f.z).abs() < tol, "Y.Z = {}", f.y.dot(&f.z));
}

// ==================================================================================
// Vector math tests
// ==================================================================================

#[test]
fn rotate_yaws_before_pitching() {
    let yawed = rotate(NVec3::x(), FRAC_PI_2, 0.0);
    assert!((yawed - NVec3::new(0.0, 0.0, -1.0)).norm() < 1e-12, "{yawed:?}");

    let pitched = rotate(NVec3::y(), 0.0, FRAC_PI_2);
    assert!((pitched - NVec3::new(0.0, 0.0, 1.0)).norm() < 1e-12, "{pitched:?}");

    // Z yawed onto X, then pitch about X leaves it there
    let both = rotate(NVec3::z(), FRAC_PI_2, FRAC_PI_2);
    assert!((both - NVec3::x()).norm() < 1e-12, "{both:?}");
}

#[test]
fn normalize_skips_short_vectors() {
    let short = NVec3::new(0.05, 0.0, 0.0);
    assert_eq!(normalize(short), short);

    let n = normalize(NVec3::new(3.0, 4.0, 0.0));
    assert!((n - NVec3::new(0.6, 0.8, 0.0)).norm() < 1e-12);
}

#[test]
fn orthonormalize_removes_small_drift() {
    let drifted = Frame {
        x: NVec3::new(1.0 + 1e-5, 0.0, 0.0),
        y: NVec3::new(1e-5, 1.0, 0.0),
        z: NVec3::new(0.0, -1e-5, 1.0 - 1e-5),
    };
    let f = drifted.orthonormalized();

    // X is only normalized
    assert!((f.x - NVec3::x()).norm() < 1e-12);
    assert_orthonormal(&f, 1e-8);
}

#[test]
fn camera_rotations_stay_orthonormal() {
    let mut camera = Camera::default();
    for i in 0..20_000 {
        let k = i as f64;
        camera.rotate(0.37 * (k * 0.11).sin(), -0.23 * (k * 0.07).cos());
    }
    assert_orthonormal(&camera.view, 1e-6);
}

#[test]
fn world_rotations_stay_orthonormal() {
    let mut f = Frame::identity();
    for i in 0..20_000 {
        let k = i as f64;
        f = f.rotated(TAU * (k * 0.013).fract(), TAU * (k * 0.029).fract());
    }
    assert_orthonormal(&f, 1e-6);
}

#[test]
fn local_and_world_coordinates_round_trip() {
    let f = Frame::identity().rotated(0.8, 1.9);
    let world = NVec3::new(3.0, -2.0, 5.0);
    let back = f.to_world(&f.to_local(&world));
    assert!((back - world).norm() < 1e-9);
}

// ==================================================================================
// Gravity tests
// ==================================================================================

fn test_gravity() -> SoftenedGravity {
    SoftenedGravity {
        g: 1.0,
        m_bh: 1.0,
        r_min: 0.1,
    }
}

#[test]
fn softening_floor_is_flat_below_r_min() {
    let gravity = test_gravity();
    let floor = gravity.inv_r3(gravity.r_min);

    for d in [1e-9, 1e-3, 0.1, 0.2, 0.3] {
        assert!(d * d < gravity.r_min);
        assert_eq!(gravity.inv_r3(d * d), floor);
    }

    // magnitude never exceeds its value at the floor radius
    let at_floor = gravity.magnitude_at(gravity.r_min.sqrt());
    for d in [1e-9, 1e-3, 0.1, 0.3] {
        let m = gravity.magnitude_at(d);
        assert!(m.is_finite() && m <= at_floor + 1e-12, "d = {d}: {m} > {at_floor}");
    }
}

#[test]
fn gravity_inverse_square_law() {
    let gravity = test_gravity();
    let ratio = gravity.magnitude_at(10.0) / gravity.magnitude_at(20.0);
    assert!((ratio - 4.0).abs() < 1e-9, "Expected 4x, got {ratio}");
}

#[test]
fn gravity_points_toward_source() {
    let gravity = test_gravity();
    let sources = [NVec3::new(5.0, 0.0, 0.0)];
    let a = gravity.accel_at(&NVec3::zeros(), &sources, None);
    assert!(a.x > 0.0 && a.y == 0.0 && a.z == 0.0, "{a:?}");
}

#[test]
fn bodies_pull_equal_and_opposite() {
    let store = bodies_at(&[NVec3::new(-1.0, 0.5, 0.0), NVec3::new(2.0, -0.5, 1.0)]);
    let forces = AccelSet::new().with(test_gravity());

    let mut acc = vec![NVec3::zeros(); 2];
    forces.accumulate_body_accels(&store, &mut acc);

    assert!((acc[0] + acc[1]).norm() < 1e-12, "Net acceleration not zero: {:?}", acc[0] + acc[1]);
}

#[test]
fn particles_do_not_attract() {
    let mut store = bodies_at(&[NVec3::zeros()]);
    store.push_particle(slot(NVec3::new(1.0, 0.0, 0.0), NVec3::zeros()), 0);
    let forces = AccelSet::new().with(test_gravity());

    let mut acc = vec![NVec3::zeros(); 1];
    forces.accumulate_body_accels(&store, &mut acc);
    assert_eq!(acc[0], NVec3::zeros());
}

#[test]
fn particles_without_bodies_feel_nothing() {
    let mut store = BodyStore::new();
    store.push_particle(slot(NVec3::new(1.0, 2.0, 3.0), NVec3::zeros()), 0);
    let forces = AccelSet::new().with(test_gravity());

    let mut acc = vec![NVec3::new(9.0, 9.0, 9.0); 1];
    forces.accumulate_particle_accels(&store, &mut acc);
    assert_eq!(acc[0], NVec3::zeros());
    assert_eq!(store.particle_host(0), None);
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn circular_orbit_keeps_its_radius() {
    let (g, m, r, dt) = (1.0, 1.0, 10.0, 0.01);
    let speed = circular_speed(g, m, r);

    let mut store = bodies_at(&[NVec3::zeros()]);
    store.push_particle(slot(NVec3::new(r, 0.0, 0.0), NVec3::new(0.0, speed, 0.0)), 0);
    let forces = AccelSet::new().with(SoftenedGravity { g, m_bh: m, r_min: 0.1 });
    let mut buf = StepBuffers::default();

    let period = TAU * r / speed;
    let steps = (period / dt).ceil() as usize;
    for _ in 0..steps {
        semi_implicit_euler(&mut store, &forces, dt, &mut buf);
        let radius = store.particle_positions()[0].norm();
        assert!((radius - r).abs() / r < 0.02, "radius drifted to {radius}");
    }

    // back near the start after one period
    let end = store.particle_positions()[0];
    assert!((end - NVec3::new(r, 0.0, 0.0)).norm() < 0.05 * r, "ended at {end:?}");
    // the lone body feels nothing
    assert_eq!(store.body_positions()[0], NVec3::zeros());
}

#[test]
fn particles_see_pre_step_body_positions() {
    // body moving at +1, particle at rest 10 units away
    let mut store = BodyStore::new();
    store.push_body(slot(NVec3::zeros(), NVec3::new(1.0, 0.0, 0.0)), Frame::identity());
    store.push_particle(slot(NVec3::new(10.0, 0.0, 0.0), NVec3::zeros()), 0);

    let gravity = test_gravity();
    let forces = AccelSet::new().with(gravity);
    let dt = 0.5;
    semi_implicit_euler(&mut store, &forces, dt, &mut StepBuffers::default());

    // kick computed at distance 10, not 9.5
    let expected_v = -gravity.magnitude_at(10.0) * dt;
    let v = store.particle_velocities()[0];
    assert!((v.x - expected_v).abs() < 1e-12, "{} vs {expected_v}", v.x);
    // drift uses the updated velocity
    assert!((store.particle_positions()[0].x - (10.0 + expected_v * dt)).abs() < 1e-12);
    assert!((store.body_positions()[0].x - 0.5).abs() < 1e-12);
}

#[test]
fn two_black_holes_one_step() {
    let parameters = Parameters {
        g: 6.67259e-11,
        m_bh: 1.0e14,
        r_min: 0.1,
        dt: 0.1,
        seed: 0,
    };
    let store = bodies_at(&[NVec3::new(-100.0, 0.0, 0.0), NVec3::new(100.0, 0.0, 0.0)]);
    let mut engine = engine_with(store, parameters.clone());

    assert_eq!(engine.step(), StepOutcome::Advanced);

    let expected = parameters.g * parameters.m_bh / (200.0 * 200.0) * parameters.dt;
    let v = engine.store().body_velocities();
    assert!(v[0].x > 0.0, "left body should move right");
    assert!(v[1].x < 0.0, "right body should move left");
    assert!((v[0].x - expected).abs() < 1e-9 * expected);
    assert!((v[1].x + expected).abs() < 1e-9 * expected);
    assert_eq!(v[0].y, 0.0);
    assert_eq!(v[0].z, 0.0);
    assert!((engine.time() - 0.1).abs() < 1e-12);
}

// ==================================================================================
// Galaxy initializer tests
// ==================================================================================

#[test]
fn initializer_counts_and_hosts() {
    let galaxy = GalaxyParams {
        bh_count: 3,
        particle_count: 100,
        ..GalaxyParams::default()
    };
    let mut store = BodyStore::new();
    init_galaxies(&mut store, &Parameters::default(), &galaxy, &mut StdRng::seed_from_u64(1));

    assert_eq!(store.bh_count(), 3);
    assert_eq!(store.particle_count(), 100);
    assert_eq!(store.len(), 103);
    for n in 0..100 {
        assert_eq!(store.particle_host(n), Some(n % 3));
    }
    let expected: Vec<u32> = (0..103).collect();
    assert_eq!(store.indices(), expected.as_slice());
}

#[test]
fn initializer_builds_tilted_disks() {
    let parameters = Parameters::default();
    let galaxy = GalaxyParams {
        bh_count: 4,
        particle_count: 2000,
        ..GalaxyParams::default()
    };
    let mut store = BodyStore::new();
    init_galaxies(&mut store, &parameters, &galaxy, &mut StdRng::seed_from_u64(9));

    let half_cube = galaxy.cosmo_size / 2.0;
    for (x, frame) in store.body_positions().iter().zip(store.orientations()) {
        assert!(x.iter().all(|c| c.abs() <= half_cube));
        assert_orthonormal(frame, 1e-9);
    }

    for n in 0..store.particle_count() {
        let host = n % galaxy.bh_count;
        let frame = store.orientations()[host];
        let offset = store.particle_positions()[n] - store.body_positions()[host];
        let local = frame.to_local(&offset);

        // disk square, thin disk away from the centre, bulge inside it
        let half = galaxy.galaxy_size / 2.0 + 1e-9;
        assert!(local.x.abs() <= half && local.y.abs() <= half, "{local:?}");
        let r_xy = (local.x * local.x + local.y * local.y).sqrt();
        let z_max = if r_xy > galaxy.galaxy_center_radius {
            0.0625 * galaxy.galaxy_size / 2.0
        } else {
            galaxy.galaxy_center_radius / 2.0
        };
        assert!(local.z.abs() <= z_max + 1e-9, "z = {} at r_xy = {r_xy}", local.z);

        // orbit in the disk plane, perpendicular to the radius
        let rel = store.particle_velocities()[n] - store.body_velocities()[host];
        let scale = rel.norm() * offset.norm() + 1e-12;
        assert!(rel.dot(&frame.z).abs() < 1e-9 * rel.norm().max(1.0));
        assert!(rel.dot(&offset).abs() < 1e-9 * scale + 1e-9);

        // unit-length color from the host
        let c = store.colors()[galaxy.bh_count + n];
        let norm = (c[0] * c[0] + c[1] * c[1] + c[2] * c[2]).sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert_eq!(c[3], 1.0);
    }
}

#[test]
fn same_seed_same_galaxies() {
    let a = small_engine(3, 300, 11);
    let b = small_engine(3, 300, 11);
    let c = small_engine(3, 300, 12);

    assert_eq!(a.store().positions(), b.store().positions());
    assert_eq!(a.store().velocities(), b.store().velocities());
    assert_ne!(a.store().positions(), c.store().positions());
}

#[test]
fn bodies_pushed_after_particles_stay_first() {
    let mut store = BodyStore::new();
    store.push_body(slot(NVec3::new(1.0, 0.0, 0.0), NVec3::zeros()), Frame::identity());
    store.push_particle(slot(NVec3::new(99.0, 0.0, 0.0), NVec3::zeros()), 0);
    store.push_body(slot(NVec3::new(2.0, 0.0, 0.0), NVec3::zeros()), Frame::identity());

    assert_eq!(store.bh_count(), 2);
    assert_eq!(store.particle_count(), 1);
    assert_eq!(store.body_positions(), [NVec3::new(1.0, 0.0, 0.0), NVec3::new(2.0, 0.0, 0.0)]);
    assert_eq!(store.particle_positions(), [NVec3::new(99.0, 0.0, 0.0)]);
    assert_eq!(store.indices(), [0, 1, 2]);
    assert_eq!(store.orientations().len(), 2);
    assert_eq!(store.particle_host(0), Some(0));
}

#[test]
fn body_color_is_none_past_the_massive_set() {
    let mut store = bodies_at(&[NVec3::zeros()]);
    store.push_particle(slot(NVec3::new(1.0, 0.0, 0.0), NVec3::zeros()), 0);

    assert_eq!(store.body_color(0), Some([1.0, 1.0, 1.0, 1.0]));
    assert_eq!(store.body_color(1), None);
    assert_eq!(store.body_color(50), None);
}

#[test]
fn render_buffers_put_massive_bodies_first() {
    let engine = small_engine(2, 10, 3);
    let galaxy = engine.galaxy_params();
    let buffers = engine.store().render_buffers();

    assert_eq!(buffers.positions.len(), 12);
    assert_eq!(buffers.colors.len(), 12);
    assert_eq!(buffers.point_sizes[..2], [galaxy.bh_point_size; 2]);
    assert!(buffers.point_sizes[2..].iter().all(|&s| s == galaxy.particle_point_size));
    assert_eq!(buffers.indices, (0..12).collect::<Vec<u32>>());
}

// ==================================================================================
// Camera tests
// ==================================================================================

#[test]
fn select_toggles_pursuit() {
    let mut camera = Camera::default();
    camera.select(2);
    assert_eq!(camera.pursuit(), Pursuit::Pursuing { target: 2, distance: 600.0 });

    camera.select(2);
    assert_eq!(camera.pursuit(), Pursuit::Idle);

    camera.select(1);
    camera.select(3);
    assert_eq!(camera.target(), Some(3));

    camera.deselect();
    assert_eq!(camera.target(), None);
}

#[test]
fn dolly_never_crosses_the_focal_floor() {
    let mut camera = Camera::default();
    camera.select(0);
    for _ in 0..100 {
        camera.dolly(37.0);
        let Pursuit::Pursuing { distance, .. } = camera.pursuit() else {
            panic!("pursuit lost");
        };
        assert!(
            distance >= camera.focal_length() + 1.0,
            "distance {distance} fell below F + 1; the floor itself is reachable, as it is when the chase resets"
        );
        assert!(distance > camera.focal_length());
    }

    // dolly out lengthens it again
    camera.dolly(-50.0);
    let Pursuit::Pursuing { distance, .. } = camera.pursuit() else {
        panic!("pursuit lost");
    };
    assert!((distance - (camera.focal_length() + 51.0)).abs() < 1e-9);
}

#[test]
fn pan_moves_in_camera_axes() {
    let mut camera = Camera::new(&CameraParams {
        position: NVec3::zeros(),
        ..CameraParams::default()
    });
    camera.pan(1.0, 2.0, 3.0);
    // screen-down is +dy, so Y is inverted
    assert!((camera.position - NVec3::new(1.0, -2.0, 3.0)).norm() < 1e-12);
}

#[test]
fn pursuit_steps_by_square_root_of_error() {
    let mut camera = Camera::new(&CameraParams {
        position: NVec3::zeros(),
        ..CameraParams::default()
    });
    let bodies = [NVec3::new(0.0, 0.0, 1000.0)];
    camera.select(0);

    // goal is 600 behind the body on +Z: (0, 0, 400)
    camera.pursue(&bodies);
    assert!((camera.position - NVec3::new(0.0, 0.0, 20.0)).norm() < 1e-12);

    for _ in 0..200 {
        camera.pursue(&bodies);
    }
    let err = NVec3::new(0.0, 0.0, 400.0) - camera.position;
    assert!(err.iter().all(|e| e.abs() <= 1.0), "still {err:?} away");
}

#[test]
fn pursuit_of_missing_body_goes_idle() {
    let mut camera = Camera::default();
    camera.select(5);
    camera.pursue(&[NVec3::zeros()]);
    assert_eq!(camera.pursuit(), Pursuit::Idle);
}

// ==================================================================================
// Projection tests
// ==================================================================================

fn turned_camera() -> Camera {
    let mut camera = Camera::default();
    camera.rotate(0.7, -0.4);
    camera.pan(12.0, -5.0, 30.0);
    camera
}

#[test]
fn focal_point_projects_to_centre() {
    let camera = turned_camera();
    let point = camera.position + camera.view.z * camera.focal_length();
    let s = world_to_screen(&point, &camera, 0.05);
    assert!(s.norm() < 1e-9, "{s:?}");
}

#[test]
fn projection_scales_by_depth() {
    let camera = turned_camera();
    let point = camera.position + camera.view.z * 100.0 + camera.view.x * 10.0;
    let s = world_to_screen(&point, &camera, 0.05);
    // w = 0.05 * 100 / 30
    assert!((s.x - 60.0).abs() < 1e-9, "{s:?}");
    assert!(s.y.abs() < 1e-9);
}

#[test]
fn points_behind_camera_stay_finite() {
    let camera = turned_camera();
    let behind = camera.position - camera.view.z * 10.0 + camera.view.x;
    let s = world_to_screen(&behind, &camera, 0.05);
    assert!(s.x.is_finite() && s.y.is_finite());

    let on_camera = world_to_screen(&camera.position, &camera, 0.05);
    assert_eq!(on_camera.x, 0.0);
}

#[test]
fn pick_nearest_uses_screen_distance() {
    let camera = Camera::default();
    let points = [
        NVec3::new(-300.0, 0.0, 0.0),
        NVec3::new(0.0, 0.0, 0.0),
        NVec3::new(300.0, 0.0, 0.0),
    ];
    // depth 1600 -> w = 0.05 * 1600 / 30, so +-300 lands at +-112.5
    let hit = pick_nearest(&points, &camera, 0.05, &nalgebra::Vector2::new(100.0, 5.0));
    assert_eq!(hit, Some(2));
    assert_eq!(pick_nearest(&[], &camera, 0.05, &nalgebra::Vector2::zeros()), None);
}

#[test]
fn view_matrix_looks_down_negative_z() {
    let camera = turned_camera();
    let m = view_matrix(&camera);

    let f = camera.focal_length();
    let p = camera.position + camera.view.z * f;
    let h = m * nalgebra::Vector4::new(p.x, p.y, p.z, 1.0);
    assert!((h - nalgebra::Vector4::new(0.0, 0.0, -f, 1.0)).norm() < 1e-9, "{h:?}");

    // camera-space x matches the view matrix, y is flipped to point up
    let q = NVec3::new(40.0, -70.0, 900.0);
    let c = to_camera_space(&q, &camera);
    let h = m * nalgebra::Vector4::new(q.x, q.y, q.z, 1.0);
    assert!((h.x - c.x).abs() < 1e-9 && (h.y + c.y).abs() < 1e-9 && (h.z + c.z).abs() < 1e-9);
}

#[test]
fn projection_matrix_is_perspective() {
    let m = projection_matrix(&ProjectionParams::default(), 16.0 / 9.0);
    assert_eq!(m[(3, 2)], -1.0);
    assert_eq!(m[(3, 3)], 0.0);
}

// ==================================================================================
// Engine and intent tests
// ==================================================================================

#[test]
fn intents_wait_for_the_next_step() {
    let mut engine = small_engine(2, 50, 5);
    engine.submit(Intent::SetParticleCount(-5));
    engine.submit(Intent::SetBodyCount(0));

    assert_eq!(engine.pending_intents(), 2);
    assert_eq!(engine.store().particle_count(), 50);

    engine.step();
    assert_eq!(engine.pending_intents(), 0);
    assert_eq!(engine.store().particle_count(), 0);
    assert_eq!(engine.store().bh_count(), 1);
}

#[test]
fn engine_raises_zero_black_holes_to_one() {
    let mut engine = small_engine(0, 100, 3);
    assert_eq!(engine.store().bh_count(), 1);
    assert_eq!(engine.store().particle_count(), 100);
    assert_eq!(engine.galaxy_params().bh_count, 1);

    engine.submit(Intent::SetParticleCount(50));
    engine.step();
    assert_eq!(engine.store().particle_count(), 50);
    assert_eq!(engine.galaxy_params().particle_count, 50);
}

#[test]
fn particle_count_follows_the_store_when_nothing_can_host() {
    let mut engine = engine_with(BodyStore::new(), Parameters::default());
    engine.submit(Intent::SetParticleCount(40));
    engine.step();

    assert_eq!(engine.store().particle_count(), 0);
    assert_eq!(engine.galaxy_params().particle_count, 0);
}

#[test]
fn last_staged_count_wins() {
    let mut engine = small_engine(2, 50, 5);
    engine.submit(Intent::SetParticleCount(10));
    engine.submit(Intent::SetParticleCount(20));
    engine.step();
    assert_eq!(engine.store().particle_count(), 20);
}

#[test]
fn growing_particles_keeps_existing_state() {
    let mut engine = small_engine(2, 50, 5);
    let before: Vec<NVec3> = engine.store().particle_positions().to_vec();

    engine.submit(Intent::SetRunning(false));
    engine.submit(Intent::SetParticleCount(80));
    assert_eq!(engine.step(), StepOutcome::Paused);

    let store = engine.store();
    assert_eq!(store.particle_count(), 80);
    assert_eq!(&store.particle_positions()[..50], before.as_slice());
    for n in 0..80 {
        assert_eq!(store.particle_host(n), Some(n % 2));
    }
}

#[test]
fn growing_black_holes_regenerates_everything() {
    let mut engine = small_engine(2, 60, 5);
    engine.submit(Intent::SetRunning(false));
    engine.submit(Intent::SetBodyCount(3));
    engine.step();

    let store = engine.store();
    assert_eq!(store.bh_count(), 3);
    assert_eq!(store.particle_count(), 60);
    for n in 0..60 {
        assert_eq!(store.particle_host(n), Some(n % 3));
    }
}

#[test]
fn shrinking_truncates_and_releases_pursuit() {
    let mut engine = small_engine(3, 30, 5);
    engine.submit(Intent::Select(2));
    engine.step();
    assert_eq!(engine.camera().target(), Some(2));

    engine.submit(Intent::SetBodyCount(1));
    engine.submit(Intent::SetParticleCount(10));
    engine.step();

    let store = engine.store();
    assert_eq!(store.bh_count(), 1);
    assert_eq!(store.particle_count(), 10);
    assert_eq!(store.len(), 11);
    assert_eq!(store.indices(), (0..11).collect::<Vec<u32>>().as_slice());
    for n in 0..10 {
        let expected = if n % 3 == 0 { Some(0) } else { None };
        assert_eq!(store.particle_host(n), expected);
    }
    assert_eq!(engine.camera().target(), None);
}

#[test]
fn stopped_engine_still_moves_the_camera() {
    let mut engine = small_engine(2, 20, 5);
    let positions: Vec<NVec3> = engine.store().positions().to_vec();
    let start = engine.camera().position;

    engine.submit(Intent::ToggleRunning);
    engine.submit(Intent::Pan { dx: 10.0, dy: 0.0 });
    assert_eq!(engine.step(), StepOutcome::Paused);

    assert!(!engine.is_running());
    assert_eq!(engine.tick(), 0);
    assert_eq!(engine.store().positions(), positions.as_slice());
    assert!((engine.camera().position - start - NVec3::new(10.0, 0.0, 0.0)).norm() < 1e-12);

    engine.submit(Intent::ToggleRunning);
    assert_eq!(engine.step(), StepOutcome::Advanced);
    assert_eq!(engine.tick(), 1);
}

#[test]
fn select_at_picks_the_nearest_black_hole() {
    let store = bodies_at(&[
        NVec3::new(-300.0, 0.0, 0.0),
        NVec3::new(0.0, 0.0, 0.0),
        NVec3::new(300.0, 0.0, 0.0),
    ]);
    let mut engine = engine_with(store, Parameters::default());
    engine.submit(Intent::SetRunning(false));
    engine.submit(Intent::SelectAt { x: 100.0, y: 5.0 });
    engine.step();
    assert_eq!(engine.camera().target(), Some(2));

    engine.submit(Intent::Select(7));
    engine.step();
    assert_eq!(engine.camera().target(), Some(2), "missing body must be ignored");
}

#[test]
fn view_mode_cycles_through_three_states() {
    let mut engine = small_engine(1, 0, 0);
    let mut seen = Vec::new();
    for _ in 0..3 {
        engine.submit(Intent::CycleViewMode);
        engine.step();
        seen.push(engine.view_mode());
    }
    assert_eq!(seen, [ViewMode::Cross, ViewMode::Parallel, ViewMode::Normal]);
}

#[test]
fn render_frame_bundles_matrices() {
    let engine = small_engine(2, 5, 0);
    let frame = engine.render_frame(1.5);
    assert_eq!(frame.buffers.positions.len(), 7);
    assert_eq!(frame.view, view_matrix(engine.camera()).cast::<f32>());
    assert_eq!(frame.view_mode, ViewMode::Normal);
}

// ==================================================================================
// Scheduler tests
// ==================================================================================

#[test]
fn manual_scheduler_runs_exact_steps() {
    let mut engine = small_engine(2, 20, 1);
    let ran = ManualScheduler::new(7).run(&mut engine);
    assert_eq!(ran, 7);
    assert_eq!(engine.tick(), 7);
}

#[test]
fn tick_gate_drops_missed_ticks() {
    let mut gate = TickGate::new(Duration::from_millis(50));
    let t0 = Instant::now();

    assert_eq!(gate.poll(t0), Some(0));
    assert_eq!(gate.poll(t0 + Duration::from_millis(10)), None);
    assert_eq!(gate.poll(t0 + Duration::from_millis(50)), Some(0));

    // 160 ms late: three cadence points missed, one tick fired
    assert_eq!(gate.poll(t0 + Duration::from_millis(260)), Some(3));
    assert_eq!(gate.poll(t0 + Duration::from_millis(300)), None);
    assert_eq!(gate.wait_time(t0 + Duration::from_millis(300)), Duration::from_millis(10));
}

// ==================================================================================
// Configuration tests
// ==================================================================================

#[test]
fn yaml_fills_missing_fields_with_defaults() {
    let cfg = ScenarioConfig::from_yaml_str(
        "parameters:\n  G: 2.0\n  seed: 9\ngalaxy:\n  bh_count: 4\n",
    )
    .expect("valid yaml");

    assert_eq!(cfg.parameters.g, 2.0);
    assert_eq!(cfg.parameters.seed, 9);
    assert_eq!(cfg.parameters.dt, 0.1);
    assert_eq!(cfg.galaxy.bh_count, 4);
    assert_eq!(cfg.galaxy.particle_count, 40_000);
    assert_eq!(cfg.camera.position, [0.0, 0.0, -1600.0]);
    assert_eq!(cfg.engine.tick_ms, 50);
}

#[test]
fn bad_yaml_is_an_error() {
    assert!(ScenarioConfig::from_yaml_str("galaxy: [1, 2").is_err());
}

#[test]
fn scenario_clamps_configured_counts() {
    let cfg = ScenarioConfig::from_yaml_str("galaxy:\n  bh_count: 0\n  particle_count: -3\n").expect("valid yaml");
    let scenario = Scenario::build_scenario(cfg);

    assert_eq!(scenario.engine.store().bh_count(), 1);
    assert_eq!(scenario.engine.store().particle_count(), 0);
    assert_eq!(scenario.tick_interval, Duration::from_millis(50));
}
