use std::collections::HashMap;
use std::f64::consts::TAU;
use std::time::Instant;

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::simulation::command::Intent;
use crate::simulation::engine::Engine;
use crate::simulation::scenario::Scenario;
use crate::simulation::scheduler::TickGate;

/// Component tagging each sphere with its slot in the body store
#[derive(Component)]
struct SlotIndex(pub usize);

/// Marker for the camera driven by the engine's camera frame
#[derive(Component)]
struct ViewCamera;

/// Engine plus the viewer-side tick gate and input sensitivity
#[derive(Resource)]
struct GalaxySim {
    engine: Engine,
    gate: TickGate,
    rot_degree: f64,
}

/// Point size -> sphere radius in world units
const SIZE_SCALE: f32 = 1.0 / 1000.0;

/// Wheel lines -> dolly distance
const WHEEL_LINE: f64 = 100.0;

/// Seconds between clicks that count as a double click
const DOUBLE_CLICK: f32 = 0.3;

/// Open a window and run the engine on its fixed tick cadence
pub fn run_3d(scenario: Scenario) {
    log::info!(
        "run_3d: starting viewer with {} black holes and {} particles",
        scenario.engine.store().bh_count(),
        scenario.engine.store().particle_count()
    );

    App::new()
        .insert_resource(GalaxySim {
            engine: scenario.engine,
            gate: TickGate::new(scenario.tick_interval),
            rot_degree: scenario.rot_degree,
        })
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup_3d)
        .add_systems(Update, (read_input, physics_step, sync_slots, sync_camera).chain())
        .run();
}

/// Startup system: spawn the camera
fn setup_3d(mut commands: Commands, sim: Res<GalaxySim>) {
    let p = sim.engine.projection_params();
    commands.spawn((
        Camera3dBundle {
            camera: Camera {
                clear_color: ClearColorConfig::Custom(Color::srgb(0.0, 0.0, 0.0)), // pure black
                ..Default::default()
            },
            projection: Projection::Perspective(PerspectiveProjection {
                fov: (p.fov_degrees as f32).to_radians(),
                near: p.z_near as f32,
                far: p.z_far as f32,
                ..Default::default()
            }),
            ..Default::default()
        },
        ViewCamera,
    ));
}

/// Decode pointer and keyboard state into engine intents
fn read_input(
    mut sim: ResMut<GalaxySim>,
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut motion: EventReader<MouseMotion>,
    mut wheel: EventReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut last_click: Local<Option<f32>>,
) {
    let rot_degree = sim.rot_degree;
    let engine = &mut sim.engine;

    for ev in motion.read() {
        let (dx, dy) = (f64::from(ev.delta.x), f64::from(ev.delta.y));
        if buttons.pressed(MouseButton::Left) {
            engine.submit(Intent::Rotate {
                yaw: -TAU * dx / rot_degree,
                pitch: TAU * dy / rot_degree,
            });
        } else if buttons.pressed(MouseButton::Middle) {
            engine.submit(Intent::Pan { dx, dy });
        }
    }

    for ev in wheel.read() {
        let scale = match ev.unit {
            MouseScrollUnit::Line => WHEEL_LINE,
            MouseScrollUnit::Pixel => 1.0,
        };
        // wheel up moves forward
        engine.submit(Intent::Dolly { dz: f64::from(ev.y) * scale });
    }

    if buttons.just_pressed(MouseButton::Left) {
        let now = time.elapsed_seconds();
        let double = last_click.is_some_and(|t| now - t < DOUBLE_CLICK);
        *last_click = if double { None } else { Some(now) };

        if double {
            if let Ok(window) = windows.get_single() {
                if let Some(cursor) = window.cursor_position() {
                    engine.submit(Intent::SelectAt {
                        x: f64::from(cursor.x - window.width() / 2.0),
                        y: f64::from(cursor.y - window.height() / 2.0),
                    });
                }
            }
        }
    }

    let bh = engine.store().bh_count() as i64;
    let particles = engine.store().particle_count() as i64;
    if keys.just_pressed(KeyCode::Space) {
        engine.submit(Intent::ToggleRunning);
    }
    if keys.just_pressed(KeyCode::KeyV) {
        engine.submit(Intent::CycleViewMode);
    }
    if keys.just_pressed(KeyCode::ArrowUp) {
        engine.submit(Intent::SetParticleCount(particles + 1000));
    }
    if keys.just_pressed(KeyCode::ArrowDown) {
        engine.submit(Intent::SetParticleCount(particles - 1000));
    }
    if keys.just_pressed(KeyCode::PageUp) {
        engine.submit(Intent::SetBodyCount(bh + 1));
    }
    if keys.just_pressed(KeyCode::PageDown) {
        engine.submit(Intent::SetBodyCount(bh - 1));
    }
}

/// Step the engine when the gate says a tick is due; late ticks are dropped
fn physics_step(mut sim: ResMut<GalaxySim>) {
    let GalaxySim { engine, gate, .. } = &mut *sim;

    if let Some(dropped) = gate.poll(Instant::now()) {
        if dropped > 0 {
            log::debug!("viewer dropped {dropped} ticks");
        }
        engine.step();
    }
}

/// Respawn spheres when the slot count changes, then move them
fn sync_slots(
    mut commands: Commands,
    sim: Res<GalaxySim>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(Entity, &SlotIndex, &mut Transform)>,
) {
    let store = sim.engine.store();
    let positions = store.positions();

    if query.iter().count() != store.len() {
        for (entity, _, _) in &query {
            commands.entity(entity).despawn();
        }

        // one mesh per point size, one material per color
        let mut mesh_cache: HashMap<u32, Handle<Mesh>> = HashMap::new();
        let mut material_cache: HashMap<[u32; 4], Handle<StandardMaterial>> = HashMap::new();

        for i in 0..store.len() {
            let size = store.point_sizes()[i];
            let mesh = mesh_cache
                .entry(size.to_bits())
                .or_insert_with(|| meshes.add(Sphere::new(size * SIZE_SCALE).mesh()))
                .clone();

            let [r, g, b, a] = store.colors()[i];
            let material = material_cache
                .entry([r.to_bits(), g.to_bits(), b.to_bits(), a.to_bits()])
                .or_insert_with(|| {
                    materials.add(StandardMaterial {
                        base_color: Color::srgba(r, g, b, a),
                        unlit: true,
                        ..Default::default()
                    })
                })
                .clone();

            let p = positions[i];
            commands.spawn((
                PbrBundle {
                    mesh,
                    material,
                    transform: Transform::from_xyz(p.x as f32, p.y as f32, p.z as f32),
                    ..Default::default()
                },
                SlotIndex(i),
            ));
        }
        log::debug!("respawned {} slots", store.len());
        return;
    }

    for (_, SlotIndex(i), mut transform) in &mut query {
        if let Some(p) = positions.get(*i) {
            transform.translation = Vec3::new(p.x as f32, p.y as f32, p.z as f32);
        }
    }
}

/// Copy the engine camera into the bevy camera
///
/// The engine looks along +Z with +Y down the screen; bevy looks along -Z
/// with +Y up, so the rotation columns are (X, -Y, -Z).
fn sync_camera(sim: Res<GalaxySim>, mut query: Query<&mut Transform, With<ViewCamera>>) {
    let cam = sim.engine.camera();
    let to_vec3 = |v: &crate::simulation::vecmath::NVec3| Vec3::new(v.x as f32, v.y as f32, v.z as f32);

    let rotation = Mat3::from_cols(to_vec3(&cam.view.x), -to_vec3(&cam.view.y), -to_vec3(&cam.view.z));
    for mut transform in &mut query {
        transform.translation = to_vec3(&cam.position);
        transform.rotation = Quat::from_mat3(&rotation);
    }
}
