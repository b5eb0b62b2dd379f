//! Interactive walk demo with a top-down debug view.
//!
//! ```bash
//! cargo run --bin gen_pack        # once, writes ./assets
//! cargo run --release
//! ```
//!
//! w/a/s/d move relative to the camera, shift runs, escape quits.

use clap::Parser;
use glam::Vec3;
use minifb::{Key, Window, WindowOptions};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use stride_rs::asset::{AssetLoader, LoadKind, LoadedAsset};
use stride_rs::sim::{InputState, MovementController};
use stride_rs::world::{Octree, OrbitCamera, Triangle};

const W: usize = 1024;
const H: usize = 768;

/// Pixels per world unit in the debug view.
const VIEW_SCALE: f32 = 0.25;

const COLOUR_WORLD: u32 = 0x00_3a3a3a;
const COLOUR_CAMERA: u32 = 0x00_5577ff;
const COLOUR_GROUNDED: u32 = 0x00_44cc44;
const COLOUR_AIRBORNE: u32 = 0x00_ffaa22;

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Opts {
    /// Character pack (mesh + animation clips)
    #[arg(long, value_name = "FILE", default_value = "./assets/character.pak")]
    character: PathBuf,

    /// Environment pack (static collision mesh)
    #[arg(long, value_name = "FILE", default_value = "./assets/space.pak")]
    environment: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let mut loader = AssetLoader::new();
    loader.request(&opts.character, LoadKind::Character);
    loader.request(&opts.environment, LoadKind::Environment);

    let mut controller = MovementController::new();
    let mut camera = OrbitCamera::new(Vec3::new(0.0, 100.0, 500.0), Vec3::new(0.0, 100.0, 0.0));
    let mut input = InputState::new();

    // environment triangles kept around for the wireframe view
    let mut scenery: Vec<Triangle> = Vec::new();

    let mut window = Window::new("stride-rs walk demo", W, H, WindowOptions::default())?;
    window.set_target_fps(60);

    let started = Instant::now();
    let mut buffer = vec![0u32; W * H];

    // ────────────────── frame statistics ────────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        /* ---------- install finished loads ----------------------------- */
        while let Some(outcome) = loader.poll() {
            match outcome.result {
                Ok(LoadedAsset::Character(character)) => {
                    // a bad clip map is an asset/logic mismatch, abort
                    controller.install_character(character.model.bounds, &character.clips)?;
                }
                Ok(LoadedAsset::Environment(model)) => {
                    scenery = model.triangles.clone();
                    controller.install_environment(Octree::from_triangles(model.triangles));
                    log::info!("environment installed: {} triangles", scenery.len());
                }
                Err(e) => {
                    // movement stays disabled for whatever failed to load
                    log::error!("asset {} failed: {e}", outcome.path.display());
                }
            }
        }

        /* ---------- mirror held keys into the input state -------------- */
        input.set("w", window.is_key_down(Key::W));
        input.set("a", window.is_key_down(Key::A));
        input.set("s", window.is_key_down(Key::S));
        input.set("d", window.is_key_down(Key::D));
        input.set(
            "shift",
            window.is_key_down(Key::LeftShift) || window.is_key_down(Key::RightShift),
        );

        controller.update(started.elapsed().as_secs_f32(), &input, &mut camera);

        /* ---------- draw ------------------------------------------------ */
        draw_scene(&mut buffer, &scenery, &controller, &camera);

        acc_time += t0.elapsed();
        acc_frames += 1;
        window.update_with_buffer(&buffer, W, H)?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            log::info!("avg frame: {:.2} ms  ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}

/*──────────────────────── top-down debug view ───────────────────────────*/

fn draw_scene(
    buffer: &mut [u32],
    scenery: &[Triangle],
    controller: &MovementController,
    camera: &OrbitCamera,
) {
    buffer.fill(0);

    let pose = controller.pose();
    let center = pose.map(|p| p.position).unwrap_or(Vec3::ZERO);

    // world x/z → screen, view centred on the character
    let to_screen = |p: Vec3| -> (i32, i32) {
        let sx = ((p.x - center.x) * VIEW_SCALE) as i32 + W as i32 / 2;
        let sy = ((p.z - center.z) * VIEW_SCALE) as i32 + H as i32 / 2;
        (sx, sy)
    };

    for tri in scenery {
        let a = to_screen(tri.a);
        let b = to_screen(tri.b);
        let c = to_screen(tri.c);
        draw_line(buffer, a, b, COLOUR_WORLD);
        draw_line(buffer, b, c, COLOUR_WORLD);
        draw_line(buffer, c, a, COLOUR_WORLD);
    }

    // camera eye marker
    let (cx, cy) = to_screen(camera.pos);
    draw_line(buffer, (cx - 4, cy), (cx + 4, cy), COLOUR_CAMERA);
    draw_line(buffer, (cx, cy - 4), (cx, cy + 4), COLOUR_CAMERA);

    let Some(pose) = pose else {
        return; // still loading
    };
    let colour = if pose.on_ground {
        COLOUR_GROUNDED
    } else {
        COLOUR_AIRBORNE
    };

    // capsule footprint ring
    const SEGMENTS: usize = 24;
    let ring_point = |i: usize| -> (i32, i32) {
        let angle = i as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
        to_screen(pose.position + Vec3::new(angle.cos(), 0.0, angle.sin()) * pose.radius)
    };
    for i in 0..SEGMENTS {
        draw_line(buffer, ring_point(i), ring_point(i + 1), colour);
    }

    // heading tick, yaw 0 pointing +z
    let dir = Vec3::new(pose.heading.sin(), 0.0, pose.heading.cos());
    draw_line(
        buffer,
        to_screen(pose.position),
        to_screen(pose.position + dir * pose.radius * 2.0),
        colour,
    );
}

/// Integer Bresenham line-drawing algorithm.
fn draw_line(buf: &mut [u32], (mut x0, mut y0): (i32, i32), (x1, y1): (i32, i32), colour: u32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if (0..W as i32).contains(&x0) && (0..H as i32).contains(&y0) {
            buf[y0 as usize * W + x0 as usize] = colour;
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            if x0 == x1 {
                break;
            }
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            if y0 == y1 {
                break;
            }
            err += dx;
            y0 += sy;
        }
    }
}
