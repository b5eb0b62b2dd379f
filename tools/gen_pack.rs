//! gen_pack.rs - one-shot CLI that writes the demo's asset packs.
//!
//! USAGE:
//! ```bash
//! cargo run --bin gen_pack -- --out-dir ./assets
//! ```
//!
//! `character.pak` carries a box silhouette (only its bounds matter, they
//! size the collision capsule) plus the three gait clips; `space.pak` is a
//! walled arena with a few platforms to climb and fall off.

use clap::Parser;
use glam::Vec3;
use std::{fs, path::PathBuf};

use stride_rs::asset::{encode_clips, encode_triangles, encode_vertices, write_pack};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Opts {
    /// Directory receiving `character.pak` and `space.pak`
    #[arg(long, value_name = "DIR", default_value = "./assets")]
    out_dir: PathBuf,
}

#[derive(Default)]
struct MeshBuilder {
    vertices: Vec<Vec3>,
    indices: Vec<[u32; 3]>,
}

impl MeshBuilder {
    /// Axis-aligned box with outward-facing winding.
    fn push_box(&mut self, min: Vec3, max: Vec3) {
        let base = self.vertices.len() as u32;
        let corners = [
            Vec3::new(min.x, min.y, min.z), // 0
            Vec3::new(max.x, min.y, min.z), // 1
            Vec3::new(max.x, max.y, min.z), // 2
            Vec3::new(min.x, max.y, min.z), // 3
            Vec3::new(min.x, min.y, max.z), // 4
            Vec3::new(max.x, min.y, max.z), // 5
            Vec3::new(max.x, max.y, max.z), // 6
            Vec3::new(min.x, max.y, max.z), // 7
        ];
        self.vertices.extend_from_slice(&corners);

        // quads in counter-clockwise order seen from outside
        const QUADS: [[u32; 4]; 6] = [
            [0, 3, 2, 1], // -z
            [4, 5, 6, 7], // +z
            [0, 4, 7, 3], // -x
            [1, 2, 6, 5], // +x
            [0, 1, 5, 4], // -y
            [3, 7, 6, 2], // +y
        ];
        for q in QUADS {
            self.indices
                .push([base + q[0], base + q[1], base + q[2]]);
            self.indices
                .push([base + q[0], base + q[2], base + q[3]]);
        }
    }

    fn chunks(&self) -> [(&'static str, Vec<u8>); 2] {
        [
            ("MESH", encode_vertices(&self.vertices)),
            ("TRIS", encode_triangles(&self.indices)),
        ]
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts = Opts::parse();
    fs::create_dir_all(&opts.out_dir)?;

    /* ---------------- character ---------------------------------------- */
    // 180 tall, 60 deep: capsule radius 30, sphere centres at y 30 / 150
    let mut character = MeshBuilder::default();
    character.push_box(Vec3::new(-20.0, 0.0, -30.0), Vec3::new(20.0, 180.0, 30.0));

    let [mesh, tris] = character.chunks();
    let clips = ("CLIP", encode_clips(&[("Idle", 2.5), ("Walk", 1.0), ("Run", 0.6)]));
    let character_path = opts.out_dir.join("character.pak");
    write_pack(&character_path, &[mesh, tris, clips])?;
    println!("wrote {}", character_path.display());

    /* ---------------- environment -------------------------------------- */
    let mut space = MeshBuilder::default();
    // main floor slab
    space.push_box(
        Vec3::new(-1200.0, -20.0, -1200.0),
        Vec3::new(1200.0, 0.0, 1200.0),
    );
    // things to step and fall off
    space.push_box(Vec3::new(250.0, 0.0, -150.0), Vec3::new(450.0, 25.0, 50.0));
    space.push_box(Vec3::new(-600.0, 0.0, 300.0), Vec3::new(-350.0, 60.0, 550.0));
    space.push_box(Vec3::new(-50.0, 0.0, -700.0), Vec3::new(150.0, 120.0, -500.0));
    // perimeter walls
    space.push_box(
        Vec3::new(-1220.0, 0.0, -1220.0),
        Vec3::new(1220.0, 200.0, -1200.0),
    );
    space.push_box(
        Vec3::new(-1220.0, 0.0, 1200.0),
        Vec3::new(1220.0, 200.0, 1220.0),
    );
    space.push_box(
        Vec3::new(-1220.0, 0.0, -1200.0),
        Vec3::new(-1200.0, 200.0, 1200.0),
    );
    space.push_box(
        Vec3::new(1200.0, 0.0, -1200.0),
        Vec3::new(1220.0, 200.0, 1200.0),
    );

    let [mesh, tris] = space.chunks();
    let space_path = opts.out_dir.join("space.pak");
    write_pack(&space_path, &[mesh, tris])?;
    println!("wrote {}", space_path.display());

    Ok(())
}
