//! Interactive skinned-character locomotion demo.
//!
//! A keyboard-driven character walks, runs and falls through a static
//! environment mesh.  Each frame the movement core turns held keys plus the
//! orbit camera's heading into a capsule translation, resolves penetration
//! against an octree of the environment triangles, and mirrors the corrected
//! pose onto the visual model and the camera.
//!
//! ```bash
//! cargo run --bin gen_pack            # write demo assets into ./assets
//! cargo run --release                 # walk_demo
//! ```

pub mod asset;
pub mod sim;
pub mod world;
