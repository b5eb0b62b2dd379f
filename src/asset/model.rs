//! Typed views over a pack's chunks: triangle meshes and animation clips.
//!
//! A model pack carries `MESH` (vertex positions) and `TRIS` (index
//! triples); a character pack additionally carries `CLIP` records naming
//! its animation clips.

use byteorder::{LittleEndian as LE, WriteBytesExt};
use glam::Vec3;

use super::pack::{Pack, PackError};
use crate::sim::Clip;
use crate::world::{Aabb, Triangle};

/*=======================================================================*/
/*                         Raw binary structs                            */
/*=======================================================================*/

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bincode::Decode)]
pub struct RawVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bincode::Decode)]
pub struct RawTriangle {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bincode::Decode)]
pub struct RawClip {
    /// Eight-byte ASCII name, padded with NULs.
    pub name: [u8; 8],
    /// Clip length in seconds.
    pub duration: f32,
}

/*=======================================================================*/
/*                                Errors                                 */
/*=======================================================================*/

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("expected chunk `{0}` not found in pack")]
    Missing(&'static str),

    #[error("triangle {tri} references vertex {index} of {count}")]
    IndexOutOfBounds { tri: usize, index: u32, count: usize },

    #[error(transparent)]
    Pack(#[from] PackError),
}

/*=======================================================================*/
/*                            Decoded views                              */
/*=======================================================================*/

/// A triangle-soup mesh plus its bounding box.
#[derive(Debug)]
pub struct Model {
    pub triangles: Vec<Triangle>,
    pub bounds: Aabb,
}

/// Character payload: mesh for capsule sizing plus the clip list.
#[derive(Debug)]
pub struct CharacterAsset {
    pub model: Model,
    pub clips: Vec<Clip>,
}

fn required_chunk(pack: &Pack, name: &'static str) -> Result<usize, ModelError> {
    pack.find_chunk(name).ok_or(ModelError::Missing(name))
}

/// Decode `MESH` + `TRIS` into world-space triangles.
pub fn decode_model(pack: &Pack) -> Result<Model, ModelError> {
    let vertices: Vec<RawVertex> = pack.chunk_to_vec(required_chunk(pack, "MESH")?)?;
    let raw_tris: Vec<RawTriangle> = pack.chunk_to_vec(required_chunk(pack, "TRIS")?)?;

    let points: Vec<Vec3> = vertices
        .iter()
        .map(|v| Vec3::new(v.x, v.y, v.z))
        .collect();
    let bounds = Aabb::from_points(points.iter().copied());

    let mut triangles = Vec::with_capacity(raw_tris.len());
    for (i, t) in raw_tris.iter().enumerate() {
        let fetch = |index: u32| -> Result<Vec3, ModelError> {
            points
                .get(index as usize)
                .copied()
                .ok_or(ModelError::IndexOutOfBounds {
                    tri: i,
                    index,
                    count: points.len(),
                })
        };
        triangles.push(Triangle::new(fetch(t.a)?, fetch(t.b)?, fetch(t.c)?));
    }

    Ok(Model { triangles, bounds })
}

/// Decode the `CLIP` chunk into named clips.
pub fn decode_clips(pack: &Pack) -> Result<Vec<Clip>, ModelError> {
    let raw: Vec<RawClip> = pack.chunk_to_vec(required_chunk(pack, "CLIP")?)?;
    Ok(raw
        .iter()
        .map(|c| Clip {
            name: Pack::chunk_name_str(&c.name).to_owned(),
            duration: c.duration,
        })
        .collect())
}

pub fn decode_character(pack: &Pack) -> Result<CharacterAsset, ModelError> {
    Ok(CharacterAsset {
        model: decode_model(pack)?,
        clips: decode_clips(pack)?,
    })
}

/*=======================================================================*/
/*                      Encoding (generator + tests)                     */
/*=======================================================================*/

pub fn encode_vertices(vertices: &[Vec3]) -> Vec<u8> {
    let mut out = Vec::with_capacity(vertices.len() * 12);
    for v in vertices {
        out.write_f32::<LE>(v.x).unwrap();
        out.write_f32::<LE>(v.y).unwrap();
        out.write_f32::<LE>(v.z).unwrap();
    }
    out
}

pub fn encode_triangles(indices: &[[u32; 3]]) -> Vec<u8> {
    let mut out = Vec::with_capacity(indices.len() * 12);
    for t in indices {
        out.write_u32::<LE>(t[0]).unwrap();
        out.write_u32::<LE>(t[1]).unwrap();
        out.write_u32::<LE>(t[2]).unwrap();
    }
    out
}

pub fn encode_clips(clips: &[(&str, f32)]) -> Vec<u8> {
    let mut out = Vec::with_capacity(clips.len() * 12);
    for (name, duration) in clips {
        let mut padded = [0u8; 8];
        for (dst, src) in padded.iter_mut().zip(name.bytes()) {
            *dst = src;
        }
        out.extend_from_slice(&padded);
        out.write_f32::<LE>(*duration).unwrap();
    }
    out
}

// ==========================================================================
// Tests
// ==========================================================================
