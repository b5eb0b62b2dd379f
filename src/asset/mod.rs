mod loader;
mod model;
mod pack;

pub use loader::{AssetLoader, LoadKind, LoadOutcome, LoadedAsset};
pub use model::{
    CharacterAsset, Model, ModelError, RawClip, RawTriangle, RawVertex, decode_character,
    decode_clips, decode_model, encode_clips, encode_triangles, encode_vertices,
};
pub use pack::{ChunkInfo, Pack, PackError, write_pack};
