//! # Demo asset pack loader
//!
//! * Reads the entire pack into RAM.
//! * Provides zero-copy access to individual chunks.
//! * Decodes binary chunks into typed vectors with **bincode 2**.
//!
//! Only the `GPAK` magic is accepted; the layout is a 12-byte header
//! (magic, chunk count, directory offset) followed by chunk data and a
//! 16-byte-per-entry directory.

use bincode::{Decode, config, decode_from_slice};
use byteorder::{LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use std::{
    collections::HashMap,
    fs::File,
    io::{self, Read, Seek, SeekFrom, Write},
    mem,
    path::Path,
};
use thiserror::Error;

/// Size (in bytes) of one directory entry.
const DIR_ENTRY_SIZE: usize = 16;
/// Bytes before the first chunk: magic + chunk count + directory offset.
const HEADER_SIZE: usize = 12;

const MAGIC: &[u8; 4] = b"GPAK";

/// One entry in the chunk directory (16 bytes on disk).
#[derive(Clone, Debug)]
pub struct ChunkInfo {
    /// Eight-byte ASCII name, padded with NULs.
    pub name: [u8; 8],
    pub offset: u32,
    pub size: u32,
}

/// Entire pack in memory (raw bytes + parsed directory).
#[derive(Debug)]
pub struct Pack {
    chunks: Vec<ChunkInfo>,
    bytes: Vec<u8>,
    by_name: HashMap<String, usize>,
}

/// Loader / decoding errors.
#[derive(Error, Debug)]
pub enum PackError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("file is not a GPAK asset pack")]
    BadMagic,

    #[error("directory extends beyond end of file")]
    DirectoryOutOfBounds,

    #[error("chunk index {0} out of range")]
    BadIndex(usize),

    #[error("chunk {name} (# {index}) slice {offset}+{size} past EOF ({file_size})")]
    BadOffset {
        index: usize,
        name: String,
        offset: u32,
        size: u32,
        file_size: usize,
    },

    #[error("chunk {name} (# {index}) size {size} not multiple of element {elem_size}")]
    BadChunkSize {
        index: usize,
        name: String,
        size: usize,
        elem_size: usize,
    },

    #[error("chunk {name} (# {index}): {source}")]
    BadElement {
        index: usize,
        name: String,
        source: bincode::error::DecodeError,
    },
}

impl Pack {
    // ------------------------------------------------------------------ //
    // Low-level helpers
    // ------------------------------------------------------------------ //

    /// Expose the directory as a read-only slice.
    pub fn chunks(&self) -> &[ChunkInfo] {
        &self.chunks
    }

    /// Return &str view of an 8-byte chunk name (trimmed at first NUL).
    pub fn chunk_name_str(name: &[u8; 8]) -> &str {
        let end = name.iter().position(|&b| b == 0).unwrap_or(name.len());
        std::str::from_utf8(&name[..end]).unwrap_or("?")
    }

    /// Raw bytes of chunk `idx` (slice into `self.bytes`).
    pub fn chunk_bytes(&self, idx: usize) -> Result<&[u8], PackError> {
        let c = self.chunks.get(idx).ok_or(PackError::BadIndex(idx))?;
        let start = c.offset as usize;
        let end = start + c.size as usize;
        if end > self.bytes.len() {
            return Err(PackError::BadOffset {
                index: idx,
                name: Self::chunk_name_str(&c.name).into(),
                offset: c.offset,
                size: c.size,
                file_size: self.bytes.len(),
            });
        }
        Ok(&self.bytes[start..end])
    }

    /// Find a chunk by name (case-sensitive).
    pub fn find_chunk(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    // ------------------------------------------------------------------ //
    // Generic decode helper
    // ------------------------------------------------------------------ //

    pub fn chunk_to_vec<T>(&self, idx: usize) -> Result<Vec<T>, PackError>
    where
        T: Decode<()>,
    {
        let bytes = self.chunk_bytes(idx)?;
        let elem = mem::size_of::<T>();

        if bytes.is_empty() || bytes.len() % elem != 0 {
            return Err(PackError::BadChunkSize {
                index: idx,
                name: Self::chunk_name_str(&self.chunks[idx].name).into(),
                size: bytes.len(),
                elem_size: elem,
            });
        }

        let cfg = config::standard()
            .with_fixed_int_encoding()
            .with_little_endian();
        let mut out = Vec::with_capacity(bytes.len() / elem);
        let mut slice = bytes;

        while !slice.is_empty() {
            let (val, read) =
                decode_from_slice::<T, _>(slice, cfg).map_err(|e| PackError::BadElement {
                    index: idx,
                    name: Self::chunk_name_str(&self.chunks[idx].name).into(),
                    source: e,
                })?;
            out.push(val);
            slice = &slice[read..];
        }
        Ok(out)
    }

    // ------------------------------------------------------------------ //
    // Loading
    // ------------------------------------------------------------------ //

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PackError> {
        let mut file = File::open(path)?;

        let mut magic = [0u8; 4];
        file.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(PackError::BadMagic);
        }

        let num_chunks = file.read_u32::<LE>()?;
        let dir_offset = file.read_u32::<LE>()?;

        // read whole file
        let mut bytes = Vec::new();
        file.seek(SeekFrom::Start(0))?;
        file.read_to_end(&mut bytes)?;

        // directory bounds check
        let dir_end = dir_offset as usize + num_chunks as usize * DIR_ENTRY_SIZE;
        if dir_end > bytes.len() {
            return Err(PackError::DirectoryOutOfBounds);
        }

        // parse directory
        let mut chunks = Vec::with_capacity(num_chunks as usize);
        let mut cur = &bytes[dir_offset as usize..dir_end];

        for _ in 0..num_chunks {
            let offset = cur.read_u32::<LE>()?;
            let size = cur.read_u32::<LE>()?;
            let mut name = [0u8; 8];
            cur.read_exact(&mut name)?;
            chunks.push(ChunkInfo { name, offset, size });
        }

        // validate each chunk slice
        for (i, c) in chunks.iter().enumerate() {
            let end = c.offset as usize + c.size as usize;
            if end > bytes.len() {
                return Err(PackError::BadOffset {
                    index: i,
                    name: Self::chunk_name_str(&c.name).into(),
                    offset: c.offset,
                    size: c.size,
                    file_size: bytes.len(),
                });
            }
        }

        // build name → idx map (later chunks shadow earlier ones)
        let mut by_name = HashMap::with_capacity(chunks.len());
        for (i, c) in chunks.iter().enumerate().rev() {
            by_name
                .entry(Self::chunk_name_str(&c.name).to_owned())
                .or_insert(i);
        }

        Ok(Self {
            chunks,
            bytes,
            by_name,
        })
    }
}

// ---------------------------------------------------------------------- //
// Writing (used by the pack generator tool and tests)
// ---------------------------------------------------------------------- //

/// Serialise `chunks` into a pack file.  Names longer than 8 bytes are
/// truncated the same way the loader would trim them.
pub fn write_pack<P: AsRef<Path>>(path: P, chunks: &[(&str, Vec<u8>)]) -> io::Result<()> {
    let mut file = File::create(path)?;

    let data_len: usize = chunks.iter().map(|(_, bytes)| bytes.len()).sum();
    let dir_offset = (HEADER_SIZE + data_len) as u32;

    file.write_all(MAGIC)?;
    file.write_u32::<LE>(chunks.len() as u32)?;
    file.write_u32::<LE>(dir_offset)?;

    let mut offsets = Vec::with_capacity(chunks.len());
    let mut cursor = HEADER_SIZE as u32;
    for (_, bytes) in chunks {
        file.write_all(bytes)?;
        offsets.push(cursor);
        cursor += bytes.len() as u32;
    }

    for ((name, bytes), offset) in chunks.iter().zip(offsets) {
        let mut padded = [0u8; 8];
        for (dst, src) in padded.iter_mut().zip(name.bytes()) {
            *dst = src;
        }
        file.write_u32::<LE>(offset)?;
        file.write_u32::<LE>(bytes.len() as u32)?;
        file.write_all(&padded)?;
    }
    Ok(())
}

// ==========================================================================
// Tests
// ==========================================================================
