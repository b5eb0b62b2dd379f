//! Off-thread asset loading.
//!
//! Each request runs on its own thread and posts its outcome back over a
//! channel; the frame loop polls non-blockingly and installs whatever has
//! arrived.  Completion order between the character and the environment is
//! not guaranteed, and a request that never completes simply leaves the
//! matching readiness gate closed.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread;

use super::model::{CharacterAsset, Model, ModelError, decode_character, decode_model};
use super::pack::Pack;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadKind {
    Character,
    Environment,
}

/// Payload of a finished load.
#[derive(Debug)]
pub enum LoadedAsset {
    Character(CharacterAsset),
    Environment(Model),
}

/// What a worker thread posts back, success or not.
#[derive(Debug)]
pub struct LoadOutcome {
    pub path: PathBuf,
    pub kind: LoadKind,
    pub result: Result<LoadedAsset, ModelError>,
}

pub struct AssetLoader {
    tx: Sender<LoadOutcome>,
    rx: Receiver<LoadOutcome>,
    pending: usize,
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader {
    pub fn new() -> AssetLoader {
        let (tx, rx) = channel();
        AssetLoader { tx, rx, pending: 0 }
    }

    /// Kick off a load on a worker thread.
    pub fn request(&mut self, path: impl Into<PathBuf>, kind: LoadKind) {
        let path = path.into();
        let tx = self.tx.clone();
        self.pending += 1;
        thread::spawn(move || {
            let result = load(&path, kind);
            // receiver gone means the app is shutting down
            let _ = tx.send(LoadOutcome { path, kind, result });
        });
    }

    /// Non-blocking: one finished outcome per call, if any.
    pub fn poll(&mut self) -> Option<LoadOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => {
                self.pending -= 1;
                Some(outcome)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.pending
    }
}

fn load(path: &Path, kind: LoadKind) -> Result<LoadedAsset, ModelError> {
    let pack = Pack::from_file(path).map_err(ModelError::from)?;
    match kind {
        LoadKind::Character => Ok(LoadedAsset::Character(decode_character(&pack)?)),
        LoadKind::Environment => Ok(LoadedAsset::Environment(decode_model(&pack)?)),
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::model::{encode_clips, encode_triangles, encode_vertices};
    use crate::asset::pack::write_pack;
    use glam::Vec3;
    use std::time::Duration;

    fn wait_for(loader: &mut AssetLoader) -> LoadOutcome {
        for _ in 0..200 {
            if let Some(outcome) = loader.poll() {
                return outcome;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("load never completed");
    }

    #[test]
    fn loads_character_pack_off_thread() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        write_pack(
            tmp.path(),
            &[
                (
                    "MESH",
                    encode_vertices(&[Vec3::ZERO, Vec3::X, Vec3::Y]),
                ),
                ("TRIS", encode_triangles(&[[0, 1, 2]])),
                (
                    "CLIP",
                    encode_clips(&[("Idle", 2.5), ("Walk", 1.0), ("Run", 0.6)]),
                ),
            ],
        )
        .unwrap();

        let mut loader = AssetLoader::new();
        loader.request(tmp.path(), LoadKind::Character);
        assert_eq!(loader.pending(), 1);

        let outcome = wait_for(&mut loader);
        assert_eq!(outcome.kind, LoadKind::Character);
        match outcome.result.unwrap() {
            LoadedAsset::Character(character) => {
                assert_eq!(character.clips.len(), 3);
                assert_eq!(character.model.triangles.len(), 1);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
        assert_eq!(loader.pending(), 0);
    }

    #[test]
    fn missing_file_surfaces_as_error_outcome() {
        let mut loader = AssetLoader::new();
        loader.request("/definitely/not/here.pak", LoadKind::Environment);
        let outcome = wait_for(&mut loader);
        assert!(outcome.result.is_err());
    }
}
