//! Frame hashing for determinism checks on offscreen renders.

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::surface::RgbaFrame;

pub fn rgba_sha256_hex(rgba: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rgba);
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub width: u32,
    pub height: u32,
    pub hash: String,
}

impl FrameSnapshot {
    pub fn capture(frame: u64, rgba: &RgbaFrame) -> Self {
        let size = rgba.size();
        Self {
            frame,
            width: size.width,
            height: size.height,
            hash: rgba_sha256_hex(rgba.bytes()),
        }
    }
}

pub fn write_snapshots(path: &Path, snapshots: &[FrameSnapshot]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let text = serde_json::to_string_pretty(snapshots)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, text)
}

pub fn read_snapshots(path: &Path) -> io::Result<Vec<FrameSnapshot>> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceSize;

    #[test]
    fn sha256_of_empty_input_is_well_known() {
        assert_eq!(
            rgba_sha256_hex(&[]),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn capture_records_size() {
        let frame = RgbaFrame::new(SurfaceSize::new(3, 2));
        let snap = FrameSnapshot::capture(7, &frame);
        assert_eq!((snap.frame, snap.width, snap.height), (7, 3, 2));
        assert_eq!(snap.hash, rgba_sha256_hex(&[0u8; 24]));
    }
}
