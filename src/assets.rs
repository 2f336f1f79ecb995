/// Frame-set loading.
///
/// Sprites live on disk as directories of `.txt` cell-art files, one file
/// per animation frame.  Files are sorted lexicographically by name so the
/// animation sequence is deterministic regardless of how the filesystem
/// enumerates the directory.
///
/// A missing directory, an unreadable file, or a directory with no frames
/// is a fatal startup error — the session cannot run without its sprites.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::entities::{Frame, FrameSet, SpriteLibrary};

/// Load every `.txt` file in `dir` as one frame, in lexicographic filename
/// order.
pub fn load_frame_set(dir: &Path) -> Result<FrameSet> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("reading sprite directory {}", dir.display()))?;

    let mut paths: Vec<_> = entries
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("listing sprite directory {}", dir.display()))?
        .into_iter()
        .map(|e| e.path())
        .filter(|p| p.extension().map_or(false, |ext| ext == "txt"))
        .collect();
    paths.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));

    let mut frames = Vec::with_capacity(paths.len());
    for path in &paths {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading sprite frame {}", path.display()))?;
        frames.push(parse_frame(&text));
    }

    if frames.is_empty() {
        bail!("no .txt frames found in {}", dir.display());
    }
    Ok(FrameSet::new(frames))
}

/// Load the four sprite sets the session spawns from, rooted at `root`.
pub fn load_sprites(root: &Path) -> Result<SpriteLibrary> {
    Ok(SpriteLibrary {
        player: Arc::new(load_frame_set(&root.join("jet"))?),
        enemy: Arc::new(load_frame_set(&root.join("missile"))?),
        explosion: Arc::new(load_frame_set(&root.join("explosion"))?),
        cloud: Arc::new(load_frame_set(&root.join("cloud"))?),
    })
}

fn parse_frame(text: &str) -> Frame {
    // Trailing whitespace-only lines are file-format noise, not art.
    let mut rows: Vec<String> = text.lines().map(|l| l.trim_end().to_string()).collect();
    while rows.last().map_or(false, |r| r.is_empty()) {
        rows.pop();
    }
    Frame { rows }
}
