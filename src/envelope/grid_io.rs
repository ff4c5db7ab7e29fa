//! `.tm` (Tile Map) archive I/O: `map.json` (grid + cell state),
//! `source_atlas.json` (the backing atlas, same schema as `.tr`'s
//! `atlas.json`), and `tiles/*.png`.
//!
//! Grounded in `original_source/wfc_viewer/src/core/tm_saver.py`.

use super::atlas_io::{
  check_extension, embed_tile_images, normalize_save_extension, read_json_entry, read_tile_images, zip_options,
  AtlasDocument,
};
use crate::err::EnvelopeError;
use crate::solver::engine::CellSnapshot;
use crate::solver::SolverEngine;
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::{ZipArchive, ZipWriter};

const MAP_ENTRY: &str = "map.json";
const SOURCE_ATLAS_ENTRY: &str = "source_atlas.json";

#[derive(serde::Serialize, serde::Deserialize)]
struct GridSize {
  width: usize,
  height: usize,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct CellRecord {
  x: usize,
  y: usize,
  tile_id: String,
  locked: bool,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct UncollapsedRecord {
  x: usize,
  y: usize,
  possibilities: Vec<String>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct MapDocument {
  version: String,
  source_tr: String,
  grid: GridSize,
  cells: Vec<CellRecord>,
  uncollapsed: Vec<UncollapsedRecord>,
}

impl MapDocument {
  fn from_engine(engine: &SolverEngine, source_tr: &str) -> Self {
    let mut cells = Vec::new();
    let mut uncollapsed = Vec::new();

    for snap in engine.snapshot() {
      if let Some(tile_id) = snap.tile_id {
        cells.push(CellRecord {
          x: snap.x,
          y: snap.y,
          tile_id,
          locked: snap.locked,
        });
      } else if !snap.possibilities.is_empty() {
        uncollapsed.push(UncollapsedRecord {
          x: snap.x,
          y: snap.y,
          possibilities: snap.possibilities.into_iter().collect(),
        });
      }
    }

    Self {
      version: "1.0".to_string(),
      source_tr: source_tr.to_string(),
      grid: GridSize {
        width: engine.width(),
        height: engine.height(),
      },
      cells,
      uncollapsed,
    }
  }

  fn into_snapshots(self) -> (usize, usize, Vec<CellSnapshot>) {
    let mut snapshots = Vec::with_capacity(self.cells.len() + self.uncollapsed.len());
    for cell in self.cells {
      snapshots.push(CellSnapshot {
        x: cell.x,
        y: cell.y,
        possibilities: BTreeSet::from([cell.tile_id.clone()]),
        tile_id: Some(cell.tile_id),
        locked: cell.locked,
      });
    }
    for cell in self.uncollapsed {
      snapshots.push(CellSnapshot {
        x: cell.x,
        y: cell.y,
        tile_id: None,
        locked: false,
        possibilities: cell.possibilities.into_iter().collect(),
      });
    }
    (self.grid.width, self.grid.height, snapshots)
  }
}

/// Saves `engine`'s current grid state and backing atlas to a `.tm`
/// archive at `path`. `source_tr_hint` is an optional recorded filename
/// for the originating `.tr`, for display purposes only. `images` must
/// have one PNG payload per base tile in `engine.atlas()`, keyed by id.
pub fn save_grid(
  engine: &SolverEngine,
  path: impl AsRef<Path>,
  source_tr_hint: Option<&str>,
  images: &HashMap<String, Vec<u8>>,
) -> Result<(), EnvelopeError> {
  let path = normalize_save_extension(path.as_ref(), "tm");

  let file = File::create(&path)?;
  let mut writer = ZipWriter::new(file);
  let options = zip_options();

  let base_tiles = embed_tile_images(&mut writer, engine.atlas(), images, options)?;
  let atlas_document = AtlasDocument::from_atlas(engine.atlas(), base_tiles);
  let map_document = MapDocument::from_engine(engine, source_tr_hint.unwrap_or(""));

  for (entry, document) in [
    (MAP_ENTRY, serde_json::to_string_pretty(&map_document)),
    (SOURCE_ATLAS_ENTRY, serde_json::to_string_pretty(&atlas_document)),
  ] {
    let json = document.map_err(|source| EnvelopeError::MalformedJson {
      entry: entry.to_string(),
      source,
    })?;
    writer.start_file(entry, options)?;
    writer.write_all(json.as_bytes())?;
  }

  writer.finish()?;
  Ok(())
}

/// Loads a `.tm` archive into a fresh [`SolverEngine`] (unseeded — the
/// saved state has no RNG history to resume), plus its atlas's PNG
/// payloads keyed by base tile id.
pub fn load_grid(path: impl AsRef<Path>) -> Result<(SolverEngine, HashMap<String, Vec<u8>>), EnvelopeError> {
  let path = path.as_ref();
  check_extension(path, "tm")?;

  let file = File::open(path)?;
  let mut archive = ZipArchive::new(file)?;

  let map_document: MapDocument = read_json_entry(&mut archive, MAP_ENTRY)?;
  let atlas_document: AtlasDocument = read_json_entry(&mut archive, SOURCE_ATLAS_ENTRY)?;

  let images = read_tile_images(&mut archive, &atlas_document.base_tiles)?;

  let mut atlas = atlas_document.into_atlas();
  atlas.file_path = None;
  atlas.modified = false;

  let (width, height, snapshots) = map_document.into_snapshots();
  let engine = SolverEngine::from_snapshot(atlas, width, height, None, snapshots)?;

  Ok((engine, images))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::atlas::{Atlas, BaseTile};
  use crate::transform::Side;

  fn atlas_with_one_tile() -> Atlas {
    let mut atlas = Atlas::new();
    atlas.add_base_tile(BaseTile::new("grass", "grass.png", 16, 16)).unwrap();
    atlas.add_rule("grass", Side::Top, "grass", 100.0, false).unwrap();
    atlas.add_rule("grass", Side::Bottom, "grass", 100.0, false).unwrap();
    atlas.add_rule("grass", Side::Left, "grass", 100.0, false).unwrap();
    atlas.add_rule("grass", Side::Right, "grass", 100.0, false).unwrap();
    atlas
  }

  #[test]
  fn round_trip_preserves_grid_state() {
    let atlas = atlas_with_one_tile();
    let mut engine = SolverEngine::new(atlas, 2, 2, Some(1));
    engine.lock_cell(0, 0, "grass").unwrap();

    let mut images = HashMap::new();
    images.insert("grass".to_string(), b"not-a-real-png".to_vec());

    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("fixture.tm");
    save_grid(&engine, &archive_path, Some("fixture.tr"), &images).unwrap();

    let (loaded_engine, loaded_images) = load_grid(&archive_path).unwrap();
    assert_eq!(loaded_engine.width(), 2);
    assert_eq!(loaded_engine.height(), 2);
    assert_eq!(loaded_engine.cell(0, 0).unwrap().collapsed_tile.as_deref(), Some("grass"));
    assert!(loaded_engine.cell(0, 0).unwrap().locked);
    assert_eq!(loaded_engine.atlas().rules.len(), 4);
    assert_eq!(loaded_images["grass"], b"not-a-real-png".to_vec());
  }

  #[test]
  fn load_rejects_non_tm_extension() {
    let err = load_grid("fixture.zip").unwrap_err();
    assert!(matches!(err, EnvelopeError::UnsupportedExtension { .. }));
  }
}
