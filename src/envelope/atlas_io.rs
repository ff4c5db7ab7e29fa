//! `.tr` (Tile Rules) archive I/O: `atlas.json` plus one PNG per base
//! tile, in a deflate ZIP. See SPEC_FULL.md §6 for the exact schema.
//!
//! This crate never decodes tile images — callers hand in and get back
//! opaque `Vec<u8>` PNG payloads keyed by base tile id, so a load/save
//! round-trip needs no on-disk staging; the payload map's own lifetime
//! is the scope, matching spec.md §5's "released on every exit path"
//! requirement without a directory to leak.
//!
//! Grounded in `original_source/atlas_editor/src/core/serialization.py`'s
//! `save_atlas`/`load_atlas`.

use crate::atlas::{Atlas, BaseTile, Rule, Settings, Tile};
use crate::err::EnvelopeError;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

pub(crate) const ATLAS_ENTRY: &str = "atlas.json";

/// The `atlas.json` shape — a view of [`Atlas`] with `variants` renamed
/// to `tiles` and no transient fields, shared by `.tr` and `.tm` I/O.
#[derive(serde::Serialize, serde::Deserialize)]
pub(crate) struct AtlasDocument {
  pub version: String,
  pub settings: Settings,
  pub base_tiles: Vec<BaseTile>,
  pub tiles: Vec<Tile>,
  pub rules: Vec<Rule>,
}

impl AtlasDocument {
  pub(crate) fn from_atlas(atlas: &Atlas, base_tiles: Vec<BaseTile>) -> Self {
    Self {
      version: atlas.version.clone(),
      settings: atlas.settings,
      base_tiles,
      tiles: atlas.variants.clone(),
      rules: atlas.rules.clone(),
    }
  }

  pub(crate) fn into_atlas(self) -> Atlas {
    let mut atlas = Atlas::new();
    atlas.version = self.version;
    atlas.settings = self.settings;
    atlas.base_tiles = self.base_tiles;
    atlas.variants = self.tiles;
    atlas.rules = self.rules;
    atlas.reindex();
    atlas
  }
}

pub(crate) fn zip_options() -> SimpleFileOptions {
  SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated)
}

/// Forces `path` to end in `.{expected}`, replacing any other extension
/// — mirrors the original's unconditional `with_suffix` on save (never
/// an error; only [`check_extension`] rejects on load).
pub(crate) fn normalize_save_extension(path: &Path, expected: &'static str) -> std::path::PathBuf {
  match path.extension().and_then(|e| e.to_str()) {
    Some(ext) if ext == expected => path.to_path_buf(),
    _ => path.with_extension(expected),
  }
}

pub(crate) fn check_extension(path: &Path, expected: &'static str) -> Result<(), EnvelopeError> {
  if path.extension().and_then(|e| e.to_str()) == Some(expected) {
    Ok(())
  } else {
    Err(EnvelopeError::UnsupportedExtension { expected })
  }
}

/// Writes `tiles/<id>.png` for every base tile in `atlas`, sourced from
/// `images` (keyed by base tile id). Returns the `base_tiles` list with
/// `source` rewritten to the archive-relative path written.
pub(crate) fn embed_tile_images(
  writer: &mut ZipWriter<File>,
  atlas: &Atlas,
  images: &HashMap<String, Vec<u8>>,
  options: SimpleFileOptions,
) -> Result<Vec<BaseTile>, EnvelopeError> {
  let mut updated = Vec::with_capacity(atlas.base_tiles.len());

  for base_tile in &atlas.base_tiles {
    let bytes = images
      .get(&base_tile.id)
      .ok_or_else(|| EnvelopeError::MissingTileImage(base_tile.id.clone()))?;

    let archive_path = format!("tiles/{}.png", base_tile.id);
    writer.start_file(&archive_path, options)?;
    writer.write_all(bytes)?;

    updated.push(BaseTile {
      id: base_tile.id.clone(),
      source: archive_path,
      width: base_tile.width,
      height: base_tile.height,
    });
  }

  Ok(updated)
}

/// Reads every `base_tiles[].source` entry out of `archive` into a
/// byte map keyed by base tile id.
pub(crate) fn read_tile_images(
  archive: &mut ZipArchive<File>,
  base_tiles: &[BaseTile],
) -> Result<HashMap<String, Vec<u8>>, EnvelopeError> {
  let mut images = HashMap::with_capacity(base_tiles.len());
  for base_tile in base_tiles {
    let mut bytes = Vec::new();
    archive
      .by_name(&base_tile.source)
      .map_err(|_| EnvelopeError::MissingEntry(base_tile.source.clone()))?
      .read_to_end(&mut bytes)?;
    images.insert(base_tile.id.clone(), bytes);
  }
  Ok(images)
}

pub(crate) fn read_json_entry<T: serde::de::DeserializeOwned>(
  archive: &mut ZipArchive<File>,
  entry: &str,
) -> Result<T, EnvelopeError> {
  let mut file = archive
    .by_name(entry)
    .map_err(|_| EnvelopeError::MissingEntry(entry.to_string()))?;
  let mut contents = String::new();
  file.read_to_string(&mut contents)?;
  serde_json::from_str(&contents).map_err(|source| EnvelopeError::MalformedJson {
    entry: entry.to_string(),
    source,
  })
}

/// Saves `atlas` to a `.tr` archive at `path` (`.tr` appended/forced if
/// the path has a different extension). `images` must have one PNG
/// payload per base tile, keyed by id.
pub fn save_atlas(atlas: &mut Atlas, path: impl AsRef<Path>, images: &HashMap<String, Vec<u8>>) -> Result<(), EnvelopeError> {
  let path = normalize_save_extension(path.as_ref(), "tr");

  let file = File::create(&path)?;
  let mut writer = ZipWriter::new(file);
  let options = zip_options();

  let base_tiles = embed_tile_images(&mut writer, atlas, images, options)?;
  let document = AtlasDocument::from_atlas(atlas, base_tiles);

  let json = serde_json::to_string_pretty(&document).map_err(|source| EnvelopeError::MalformedJson {
    entry: ATLAS_ENTRY.to_string(),
    source,
  })?;
  writer.start_file(ATLAS_ENTRY, options)?;
  writer.write_all(json.as_bytes())?;
  writer.finish()?;

  atlas.file_path = Some(path);
  atlas.modified = false;
  Ok(())
}

/// Loads a `.tr` archive, returning the atlas and its base tiles' PNG
/// payloads keyed by id.
pub fn load_atlas(path: impl AsRef<Path>) -> Result<(Atlas, HashMap<String, Vec<u8>>), EnvelopeError> {
  let path = path.as_ref();
  check_extension(path, "tr")?;

  let file = File::open(path)?;
  let mut archive = ZipArchive::new(file)?;
  let document: AtlasDocument = read_json_entry(&mut archive, ATLAS_ENTRY)?;

  let images = read_tile_images(&mut archive, &document.base_tiles)?;

  let mut atlas = document.into_atlas();
  atlas.file_path = Some(path.to_path_buf());
  atlas.modified = false;

  Ok((atlas, images))
}
