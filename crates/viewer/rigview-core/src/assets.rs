//! Staging of a loaded file set into rig assets.
//!
//! The core's only parsing responsibility: pick the skeleton source (which
//! decides whether the runtime uses its binary or textual parser), pick the
//! atlas, and wire texture lookup by matching each page image the atlas
//! references against the loaded file set by path. Skeleton and atlas
//! contents are parsed by the rendering runtime, not here.

use rigview_api_core::{
    FileData, FileEntry, FileKind, FilesLoadedData, RigAssets, RigError, SkeletonSource,
    TexturePage,
};

/// Build [`RigAssets`] from one files-loaded payload. Any missing piece is an
/// error the caller surfaces to the user; nothing is constructed partially.
pub fn stage_rig_assets(data: &FilesLoadedData) -> Result<RigAssets, RigError> {
    let skeleton = select_skeleton(&data.files)?;

    let atlas_entry = data
        .find_kind(FileKind::Atlas)
        .ok_or(RigError::MissingAtlas)?;
    let atlas = text_of(atlas_entry, "atlas text")?;

    let mut pages = Vec::new();
    for page in atlas_page_names(&atlas) {
        let entry = data
            .find_path(page)
            .ok_or_else(|| RigError::MissingTexturePage {
                page: page.to_string(),
            })?;
        pages.push(TexturePage {
            path: page.to_string(),
            data: entry.data.to_bytes(),
        });
    }

    Ok(RigAssets {
        skeleton,
        atlas,
        pages,
    })
}

/// Binary skeletons win over textual ones when both are present; exporters
/// that emit both formats pair them with the same atlas, so either parses.
fn select_skeleton(files: &[FileEntry]) -> Result<SkeletonSource, RigError> {
    if let Some(entry) = files.iter().find(|f| f.kind == FileKind::Skel) {
        return Ok(SkeletonSource::Binary(entry.data.to_bytes()));
    }
    if let Some(entry) = files.iter().find(|f| f.kind == FileKind::Json) {
        let text = match &entry.data {
            FileData::Text(text) => text.clone(),
            // loaders occasionally hand json over undecoded
            FileData::Binary(bytes) => String::from_utf8(bytes.clone()).map_err(|_| {
                RigError::InvalidFileData {
                    name: entry.name.clone(),
                    expected: "utf-8 skeleton json".to_string(),
                }
            })?,
        };
        return Ok(SkeletonSource::Json(text));
    }
    Err(RigError::MissingSkeleton)
}

fn text_of(entry: &FileEntry, expected: &str) -> Result<String, RigError> {
    entry
        .data
        .as_text()
        .map(str::to_string)
        .ok_or_else(|| RigError::InvalidFileData {
            name: entry.name.clone(),
            expected: expected.to_string(),
        })
}

/// Page image names referenced by an atlas: the bare name line that opens
/// each page block (the line after a blank separator, holding no key:value
/// pair). Region names never qualify because they only appear mid-block.
pub fn atlas_page_names(atlas: &str) -> Vec<&str> {
    let mut pages = Vec::new();
    let mut at_block_start = true;
    for line in atlas.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            at_block_start = true;
            continue;
        }
        if at_block_start && !trimmed.contains(':') && !line.starts_with(char::is_whitespace) {
            pages.push(trimmed);
        }
        at_block_start = false;
    }
    pages
}
