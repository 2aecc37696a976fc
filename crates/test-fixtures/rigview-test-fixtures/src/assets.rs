//! Canned file-set payloads shaped like the loader's output.

use rigview_api_core::{FileData, FileEntry, FileKind, FilesLoadedData};
use serde_json::json;

/// Minimal skeleton json carrying the given animation and skin names, in the
/// shape the mock backend parses.
pub fn skeleton_json(animations: &[&str], skins: &[&str]) -> String {
    let animations: serde_json::Map<String, serde_json::Value> = animations
        .iter()
        .map(|name| (name.to_string(), json!({})))
        .collect();
    let skins: Vec<serde_json::Value> = skins.iter().map(|name| json!({ "name": name })).collect();
    json!({
        "skeleton": { "spine": "4.1" },
        "animations": animations,
        "skins": skins,
    })
    .to_string()
}

/// Atlas text referencing two page images, `hero.png` and `hero_2.png`.
pub fn two_page_atlas() -> String {
    concat!(
        "\n",
        "hero.png\n",
        "size: 1024,1024\n",
        "format: RGBA8888\n",
        "head\n",
        "  rotate: false\n",
        "  xy: 2, 2\n",
        "\n",
        "hero_2.png\n",
        "size: 512,512\n",
        "torso\n",
        "  rotate: false\n",
    )
    .to_string()
}

fn page(path: &str, byte: u8) -> FileEntry {
    FileEntry {
        kind: FileKind::Png,
        data: FileData::Binary(vec![byte]),
        name: path.to_string(),
        path: Some(path.to_string()),
    }
}

fn atlas_entry() -> FileEntry {
    FileEntry {
        kind: FileKind::Atlas,
        data: FileData::Text(two_page_atlas()),
        name: "hero.atlas".to_string(),
        path: Some("hero.atlas".to_string()),
    }
}

/// A complete json-skeleton file set (walk/run/idle animations, default
/// skin) with the given canvas background.
pub fn files_loaded(background: &str) -> FilesLoadedData {
    FilesLoadedData {
        files: vec![
            FileEntry {
                kind: FileKind::Json,
                data: FileData::Text(skeleton_json(&["idle", "run", "walk"], &["default"])),
                name: "hero.json".to_string(),
                path: Some("hero.json".to_string()),
            },
            atlas_entry(),
            page("hero.png", 1),
            page("hero_2.png", 2),
        ],
        canvas_background: background.to_string(),
    }
}

/// A file set carrying both a binary and a json skeleton; the binary one
/// must win.
pub fn files_loaded_binary(background: &str) -> FilesLoadedData {
    let mut data = files_loaded(background);
    data.files.insert(
        0,
        FileEntry {
            kind: FileKind::Skel,
            data: FileData::Binary(vec![0x53, 0x4b]),
            name: "hero.skel".to_string(),
            path: Some("hero.skel".to_string()),
        },
    );
    data
}

/// A file set whose atlas references a page image that was never loaded.
pub fn files_missing_page(background: &str) -> FilesLoadedData {
    let mut data = files_loaded(background);
    data.files.retain(|f| f.path.as_deref() != Some("hero_2.png"));
    data
}
