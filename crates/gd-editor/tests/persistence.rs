//! Integration tests: save / load / export / import through a store.

use gd_core::{FontWeight, Zone};
use gd_editor::{Editor, EditorConfig, LayoutStore, MemoryStore, Notice, PersistError};
use pretty_assertions::assert_eq;

const KEY: &str = "savedCharacterLayout";

fn editor_with(config: EditorConfig) -> Editor {
    let _ = env_logger::builder().is_test(true).try_init();
    Editor::new(Zone::new(400.0, 300.0), config)
}

fn editor() -> Editor {
    editor_with(EditorConfig::default())
}

// ─── Round trip ─────────────────────────────────────────────────────────

#[test]
fn roundtrip_keeps_attributes_and_drops_pairing() {
    let mut ed = editor();
    let mut store = MemoryStore::new();
    ed.set_symmetry(true);
    ed.drop_glyph('S', 80.0, 40.0);
    ed.set_rotation(30.0, 0.0);
    ed.set_scale_y(2.0, 0.0);
    ed.set_weight(FontWeight::BOLD, 0.0);
    ed.bring_to_front();

    let before: Vec<_> = ed.scene().iter().cloned().collect();
    assert_eq!(ed.save_layout(&mut store), Ok(Notice::Saved));

    let mut other = editor();
    assert_eq!(other.load_layout(&store), Ok(Notice::Loaded));
    assert!(other.symmetry());
    let after: Vec<_> = other.scene().iter().cloned().collect();
    assert_eq!(after.len(), before.len());

    for (a, b) in before.iter().zip(&after) {
        assert_eq!(b.glyph, a.glyph);
        assert_eq!((b.cx, b.cy), (a.cx, a.cy));
        assert_eq!(b.rotation, a.rotation);
        assert_eq!((b.scale_x, b.scale_y), (a.scale_x.abs(), a.scale_y.abs()));
        assert_eq!(b.color, a.color);
        assert_eq!(b.font_weight, a.font_weight);
        assert_eq!(b.z_index, a.z_index);
        assert!(a.is_paired());
        assert!(!b.is_paired(), "pairing must not survive a round trip");
        assert_eq!(other.scene().partner(b.id), None);
    }
}

#[test]
fn load_resumes_z_allocator_after_max() {
    let mut ed = editor();
    let mut store = MemoryStore::new();
    store
        .set(KEY, r#"{"symmetry":false,"characters":[{"char":"A","cx":1,"cy":1,"zIndex":41}]}"#)
        .unwrap();
    ed.load_layout(&store).unwrap();
    let id = ed.drop_glyph('B', 5.0, 5.0);
    assert_eq!(ed.scene().get(id).unwrap().z_index, 42);
}

#[test]
fn load_is_undoable() {
    let mut ed = editor();
    let mut store = MemoryStore::new();
    ed.save_layout(&mut store).unwrap();
    ed.drop_glyph('A', 5.0, 5.0);
    ed.load_layout(&store).unwrap();
    assert!(ed.scene().is_empty());
    ed.undo();
    assert_eq!(ed.scene().len(), 1);
}

// ─── Missing data ───────────────────────────────────────────────────────

#[test]
fn missing_layout_is_reported_and_scene_untouched() {
    let mut ed = editor();
    let store = MemoryStore::new();
    ed.drop_glyph('A', 5.0, 5.0);
    let err = ed.load_layout(&store).unwrap_err();
    assert_eq!(err, PersistError::NothingSaved);
    assert_eq!(err.to_string(), "No saved character layout found!");
    assert_eq!(ed.scene().len(), 1);

    let err = ed.export_layout(&store).unwrap_err();
    assert_eq!(err.to_string(), "Nothing to export!");
}

#[test]
fn export_hands_back_stored_text() {
    let mut ed = editor();
    let mut store = MemoryStore::new();
    ed.drop_glyph('A', 5.0, 5.0);
    ed.save_layout(&mut store).unwrap();
    ed.drop_glyph('B', 6.0, 6.0);

    let file = ed.export_layout(&store).unwrap();
    assert_eq!(file.filename, "character.json");
    assert_eq!(Some(file.contents), store.get(KEY).unwrap());
}

// ─── Import ─────────────────────────────────────────────────────────────

#[test]
fn import_stores_then_loads() {
    let mut ed = editor();
    let mut store = MemoryStore::new();
    let text = r#"{"symmetry":true,"characters":[{"char":"Z","cx":10,"cy":20}]}"#;
    assert_eq!(ed.import_layout(&mut store, text), Ok(Notice::Loaded));
    assert_eq!(store.get(KEY).unwrap().as_deref(), Some(text));
    assert_eq!(ed.scene().len(), 1);
    assert!(ed.symmetry());
}

#[test]
fn import_with_max_z_index_still_accepts_drops() {
    let mut ed = editor();
    let mut store = MemoryStore::new();
    let text = r#"{"characters":[{"char":"A","cx":10,"cy":20,"zIndex":2147483647}]}"#;
    assert_eq!(ed.import_layout(&mut store, text), Ok(Notice::Loaded));

    ed.drop_glyph('B', 50.0, 50.0);
    ed.bring_to_front();
    assert_eq!(ed.scene().len(), 2);
    assert!(ed.scene().iter().all(|inst| inst.z_index == i32::MAX));
    assert!(ed.undo());
    assert_eq!(ed.scene().len(), 1);
}

#[test]
fn malformed_import_overwrites_saved_layout_by_default() {
    let mut ed = editor();
    let mut store = MemoryStore::new();
    ed.drop_glyph('A', 5.0, 5.0);
    ed.save_layout(&mut store).unwrap();

    let err = ed.import_layout(&mut store, "{oops").unwrap_err();
    assert!(matches!(err, PersistError::Malformed(_)));
    assert_eq!(ed.scene().len(), 1, "scene untouched");
    assert_eq!(store.get(KEY).unwrap().as_deref(), Some("{oops"));
}

#[test]
fn validated_import_refuses_to_persist_bad_text() {
    let mut ed = editor_with(EditorConfig {
        validate_imports: true,
        ..EditorConfig::default()
    });
    let mut store = MemoryStore::new();
    ed.drop_glyph('A', 5.0, 5.0);
    ed.save_layout(&mut store).unwrap();
    let saved = store.get(KEY).unwrap();

    let err = ed.import_layout(&mut store, "{oops").unwrap_err();
    assert!(err.to_string().starts_with("Could not load layout"));
    assert_eq!(store.get(KEY).unwrap(), saved);
}

#[test]
fn custom_storage_key() {
    let mut ed = editor_with(EditorConfig {
        storage_key: "slot-2".into(),
        ..EditorConfig::default()
    });
    let mut store = MemoryStore::new();
    ed.save_layout(&mut store).unwrap();
    assert!(store.get("slot-2").unwrap().is_some());
    assert_eq!(store.get(KEY).unwrap(), None);
}
