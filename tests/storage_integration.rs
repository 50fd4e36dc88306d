use hangeuldown::storage::{CONTENT_KEY, FileStore, KeyValueStore, THEME_KEY};
use hangeuldown::theme::{Theme, ThemeController};

#[test]
fn test_theme_survives_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let mut store = FileStore::open(&path).unwrap();
    let mut controller = ThemeController::restore(&store);
    assert_eq!(controller.theme(), Theme::Light);
    controller.toggle();
    controller.persist(&mut store).unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(ThemeController::restore(&reopened).theme(), Theme::Dark);
}

#[test]
fn test_double_toggle_restores_persisted_theme() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let mut store = FileStore::open(&path).unwrap();
    store.set(THEME_KEY, "dark").unwrap();

    let mut controller = ThemeController::restore(&store);
    controller.toggle();
    controller.persist(&mut store).unwrap();
    controller.toggle();
    controller.persist(&mut store).unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
}

#[test]
fn test_content_and_theme_are_independent_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let mut store = FileStore::open(&path).unwrap();
    store.set(CONTENT_KEY, "첫 번째").unwrap();
    store.set(THEME_KEY, "dark").unwrap();
    store.set(CONTENT_KEY, "두 번째").unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let entries: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(entries["content"], "두 번째");
    assert_eq!(entries["theme"], "dark");
}

#[test]
fn test_unknown_theme_value_restores_light() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, r#"{"theme": "sepia"}"#).unwrap();
    let store = FileStore::open(&path).unwrap();
    assert_eq!(ThemeController::restore(&store).theme(), Theme::Light);
}
