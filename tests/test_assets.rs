use std::fs;

use sky_raider::assets::{load_frame_set, load_sprites};

fn write_frame(dir: &std::path::Path, name: &str, art: &str) {
    fs::write(dir.join(name), art).unwrap();
}

#[test]
fn frames_sort_lexicographically_not_by_creation_order() {
    let dir = tempfile::tempdir().unwrap();
    // Written out of order on purpose — load order must not depend on it
    write_frame(dir.path(), "c.txt", "third");
    write_frame(dir.path(), "a.txt", "first");
    write_frame(dir.path(), "b.txt", "second");

    let set = load_frame_set(dir.path()).unwrap();
    let rows: Vec<_> = set.frames.iter().map(|f| f.rows[0].as_str()).collect();
    assert_eq!(rows, vec!["first", "second", "third"]);
}

#[test]
fn numeric_suffix_names_load_in_sequence() {
    let dir = tempfile::tempdir().unwrap();
    write_frame(dir.path(), "jet_2.txt", "2");
    write_frame(dir.path(), "jet_0.txt", "0");
    write_frame(dir.path(), "jet_1.txt", "1");

    let set = load_frame_set(dir.path()).unwrap();
    let rows: Vec<_> = set.frames.iter().map(|f| f.rows[0].as_str()).collect();
    assert_eq!(rows, vec!["0", "1", "2"]);
}

#[test]
fn non_txt_files_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write_frame(dir.path(), "a.txt", "art");
    write_frame(dir.path(), "readme.md", "not art");
    write_frame(dir.path(), "sprite.png", "binary junk");

    let set = load_frame_set(dir.path()).unwrap();
    assert_eq!(set.len(), 1);
}

#[test]
fn multi_row_frames_keep_leading_spaces() {
    let dir = tempfile::tempdir().unwrap();
    write_frame(dir.path(), "a.txt", "  x\n x \nx\n\n");

    let set = load_frame_set(dir.path()).unwrap();
    let frame = &set.frames[0];
    // Trailing blank line trimmed, leading spaces preserved
    assert_eq!(frame.rows, vec!["  x", " x", "x"]);
}

#[test]
fn empty_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_frame_set(dir.path()).unwrap_err();
    assert!(err.to_string().contains("no .txt frames"));
}

#[test]
fn missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_frame_set(&dir.path().join("nope")).is_err());
}

#[test]
fn sprite_library_requires_all_four_sets() {
    let root = tempfile::tempdir().unwrap();
    for name in ["jet", "missile", "explosion", "cloud"] {
        let sub = root.path().join(name);
        fs::create_dir(&sub).unwrap();
        write_frame(&sub, "0.txt", "x");
    }
    assert!(load_sprites(root.path()).is_ok());

    // Remove one set — loading must fail
    fs::remove_dir_all(root.path().join("explosion")).unwrap();
    assert!(load_sprites(root.path()).is_err());
}

#[test]
fn repo_assets_tree_loads() {
    // The sprites shipped with the crate must satisfy the loader
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
    let sprites = load_sprites(&root).unwrap();
    assert!(sprites.player.len() > 1);
    assert!(sprites.enemy.len() > 1);
    assert!(sprites.explosion.len() > 1);
    assert!(sprites.cloud.len() >= 1);
}
