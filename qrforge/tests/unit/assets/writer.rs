use super::*;

fn rendered() -> RenderedAssets {
    RenderedAssets {
        svg_text: "<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>\n".to_owned(),
        png_bytes: vec![0x89, b'P', b'N', b'G', 1, 2, 3],
        canvas: 64,
    }
}

fn entries(dir: &Path) -> Vec<String> {
    let Ok(rd) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = rd
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn write_creates_directories_and_both_files() {
    let tmp = tempfile::tempdir().unwrap();
    let writer = AssetWriter::new(AssetDirs::under(tmp.path().join("nested")));
    let stored = writer.write(&rendered()).unwrap();

    assert_eq!(stored.id.get_version_num(), 4);
    assert_eq!(
        stored.svg_path,
        writer.dirs().svg_dir.join(format!("{}.svg", stored.id))
    );
    assert_eq!(
        stored.png_path,
        writer.dirs().png_dir.join(format!("{}.png", stored.id))
    );
    assert_eq!(fs::read_to_string(&stored.svg_path).unwrap(), rendered().svg_text);
    assert_eq!(fs::read(&stored.png_path).unwrap(), rendered().png_bytes);

    // No staging leftovers.
    assert_eq!(entries(&writer.dirs().svg_dir), vec![format!("{}.svg", stored.id)]);
    assert_eq!(entries(&writer.dirs().png_dir), vec![format!("{}.png", stored.id)]);
}

#[test]
fn shared_directory_holds_both_files() {
    let tmp = tempfile::tempdir().unwrap();
    let writer = AssetWriter::new(AssetDirs::new(tmp.path(), tmp.path()));
    let stored = writer.write(&rendered()).unwrap();
    assert_eq!(
        entries(tmp.path()),
        vec![format!("{}.png", stored.id), format!("{}.svg", stored.id)]
    );
}

#[test]
fn repeated_writes_get_distinct_ids() {
    let tmp = tempfile::tempdir().unwrap();
    let writer = AssetWriter::new(AssetDirs::under(tmp.path()));
    let a = writer.write(&rendered()).unwrap();
    let b = writer.write(&rendered()).unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(entries(&writer.dirs().svg_dir).len(), 2);
}

#[test]
fn existing_target_is_never_overwritten_and_nothing_remains() {
    let tmp = tempfile::tempdir().unwrap();
    let writer = AssetWriter::new(AssetDirs::under(tmp.path()));
    let id = Uuid::new_v4();
    fs::create_dir_all(&writer.dirs().png_dir).unwrap();
    let taken = writer.dirs().png_dir.join(format!("{id}.png"));
    fs::write(&taken, b"keep me").unwrap();

    let err = writer.write_with_id(id, &rendered()).unwrap_err();
    match err {
        QrError::Storage { path, source } => {
            assert_eq!(path, taken);
            assert_eq!(source.kind(), io::ErrorKind::AlreadyExists);
        }
        other => panic!("expected storage error, got {other:?}"),
    }

    assert_eq!(fs::read(&taken).unwrap(), b"keep me");
    assert!(entries(&writer.dirs().svg_dir).is_empty());
    assert_eq!(entries(&writer.dirs().png_dir), vec![format!("{id}.png")]);
}

#[test]
fn stale_staging_file_blocks_the_write() {
    let tmp = tempfile::tempdir().unwrap();
    let writer = AssetWriter::new(AssetDirs::under(tmp.path()));
    let id = Uuid::new_v4();
    fs::create_dir_all(&writer.dirs().svg_dir).unwrap();
    let stale = writer.dirs().svg_dir.join(format!(".{id}.svg.partial"));
    fs::write(&stale, b"other writer").unwrap();

    assert!(matches!(
        writer.write_with_id(id, &rendered()).unwrap_err(),
        QrError::Storage { .. }
    ));
    assert_eq!(fs::read(&stale).unwrap(), b"other writer");
    assert!(entries(&writer.dirs().png_dir).is_empty());
}

#[test]
fn remove_deletes_both_and_tolerates_missing_files() {
    let tmp = tempfile::tempdir().unwrap();
    let writer = AssetWriter::new(AssetDirs::under(tmp.path()));
    let stored = writer.write(&rendered()).unwrap();

    fs::remove_file(&stored.png_path).unwrap();
    writer.remove(&stored).unwrap();
    assert!(!stored.svg_path.exists());
    writer.remove(&stored).unwrap();
}

#[test]
fn env_lookup_overrides_defaults() {
    let dirs = AssetDirs::from_lookup(|key| match key {
        SVG_DIR_ENV => Some(OsString::from("/srv/svg")),
        PNG_DIR_ENV => Some(OsString::new()),
        _ => None,
    });
    assert_eq!(dirs.svg_dir, PathBuf::from("/srv/svg"));
    assert_eq!(dirs.png_dir, PathBuf::from("generated_pngs"));

    assert_eq!(AssetDirs::from_lookup(|_| None), AssetDirs::default());
}

#[test]
fn stored_assets_serialize_with_hyphenated_id() {
    let stored = StoredAssets {
        id: Uuid::nil(),
        svg_path: PathBuf::from("a/x.svg"),
        png_path: PathBuf::from("b/x.png"),
    };
    let json = serde_json::to_value(&stored).unwrap();
    assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
    assert_eq!(json["svg_path"], "a/x.svg");
}
