/*!
 * Tests for file and directory utilities
 */

use anyhow::Result;

use vidscribe::file_utils::FileManager;
use crate::common;

#[test]
fn test_generate_output_path_withVideoId_shouldUseId() {
    let path = FileManager::generate_output_path("out", Some("dQw4w9WgXcQ"));
    assert_eq!(path, std::path::PathBuf::from("out/dQw4w9WgXcQ.json"));
}

#[test]
fn test_generate_output_path_withoutVideoId_shouldUseTimestamp() {
    let path = FileManager::generate_output_path("out", None);
    let name = path.file_name().unwrap().to_string_lossy().into_owned();

    // transcript_YYYYmmdd_HHMMSS.json
    assert!(name.starts_with("transcript_"));
    assert!(name.ends_with(".json"));
    assert_eq!(name.len(), "transcript_20240101_120000.json".len());
}

#[test]
fn test_find_files_withMixedExtensions_shouldReturnOnlyMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "a.en.vtt", "WEBVTT")?;
    common::create_test_file(temp_dir.path(), "b.VTT", "WEBVTT")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "text")?;

    let mut found = FileManager::find_files(temp_dir.path(), ".vtt")?;
    found.sort();

    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| p.extension().unwrap().eq_ignore_ascii_case("vtt")));
    Ok(())
}

#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("deeper").join("result.json");

    FileManager::write_to_file(&path, "{}")?;

    assert!(FileManager::file_exists(&path));
    assert_eq!(FileManager::read_to_string(&path)?, "{}");
    Ok(())
}

#[test]
fn test_read_to_string_withMissingFile_shouldFail() {
    assert!(FileManager::read_to_string("/no/such/file.json").is_err());
}
