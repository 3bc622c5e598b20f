/*!
 * Tests for WebVTT caption parsing
 */

use anyhow::Result;

use vidscribe::errors::SubtitleError;
use vidscribe::subtitle_processor::{CaptionTrack, VttParser};
use crate::common;

/// Rolling auto-captions repeat lines; only the first occurrence survives
#[test]
fn test_parse_str_withRepeatedBlocks_shouldKeepFirstOccurrence() -> Result<()> {
    let fragments = VttParser::parse_str(common::ROLLING_CAPTIONS_VTT);

    let texts: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
    assert_eq!(texts, vec!["welcome back to the channel", "today we talk about rust"]);
    assert_eq!(fragments[0].timing, "00:00:00.000 --> 00:00:02.000 align:start position:0%");
    Ok(())
}

#[test]
fn test_parse_str_withNonAdjacentRepeat_shouldDropLaterOccurrence() -> Result<()> {
    let content = "WEBVTT

00:00:00.000 --> 00:00:01.000
first

00:00:01.000 --> 00:00:02.000
second

00:00:02.000 --> 00:00:03.000
first
";
    let fragments = VttParser::parse_str(content);
    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[1].text, "second");
    Ok(())
}

#[test]
fn test_parse_str_withTimingOnlyBlock_shouldProduceNoFragments() -> Result<()> {
    let fragments = VttParser::parse_str(common::TIMING_ONLY_VTT);
    assert!(fragments.is_empty());
    Ok(())
}

#[test]
fn test_parse_str_withSettingsOnlyText_shouldDropBlock() -> Result<()> {
    let content = "WEBVTT

00:00:00.000 --> 00:00:02.000
align:start position:0%

00:00:02.000 --> 00:00:04.000
actual words
";
    let fragments = VttParser::parse_str(content);
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].text, "actual words");
    Ok(())
}

#[test]
fn test_parse_str_withoutWebvttMagic_shouldStillSkipFirstBlockOnly() {
    let content = "Kind: captions
Language: en

00:00:00.000 --> 00:00:02.000
hello there

00:00:02.000 --> 00:00:04.000
general kenobi
";
    let fragments = VttParser::parse_str(content);

    let texts: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
    assert_eq!(texts, vec!["hello there", "general kenobi"]);
}

#[test]
fn test_parse_str_withSingleBlock_shouldTreatItAsHeader() {
    assert!(VttParser::parse_str("00:00:00.000 --> 00:00:02.000\nhello").is_empty());
    assert!(VttParser::parse_str("not a caption file").is_empty());
    assert!(VttParser::parse_str("").is_empty());
}

#[test]
fn test_parse_str_withGarbageBlocks_shouldSkipThemSilently() {
    let content = "WEBVTT

lonely line

00:00:00.000 --> 00:00:02.000
kept words
";
    let fragments = VttParser::parse_str(content);
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].text, "kept words");
}

#[test]
fn test_parse_str_withCueIdentifierAndCrlf_shouldUseTimingLine() -> Result<()> {
    let content = "\u{feff}WEBVTT\r\n\r\nintro\r\n00:00:01.000 --> 00:00:02.000\r\nhello there\r\n";
    let fragments = VttParser::parse_str(content);
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].timing, "00:00:01.000 --> 00:00:02.000");
    assert_eq!(fragments[0].text, "hello there");
    Ok(())
}

#[test]
fn test_parse_str_withInlineTags_shouldKeepWordsOnly() -> Result<()> {
    let content = "WEBVTT

00:00:00.000 --> 00:00:02.000
so<00:00:00.500><c> this</c><00:00:01.000><c> works</c>
";
    let fragments = VttParser::parse_str(content);
    assert_eq!(fragments[0].text, "so this works");
    Ok(())
}

#[test]
fn test_parse_str_withNoteBlock_shouldSkipIt() -> Result<()> {
    let content = "WEBVTT

NOTE
written by hand

00:00:00.000 --> 00:00:02.000
spoken line
";
    let fragments = VttParser::parse_str(content);
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].text, "spoken line");
    Ok(())
}

#[test]
fn test_parse_str_withMultilineCue_shouldJoinWithSpace() -> Result<()> {
    let content = "WEBVTT

00:00:00.000 --> 00:00:02.000
first half
second half
";
    let fragments = VttParser::parse_str(content);
    assert_eq!(fragments[0].text, "first half second half");
    Ok(())
}

#[test]
fn test_from_file_withCacheFileName_shouldExposeVideoId() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "abc123def45.en.vtt", common::ROLLING_CAPTIONS_VTT)?;

    let track = CaptionTrack::from_file(&path)?;
    assert_eq!(track.video_id().as_deref(), Some("abc123def45"));
    assert_eq!(track.fragments.len(), 2);
    Ok(())
}

#[test]
fn test_from_file_withMissingFile_shouldBeIoError() {
    let result = CaptionTrack::from_file("/definitely/not/here.vtt");
    assert!(matches!(result, Err(SubtitleError::Io(_))));
}
