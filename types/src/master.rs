//! Master data: the song catalog maintained by administrators.
#![allow(clippy::module_name_repetitions)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DifficultyType, Id, MusicVideoType};

/// A lyricist, composer or arranger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Artist {
    pub id: Id,
    pub name: String,
    /// Reading of the name in hiragana/katakana, used for sorting.
    pub kana: String,
}

/// A character who sings in songs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Singer {
    pub id: Id,
    pub name: String,
    /// Order of the singer inside a [`VocalPattern`]; zero when the singer is listed on its own.
    pub position: i32,
}

/// A group of singers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Unit {
    pub id: Id,
    pub name: String,
}

/// One vocal arrangement of a [`Song`], e.g. "セカイver." or "バーチャル・シンガーver.".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VocalPattern {
    pub id: Id,
    pub name: String,
    /// Ordered by [`Singer::position`].
    pub singers: Vec<Singer>,
    pub units: Vec<Unit>,
}

/// A song in the catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Song {
    pub id: Id,
    pub name: String,
    pub kana: String,
    pub lyrics: Option<Artist>,
    pub music: Option<Artist>,
    pub arrangement: Option<Artist>,
    /// URL of the uploaded thumbnail image.
    pub thumbnail: String,
    /// Link to the original video.
    pub original_video: String,
    pub release_time: Option<DateTime<Utc>>,
    pub deleted: bool,
    pub vocal_patterns: Vec<VocalPattern>,
    pub units: Vec<Unit>,
    pub music_video_types: Vec<MusicVideoType>,
}

impl Song {
    /// Name of the lyricist, or an empty string if the server did not embed one.
    #[must_use]
    pub fn lyrics_name(&self) -> &str {
        self.lyrics.as_ref().map_or("", |a| a.name.as_str())
    }

    #[must_use]
    pub fn music_name(&self) -> &str {
        self.music.as_ref().map_or("", |a| a.name.as_str())
    }

    #[must_use]
    pub fn arrangement_name(&self) -> &str {
        self.arrangement.as_ref().map_or("", |a| a.name.as_str())
    }
}

/// A playable chart: one difficulty of one [`Song`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Chart {
    pub id: Id,
    pub song: Option<Song>,
    pub difficulty_type: DifficultyType,
    pub level: i32,
    /// Link to a video or viewer for the chart.
    pub chart_view_link: String,
}

impl Chart {
    /// Name of the song this chart belongs to.
    #[must_use]
    pub fn song_name(&self) -> &str {
        self.song.as_ref().map_or("", |s| s.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_song_from_wire() {
        let json = r#"{
            "id": 3,
            "name": "ロウワー",
            "kana": "ろうわー",
            "lyrics": {"id": 1, "name": "ぬゆり", "kana": "ぬゆり"},
            "thumbnail": "http://localhost:8080/image?id=abc",
            "releaseTime": "2021-03-12T00:00:00Z",
            "vocalPatterns": [
                {"id": 9, "name": "セカイver.", "singers": [{"id": 2, "name": "宵崎奏"}]}
            ],
            "musicVideoTypes": [1, "MUSIC_VIDEO_TYPE_ORIGINAL"]
        }"#;

        let song: Song = serde_json::from_str(json).unwrap();

        assert_eq!(song.id, 3);
        assert_eq!(song.lyrics_name(), "ぬゆり");
        assert_eq!(song.music_name(), "");
        assert!(!song.deleted);
        assert_eq!(song.original_video, "");
        assert_eq!(
            song.release_time.map(|t| t.to_rfc3339()),
            Some("2021-03-12T00:00:00+00:00".to_string())
        );
        assert_eq!(song.vocal_patterns[0].singers[0].name, "宵崎奏");
        assert_eq!(song.vocal_patterns[0].singers[0].position, 0);
        assert_eq!(
            song.music_video_types,
            vec![MusicVideoType::ThreeD, MusicVideoType::Original]
        );
    }

    #[test]
    fn test_chart_defaults_when_fields_are_omitted() {
        let chart: Chart = serde_json::from_str(r#"{"id": 12, "level": 30}"#).unwrap();
        assert_eq!(chart.difficulty_type, DifficultyType::Unspecified);
        assert_eq!(chart.song_name(), "");
        assert_eq!(chart.level, 30);
    }
}
