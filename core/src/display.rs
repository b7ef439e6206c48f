//! Human readable labels for the API enumerations.
//!
//! Every label function takes the raw wire code so that values the client does not know about
//! still render, as the fallback label.

use sekai_types::{AttachmentType, ClearType, DifficultyType, MusicVideoType};
use strum::IntoEnumIterator;

#[must_use]
pub const fn difficulty_type_display_name(code: i32) -> &'static str {
    match DifficultyType::from_code(code) {
        Some(DifficultyType::Easy) => "Easy",
        Some(DifficultyType::Normal) => "Normal",
        Some(DifficultyType::Hard) => "Hard",
        Some(DifficultyType::Expert) => "Expert",
        Some(DifficultyType::Master) => "Master",
        Some(DifficultyType::Append) => "Append",
        Some(DifficultyType::Unspecified) | None => "Unspecified",
    }
}

#[must_use]
pub const fn music_video_type_display_name(code: i32) -> &'static str {
    match MusicVideoType::from_code(code) {
        Some(MusicVideoType::ThreeD) => "3DMV",
        Some(MusicVideoType::TwoD) => "2DMV",
        Some(MusicVideoType::Original) => "原曲MV",
        Some(MusicVideoType::Unspecified) | None => "未指定",
    }
}

#[must_use]
pub const fn clear_type_display_name(code: i32) -> &'static str {
    match ClearType::from_code(code) {
        Some(ClearType::NotCleared) => "未クリア",
        Some(ClearType::Cleared) => "クリア",
        Some(ClearType::FullCombo) => "フルコンボ",
        Some(ClearType::AllPerfect) => "オールパーフェクト",
        Some(ClearType::Unspecified) | None => "未設定",
    }
}

#[must_use]
pub const fn attachment_type_display_name(code: i32) -> &'static str {
    match AttachmentType::from_code(code) {
        Some(AttachmentType::Picture) => "画像",
        Some(AttachmentType::Movie) => "動画",
        Some(AttachmentType::Unspecified) | None => "未指定",
    }
}

/// How an attachment is presented: an image, a video player, or a plain link for anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentView {
    Image,
    Video,
    Link,
}

impl AttachmentView {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Link => "link",
        }
    }
}

/// Picks the presentation of an attachment from its type code alone.
#[must_use]
pub const fn attachment_view(code: i32) -> AttachmentView {
    match AttachmentType::from_code(code) {
        Some(AttachmentType::Picture) => AttachmentView::Image,
        Some(AttachmentType::Movie) => AttachmentView::Video,
        Some(AttachmentType::Unspecified) | None => AttachmentView::Link,
    }
}

/// Variant and label pairs, in wire order, for building select boxes.
pub trait Labeled: IntoEnumIterator + Copy {
    fn label(self) -> &'static str;

    fn options() -> Vec<(Self, &'static str)> {
        Self::iter().map(|value| (value, value.label())).collect()
    }
}

impl Labeled for DifficultyType {
    fn label(self) -> &'static str {
        difficulty_type_display_name(self.code())
    }
}

impl Labeled for MusicVideoType {
    fn label(self) -> &'static str {
        music_video_type_display_name(self.code())
    }
}

impl Labeled for ClearType {
    fn label(self) -> &'static str {
        clear_type_display_name(self.code())
    }
}

impl Labeled for AttachmentType {
    fn label(self) -> &'static str {
        attachment_type_display_name(self.code())
    }
}
