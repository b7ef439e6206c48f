//! The closed enumerations of the API.
//!
//! On the wire an enum is an integer code, although the JSON mapping also allows the protobuf
//! value name (e.g. `"CLEAR_TYPE_CLEARED"`). Both are accepted when decoding. A code or name the
//! client does not know decodes to the `Unspecified` variant instead of failing the whole message.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $code:literal => $wire:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumIter,
        )]
        #[repr(i32)]
        pub enum $name {
            #[default]
            $(
                $(#[$vmeta])*
                $variant = $code,
            )+
        }

        impl $name {
            /// The integer code sent on the wire.
            #[must_use]
            #[inline]
            pub const fn code(self) -> i32 {
                self as i32
            }

            /// Look up a variant by its integer code.
            #[must_use]
            pub const fn from_code(code: i32) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// The protobuf value name of this variant.
            #[must_use]
            pub const fn as_str_name(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Look up a variant by its protobuf value name.
            #[must_use]
            pub fn from_str_name(name: &str) -> Option<Self> {
                match name {
                    $($wire => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl From<i32> for $name {
            #[inline]
            fn from(code: i32) -> Self {
                Self::from_code(code).unwrap_or_default()
            }
        }

        impl From<$name> for i32 {
            #[inline]
            fn from(value: $name) -> Self {
                value.code()
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_i32(self.code())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(LenientVisitor::new(
                    stringify!($name),
                    Self::from_code,
                    Self::from_str_name,
                ))
            }
        }
    };
}

wire_enum! {
    /// How difficult a [`crate::Chart`] is.
    pub enum DifficultyType {
        Unspecified = 0 => "DIFFICULTY_TYPE_UNSPECIFIED",
        Easy = 1 => "DIFFICULTY_TYPE_EASY",
        Normal = 2 => "DIFFICULTY_TYPE_NORMAL",
        Hard = 3 => "DIFFICULTY_TYPE_HARD",
        Expert = 4 => "DIFFICULTY_TYPE_EXPERT",
        Master = 5 => "DIFFICULTY_TYPE_MASTER",
        Append = 6 => "DIFFICULTY_TYPE_APPEND",
    }
}

wire_enum! {
    /// Kinds of music video a [`crate::Song`] ships with.
    pub enum MusicVideoType {
        Unspecified = 0 => "MUSIC_VIDEO_TYPE_UNSPECIFIED",
        ThreeD = 1 => "MUSIC_VIDEO_TYPE_3D",
        TwoD = 2 => "MUSIC_VIDEO_TYPE_2D",
        Original = 3 => "MUSIC_VIDEO_TYPE_ORIGINAL",
    }
}

wire_enum! {
    /// Completion status of a chart entry in a mylist.
    pub enum ClearType {
        Unspecified = 0 => "CLEAR_TYPE_UNSPECIFIED",
        NotCleared = 1 => "CLEAR_TYPE_NOT_CLEARED",
        Cleared = 2 => "CLEAR_TYPE_CLEARED",
        FullCombo = 3 => "CLEAR_TYPE_FULL_COMBO",
        AllPerfect = 4 => "CLEAR_TYPE_ALL_PERFECT",
    }
}

wire_enum! {
    /// Media kind of a [`crate::MyListChartAttachment`].
    pub enum AttachmentType {
        Unspecified = 0 => "ATTACHMENT_TYPE_UNSPECIFIED",
        Picture = 1 => "ATTACHMENT_TYPE_PICTURE",
        Movie = 2 => "ATTACHMENT_TYPE_MOVIE",
    }
}

struct LenientVisitor<T> {
    name: &'static str,
    by_code: fn(i32) -> Option<T>,
    by_name: fn(&str) -> Option<T>,
}

impl<T> LenientVisitor<T> {
    const fn new(
        name: &'static str,
        by_code: fn(i32) -> Option<T>,
        by_name: fn(&str) -> Option<T>,
    ) -> Self {
        Self {
            name,
            by_code,
            by_name,
        }
    }
}

impl<T: Default> de::Visitor<'_> for LenientVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a {} code or value name", self.name)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
        Ok(i32::try_from(v)
            .ok()
            .and_then(self.by_code)
            .unwrap_or_default())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
        Ok(i32::try_from(v)
            .ok()
            .and_then(self.by_code)
            .unwrap_or_default())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
        Ok((self.by_name)(v).unwrap_or_default())
    }

    fn visit_unit<E: de::Error>(self) -> Result<T, E> {
        Ok(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case::int("2", ClearType::Cleared)]
    #[case::name("\"CLEAR_TYPE_ALL_PERFECT\"", ClearType::AllPerfect)]
    #[case::unknown_int("42", ClearType::Unspecified)]
    #[case::negative("-1", ClearType::Unspecified)]
    #[case::unknown_name("\"CLEAR_TYPE_S_RANK\"", ClearType::Unspecified)]
    #[case::null("null", ClearType::Unspecified)]
    fn test_clear_type_decodes_leniently(#[case] json: &str, #[case] expected: ClearType) {
        let decoded: ClearType = serde_json::from_str(json).unwrap();
        assert_eq!(decoded, expected);
    }

    #[rstest]
    #[case("\"MUSIC_VIDEO_TYPE_3D\"", MusicVideoType::ThreeD)]
    #[case("3", MusicVideoType::Original)]
    #[case("\"DIFFICULTY_TYPE_APPEND\"", MusicVideoType::Unspecified)]
    fn test_music_video_type_decodes(#[case] json: &str, #[case] expected: MusicVideoType) {
        let decoded: MusicVideoType = serde_json::from_str(json).unwrap();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_enums_encode_as_codes() {
        assert_eq!(
            serde_json::to_string(&DifficultyType::Master).unwrap(),
            "5"
        );
        assert_eq!(serde_json::to_string(&AttachmentType::Movie).unwrap(), "2");
    }

    #[test]
    fn test_codes_are_dense_and_unique() {
        for (i, variant) in DifficultyType::iter().enumerate() {
            assert_eq!(variant.code(), i32::try_from(i).unwrap());
            assert_eq!(DifficultyType::from_str_name(variant.as_str_name()), Some(variant));
        }
        assert_eq!(ClearType::iter().count(), 5);
        assert_eq!(AttachmentType::iter().count(), 3);
    }

    #[rstest]
    #[case(7)]
    #[case(i32::MAX)]
    #[case(-3)]
    fn test_unknown_code_falls_back(#[case] code: i32) {
        assert_eq!(DifficultyType::from(code), DifficultyType::Unspecified);
        assert_eq!(MusicVideoType::from(code), MusicVideoType::Unspecified);
        assert_eq!(AttachmentType::from(code), AttachmentType::Unspecified);
    }
}
