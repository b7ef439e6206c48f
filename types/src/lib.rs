//! Types shared by every sekai-mylist crate.
//!
//! These mirror the JSON encoding of the API's protobuf messages: field names are camelCase and
//! fields holding their zero value are omitted by the server, so every field defaults.

pub mod enums;
pub mod master;
pub mod mylist;
pub mod user;

pub use enums::{AttachmentType, ClearType, DifficultyType, MusicVideoType};
pub use master::{Artist, Chart, Singer, Song, Unit, VocalPattern};
pub use mylist::{MyList, MyListChart, MyListChartAttachment};
pub use user::User;

/// Identifier type used by every master-data and mylist record.
pub type Id = i32;
