pub mod complete;
pub mod implementations;
pub mod printing;
pub mod utils;


use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Subcommand, ValueEnum};
use clap_complete::engine::ArgValueCandidates;
use sekai_api::{Transport, UploadKind};
use sekai_core::pages::PageContext;
use sekai_types::{AttachmentType, ClearType, DifficultyType, Id, MusicVideoType};

use complete::{CompletableTable, complete_things};
use utils::StdIn;

pub trait CommandHandler {
    type Output;

    async fn handle<T: Transport, W1: std::fmt::Write + Send, W2: std::fmt::Write + Send>(
        &self,
        ctx: &PageContext<T>,
        stdout: &mut W1,
        stderr: &mut W2,
        stdin: &impl StdIn,
    ) -> Self::Output;
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Resolve a client path (e.g. `/mylist/4/edit`) to the view it shows
    Route {
        /// The path to resolve
        path: String,
    },
    /// Register an account
    Signup {
        /// The email address of the account
        email: String,
        /// The password (read from stdin when omitted)
        #[clap(long)]
        password: Option<String>,
        /// The password again (read from stdin when omitted)
        #[clap(long)]
        check_password: Option<String>,
    },
    /// Log in and keep the session token
    Login {
        /// The email address of the account
        email: String,
        /// The password (read from stdin when omitted)
        #[clap(long)]
        password: Option<String>,
    },
    /// End the session
    Logout,
    /// Account management
    User {
        #[clap(subcommand)]
        command: UserCommand,
    },
    /// Artists (admin only)
    Artist {
        #[clap(subcommand)]
        command: ArtistCommand,
    },
    /// Singers (admin only)
    Singer {
        #[clap(subcommand)]
        command: NamedCommand,
    },
    /// Units (admin only)
    Unit {
        #[clap(subcommand)]
        command: NamedCommand,
    },
    /// Songs (admin only)
    Song {
        #[clap(subcommand)]
        command: SongCommand,
    },
    /// Vocal patterns of a song (admin only)
    VocalPattern {
        #[clap(subcommand)]
        command: VocalPatternCommand,
    },
    /// Charts (admin only)
    Chart {
        #[clap(subcommand)]
        command: ChartCommand,
    },
    /// Your lists of charts
    #[clap(alias = "list")]
    Mylist {
        #[clap(subcommand)]
        command: MyListCommand,
    },
    /// One chart entry of a list
    Entry {
        #[clap(subcommand)]
        command: EntryCommand,
    },
    /// Uploaded files
    File {
        #[clap(subcommand)]
        command: FileCommand,
    },
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum UserCommand {
    /// Show the signed in account
    Info,
    /// Change the email address
    ChangeEmail {
        /// The new address
        email: String,
    },
    /// Change the password; the session ends afterwards
    ChangePassword {
        /// The current password (read from stdin when omitted)
        #[clap(long)]
        old: Option<String>,
        /// The new password (read from stdin when omitted)
        #[clap(long)]
        new: Option<String>,
        /// The new password again (read from stdin when omitted)
        #[clap(long)]
        check: Option<String>,
    },
    /// Delete the account
    Delete {
        /// Confirm the deletion
        #[clap(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum ArtistCommand {
    /// List artists
    List,
    /// Show an artist
    Show {
        /// The id of the artist
        id: Id,
    },
    /// Create an artist
    Create {
        /// The name of the artist
        name: String,
        /// The reading of the name, in kana
        kana: String,
    },
}

/// Commands of the master records that only have a name.
#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum NamedCommand {
    /// List records
    List,
    /// Show a record
    Show {
        /// The id of the record
        id: Id,
    },
    /// Create a record
    Create {
        /// The name of the record
        name: String,
    },
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum SongCommand {
    /// List songs
    List,
    /// Show a song, with its vocal patterns
    Show {
        /// The id of the song
        id: Id,
    },
    /// Create a song, uploading its thumbnail first
    Create {
        /// The title of the song
        name: String,
        /// The reading of the title, in kana
        kana: String,
        /// The id of the lyricist
        #[clap(long)]
        lyrics: Id,
        /// The id of the composer
        #[clap(long)]
        music: Id,
        /// The id of the arranger
        #[clap(long)]
        arrangement: Id,
        /// The thumbnail image (png or jpeg)
        #[clap(long, value_hint = clap::ValueHint::FilePath)]
        thumbnail: PathBuf,
        /// Link to the original video
        #[clap(long, default_value = "")]
        original_video: String,
        /// When the song was added to the game (RFC 3339)
        #[clap(long)]
        release_time: Option<DateTime<Utc>>,
        /// Mark the song as removed from the game
        #[clap(long)]
        deleted: bool,
        /// The ids of the units performing the song
        #[clap(long = "unit")]
        units: Vec<Id>,
        /// The kinds of music video the song has
        #[clap(long = "mv")]
        music_video_types: Vec<MusicVideoArg>,
    },
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum VocalPatternCommand {
    /// Add a vocal pattern to a song
    Create {
        /// The id of the song
        song_id: Id,
        /// The name of the pattern
        name: String,
        /// The ids of the singers, in order
        #[clap(long = "singer", required = true)]
        singers: Vec<Id>,
        /// The position of each singer, comma separated (e.g. "1,2,3")
        #[clap(long)]
        positions: String,
    },
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum ChartCommand {
    /// List charts
    List,
    /// Show a chart
    Show {
        /// The id of the chart
        id: Id,
    },
    /// Create a chart
    Create {
        /// The id of the song
        song_id: Id,
        /// The difficulty of the chart
        difficulty: DifficultyArg,
        /// The level of the chart
        level: i32,
        /// Link to a view of the chart
        #[clap(long, default_value = "")]
        link: String,
    },
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum MyListCommand {
    /// List your lists, in order
    List,
    /// Create a list at the end
    Create {
        /// The name of the list
        name: String,
    },
    /// Rename a list
    Rename {
        /// The id of the list
        #[clap(add = ArgValueCandidates::new(complete_things(CompletableTable::MyList)))]
        id: Id,
        /// The new name
        name: String,
    },
    /// Delete a list
    Delete {
        /// The id of the list
        #[clap(add = ArgValueCandidates::new(complete_things(CompletableTable::MyList)))]
        id: Id,
    },
    /// Move the list at one position to another (positions start at 1)
    Move {
        /// The current position of the list
        from: usize,
        /// The position to move it to
        to: usize,
    },
    /// Show the charts in a list
    Show {
        /// The id of the list
        #[clap(add = ArgValueCandidates::new(complete_things(CompletableTable::MyList)))]
        id: Id,
    },
    /// List the charts that can be added to a list
    Charts {
        /// The id of the list
        #[clap(add = ArgValueCandidates::new(complete_things(CompletableTable::MyList)))]
        id: Id,
    },
    /// Add a chart to a list
    Add {
        /// The id of the list
        #[clap(add = ArgValueCandidates::new(complete_things(CompletableTable::MyList)))]
        id: Id,
        /// The id of the chart
        #[clap(add = ArgValueCandidates::new(complete_things(CompletableTable::Chart)))]
        chart_id: Id,
        /// How far you got with the chart
        #[clap(long)]
        clear_type: Option<ClearTypeArg>,
        /// A note about the chart
        #[clap(long, default_value = "")]
        memo: String,
    },
    /// Remove a chart entry from a list
    Remove {
        /// The id of the list
        #[clap(add = ArgValueCandidates::new(complete_things(CompletableTable::MyList)))]
        id: Id,
        /// The id of the entry
        entry_id: Id,
    },
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum EntryCommand {
    /// Show an entry and its attachments
    Show {
        /// The id of the list
        list_id: Id,
        /// The id of the entry
        entry_id: Id,
    },
    /// Set the clear status of an entry
    ClearType {
        /// The id of the list
        list_id: Id,
        /// The id of the entry
        entry_id: Id,
        /// The new clear status
        clear_type: ClearTypeArg,
    },
    /// Set the memo of an entry
    Memo {
        /// The id of the list
        list_id: Id,
        /// The id of the entry
        entry_id: Id,
        /// The new memo
        memo: String,
    },
    /// Save the clear status and memo together
    Save {
        /// The id of the list
        list_id: Id,
        /// The id of the entry
        entry_id: Id,
        /// The new clear status, the current one if omitted
        #[clap(long)]
        clear_type: Option<ClearTypeArg>,
        /// The new memo, the current one if omitted
        #[clap(long)]
        memo: Option<String>,
    },
    /// Upload a picture or movie and attach it to an entry
    Attach {
        /// The id of the list
        list_id: Id,
        /// The id of the entry
        entry_id: Id,
        /// The file to attach (png, jpeg, mp4, webm or mov)
        #[clap(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,
        /// What the file shows
        caption: String,
        /// The kind of attachment, guessed from the file if omitted
        #[clap(long = "type")]
        attachment_type: Option<AttachmentArg>,
    },
    /// Remove an attachment from an entry, along with its file
    Detach {
        /// The id of the list
        list_id: Id,
        /// The id of the entry
        entry_id: Id,
        /// The id of the attachment
        attachment_id: Id,
    },
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum FileCommand {
    /// Upload a file and print the URL it is served from
    Upload {
        /// What the file is for
        kind: UploadTarget,
        /// The file to upload
        #[clap(value_hint = clap::ValueHint::FilePath)]
        path: PathBuf,
    },
    /// Delete an uploaded file
    Delete {
        /// The URL of the file
        url: String,
    },
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, ValueEnum)]
pub enum UploadTarget {
    Thumbnail,
    Attachment,
}

impl From<UploadTarget> for UploadKind {
    fn from(target: UploadTarget) -> Self {
        match target {
            UploadTarget::Thumbnail => Self::Thumbnail,
            UploadTarget::Attachment => Self::Attachment,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, ValueEnum)]
pub enum ClearTypeArg {
    NotCleared,
    Cleared,
    FullCombo,
    AllPerfect,
}

impl From<ClearTypeArg> for ClearType {
    fn from(arg: ClearTypeArg) -> Self {
        match arg {
            ClearTypeArg::NotCleared => Self::NotCleared,
            ClearTypeArg::Cleared => Self::Cleared,
            ClearTypeArg::FullCombo => Self::FullCombo,
            ClearTypeArg::AllPerfect => Self::AllPerfect,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, ValueEnum)]
pub enum DifficultyArg {
    Easy,
    Normal,
    Hard,
    Expert,
    Master,
    Append,
}

impl From<DifficultyArg> for DifficultyType {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Self::Easy,
            DifficultyArg::Normal => Self::Normal,
            DifficultyArg::Hard => Self::Hard,
            DifficultyArg::Expert => Self::Expert,
            DifficultyArg::Master => Self::Master,
            DifficultyArg::Append => Self::Append,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, ValueEnum)]
pub enum MusicVideoArg {
    #[value(name = "3d")]
    ThreeD,
    #[value(name = "2d")]
    TwoD,
    Original,
}

impl From<MusicVideoArg> for MusicVideoType {
    fn from(arg: MusicVideoArg) -> Self {
        match arg {
            MusicVideoArg::ThreeD => Self::ThreeD,
            MusicVideoArg::TwoD => Self::TwoD,
            MusicVideoArg::Original => Self::Original,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, ValueEnum)]
pub enum AttachmentArg {
    Picture,
    Movie,
}

impl From<AttachmentArg> for AttachmentType {
    fn from(arg: AttachmentArg) -> Self {
        match arg {
            AttachmentArg::Picture => Self::Picture,
            AttachmentArg::Movie => Self::Movie,
        }
    }
}
