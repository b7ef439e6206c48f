//! Master data: artists, singers, units, songs (with their vocal patterns) and charts.
//!
//! Every kind of record gets the same pair of views, a list fetched on mount and a create form.
//! [`CatalogPage`] is the list, generic over the record [`Catalog`]; each form implements
//! [`CreateForm`] and refreshes the list it belongs to once the server accepted it.

use std::{collections::BTreeSet, future::Future};

use chrono::{DateTime, Utc};
use log::{info, warn};
use sekai_api::{
    ApiClient, ApiError, FilePart, Transport, UploadKind,
    services::master::{
        CreateArtistRequest, CreateChartRequest, CreateSingerRequest, CreateSongRequest,
        CreateUnitRequest, CreateVocalPatternRequest,
    },
};
use sekai_types::{Artist, Chart, DifficultyType, Id, MusicVideoType, Singer, Song, Unit};

use crate::errors::{FormError, PageError};

use super::{Mount, PageContext, guard::require_admin};

/// A kind of master record that can be listed and looked up.
pub trait Catalog: Clone + Send + Sync + Sized {
    /// Name used in messages, e.g. "artist".
    const NAME: &'static str;

    fn id(&self) -> Id;

    fn fetch_all<T: Transport>(
        api: &ApiClient<T>,
    ) -> impl Future<Output = Result<Vec<Self>, ApiError>> + Send;

    fn fetch_one<T: Transport>(
        api: &ApiClient<T>,
        id: Id,
    ) -> impl Future<Output = Result<Option<Self>, ApiError>> + Send;
}

macro_rules! catalog {
    ($ty:ty, $name:literal, $all:ident, $one:ident) => {
        impl Catalog for $ty {
            const NAME: &'static str = $name;

            fn id(&self) -> Id {
                self.id
            }

            async fn fetch_all<T: Transport>(api: &ApiClient<T>) -> Result<Vec<Self>, ApiError> {
                api.$all().await
            }

            async fn fetch_one<T: Transport>(
                api: &ApiClient<T>,
                id: Id,
            ) -> Result<Option<Self>, ApiError> {
                api.$one(id).await
            }
        }
    };
}

catalog!(Artist, "artist", get_artists, get_artist);
catalog!(Singer, "singer", get_singers, get_singer);
catalog!(Unit, "unit", get_units, get_unit);
catalog!(Song, "song", get_songs, get_song);
catalog!(Chart, "chart", get_charts, get_chart);

/// The list view of one kind of master record.
#[derive(Debug)]
pub struct CatalogPage<T, E> {
    ctx: PageContext<T>,
    mount: Mount,
    items: Vec<E>,
    expanded: Option<Id>,
    message: Option<String>,
}

impl<T: Transport, E: Catalog> CatalogPage<T, E> {
    #[must_use]
    pub fn new(ctx: PageContext<T>) -> Self {
        Self {
            ctx,
            mount: Mount::default(),
            items: Vec::new(),
            expanded: None,
            message: None,
        }
    }

    /// Check that the user may see master data, then fetch the list.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Redirected`] for non-administrators, otherwise any error of the fetch.
    pub async fn mount(&mut self) -> Result<(), PageError> {
        require_admin(&self.ctx).await?;
        self.mount.mount();
        self.load().await
    }

    pub fn unmount(&self) {
        self.mount.unmount();
    }

    /// A handle that can unmount the page while one of its calls is in flight.
    #[must_use]
    pub fn mount_handle(&self) -> Mount {
        self.mount.clone()
    }

    /// Fetch every record and replace the list.
    ///
    /// # Errors
    ///
    /// Returns any error of the call.
    pub async fn load(&mut self) -> Result<(), PageError> {
        let ticket = self.mount.ticket();
        let items = E::fetch_all(&self.ctx.api).await;
        if !self.mount.is_current(ticket) {
            return Ok(());
        }
        match items {
            Ok(items) => {
                self.items = items;
                Ok(())
            }
            Err(e) => {
                warn!("failed to fetch {}s: {e}", E::NAME);
                self.message = Some(format!("Error: {e}"));
                Err(e.into())
            }
        }
    }

    /// Fetch a single record by id, independently of the list.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] when the server has no such record.
    pub async fn show(&self, id: Id) -> Result<E, PageError> {
        E::fetch_one(&self.ctx.api, id)
            .await?
            .ok_or_else(|| PageError::NotFound(format!("{} {id}", E::NAME)))
    }

    /// Toggle the detail view of one row. Expanding another row collapses the current one.
    pub fn toggle_expanded(&mut self, id: Id) {
        self.expanded = if self.expanded == Some(id) {
            None
        } else {
            Some(id)
        };
    }

    #[must_use]
    pub fn expanded(&self) -> Option<&E> {
        let id = self.expanded?;
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn items(&self) -> &[E] {
        &self.items
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub const fn context(&self) -> &PageContext<T> {
        &self.ctx
    }

    /// Submit a create form that belongs to this list.
    ///
    /// Nothing is sent when the form does not validate. On success the form is cleared and the
    /// list refetched, so it shows the new record.
    ///
    /// # Errors
    ///
    /// Returns the validation error or the error of the create call. Either way the message of
    /// the page describes it.
    pub async fn create<F>(&mut self, form: &mut F) -> Result<(), PageError>
    where
        F: CreateForm<Owner = E>,
    {
        let request = match form.to_request() {
            Ok(request) => request,
            Err(e) => {
                self.message = Some(e.to_string());
                return Err(e.into());
            }
        };

        let ticket = self.mount.ticket();
        let result = F::send(&self.ctx.api, &request).await;
        if !self.mount.is_current(ticket) {
            return result.map_err(Into::into);
        }

        match result {
            Ok(()) => {
                info!("{}", F::CREATED);
                self.message = Some(F::CREATED.to_owned());
                *form = F::default();
                self.load().await
            }
            Err(e) => {
                warn!("failed to create a {}: {e}", F::KIND);
                self.message = Some(format!("Error: {e}"));
                Err(e.into())
            }
        }
    }
}

/// A form that creates a master record.
pub trait CreateForm: Default + Send {
    /// The list that shows what this form creates.
    type Owner: Catalog;
    type Request: Send + Sync;

    /// What was created, for the logs.
    const KIND: &'static str;
    /// Shown once the server accepted the record.
    const CREATED: &'static str;

    /// Validate the fields and build the request.
    ///
    /// # Errors
    ///
    /// Returns the first field that is missing or malformed.
    fn to_request(&self) -> Result<Self::Request, FormError>;

    fn send<T: Transport>(
        api: &ApiClient<T>,
        request: &Self::Request,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() {
        Err(FormError::Required(field))
    } else {
        Ok(value.to_owned())
    }
}

const fn selected(id: Id, field: &'static str) -> Result<Id, FormError> {
    if id == 0 {
        Err(FormError::NotSelected(field))
    } else {
        Ok(id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArtistForm {
    pub name: String,
    pub kana: String,
}

impl CreateForm for ArtistForm {
    type Owner = Artist;
    type Request = CreateArtistRequest;

    const KIND: &'static str = "artist";
    const CREATED: &'static str = "アーティストを作成しました！";

    fn to_request(&self) -> Result<Self::Request, FormError> {
        Ok(CreateArtistRequest {
            name: required(&self.name, "名前")?,
            kana: required(&self.kana, "読み")?,
        })
    }

    async fn send<T: Transport>(api: &ApiClient<T>, request: &Self::Request) -> Result<(), ApiError> {
        api.create_artist(request).await
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SingerForm {
    pub name: String,
}

impl CreateForm for SingerForm {
    type Owner = Singer;
    type Request = CreateSingerRequest;

    const KIND: &'static str = "singer";
    const CREATED: &'static str = "シンガーを作成しました！";

    fn to_request(&self) -> Result<Self::Request, FormError> {
        Ok(CreateSingerRequest {
            name: required(&self.name, "名前")?,
        })
    }

    async fn send<T: Transport>(api: &ApiClient<T>, request: &Self::Request) -> Result<(), ApiError> {
        api.create_singer(request).await
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitForm {
    pub name: String,
}

impl CreateForm for UnitForm {
    type Owner = Unit;
    type Request = CreateUnitRequest;

    const KIND: &'static str = "unit";
    const CREATED: &'static str = "ユニットを作成しました！";

    fn to_request(&self) -> Result<Self::Request, FormError> {
        Ok(CreateUnitRequest {
            name: required(&self.name, "名前")?,
        })
    }

    async fn send<T: Transport>(api: &ApiClient<T>, request: &Self::Request) -> Result<(), ApiError> {
        api.create_unit(request).await
    }
}

/// The song form. The thumbnail has to be uploaded before the form can be submitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SongForm {
    pub name: String,
    pub kana: String,
    pub lyrics_id: Id,
    pub music_id: Id,
    pub arrangement_id: Id,
    /// URL of the uploaded thumbnail.
    pub thumbnail: Option<String>,
    pub original_video: String,
    pub release_time: Option<DateTime<Utc>>,
    pub deleted: bool,
    pub unit_ids: Vec<Id>,
    pub music_video_types: BTreeSet<MusicVideoType>,
}

impl SongForm {
    pub fn toggle_music_video_type(&mut self, kind: MusicVideoType) {
        if !self.music_video_types.remove(&kind) {
            self.music_video_types.insert(kind);
        }
    }

    /// Upload the thumbnail and remember its URL.
    ///
    /// # Errors
    ///
    /// Fails without contacting the server when the file is not a PNG or JPEG image.
    pub async fn upload_thumbnail<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
        file: FilePart,
    ) -> Result<&str, PageError> {
        let url = api.upload(UploadKind::Thumbnail, file).await?;
        Ok(self.thumbnail.insert(url).as_str())
    }
}

impl CreateForm for SongForm {
    type Owner = Song;
    type Request = CreateSongRequest;

    const KIND: &'static str = "song";
    const CREATED: &'static str = "Song created successfully!";

    fn to_request(&self) -> Result<Self::Request, FormError> {
        let name = required(&self.name, "曲名")?;
        let kana = required(&self.kana, "読み")?;
        let lyrics_id = selected(self.lyrics_id, "作詞")?;
        let music_id = selected(self.music_id, "作曲")?;
        let arrangement_id = selected(self.arrangement_id, "編曲")?;
        let thumbnail = self
            .thumbnail
            .clone()
            .filter(|url| !url.is_empty())
            .ok_or(FormError::UploadRequired)?;

        Ok(CreateSongRequest {
            name,
            kana,
            lyrics_id,
            music_id,
            arrangement_id,
            thumbnail,
            original_video: self.original_video.trim().to_owned(),
            release_time: self.release_time,
            deleted: self.deleted,
            unit_ids: self.unit_ids.clone(),
            music_video_types: self.music_video_types.iter().copied().collect(),
        })
    }

    async fn send<T: Transport>(api: &ApiClient<T>, request: &Self::Request) -> Result<(), ApiError> {
        api.create_song(request).await
    }
}

/// Who sings a song, and in which part.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VocalPatternForm {
    pub song_id: Id,
    pub name: String,
    pub singer_ids: Vec<Id>,
    /// Comma-separated, one position per selected singer, e.g. `"1, 2"`.
    pub singer_positions: String,
}

impl VocalPatternForm {
    /// Parse [`Self::singer_positions`].
    ///
    /// # Errors
    ///
    /// Returns an error if an entry is not a number.
    pub fn parse_positions(&self) -> Result<Vec<i32>, FormError> {
        self.singer_positions
            .split(',')
            .map(str::trim)
            .filter(|position| !position.is_empty())
            .map(|position| {
                position.parse().map_err(|_| FormError::InvalidNumber {
                    field: "ポジション",
                    value: position.to_owned(),
                })
            })
            .collect()
    }
}

impl CreateForm for VocalPatternForm {
    type Owner = Song;
    type Request = CreateVocalPatternRequest;

    const KIND: &'static str = "vocal pattern";
    const CREATED: &'static str = "VocalPattern created successfully!";

    fn to_request(&self) -> Result<Self::Request, FormError> {
        let song_id = selected(self.song_id, "楽曲")?;
        let name = required(&self.name, "名前")?;
        if self.singer_ids.is_empty() {
            return Err(FormError::NotSelected("シンガー"));
        }
        let singer_positions = self.parse_positions()?;
        if singer_positions.len() != self.singer_ids.len() {
            return Err(FormError::PositionCountMismatch {
                singers: self.singer_ids.len(),
                positions: singer_positions.len(),
            });
        }

        Ok(CreateVocalPatternRequest {
            song_id,
            name,
            singer_ids: self.singer_ids.clone(),
            singer_positions,
        })
    }

    async fn send<T: Transport>(api: &ApiClient<T>, request: &Self::Request) -> Result<(), ApiError> {
        api.create_vocal_pattern(request).await
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChartForm {
    pub song_id: Id,
    pub difficulty_type: DifficultyType,
    pub level: i32,
    pub chart_view_link: String,
}

impl CreateForm for ChartForm {
    type Owner = Chart;
    type Request = CreateChartRequest;

    const KIND: &'static str = "chart";
    const CREATED: &'static str = "Chart created successfully!";

    fn to_request(&self) -> Result<Self::Request, FormError> {
        let song_id = selected(self.song_id, "楽曲")?;
        if self.difficulty_type == DifficultyType::Unspecified {
            return Err(FormError::NotSelected("難易度"));
        }

        Ok(CreateChartRequest {
            song_id,
            difficulty_type: self.difficulty_type,
            level: self.level,
            chart_view_link: self.chart_view_link.trim().to_owned(),
        })
    }

    async fn send<T: Transport>(api: &ApiClient<T>, request: &Self::Request) -> Result<(), ApiError> {
        api.create_chart(request).await
    }
}
