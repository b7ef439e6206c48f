//! `master.MasterService`: the song catalog.
//!
//! Reads are public. Creation requires an administrator session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sekai_types::{Artist, Chart, DifficultyType, Id, MusicVideoType, Singer, Song, Unit};

use crate::{
    client::{Access, ApiClient, Empty},
    errors::ApiError,
    transport::{Procedure, Transport},
};

pub const SERVICE: &str = "master.MasterService";

const fn procedure(method: &'static str) -> Procedure {
    Procedure::new(SERVICE, method)
}

#[derive(Clone, Copy, Debug, Serialize)]
struct ById {
    id: Id,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateArtistRequest {
    pub name: String,
    pub kana: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateSingerRequest {
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateUnitRequest {
    pub name: String,
}

/// `singer_ids[i]` sings at `singer_positions[i]`; both lists must have the same length.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateVocalPatternRequest {
    pub song_id: Id,
    pub name: String,
    pub singer_ids: Vec<Id>,
    pub singer_positions: Vec<i32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateSongRequest {
    pub name: String,
    pub kana: String,
    pub lyrics_id: Id,
    pub music_id: Id,
    pub arrangement_id: Id,
    /// URL returned by the thumbnail upload.
    pub thumbnail: String,
    pub original_video: String,
    pub release_time: Option<DateTime<Utc>>,
    pub deleted: bool,
    pub unit_ids: Vec<Id>,
    pub music_video_types: Vec<MusicVideoType>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateChartRequest {
    pub song_id: Id,
    pub difficulty_type: DifficultyType,
    pub level: i32,
    pub chart_view_link: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Artists {
    artists: Vec<Artist>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct OneArtist {
    artist: Option<Artist>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Singers {
    singers: Vec<Singer>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct OneSinger {
    singer: Option<Singer>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Units {
    units: Vec<Unit>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct OneUnit {
    unit: Option<Unit>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Songs {
    songs: Vec<Song>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct OneSong {
    song: Option<Song>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Charts {
    charts: Vec<Chart>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct OneChart {
    chart: Option<Chart>,
}

impl<T: Transport> ApiClient<T> {
    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn get_artists(&self) -> Result<Vec<Artist>, ApiError> {
        let Artists { artists } = self
            .call(procedure("GetArtists"), Access::Public, &Empty {})
            .await?;
        Ok(artists)
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn get_artist(&self, id: Id) -> Result<Option<Artist>, ApiError> {
        let OneArtist { artist } = self
            .call(procedure("GetArtist"), Access::Public, &ById { id })
            .await?;
        Ok(artist)
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn create_artist(&self, request: &CreateArtistRequest) -> Result<(), ApiError> {
        let Empty {} = self
            .call(procedure("CreateArtist"), Access::Authenticated, request)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn get_singers(&self) -> Result<Vec<Singer>, ApiError> {
        let Singers { singers } = self
            .call(procedure("GetSingers"), Access::Public, &Empty {})
            .await?;
        Ok(singers)
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn get_singer(&self, id: Id) -> Result<Option<Singer>, ApiError> {
        let OneSinger { singer } = self
            .call(procedure("GetSinger"), Access::Public, &ById { id })
            .await?;
        Ok(singer)
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn create_singer(&self, request: &CreateSingerRequest) -> Result<(), ApiError> {
        let Empty {} = self
            .call(procedure("CreateSinger"), Access::Authenticated, request)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn get_units(&self) -> Result<Vec<Unit>, ApiError> {
        let Units { units } = self
            .call(procedure("GetUnits"), Access::Public, &Empty {})
            .await?;
        Ok(units)
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn get_unit(&self, id: Id) -> Result<Option<Unit>, ApiError> {
        let OneUnit { unit } = self
            .call(procedure("GetUnit"), Access::Public, &ById { id })
            .await?;
        Ok(unit)
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn create_unit(&self, request: &CreateUnitRequest) -> Result<(), ApiError> {
        let Empty {} = self
            .call(procedure("CreateUnit"), Access::Authenticated, request)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn create_vocal_pattern(
        &self,
        request: &CreateVocalPatternRequest,
    ) -> Result<(), ApiError> {
        let Empty {} = self
            .call(procedure("CreateVocalPattern"), Access::Authenticated, request)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn get_songs(&self) -> Result<Vec<Song>, ApiError> {
        let Songs { songs } = self
            .call(procedure("GetSongs"), Access::Public, &Empty {})
            .await?;
        Ok(songs)
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn get_song(&self, id: Id) -> Result<Option<Song>, ApiError> {
        let OneSong { song } = self
            .call(procedure("GetSong"), Access::Public, &ById { id })
            .await?;
        Ok(song)
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn create_song(&self, request: &CreateSongRequest) -> Result<(), ApiError> {
        let Empty {} = self
            .call(procedure("CreateSong"), Access::Authenticated, request)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn get_charts(&self) -> Result<Vec<Chart>, ApiError> {
        let Charts { charts } = self
            .call(procedure("GetCharts"), Access::Public, &Empty {})
            .await?;
        Ok(charts)
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn get_chart(&self, id: Id) -> Result<Option<Chart>, ApiError> {
        let OneChart { chart } = self
            .call(procedure("GetChart"), Access::Public, &ById { id })
            .await?;
        Ok(chart)
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn create_chart(&self, request: &CreateChartRequest) -> Result<(), ApiError> {
        let Empty {} = self
            .call(procedure("CreateChart"), Access::Authenticated, request)
            .await?;
        Ok(())
    }
}
