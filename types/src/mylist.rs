//! Per-user lists of charts.
#![allow(clippy::module_name_repetitions)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AttachmentType, Chart, ClearType, Id};

/// A named, user-owned list of charts.
///
/// A user's lists are ranked by [`MyList::position`], which is dense and starts at 1.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MyList {
    pub id: Id,
    pub user_id: String,
    pub name: String,
    pub position: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A chart entry in a [`MyList`], with the user's progress on it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MyListChart {
    pub id: Id,
    pub my_list_id: Id,
    pub chart: Option<Chart>,
    pub clear_type: ClearType,
    pub memo: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MyListChart {
    /// Id of the embedded chart, `0` when missing.
    #[must_use]
    pub fn chart_id(&self) -> Id {
        self.chart.as_ref().map_or(0, |c| c.id)
    }
}

/// A picture or movie attached to a [`MyListChart`], e.g. a result screenshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MyListChartAttachment {
    pub id: Id,
    pub my_list_chart_id: Id,
    pub attachment_type: AttachmentType,
    pub file_url: String,
    pub caption: String,
    pub created_at: Option<DateTime<Utc>>,
}
