//! Adding charts to a list: the whole chart catalog, each with an "add" form.

use log::{info, warn};
use sekai_api::{Transport, services::mylist::AddMyListChartRequest};
use sekai_types::{Chart, ClearType, Id};

use crate::{errors::PageError, route::Route};

use super::{Mount, PageContext};

/// The sub-form opened under one chart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddChartForm {
    pub chart_id: Id,
    pub clear_type: Option<ClearType>,
    pub memo: String,
}

#[derive(Debug)]
pub struct MyListEditPage<T> {
    ctx: PageContext<T>,
    mount: Mount,
    my_list_id: Id,
    charts: Vec<Chart>,
    adding: Option<AddChartForm>,
    message: Option<String>,
}

impl<T: Transport> MyListEditPage<T> {
    #[must_use]
    pub fn new(ctx: PageContext<T>, my_list_id: Id) -> Self {
        Self {
            ctx,
            mount: Mount::default(),
            my_list_id,
            charts: Vec::new(),
            adding: None,
            message: None,
        }
    }

    /// Fetch the chart catalog.
    ///
    /// # Errors
    ///
    /// Returns any error of the call.
    pub async fn mount(&mut self) -> Result<(), PageError> {
        self.mount.mount();
        let ticket = self.mount.ticket();
        let result = self.ctx.api.get_charts().await;
        if !self.mount.is_current(ticket) {
            return Ok(());
        }
        self.charts = result.inspect_err(|e| {
            warn!("failed to fetch the charts: {e}");
            self.message = Some(format!("譜面の取得に失敗しました: {e}"));
        })?;
        Ok(())
    }

    pub fn unmount(&self) {
        self.mount.unmount();
    }

    /// Open the add form under `chart_id`, replacing any open one.
    pub fn open_add(&mut self, chart_id: Id) {
        self.adding = Some(AddChartForm {
            chart_id,
            ..AddChartForm::default()
        });
    }

    pub fn add_form(&mut self) -> Option<&mut AddChartForm> {
        self.adding.as_mut()
    }

    pub fn cancel_add(&mut self) {
        self.adding = None;
    }

    /// Add the chart of the open form to the list, then go back to the list.
    ///
    /// # Errors
    ///
    /// Returns any error of the call; the form stays open then.
    pub async fn confirm_add(&mut self) -> Result<(), PageError> {
        let Some(form) = &self.adding else {
            return Ok(());
        };

        let request = AddMyListChartRequest {
            my_list_id: self.my_list_id,
            chart_id: form.chart_id,
            clear_type: form.clear_type.unwrap_or_default(),
            memo: form.memo.clone(),
        };
        if let Err(e) = self.ctx.api.add_my_list_chart(&request).await {
            warn!("failed to add chart {} to list {}: {e}", request.chart_id, self.my_list_id);
            self.message = Some(format!("追加に失敗しました: {e}"));
            return Err(e.into());
        }
        info!("added chart {} to list {}", request.chart_id, self.my_list_id);
        self.adding = None;
        self.done();
        Ok(())
    }

    /// Leave the edit view.
    pub fn done(&self) {
        self.ctx.navigate(Route::MyListDetail {
            my_list_id: self.my_list_id,
        });
    }

    #[must_use]
    pub fn charts(&self) -> &[Chart] {
        &self.charts
    }

    #[must_use]
    pub const fn adding(&self) -> Option<&AddChartForm> {
        self.adding.as_ref()
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockTransport, context};
    use pretty_assertions::assert_eq;
    use sekai_api::{ApiError, Code};
    use serde_json::json;

    fn catalog() -> MockTransport {
        MockTransport::new().reply(
            "GetCharts",
            json!({"charts": [{"id": 1, "level": 26}, {"id": 2, "difficultyType": 6, "level": 31}]}),
        )
    }

    #[tokio::test]
    async fn test_add_chart_then_back_to_list() {
        let mut page = MyListEditPage::new(context(catalog(), Some("t")), 4);
        page.mount().await.unwrap();
        assert_eq!(page.charts().len(), 2);

        page.open_add(2);
        if let Some(form) = page.add_form() {
            form.clear_type = Some(ClearType::FullCombo);
            form.memo = "あと1GREAT".into();
        }
        page.confirm_add().await.unwrap();

        assert_eq!(
            page.ctx.api.transport().bodies("AddMyListChart"),
            vec![json!({"myListId": 4, "chartId": 2, "clearType": 3, "memo": "あと1GREAT"})]
        );
        assert_eq!(page.adding(), None);
        assert_eq!(page.ctx.navigator.current(), Route::MyListDetail { my_list_id: 4 });
    }

    #[tokio::test]
    async fn test_add_without_clear_type_sends_unspecified() {
        let mut page = MyListEditPage::new(context(catalog(), Some("t")), 4);
        page.mount().await.unwrap();

        page.open_add(1);
        page.confirm_add().await.unwrap();

        assert_eq!(
            page.ctx.api.transport().bodies("AddMyListChart"),
            vec![json!({"myListId": 4, "chartId": 1, "clearType": 0, "memo": ""})]
        );
    }

    #[tokio::test]
    async fn test_cancel_closes_the_form() {
        let mut page = MyListEditPage::new(context(catalog(), Some("t")), 4);
        page.mount().await.unwrap();

        page.open_add(1);
        page.cancel_add();
        page.confirm_add().await.unwrap();

        assert!(page.ctx.api.transport().bodies("AddMyListChart").is_empty());
        assert_eq!(page.ctx.navigator.current(), Route::Top);
    }

    #[tokio::test]
    async fn test_failed_add_keeps_the_form_open() {
        let transport = catalog().fail(
            "AddMyListChart",
            ApiError::status(Code::AlreadyExists, "chart already in list"),
        );
        let mut page = MyListEditPage::new(context(transport, Some("t")), 4);
        page.mount().await.unwrap();

        page.open_add(1);
        assert!(page.confirm_add().await.is_err());

        assert_eq!(page.adding().map(|form| form.chart_id), Some(1));
        assert_eq!(page.ctx.navigator.current(), Route::Top);
    }
}
