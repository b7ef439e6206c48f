//! One list and the charts in it.

use log::{info, warn};
use sekai_api::Transport;
use sekai_types::{Id, MyList, MyListChart};

use crate::{errors::PageError, route::Route};

use super::{Mount, PageContext};

#[derive(Debug)]
pub struct MyListDetailPage<T> {
    ctx: PageContext<T>,
    mount: Mount,
    my_list_id: Id,
    my_list: Option<MyList>,
    entries: Vec<MyListChart>,
    message: Option<String>,
}

impl<T: Transport> MyListDetailPage<T> {
    #[must_use]
    pub fn new(ctx: PageContext<T>, my_list_id: Id) -> Self {
        Self {
            ctx,
            mount: Mount::default(),
            my_list_id,
            my_list: None,
            entries: Vec::new(),
            message: None,
        }
    }

    /// # Errors
    ///
    /// Returns any error of the fetch.
    pub async fn mount(&mut self) -> Result<(), PageError> {
        self.mount.mount();
        self.load().await
    }

    pub fn unmount(&self) {
        self.mount.unmount();
    }

    /// Fetch the list and its entries, ordered by chart.
    ///
    /// # Errors
    ///
    /// Returns any error of the call.
    pub async fn load(&mut self) -> Result<(), PageError> {
        let ticket = self.mount.ticket();
        let result = self.ctx.api.get_my_list_charts(self.my_list_id).await;
        if !self.mount.is_current(ticket) {
            return Ok(());
        }
        let mut found = result.inspect_err(|e| {
            warn!("failed to fetch list {}: {e}", self.my_list_id);
            self.message = Some(format!("マイリストの取得に失敗しました: {e}"));
        })?;
        found.my_list_charts.sort_by_key(MyListChart::chart_id);
        self.my_list = found.my_list;
        self.entries = found.my_list_charts;
        Ok(())
    }

    /// Remove an entry from the list, then from the view.
    ///
    /// # Errors
    ///
    /// Returns any error of the call; the entry stays in the view then.
    pub async fn delete_entry(&mut self, my_list_chart_id: Id) -> Result<(), PageError> {
        if let Err(e) = self.ctx.api.delete_my_list_chart(my_list_chart_id).await {
            warn!("failed to delete entry {my_list_chart_id}: {e}");
            self.message = Some(format!("削除に失敗しました: {e}"));
            return Err(e.into());
        }
        info!("removed entry {my_list_chart_id} from list {}", self.my_list_id);
        self.entries.retain(|entry| entry.id != my_list_chart_id);
        Ok(())
    }

    /// Go to the detail view of an entry.
    pub fn open_entry(&self, my_list_chart_id: Id) {
        self.ctx.navigate(Route::MyListChartDetail {
            my_list_id: self.my_list_id,
            my_list_chart_id,
        });
    }

    /// Go to the view that adds charts to this list.
    pub fn edit(&self) {
        self.ctx.navigate(Route::MyListEdit {
            my_list_id: self.my_list_id,
        });
    }

    #[must_use]
    pub const fn my_list_id(&self) -> Id {
        self.my_list_id
    }

    #[must_use]
    pub const fn my_list(&self) -> Option<&MyList> {
        self.my_list.as_ref()
    }

    #[must_use]
    pub fn entries(&self) -> &[MyListChart] {
        &self.entries
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

    fn list_with_entries() -> MockTransport {
        MockTransport::new().reply(
            "GetMyListChartsByMyListID",
            json!({
                "myList": {"id": 4, "name": "APPEND", "position": 1},
                "myListCharts": [
                    {"id": 101, "myListId": 4, "chart": {"id": 9, "level": 30}, "clearType": 2},
                    {"id": 102, "myListId": 4, "chart": {"id": 3, "level": 28}},
                    {"id": 103, "myListId": 4, "chart": {"id": 5, "level": 31}, "memo": "AP狙い"},
                ]
            }),
        )
    }

    fn entry_ids<T: Transport>(page: &MyListDetailPage<T>) -> Vec<Id> {
        page.entries().iter().map(|entry| entry.id).collect()
    }

    #[tokio::test]
    async fn test_entries_sorted_by_chart() {
        let mut page = MyListDetailPage::new(context(list_with_entries(), Some("t")), 4);
        page.mount().await.unwrap();

        assert_eq!(page.my_list().map(|list| list.name.as_str()), Some("APPEND"));
        assert_eq!(entry_ids(&page), vec![102, 103, 101]);
        assert_eq!(
            page.ctx.api.transport().bodies("GetMyListChartsByMyListID"),
            vec![json!({"myListId": 4})]
        );
    }

    #[tokio::test]
    async fn test_delete_entry_removes_exactly_one() {
        let mut page = MyListDetailPage::new(context(list_with_entries(), Some("t")), 4);
        page.mount().await.unwrap();

        page.delete_entry(103).await.unwrap();

        assert_eq!(entry_ids(&page), vec![102, 101]);
        assert_eq!(
            page.ctx.api.transport().bodies("DeleteMyListChart"),
            vec![json!({"id": 103})]
        );
        assert_eq!(page.ctx.api.transport().calls().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_entry() {
        let transport = list_with_entries()
            .fail("DeleteMyListChart", ApiError::status(Code::NotFound, "no such entry"));
        let mut page = MyListDetailPage::new(context(transport, Some("t")), 4);
        page.mount().await.unwrap();

        assert!(page.delete_entry(101).await.is_err());

        assert_eq!(entry_ids(&page), vec![102, 103, 101]);
        assert_eq!(page.message(), Some("削除に失敗しました: [not_found] no such entry"));
    }

    #[tokio::test]
    async fn test_navigation() {
        let page = MyListDetailPage::new(context(MockTransport::new(), Some("t")), 4);

        page.open_entry(101);
        assert_eq!(
            page.ctx.navigator.current(),
            Route::MyListChartDetail {
                my_list_id: 4,
                my_list_chart_id: 101
            }
        );

        page.edit();
        assert_eq!(page.ctx.navigator.current(), Route::MyListEdit { my_list_id: 4 });
    }
}
