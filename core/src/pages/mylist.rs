//! The user's lists: create, rename, delete, and reorder by drag and drop.

use log::{info, warn};
use sekai_api::{
    Transport,
    services::mylist::{ChangeMyListNameRequest, ChangeMyListPositionRequest, CreateMyListRequest},
};
use sekai_types::{Id, MyList};

use crate::{errors::PageError, route::Route};

use super::{Mount, PageContext};

/// Row being renamed, and the new name typed so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditBuffer {
    pub id: Id,
    pub name: String,
}

#[derive(Debug)]
pub struct MyListPage<T> {
    ctx: PageContext<T>,
    mount: Mount,
    lists: Vec<MyList>,
    /// Name of the list to create.
    pub new_name: String,
    edit: Option<EditBuffer>,
    message: Option<String>,
}

impl<T: Transport> MyListPage<T> {
    #[must_use]
    pub fn new(ctx: PageContext<T>) -> Self {
        Self {
            ctx,
            mount: Mount::default(),
            lists: Vec::new(),
            new_name: String::new(),
            edit: None,
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

    #[must_use]
    pub fn mount_handle(&self) -> Mount {
        self.mount.clone()
    }

    /// Fetch the lists, ordered by position.
    ///
    /// # Errors
    ///
    /// Returns any error of the call.
    pub async fn load(&mut self) -> Result<(), PageError> {
        let ticket = self.mount.ticket();
        let result = self.ctx.api.get_my_lists().await;
        if !self.mount.is_current(ticket) {
            return Ok(());
        }
        let mut lists = result.inspect_err(|e| {
            warn!("failed to fetch the lists: {e}");
            self.message = Some(format!("マイリストの取得に失敗しました: {e}"));
        })?;
        lists.sort_by_key(|list| list.position);
        self.lists = lists;
        Ok(())
    }

    /// Create a list named [`Self::new_name`] at the end. Does nothing if the name is blank.
    ///
    /// # Errors
    ///
    /// Returns any error of the create call or of the refetch.
    pub async fn create(&mut self) -> Result<(), PageError> {
        let name = self.new_name.trim().to_owned();
        if name.is_empty() {
            return Ok(());
        }

        let request = CreateMyListRequest {
            name,
            position: i32::try_from(self.lists.len()).unwrap_or(i32::MAX - 1) + 1,
        };
        if let Err(e) = self.ctx.api.create_my_list(&request).await {
            warn!("failed to create list {:?}: {e}", request.name);
            self.message = Some(format!("マイリストの作成に失敗しました: {e}"));
            return Err(e.into());
        }
        info!("created list {:?}", request.name);
        self.new_name.clear();
        self.load().await
    }

    /// Drop the row at index `from` onto index `to`.
    ///
    /// The new order is shown immediately and sent as a whole, each list getting its rank
    /// (starting at 1) as position. If the server refuses it, the previous order comes back.
    ///
    /// # Errors
    ///
    /// Returns the error of the call, after the order was rolled back.
    pub async fn drop_at(&mut self, from: usize, to: usize) -> Result<(), PageError> {
        if from == to || from >= self.lists.len() || to >= self.lists.len() {
            return Ok(());
        }

        let previous = self.lists.clone();
        let moved = self.lists.remove(from);
        self.lists.insert(to, moved);
        for (list, position) in self.lists.iter_mut().zip(1..) {
            list.position = position;
        }

        let request = ChangeMyListPositionRequest::from_order(&self.lists);
        let ticket = self.mount.ticket();
        let result = self.ctx.api.change_my_list_position(&request).await;
        if !self.mount.is_current(ticket) {
            return result.map_err(Into::into);
        }
        if let Err(e) = result {
            warn!("failed to reorder the lists, rolling back: {e}");
            self.lists = previous;
            self.message = Some(format!("並び替えに失敗しました: {e}"));
            return Err(e.into());
        }
        Ok(())
    }

    /// Put the row `id` in edit mode, starting from its current name.
    pub fn start_edit(&mut self, id: Id) {
        let name = self
            .lists
            .iter()
            .find(|list| list.id == id)
            .map(|list| list.name.clone())
            .unwrap_or_default();
        self.edit = Some(EditBuffer { id, name });
    }

    /// The name being typed into the row in edit mode.
    pub fn edit_name(&mut self) -> Option<&mut String> {
        self.edit.as_mut().map(|edit| &mut edit.name)
    }

    #[must_use]
    pub const fn editing(&self) -> Option<&EditBuffer> {
        self.edit.as_ref()
    }

    /// Leave edit mode without saving.
    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Rename the row in edit mode, then refetch. A blank name keeps the row in edit mode.
    ///
    /// # Errors
    ///
    /// Returns any error of the rename call or of the refetch.
    pub async fn save_edit(&mut self) -> Result<(), PageError> {
        let Some(edit) = &self.edit else {
            return Ok(());
        };
        let name = edit.name.trim().to_owned();
        if name.is_empty() {
            return Ok(());
        }

        let request = ChangeMyListNameRequest { id: edit.id, name };
        if let Err(e) = self.ctx.api.change_my_list_name(&request).await {
            warn!("failed to rename list {}: {e}", request.id);
            self.message = Some(format!("名前の変更に失敗しました: {e}"));
            return Err(e.into());
        }
        self.edit = None;
        self.load().await
    }

    /// Delete a list and drop it from the view, without refetching.
    ///
    /// # Errors
    ///
    /// Returns any error of the call; the list stays in the view then.
    pub async fn delete(&mut self, id: Id) -> Result<(), PageError> {
        if let Err(e) = self.ctx.api.delete_my_list(id).await {
            warn!("failed to delete list {id}: {e}");
            self.message = Some(format!("マイリストの削除に失敗しました: {e}"));
            return Err(e.into());
        }
        info!("deleted list {id}");
        self.lists.retain(|list| list.id != id);
        if self.edit.as_ref().is_some_and(|edit| edit.id == id) {
            self.edit = None;
        }
        Ok(())
    }

    /// Go to the detail view of a list.
    pub fn open(&self, id: Id) {
        self.ctx.navigate(Route::MyListDetail { my_list_id: id });
    }

    #[must_use]
    pub fn lists(&self) -> &[MyList] {
        &self.lists
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
    use serde_json::{Value, json};

    /// Lists A, B and C, deliberately out of order on the wire.
    fn abc() -> Value {
        json!({"myLists": [
            {"id": 30, "name": "C", "position": 3},
            {"id": 10, "name": "A", "position": 1},
            {"id": 20, "name": "B", "position": 2},
        ]})
    }

    fn names<T: Transport>(page: &MyListPage<T>) -> Vec<&str> {
        page.lists().iter().map(|list| list.name.as_str()).collect()
    }

    async fn mounted(transport: MockTransport) -> MyListPage<MockTransport> {
        let mut page = MyListPage::new(context(transport, Some("t")));
        page.mount().await.unwrap();
        page
    }

    #[tokio::test]
    async fn test_sorted_by_position() {
        let page = mounted(MockTransport::new().reply("GetMyListsByUserID", abc())).await;
        assert_eq!(names(&page), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_reorder_sends_full_order() {
        let mut page = mounted(MockTransport::new().reply("GetMyListsByUserID", abc())).await;

        page.drop_at(0, 2).await.unwrap();

        assert_eq!(names(&page), vec!["B", "C", "A"]);
        assert_eq!(
            page.lists().iter().map(|l| l.position).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(
            page.ctx.api.transport().bodies("ChangeMyListPosition"),
            vec![json!({"id": [20, 30, 10], "position": [1, 2, 3]})]
        );
    }

    #[tokio::test]
    async fn test_failed_reorder_rolls_back() {
        let transport = MockTransport::new()
            .reply("GetMyListsByUserID", abc())
            .fail("ChangeMyListPosition", ApiError::status(Code::Internal, "db"));
        let mut page = mounted(transport).await;

        let result = page.drop_at(0, 2).await;

        assert!(result.is_err());
        assert_eq!(names(&page), vec!["A", "B", "C"]);
        assert_eq!(
            page.lists().iter().map(|l| l.position).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(page.message(), Some("並び替えに失敗しました: [internal] db"));
    }

    #[tokio::test]
    async fn test_drop_in_place_is_a_no_op() {
        let mut page = mounted(MockTransport::new().reply("GetMyListsByUserID", abc())).await;

        page.drop_at(1, 1).await.unwrap();
        page.drop_at(0, 7).await.unwrap();

        assert!(page.ctx.api.transport().bodies("ChangeMyListPosition").is_empty());
    }

    #[tokio::test]
    async fn test_create_appends_and_refetches() {
        let transport = MockTransport::new()
            .reply("GetMyListsByUserID", abc())
            .reply("GetMyListsByUserID", json!({"myLists": [
                {"id": 10, "name": "A", "position": 1},
                {"id": 20, "name": "B", "position": 2},
                {"id": 30, "name": "C", "position": 3},
                {"id": 40, "name": "D", "position": 4},
            ]}));
        let mut page = mounted(transport).await;

        page.new_name = "   ".into();
        page.create().await.unwrap();
        assert!(page.ctx.api.transport().bodies("CreateMyList").is_empty());

        page.new_name = "D".into();
        page.create().await.unwrap();

        assert_eq!(
            page.ctx.api.transport().bodies("CreateMyList"),
            vec![json!({"name": "D", "position": 4})]
        );
        assert!(page.new_name.is_empty());
        assert_eq!(names(&page), vec!["A", "B", "C", "D"]);
    }

    #[tokio::test]
    async fn test_rename() {
        let transport = MockTransport::new()
            .reply("GetMyListsByUserID", abc())
            .reply("GetMyListsByUserID", json!({"myLists": [
                {"id": 10, "name": "AA", "position": 1},
            ]}));
        let mut page = mounted(transport).await;

        page.start_edit(10);
        assert_eq!(page.editing().map(|e| e.name.as_str()), Some("A"));
        if let Some(name) = page.edit_name() {
            *name = "AA".into();
        }
        page.save_edit().await.unwrap();

        assert_eq!(page.editing(), None);
        assert_eq!(names(&page), vec!["AA"]);
        assert_eq!(
            page.ctx.api.transport().bodies("ChangeMyListName"),
            vec![json!({"id": 10, "name": "AA"})]
        );
    }

    #[tokio::test]
    async fn test_cancel_edit_sends_nothing() {
        let mut page = mounted(MockTransport::new().reply("GetMyListsByUserID", abc())).await;

        page.start_edit(20);
        if let Some(name) = page.edit_name() {
            name.push_str(" (renamed)");
        }
        page.cancel_edit();
        page.save_edit().await.unwrap();

        assert_eq!(names(&page), vec!["A", "B", "C"]);
        assert_eq!(
            page.ctx.api.transport().methods(),
            vec!["GetMyListsByUserID"]
        );
    }

    #[tokio::test]
    async fn test_delete_removes_locally() {
        let mut page = mounted(MockTransport::new().reply("GetMyListsByUserID", abc())).await;

        page.delete(20).await.unwrap();

        assert_eq!(names(&page), vec!["A", "C"]);
        assert_eq!(
            page.ctx.api.transport().methods(),
            vec!["GetMyListsByUserID", "DeleteMyList"]
        );
    }

    #[tokio::test]
    async fn test_open_navigates_to_detail() {
        let page = mounted(MockTransport::new().reply("GetMyListsByUserID", abc())).await;

        page.open(20);

        assert_eq!(
            page.ctx.navigator.current(),
            Route::MyListDetail { my_list_id: 20 }
        );
    }
}
