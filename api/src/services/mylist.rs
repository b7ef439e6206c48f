//! `mylist.v1.MyListService`: the signed in user's lists, their chart entries and attachments.
//!
//! Every call is authenticated; the server resolves the owner from the session token.

use serde::{Deserialize, Serialize};

use sekai_types::{AttachmentType, ClearType, Id, MyList, MyListChart, MyListChartAttachment};

use crate::{
    client::{Access, ApiClient, Empty},
    errors::ApiError,
    transport::{Procedure, Transport},
};

pub const SERVICE: &str = "mylist.v1.MyListService";

const fn procedure(method: &'static str) -> Procedure {
    Procedure::new(SERVICE, method)
}

#[derive(Clone, Copy, Debug, Serialize)]
struct ById {
    id: Id,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateMyListRequest {
    pub name: String,
    pub position: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeMyListNameRequest {
    pub id: Id,
    pub name: String,
}

/// A full replacement of the user's list order: `id[i]` moves to `position[i]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeMyListPositionRequest {
    pub id: Vec<Id>,
    pub position: Vec<i32>,
}

impl ChangeMyListPositionRequest {
    /// Rank `lists` in the order given, starting at position 1.
    #[must_use]
    pub fn from_order(lists: &[MyList]) -> Self {
        Self {
            id: lists.iter().map(|list| list.id).collect(),
            position: (1..).take(lists.len()).collect(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddMyListChartRequest {
    pub my_list_id: Id,
    pub chart_id: Id,
    pub clear_type: ClearType,
    pub memo: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeMyListChartClearTypeRequest {
    pub id: Id,
    pub clear_type: ClearType,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeMyListChartMemoRequest {
    pub id: Id,
    pub memo: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddMyListChartAttachmentRequest {
    pub my_list_chart_id: Id,
    pub attachment_type: AttachmentType,
    /// URL returned by the attachment upload.
    pub file_url: String,
    pub caption: String,
}

/// A list together with its chart entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MyListWithCharts {
    pub my_list: Option<MyList>,
    pub my_list_charts: Vec<MyListChart>,
}

/// A chart entry together with its attachments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MyListChartWithAttachments {
    pub my_list_chart: Option<MyListChart>,
    pub my_list_chart_attachments: Vec<MyListChartAttachment>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct MyLists {
    my_lists: Vec<MyList>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct OneMyListChart {
    my_list_chart: Option<MyListChart>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ByMyListId {
    my_list_id: Id,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ByMyListChartId {
    my_list_chart_id: Id,
}

impl<T: Transport> ApiClient<T> {
    /// The lists of the signed in user, in the order the server returns them.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn get_my_lists(&self) -> Result<Vec<MyList>, ApiError> {
        let MyLists { my_lists } = self
            .call(procedure("GetMyListsByUserID"), Access::Authenticated, &Empty {})
            .await?;
        Ok(my_lists)
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn create_my_list(&self, request: &CreateMyListRequest) -> Result<(), ApiError> {
        let Empty {} = self
            .call(procedure("CreateMyList"), Access::Authenticated, request)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn change_my_list_name(
        &self,
        request: &ChangeMyListNameRequest,
    ) -> Result<(), ApiError> {
        let Empty {} = self
            .call(procedure("ChangeMyListName"), Access::Authenticated, request)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn change_my_list_position(
        &self,
        request: &ChangeMyListPositionRequest,
    ) -> Result<(), ApiError> {
        let Empty {} = self
            .call(procedure("ChangeMyListPosition"), Access::Authenticated, request)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn delete_my_list(&self, id: Id) -> Result<(), ApiError> {
        let Empty {} = self
            .call(procedure("DeleteMyList"), Access::Authenticated, &ById { id })
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn get_my_list_charts(&self, my_list_id: Id) -> Result<MyListWithCharts, ApiError> {
        self.call(
            procedure("GetMyListChartsByMyListID"),
            Access::Authenticated,
            &ByMyListId { my_list_id },
        )
        .await
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn get_my_list_chart(&self, id: Id) -> Result<Option<MyListChart>, ApiError> {
        let OneMyListChart { my_list_chart } = self
            .call(procedure("GetMyListChartByID"), Access::Authenticated, &ById { id })
            .await?;
        Ok(my_list_chart)
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn add_my_list_chart(&self, request: &AddMyListChartRequest) -> Result<(), ApiError> {
        let Empty {} = self
            .call(procedure("AddMyListChart"), Access::Authenticated, request)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn change_my_list_chart_clear_type(
        &self,
        request: &ChangeMyListChartClearTypeRequest,
    ) -> Result<(), ApiError> {
        let Empty {} = self
            .call(
                procedure("ChangeMyListChartClearType"),
                Access::Authenticated,
                request,
            )
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn change_my_list_chart_memo(
        &self,
        request: &ChangeMyListChartMemoRequest,
    ) -> Result<(), ApiError> {
        let Empty {} = self
            .call(procedure("ChangeMyListChartMemo"), Access::Authenticated, request)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn delete_my_list_chart(&self, id: Id) -> Result<(), ApiError> {
        let Empty {} = self
            .call(procedure("DeleteMyListChart"), Access::Authenticated, &ById { id })
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn get_my_list_chart_attachments(
        &self,
        my_list_chart_id: Id,
    ) -> Result<MyListChartWithAttachments, ApiError> {
        self.call(
            procedure("GetMyListChartAttachmentsByMyListChartID"),
            Access::Authenticated,
            &ByMyListChartId { my_list_chart_id },
        )
        .await
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn add_my_list_chart_attachment(
        &self,
        request: &AddMyListChartAttachmentRequest,
    ) -> Result<(), ApiError> {
        let Empty {} = self
            .call(
                procedure("AddMyListChartAttachment"),
                Access::Authenticated,
                request,
            )
            .await?;
        Ok(())
    }

    /// Removes the attachment record only; the stored file is removed separately with
    /// [`ApiClient::delete_attachment_file`].
    ///
    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn delete_my_list_chart_attachment(&self, id: Id) -> Result<(), ApiError> {
        let Empty {} = self
            .call(
                procedure("DeleteMyListChartAttachment"),
                Access::Authenticated,
                &ById { id },
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{client::test_transport::ScriptedTransport, session::MemoryTokenStore};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn list(id: Id, position: i32) -> MyList {
        MyList {
            id,
            position,
            ..Default::default()
        }
    }

    #[test]
    fn test_position_request_from_order() {
        let request = ChangeMyListPositionRequest::from_order(&[list(7, 2), list(3, 3), list(5, 1)]);
        assert_eq!(request.id, vec![7, 3, 5]);
        assert_eq!(request.position, vec![1, 2, 3]);

        let request = ChangeMyListPositionRequest::from_order(&[]);
        assert!(request.id.is_empty());
        assert!(request.position.is_empty());
    }

    #[tokio::test]
    async fn test_get_my_list_charts() {
        let client = ApiClient::new(
            ScriptedTransport::replying([Ok(json!({
                "myList": {"id": 1, "name": "Master 30+", "position": 1},
                "myListCharts": [
                    {"id": 10, "myListId": 1, "chart": {"id": 5}, "clearType": 2},
                    {"id": 11, "myListId": 1, "chart": {"id": 3}}
                ]
            }))]),
            Arc::new(MemoryTokenStore::with_token("t")),
        );

        let detail = client.get_my_list_charts(1).await.unwrap();

        assert_eq!(detail.my_list.unwrap().name, "Master 30+");
        assert_eq!(detail.my_list_charts.len(), 2);
        assert_eq!(detail.my_list_charts[0].clear_type, ClearType::Cleared);
        let calls = client.transport().calls.lock().unwrap();
        assert_eq!(calls[0].procedure.method, "GetMyListChartsByMyListID");
        assert_eq!(calls[0].body, json!({"myListId": 1}));
    }

    #[tokio::test]
    async fn test_attachment_wire_format() {
        let client = ApiClient::new(ScriptedTransport::default(), Arc::new(MemoryTokenStore::new()));
        let request = AddMyListChartAttachmentRequest {
            my_list_chart_id: 4,
            attachment_type: AttachmentType::Movie,
            file_url: "http://localhost:8080/image?id=v.mp4".into(),
            caption: "初AP".into(),
        };

        client.add_my_list_chart_attachment(&request).await.unwrap();
        client.get_my_list_chart_attachments(4).await.unwrap();

        let calls = client.transport().calls.lock().unwrap();
        assert_eq!(
            calls[0].body,
            json!({
                "myListChartId": 4,
                "attachmentType": 2,
                "fileUrl": "http://localhost:8080/image?id=v.mp4",
                "caption": "初AP",
            })
        );
        assert_eq!(calls[1].body, json!({"myListChartId": 4}));
    }
}
