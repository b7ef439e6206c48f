//! One entry of a list: its clear status, memo and media attachments.

use futures::future::join;
use log::{debug, info, warn};
use sekai_api::{
    ApiError, FilePart, Transport, UploadKind,
    services::mylist::{
        AddMyListChartAttachmentRequest, ChangeMyListChartClearTypeRequest,
        ChangeMyListChartMemoRequest,
    },
};
use sekai_types::{AttachmentType, ClearType, Id, MyListChart, MyListChartAttachment};

use crate::{errors::PageError, route::Route};

use super::{Mount, PageContext};

/// The new-attachment form. Only submitted once a file was uploaded and a caption given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttachmentForm {
    pub attachment_type: AttachmentType,
    /// URL returned by the upload.
    pub file_url: String,
    pub caption: String,
}

impl AttachmentForm {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.file_url.trim().is_empty() && !self.caption.trim().is_empty()
    }
}

#[derive(Debug)]
pub struct ChartDetailPage<T> {
    ctx: PageContext<T>,
    mount: Mount,
    my_list_id: Id,
    my_list_chart_id: Id,
    entry: Option<MyListChart>,
    attachments: Vec<MyListChartAttachment>,
    /// Selected clear status, saved with [`Self::save_clear_type`].
    pub clear_type: ClearType,
    /// Memo being edited, saved with [`Self::save_memo`].
    pub memo: String,
    pub attachment: AttachmentForm,
    message: Option<String>,
}

impl<T: Transport> ChartDetailPage<T> {
    #[must_use]
    pub fn new(ctx: PageContext<T>, my_list_id: Id, my_list_chart_id: Id) -> Self {
        Self {
            ctx,
            mount: Mount::default(),
            my_list_id,
            my_list_chart_id,
            entry: None,
            attachments: Vec::new(),
            clear_type: ClearType::Unspecified,
            memo: String::new(),
            attachment: AttachmentForm::default(),
            message: None,
        }
    }

    /// Fetch the entry and its attachments.
    ///
    /// # Errors
    ///
    /// Returns the first error of the two calls, after applying whatever did arrive.
    pub async fn mount(&mut self) -> Result<(), PageError> {
        self.mount.mount();
        let ticket = self.mount.ticket();
        let api = &self.ctx.api;
        let (entry, attachments) = join(
            api.get_my_list_chart(self.my_list_chart_id),
            api.get_my_list_chart_attachments(self.my_list_chart_id),
        )
        .await;
        if !self.mount.is_current(ticket) {
            return Ok(());
        }

        let entry = entry.map(|entry| {
            self.clear_type = entry.as_ref().map(|e| e.clear_type).unwrap_or_default();
            self.memo = entry.as_ref().map(|e| e.memo.clone()).unwrap_or_default();
            self.entry = entry;
        });
        let attachments = attachments.map(|found| {
            self.attachments = found.my_list_chart_attachments;
        });
        entry.and(attachments).map_err(|e| self.failed("読み込み", e))
    }

    pub fn unmount(&self) {
        self.mount.unmount();
    }

    fn failed(&mut self, action: &str, e: ApiError) -> PageError {
        warn!("entry {}: {action} failed: {e}", self.my_list_chart_id);
        self.message = Some(format!("{action}に失敗しました: {e}"));
        e.into()
    }

    async fn fetch_entry(&mut self) -> Result<Option<&MyListChart>, PageError> {
        let ticket = self.mount.ticket();
        let result = self.ctx.api.get_my_list_chart(self.my_list_chart_id).await;
        if !self.mount.is_current(ticket) {
            return Ok(None);
        }
        self.entry = result.map_err(|e| self.failed("読み込み", e))?;
        Ok(self.entry.as_ref())
    }

    async fn fetch_attachments(&mut self) -> Result<(), PageError> {
        let ticket = self.mount.ticket();
        let result = self
            .ctx
            .api
            .get_my_list_chart_attachments(self.my_list_chart_id)
            .await;
        if !self.mount.is_current(ticket) {
            return Ok(());
        }
        self.attachments = result
            .map_err(|e| self.failed("添付ファイルの読み込み", e))?
            .my_list_chart_attachments;
        Ok(())
    }

    fn clear_type_request(&self) -> ChangeMyListChartClearTypeRequest {
        ChangeMyListChartClearTypeRequest {
            id: self.my_list_chart_id,
            clear_type: self.clear_type,
        }
    }

    fn memo_request(&self) -> ChangeMyListChartMemoRequest {
        ChangeMyListChartMemoRequest {
            id: self.my_list_chart_id,
            memo: self.memo.clone(),
        }
    }

    /// Save [`Self::clear_type`], then refetch the entry.
    ///
    /// # Errors
    ///
    /// Returns any error of the two calls.
    pub async fn save_clear_type(&mut self) -> Result<(), PageError> {
        let request = self.clear_type_request();
        if let Err(e) = self.ctx.api.change_my_list_chart_clear_type(&request).await {
            return Err(self.failed("クリア状況の更新", e));
        }
        info!("entry {}: clear type set to {:?}", self.my_list_chart_id, request.clear_type);
        if let Some(clear_type) = self.fetch_entry().await?.map(|entry| entry.clear_type) {
            self.clear_type = clear_type;
        }
        Ok(())
    }

    /// Save [`Self::memo`], then refetch the entry.
    ///
    /// # Errors
    ///
    /// Returns any error of the two calls.
    pub async fn save_memo(&mut self) -> Result<(), PageError> {
        let request = self.memo_request();
        if let Err(e) = self.ctx.api.change_my_list_chart_memo(&request).await {
            return Err(self.failed("メモの更新", e));
        }
        info!("entry {}: memo updated", self.my_list_chart_id);
        if let Some(memo) = self.fetch_entry().await?.map(|entry| entry.memo.clone()) {
            self.memo = memo;
        }
        Ok(())
    }

    /// Save the clear status and the memo together, then go back to the list.
    ///
    /// # Errors
    ///
    /// Returns the first error of the two calls; the view stays then.
    pub async fn save_all(&mut self) -> Result<(), PageError> {
        let clear_type = self.clear_type_request();
        let memo = self.memo_request();
        let api = &self.ctx.api;
        let (clear_type, memo) = join(
            api.change_my_list_chart_clear_type(&clear_type),
            api.change_my_list_chart_memo(&memo),
        )
        .await;

        if let Err(e) = clear_type.and(memo) {
            return Err(self.failed("保存", e));
        }
        info!("entry {}: saved", self.my_list_chart_id);
        self.back();
        Ok(())
    }

    /// Upload a picture or movie for the attachment form.
    ///
    /// The attachment type is guessed from the file if none was chosen.
    ///
    /// # Errors
    ///
    /// Fails without contacting the server when the file is neither a PNG/JPEG image nor an
    /// MP4/WebM/QuickTime movie.
    pub async fn upload_attachment_file(&mut self, file: FilePart) -> Result<(), PageError> {
        let guessed = if file.mime.starts_with("video/") {
            AttachmentType::Movie
        } else {
            AttachmentType::Picture
        };
        let url = self.ctx.api.upload(UploadKind::Attachment, file).await?;
        if self.attachment.attachment_type == AttachmentType::Unspecified {
            self.attachment.attachment_type = guessed;
        }
        self.attachment.file_url = url;
        Ok(())
    }

    /// Attach the uploaded file. Does nothing until a file was uploaded and a caption given.
    ///
    /// On success the attachments are refetched and the form is reset.
    ///
    /// # Errors
    ///
    /// Returns any error of the two calls.
    pub async fn add_attachment(&mut self) -> Result<(), PageError> {
        if !self.attachment.is_complete() {
            debug!("attachment form incomplete, nothing to add");
            return Ok(());
        }

        let request = AddMyListChartAttachmentRequest {
            my_list_chart_id: self.my_list_chart_id,
            attachment_type: self.attachment.attachment_type,
            file_url: self.attachment.file_url.trim().to_owned(),
            caption: self.attachment.caption.trim().to_owned(),
        };
        if let Err(e) = self.ctx.api.add_my_list_chart_attachment(&request).await {
            return Err(self.failed("添付ファイルの追加", e));
        }
        info!("entry {}: attached {}", self.my_list_chart_id, request.file_url);
        self.attachment = AttachmentForm::default();
        self.fetch_attachments().await
    }

    /// Remove an attachment, then its stored file.
    ///
    /// The attachment disappears from the view at once and comes back if the server refuses to
    /// delete it. The stored file is removed on a best-effort basis: failing that is only logged.
    ///
    /// # Errors
    ///
    /// Returns the error of the delete call or of the refetch.
    pub async fn delete_attachment(&mut self, attachment_id: Id) -> Result<(), PageError> {
        let Some(index) = self
            .attachments
            .iter()
            .position(|attachment| attachment.id == attachment_id)
        else {
            return Err(PageError::NotFound(format!("attachment {attachment_id}")));
        };
        let removed = self.attachments.remove(index);

        if let Err(e) = self
            .ctx
            .api
            .delete_my_list_chart_attachment(attachment_id)
            .await
        {
            let index = index.min(self.attachments.len());
            self.attachments.insert(index, removed);
            return Err(self.failed("添付ファイルの削除", e));
        }
        info!("entry {}: removed attachment {attachment_id}", self.my_list_chart_id);

        if let Err(e) = self.ctx.api.delete_attachment_file(&removed.file_url).await {
            warn!("could not remove the stored file {}: {e}", removed.file_url);
        }

        self.fetch_attachments().await
    }

    /// Go back to the list this entry belongs to.
    pub fn back(&self) {
        self.ctx.navigate(Route::MyListDetail {
            my_list_id: self.my_list_id,
        });
    }

    #[must_use]
    pub const fn entry(&self) -> Option<&MyListChart> {
        self.entry.as_ref()
    }

    #[must_use]
    pub fn attachments(&self) -> &[MyListChartAttachment] {
        &self.attachments
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
