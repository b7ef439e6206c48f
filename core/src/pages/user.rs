//! The signed in account: details, email and password changes, logout and account removal.

use log::{info, warn};
use sekai_api::{
    Transport,
    services::user::{ChangeEmailRequest, ChangePasswordRequest},
};
use sekai_types::User;

use crate::{
    errors::{FormError, PageError},
    route::Route,
};

use super::{Mount, PageContext};

/// Asked before the account is removed.
pub const DELETE_CONFIRMATION: &str = "本当に退会しますか？";

#[derive(Debug)]
pub struct UserPage<T> {
    ctx: PageContext<T>,
    mount: Mount,
    user: Option<User>,
    /// The email form, filled with the current address on load.
    pub email: String,
    pub old_password: String,
    pub new_password: String,
    pub check_password: String,
    message: Option<String>,
}

impl<T: Transport> UserPage<T> {
    #[must_use]
    pub fn new(ctx: PageContext<T>) -> Self {
        Self {
            ctx,
            mount: Mount::default(),
            user: None,
            email: String::new(),
            old_password: String::new(),
            new_password: String::new(),
            check_password: String::new(),
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

    /// Fetch the account details.
    ///
    /// # Errors
    ///
    /// Returns any error of the call.
    pub async fn load(&mut self) -> Result<(), PageError> {
        let ticket = self.mount.ticket();
        let result = self.ctx.api.user_info().await;
        if !self.mount.is_current(ticket) {
            return Ok(());
        }
        match result {
            Ok(user) => {
                self.email.clone_from(&user.email);
                self.user = Some(user);
                Ok(())
            }
            Err(e) => {
                warn!("failed to fetch the account: {e}");
                self.message = Some("ユーザー情報取得に失敗しました".to_owned());
                Err(e.into())
            }
        }
    }

    /// Change the address to [`Self::email`], then refetch the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is empty or the call failed.
    pub async fn change_email(&mut self) -> Result<(), PageError> {
        let email = self.email.trim().to_owned();
        if email.is_empty() {
            let error = FormError::Required("メールアドレス");
            self.message = Some(error.to_string());
            return Err(error.into());
        }

        match self.ctx.api.change_email(&ChangeEmailRequest { email }).await {
            Ok(_) => {
                info!("email changed");
                self.message = Some("メールアドレスを変更しました".to_owned());
                self.load().await
            }
            Err(e) => {
                warn!("failed to change the email: {e}");
                self.message = Some("メールアドレス変更に失敗しました".to_owned());
                Err(e.into())
            }
        }
    }

    /// Change the password.
    ///
    /// The session was issued for the old credentials, so on success it is dropped and the user
    /// is sent to the login view.
    ///
    /// # Errors
    ///
    /// Returns an error if the new passwords differ or the call failed.
    pub async fn change_password(&mut self) -> Result<(), PageError> {
        if self.new_password.is_empty() {
            let error = FormError::Required("新しいパスワード");
            self.message = Some(error.to_string());
            return Err(error.into());
        }
        if self.new_password != self.check_password {
            let error = FormError::PasswordMismatch;
            self.message = Some(error.to_string());
            return Err(error.into());
        }

        let request = ChangePasswordRequest {
            old_password: self.old_password.clone(),
            new_password: self.new_password.clone(),
            new_check_password: self.check_password.clone(),
        };
        match self.ctx.api.change_password(&request).await {
            Ok(_) => {
                info!("password changed, the session has to be renewed");
                self.message = Some("パスワードを変更しました".to_owned());
                self.old_password.clear();
                self.new_password.clear();
                self.check_password.clear();
                self.ctx.api.session().clear()?;
                self.ctx.navigate(Route::Login);
                Ok(())
            }
            Err(e) => {
                warn!("failed to change the password: {e}");
                self.message = Some("パスワード変更に失敗しました".to_owned());
                Err(e.into())
            }
        }
    }

    /// Remove the account. `confirmed` is the answer to [`DELETE_CONFIRMATION`].
    ///
    /// # Errors
    ///
    /// Returns [`FormError::ConfirmationRequired`] without calling anything when not confirmed,
    /// otherwise any error of the call.
    pub async fn delete_account(&mut self, confirmed: bool) -> Result<(), PageError> {
        if !confirmed {
            return Err(FormError::ConfirmationRequired.into());
        }

        match self.ctx.api.delete_user().await {
            Ok(()) => {
                info!("account deleted");
                self.message = Some("退会しました".to_owned());
                self.user = None;
                self.ctx.api.session().clear()?;
                self.ctx.navigate(Route::Top);
                Ok(())
            }
            Err(e) => {
                warn!("failed to delete the account: {e}");
                self.message = Some("退会に失敗しました".to_owned());
                Err(e.into())
            }
        }
    }

    /// End the session.
    ///
    /// The server is told first, but the local token is dropped even if it could not be reached.
    ///
    /// # Errors
    ///
    /// Returns an error only if the stored token could not be removed.
    pub async fn logout(&mut self) -> Result<(), PageError> {
        if let Err(e) = self.ctx.api.logout().await {
            warn!("the server did not acknowledge the logout: {e}");
        }

        if let Err(e) = self.ctx.api.session().clear() {
            self.message = Some("ログアウトに失敗しました".to_owned());
            return Err(e.into());
        }
        info!("logged out");
        self.message = Some("ログアウトしました".to_owned());
        self.user = None;
        self.ctx.navigate(Route::Login);
        Ok(())
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pages::auth::LoginPage,
        test_utils::{MockTransport, context},
    };
    use pretty_assertions::assert_eq;
    use sekai_api::{ApiError, Code};
    use serde_json::json;

    const MIKU: &str = "miku@example.com";

    fn user_info(email: &str) -> serde_json::Value {
        json!({"id": "u-39", "email": email, "createdAt": "2020-09-30T00:00:00Z"})
    }

    #[tokio::test]
    async fn test_login_then_user_page_shows_email() {
        let transport = MockTransport::new()
            .reply("Login", json!({"token": "jwt"}))
            .reply("UserInfo", user_info(MIKU));
        let ctx = context(transport, None);

        let mut login = LoginPage::new(ctx.clone());
        login.email = MIKU.into();
        login.password = "39".into();
        login.login().await.unwrap();
        assert_eq!(ctx.navigator.current(), Route::User);

        let mut page = UserPage::new(ctx.clone());
        page.mount().await.unwrap();

        assert_eq!(page.user().map(|user| user.email.as_str()), Some(MIKU));
        assert_eq!(page.email, MIKU);
        assert_eq!(ctx.navigator.current(), Route::User);
        let calls = ctx.api.transport().calls();
        assert_eq!(calls[1].procedure.method, "UserInfo");
        assert_eq!(calls[1].bearer.as_deref(), Some("jwt"));
    }

    #[tokio::test]
    async fn test_expired_session_redirects_to_login() {
        let transport = MockTransport::new()
            .fail("UserInfo", ApiError::status(Code::Unauthenticated, "token expired"));
        let ctx = context(transport, Some("stale"));
        let mut page = UserPage::new(ctx.clone());

        let result = page.mount().await;

        assert!(matches!(
            result,
            Err(PageError::Api(ApiError::AuthenticationRequired { .. }))
        ));
        assert_eq!(ctx.navigator.current(), Route::Login);
        assert_eq!(page.message(), Some("ユーザー情報取得に失敗しました"));
    }

    #[tokio::test]
    async fn test_change_email_refetches() {
        let transport = MockTransport::new()
            .reply("UserInfo", user_info(MIKU))
            .reply("ChangeEmail", user_info("luka@example.com"))
            .reply("UserInfo", user_info("luka@example.com"));
        let mut page = UserPage::new(context(transport, Some("t")));
        page.mount().await.unwrap();

        page.email = "luka@example.com".into();
        page.change_email().await.unwrap();

        assert_eq!(page.message(), Some("メールアドレスを変更しました"));
        assert_eq!(
            page.user().map(|user| user.email.as_str()),
            Some("luka@example.com")
        );
        assert_eq!(
            page.ctx.api.transport().methods(),
            vec!["UserInfo", "ChangeEmail", "UserInfo"]
        );
        // the session survives an email change
        assert_eq!(page.ctx.api.session().token().as_deref(), Some("t"));
    }

    #[tokio::test]
    async fn test_change_password_ends_the_session() {
        let mut page = UserPage::new(context(MockTransport::new(), Some("t")));
        page.old_password = "old".into();
        page.new_password = "new".into();
        page.check_password = "new".into();

        page.change_password().await.unwrap();

        assert_eq!(page.message(), Some("パスワードを変更しました"));
        assert!(page.old_password.is_empty());
        assert!(page.new_password.is_empty());
        assert!(page.check_password.is_empty());
        assert_eq!(page.ctx.api.session().token(), None);
        assert_eq!(page.ctx.navigator.current(), Route::Login);
        assert_eq!(
            page.ctx.api.transport().bodies("ChangePassword"),
            vec![json!({"oldPassword": "old", "newPassword": "new", "newCheckPassword": "new"})]
        );
    }

    #[tokio::test]
    async fn test_change_password_mismatch() {
        let mut page = UserPage::new(context(MockTransport::new(), Some("t")));
        page.old_password = "old".into();
        page.new_password = "new".into();
        page.check_password = "neu".into();

        let result = page.change_password().await;

        assert!(matches!(
            result,
            Err(PageError::Form(FormError::PasswordMismatch))
        ));
        assert!(page.ctx.api.transport().calls().is_empty());
        assert_eq!(page.ctx.api.session().token().as_deref(), Some("t"));
    }

    #[tokio::test]
    async fn test_change_password_failure_keeps_fields() {
        let transport = MockTransport::new()
            .fail("ChangePassword", ApiError::status(Code::InvalidArgument, "wrong password"));
        let mut page = UserPage::new(context(transport, Some("t")));
        page.old_password = "old".into();
        page.new_password = "new".into();
        page.check_password = "new".into();

        assert!(page.change_password().await.is_err());
        assert_eq!(page.message(), Some("パスワード変更に失敗しました"));
        assert_eq!(page.old_password, "old");
        assert_eq!(page.ctx.api.session().token().as_deref(), Some("t"));
    }

    #[tokio::test]
    async fn test_delete_account_needs_confirmation() {
        let mut page = UserPage::new(context(MockTransport::new(), Some("t")));

        let result = page.delete_account(false).await;
        assert!(matches!(
            result,
            Err(PageError::Form(FormError::ConfirmationRequired))
        ));
        assert!(page.ctx.api.transport().calls().is_empty());

        page.delete_account(true).await.unwrap();
        assert_eq!(page.message(), Some("退会しました"));
        assert_eq!(page.ctx.api.session().token(), None);
        assert_eq!(page.ctx.api.transport().methods(), vec!["DeleteUser"]);
    }

    #[tokio::test]
    async fn test_logout_clears_token_even_if_server_fails() {
        let transport = MockTransport::new()
            .fail("Logout", ApiError::status(Code::Unavailable, "down"));
        let mut page = UserPage::new(context(transport, Some("t")));

        page.logout().await.unwrap();

        assert_eq!(page.message(), Some("ログアウトしました"));
        assert_eq!(page.ctx.api.session().token(), None);
        assert_eq!(page.ctx.navigator.current(), Route::Login);
    }
}
