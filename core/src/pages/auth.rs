//! Signup and login.

use std::fmt;

use log::{info, warn};
use sekai_api::{
    ApiError, Code, Transport,
    services::auth::{LoginRequest, SignupRequest},
};

use crate::{
    errors::{FormError, PageError},
    route::Route,
};

use super::PageContext;

/// Why a login was refused, as far as the client can tell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginFailure {
    /// The account exists but its address was never confirmed.
    UnverifiedEmail,
    /// The server (or the way to it) failed.
    ServerError,
    InvalidCredentials,
}

impl LoginFailure {
    #[must_use]
    pub const fn classify(error: &ApiError) -> Self {
        match error.code() {
            Some(Code::Unauthenticated) => Self::UnverifiedEmail,
            Some(Code::Internal | Code::Unknown | Code::Unavailable) | None => Self::ServerError,
            Some(_) => Self::InvalidCredentials,
        }
    }
}

impl fmt::Display for LoginFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnverifiedEmail => write!(f, "メールアドレスの認証が完了していません"),
            Self::ServerError => write!(f, "サーバーでエラーが発生しました"),
            Self::InvalidCredentials => write!(f, "メールアドレスまたはパスワードが間違っています"),
        }
    }
}

fn credentials(email: &str, password: &str) -> Result<(String, String), FormError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(FormError::Required("メールアドレス"));
    }
    if password.is_empty() {
        return Err(FormError::Required("パスワード"));
    }
    Ok((email.to_owned(), password.to_owned()))
}

#[derive(Debug)]
pub struct LoginPage<T> {
    ctx: PageContext<T>,
    pub email: String,
    pub password: String,
    message: Option<String>,
}

impl<T: Transport> LoginPage<T> {
    #[must_use]
    pub const fn new(ctx: PageContext<T>) -> Self {
        Self {
            ctx,
            email: String::new(),
            password: String::new(),
            message: None,
        }
    }

    /// Exchange the credentials for a token and keep it in the session.
    ///
    /// On success the user page is shown after the configured delay. An answer without a token
    /// leaves the current session alone.
    ///
    /// # Errors
    ///
    /// Returns the validation error, the error of the call, or an error storing the token.
    pub async fn login(&mut self) -> Result<(), PageError> {
        let (email, password) = credentials(&self.email, &self.password).inspect_err(|e| {
            self.message = Some(e.to_string());
        })?;

        match self.ctx.api.login(&LoginRequest { email, password }).await {
            Ok(Some(token)) => {
                self.ctx.api.session().set_token(&token)?;
                info!("logged in as {}", self.email.trim());
                self.message = Some("ログイン成功！".to_owned());
                self.ctx
                    .navigator
                    .navigate_after(Route::User, self.ctx.redirect_delay)
                    .await;
                Ok(())
            }
            Ok(None) => {
                warn!("login answered without a token");
                self.message = Some("トークンが取得できませんでした".to_owned());
                Ok(())
            }
            Err(e) => {
                let failure = LoginFailure::classify(&e);
                warn!("login failed ({failure:?}): {e}");
                self.message = Some(format!("ログイン失敗: {failure}"));
                Err(e.into())
            }
        }
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[derive(Debug)]
pub struct SignupPage<T> {
    ctx: PageContext<T>,
    pub email: String,
    pub password: String,
    pub check_password: String,
    message: Option<String>,
}

impl<T: Transport> SignupPage<T> {
    #[must_use]
    pub const fn new(ctx: PageContext<T>) -> Self {
        Self {
            ctx,
            email: String::new(),
            password: String::new(),
            check_password: String::new(),
            message: None,
        }
    }

    /// Register the account. The two passwords are compared before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns the validation error or the error of the call.
    pub async fn signup(&mut self) -> Result<(), PageError> {
        let validated = credentials(&self.email, &self.password).and_then(|credentials| {
            if self.password == self.check_password {
                Ok(credentials)
            } else {
                Err(FormError::PasswordMismatch)
            }
        });
        let (email, password) = validated.inspect_err(|e| {
            self.message = Some(e.to_string());
        })?;

        let request = SignupRequest {
            email,
            password,
            check_password: self.check_password.clone(),
        };
        match self.ctx.api.signup(&request).await {
            Ok(()) => {
                info!("signed up {}", request.email);
                self.message = Some("サインアップ成功！".to_owned());
                Ok(())
            }
            Err(e) => {
                warn!("signup failed: {e}");
                self.message = Some(format!("サインアップ失敗: {e}"));
                Err(e.into())
            }
        }
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
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Code::Unauthenticated, LoginFailure::UnverifiedEmail)]
    #[case(Code::Internal, LoginFailure::ServerError)]
    #[case(Code::Unknown, LoginFailure::ServerError)]
    #[case(Code::Unavailable, LoginFailure::ServerError)]
    #[case(Code::InvalidArgument, LoginFailure::InvalidCredentials)]
    #[case(Code::NotFound, LoginFailure::InvalidCredentials)]
    #[case(Code::PermissionDenied, LoginFailure::InvalidCredentials)]
    fn test_classify(#[case] code: Code, #[case] expected: LoginFailure) {
        assert_eq!(LoginFailure::classify(&ApiError::status(code, "")), expected);
    }

    #[test]
    fn test_network_errors_are_server_errors() {
        let error = ApiError::InvalidUrl("unreachable".into());
        assert_eq!(LoginFailure::classify(&error), LoginFailure::ServerError);
    }

    #[tokio::test]
    async fn test_login_stores_token_and_moves_on() {
        let transport = MockTransport::new().reply("Login", json!({"token": "jwt"}));
        let mut page = LoginPage::new(context(transport, None));
        page.email = "miku@example.com".into();
        page.password = "39".into();

        page.login().await.unwrap();

        assert_eq!(page.message(), Some("ログイン成功！"));
        assert_eq!(page.ctx.api.session().token().as_deref(), Some("jwt"));
        assert_eq!(page.ctx.navigator.current(), Route::User);
        assert_eq!(
            page.ctx.api.transport().calls()[0].bearer,
            None,
            "login is a public call"
        );
    }

    #[tokio::test]
    async fn test_login_without_token_keeps_the_session() {
        let mut page = LoginPage::new(context(MockTransport::new(), Some("previous")));
        page.email = "miku@example.com".into();
        page.password = "39".into();

        page.login().await.unwrap();

        assert_eq!(page.message(), Some("トークンが取得できませんでした"));
        assert_eq!(page.ctx.api.session().token().as_deref(), Some("previous"));
        assert_eq!(page.ctx.navigator.current(), Route::Top);
    }

    #[tokio::test]
    async fn test_login_failure_message() {
        let transport = MockTransport::new().fail(
            "Login",
            ApiError::status(Code::Unauthenticated, "email not verified"),
        );
        let mut page = LoginPage::new(context(transport, None));
        page.email = "miku@example.com".into();
        page.password = "39".into();

        let result = page.login().await;

        assert!(result.is_err());
        assert_eq!(
            page.message(),
            Some("ログイン失敗: メールアドレスの認証が完了していません")
        );
        // public calls never trigger the login redirect
        assert_eq!(page.ctx.navigator.current(), Route::Top);
    }

    #[tokio::test]
    async fn test_signup_mismatch_sends_nothing() {
        let mut page = SignupPage::new(context(MockTransport::new(), None));
        page.email = "rin@example.com".into();
        page.password = "kagamine".into();
        page.check_password = "kagamine!".into();

        let result = page.signup().await;

        assert!(matches!(
            result,
            Err(PageError::Form(FormError::PasswordMismatch))
        ));
        assert_eq!(page.message(), Some("パスワードが一致しません"));
        assert!(page.ctx.api.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_signup() {
        let mut page = SignupPage::new(context(MockTransport::new(), None));
        page.email = " rin@example.com ".into();
        page.password = "kagamine".into();
        page.check_password = "kagamine".into();

        page.signup().await.unwrap();

        assert_eq!(page.message(), Some("サインアップ成功！"));
        assert_eq!(
            page.ctx.api.transport().bodies("Signup"),
            vec![json!({"email": "rin@example.com", "password": "kagamine", "checkPassword": "kagamine"})]
        );
    }

    #[tokio::test]
    async fn test_signup_failure() {
        let transport = MockTransport::new().fail(
            "Signup",
            ApiError::status(Code::AlreadyExists, "email already registered"),
        );
        let mut page = SignupPage::new(context(transport, None));
        page.email = "rin@example.com".into();
        page.password = "kagamine".into();
        page.check_password = "kagamine".into();

        assert!(page.signup().await.is_err());
        assert_eq!(
            page.message(),
            Some("サインアップ失敗: [already_exists] email already registered")
        );
    }
}
