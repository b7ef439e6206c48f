use sekai_api::{ApiError, Code, SessionError};
use thiserror::Error;

use crate::route::Route;

/// Errors that can occur with finding the config or data directories.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Unable to find the config directory for sekai-mylist.")]
    Config,
    #[error("Unable to find the data directory for sekai-mylist.")]
    Data,
}

/// Input rejected before anything was sent to the server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{0}を入力してください")]
    Required(&'static str),
    #[error("{0}を選択してください")]
    NotSelected(&'static str),
    #[error("パスワードが一致しません")]
    PasswordMismatch,
    #[error("先にファイルをアップロードしてください")]
    UploadRequired,
    #[error("{field}は数値で入力してください: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("シンガーの数({singers})とポジションの数({positions})が一致しません")]
    PositionCountMismatch { singers: usize, positions: usize },
    #[error("確認が必要です")]
    ConfirmationRequired,
}

/// Errors surfaced by the page state machines.
#[derive(Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
    #[error("{0} was not found")]
    NotFound(String),
    /// The page refused to show and sent the user elsewhere.
    #[error("Redirected to {0}")]
    Redirected(Route),
}

impl PageError {
    /// The Connect code, when the error came from the server.
    #[must_use]
    pub const fn code(&self) -> Option<Code> {
        match self {
            Self::Api(e) => e.code(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_str_eq;
    use rstest::rstest;

    #[rstest]
    #[case(FormError::Required("名前"), "名前を入力してください")]
    #[case(FormError::NotSelected("楽曲"), "楽曲を選択してください")]
    #[case(FormError::PasswordMismatch, "パスワードが一致しません")]
    #[case(
        FormError::InvalidNumber { field: "レベル", value: "abc".into() },
        "レベルは数値で入力してください: \"abc\""
    )]
    #[case(
        FormError::PositionCountMismatch { singers: 2, positions: 3 },
        "シンガーの数(2)とポジションの数(3)が一致しません"
    )]
    fn test_form_error_display(#[case] error: FormError, #[case] expected: &str) {
        assert_str_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case(PageError::from(ApiError::status(Code::NotFound, "gone")), "[not_found] gone")]
    #[case(PageError::Redirected(Route::Login), "Redirected to /login")]
    #[case(PageError::NotFound("artist 3".into()), "artist 3 was not found")]
    fn test_page_error_display(#[case] error: PageError, #[case] expected: &str) {
        assert_str_eq!(error.to_string(), expected);
    }
}
