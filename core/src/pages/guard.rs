//! Admin-only views check with the server before showing anything.

use log::{info, warn};
use sekai_api::Transport;

use crate::{errors::PageError, route::Route};

use super::PageContext;

/// Let the caller through if the session belongs to an administrator.
///
/// Anyone else, including a visitor without a session or a failed check, is sent to the login
/// view.
///
/// # Errors
///
/// Returns [`PageError::Redirected`] when the check did not pass.
pub async fn require_admin<T: Transport>(ctx: &PageContext<T>) -> Result<(), PageError> {
    match ctx.api.is_admin().await {
        Ok(true) => Ok(()),
        Ok(false) => {
            info!("not an administrator, redirecting to {}", Route::Login);
            ctx.navigate(Route::Login);
            Err(PageError::Redirected(Route::Login))
        }
        Err(e) => {
            warn!("admin check failed: {e}");
            ctx.navigate(Route::Login);
            Err(PageError::Redirected(Route::Login))
        }
    }
}
