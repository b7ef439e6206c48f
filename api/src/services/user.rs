//! `user.v1.UserService`: the signed in account. Every call is authenticated.

use serde::{Deserialize, Serialize};

use sekai_types::User;

use crate::{
    client::{Access, ApiClient, Empty},
    errors::ApiError,
    transport::{Procedure, Transport},
};

pub const SERVICE: &str = "user.v1.UserService";

const fn procedure(method: &'static str) -> Procedure {
    Procedure::new(SERVICE, method)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeEmailRequest {
    pub email: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub new_check_password: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct IsAdminResponse {
    is_admin: bool,
}

impl<T: Transport> ApiClient<T> {
    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn user_info(&self) -> Result<User, ApiError> {
        self.call(procedure("UserInfo"), Access::Authenticated, &Empty {})
            .await
    }

    /// Invalidate the session on the server. The local token is left alone.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn logout(&self) -> Result<(), ApiError> {
        let Empty {} = self
            .call(procedure("Logout"), Access::Authenticated, &Empty {})
            .await?;
        Ok(())
    }

    /// Returns the account as updated by the server.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn change_email(&self, request: &ChangeEmailRequest) -> Result<User, ApiError> {
        self.call(procedure("ChangeEmail"), Access::Authenticated, request)
            .await
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<User, ApiError> {
        self.call(procedure("ChangePassword"), Access::Authenticated, request)
            .await
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn delete_user(&self) -> Result<(), ApiError> {
        let Empty {} = self
            .call(procedure("DeleteUser"), Access::Authenticated, &Empty {})
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn is_admin(&self) -> Result<bool, ApiError> {
        let IsAdminResponse { is_admin } = self
            .call(procedure("IsAdmin"), Access::Authenticated, &Empty {})
            .await?;
        Ok(is_admin)
    }
}
