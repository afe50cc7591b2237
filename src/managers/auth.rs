use std::fmt;
use std::sync::Arc;

use tracing::{error, info};

use super::{required, ManagerError, ManagerResult};
use crate::auth::Authenticator;
use crate::conversion::user_from_sign_up;
use crate::inputs::{LoginInput, SignUpInput};
use crate::models::{Role, User};
use crate::validation::{validate_login, validate_sign_up};
use crate::views::{TokenView, UserView};

const BAD_CREDENTIALS: &str = "Error: The Email or Password is incorrect.";

/// Strings wrapped around every raw password before it reaches the
/// authenticator.
#[derive(Clone)]
pub struct PasswordEnhancers {
    before: String,
    after: String,
}

impl PasswordEnhancers {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }

    pub fn compose(&self, password: &str) -> String {
        format!("{}{}{}", self.before, password, self.after)
    }
}

impl fmt::Debug for PasswordEnhancers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordEnhancers(..)")
    }
}

#[derive(Clone)]
pub struct AuthManager {
    authenticator: Arc<dyn Authenticator>,
    enhancers: PasswordEnhancers,
}

impl AuthManager {
    pub fn new(authenticator: Arc<dyn Authenticator>, enhancers: PasswordEnhancers) -> Self {
        Self {
            authenticator,
            enhancers,
        }
    }

    pub async fn sign_up(&self, input: &SignUpInput) -> ManagerResult<()> {
        self.try_sign_up(input)
            .await
            .inspect_err(|e| e.log("auth.sign_up"))
    }

    async fn try_sign_up(&self, input: &SignUpInput) -> ManagerResult<()> {
        validate_sign_up(input)?;
        let role: Role = input
            .role
            .parse()
            .map_err(|e| ManagerError::user(format!("Error: {e}")))?;
        let user = user_from_sign_up(input);
        self.register(&user, &input.password, role).await?;
        info!(user_id = %user.id, role = %role, "User signed up");
        Ok(())
    }

    /// Creates an Admin account for `email`, or grants the Admin role when the
    /// email is already registered.
    pub async fn provision_admin(&self, email: &str, password: &str) -> ManagerResult<()> {
        self.try_provision_admin(email, password)
            .await
            .inspect_err(|e| e.log("auth.provision_admin"))
    }

    async fn try_provision_admin(&self, email: &str, password: &str) -> ManagerResult<()> {
        if let Some(existing) = self.authenticator.find_by_email(email).await? {
            self.authenticator.assign_role(&existing, Role::Admin).await?;
            info!(user_id = %existing.id, "Admin role granted to existing user");
            return Ok(());
        }

        let user = user_from_sign_up(&SignUpInput {
            first_name: "Admin".to_string(),
            last_name: "Admin".to_string(),
            email: email.to_string(),
            ..SignUpInput::default()
        });
        self.register(&user, password, Role::Admin).await?;
        info!(user_id = %user.id, "Admin account provisioned");
        Ok(())
    }

    /// Account creation and role assignment are two writes. When the
    /// second fails the account is deleted again.
    async fn register(&self, user: &User, password: &str, role: Role) -> ManagerResult<()> {
        self.authenticator
            .create_account(user, &self.enhancers.compose(password))
            .await?;

        let Err(assign_err) = self.authenticator.assign_role(user, role).await else {
            return Ok(());
        };
        error!(user_id = %user.id, role = %role, error = %assign_err, "Role assignment failed, removing account");

        if let Err(rollback_err) = self.authenticator.delete_account(user).await {
            error!(user_id = %user.id, error = %rollback_err, "Account rollback failed");
            return Err(ManagerError::server(format!(
                "Role assignment failed ({assign_err}) and the account could not be removed: {rollback_err}"
            )));
        }
        Err(ManagerError::server(format!(
            "Role assignment failed: {assign_err}"
        )))
    }

    pub async fn login(&self, input: &LoginInput) -> ManagerResult<TokenView> {
        self.try_login(input)
            .await
            .inspect_err(|e| e.log("auth.login"))
    }

    async fn try_login(&self, input: &LoginInput) -> ManagerResult<TokenView> {
        validate_login(input)?;
        let user = self
            .authenticator
            .find_by_email(&input.email)
            .await?
            .ok_or_else(|| ManagerError::user(BAD_CREDENTIALS))?;

        let password = self.enhancers.compose(&input.password);
        if !self.authenticator.check_password(&user, &password).await? {
            return Err(ManagerError::user(BAD_CREDENTIALS));
        }

        let token = self.authenticator.issue_token(&user).await?;
        info!(user_id = %user.id, "User logged in");
        Ok(TokenView { token })
    }

    pub async fn get_user(&self, email: &str) -> ManagerResult<UserView> {
        self.find_user(email)
            .await
            .inspect_err(|e| e.log("auth.get_user"))
    }

    async fn find_user(&self, email: &str) -> ManagerResult<UserView> {
        required(email, "The Email is required")?;
        let user = self
            .authenticator
            .find_by_email(email)
            .await?
            .ok_or_else(|| ManagerError::not_found("User not found"))?;
        Ok(UserView::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enhancers_wrap_the_password() {
        let enhancers = PasswordEnhancers::new("pre-", "-post");
        assert_eq!(enhancers.compose("secret"), "pre-secret-post");
        assert_eq!(format!("{enhancers:?}"), "PasswordEnhancers(..)");
    }
}
