use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::password::PasswordHash;
use super::{AuthError, Authenticator, TokenSigner};
use crate::models::{Role, User};
use crate::store::UserTable;

#[derive(Debug)]
struct Account {
    password: PasswordHash,
    roles: Vec<Role>,
}

/// Keeps accounts in process memory. Users land in the shared
/// [`UserTable`] so the stores can attach them to events, tickets and
/// reviews.
#[derive(Clone)]
pub struct MemoryAuthenticator {
    users: UserTable,
    accounts: Arc<RwLock<HashMap<String, Account>>>,
    signer: TokenSigner,
}

impl MemoryAuthenticator {
    pub fn new(users: UserTable, signer: TokenSigner) -> Self {
        Self {
            users,
            accounts: Arc::new(RwLock::new(HashMap::new())),
            signer,
        }
    }
}

#[async_trait]
impl Authenticator for MemoryAuthenticator {
    async fn create_account(&self, user: &User, password: &str) -> Result<(), AuthError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AuthError::DuplicateEmail);
        }

        let account = Account {
            password: PasswordHash::new(password)?,
            roles: Vec::new(),
        };
        self.accounts.write().await.insert(user.id.clone(), account);
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn assign_role(&self, user: &User, role: Role) -> Result<(), AuthError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&user.id)
            .ok_or_else(|| AuthError::UnknownUser(user.id.clone()))?;
        if !account.roles.contains(&role) {
            account.roles.push(role);
        }
        Ok(())
    }

    async fn delete_account(&self, user: &User) -> Result<(), AuthError> {
        let mut users = self.users.write().await;
        if users.remove(&user.id).is_none() {
            return Err(AuthError::UnknownUser(user.id.clone()));
        }
        self.accounts.write().await.remove(&user.id);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn check_password(&self, user: &User, password: &str) -> Result<bool, AuthError> {
        let accounts = self.accounts.read().await;
        match accounts.get(&user.id) {
            Some(account) => account.password.verify(password),
            None => Ok(false),
        }
    }

    async fn roles(&self, user: &User) -> Result<Vec<Role>, AuthError> {
        let accounts = self.accounts.read().await;
        accounts
            .get(&user.id)
            .map(|account| account.roles.clone())
            .ok_or_else(|| AuthError::UnknownUser(user.id.clone()))
    }

    async fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let roles = self.roles(user).await?;
        self.signer.issue(&user.email, roles)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn authenticator() -> MemoryAuthenticator {
        MemoryAuthenticator::new(
            UserTable::default(),
            TokenSigner::new("0123456789abcdef0123456789abcdef", Duration::days(1)),
        )
    }

    fn user(id: &str, email: &str) -> User {
        let now = Utc::now();
        User {
            id: id.to_string(),
            email: email.to_string(),
            user_name: email.to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            phone_number: "123-456-7890".to_string(),
            phone_prefix: "+40".to_string(),
            age: 30,
            is_student: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_account_lifecycle() {
        let auth = authenticator();
        let jane = user("u1", "jane@example.com");

        auth.create_account(&jane, "pw-secret").await.unwrap();
        auth.assign_role(&jane, Role::Organizer).await.unwrap();
        auth.assign_role(&jane, Role::Organizer).await.unwrap();

        assert_eq!(auth.roles(&jane).await.unwrap(), vec![Role::Organizer]);
        assert!(auth.check_password(&jane, "pw-secret").await.unwrap());
        assert!(!auth.check_password(&jane, "pw-other").await.unwrap());
        assert_eq!(
            auth.find_by_email("JANE@example.com").await.unwrap(),
            Some(jane.clone())
        );

        let token = auth.issue_token(&jane).await.unwrap();
        assert!(!token.is_empty());

        auth.delete_account(&jane).await.unwrap();
        assert_eq!(auth.find_by_email("jane@example.com").await.unwrap(), None);
        assert!(!auth.check_password(&jane, "pw-secret").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let auth = authenticator();
        auth.create_account(&user("u1", "jane@example.com"), "pw")
            .await
            .unwrap();
        assert_eq!(
            auth.create_account(&user("u2", "jane@example.com"), "pw")
                .await,
            Err(AuthError::DuplicateEmail)
        );
    }

    #[tokio::test]
    async fn test_role_for_unknown_user_fails() {
        let auth = authenticator();
        assert!(matches!(
            auth.assign_role(&user("ghost", "g@example.com"), Role::Buyer)
                .await,
            Err(AuthError::UnknownUser(_))
        ));
    }
}
