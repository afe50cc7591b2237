use async_trait::async_trait;
use sqlx::PgPool;

use super::password::PasswordHash;
use super::{AuthError, Authenticator, TokenSigner};
use crate::models::{Role, User};

fn backend(e: sqlx::Error) -> AuthError {
    AuthError::Backend(e.to_string())
}

/// Accounts in the `users` and `user_roles` tables, with Argon2 password
/// hashes stored next to the profile.
#[derive(Clone)]
pub struct PgAuthenticator {
    pool: PgPool,
    signer: TokenSigner,
}

impl PgAuthenticator {
    pub fn new(pool: PgPool, signer: TokenSigner) -> Self {
        Self { pool, signer }
    }
}

#[async_trait]
impl Authenticator for PgAuthenticator {
    async fn create_account(&self, user: &User, password: &str) -> Result<(), AuthError> {
        let hash = PasswordHash::new(password)?;
        sqlx::query(
            r#"
            INSERT INTO users
                (id, email, user_name, first_name, last_name, phone_number, phone_prefix,
                 age, is_student, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.user_name)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone_number)
        .bind(&user.phone_prefix)
        .bind(user.age)
        .bind(user.is_student)
        .bind(hash.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AuthError::DuplicateEmail;
                }
            }
            backend(e)
        })?;
        Ok(())
    }

    async fn assign_role(&self, user: &User, role: Role) -> Result<(), AuthError> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(&user.id)
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_foreign_key_violation() {
                    return AuthError::UnknownUser(user.id.clone());
                }
            }
            backend(e)
        })?;
        Ok(())
    }

    async fn delete_account(&self, user: &User) -> Result<(), AuthError> {
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(&user.id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if deleted.rows_affected() == 0 {
            return Err(AuthError::UnknownUser(user.id.clone()));
        }
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, user_name, first_name, last_name, phone_number, phone_prefix,
                   age, is_student, created_at, updated_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)
    }

    async fn check_password(&self, user: &User, password: &str) -> Result<bool, AuthError> {
        let stored: Option<(String,)> =
            sqlx::query_as("SELECT password_hash FROM users WHERE id = $1")
                .bind(&user.id)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
        match stored {
            Some((phc,)) => PasswordHash::from_phc(phc)?.verify(password),
            None => Ok(false),
        }
    }

    async fn roles(&self, user: &User) -> Result<Vec<Role>, AuthError> {
        // One row per role, or a single NULL row for an account without roles.
        let rows: Vec<(Option<String>,)> = sqlx::query_as(
            r#"
            SELECT r.role
            FROM users u
            LEFT JOIN user_roles r ON r.user_id = u.id
            WHERE u.id = $1
            ORDER BY r.role
            "#,
        )
        .bind(&user.id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        if rows.is_empty() {
            return Err(AuthError::UnknownUser(user.id.clone()));
        }
        rows.into_iter()
            .filter_map(|(role,)| role)
            .map(|role| {
                role.parse::<Role>()
                    .map_err(|e| AuthError::Backend(e.to_string()))
            })
            .collect()
    }

    async fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let roles = self.roles(user).await?;
        self.signer.issue(&user.email, roles)
    }
}
