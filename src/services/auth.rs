//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult, ErrorCode},
    models::user::{CreateUser, Role, UpdateProfile, UpdateUser, User, UserClaims, UserQuery, UserShort},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by username and password, returning a JWT token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if user.status == 1 {
            return Err(AppError::Authentication("Account is blocked".to_string()));
        }

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Create JWT token for a user
    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify a password against the stored argon2 hash
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(&user.password)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Hash a password with argon2
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// Create the default admin account on first boot, when the users table
    /// is empty. The password must be changed immediately.
    pub async fn ensure_default_admin(&self) -> AppResult<()> {
        let (users, total) = self
            .repository
            .users
            .search(&UserQuery { username: None, page: Some(1), per_page: Some(1) })
            .await?;

        if total > 0 || !users.is_empty() {
            return Ok(());
        }

        let admin = CreateUser {
            username: "admin".to_string(),
            password: "admin".to_string(),
            email: None,
            role: Some(Role::Admin),
        };

        self.create_user(admin).await?;
        tracing::warn!("Created default admin account with default password; change it now");

        Ok(())
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn search_users(&self, query: &UserQuery) -> AppResult<(Vec<UserShort>, i64)> {
        self.repository.users.search(query).await
    }

    /// Create a new user (admin operation)
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        if self.repository.users.username_exists(&user.username, None).await? {
            return Err(AppError::BusinessRule(
                ErrorCode::UsernameAlreadyExists,
                format!("Username '{}' is already taken", user.username),
            ));
        }

        let hash = self.hash_password(&user.password)?;
        self.repository.users.create(&user, &hash).await
    }

    /// Update a user (admin operation)
    pub async fn update_user(&self, id: i32, user: UpdateUser) -> AppResult<User> {
        // Ensure the user exists before touching anything
        self.repository.users.get_by_id(id).await?;

        if let Some(ref username) = user.username {
            if self.repository.users.username_exists(username, Some(id)).await? {
                return Err(AppError::BusinessRule(
                    ErrorCode::UsernameAlreadyExists,
                    format!("Username '{}' is already taken", username),
                ));
            }
        }

        let hash = match user.password {
            Some(ref password) => Some(self.hash_password(password)?),
            None => None,
        };

        self.repository.users.update(id, &user, hash.as_deref()).await
    }

    /// Update user's role (admin operation)
    pub async fn update_role(&self, id: i32, role: Role) -> AppResult<User> {
        let update = UpdateUser {
            username: None,
            password: None,
            email: None,
            role: Some(role),
            status: None,
        };
        self.repository.users.update(id, &update, None).await
    }

    /// Update own profile. Password changes require the current password.
    pub async fn update_profile(&self, id: i32, profile: UpdateProfile) -> AppResult<User> {
        let user = self.repository.users.get_by_id(id).await?;

        if let Some(ref username) = profile.username {
            if self.repository.users.username_exists(username, Some(id)).await? {
                return Err(AppError::BusinessRule(
                    ErrorCode::UsernameAlreadyExists,
                    format!("Username '{}' is already taken", username),
                ));
            }
        }

        let hash = if let Some(ref new_password) = profile.new_password {
            let current = profile.current_password.as_deref().ok_or_else(|| {
                AppError::BadRequest("Current password is required to change password".to_string())
            })?;

            if !self.verify_password(&user, current)? {
                return Err(AppError::Authentication("Current password is incorrect".to_string()));
            }

            Some(self.hash_password(new_password)?)
        } else {
            None
        };

        self.repository
            .users
            .update_profile(
                id,
                profile.username.as_deref(),
                profile.email.as_deref(),
                hash.as_deref(),
            )
            .await
    }

    /// Soft delete a user. The last admin cannot be removed.
    pub async fn delete_user(&self, id: i32, acting_user_id: i32) -> AppResult<()> {
        if id == acting_user_id {
            return Err(AppError::BusinessRule(
                ErrorCode::Failure,
                "Cannot delete your own account".to_string(),
            ));
        }

        self.repository.users.get_by_id(id).await?;
        self.repository.users.delete(id).await
    }
}
