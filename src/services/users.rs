//! Authentication and user account service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{Role, UpdateUser, User, UserClaims, SEED_ADMIN_EMAIL},
    store::Store,
    validate,
};

#[derive(Clone)]
pub struct UsersService {
    store: Store,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(store: Store, config: AuthConfig) -> Self {
        Self { store, config }
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> bool {
        PasswordHash::new(&user.password)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Create the protected seed admin account if it does not exist yet
    pub fn seed_admin(&self) -> AppResult<()> {
        let users = self.store.users.load();
        if users.iter().any(|u| u.email == SEED_ADMIN_EMAIL) {
            return Ok(());
        }

        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let admin = User {
            id,
            username: "admin".to_string(),
            email: SEED_ADMIN_EMAIL.to_string(),
            password: self.hash_password(&self.config.admin_password)?,
            role: Role::Admin,
        };
        self.store.users.insert(admin)?;

        tracing::info!("Seed admin account created");
        Ok(())
    }

    /// Register a new account; public registration always gets the user role
    pub fn register(&self, username: &str, email: &str, password: &str) -> AppResult<User> {
        let username = username.trim();
        if username.len() < 2
            || username.len() > 20
            || !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.')
        {
            return Err(AppError::Validation(
                "Username must be 2-20 characters of letters, numbers, dots and underscores"
                    .to_string(),
            ));
        }
        if !validate::is_valid_email(email) {
            return Err(AppError::Validation("Invalid email address".to_string()));
        }
        validate::validate_password_strength(password)?;

        let mut users = self.store.users.load();
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        if users.iter().any(|u| u.username == username) {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        let user = User {
            id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            username: username.to_string(),
            email: email.to_string(),
            password: self.hash_password(password)?,
            role: Role::User,
        };
        users.push(user.clone());
        self.store.users.save(&users)?;

        tracing::info!(email = %user.email, "New user registered");
        Ok(user)
    }

    /// Authenticate by email and password, returning a bearer token
    pub fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .store
            .users
            .load()
            .into_iter()
            .find(|u| u.email == email)
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(&user, password) {
            tracing::warn!(email, "Failed login attempt");
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
            iat: now,
        };
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!(email = %user.email, "Successful login");
        Ok((token, user))
    }

    /// Get a user by id
    pub fn get(&self, id: i64) -> AppResult<User> {
        self.store
            .users
            .get(&id.to_string())
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// List staff-side accounts (admin, librarian, staff)
    pub fn list_system_users(&self) -> Vec<User> {
        let mut users = self.store.users.load();
        users.retain(|u| u.role.is_system());
        users.sort_by_key(|u| u.id);
        users
    }

    /// Merge updated fields into an existing account
    pub fn update(&self, id: i64, request: UpdateUser) -> AppResult<User> {
        let users = self.store.users.load();
        if users.iter().all(|u| u.id != id) {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        if let Some(ref email) = request.email {
            if !validate::is_valid_email(email) {
                return Err(AppError::Validation("Invalid email address".to_string()));
            }
            if users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::Conflict("Email already registered".to_string()));
            }
        }

        let password_hash = match request.password.as_deref() {
            Some(password) => {
                validate::validate_password_strength(password)?;
                Some(self.hash_password(password)?)
            }
            None => None,
        };

        self.store.users.update(&id.to_string(), |user| {
            if let Some(username) = request.username {
                user.username = username;
            }
            if let Some(email) = request.email {
                user.email = email;
            }
            if let Some(role) = request.role {
                user.role = role;
            }
            if let Some(hash) = password_hash {
                user.password = hash;
            }
        })?;

        self.get(id)
    }

    /// Delete an account; the seed admin is protected
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let user = self.get(id)?;
        if user.email == SEED_ADMIN_EMAIL {
            return Err(AppError::BusinessRule(
                "The seed admin account cannot be deleted".to_string(),
            ));
        }
        self.store.users.delete(&id.to_string())?;
        tracing::info!(id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> (UsersService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path()).unwrap();
        (UsersService::new(store, AuthConfig::default()), dir)
    }

    #[test]
    fn test_seed_admin_created_once() {
        let (users, _dir) = service();
        users.seed_admin().unwrap();
        users.seed_admin().unwrap();
        assert_eq!(users.list_system_users().len(), 1);
    }

    #[test]
    fn test_seed_admin_protected_from_deletion() {
        let (users, _dir) = service();
        users.seed_admin().unwrap();
        let admin = users.list_system_users().pop().unwrap();
        assert!(matches!(
            users.delete(admin.id).unwrap_err(),
            AppError::BusinessRule(_)
        ));
    }

    #[test]
    fn test_register_and_authenticate() {
        let (users, _dir) = service();
        let user = users
            .register("alice", "alice@example.com", "Secret@123")
            .unwrap();
        assert_eq!(user.role, Role::User);

        let (token, authenticated) = users
            .authenticate("alice@example.com", "Secret@123")
            .unwrap();
        assert_eq!(authenticated.id, user.id);

        let claims = UserClaims::from_token(&token, &AuthConfig::default().jwt_secret).unwrap();
        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn test_wrong_password_rejected() {
        let (users, _dir) = service();
        users
            .register("alice", "alice@example.com", "Secret@123")
            .unwrap();
        assert!(matches!(
            users.authenticate("alice@example.com", "wrong").unwrap_err(),
            AppError::Authentication(_)
        ));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let (users, _dir) = service();
        users
            .register("alice", "alice@example.com", "Secret@123")
            .unwrap();
        assert!(matches!(
            users
                .register("bob", "alice@example.com", "Secret@123")
                .unwrap_err(),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            users
                .register("alice", "bob@example.com", "Secret@123")
                .unwrap_err(),
            AppError::Conflict(_)
        ));
    }

    #[test]
    fn test_weak_password_rejected() {
        let (users, _dir) = service();
        assert!(matches!(
            users
                .register("alice", "alice@example.com", "weakpass")
                .unwrap_err(),
            AppError::Validation(_)
        ));
    }
}
