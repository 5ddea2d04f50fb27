use tracing::{info, warn};

use super::dto::{LoginRequest, RegisterRequest};
use super::jwt::JwtKeys;
use super::password::{equalize_timing, hash_password_async, verify_password_async};
use super::repo_types::{NewUser, User};
use crate::error::AppError;
use crate::store::Store;
use crate::validation::{is_valid_email, non_empty};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// A freshly issued token and the user it identifies.
#[derive(Debug)]
pub struct Session {
    pub token: String,
    pub user: User,
}

pub async fn register(
    store: &dyn Store,
    keys: &JwtKeys,
    req: RegisterRequest,
) -> Result<Session, AppError> {
    let (Some(email), Some(password), Some(first_name), Some(last_name)) = (
        non_empty(req.email),
        req.password.filter(|p| !p.is_empty()),
        non_empty(req.first_name),
        non_empty(req.last_name),
    ) else {
        return Err(AppError::Validation("Missing required fields".into()));
    };

    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }

    // Fast path only; the unique constraint is what actually guards concurrent sign-ups.
    if store.find_user_by_email(&email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::Conflict("User already exists".into()));
    }

    let password_hash = hash_password_async(password).await?;

    let user = store
        .create_user(&NewUser {
            email,
            password_hash,
            first_name,
            last_name,
            phone: non_empty(req.phone),
        })
        .await?;

    let token = keys.sign(user.id, &user.email)?;
    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(Session { token, user })
}

pub async fn login(
    store: &dyn Store,
    keys: &JwtKeys,
    req: LoginRequest,
) -> Result<Session, AppError> {
    let (Some(email), Some(password)) = (
        non_empty(req.email),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Validation("Email and password required".into()));
    };

    let Some(user) = store.find_user_by_email(&email).await? else {
        equalize_timing(password).await;
        warn!(%email, "login unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    if !verify_password_async(password, user.password_hash.clone()).await? {
        warn!(%email, user_id = user.id, "login invalid password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let token = keys.sign(user.id, &user.email)?;
    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(Session { token, user })
}

pub async fn get_profile(store: &dyn Store, user_id: i64) -> Result<User, AppError> {
    store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::{EmploymentStatus, VerificationStatus};
    use crate::config::JwtConfig;
    use crate::store::memory::MemoryStore;
    use rust_decimal::Decimal;

    fn keys() -> JwtKeys {
        JwtKeys::from_config(&JwtConfig {
            secret: "test-secret".into(),
            issuer: "iss".into(),
            audience: "aud".into(),
            ttl_hours: 24,
        })
    }

    fn registration(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: Some(email.into()),
            password: Some("pw123456".into()),
            first_name: Some("A".into()),
            last_name: Some("B".into()),
            phone: None,
        }
    }

    fn credentials(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[tokio::test]
    async fn register_creates_user_with_default_status() {
        let store = MemoryStore::new();
        let keys = keys();
        let session = register(&store, &keys, registration("a@x.com")).await.unwrap();

        assert_eq!(session.user.email, "a@x.com");
        assert_eq!(session.user.employment_status, EmploymentStatus::PendingVerification);
        assert_eq!(
            session.user.unemployment_verification_status,
            VerificationStatus::Pending
        );
        assert_eq!(session.user.fol_balance, Decimal::ZERO);
        assert_ne!(session.user.password_hash, "pw123456");

        let claims = keys.verify(&session.token).unwrap();
        assert_eq!(claims.sub, session.user.id);
        assert_eq!(claims.email, "a@x.com");
    }

    #[tokio::test]
    async fn register_twice_is_conflict() {
        let store = MemoryStore::new();
        let keys = keys();
        register(&store, &keys, registration("a@x.com")).await.unwrap();
        let err = register(&store, &keys, registration("a@x.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn concurrent_registrations_admit_exactly_one() {
        let store = MemoryStore::new();
        let keys = keys();
        let (a, b) = tokio::join!(
            register(&store, &keys, registration("race@x.com")),
            register(&store, &keys, registration("race@x.com")),
        );
        let ok = [a.is_ok(), b.is_ok()].iter().filter(|v| **v).count();
        assert_eq!(ok, 1);
        let err = a.err().or(b.err()).unwrap();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn email_match_is_case_sensitive() {
        let store = MemoryStore::new();
        let keys = keys();
        register(&store, &keys, registration("a@x.com")).await.unwrap();
        assert!(register(&store, &keys, registration("A@x.com")).await.is_ok());
    }

    #[tokio::test]
    async fn register_requires_all_fields() {
        let store = MemoryStore::new();
        let keys = keys();
        let cases = [
            RegisterRequest { email: None, ..registration("a@x.com") },
            RegisterRequest { password: Some(String::new()), ..registration("a@x.com") },
            RegisterRequest { first_name: Some("  ".into()), ..registration("a@x.com") },
            RegisterRequest { last_name: None, ..registration("a@x.com") },
        ];
        for req in cases {
            let err = register(&store, &keys, req).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m == "Missing required fields"));
        }
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn register_rejects_malformed_email() {
        let store = MemoryStore::new();
        let err = register(&store, &keys(), registration("not-an-email"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid email"));
    }

    #[tokio::test]
    async fn login_succeeds_with_right_password() {
        let store = MemoryStore::new();
        let keys = keys();
        let reg = register(&store, &keys, registration("a@x.com")).await.unwrap();
        let session = login(&store, &keys, credentials("a@x.com", "pw123456")).await.unwrap();
        assert_eq!(session.user.id, reg.user.id);
        assert_eq!(keys.verify(&session.token).unwrap().sub, reg.user.id);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let store = MemoryStore::new();
        let keys = keys();
        register(&store, &keys, registration("a@x.com")).await.unwrap();

        let wrong_password = login(&store, &keys, credentials("a@x.com", "nope"))
            .await
            .unwrap_err();
        let unknown_email = login(&store, &keys, credentials("b@x.com", "pw123456"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::Unauthorized(_)));
        assert!(matches!(unknown_email, AppError::Unauthorized(_)));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn login_requires_email_and_password() {
        let store = MemoryStore::new();
        let err = login(&store, &keys(), LoginRequest { email: Some("a@x.com".into()), password: None })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn profile_of_missing_user_is_not_found() {
        let store = MemoryStore::new();
        let err = get_profile(&store, 99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn profile_returns_registered_names() {
        let store = MemoryStore::new();
        let keys = keys();
        let reg = register(&store, &keys, registration("a@x.com")).await.unwrap();
        let user = get_profile(&store, reg.user.id).await.unwrap();
        assert_eq!(user.first_name, "A");
        assert_eq!(user.last_name, "B");
        assert_eq!(user.email, "a@x.com");
    }
}
