use std::sync::{Arc, OnceLock};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenKeys;
use crate::error::AppError;
use crate::store::Store;

/// Plaintext behind the digest an unknown-email login is checked against.
const DUMMY_PASSWORD: &str = "taskminder-unknown-account";

/// Registration and login.
///
/// Both operations end by issuing a token for the authenticated identity; no
/// server-side session is created.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    keys: Arc<TokenKeys>,
    bcrypt_cost: u32,
    /// Digest at `bcrypt_cost`, hashed on the first login for an unknown email.
    dummy_digest: Arc<OnceLock<String>>,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, keys: Arc<TokenKeys>, bcrypt_cost: u32) -> Self {
        Self {
            store,
            keys,
            bcrypt_cost,
            dummy_digest: Arc::new(OnceLock::new()),
        }
    }

    /// Creates the account and returns a fresh token for it.
    ///
    /// Fails with `AppError::Conflict` if the email is already registered.
    pub async fn register(&self, email: &str, password: String) -> Result<String, AppError> {
        if self.store.find_user_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".into()));
        }

        let password_hash = hash_password(password, self.bcrypt_cost).await?;
        let user = self.store.create_user(email, &password_hash).await?;
        log::info!("registered user {}", user.id);

        self.keys.issue(user.id, &user.email)
    }

    /// Checks the credentials and returns a fresh token.
    ///
    /// An unknown email and a wrong password both yield
    /// `AppError::InvalidCredentials`, and both pay for a bcrypt verify.
    pub async fn login(&self, email: &str, password: String) -> Result<String, AppError> {
        let Some(user) = self.store.find_user_by_email(email).await? else {
            let digest = self.unknown_account_digest().await?;
            verify_password(password, digest).await?;
            log::info!("login failed: unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(password, user.password_hash.clone()).await? {
            log::info!("login failed for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        self.keys.issue(user.id, &user.email)
    }

    async fn unknown_account_digest(&self) -> Result<String, AppError> {
        if let Some(digest) = self.dummy_digest.get() {
            return Ok(digest.clone());
        }
        let digest = hash_password(DUMMY_PASSWORD.to_string(), self.bcrypt_cost).await?;
        Ok(self.dummy_digest.get_or_init(|| digest).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn service() -> (AuthService, Arc<TokenKeys>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let keys = Arc::new(TokenKeys::new("service_test_secret"));
        let service = AuthService::new(store.clone(), keys.clone(), 4);
        (service, keys, store)
    }

    #[actix_rt::test]
    async fn test_register_then_login() {
        let (auth, keys, _) = service();

        let registered = auth.register("a@x.com", "secret1".into()).await.unwrap();
        let logged_in = auth.login("a@x.com", "secret1".into()).await.unwrap();

        assert_ne!(registered, logged_in);
        let first = keys.verify(&registered).unwrap();
        let second = keys.verify(&logged_in).unwrap();
        assert_eq!(first.email, "a@x.com");
        assert_eq!((first.id, first.email), (second.id, second.email));
    }

    #[actix_rt::test]
    async fn test_register_duplicate_email() {
        let (auth, _, store) = service();
        auth.register("a@x.com", "secret1".into()).await.unwrap();
        let original = store.find_user_by_email("a@x.com").await.unwrap().unwrap();

        let err = auth.register("a@x.com", "other-password".into()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref msg) if msg == "User already exists"));

        let after = store.find_user_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(after.id, original.id);
        assert_eq!(after.password_hash, original.password_hash);
    }

    #[actix_rt::test]
    async fn test_register_stores_digest_not_plaintext() {
        let (auth, _, store) = service();
        auth.register("a@x.com", "secret1".into()).await.unwrap();

        let user = store.find_user_by_email("a@x.com").await.unwrap().unwrap();
        assert_ne!(user.password_hash, "secret1");
        assert!(user.password_hash.starts_with("$2"));
    }

    #[actix_rt::test]
    async fn test_login_failures_are_indistinguishable() {
        let (auth, _, _) = service();
        auth.register("a@x.com", "secret1".into()).await.unwrap();

        let wrong_password = auth.login("a@x.com", "wrong!!".into()).await.unwrap_err();
        let unknown_email = auth.login("nobody@x.com", "secret1".into()).await.unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[actix_rt::test]
    async fn test_unknown_email_login_verifies_against_digest_at_configured_cost() {
        let (auth, _, _) = service();
        assert!(auth.dummy_digest.get().is_none());

        let err = auth.login("nobody@x.com", "secret1".into()).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));

        let digest = auth.dummy_digest.get().cloned().unwrap();
        assert!(digest.starts_with("$2"));
        assert_eq!(&digest[4..7], "04$");

        // Reused on later misses, including the dummy plaintext itself.
        let err = auth.login("nobody@x.com", DUMMY_PASSWORD.into()).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        assert_eq!(auth.dummy_digest.get(), Some(&digest));
    }
}
