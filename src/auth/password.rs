use crate::error::AppError;
use actix_web::web;
use bcrypt::{hash, verify};

/// Hashes `password` with bcrypt at the given cost.
///
/// Runs on actix's blocking pool so the hash never stalls a worker thread.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    let digest = web::block(move || hash(password, cost)).await??;
    Ok(digest)
}

/// Checks `password` against a stored bcrypt digest, off the worker thread.
pub async fn verify_password(password: String, hashed_password: String) -> Result<bool, AppError> {
    let matches = web::block(move || verify(password, &hashed_password)).await??;
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[actix_rt::test]
    async fn test_password_hashing_and_verification() {
        let hashed = hash_password("test_password123".into(), TEST_COST)
            .await
            .unwrap();

        assert_ne!(hashed, "test_password123");
        assert!(verify_password("test_password123".into(), hashed.clone())
            .await
            .unwrap());
        assert!(!verify_password("wrong_password".into(), hashed).await.unwrap());
    }

    #[actix_rt::test]
    async fn test_same_password_hashes_differently() {
        let first = hash_password("secret1".into(), TEST_COST).await.unwrap();
        let second = hash_password("secret1".into(), TEST_COST).await.unwrap();
        assert_ne!(first, second);
    }

    #[actix_rt::test]
    async fn test_verify_with_invalid_hash() {
        match verify_password("test_password123".into(), "invalidhashformat".into()).await {
            Err(AppError::InternalError(msg)) => assert!(msg.contains("password hashing failed")),
            Ok(false) => {}
            Ok(true) => panic!("Password verification should fail for invalid hash format"),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }
}
