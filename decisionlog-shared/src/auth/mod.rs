/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and the registration password policy
/// - [`jwt`]: Access/refresh token issuance and validation
/// - [`middleware`]: Bearer token extraction into an [`middleware::AuthContext`]
/// - [`authorization`]: The resource/relation access policy
///
/// # Example
///
/// ```
/// use decisionlog_shared::auth::password::{hash_password, verify_password};
/// use decisionlog_shared::auth::jwt::{create_token, validate_token, Claims, TokenType};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password1")?;
/// assert!(verify_password("user_password1", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), TokenType::Access);
/// let token = create_token(&claims, "secret-key-of-at-least-32-bytes!")?;
/// assert_eq!(validate_token(&token, "secret-key-of-at-least-32-bytes!")?.sub, claims.sub);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
