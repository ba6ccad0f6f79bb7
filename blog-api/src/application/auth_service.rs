use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use tracing::info;

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::{DomainError, FieldErrors};
use crate::domain::password_policy::PasswordPolicy;
use crate::domain::user::{EMAIL_TAKEN, SignupForm, SignupRequest, USERNAME_TAKEN, User};
use crate::infrastructure::jwt::{JwtService, TokenPair};

#[derive(Debug, Clone)]
pub(crate) struct SignupResult {
    pub(crate) user: User,
    pub(crate) tokens: TokenPair,
}

pub(crate) struct AuthService {
    repo: Arc<dyn UserRepository>,
    jwt: JwtService,
    policy: PasswordPolicy,
}

impl AuthService {
    pub(crate) fn new(
        repo: Arc<dyn UserRepository>,
        jwt: JwtService,
        policy: PasswordPolicy,
    ) -> Self {
        Self { repo, jwt, policy }
    }

    pub(crate) async fn signup(&self, req: SignupRequest) -> Result<SignupResult, DomainError> {
        let form = req.validate(&self.policy)?;
        self.ensure_unique(&form).await?;

        let password_hash = self.hash_password(&form.password)?;
        let user = self
            .repo
            .create_user(Self::into_new_user(form, password_hash))
            .await?;

        let tokens = self
            .jwt
            .issue_pair(user.id)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        info!(user_id = user.id, username = %user.username, "user signed up");
        Ok(SignupResult { user, tokens })
    }

    /// Both conflicts are reported together. The unique indexes still guard against races.
    async fn ensure_unique(&self, form: &SignupForm) -> Result<(), DomainError> {
        let mut errors = FieldErrors::new();
        if self.repo.find_by_username(&form.username).await?.is_some() {
            errors.add("username", USERNAME_TAKEN);
        }
        if self.repo.find_by_email(&form.email).await?.is_some() {
            errors.add("email", EMAIL_TAKEN);
        }
        errors.finish(())
    }

    fn hash_password(&self, raw_password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Self::argon2()?
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(password_hash.to_string())
    }

    fn into_new_user(form: SignupForm, password_hash: String) -> NewUser {
        NewUser {
            username: form.username,
            email: form.email,
            password_hash,
            first_name: form.first_name,
            last_name: form.last_name,
        }
    }

    fn argon2() -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(19 * 1024, 2, 1, None)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}
