use anyhow::anyhow;
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{self, SaltString, rand_core::OsRng},
};
use tracing::warn;

/// Argon2id cost parameters. Fixed for the life of the process; digests
/// carry their own parameters, so older digests keep verifying after a change.
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
        }
    }
}

#[derive(Clone)]
pub struct PasswordHashing {
    argon2: Argon2<'static>,
    /// Digest of a throwaway password, hashed with the live parameters.
    decoy: String,
}

impl PasswordHashing {
    pub fn new(config: &PasswordConfig) -> anyhow::Result<Self> {
        let params = Params::new(config.memory_kib, config.iterations, Params::DEFAULT_P_COST, None)
            .map_err(|e| anyhow!("invalid argon2 parameters: {}", e))?;

        let mut hashing = Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            decoy: String::new(),
        };
        hashing.decoy = hashing.hash("carlot-decoy-password")?;

        Ok(hashing)
    }

    /// Salted one-way digest in PHC string format.
    pub fn hash(&self, password: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("password hashing failed: {}", e))?
            .to_string();

        Ok(digest)
    }

    /// `Ok(false)` on mismatch. Errors only when the stored digest is unreadable.
    pub fn verify(&self, password: &str, digest: &str) -> anyhow::Result<bool> {
        let parsed = PasswordHash::new(digest).map_err(|e| anyhow!("corrupt password digest: {}", e))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(anyhow!("password verification failed: {}", e)),
        }
    }

    /// Spend a full verification on a login for a name that does not exist,
    /// so it costs the same as a wrong password for a real one.
    pub fn verify_decoy(&self, password: &str) {
        if let Err(e) = self.verify(password, &self.decoy) {
            warn!("Decoy verification failed: {}", e);
        }
    }
}
