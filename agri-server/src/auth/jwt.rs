//! Serviço de tokens JWT
//!
//! Geração, validação e parsing de tokens JWT (HS256).

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use shared::models::Role;
use thiserror::Error;

/// Configuração JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Segredo JWT (mínimo 32 bytes)
    pub secret: String,
    /// Validade do token (minutos)
    pub expiration_minutes: i64,
    /// Emissor do token
    pub issuer: String,
    /// Audiência do token
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match load_jwt_secret() {
            Ok(key) => key,
            Err(e) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT configuration error: {}, using emergency key", e);
                    "emergency-fallback-key-must-be-replaced-in-production".to_string()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("FATAL: JWT_SECRET configuration failed: {}", e);
                }
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 24 horas por omissão
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "agri-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "agriconecta-clients".to_string()),
        }
    }
}

/// Claims guardados no token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Id do utilizador (subject)
    pub sub: String,
    /// Nome do utilizador
    pub nome: String,
    /// E-mail do utilizador
    pub email: String,
    /// Papel (um dos quatro literais do conjunto de papéis)
    pub role: String,
    /// Tipo de token
    pub token_type: String,
    /// Timestamp de expiração
    pub exp: i64,
    /// Timestamp de emissão
    pub iat: i64,
    /// Emissor
    pub iss: String,
    /// Audiência
    pub aud: String,
}

/// Erros JWT
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),

    #[error("key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Gera um segredo JWT seguro e imprimível (para ambiente de desenvolvimento)
pub fn generate_secure_printable_jwt_secret() -> Result<String, JwtError> {
    let allowed_chars =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";

    let rng = SystemRandom::new();
    let mut key = String::with_capacity(64);

    for _ in 0..64 {
        let mut byte = [0u8; 1];
        rng.fill(&mut byte).map_err(|_| {
            JwtError::KeyGenerationFailed("Failed to generate secure random key".to_string())
        })?;
        let idx = (byte[0] as usize) % allowed_chars.len();
        key.push(allowed_chars.as_bytes()[idx] as char);
    }

    Ok(key)
}

/// Carrega o segredo JWT do ambiente
fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(JwtError::ConfigError(
                    "JWT_SECRET must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret)
        }
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!(
                    "JWT_SECRET not set! Generating secure temporary key for development."
                );
                generate_secure_printable_jwt_secret()
            }
            #[cfg(not(debug_assertions))]
            {
                Err(JwtError::ConfigError(
                    "JWT_SECRET environment variable must be set in production!".to_string(),
                ))
            }
        }
    }
}

/// Serviço de tokens JWT
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Cria o serviço com a configuração por omissão
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// Cria o serviço com uma configuração específica
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Gera um token para o utilizador
    pub fn generate_token(
        &self,
        user_id: i64,
        nome: &str,
        email: &str,
        role: Role,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            nome: nome.to_string(),
            email: email.to_string(),
            role: role.as_str().to_string(),
            token_type: "access".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Valida e descodifica um token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extrai o token do header Authorization
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }

    /// Segundos restantes até à expiração
    pub fn get_expiration_seconds(&self, claims: &Claims) -> i64 {
        let now = Utc::now().timestamp();
        (claims.exp - now).max(0)
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Contexto do utilizador autenticado (derivado dos Claims)
///
/// Criado pelo middleware de autenticação e injectado nos handlers.
///
/// # Exemplo
///
/// ```ignore
/// async fn handler(user: CurrentUser) -> Json<()> {
///     if user.has_role(Role::Staff) {
///         // pode gerir encomendas
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Id do utilizador
    pub id: i64,
    /// Nome
    pub nome: String,
    /// E-mail
    pub email: String,
    /// Papel na hierarquia
    pub role: Role,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id: i64 = claims
            .sub
            .parse()
            .map_err(|_| format!("invalid subject: {}", claims.sub))?;
        let role: Role = claims
            .role
            .parse()
            .map_err(|_| format!("invalid role: {}", claims.role))?;

        Ok(Self {
            id,
            nome: claims.nome,
            email: claims.email,
            role,
        })
    }
}

impl CurrentUser {
    /// O papel do utilizador atinge o papel mínimo exigido?
    #[inline]
    pub fn has_role(&self, required: Role) -> bool {
        shared::models::has_role(self.role, required)
    }

    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }

    /// Id no formato usado no campo `actor` do histórico
    pub fn actor(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-key-with-at-least-32-bytes!".to_string(),
            expiration_minutes: 60,
            issuer: "agri-server".to_string(),
            audience: "agriconecta-clients".to_string(),
        })
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = test_service();

        let token = service
            .generate_token(42, "Maria dos Santos", "maria@exemplo.ao", Role::Staff)
            .expect("Failed to generate test token");

        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.nome, "Maria dos Santos");
        assert_eq!(claims.role, "STAFF");
    }

    #[test]
    fn test_current_user_from_claims() {
        let service = test_service();
        let token = service
            .generate_token(7, "Admin", "admin@exemplo.ao", Role::SuperAdmin)
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        let user = CurrentUser::try_from(claims).unwrap();
        assert_eq!(user.id, 7);
        assert!(user.is_super_admin());
        assert!(user.has_role(Role::Admin));
        assert_eq!(user.actor(), "7");
    }

    #[test]
    fn test_malformed_role_rejected() {
        let claims = Claims {
            sub: "1".to_string(),
            nome: "x".to_string(),
            email: "x@x".to_string(),
            role: "GOD".to_string(),
            token_type: "access".to_string(),
            exp: 0,
            iat: 0,
            iss: "i".to_string(),
            aud: "a".to_string(),
        };
        assert!(CurrentUser::try_from(claims).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = test_service();
        let token = service
            .generate_token(1, "x", "x@x.ao", Role::Customer)
            .unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(service.validate_token(&tampered).is_err());
    }
}
