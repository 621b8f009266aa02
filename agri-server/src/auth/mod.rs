//! Módulo de autenticação e autorização
//!
//! - [`JwtService`] - serviço de tokens JWT
//! - [`CurrentUser`] - contexto do utilizador autenticado
//! - [`require_auth`] - middleware de autenticação
//! - [`require_role`] - middleware de papel mínimo
//! - [`permissions`] - papéis mínimos por acção

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{CurrentUserExt, require_auth, require_role};
