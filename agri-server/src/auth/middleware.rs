//! Middleware de autenticação
//!
//! Middleware Axum para autenticação JWT e verificação de papéis

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::models::Role;

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// Rotas públicas do storefront: catálogo em leitura, registo e login.
///
/// Tudo o resto sob `/api/` exige um token válido.
fn is_public_api_route(method: &http::Method, path: &str) -> bool {
    if path == "/api/auth/login" || path == "/api/auth/register" || path == "/api/health" {
        return true;
    }
    // Catálogo público (apenas leitura)
    *method == http::Method::GET
        && (path.starts_with("/api/produtos") || path.starts_with("/api/categorias"))
}

/// Middleware de autenticação — exige login
///
/// Extrai e valida o JWT do header `Authorization: Bearer <token>`.
/// Em caso de sucesso injecta [`CurrentUser`] nas extensões do pedido.
///
/// # Erros
///
/// | Erro | HTTP |
/// |------|------|
/// | Sem header Authorization | 401 |
/// | Token expirado | 401 TokenExpired |
/// | Token inválido | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // CORS preflight passa sem autenticação
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Rotas fora de /api/ seguem (404 normal)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_api_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::try_from(claims)
                .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Middleware de verificação de papel — exige um papel mínimo
///
/// # Uso
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/produtos", post(handler::create))
///     .layer(middleware::from_fn(require_role(Role::Staff)));
/// ```
///
/// # Erros
///
/// Papel insuficiente devolve 403 Forbidden.
pub fn require_role(
    min_role: Role,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::unauthorized())?;

            if !user.has_role(min_role) {
                security_log!(
                    "WARN",
                    "role_denied",
                    user_id = user.id,
                    user_role = user.role.as_str(),
                    required_role = min_role.as_str()
                );
                return Err(AppError::forbidden(format!(
                    "Requires role {} or higher",
                    min_role
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

/// Extensão para obter o CurrentUser de um pedido
pub trait CurrentUserExt {
    /// Obtém o CurrentUser das extensões do pedido
    ///
    /// # Erros
    ///
    /// Não autenticado devolve 401.
    fn current_user(&self) -> Result<&CurrentUser, AppError>;
}

impl CurrentUserExt for Request {
    fn current_user(&self) -> Result<&CurrentUser, AppError> {
        self.extensions()
            .get::<CurrentUser>()
            .ok_or(AppError::unauthorized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes() {
        let get = http::Method::GET;
        let post = http::Method::POST;

        assert!(is_public_api_route(&post, "/api/auth/login"));
        assert!(is_public_api_route(&post, "/api/auth/register"));
        assert!(is_public_api_route(&get, "/api/produtos"));
        assert!(is_public_api_route(&get, "/api/produtos/42"));
        assert!(is_public_api_route(&get, "/api/categorias"));

        // Mutações do catálogo não são públicas
        assert!(!is_public_api_route(&post, "/api/produtos"));
        // Encomendas exigem sempre login
        assert!(!is_public_api_route(&get, "/api/encomendas"));
        assert!(!is_public_api_route(&post, "/api/encomendas"));
    }
}
