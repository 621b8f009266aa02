//! Unified error codes for the AgriConecta backend
//!
//! This module defines all error codes used across the server and frontend.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Notification errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Product/category errors
//! - 7xxx: Invoice errors
//! - 8xxx: User errors
//! - 9xxx: System errors

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,
    /// Email is already registered
    EmailAlreadyRegistered = 1006,
    /// Password too short
    PasswordTooShort = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,
    /// Super admin role required
    SuperAdminRequired = 2004,
    /// Cannot change own role
    CannotChangeOwnRole = 2005,

    // ==================== 3xxx: Notification ====================
    /// E-mail dispatch failed
    EmailDispatchFailed = 3001,
    /// E-mail service is not configured
    EmailNotConfigured = 3002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order state literal is not a member of the state enum
    InvalidOrderState = 4002,
    /// Transition is not allowed by the lifecycle graph
    IllegalTransition = 4003,
    /// Concurrent transition detected (version conflict)
    OrderStateConflict = 4004,
    /// Order has no line items
    OrderEmpty = 4005,
    /// Order item not found
    OrderItemNotFound = 4006,

    // ==================== 5xxx: Payment ====================
    /// Payment processing failed
    PaymentFailed = 5001,
    /// Payment has already been confirmed
    PaymentAlreadyConfirmed = 5002,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Product is out of stock
    ProductOutOfStock = 6003,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category has products
    CategoryHasProducts = 6102,
    /// Category name already exists
    CategoryNameExists = 6103,

    // ==================== 7xxx: Invoice ====================
    /// Invoice not found
    InvoiceNotFound = 7001,
    /// Invoice number already taken
    InvoiceNumberTaken = 7002,

    // ==================== 8xxx: User ====================
    /// User not found
    UserNotFound = 8001,
    /// User e-mail already exists
    UserEmailExists = 8002,
    /// Cannot delete self
    UserCannotDeleteSelf = 8003,
    /// Role literal is not a member of the role set
    RoleInvalid = 8101,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::EmailAlreadyRegistered => "Email is already registered",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::SuperAdminRequired => "Super administrator role is required",
            ErrorCode::CannotChangeOwnRole => "Cannot change your own role",

            // Notification
            ErrorCode::EmailDispatchFailed => "E-mail dispatch failed",
            ErrorCode::EmailNotConfigured => "E-mail service is not configured",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::InvalidOrderState => "Invalid order state",
            ErrorCode::IllegalTransition => "Order state transition is not allowed",
            ErrorCode::OrderStateConflict => "Order was modified by a concurrent request",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::OrderItemNotFound => "Order item not found",

            // Payment
            ErrorCode::PaymentFailed => "Payment processing failed",
            ErrorCode::PaymentAlreadyConfirmed => "Payment has already been confirmed",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::ProductOutOfStock => "Product is out of stock",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryHasProducts => "Category has associated products",
            ErrorCode::CategoryNameExists => "Category name already exists",

            // Invoice
            ErrorCode::InvoiceNotFound => "Invoice not found",
            ErrorCode::InvoiceNumberTaken => "Invoice number already taken",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UserEmailExists => "User e-mail already exists",
            ErrorCode::UserCannotDeleteSelf => "Cannot delete your own account",
            ErrorCode::RoleInvalid => "Role is not a recognized value",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }

    /// Get the HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::Success => StatusCode::OK,

            // 404-class
            ErrorCode::NotFound
            | ErrorCode::OrderNotFound
            | ErrorCode::OrderItemNotFound
            | ErrorCode::ProductNotFound
            | ErrorCode::CategoryNotFound
            | ErrorCode::InvoiceNotFound
            | ErrorCode::UserNotFound => StatusCode::NOT_FOUND,

            // 409-class
            ErrorCode::AlreadyExists
            | ErrorCode::EmailAlreadyRegistered
            | ErrorCode::OrderStateConflict
            | ErrorCode::CategoryNameExists
            | ErrorCode::InvoiceNumberTaken
            | ErrorCode::UserEmailExists => StatusCode::CONFLICT,

            // 401-class
            ErrorCode::NotAuthenticated
            | ErrorCode::TokenExpired
            | ErrorCode::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 400-class auth failures (do not leak which part was wrong)
            ErrorCode::InvalidCredentials | ErrorCode::PasswordTooShort => {
                StatusCode::BAD_REQUEST
            }

            // 403-class
            ErrorCode::AccountDisabled
            | ErrorCode::PermissionDenied
            | ErrorCode::RoleRequired
            | ErrorCode::AdminRequired
            | ErrorCode::SuperAdminRequired
            | ErrorCode::CannotChangeOwnRole
            | ErrorCode::UserCannotDeleteSelf => StatusCode::FORBIDDEN,

            // 422-class business rules
            ErrorCode::IllegalTransition
            | ErrorCode::OrderEmpty
            | ErrorCode::CategoryHasProducts
            | ErrorCode::ProductOutOfStock
            | ErrorCode::PaymentAlreadyConfirmed => StatusCode::UNPROCESSABLE_ENTITY,

            // 5xx
            ErrorCode::EmailDispatchFailed
            | ErrorCode::EmailNotConfigured
            | ErrorCode::PaymentFailed
            | ErrorCode::InternalError
            | ErrorCode::DatabaseError
            | ErrorCode::NetworkError
            | ErrorCode::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,

            ErrorCode::TimeoutError => StatusCode::GATEWAY_TIMEOUT,

            // Everything else is a plain bad request
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            4 => ErrorCode::AlreadyExists,
            5 => ErrorCode::InvalidRequest,
            6 => ErrorCode::InvalidFormat,
            7 => ErrorCode::RequiredField,
            8 => ErrorCode::ValueOutOfRange,
            1001 => ErrorCode::NotAuthenticated,
            1002 => ErrorCode::InvalidCredentials,
            1003 => ErrorCode::TokenExpired,
            1004 => ErrorCode::TokenInvalid,
            1005 => ErrorCode::AccountDisabled,
            1006 => ErrorCode::EmailAlreadyRegistered,
            1007 => ErrorCode::PasswordTooShort,
            2001 => ErrorCode::PermissionDenied,
            2002 => ErrorCode::RoleRequired,
            2003 => ErrorCode::AdminRequired,
            2004 => ErrorCode::SuperAdminRequired,
            2005 => ErrorCode::CannotChangeOwnRole,
            3001 => ErrorCode::EmailDispatchFailed,
            3002 => ErrorCode::EmailNotConfigured,
            4001 => ErrorCode::OrderNotFound,
            4002 => ErrorCode::InvalidOrderState,
            4003 => ErrorCode::IllegalTransition,
            4004 => ErrorCode::OrderStateConflict,
            4005 => ErrorCode::OrderEmpty,
            4006 => ErrorCode::OrderItemNotFound,
            5001 => ErrorCode::PaymentFailed,
            5002 => ErrorCode::PaymentAlreadyConfirmed,
            6001 => ErrorCode::ProductNotFound,
            6002 => ErrorCode::ProductInvalidPrice,
            6003 => ErrorCode::ProductOutOfStock,
            6101 => ErrorCode::CategoryNotFound,
            6102 => ErrorCode::CategoryHasProducts,
            6103 => ErrorCode::CategoryNameExists,
            7001 => ErrorCode::InvoiceNotFound,
            7002 => ErrorCode::InvoiceNumberTaken,
            8001 => ErrorCode::UserNotFound,
            8002 => ErrorCode::UserEmailExists,
            8003 => ErrorCode::UserCannotDeleteSelf,
            8101 => ErrorCode::RoleInvalid,
            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::DatabaseError,
            9003 => ErrorCode::NetworkError,
            9004 => ErrorCode::TimeoutError,
            9005 => ErrorCode::ConfigError,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::NotAuthenticated,
            ErrorCode::PermissionDenied,
            ErrorCode::OrderNotFound,
            ErrorCode::IllegalTransition,
            ErrorCode::ProductOutOfStock,
            ErrorCode::UserNotFound,
            ErrorCode::DatabaseError,
        ] {
            let n: u16 = code.into();
            assert_eq!(ErrorCode::try_from(n), Ok(code));
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert_eq!(ErrorCode::try_from(12345), Err(InvalidErrorCode(12345)));
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::OrderNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::PermissionDenied.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ErrorCode::IllegalTransition.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::OrderStateConflict.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
    }
}
