//! Common types for the shared crate
//!
//! Utility types used across the backend

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Pagination query parameters
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PaginationParams {
    /// Calculate offset for SQL queries
    pub fn offset(&self) -> u32 {
        (self.page.max(1) - 1) * self.page_size
    }

    /// Get limit for SQL queries
    pub fn limit(&self) -> u32 {
        self.page_size.clamp(1, 100)
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}
