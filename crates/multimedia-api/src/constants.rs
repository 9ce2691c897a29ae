//! API constants

/// Versioned prefix every resource route is mounted under
pub const API_PREFIX: &str = "/api/v0";
