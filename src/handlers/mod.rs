// ABOUTME: HTTP handlers for the practice records and dashboard endpoints
// ABOUTME: Each handler resolves the caller first, then delegates to owner-scoped storage calls

pub mod cases;
pub mod clients;
pub mod dashboard;
pub mod documents;
