//! HTTP clients for reportcap's external collaborators
//!
//! Two services sit outside the capture pipeline: the backend report store
//! (definitions and instances) and the notifications subsystem (delivery
//! channels). Neither client retries; retry and backoff policy belong to the
//! caller or its scheduler.

pub mod backend;
pub mod notifications;

pub use backend::BackendClient;
pub use notifications::NotificationsClient;
