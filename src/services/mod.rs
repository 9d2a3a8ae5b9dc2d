pub mod dashboard;
pub mod export_service;
pub mod identity_service;
pub mod lifecycle_service;
pub mod reference_service;
