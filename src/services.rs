pub mod auth;
pub mod cancellation_service;
pub mod category_service;
pub mod charge_service;
pub mod client_service;
pub mod ledger_service;
pub mod pricing_service;
pub mod statement_service;
pub mod submission_service;
