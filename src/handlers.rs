pub mod auth;
pub mod cancellations;
pub mod categories;
pub mod charge_requests;
pub mod clients;
pub mod points;
pub mod pricing;
pub mod submissions;
