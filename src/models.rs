pub mod auth;
pub mod cancellation;
pub mod category;
pub mod charge;
pub mod client;
pub mod points;
pub mod pricing;
pub mod review;
pub mod submission;
