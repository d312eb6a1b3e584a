pub mod user_repo;
pub use user_repo::UserRepository;
pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod points_repo;
pub use points_repo::PointsRepository;
pub mod charge_repo;
pub use charge_repo::ChargeRepository;
pub mod submission_repo;
pub use submission_repo::SubmissionRepository;
pub mod cancellation_repo;
pub use cancellation_repo::CancellationRepository;
pub mod pricing_repo;
pub use pricing_repo::PricingRepository;
pub mod category_repo;
pub use category_repo::CategoryRepository;
