pub mod auth;
pub mod diet_plan;
pub mod error;
pub mod member;
pub mod membership;
