pub mod auth;
pub mod health;
pub mod investment_projects;
pub mod regions;
pub mod roles;
pub mod users;
