pub mod auth;
pub mod pages;
pub mod resource;
pub mod upload;
pub mod users;
