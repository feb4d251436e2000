pub mod auth;
pub mod chat;
pub mod health;
pub mod helpers;
pub mod models;
pub mod upload;
