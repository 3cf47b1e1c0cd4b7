pub mod access;
pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod image;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod response;
pub mod routes;
pub mod schema;
pub mod services;
pub mod state;
