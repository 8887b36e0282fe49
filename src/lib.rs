pub mod api;
pub mod config;
pub mod db;
pub mod deck;
pub mod errors;
pub mod generation;
pub mod handlers;
pub mod images;
pub mod models;
pub mod pipeline;
