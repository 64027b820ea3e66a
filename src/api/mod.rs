// API routes and handlers

pub mod generate;
pub mod health;
pub mod progress;
pub mod routes;
pub mod schedule;
pub mod templates;
