extern crate chrono;
extern crate diesel;
extern crate tokio;

pub mod analytics;
pub mod config;
pub mod db;
pub mod geo;
pub mod logger;
pub mod models;
pub mod services;
pub mod storage;
pub mod web;
