// src/lib.rs

pub mod app;
pub mod common;
pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod painel;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
