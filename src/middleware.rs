// src/middleware.rs

pub mod auth;
pub mod guard;
pub mod rbac;
pub mod session;
pub mod tenancy;
