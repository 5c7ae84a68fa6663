// src/handlers.rs

pub mod administradores;
pub mod agenda;
pub mod auth;
pub mod catalogo;
pub mod cliente;
pub mod dashboard;
pub mod empresas;
pub mod onboarding;
pub mod paginas;
pub mod usuarios;
