pub mod administrador;
pub mod agenda;
pub mod auth;
pub mod catalogo;
pub mod dashboard;
pub mod empresa;
pub mod usuario;
