// src/common/texto.rs
//
// Normalização de entrada. Roda antes do `validate()`: o validador de
// e-mail recusa espaços nas pontas e `length(min = 1)` aceita "   ".

/// Payloads que chegam do cliente e precisam ser aparados.
pub trait Normalizar {
    fn normalizado(self) -> Self;
}

pub fn normalizar_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn aparar(texto: String) -> String {
    let aparado = texto.trim();
    if aparado.len() == texto.len() {
        texto
    } else {
        aparado.to_string()
    }
}

pub fn aparar_opcional(texto: Option<String>) -> Option<String> {
    texto.map(aparar)
}
