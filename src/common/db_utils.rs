use crate::common::error::AppError;

// Nomes das constraints criadas nas migrations
const EMPRESAS_EMAIL_KEY: &str = "empresas_email_key";
const EMPRESAS_SUBDOMINIO_KEY: &str = "empresas_subdominio_key";
const USUARIOS_EMAIL_KEY: &str = "usuarios_email_key";
const ADMINISTRADORES_EMAIL_KEY: &str = "administradores_email_key";
const AUTH_IDENTITIES_EMAIL_KEY: &str = "auth_identities_email_key";
const AGENDAMENTOS_HORARIO_KEY: &str = "agendamentos_horario_key";

/// Converte erros do sqlx no vocabulário da aplicação.
///
/// "Nenhuma linha" vira `RegistroNaoEncontrado`; é esse código que as
/// verificações de unicidade interpretam como "valor livre".
pub(crate) fn map_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::RowNotFound = e {
        return AppError::RegistroNaoEncontrado;
    }

    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    EMPRESAS_EMAIL_KEY
                    | USUARIOS_EMAIL_KEY
                    | ADMINISTRADORES_EMAIL_KEY
                    | AUTH_IDENTITIES_EMAIL_KEY => AppError::EmailAlreadyExists,
                    EMPRESAS_SUBDOMINIO_KEY => AppError::SubdominioJaExiste,
                    AGENDAMENTOS_HORARIO_KEY => AppError::Validacao("Este horário já está ocupado.".into()),
                    _ => AppError::UniqueConstraintViolation(constraint.to_string()),
                };
            }
        }
        if db_err.is_foreign_key_violation() {
            return AppError::Validacao("O registro referenciado não existe ou ainda está em uso.".into());
        }
    }

    e.into()
}

/// Interpreta o resultado de uma busca por chave única.
///
/// `true` somente quando a busca não encontrou linha. Linha encontrada ou
/// qualquer outro erro (que fica no log) dão `false`.
pub(crate) fn is_unico<T>(resultado: Result<T, AppError>, campo: &str, valor: &str) -> bool {
    match resultado {
        Err(AppError::RegistroNaoEncontrado) => true,
        Ok(_) => false,
        Err(e) => {
            tracing::warn!("Falha ao verificar unicidade de {} '{}': {:?}", campo, valor, e);
            false
        }
    }
}
