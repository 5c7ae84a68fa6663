// src/common/agenda.rs

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike, Weekday};

// Horário comercial padrão dos lava-rápidos
pub const HORA_ABERTURA: (u32, u32) = (8, 0);
pub const HORA_FECHAMENTO: (u32, u32) = (18, 0);
pub const INTERVALO_MINUTOS: i64 = 30;

// Segunda a sábado
pub const DIAS_FUNCIONAMENTO: [Weekday; 6] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

pub fn abertura() -> NaiveTime {
    NaiveTime::from_hms_opt(HORA_ABERTURA.0, HORA_ABERTURA.1, 0).unwrap_or(NaiveTime::MIN)
}

pub fn fechamento() -> NaiveTime {
    NaiveTime::from_hms_opt(HORA_FECHAMENTO.0, HORA_FECHAMENTO.1, 0).unwrap_or(NaiveTime::MIN)
}

/// Data de hoje no relógio local do servidor.
pub fn hoje() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// `true` quando `data` é anterior ao dia `hoje`.
///
/// A comparação é por dia: qualquer horário de hoje (inclusive meia-noite)
/// não está no passado.
pub fn is_date_in_past(data: NaiveDate, hoje: NaiveDate) -> bool {
    data < hoje
}

pub fn is_dia_util(data: NaiveDate) -> bool {
    DIAS_FUNCIONAMENTO.contains(&data.weekday())
}

/// Todos os horários de início possíveis num dia de funcionamento.
/// O último horário termina exatamente no fechamento.
pub fn gerar_horarios(data: NaiveDate) -> Vec<NaiveTime> {
    if !is_dia_util(data) {
        return Vec::new();
    }

    let passo = Duration::minutes(INTERVALO_MINUTOS);
    let fim = fechamento();
    let mut atual = abertura();
    let mut horarios = Vec::new();

    while atual + passo <= fim {
        horarios.push(atual);
        atual += passo;
    }

    horarios
}

/// Verifica se `hora` é um dos horários de início válidos (dentro do
/// expediente e alinhado ao intervalo).
pub fn is_horario_valido(hora: NaiveTime) -> bool {
    let passo = Duration::minutes(INTERVALO_MINUTOS);
    if hora < abertura() || hora >= fechamento() || hora + passo > fechamento() {
        return false;
    }

    let minutos_desde_abertura = (hora - abertura()).num_minutes();
    minutos_desde_abertura % INTERVALO_MINUTOS == 0 && hora.second() == 0 && hora.nanosecond() == 0
}
