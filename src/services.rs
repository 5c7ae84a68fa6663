// src/services.rs

pub mod administrador_service;
pub mod agenda_service;
pub mod dashboard_service;
pub mod empresa_service;
pub mod identity;
pub mod notificacao;
pub mod onboarding_service;
pub mod usuario_service;

pub use administrador_service::AdministradorService;
pub use agenda_service::AgendaService;
pub use dashboard_service::DashboardService;
pub use empresa_service::EmpresaService;
pub use identity::{IdentityProvider, PgIdentityProvider};
pub use notificacao::TelegramNotifier;
pub use onboarding_service::OnboardingService;
pub use usuario_service::UsuarioService;
