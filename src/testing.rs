// src/testing.rs
//
// Implementações em memória dos stores e do provedor de identidade,
// usadas pelos testes dos serviços, do middleware e das rotas.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::{AppState, Stores, TelegramConfig},
    db::{AdministradorStore, AgendaStore, CatalogoStore, EmpresaStore, UsuarioStore},
    models::{
        administrador::{Administrador, AtualizarAdministradorPayload, NivelAcesso},
        agenda::{
            Agendamento, AtualizarServicoPayload, NovoAgendamentoPayload, NovoServicoPayload,
            Servico, StatusAgendamento,
        },
        auth::{AuthEvent, AuthResponse, Identity, IdentityMetadata},
        catalogo::{Plano, VeiculoComum},
        empresa::{AtualizarEmpresaPayload, Empresa, NovaEmpresa, StatusEmpresa},
        usuario::{AtualizarUsuarioPayload, NovoUsuario, RoleEmpresa, Usuario},
    },
    services::{identity::IdentityProvider, notificacao::TelegramNotifier},
};

pub const DOMINIO_TESTE: &str = "agendicar.com.br";

fn falha_simulada() -> AppError {
    AppError::DatabaseError(sqlx::Error::PoolTimedOut)
}

#[derive(Default)]
struct Dados {
    empresas: Vec<Empresa>,
    usuarios: Vec<Usuario>,
    administradores: Vec<Administrador>,
    planos: Vec<Plano>,
    veiculos: Vec<VeiculoComum>,
    servicos: Vec<Servico>,
    agendamentos: Vec<Agendamento>,
}

/// Todos os stores num só objeto, com as mesmas regras de unicidade e
/// cascata do banco.
#[derive(Default)]
pub struct MemoryStore {
    dados: Mutex<Dados>,
    falhar: AtomicBool,
    falhar_insercao_usuario: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn dados(&self) -> Result<MutexGuard<'_, Dados>, AppError> {
        if self.falhar.load(Ordering::SeqCst) {
            return Err(falha_simulada());
        }
        Ok(self.dados.lock().unwrap())
    }

    /// Toda chamada passa a falhar como se o banco estivesse fora do ar.
    pub fn simular_falha(&self, falhar: bool) {
        self.falhar.store(falhar, Ordering::SeqCst);
    }

    pub fn falhar_proxima_insercao_usuario(&self) {
        self.falhar_insercao_usuario.store(true, Ordering::SeqCst);
    }

    pub fn definir_plano(&self, empresa_id: Uuid, plano_id: Uuid) {
        let mut dados = self.dados.lock().unwrap();
        if let Some(empresa) = dados.empresas.iter_mut().find(|e| e.id == empresa_id) {
            empresa.plano_id = Some(plano_id);
        }
    }

    pub fn empresas_cadastradas(&self) -> Vec<Empresa> {
        self.dados.lock().unwrap().empresas.clone()
    }

    pub fn adicionar_veiculo(&self, marca: &str, modelo: &str) {
        let mut dados = self.dados.lock().unwrap();
        let id = dados.veiculos.len() as i32 + 1;
        dados.veiculos.push(VeiculoComum {
            id,
            marca: marca.into(),
            modelo: modelo.into(),
            porte: None,
        });
    }
}

#[async_trait]
impl EmpresaStore for MemoryStore {
    async fn listar(&self) -> Result<Vec<Empresa>, AppError> {
        Ok(self.dados()?.empresas.clone())
    }

    async fn buscar_por_id(&self, id: Uuid) -> Result<Empresa, AppError> {
        self.dados()?
            .empresas
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(AppError::RegistroNaoEncontrado)
    }

    async fn buscar_por_email(&self, email: &str) -> Result<Empresa, AppError> {
        self.dados()?
            .empresas
            .iter()
            .find(|e| e.email == email)
            .cloned()
            .ok_or(AppError::RegistroNaoEncontrado)
    }

    async fn buscar_por_subdominio(&self, subdominio: &str) -> Result<Empresa, AppError> {
        self.dados()?
            .empresas
            .iter()
            .find(|e| e.subdominio == subdominio)
            .cloned()
            .ok_or(AppError::RegistroNaoEncontrado)
    }

    async fn inserir(&self, nova: &NovaEmpresa) -> Result<Empresa, AppError> {
        let mut dados = self.dados()?;
        if dados.empresas.iter().any(|e| e.email == nova.email) {
            return Err(AppError::EmailAlreadyExists);
        }
        if dados.empresas.iter().any(|e| e.subdominio == nova.subdominio) {
            return Err(AppError::SubdominioJaExiste);
        }

        let agora = Utc::now();
        let empresa = Empresa {
            id: Uuid::new_v4(),
            nome: nova.nome.clone(),
            email: nova.email.clone(),
            telefone: nova.telefone.clone(),
            subdominio: nova.subdominio.clone(),
            status: StatusEmpresa::Ativo,
            plano_id: nova.plano_id,
            cnpj: nova.cnpj.clone(),
            endereco: nova.endereco.clone(),
            created_at: agora,
            updated_at: agora,
        };
        dados.empresas.insert(0, empresa.clone());
        Ok(empresa)
    }

    async fn atualizar(&self, id: Uuid, d: &AtualizarEmpresaPayload) -> Result<Empresa, AppError> {
        let mut dados = self.dados()?;
        if let Some(email) = &d.email {
            if dados.empresas.iter().any(|e| e.id != id && &e.email == email) {
                return Err(AppError::EmailAlreadyExists);
            }
        }
        if let Some(sub) = &d.subdominio {
            if dados.empresas.iter().any(|e| e.id != id && &e.subdominio == sub) {
                return Err(AppError::SubdominioJaExiste);
            }
        }

        let empresa = dados
            .empresas
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(AppError::RegistroNaoEncontrado)?;
        if let Some(v) = &d.nome {
            empresa.nome = v.clone();
        }
        if let Some(v) = &d.email {
            empresa.email = v.clone();
        }
        if let Some(v) = &d.telefone {
            empresa.telefone = Some(v.clone());
        }
        if let Some(v) = &d.subdominio {
            empresa.subdominio = v.clone();
        }
        if let Some(v) = d.plano_id {
            empresa.plano_id = Some(v);
        }
        if let Some(v) = &d.cnpj {
            empresa.cnpj = Some(v.clone());
        }
        if let Some(v) = &d.endereco {
            empresa.endereco = Some(v.clone());
        }
        empresa.updated_at = Utc::now();
        Ok(empresa.clone())
    }

    async fn alterar_status(&self, id: Uuid, status: StatusEmpresa) -> Result<Empresa, AppError> {
        let mut dados = self.dados()?;
        let empresa = dados
            .empresas
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(AppError::RegistroNaoEncontrado)?;
        empresa.status = status;
        empresa.updated_at = Utc::now();
        Ok(empresa.clone())
    }

    async fn remover(&self, id: Uuid) -> Result<(), AppError> {
        let mut dados = self.dados()?;
        let antes = dados.empresas.len();
        dados.empresas.retain(|e| e.id != id);
        if dados.empresas.len() == antes {
            return Err(AppError::RegistroNaoEncontrado);
        }
        // ON DELETE CASCADE
        dados.usuarios.retain(|u| u.empresa_id != id);
        dados.servicos.retain(|s| s.empresa_id != id);
        dados.agendamentos.retain(|a| a.empresa_id != id);
        Ok(())
    }
}

#[async_trait]
impl UsuarioStore for MemoryStore {
    async fn listar_por_empresa(&self, empresa_id: Uuid) -> Result<Vec<Usuario>, AppError> {
        Ok(self
            .dados()?
            .usuarios
            .iter()
            .filter(|u| u.empresa_id == empresa_id)
            .cloned()
            .collect())
    }

    async fn buscar_por_id(&self, id: Uuid) -> Result<Usuario, AppError> {
        self.dados()?
            .usuarios
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(AppError::RegistroNaoEncontrado)
    }

    async fn buscar_por_email(&self, email: &str) -> Result<Usuario, AppError> {
        self.dados()?
            .usuarios
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(AppError::RegistroNaoEncontrado)
    }

    async fn inserir(&self, novo: &NovoUsuario) -> Result<Usuario, AppError> {
        if self.falhar_insercao_usuario.swap(false, Ordering::SeqCst) {
            return Err(falha_simulada());
        }

        let mut dados = self.dados()?;
        if dados.usuarios.iter().any(|u| u.email == novo.email) {
            return Err(AppError::EmailAlreadyExists);
        }
        if !dados.empresas.iter().any(|e| e.id == novo.empresa_id) {
            return Err(AppError::RegistroNaoEncontrado);
        }

        let agora = Utc::now();
        let usuario = Usuario {
            id: novo.id,
            nome: novo.nome.clone(),
            email: novo.email.clone(),
            empresa_id: novo.empresa_id,
            role_empresa: novo.role_empresa,
            ativo: true,
            primeiro_acesso_concluido: false,
            telefone: novo.telefone.clone(),
            telegram_chat_id: novo.telegram_chat_id.clone(),
            created_at: agora,
            updated_at: agora,
        };
        dados.usuarios.insert(0, usuario.clone());
        Ok(usuario)
    }

    async fn atualizar(&self, id: Uuid, d: &AtualizarUsuarioPayload) -> Result<Usuario, AppError> {
        let mut dados = self.dados()?;
        let usuario = dados
            .usuarios
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::RegistroNaoEncontrado)?;
        if let Some(v) = &d.nome {
            usuario.nome = v.clone();
        }
        if let Some(v) = d.role_empresa {
            usuario.role_empresa = v;
        }
        if let Some(v) = d.ativo {
            usuario.ativo = v;
        }
        if let Some(v) = &d.telefone {
            usuario.telefone = Some(v.clone());
        }
        if let Some(v) = &d.telegram_chat_id {
            usuario.telegram_chat_id = Some(v.clone());
        }
        usuario.updated_at = Utc::now();
        Ok(usuario.clone())
    }

    async fn marcar_primeiro_acesso(&self, id: Uuid) -> Result<Usuario, AppError> {
        let mut dados = self.dados()?;
        let usuario = dados
            .usuarios
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::RegistroNaoEncontrado)?;
        usuario.primeiro_acesso_concluido = true;
        usuario.updated_at = Utc::now();
        Ok(usuario.clone())
    }

    async fn remover(&self, id: Uuid) -> Result<(), AppError> {
        let mut dados = self.dados()?;
        let antes = dados.usuarios.len();
        dados.usuarios.retain(|u| u.id != id);
        if dados.usuarios.len() == antes {
            return Err(AppError::RegistroNaoEncontrado);
        }
        Ok(())
    }

    async fn contar(&self, empresa_id: Option<Uuid>) -> Result<i64, AppError> {
        let dados = self.dados()?;
        let total = dados
            .usuarios
            .iter()
            .filter(|u| empresa_id.is_none_or(|id| u.empresa_id == id))
            .count();
        Ok(total as i64)
    }
}

#[async_trait]
impl AdministradorStore for MemoryStore {
    async fn listar(&self) -> Result<Vec<Administrador>, AppError> {
        let mut administradores = self.dados()?.administradores.clone();
        administradores.sort_by(|a, b| a.nome.cmp(&b.nome));
        Ok(administradores)
    }

    async fn buscar_por_id(&self, id: Uuid) -> Result<Administrador, AppError> {
        self.dados()?
            .administradores
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(AppError::RegistroNaoEncontrado)
    }

    async fn buscar_por_email(&self, email: &str) -> Result<Administrador, AppError> {
        self.dados()?
            .administradores
            .iter()
            .find(|a| a.email == email)
            .cloned()
            .ok_or(AppError::RegistroNaoEncontrado)
    }

    async fn inserir(
        &self,
        id: Uuid,
        nome: &str,
        email: &str,
        nivel_acesso: NivelAcesso,
    ) -> Result<Administrador, AppError> {
        let mut dados = self.dados()?;
        if dados.administradores.iter().any(|a| a.email == email) {
            return Err(AppError::EmailAlreadyExists);
        }

        let administrador = Administrador {
            id,
            nome: nome.into(),
            email: email.into(),
            nivel_acesso,
            ativo: true,
            created_at: Utc::now(),
        };
        dados.administradores.push(administrador.clone());
        Ok(administrador)
    }

    async fn atualizar(&self, id: Uuid, d: &AtualizarAdministradorPayload) -> Result<Administrador, AppError> {
        let mut dados = self.dados()?;
        let administrador = dados
            .administradores
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AppError::RegistroNaoEncontrado)?;
        if let Some(v) = &d.nome {
            administrador.nome = v.clone();
        }
        if let Some(v) = d.nivel_acesso {
            administrador.nivel_acesso = v;
        }
        if let Some(v) = d.ativo {
            administrador.ativo = v;
        }
        Ok(administrador.clone())
    }

    async fn remover(&self, id: Uuid) -> Result<(), AppError> {
        let mut dados = self.dados()?;
        let antes = dados.administradores.len();
        dados.administradores.retain(|a| a.id != id);
        if dados.administradores.len() == antes {
            return Err(AppError::RegistroNaoEncontrado);
        }
        Ok(())
    }
}

#[async_trait]
impl AgendaStore for MemoryStore {
    async fn listar_servicos(&self, empresa_id: Uuid) -> Result<Vec<Servico>, AppError> {
        let mut servicos: Vec<_> = self
            .dados()?
            .servicos
            .iter()
            .filter(|s| s.empresa_id == empresa_id)
            .cloned()
            .collect();
        servicos.sort_by(|a, b| a.nome.cmp(&b.nome));
        Ok(servicos)
    }

    async fn buscar_servico(&self, empresa_id: Uuid, id: Uuid) -> Result<Servico, AppError> {
        self.dados()?
            .servicos
            .iter()
            .find(|s| s.empresa_id == empresa_id && s.id == id)
            .cloned()
            .ok_or(AppError::RegistroNaoEncontrado)
    }

    async fn inserir_servico(&self, empresa_id: Uuid, d: &NovoServicoPayload) -> Result<Servico, AppError> {
        let servico = Servico {
            id: Uuid::new_v4(),
            empresa_id,
            nome: d.nome.clone(),
            descricao: d.descricao.clone(),
            preco: d.preco,
            duracao_minutos: d.duracao_minutos,
            ativo: true,
            created_at: Utc::now(),
        };
        self.dados()?.servicos.push(servico.clone());
        Ok(servico)
    }

    async fn atualizar_servico(
        &self,
        empresa_id: Uuid,
        id: Uuid,
        d: &AtualizarServicoPayload,
    ) -> Result<Servico, AppError> {
        let mut dados = self.dados()?;
        let servico = dados
            .servicos
            .iter_mut()
            .find(|s| s.empresa_id == empresa_id && s.id == id)
            .ok_or(AppError::RegistroNaoEncontrado)?;
        if let Some(v) = &d.nome {
            servico.nome = v.clone();
        }
        if let Some(v) = &d.descricao {
            servico.descricao = Some(v.clone());
        }
        if let Some(v) = d.preco {
            servico.preco = v;
        }
        if let Some(v) = d.duracao_minutos {
            servico.duracao_minutos = v;
        }
        if let Some(v) = d.ativo {
            servico.ativo = v;
        }
        Ok(servico.clone())
    }

    async fn remover_servico(&self, empresa_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut dados = self.dados()?;
        let antes = dados.servicos.len();
        dados.servicos.retain(|s| !(s.empresa_id == empresa_id && s.id == id));
        if dados.servicos.len() == antes {
            return Err(AppError::RegistroNaoEncontrado);
        }
        Ok(())
    }

    async fn listar_agendamentos(
        &self,
        empresa_id: Uuid,
        de: NaiveDate,
        ate: NaiveDate,
    ) -> Result<Vec<Agendamento>, AppError> {
        let mut agendamentos: Vec<_> = self
            .dados()?
            .agendamentos
            .iter()
            .filter(|a| a.empresa_id == empresa_id && a.data >= de && a.data <= ate)
            .cloned()
            .collect();
        agendamentos.sort_by_key(|a| (a.data, a.hora));
        Ok(agendamentos)
    }

    async fn buscar_agendamento(&self, empresa_id: Uuid, id: Uuid) -> Result<Agendamento, AppError> {
        self.dados()?
            .agendamentos
            .iter()
            .find(|a| a.empresa_id == empresa_id && a.id == id)
            .cloned()
            .ok_or(AppError::RegistroNaoEncontrado)
    }

    async fn horario_ocupado(&self, empresa_id: Uuid, data: NaiveDate, hora: NaiveTime) -> Result<bool, AppError> {
        Ok(self.dados()?.agendamentos.iter().any(|a| {
            a.empresa_id == empresa_id && a.data == data && a.hora == hora && a.status.ocupa_horario()
        }))
    }

    async fn inserir_agendamento(
        &self,
        empresa_id: Uuid,
        d: &NovoAgendamentoPayload,
    ) -> Result<Agendamento, AppError> {
        let agendamento = Agendamento {
            id: Uuid::new_v4(),
            empresa_id,
            servico_id: d.servico_id,
            cliente_nome: d.cliente_nome.clone(),
            cliente_telefone: d.cliente_telefone.clone(),
            placa_veiculo: d.placa_veiculo.clone(),
            modelo_veiculo: d.modelo_veiculo.clone(),
            data: d.data,
            hora: d.hora,
            status: StatusAgendamento::Agendado,
            observacoes: d.observacoes.clone(),
            created_at: Utc::now(),
        };
        self.dados()?.agendamentos.push(agendamento.clone());
        Ok(agendamento)
    }

    async fn alterar_status_agendamento(
        &self,
        empresa_id: Uuid,
        id: Uuid,
        status: StatusAgendamento,
    ) -> Result<Agendamento, AppError> {
        let mut dados = self.dados()?;
        let agendamento = dados
            .agendamentos
            .iter_mut()
            .find(|a| a.empresa_id == empresa_id && a.id == id)
            .ok_or(AppError::RegistroNaoEncontrado)?;
        agendamento.status = status;
        Ok(agendamento.clone())
    }

    async fn remover_agendamento(&self, empresa_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut dados = self.dados()?;
        let antes = dados.agendamentos.len();
        dados.agendamentos.retain(|a| !(a.empresa_id == empresa_id && a.id == id));
        if dados.agendamentos.len() == antes {
            return Err(AppError::RegistroNaoEncontrado);
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogoStore for MemoryStore {
    async fn listar_planos(&self) -> Result<Vec<Plano>, AppError> {
        let mut planos: Vec<_> = self.dados()?.planos.iter().filter(|p| p.ativo).cloned().collect();
        planos.sort_by_key(|p| p.preco_mensal);
        Ok(planos)
    }

    async fn buscar_plano(&self, id: Uuid) -> Result<Plano, AppError> {
        self.dados()?
            .planos
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(AppError::RegistroNaoEncontrado)
    }

    async fn listar_veiculos(&self, marca: Option<&str>) -> Result<Vec<VeiculoComum>, AppError> {
        let mut veiculos: Vec<_> = self
            .dados()?
            .veiculos
            .iter()
            .filter(|v| marca.is_none_or(|m| v.marca.eq_ignore_ascii_case(m)))
            .cloned()
            .collect();
        veiculos.sort_by(|a, b| (&a.marca, &a.modelo).cmp(&(&b.marca, &b.modelo)));
        Ok(veiculos)
    }
}

// ---
// Identidade
// ---

struct Conta {
    identity: Identity,
    senha: String,
}

/// Provedor de identidade em memória. Senhas ficam em texto puro e os
/// tokens são opacos (`token-<uuid>`).
pub struct MemoryIdentityProvider {
    contas: Mutex<Vec<Conta>>,
    sessoes: Mutex<HashMap<String, Uuid>>,
    falhar_cadastro: AtomicBool,
    events: broadcast::Sender<AuthEvent>,
}

impl MemoryIdentityProvider {
    pub fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(16);
        Arc::new(Self {
            contas: Mutex::new(Vec::new()),
            sessoes: Mutex::new(HashMap::new()),
            falhar_cadastro: AtomicBool::new(false),
            events,
        })
    }

    pub fn buscar(&self, email: &str) -> Option<Identity> {
        self.contas
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.identity.email == email)
            .map(|c| c.identity.clone())
    }

    pub fn falhar_proximo_cadastro(&self) {
        self.falhar_cadastro.store(true, Ordering::SeqCst);
    }

    /// Abre uma sessão sem senha e devolve o token.
    pub fn login_direto(&self, identity_id: Uuid) -> String {
        let token = format!("token-{}", Uuid::new_v4());
        self.sessoes.lock().unwrap().insert(token.clone(), identity_id);
        token
    }

    pub fn emitir(&self, event: AuthEvent) {
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str, metadata: IdentityMetadata) -> Result<Identity, AppError> {
        if self.falhar_cadastro.swap(false, Ordering::SeqCst) {
            return Err(AppError::InternalServerError(anyhow::anyhow!("cadastro recusado")));
        }

        let mut contas = self.contas.lock().unwrap();
        if contas.iter().any(|c| c.identity.email == email) {
            return Err(AppError::EmailAlreadyExists);
        }

        let identity = Identity {
            id: Uuid::new_v4(),
            email: email.into(),
            metadata,
            created_at: Utc::now(),
        };
        contas.push(Conta {
            identity: identity.clone(),
            senha: password.into(),
        });
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let identity = self
            .contas
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.identity.email == email && c.senha == password)
            .map(|c| c.identity.clone())
            .ok_or(AppError::InvalidCredentials)?;

        let token = self.login_direto(identity.id);
        self.emitir(AuthEvent::SignedIn(identity.clone()));
        Ok(AuthResponse { token, identity })
    }

    async fn sign_out(&self, token: &str) -> Result<(), AppError> {
        self.sessoes
            .lock()
            .unwrap()
            .remove(token)
            .ok_or(AppError::InvalidToken)?;
        self.emitir(AuthEvent::SignedOut);
        Ok(())
    }

    async fn get_identity(&self, token: &str) -> Result<Identity, AppError> {
        let id = *self
            .sessoes
            .lock()
            .unwrap()
            .get(token)
            .ok_or(AppError::InvalidToken)?;

        self.contas
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.identity.id == id)
            .map(|c| c.identity.clone())
            .ok_or(AppError::InvalidToken)
    }

    async fn update_password(&self, identity_id: Uuid, new_password: &str) -> Result<Identity, AppError> {
        let identity = {
            let mut contas = self.contas.lock().unwrap();
            let conta = contas
                .iter_mut()
                .find(|c| c.identity.id == identity_id)
                .ok_or(AppError::RegistroNaoEncontrado)?;
            conta.senha = new_password.into();
            conta.identity.metadata.senha_provisoria = false;
            conta.identity.clone()
        };
        self.emitir(AuthEvent::UserUpdated(identity.clone()));
        Ok(identity)
    }

    async fn delete_identity(&self, identity_id: Uuid) -> Result<(), AppError> {
        let mut contas = self.contas.lock().unwrap();
        let antes = contas.len();
        contas.retain(|c| c.identity.id != identity_id);
        if contas.len() == antes {
            return Err(AppError::RegistroNaoEncontrado);
        }
        self.sessoes.lock().unwrap().retain(|_, id| *id != identity_id);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

// ---
// Dados de exemplo
// ---

pub async fn empresa_exemplo(store: &Arc<MemoryStore>, subdominio: &str) -> Empresa {
    EmpresaStore::inserir(
        store.as_ref(),
        &NovaEmpresa {
            nome: format!("Lava Rápido {}", subdominio),
            email: format!("contato@{}.com", subdominio),
            telefone: None,
            subdominio: subdominio.into(),
            plano_id: None,
            cnpj: None,
            endereco: None,
        },
    )
    .await
    .unwrap()
}

pub async fn plano_exemplo(store: &Arc<MemoryStore>, limite_usuarios: Option<i32>) -> Plano {
    let plano = Plano {
        id: Uuid::new_v4(),
        nome: "Básico".into(),
        preco_mensal: Decimal::new(4990, 2),
        limite_usuarios,
        ativo: true,
    };
    store.dados.lock().unwrap().planos.push(plano.clone());
    plano
}

/// Usuário só no store (sem identidade).
pub async fn usuario_exemplo(store: &Arc<MemoryStore>, empresa_id: Uuid, email: &str) -> Usuario {
    UsuarioStore::inserir(
        store.as_ref(),
        &NovoUsuario {
            id: Uuid::new_v4(),
            nome: "Usuário".into(),
            email: email.into(),
            empresa_id,
            role_empresa: RoleEmpresa::Funcionario,
            telefone: None,
            telegram_chat_id: None,
        },
    )
    .await
    .unwrap()
}

/// Usuário com identidade e sessão aberta. Devolve o token.
pub async fn usuario_logado(
    store: &Arc<MemoryStore>,
    identity: &Arc<MemoryIdentityProvider>,
    empresa_id: Uuid,
    email: &str,
    role_empresa: RoleEmpresa,
) -> (Usuario, String) {
    let conta = identity
        .sign_up(email, "senha-teste", IdentityMetadata::default())
        .await
        .unwrap();
    let usuario = UsuarioStore::inserir(
        store.as_ref(),
        &NovoUsuario {
            id: conta.id,
            nome: "Usuário".into(),
            email: email.into(),
            empresa_id,
            role_empresa,
            telefone: None,
            telegram_chat_id: None,
        },
    )
    .await
    .unwrap();
    let token = identity.login_direto(conta.id);
    (usuario, token)
}

pub async fn admin_exemplo(
    store: &Arc<MemoryStore>,
    identity: &Arc<MemoryIdentityProvider>,
    email: &str,
    nivel_acesso: NivelAcesso,
) -> Administrador {
    let conta = identity
        .sign_up(email, "senha-teste", IdentityMetadata::default())
        .await
        .unwrap();
    AdministradorStore::inserir(store.as_ref(), conta.id, "Operador", email, nivel_acesso)
        .await
        .unwrap()
}

pub fn notificador_desligado() -> TelegramNotifier {
    let config = TelegramConfig {
        bot_token: None,
        api_url: "http://127.0.0.1:9".into(),
        timeout_secs: 1,
    };
    TelegramNotifier::new(&config, DOMINIO_TESTE).unwrap()
}

pub fn estado_em_memoria(store: &Arc<MemoryStore>, identity: &Arc<MemoryIdentityProvider>) -> AppState {
    let stores = Stores {
        empresas: store.clone(),
        usuarios: store.clone(),
        administradores: store.clone(),
        agenda: store.clone(),
        catalogo: store.clone(),
    };
    AppState::new(stores, identity.clone(), notificador_desligado(), DOMINIO_TESTE.into())
}
