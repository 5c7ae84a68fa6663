// src/painel.rs

//! Auxiliar de reconciliação do lado do cliente: a cópia local de uma
//! lista do painel (usuários, empresas, serviços...) mantida por quem
//! consome a API como biblioteca. O servidor não usa este módulo.
//!
//! Cada alteração só é aplicada depois que a chamada remota confirma; em
//! caso de erro a lista fica como estava. Não há nova tentativa: uma
//! chamada, no máximo uma alteração.

use std::future::Future;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        administrador::Administrador,
        agenda::{Agendamento, Servico},
        empresa::Empresa,
        usuario::Usuario,
    },
};

pub trait Identificavel {
    fn id(&self) -> Uuid;
}

macro_rules! identificavel {
    ($($tipo:ty),* $(,)?) => {
        $(impl Identificavel for $tipo {
            fn id(&self) -> Uuid {
                self.id
            }
        })*
    };
}

identificavel!(Usuario, Empresa, Administrador, Servico, Agendamento);

#[derive(Debug, Clone)]
pub struct ListaReconciliada<T> {
    itens: Vec<T>,
}

impl<T> Default for ListaReconciliada<T> {
    fn default() -> Self {
        Self { itens: Vec::new() }
    }
}

impl<T: Identificavel> ListaReconciliada<T> {
    pub fn new(itens: Vec<T>) -> Self {
        Self { itens }
    }

    pub fn itens(&self) -> &[T] {
        &self.itens
    }

    pub fn len(&self) -> usize {
        self.itens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itens.is_empty()
    }

    /// Novo item entra no topo da lista.
    pub async fn criar<F>(&mut self, operacao: F) -> Result<&T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        let item = operacao.await?;
        self.itens.insert(0, item);
        Ok(&self.itens[0])
    }

    /// Substitui o item de mesmo id pelo que o servidor devolveu.
    pub async fn atualizar<F>(&mut self, operacao: F) -> Result<&T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        let item = operacao.await?;
        match self.itens.iter().position(|i| i.id() == item.id()) {
            Some(pos) => {
                self.itens[pos] = item;
                Ok(&self.itens[pos])
            }
            None => {
                self.itens.insert(0, item);
                Ok(&self.itens[0])
            }
        }
    }

    pub async fn remover<F>(&mut self, id: Uuid, operacao: F) -> Result<(), AppError>
    where
        F: Future<Output = Result<(), AppError>>,
    {
        operacao.await?;
        self.itens.retain(|i| i.id() != id);
        Ok(())
    }
}
