//! Cache do diretório de devices e enriquecimento por origem.
//!
//! O snapshot é imutável e publicado por troca atômica ([`ArcSwap`]): as
//! tasks de conexão leem sem lock e enxergam sempre o snapshot antigo ou o
//! novo inteiro, nunca um meio-termo. Só a task de refresh escreve.

use arc_swap::ArcSwap;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use stream_core::Tags;
use stream_core::metric::DEVICE_TAG;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Separador entre device key e interface no `origin_name`.
pub const ORIGIN_SEPARATOR: &str = "::";

/// Metadados de um device gerenciado.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceRecord {
    pub device_key: String,
    pub role: String,
    pub blueprint_id: String,
    pub device_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blueprint {
    pub id: String,
    pub name: String,
}

/// Visão imutável do diretório num instante.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    /// device_key → device
    pub systems: HashMap<String, DeviceRecord>,
    /// blueprint id → blueprint
    pub blueprints: HashMap<String, Blueprint>,
}

impl DirectorySnapshot {
    pub fn new(systems: HashMap<String, DeviceRecord>, blueprints: HashMap<String, Blueprint>) -> Self {
        Self { systems, blueprints }
    }

    /// Nome do blueprint do device, se resolvível.
    pub fn blueprint_name(&self, device: &DeviceRecord) -> Option<&str> {
        self.blueprints
            .get(&device.blueprint_id)
            .map(|bp| bp.name.as_str())
            .filter(|name| !name.is_empty())
    }
}

/// Erros do colaborador de diretório.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Servidor de diretório indisponível: {0}")]
    Unavailable(String),

    #[error("Requisição rejeitada ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Resposta inválida do diretório: {0}")]
    InvalidResponse(String),
}

/// Colaborador externo: sessão REST com o servidor AOS.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    async fn fetch_blueprints(&self) -> Result<HashMap<String, Blueprint>, DirectoryError>;

    async fn fetch_systems(&self) -> Result<HashMap<String, DeviceRecord>, DirectoryError>;

    /// Pede ao servidor que abra streaming de `kind` para `address:port`.
    async fn start_streaming(&self, kind: &str, address: &str, port: u16) -> Result<(), DirectoryError>;

    async fn stop_streaming(&self) -> Result<(), DirectoryError>;
}

/// Separa `"<key>::<iface>"` em `(key, Some(iface))`; sem separador, `(origin, None)`.
pub fn split_origin(origin: &str) -> (&str, Option<&str>) {
    match origin.split_once(ORIGIN_SEPARATOR) {
        Some((key, iface)) => (key, Some(iface)),
        None => (origin, None),
    }
}

// ──────────────────────────────────────────────
// Cache
// ──────────────────────────────────────────────

/// Diretório compartilhado entre as conexões.
pub struct DeviceDirectory {
    current: ArcSwap<DirectorySnapshot>,
}

impl Default for DeviceDirectory {
    fn default() -> Self {
        Self::new(DirectorySnapshot::default())
    }
}

impl DeviceDirectory {
    pub fn new(initial: DirectorySnapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }

    /// Snapshot corrente.
    pub fn snapshot(&self) -> Arc<DirectorySnapshot> {
        self.current.load_full()
    }

    pub fn publish(&self, snapshot: DirectorySnapshot) {
        self.current.store(Arc::new(snapshot));
    }

    /// Busca blueprints e devices e publica um novo snapshot.
    ///
    /// Falha numa das buscas mantém a parte correspondente do snapshot
    /// anterior. Retorna `true` se as duas buscas tiveram sucesso.
    pub async fn refresh(&self, client: &dyn DirectoryClient) -> bool {
        let previous = self.snapshot();
        let mut complete = true;

        let blueprints = match client.fetch_blueprints().await {
            Ok(blueprints) => blueprints,
            Err(e) => {
                warn!(error = %e, "Falha ao buscar blueprints, mantendo lista anterior");
                complete = false;
                previous.blueprints.clone()
            }
        };

        let systems = match client.fetch_systems().await {
            Ok(systems) => systems,
            Err(e) => {
                warn!(error = %e, "Falha ao buscar devices, mantendo lista anterior");
                complete = false;
                previous.systems.clone()
            }
        };

        debug!(
            systems = systems.len(),
            blueprints = blueprints.len(),
            "Diretório atualizado"
        );
        self.publish(DirectorySnapshot::new(systems, blueprints));
        complete
    }

    /// Loop de refresh periódico. Única task que escreve no diretório.
    pub async fn run_refresh(
        self: Arc<Self>,
        client: Arc<dyn DirectoryClient>,
        period: Duration,
        cancel: CancellationToken,
    ) {
        let start = tokio::time::Instant::now() + period;
        let mut ticker = tokio::time::interval_at(start, period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!("Refresh do diretório a cada {}s", period.as_secs());
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.refresh(client.as_ref()).await;
                }
            }
        }
        debug!("Task de refresh do diretório encerrada");
    }

    /// Tags de enriquecimento para um `origin_name`.
    ///
    /// Sempre: `device_key`, `device` e `interface` (se houver). Com device
    /// conhecido: `role`, `blueprint`, `device_name`, e `device` passa a ser
    /// o nome do device.
    pub fn tags_for(&self, origin: &str) -> Tags {
        let (device_key, interface) = split_origin(origin);
        let mut tags = Tags::new();

        if let Some(interface) = interface {
            tags.insert("interface".into(), interface.to_string());
        }
        tags.insert("device_key".into(), device_key.to_string());

        let snapshot = self.current.load();
        let Some(device) = snapshot.systems.get(device_key) else {
            tags.insert(DEVICE_TAG.into(), device_key.to_string());
            return tags;
        };

        if !device.role.is_empty() {
            tags.insert("role".into(), device.role.clone());
        }
        if let Some(blueprint) = snapshot.blueprint_name(device) {
            tags.insert("blueprint".into(), blueprint.to_string());
        }
        if device.device_name.is_empty() {
            tags.insert(DEVICE_TAG.into(), device_key.to_string());
        } else {
            tags.insert("device_name".into(), device.device_name.clone());
            tags.insert(DEVICE_TAG.into(), device.device_name.clone());
        }
        tags
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
