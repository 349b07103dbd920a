//! Configuração unificada via TOML.
//!
//! Um único `config.toml` ao lado do executável, com as seções
//! `[receiver]`, `[directory]` e `[sender]`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Erros ao salvar a configuração.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Erro de serialização TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Erro de escrita em {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// O que fazer quando o peer fecha no meio de um payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortPayloadPolicy {
    /// Comportamento legado: loga e tenta decodificar mesmo assim.
    #[default]
    Decode,
    /// Hardening: fecha a conexão sem decodificar.
    Abort,
}

/// Configuração do Receiver (listener de streaming).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    /// IP local para bind
    pub address: String,
    /// Porta TCP
    pub port: u16,
    /// Endereço que o servidor AOS usa para conectar neste receiver
    pub advertise_address: String,
    /// Tipos de streaming solicitados: "perfmon", "alerts", "events"
    pub streaming_types: Vec<String>,
    /// Intervalo de refresh do diretório (segundos)
    pub refresh_interval_secs: u64,
    /// Timeout de conexão ociosa (segundos, 0 = desabilitado)
    pub idle_timeout_secs: u64,
    /// Política para payload curto
    pub short_payload: ShortPayloadPolicy,
    /// Capacidade do channel entre sink e saída
    pub sink_capacity: usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".into(),
            port: 7777,
            advertise_address: "127.0.0.1".into(),
            streaming_types: vec!["perfmon".into(), "alerts".into(), "events".into()],
            refresh_interval_secs: 30,
            idle_timeout_secs: 0,
            short_payload: ShortPayloadPolicy::Decode,
            sink_capacity: 4096,
        }
    }
}

impl ReceiverConfig {
    /// Endereço de bind no formato `ip:porta`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// Device conhecido pelo diretório estático.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemEntry {
    pub device_key: String,
    pub role: String,
    pub blueprint_id: String,
    pub device_name: String,
}

/// Blueprint conhecido pelo diretório estático.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlueprintEntry {
    pub id: String,
    pub name: String,
}

/// Conexão com o servidor de diretório (AOS) e entradas estáticas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub server: String,
    pub port: u16,
    pub login: String,
    pub password: String,
    /// Devices servidos pelo diretório estático
    pub systems: Vec<SystemEntry>,
    /// Blueprints servidos pelo diretório estático
    pub blueprints: Vec<BlueprintEntry>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            server: "127.0.0.1".into(),
            port: 443,
            login: "admin".into(),
            password: "admin".into(),
            systems: Vec::new(),
            blueprints: Vec::new(),
        }
    }
}

/// Configuração do Sender (emulador de device).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    /// IP do receiver
    pub dest_ip: String,
    /// Porta TCP do receiver
    pub port: u16,
    /// Chave do device emulado (origin_name)
    pub device_key: String,
    /// Intervalo de envio em segundos
    pub interval_secs: f64,
    /// Quantos processos (por uso de CPU) enviar por ciclo
    pub max_processes: usize,
    /// Arquivos cujo tamanho é enviado em `file_info`
    pub watched_files: Vec<String>,
    /// Envia um `test_alert` levantado logo após conectar
    pub send_test_alert: bool,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            dest_ip: "127.0.0.1".into(),
            port: 7777,
            device_key: "EMU0000001".into(),
            interval_secs: 5.0,
            max_processes: 5,
            watched_files: Vec::new(),
            send_test_alert: false,
        }
    }
}

/// Configuração raiz do aplicativo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub receiver: ReceiverConfig,
    pub directory: DirectoryConfig,
    pub sender: SenderConfig,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        // Porta 0 no receiver é válida: o SO escolhe e a porta real é anunciada
        if self.receiver.refresh_interval_secs == 0 {
            errors.push("Intervalo de refresh do diretório não pode ser 0".into());
        }
        if self.receiver.sink_capacity == 0 {
            errors.push("Capacidade do sink não pode ser 0".into());
        }
        for kind in &self.receiver.streaming_types {
            if !matches!(kind.as_str(), "perfmon" | "alerts" | "events") {
                errors.push(format!("Tipo de streaming desconhecido: {kind}"));
            }
        }
        for system in &self.directory.systems {
            if system.device_key.is_empty() {
                errors.push("Device sem device_key no diretório".into());
            }
        }
        if self.sender.port == 0 {
            errors.push("Porta do sender não pode ser 0".into());
        }
        if self.sender.interval_secs < 0.1 || self.sender.interval_secs > 3600.0 {
            errors.push(format!(
                "Intervalo do sender inválido: {} (0.1–3600.0)",
                self.sender.interval_secs
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        let errors = config.validate();
        assert!(errors.is_empty(), "Erros: {:?}", errors);
    }

    #[test]
    fn roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.receiver.port, parsed.receiver.port);
        assert_eq!(config.receiver.short_payload, parsed.receiver.short_payload);
        assert_eq!(config.sender.device_key, parsed.sender.device_key);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let partial = r#"
[receiver]
port = 9999
short_payload = "abort"

[[directory.systems]]
device_key = "5254001A2B3C"
role = "leaf"
"#;
        let config: AppConfig = toml::from_str(partial).unwrap();
        assert_eq!(config.receiver.port, 9999);
        assert_eq!(config.receiver.short_payload, ShortPayloadPolicy::Abort);
        // Outros campos devem ter valor padrão
        assert_eq!(config.receiver.refresh_interval_secs, 30);
        assert_eq!(config.directory.systems.len(), 1);
        assert_eq!(config.directory.systems[0].role, "leaf");
        assert!(config.directory.systems[0].blueprint_id.is_empty());
        assert_eq!(config.sender.port, 7777);
    }

    #[test]
    fn receiver_port_zero_is_accepted() {
        let mut config = AppConfig::default();
        config.receiver.port = 0;
        assert!(config.validate().is_empty());

        config.sender.port = 0;
        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn unknown_streaming_type_is_reported() {
        let mut config = AppConfig::default();
        config.receiver.streaming_types.push("syslog".into());
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("syslog"));
    }

    #[test]
    fn bind_address_format() {
        let config = ReceiverConfig {
            address: "127.0.0.1".into(),
            port: 9000,
            ..Default::default()
        };
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
    }
}
