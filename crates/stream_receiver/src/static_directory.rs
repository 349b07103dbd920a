//! Diretório servido a partir do `config.toml`.
//!
//! Substitui a sessão REST com o servidor AOS quando o receiver roda sozinho
//! (laboratório, emulador). As chamadas de controle de streaming só logam.

use async_trait::async_trait;
use std::collections::HashMap;
use stream_core::DirectoryConfig;
use tracing::info;

use crate::directory::{Blueprint, DeviceRecord, DirectoryClient, DirectoryError};

pub struct StaticDirectory {
    systems: HashMap<String, DeviceRecord>,
    blueprints: HashMap<String, Blueprint>,
}

impl StaticDirectory {
    pub fn from_config(config: &DirectoryConfig) -> Self {
        let systems = config
            .systems
            .iter()
            .map(|entry| {
                let record = DeviceRecord {
                    device_key: entry.device_key.clone(),
                    role: entry.role.clone(),
                    blueprint_id: entry.blueprint_id.clone(),
                    device_name: entry.device_name.clone(),
                };
                (entry.device_key.clone(), record)
            })
            .collect();

        let blueprints = config
            .blueprints
            .iter()
            .map(|entry| {
                let blueprint = Blueprint {
                    id: entry.id.clone(),
                    name: entry.name.clone(),
                };
                (entry.id.clone(), blueprint)
            })
            .collect();

        Self { systems, blueprints }
    }
}

#[async_trait]
impl DirectoryClient for StaticDirectory {
    async fn fetch_blueprints(&self) -> Result<HashMap<String, Blueprint>, DirectoryError> {
        Ok(self.blueprints.clone())
    }

    async fn fetch_systems(&self) -> Result<HashMap<String, DeviceRecord>, DirectoryError> {
        Ok(self.systems.clone())
    }

    async fn start_streaming(&self, kind: &str, address: &str, port: u16) -> Result<(), DirectoryError> {
        info!("Diretório estático: streaming {kind} esperado em {address}:{port}");
        Ok(())
    }

    async fn stop_streaming(&self) -> Result<(), DirectoryError> {
        info!("Diretório estático: streaming encerrado");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::DeviceDirectory;
    use stream_core::config::{BlueprintEntry, SystemEntry};

    #[tokio::test]
    async fn serves_configured_entries() {
        let config = DirectoryConfig {
            systems: vec![SystemEntry {
                device_key: "525400AA".into(),
                role: "spine".into(),
                blueprint_id: "bp-7".into(),
                device_name: "spine1".into(),
            }],
            blueprints: vec![BlueprintEntry {
                id: "bp-7".into(),
                name: "fabric".into(),
            }],
            ..Default::default()
        };
        let client = StaticDirectory::from_config(&config);

        let directory = DeviceDirectory::default();
        assert!(directory.refresh(&client).await);

        let tags = directory.tags_for("525400AA::swp1");
        assert_eq!(tags.get("device").map(String::as_str), Some("spine1"));
        assert_eq!(tags.get("blueprint").map(String::as_str), Some("fabric"));
        assert!(client.start_streaming("perfmon", "10.1.1.1", 7777).await.is_ok());
    }
}
