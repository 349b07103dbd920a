//! Coleta de métricas do host e montagem das mensagens do streaming.
//!
//! Cada interface de rede vira um `interface_counters` com origem
//! `<device_key>::<interface>`; CPU, memória, processos e arquivos vão num
//! único `system_resource_counters` com origem `<device_key>`.

use std::time::{SystemTime, UNIX_EPOCH};
use stream_core::AosMessage;
use stream_core::proto::{
    AlertSeverity, AosAlert, AosEvent, FileInfo, InterfaceCounters, PerfMonData, ProcessInfo,
    StreamingEvent, StreamingStatus, SystemInfo, SystemResourceCounters, TestAlert, aos_alert,
    aos_event, aos_message,
};
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, Networks, ProcessesToUpdate, RefreshKind, System};
use tracing::debug;

/// Monitor do host emulando um device.
pub struct DeviceMonitor {
    device_key: String,
    max_processes: usize,
    watched_files: Vec<String>,
    sys: System,
    networks: Networks,
}

impl DeviceMonitor {
    pub fn new(device_key: &str, max_processes: usize, watched_files: &[String]) -> Self {
        let sys = System::new_with_specifics(
            RefreshKind::nothing()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );

        Self {
            device_key: device_key.to_string(),
            max_processes,
            watched_files: watched_files.to_vec(),
            sys,
            networks: Networks::new_with_refreshed_list(),
        }
    }

    /// Atualiza os contadores e retorna as mensagens do ciclo.
    pub fn collect(&mut self) -> Vec<AosMessage> {
        self.sys.refresh_cpu_all();
        self.sys.refresh_memory();
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
        self.networks.refresh(true);

        let mut messages: Vec<AosMessage> = self
            .networks
            .iter()
            .map(|(name, data)| {
                let counters = InterfaceCounters {
                    tx_unicast_packets: data.total_packets_transmitted(),
                    tx_bytes: data.total_transmitted(),
                    rx_unicast_packets: data.total_packets_received(),
                    rx_bytes: data.total_received(),
                    tx_error_packets: data.total_errors_on_transmitted(),
                    rx_error_packets: data.total_errors_on_received(),
                    ..Default::default()
                };
                interface_message(&self.device_key, name, counters)
            })
            .collect();

        let resources = SystemResourceCounters {
            system_info: Some(self.system_info()),
            process_info: top_processes(self.processes(), self.max_processes),
            file_info: file_infos(&self.watched_files),
        };
        messages.push(resources_message(&self.device_key, resources));
        messages
    }

    fn system_info(&self) -> SystemInfo {
        // sysinfo não separa user/system: todo o uso vai para cpu_user.
        let usage = f64::from(self.sys.global_cpu_usage()).clamp(0.0, 100.0);
        SystemInfo {
            cpu_user: usage,
            cpu_system: 0.0,
            cpu_idle: 100.0 - usage,
            memory_used: self.sys.used_memory(),
            memory_total: self.sys.total_memory(),
        }
    }

    fn processes(&self) -> Vec<ProcessInfo> {
        self.sys
            .processes()
            .values()
            .map(|process| ProcessInfo {
                process_name: process.name().to_string_lossy().into_owned(),
                cpu_user: f64::from(process.cpu_usage()),
                cpu_system: 0.0,
                memory_usage: process.memory(),
            })
            .collect()
    }
}

// ──────────────────────────────────────────────
// Montagem das mensagens
// ──────────────────────────────────────────────

fn now_secs() -> Option<u64> {
    SystemTime::now().duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}

fn message(origin: String, data: aos_message::Data) -> AosMessage {
    AosMessage {
        origin_name: origin,
        timestamp: now_secs(),
        data: Some(data),
    }
}

pub fn interface_message(device_key: &str, interface: &str, counters: InterfaceCounters) -> AosMessage {
    message(
        format!("{device_key}::{interface}"),
        aos_message::Data::PerfMon(PerfMonData {
            interface_counters: Some(counters),
            system_resource_counters: None,
        }),
    )
}

pub fn resources_message(device_key: &str, resources: SystemResourceCounters) -> AosMessage {
    message(
        device_key.to_string(),
        aos_message::Data::PerfMon(PerfMonData {
            interface_counters: None,
            system_resource_counters: Some(resources),
        }),
    )
}

/// Evento de streaming conectado, enviado logo após o connect.
pub fn streaming_event(device_key: &str, address: &str, port: u16) -> AosMessage {
    message(
        device_key.to_string(),
        aos_message::Data::Event(AosEvent {
            data: Some(aos_event::Data::Streaming(StreamingEvent {
                status: StreamingStatus::Connected as i32,
                address: address.to_string(),
                port: u32::from(port),
            })),
        }),
    )
}

pub fn test_alert(device_key: &str, text: &str) -> AosMessage {
    message(
        device_key.to_string(),
        aos_message::Data::Alert(AosAlert {
            first_seen: now_secs().unwrap_or_default(),
            severity: AlertSeverity::Info as i32,
            raised: true,
            data: Some(aos_alert::Data::TestAlert(TestAlert {
                message: text.to_string(),
            })),
        }),
    )
}

/// Os `n` processos com maior uso de CPU.
pub fn top_processes(mut processes: Vec<ProcessInfo>, n: usize) -> Vec<ProcessInfo> {
    processes.sort_by(|a, b| b.cpu_user.total_cmp(&a.cpu_user));
    processes.truncate(n);
    processes
}

/// Tamanho dos arquivos monitorados; arquivos inacessíveis são ignorados.
pub fn file_infos(paths: &[String]) -> Vec<FileInfo> {
    paths
        .iter()
        .filter_map(|path| match std::fs::metadata(path) {
            Ok(meta) => Some(FileInfo {
                file_name: path.clone(),
                file_size: meta.len(),
            }),
            Err(e) => {
                debug!("Ignorando {path}: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(name: &str, cpu: f64) -> ProcessInfo {
        ProcessInfo {
            process_name: name.into(),
            cpu_user: cpu,
            ..Default::default()
        }
    }

    #[test]
    fn top_processes_by_cpu() {
        let all = vec![process("a", 1.0), process("b", 30.0), process("c", 12.5)];
        let names: Vec<_> = top_processes(all, 2).into_iter().map(|p| p.process_name).collect();
        assert_eq!(names, ["b", "c"]);
    }

    #[test]
    fn missing_files_are_skipped() {
        let manifest = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml").to_string();
        let infos = file_infos(&[manifest.clone(), "/nao/existe.log".into()]);
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].file_name, manifest);
        assert!(infos[0].file_size > 0);
    }

    #[test]
    fn interface_origin_uses_separator() {
        let msg = interface_message("EMU01", "eth0", InterfaceCounters::default());
        assert_eq!(msg.origin_name, "EMU01::eth0");
        assert!(msg.timestamp.is_some());
    }

    #[test]
    fn test_alert_is_raised() {
        match test_alert("EMU01", "ping").data {
            Some(aos_message::Data::Alert(alert)) => {
                assert!(alert.raised);
                assert!(matches!(alert.data, Some(aos_alert::Data::TestAlert(_))));
            }
            other => panic!("esperado alerta, veio {other:?}"),
        }
    }
}
