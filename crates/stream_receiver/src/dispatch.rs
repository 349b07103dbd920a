//! Decodificação e despacho das mensagens do streaming.
//!
//! Cada [`AosMessage`] carrega no máximo um de {PerfMon, Event, Alert}. Para
//! eventos e alertas, o tipo concreto é a variante preenchida do oneof; o
//! `match` exaustivo abaixo associa cada variante a `(nome, registro)` e o
//! flattener genérico faz o resto. Variante vazia ou desconhecida cai num
//! único caminho de log.

use std::sync::Arc;
use stream_core::flatten::{self, Occurrence, Record, SymbolicEnum};
use stream_core::metric::{self, Fields, MetricRecord, MetricSink, Scalar, Tags};
use stream_core::proto::{
    AlertSeverity, AosAlert, AosEvent, AosMessage, PerfMonData, SystemResourceCounters,
    aos_alert, aos_event, aos_message,
};
use stream_core::{ProtocolError, decode_message};
use tracing::{debug, warn};

use crate::directory::DeviceDirectory;

pub const SERIES_INTERFACE_COUNTERS: &str = "interface_counters";
pub const SERIES_SYSTEM_INFO: &str = "system_info";
pub const SERIES_PROCESS_INFO: &str = "process_info";
pub const SERIES_FILE_INFO: &str = "file_info";

// ──────────────────────────────────────────────
// Tabelas de tipos
// ──────────────────────────────────────────────

fn event_kind(data: &aos_event::Data) -> (&'static str, &dyn Record) {
    use aos_event::Data;
    match data {
        Data::DeviceState(r) => ("device_state", r),
        Data::Streaming(r) => ("streaming", r),
        Data::CablePeer(r) => ("cable_peer", r),
        Data::BgpNeighbor(r) => ("bgp_neighbor", r),
        Data::LinkStatus(r) => ("link_status", r),
        Data::Traffic(r) => ("traffic", r),
        Data::MacState(r) => ("mac_state", r),
        Data::ArpState(r) => ("arp_state", r),
        Data::LagState(r) => ("lag_state", r),
        Data::MlagState(r) => ("mlag_state", r),
    }
}

fn alert_kind(data: &aos_alert::Data) -> (&'static str, &dyn Record) {
    use aos_alert::Data;
    match data {
        Data::ConfigDeviationAlert(r) => ("config_deviation_alert", r),
        Data::StreamingAlert(r) => ("streaming_alert", r),
        Data::CablePeerMismatchAlert(r) => ("cable_peer_mismatch_alert", r),
        Data::BgpNeighborMismatchAlert(r) => ("bgp_neighbor_mismatch_alert", r),
        Data::InterfaceLinkStatusMismatchAlert(r) => ("interface_link_status_mismatch_alert", r),
        Data::HostnameAlert(r) => ("hostname_alert", r),
        Data::RouteAlert(r) => ("route_alert", r),
        Data::LivenessAlert(r) => ("liveness_alert", r),
        Data::DeploymentAlert(r) => ("deployment_alert", r),
        Data::BlueprintRenderingAlert(r) => ("blueprint_rendering_alert", r),
        Data::CountersAlert(r) => ("counters_alert", r),
        Data::MacAlert(r) => ("mac_alert", r),
        Data::ArpAlert(r) => ("arp_alert", r),
        Data::HeadroomAlert(r) => ("headroom_alert", r),
        Data::LagAlert(r) => ("lag_alert", r),
        Data::MlagAlert(r) => ("mlag_alert", r),
        Data::TestAlert(r) => ("test_alert", r),
    }
}

/// `route_alert` → `alert_route`.
pub fn alert_series(kind: &str) -> String {
    format!("alert_{}", kind.strip_suffix("_alert").unwrap_or(kind))
}

pub fn event_series(kind: &str) -> String {
    format!("event_{kind}")
}

// ──────────────────────────────────────────────
// Projeção
// ──────────────────────────────────────────────

/// Projeta uma mensagem decodificada em registros de métrica.
///
/// Mensagem sem dados gera zero registros; isso é normal.
pub fn project(message: &AosMessage, directory: &DeviceDirectory) -> Vec<MetricRecord> {
    let origin = message.origin_name.as_str();
    let mut records = Vec::new();

    match &message.data {
        None => {}
        Some(aos_message::Data::PerfMon(perf)) => project_perfmon(perf, origin, directory, &mut records),
        Some(aos_message::Data::Event(event)) => records.extend(project_event(event, origin, directory)),
        Some(aos_message::Data::Alert(alert)) => records.extend(project_alert(alert, origin, directory)),
    }

    records
}

fn project_perfmon(perf: &PerfMonData, origin: &str, directory: &DeviceDirectory, out: &mut Vec<MetricRecord>) {
    if let Some(counters) = &perf.interface_counters {
        out.push(counter_record(SERIES_INTERFACE_COUNTERS, counters, &[], directory.tags_for(origin)));
    }
    if let Some(resources) = &perf.system_resource_counters {
        project_resources(resources, origin, directory, out);
    }
}

fn project_resources(
    resources: &SystemResourceCounters,
    origin: &str,
    directory: &DeviceDirectory,
    out: &mut Vec<MetricRecord>,
) {
    if let Some(info) = &resources.system_info {
        out.push(counter_record(SERIES_SYSTEM_INFO, info, &[], directory.tags_for(origin)));
    }

    for process in &resources.process_info {
        let mut tags = directory.tags_for(origin);
        tags.insert("process_name".into(), process.process_name.clone());
        out.push(counter_record(SERIES_PROCESS_INFO, process, &["process_name"], tags));
    }

    for file in &resources.file_info {
        let mut tags = directory.tags_for(origin);
        tags.insert("file_name".into(), file.file_name.clone());
        let mut fields = Fields::new();
        fields.insert("size".into(), Scalar::UInt(file.file_size));
        out.push(MetricRecord::new(SERIES_FILE_INFO, fields, tags));
    }
}

fn counter_record(series: &str, record: &dyn Record, exclude: &[&str], mut tags: Tags) -> MetricRecord {
    let mut fields = Fields::new();
    flatten::flatten_counters(record, exclude, &mut fields, &mut tags);
    MetricRecord::new(series, fields, tags)
}

fn occurrence_record(series: String, record: &dyn Record, occurrence: Occurrence, mut tags: Tags) -> MetricRecord {
    flatten::flatten_occurrence(record, &[], &mut tags);
    let (name, value) = occurrence.indicator();
    let mut fields = Fields::new();
    fields.insert(name.into(), value);
    MetricRecord::new(series, fields, tags)
}

fn project_event(event: &AosEvent, origin: &str, directory: &DeviceDirectory) -> Option<MetricRecord> {
    let Some(data) = &event.data else {
        unsupported("event", origin);
        return None;
    };
    let (kind, record) = event_kind(data);
    Some(occurrence_record(
        event_series(kind),
        record,
        Occurrence::Event,
        directory.tags_for(origin),
    ))
}

fn project_alert(alert: &AosAlert, origin: &str, directory: &DeviceDirectory) -> Option<MetricRecord> {
    let Some(data) = &alert.data else {
        unsupported("alert", origin);
        return None;
    };
    let (kind, record) = alert_kind(data);
    let mut tags = directory.tags_for(origin);
    tags.insert("severity".into(), AlertSeverity::name_of(alert.severity).to_string());
    Some(occurrence_record(
        alert_series(kind),
        record,
        Occurrence::Alert { raised: alert.raised },
        tags,
    ))
}

/// Caminho único para tipos de evento/alerta vazios ou desconhecidos.
fn unsupported(category: &str, origin: &str) {
    warn!(origin, "Tipo de {category} não suportado, mensagem ignorada");
}

// ──────────────────────────────────────────────
// Dispatcher
// ──────────────────────────────────────────────

/// Liga decodificação, projeção e emissão para uma conexão.
#[derive(Clone)]
pub struct Dispatcher {
    directory: Arc<DeviceDirectory>,
    sink: Arc<dyn MetricSink>,
}

impl Dispatcher {
    pub fn new(directory: Arc<DeviceDirectory>, sink: Arc<dyn MetricSink>) -> Self {
        Self { directory, sink }
    }

    /// Decodifica um payload e emite os registros resultantes.
    ///
    /// Retorna quantos registros foram emitidos; payload malformado é
    /// reportado como erro e a conexão segue.
    pub fn handle_payload(&self, payload: &[u8]) -> Result<usize, ProtocolError> {
        let message = decode_message(payload)?;
        Ok(self.handle_message(&message))
    }

    pub fn handle_message(&self, message: &AosMessage) -> usize {
        let records = project(message, &self.directory);
        if records.is_empty() {
            debug!(origin = %message.origin_name, "Mensagem sem métricas");
        }
        let mut emitted = 0;
        for record in records {
            if metric::emit(self.sink.as_ref(), record) {
                emitted += 1;
            }
        }
        emitted
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
