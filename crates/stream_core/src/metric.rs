//! Registro de métrica normalizado e o sink externo que o consome.
//!
//! Um [`MetricRecord`] é produzido e entregue imediatamente ao sink; nada é
//! retido nem enfileirado no core.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Valor escalar de um field.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::UInt(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Str(v) => f.write_str(v),
        }
    }
}

/// Fields medidos (nome → escalar).
pub type Fields = BTreeMap<String, Scalar>;

/// Tags identificadoras (nome → string, chaves únicas).
pub type Tags = BTreeMap<String, String>;

/// Tag obrigatória em todo registro emitido.
pub const DEVICE_TAG: &str = "device";

/// Um registro `(series, fields, tags)` pronto para o sink.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub series: String,
    pub fields: Fields,
    pub tags: Tags,
}

impl MetricRecord {
    pub fn new(series: impl Into<String>, fields: Fields, tags: Tags) -> Self {
        Self {
            series: series.into(),
            fields,
            tags,
        }
    }

    /// Series não vazia e tag `device` presente com valor.
    pub fn is_valid(&self) -> bool {
        !self.series.is_empty()
            && self
                .tags
                .get(DEVICE_TAG)
                .is_some_and(|device| !device.is_empty())
    }

    /// Renderiza em line protocol (InfluxDB), sem timestamp.
    ///
    /// ```text
    /// interface_counters,device=leaf1,interface=et-0/0/1 rx_bytes=42u,tx_bytes=7u
    /// ```
    ///
    /// Fields float não finitos (NaN, ±inf) são omitidos.
    pub fn to_line(&self) -> String {
        let mut line = escape_measurement(&self.series);
        for (key, value) in &self.tags {
            if value.is_empty() {
                continue;
            }
            line.push(',');
            line.push_str(&escape_key(key));
            line.push('=');
            line.push_str(&escape_key(value));
        }

        let fields: Vec<String> = self
            .fields
            .iter()
            .filter_map(|(key, value)| {
                line_value(value).map(|value| format!("{}={value}", escape_key(key)))
            })
            .collect();
        if !fields.is_empty() {
            line.push(' ');
            line.push_str(&fields.join(","));
        }
        line
    }
}

/// Measurement: só vírgula e espaço são escapados.
fn escape_measurement(raw: &str) -> String {
    escape_with(raw, &[',', ' '])
}

/// Chaves e valores de tag, chaves de field.
fn escape_key(raw: &str) -> String {
    escape_with(raw, &[',', ' ', '='])
}

/// Quebras de linha viram `\n`/`\r` literais: um registro é sempre uma linha.
fn escape_with(raw: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if special.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

fn line_value(value: &Scalar) -> Option<String> {
    let rendered = match value {
        Scalar::Int(v) => format!("{v}i"),
        Scalar::UInt(v) => format!("{v}u"),
        Scalar::Float(v) if !v.is_finite() => return None,
        Scalar::Float(v) => format!("{v}"),
        Scalar::Bool(v) => format!("{v}"),
        Scalar::Str(v) => format!(
            "\"{}\"",
            v.replace('\\', "\\\\")
                .replace('"', "\\\"")
                .replace('\n', "\\n")
                .replace('\r', "\\r")
        ),
    };
    Some(rendered)
}

// ──────────────────────────────────────────────
// Sink
// ──────────────────────────────────────────────

/// Consumidor externo das métricas. Fire-and-forget: nenhum retorno.
pub trait MetricSink: Send + Sync {
    fn add_fields(&self, series: String, fields: Fields, tags: Tags);
}

/// Entrega um registro ao sink, descartando os que violam o invariante
/// de series/device.
pub fn emit(sink: &dyn MetricSink, record: MetricRecord) -> bool {
    if !record.is_valid() {
        warn!(series = %record.series, "Registro sem series ou tag device, descartado");
        return false;
    }
    sink.add_fields(record.series, record.fields, record.tags);
    true
}

/// Sink que repassa registros para um channel bounded.
///
/// Envio non-blocking: se o consumidor está lento, o registro é descartado.
pub struct ChannelSink {
    tx: Sender<MetricRecord>,
}

impl ChannelSink {
    /// Cria o sink e retorna o receiver do channel.
    pub fn new(capacity: usize) -> (Self, Receiver<MetricRecord>) {
        let (tx, rx) = bounded(capacity);
        (Self { tx }, rx)
    }
}

impl MetricSink for ChannelSink {
    fn add_fields(&self, series: String, fields: Fields, tags: Tags) {
        match self.tx.try_send(MetricRecord::new(series, fields, tags)) {
            Ok(()) => {}
            Err(TrySendError::Full(record)) => {
                debug!(series = %record.series, "Channel cheio, descartando métrica");
            }
            Err(TrySendError::Disconnected(_)) => {
                debug!("Consumidor de métricas encerrado");
            }
        }
    }
}

/// Sink em memória (testes e uso embarcado).
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<MetricRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove e retorna tudo que foi recebido até agora.
    pub fn take(&self) -> Vec<MetricRecord> {
        match self.records.lock() {
            Ok(mut records) => std::mem::take(&mut *records),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MetricSink for MemorySink {
    fn add_fields(&self, series: String, fields: Fields, tags: Tags) {
        let record = MetricRecord::new(series, fields, tags);
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MetricRecord {
        let mut fields = Fields::new();
        fields.insert("rx_bytes".into(), Scalar::UInt(42));
        fields.insert("event".into(), Scalar::Int(1));
        let mut tags = Tags::new();
        tags.insert("device".into(), "leaf 1".into());
        tags.insert("interface".into(), "et-0/0/1".into());
        MetricRecord::new("interface_counters", fields, tags)
    }

    #[test]
    fn line_protocol_rendering() {
        assert_eq!(
            record().to_line(),
            r"interface_counters,device=leaf\ 1,interface=et-0/0/1 event=1i,rx_bytes=42u"
        );
    }

    #[test]
    fn string_fields_are_quoted() {
        let mut r = record();
        r.fields.clear();
        r.fields.insert("msg".into(), Scalar::Str("say \"hi\"".into()));
        assert!(r.to_line().ends_with(r#"msg="say \"hi\"""#));
    }

    #[test]
    fn emit_rejects_record_without_device() {
        let sink = MemorySink::new();
        let mut r = record();
        r.tags.remove(DEVICE_TAG);
        assert!(!emit(&sink, r));

        let mut r = record();
        r.series.clear();
        assert!(!emit(&sink, r));

        assert!(emit(&sink, record()));
        assert_eq!(sink.take(), vec![record()]);
        assert!(sink.is_empty());
    }

    #[test]
    fn emit_rejects_empty_device() {
        let sink = MemorySink::new();
        let mut r = record();
        r.tags.insert(DEVICE_TAG.into(), String::new());
        assert!(!r.is_valid());
        assert!(!emit(&sink, r));
        assert!(sink.is_empty());
    }

    #[test]
    fn multiline_tag_stays_on_one_line() {
        let mut tags = Tags::new();
        tags.insert("device".into(), "leaf1".into());
        tags.insert("expected_config".into(), "hostname leaf1\ninterface et-1\r".into());
        let mut fields = Fields::new();
        fields.insert("status".into(), Scalar::Int(1));
        fields.insert("diff".into(), Scalar::Str("a\nb".into()));
        let line = MetricRecord::new("alert_config_deviation", fields, tags).to_line();

        assert_eq!(line.lines().count(), 1);
        assert_eq!(
            line,
            r#"alert_config_deviation,device=leaf1,expected_config=hostname\ leaf1\ninterface\ et-1\r diff="a\nb",status=1i"#
        );
    }

    #[test]
    fn measurement_keeps_equals_sign() {
        let mut r = record();
        r.series = "a=b c".into();
        assert!(r.to_line().starts_with(r"a=b\ c,device="));
    }

    #[test]
    fn non_finite_floats_are_skipped() {
        let mut r = record();
        r.fields.clear();
        r.fields.insert("load".into(), Scalar::Float(f64::NAN));
        r.fields.insert("peak".into(), Scalar::Float(f64::INFINITY));
        r.fields.insert("ratio".into(), Scalar::Float(0.5));
        assert!(r.to_line().ends_with(" ratio=0.5"));
    }

    #[test]
    fn channel_sink_drops_when_full() {
        let (sink, rx) = ChannelSink::new(1);
        assert!(emit(&sink, record()));
        assert!(emit(&sink, record()));
        assert_eq!(rx.try_iter().count(), 1);
    }
}
