//! # Stream Core
//!
//! Crate compartilhada do streaming de telemetria AOS: esquema protobuf das
//! mensagens, framing binário com prefixo de tamanho, flattening genérico de
//! registros em tags/fields, registro de métrica e configuração TOML.
//!
//! ## Módulos
//! - [`proto`] – Mensagens protobuf (PerfMon, Event, Alert) e enums
//! - [`protocol`] – Frame `[u16 BE][payload]`, encode/decode e leitor assíncrono
//! - [`flatten`] – Projeção `Record -> (fields, tags)` via tabela de descritores
//! - [`metric`] – `MetricRecord`, trait `MetricSink` e sinks prontos
//! - [`config`] – Configuração unificada via TOML

pub mod flatten;
pub mod proto;
pub mod protocol;
pub mod metric;
pub mod config;

// Re-exports convenientes
pub use proto::AosMessage;
pub use protocol::{FrameReader, RawFrame, ProtocolError, decode_message, encode_message, MAX_FRAME_LEN};
pub use metric::{ChannelSink, Fields, MemorySink, MetricRecord, MetricSink, Scalar, Tags, emit};
pub use config::{AppConfig, ConfigError, DirectoryConfig, ReceiverConfig, SenderConfig, ShortPayloadPolicy};
