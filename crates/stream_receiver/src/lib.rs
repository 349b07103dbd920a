//! # Stream Receiver
//!
//! Recebe o streaming AOS via TCP, enriquece cada mensagem com dados do
//! diretório de devices e entrega registros normalizados a um [`MetricSink`].
//!
//! ```text
//! StreamListener ─► FrameReader ─► Dispatcher ─► {flatten, DeviceDirectory} ─► MetricSink
//! ```
//!
//! [`MetricSink`]: stream_core::MetricSink

pub mod directory;
pub mod dispatch;
pub mod listener;
pub mod service;
pub mod static_directory;

pub use directory::{
    Blueprint, DeviceDirectory, DeviceRecord, DirectoryClient, DirectoryError, DirectorySnapshot,
    split_origin,
};
pub use dispatch::{Dispatcher, project};
pub use listener::{ConnectionStats, StreamListener};
pub use service::{ReceiverError, RunningReceiver, StreamReceiver};
pub use static_directory::StaticDirectory;
