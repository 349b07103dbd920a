//! # Stream Receiver
//!
//! Recebe o streaming AOS via TCP e escreve cada métrica em stdout no
//! formato line protocol (InfluxDB), pronta para ser encaminhada.
//!
//! O diretório de devices vem das tabelas `[[directory.systems]]` e
//! `[[directory.blueprints]]` do `config.toml`.

use std::io::Write;
use std::sync::Arc;
use stream_core::{AppConfig, ChannelSink, MetricRecord};
use stream_receiver::{StaticDirectory, StreamReceiver};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── Config ──
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path);

    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("Config inválida: {e}");
        }
        std::process::exit(1);
    }

    // ── Saída ──
    let (sink, records) = ChannelSink::new(config.receiver.sink_capacity);
    let output = match std::thread::Builder::new()
        .name("metric-output".into())
        .spawn(move || write_lines(records))
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Falha ao criar thread de saída: {e}");
            std::process::exit(1);
        }
    };

    // ── Receiver ──
    let client = Arc::new(StaticDirectory::from_config(&config.directory));
    let receiver = match StreamReceiver::start(&config.receiver, client, Arc::new(sink)).await {
        Ok(receiver) => receiver,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Falha ao aguardar Ctrl+C: {e}");
    }
    info!("Encerrando...");
    receiver.stop().await;

    // O receiver parado não segura mais o sink: o channel desconecta e a
    // thread de saída termina depois de escrever o que ficou na fila.
    if output.join().is_err() {
        error!("Thread de saída terminou com panic");
    }
}

/// Escreve cada registro numa linha de stdout até o sink ser descartado.
fn write_lines(records: crossbeam_channel::Receiver<MetricRecord>) {
    let stdout = std::io::stdout();
    for record in records {
        let mut out = stdout.lock();
        if writeln!(out, "{}", record.to_line()).and_then(|_| out.flush()).is_err() {
            break;
        }
    }
}
