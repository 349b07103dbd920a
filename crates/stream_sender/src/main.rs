//! # Stream Sender
//!
//! Emula um device AOS: conecta no receiver via TCP e envia contadores
//! reais do host (interfaces, CPU, memória, processos, arquivos) no
//! protocolo de streaming `[u16 BE][protobuf]`.
//!
//! ## Uso
//! ```bash
//! stream_sender          # usa [sender] do config.toml ao lado do executável
//! ```

mod monitor;

use monitor::{DeviceMonitor, streaming_event, test_alert};
use std::io::Write;
use std::net::TcpStream;
use std::time::{Duration, Instant};
use stream_core::{AosMessage, AppConfig, encode_message};
use tracing::{error, info, warn};

/// Espera entre tentativas de conexão.
const RECONNECT_DELAY: Duration = Duration::from_secs(2);

fn main() {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Carregar config ──
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path);

    // Salva config padrão se não existir
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }

    let sender_cfg = &config.sender;
    let dest_addr = format!("{}:{}", sender_cfg.dest_ip, sender_cfg.port);
    let interval = Duration::from_secs_f64(sender_cfg.interval_secs.clamp(0.1, 3600.0));

    // ── Monitor ──
    let mut monitor = DeviceMonitor::new(
        &sender_cfg.device_key,
        sender_cfg.max_processes,
        &sender_cfg.watched_files,
    );
    // Primeira leitura para inicializar contadores de CPU
    let _ = monitor.collect();

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   ⚡ AOS STREAM SENDER – ATIVO");
    println!("══════════════════════════════════════════════");
    println!("  Destino:   {dest_addr}");
    println!("  Device:    {}", sender_cfg.device_key);
    println!("  Intervalo: {:.1}s", sender_cfg.interval_secs);
    println!("══════════════════════════════════════════════");
    println!();

    // ── Loop de conexão ──
    loop {
        match TcpStream::connect(&dest_addr) {
            Ok(mut stream) => {
                info!("Conectado a {dest_addr}");
                let _ = stream.set_nodelay(true);
                if let Err(e) = stream_session(&mut stream, &mut monitor, interval, &config) {
                    warn!("Conexão com {dest_addr} perdida: {e}");
                }
            }
            Err(e) => {
                error!("Falha ao conectar em {dest_addr}: {e}. Tentando novamente em 2s...");
            }
        }
        std::thread::sleep(RECONNECT_DELAY);
    }
}

/// Envia o evento de conexão e depois os contadores a cada intervalo.
/// Retorna apenas em erro de escrita.
fn stream_session(
    stream: &mut TcpStream,
    monitor: &mut DeviceMonitor,
    interval: Duration,
    config: &AppConfig,
) -> std::io::Result<()> {
    let sender_cfg = &config.sender;
    let local = stream.local_addr()?;

    send(stream, &streaming_event(&sender_cfg.device_key, &local.ip().to_string(), local.port()))?;
    if sender_cfg.send_test_alert {
        send(stream, &test_alert(&sender_cfg.device_key, "stream_sender conectado"))?;
        info!("Test alert enviado");
    }

    loop {
        let cycle_start = Instant::now();

        let messages = monitor.collect();
        let mut bytes = 0;
        for message in &messages {
            bytes += send(stream, message)?;
        }
        info!("→ {} mensagens, {} bytes", messages.len(), bytes);

        // Dormir pelo tempo restante do intervalo
        let elapsed = cycle_start.elapsed();
        if elapsed < interval {
            std::thread::sleep(interval - elapsed);
        }
    }
}

/// Serializa e escreve um frame. Mensagem grande demais é descartada com log.
fn send(stream: &mut TcpStream, message: &AosMessage) -> std::io::Result<usize> {
    match encode_message(message) {
        Ok(frame) => {
            stream.write_all(&frame)?;
            Ok(frame.len())
        }
        Err(e) => {
            error!("Erro ao serializar mensagem de {}: {e}", message.origin_name);
            Ok(0)
        }
    }
}
