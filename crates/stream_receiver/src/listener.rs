//! Listener TCP e ciclo de vida de cada conexão.
//!
//! ```text
//! Open ──► Reading ──┬─► Closed (EOF limpo / prefixo truncado / erro de I/O)
//!             ▲      ├─► Closed (payload curto com política `abort`)
//!             │      ├─► Closed (timeout de ociosidade)
//!             └──────┴─► Closed (cancelamento)
//! ```
//!
//! Cada conexão é estritamente sequencial: o prefixo da mensagem N+1 só é
//! lido depois que o payload da mensagem N foi consumido, então a ordem de
//! emissão segue a ordem do fio.

use std::net::SocketAddr;
use std::time::Duration;
use stream_core::{FrameReader, ProtocolError, ReceiverConfig, ShortPayloadPolicy};
use tokio::io::AsyncRead;
use tokio::net::TcpListener;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::dispatch::Dispatcher;
use crate::service::ReceiverError;

/// Parâmetros de cada conexão, derivados do `[receiver]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// `None` = sem timeout.
    pub idle_timeout: Option<Duration>,
    pub short_payload: ShortPayloadPolicy,
}

impl ConnectionOptions {
    pub fn from_config(config: &ReceiverConfig) -> Self {
        Self {
            idle_timeout: (config.idle_timeout_secs > 0).then(|| Duration::from_secs(config.idle_timeout_secs)),
            short_payload: config.short_payload,
        }
    }
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            idle_timeout: None,
            short_payload: ShortPayloadPolicy::Decode,
        }
    }
}

/// Motivo do encerramento de uma conexão.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    PeerClosed,
    TruncatedPrefix,
    Io,
    ShortPayload,
    IdleTimeout,
    Cancelled,
}

/// Contadores de uma conexão, logados no encerramento.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionStats {
    pub frames: u64,
    pub metrics: u64,
    pub decode_errors: u64,
    pub short_frames: u64,
}

// ──────────────────────────────────────────────
// Listener
// ──────────────────────────────────────────────

pub struct StreamListener {
    listener: TcpListener,
    dispatcher: Dispatcher,
    options: ConnectionOptions,
}

impl StreamListener {
    /// Faz o bind em `address:port`. Falha de bind é o único erro fatal do receiver.
    pub async fn bind(config: &ReceiverConfig, dispatcher: Dispatcher) -> Result<Self, ReceiverError> {
        let address = config.bind_address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| ReceiverError::Bind {
                address: address.clone(),
                source,
            })?;

        info!(address = %address, "Receiver escutando streaming AOS");
        Ok(Self {
            listener,
            dispatcher,
            options: ConnectionOptions::from_config(config),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Loop de accept: uma task por conexão, até o cancelamento.
    ///
    /// Só retorna depois que todas as conexões abertas terminaram.
    pub async fn run(self, cancel: CancellationToken) {
        let mut connections = JoinSet::new();
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                Some(done) = connections.join_next(), if !connections.is_empty() => {
                    log_connection_end(done);
                }
                result = self.listener.accept() => match result {
                    Ok((stream, peer)) => {
                        info!(peer = %peer, "Conexão aceita");
                        let dispatcher = self.dispatcher.clone();
                        let options = self.options;
                        let cancel = cancel.child_token();
                        connections.spawn(async move {
                            serve_connection(stream, peer, &dispatcher, options, &cancel).await
                        });
                    }
                    Err(e) => {
                        // Erro transitório: loga e segue aceitando
                        warn!(error = %e, "Erro no accept");
                    }
                },
            }
        }

        drop(self.listener);
        debug!(open = connections.len(), "Aguardando conexões abertas");
        while let Some(done) = connections.join_next().await {
            log_connection_end(done);
        }
        info!("Listener encerrado");
    }
}

fn log_connection_end(done: Result<(ConnectionStats, CloseReason), JoinError>) {
    if let Err(e) = done {
        warn!(error = %e, "Task de conexão terminou com erro");
    }
}

// ──────────────────────────────────────────────
// Conexão
// ──────────────────────────────────────────────

/// Lê frames até o fechamento, despachando cada payload.
pub async fn serve_connection<R: AsyncRead + Unpin>(
    stream: R,
    peer: SocketAddr,
    dispatcher: &Dispatcher,
    options: ConnectionOptions,
    cancel: &CancellationToken,
) -> (ConnectionStats, CloseReason) {
    let mut reader = FrameReader::new(stream);
    let mut stats = ConnectionStats::default();

    let reason = loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => break CloseReason::Cancelled,
            next = next_frame_within(&mut reader, options.idle_timeout) => next,
        };

        let frame = match next {
            None => break CloseReason::IdleTimeout,
            Some(Ok(None)) => break CloseReason::PeerClosed,
            Some(Ok(Some(frame))) => frame,
            Some(Err(ProtocolError::TruncatedLength(got))) => {
                debug!(peer = %peer, got, "Prefixo de tamanho truncado");
                break CloseReason::TruncatedPrefix;
            }
            Some(Err(e)) => {
                warn!(peer = %peer, error = %e, "Erro de leitura");
                break CloseReason::Io;
            }
        };

        stats.frames += 1;
        if frame.is_short() {
            stats.short_frames += 1;
            warn!(
                peer = %peer,
                declared = frame.declared_len,
                received = frame.payload.len(),
                "Payload curto"
            );
            if options.short_payload == ShortPayloadPolicy::Abort {
                break CloseReason::ShortPayload;
            }
        }

        match dispatcher.handle_payload(frame.payload) {
            Ok(emitted) => stats.metrics += emitted as u64,
            Err(e) => {
                stats.decode_errors += 1;
                warn!(peer = %peer, error = %e, "Payload inválido, descartado");
            }
        }
    };

    info!(
        peer = %peer,
        frames = stats.frames,
        metrics = stats.metrics,
        decode_errors = stats.decode_errors,
        reason = ?reason,
        "Conexão encerrada"
    );
    (stats, reason)
}

/// `None` quando o timeout de ociosidade expira.
async fn next_frame_within<R: AsyncRead + Unpin>(
    reader: &mut FrameReader<R>,
    idle_timeout: Option<Duration>,
) -> Option<Result<Option<stream_core::RawFrame<'_>>, ProtocolError>> {
    match idle_timeout {
        Some(limit) => tokio::time::timeout(limit, reader.next_frame()).await.ok(),
        None => Some(reader.next_frame().await),
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::DeviceDirectory;
    use std::sync::Arc;
    use stream_core::proto::{AosEvent, AosMessage, DeviceStateEvent, DeviceStatus, aos_event, aos_message};
    use stream_core::protocol::encode_frame;
    use stream_core::{MemorySink, encode_message};
    use tokio::io::AsyncWriteExt;

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn dispatcher() -> (Dispatcher, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (Dispatcher::new(Arc::new(DeviceDirectory::default()), sink.clone()), sink)
    }

    fn device_state(origin: &str) -> AosMessage {
        AosMessage {
            origin_name: origin.into(),
            timestamp: None,
            data: Some(aos_message::Data::Event(AosEvent {
                data: Some(aos_event::Data::DeviceState(DeviceStateEvent {
                    value: DeviceStatus::Up as i32,
                })),
            })),
        }
    }

    async fn serve_bytes(bytes: &[u8], options: ConnectionOptions) -> (ConnectionStats, CloseReason, Arc<MemorySink>) {
        let (dispatcher, sink) = dispatcher();
        let cancel = CancellationToken::new();
        let (stats, reason) = serve_connection(bytes, peer(), &dispatcher, options, &cancel).await;
        (stats, reason, sink)
    }

    #[tokio::test]
    async fn truncated_prefix_emits_nothing() {
        for bytes in [&b""[..], &b"\x00"[..]] {
            let (stats, reason, sink) = serve_bytes(bytes, ConnectionOptions::default()).await;
            assert!(sink.is_empty());
            assert_eq!(stats.frames, 0);
            let expected = if bytes.is_empty() {
                CloseReason::PeerClosed
            } else {
                CloseReason::TruncatedPrefix
            };
            assert_eq!(reason, expected);
        }
    }

    #[tokio::test]
    async fn malformed_payload_does_not_close_connection() {
        let mut wire = encode_frame(&[0x0F, 0xFF, 0xFF]).unwrap();
        wire.extend(encode_message(&device_state("sw1")).unwrap());

        let (stats, reason, sink) = serve_bytes(&wire, ConnectionOptions::default()).await;
        assert_eq!(reason, CloseReason::PeerClosed);
        assert_eq!(stats.frames, 2);
        assert_eq!(stats.decode_errors, 1);
        assert_eq!(stats.metrics, 1);
        assert_eq!(sink.take()[0].series, "event_device_state");
    }

    /// Frame que anuncia 5 bytes a mais do que o peer envia.
    fn short_frame() -> Vec<u8> {
        let body = encode_message(&device_state("sw1")).unwrap();
        let body = &body[2..];
        let declared = u16::try_from(body.len() + 5).unwrap();
        let mut wire = declared.to_be_bytes().to_vec();
        wire.extend_from_slice(body);
        wire
    }

    #[tokio::test]
    async fn short_payload_decode_policy_still_decodes() {
        let (stats, reason, sink) = serve_bytes(&short_frame(), ConnectionOptions::default()).await;
        assert_eq!(stats.short_frames, 1);
        assert_eq!(stats.metrics, 1);
        assert_eq!(sink.len(), 1);
        assert_eq!(reason, CloseReason::PeerClosed);
    }

    #[tokio::test]
    async fn short_payload_abort_policy_closes() {
        let options = ConnectionOptions {
            short_payload: ShortPayloadPolicy::Abort,
            ..Default::default()
        };
        let (stats, reason, sink) = serve_bytes(&short_frame(), options).await;
        assert_eq!(reason, CloseReason::ShortPayload);
        assert_eq!(stats.metrics, 0);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn idle_connection_times_out() {
        let (_client, server) = tokio::io::duplex(64);
        let (dispatcher, _) = dispatcher();
        let options = ConnectionOptions {
            idle_timeout: Some(Duration::from_millis(30)),
            ..Default::default()
        };
        let cancel = CancellationToken::new();
        let (_, reason) = serve_connection(server, peer(), &dispatcher, options, &cancel).await;
        assert_eq!(reason, CloseReason::IdleTimeout);
    }

    #[tokio::test]
    async fn cancellation_closes_silent_connection() {
        let (_client, server) = tokio::io::duplex(64);
        let (dispatcher, _) = dispatcher();
        let cancel = CancellationToken::new();

        let task = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                serve_connection(server, peer(), &dispatcher, ConnectionOptions::default(), &cancel).await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();
        let (_, reason) = task.await.unwrap();
        assert_eq!(reason, CloseReason::Cancelled);
    }

    #[test]
    fn options_from_config() {
        let mut config = ReceiverConfig::default();
        assert_eq!(ConnectionOptions::from_config(&config).idle_timeout, None);
        config.idle_timeout_secs = 90;
        config.short_payload = ShortPayloadPolicy::Abort;
        let options = ConnectionOptions::from_config(&config);
        assert_eq!(options.idle_timeout, Some(Duration::from_secs(90)));
        assert_eq!(options.short_payload, ShortPayloadPolicy::Abort);
    }

    #[tokio::test]
    async fn tcp_end_to_end_keeps_wire_order() {
        let config = ReceiverConfig {
            address: "127.0.0.1".into(),
            port: 0,
            ..Default::default()
        };
        let (dispatcher, sink) = dispatcher();
        let listener = StreamListener::bind(&config, dispatcher).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let cancel = CancellationToken::new();
        let accept = tokio::spawn(listener.run(cancel.clone()));

        let mut client = tokio::net::TcpStream::connect(addr).await.unwrap();
        for origin in ["sw1", "sw2::et-0/0/1", "sw3"] {
            client.write_all(&encode_message(&device_state(origin)).unwrap()).await.unwrap();
        }
        client.shutdown().await.unwrap();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while sink.len() < 3 && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let devices: Vec<_> = sink
            .take()
            .into_iter()
            .map(|r| r.tags["device_key"].clone())
            .collect();
        assert_eq!(devices, ["sw1", "sw2", "sw3"]);

        cancel.cancel();
        accept.await.unwrap();
    }
}
