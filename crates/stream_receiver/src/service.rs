//! Ciclo de vida do receiver: start/stop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use stream_core::{MetricSink, ReceiverConfig};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::directory::{DeviceDirectory, DirectoryClient};
use crate::dispatch::Dispatcher;
use crate::listener::StreamListener;

/// Erros do ciclo de vida do receiver.
#[derive(Debug, thiserror::Error)]
pub enum ReceiverError {
    #[error("Falha ao fazer bind em {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

pub struct StreamReceiver;

impl StreamReceiver {
    /// Sobe o receiver.
    ///
    /// 1. Carga inicial do diretório (falha só gera aviso)
    /// 2. Task de refresh periódico
    /// 3. Bind do listener (único erro retornado)
    /// 4. Pede ao servidor o streaming de cada tipo configurado
    /// 5. Loop de accept
    pub async fn start(
        config: &ReceiverConfig,
        client: Arc<dyn DirectoryClient>,
        sink: Arc<dyn MetricSink>,
    ) -> Result<RunningReceiver, ReceiverError> {
        let directory = Arc::new(DeviceDirectory::default());
        if !directory.refresh(client.as_ref()).await {
            warn!("Carga inicial do diretório incompleta, seguindo com o que foi obtido");
        }
        for device in directory.snapshot().systems.values() {
            info!(
                device_key = %device.device_key,
                device_name = %device.device_name,
                role = %device.role,
                "Device conhecido"
            );
        }

        let cancel = CancellationToken::new();
        let period = Duration::from_secs(config.refresh_interval_secs.max(1));
        let refresh = tokio::spawn(Arc::clone(&directory).run_refresh(
            Arc::clone(&client),
            period,
            cancel.child_token(),
        ));

        let dispatcher = Dispatcher::new(Arc::clone(&directory), sink);
        let listener = match StreamListener::bind(config, dispatcher).await {
            Ok(listener) => listener,
            Err(e) => {
                cancel.cancel();
                if let Err(join) = refresh.await {
                    warn!(error = %join, "Task de refresh terminou com erro");
                }
                return Err(e);
            }
        };
        let local_addr = listener.local_addr().ok();
        let port = local_addr.map_or(config.port, |addr| addr.port());

        for kind in &config.streaming_types {
            match client
                .start_streaming(kind, &config.advertise_address, port)
                .await
            {
                Ok(()) => info!(kind = %kind, "Streaming solicitado ao servidor"),
                Err(e) => warn!(kind = %kind, error = %e, "Falha ao solicitar streaming"),
            }
        }

        let accept = tokio::spawn(listener.run(cancel.child_token()));

        Ok(RunningReceiver {
            local_addr,
            directory,
            client,
            cancel,
            tasks: vec![refresh, accept],
        })
    }
}

/// Receiver em execução. [`RunningReceiver::stop`] encerra tudo.
pub struct RunningReceiver {
    local_addr: Option<SocketAddr>,
    directory: Arc<DeviceDirectory>,
    client: Arc<dyn DirectoryClient>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl RunningReceiver {
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn directory(&self) -> &DeviceDirectory {
        &self.directory
    }

    /// Cancela as tasks, encerra o streaming no servidor e espera o fim,
    /// inclusive das conexões abertas. Ao retornar, nenhuma referência ao
    /// sink permanece viva no receiver.
    pub async fn stop(self) {
        self.cancel.cancel();

        match self.client.stop_streaming().await {
            Ok(()) => info!("Streaming encerrado no servidor"),
            Err(e) => warn!(error = %e, "Falha ao encerrar streaming"),
        }

        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Task terminou com erro");
            }
        }
        info!("Receiver parado");
    }
}
