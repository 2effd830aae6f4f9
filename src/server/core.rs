use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::config::{DirectoryConfig, ServiceConfig, SharedRuntimeConfig, StartupConfig};
use crate::corrector::ScriptCorrector;
use crate::engine::ReconciliationEngine;
use crate::error::OwnerFixerError;
use crate::error::handlers::LOG_TARGET;
use crate::fixlist::FixList;
use crate::identity::{DirectoryConnector, IdentityResolver, NssDirectory, StaticDirectory};
use crate::messages::Locale;
use crate::protocol::{HookResponse, handle_command, parse_command};
use crate::quota::HttpQuotaService;
use crate::storage::IndexedStorage;

pub struct Server {
    listener: TcpListener,
    engine: Arc<ReconciliationEngine>,
    runtime: SharedRuntimeConfig,
    locale: Locale,
    max_command_length: usize,
}

impl Server {
    /// Build every collaborator from configuration and bind the hook listener
    pub async fn bind(config: ServiceConfig) -> Result<Self, OwnerFixerError> {
        let (startup, runtime) = config.split();
        let engine = Arc::new(build_engine(&startup, runtime.clone())?);

        let socket = startup.hook_socket();
        let listener = TcpListener::bind(&socket).await.inspect_err(|e| {
            error!("Failed to bind to {}: {}", socket, e);
        })?;
        info!("Hook listener bound to {}", socket);

        Ok(Self {
            listener,
            engine,
            runtime,
            locale: startup.locale,
            max_command_length: startup.max_command_length,
        })
    }

    /// Serve an already-built engine on `addr`
    pub async fn with_engine(
        addr: &str,
        engine: Arc<ReconciliationEngine>,
        runtime: SharedRuntimeConfig,
        locale: Locale,
        max_command_length: usize,
    ) -> Result<Self, OwnerFixerError> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            engine,
            runtime,
            locale,
            max_command_length,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn engine(&self) -> Arc<ReconciliationEngine> {
        Arc::clone(&self.engine)
    }

    /// Run the background sweeper and accept hook connections forever
    pub async fn start(self) {
        let _sweeper = spawn_sweeper(Arc::clone(&self.engine), Arc::clone(&self.runtime));

        info!("Owner fixer accepting hook connections");

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let engine = Arc::clone(&self.engine);
                    let locale = self.locale;
                    let max_command_length = self.max_command_length;

                    // Spawn a task per connection so the accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(stream, addr, engine, locale, max_command_length)
                                .await
                        {
                            warn!("Hook connection {} failed: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Wire the engine's collaborators from startup configuration
pub fn build_engine(
    startup: &StartupConfig,
    runtime: SharedRuntimeConfig,
) -> Result<ReconciliationEngine, OwnerFixerError> {
    let database = startup.database_path();
    if let Some(parent) = database.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let storage = Arc::new(IndexedStorage::open(&database, &startup.data_root_path())?);
    let fix_list = Arc::new(FixList::open(&database)?);

    let connector: Arc<dyn DirectoryConnector> = match &startup.directory {
        DirectoryConfig::Static { users } => {
            info!("Using static directory with {} users", users.len());
            Arc::new(StaticDirectory::new(users.clone()))
        }
        DirectoryConfig::Nss { getent_path } => {
            info!("Using name service directory via {}", getent_path);
            Arc::new(NssDirectory::new(getent_path.clone()))
        }
    };
    let resolver = IdentityResolver::new(connector, startup.directory_timeout());

    let quota = Arc::new(HttpQuotaService::new(
        &startup.quota_service_url,
        startup.quota_timeout(),
    )?);
    let corrector = Arc::new(ScriptCorrector::new(
        &startup.corrector_path,
        startup.corrector_timeout(),
    ));

    Ok(ReconciliationEngine::new(
        storage, resolver, quota, corrector, fix_list, runtime,
    ))
}

/// Sweep the fix list every `sweep_interval_secs`, re-reading the interval each round
pub fn spawn_sweeper(
    engine: Arc<ReconciliationEngine>,
    runtime: SharedRuntimeConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let interval = runtime.read().await.sweep_interval();
            tokio::time::sleep(interval).await;

            if let Err(e) = engine.sweep().await {
                error!(target: LOG_TARGET, "Scheduled sweep failed: {}", e);
            }
        }
    })
}

/// Serves one hook connection until QUIT or disconnect.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    engine: Arc<ReconciliationEngine>,
    locale: Locale,
    max_command_length: usize,
) -> Result<(), std::io::Error> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    loop {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            info!("Hook connection closed by {}", addr);
            return Ok(());
        }

        // Enforce command length limit
        if line.len() > max_command_length {
            let response = HookResponse::error("command too long");
            write_half.write_all(response.to_line().as_bytes()).await?;
            continue;
        }

        let command = parse_command(&line);
        info!("Received from {}: {:?}", addr, command);

        let result = handle_command(&engine, locale, &command).await;
        write_half
            .write_all(result.response.to_line().as_bytes())
            .await?;
        write_half.flush().await?;

        if result.close_connection {
            return Ok(());
        }
    }
}
