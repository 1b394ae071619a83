use log::{error, info};
use socket2::{Domain, Socket, Type};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use vortex_core::errors::StartupError;
use vortex_core::shared_frame::EXPECTED_SIZE;
use vortex_core::{FrameSlot, Settings, SharedFrame};

mod connection;
mod logger;
mod shutdown;

fn main() -> ExitCode {
    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("settings error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Keep the logger handle alive for the duration of the process.
    let _logger = match logger::init_logger(&settings.log_level) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("failed to initialize logger: {e}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!("failed to build async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(settings)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("startup failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: Settings) -> Result<(), StartupError> {
    let frame = SharedFrame::open(&settings.shm_path, EXPECTED_SIZE)?;
    info!("shared region {} mapped", settings.shm_path.display());

    let slot = Arc::new(FrameSlot::new());
    let rasterizer_handle = vortex_core::rasterizer::spawn(Arc::clone(&slot), frame);
    info!("rasterizer thread running");

    let listener = bind_listener(&settings)?;
    info!("listening on {} (backlog {})", settings.bind_addr, settings.listen_backlog);

    let accept_slot = Arc::clone(&slot);
    let accept_loop = tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    let slot = Arc::clone(&accept_slot);
                    tokio::spawn(async move {
                        info!("{peer}: connection accepted");
                        connection::handle(stream, peer, slot).await;
                    });
                }
                Err(e) => {
                    error!("accept failed: {e}");
                }
            }
        }
    });

    shutdown::wait_and_fire(|| info!("shutdown signal received")).await;

    info!("shutting down: closing frame slot and joining rasterizer");
    accept_loop.abort();
    slot.close();
    if let Err(e) = rasterizer_handle.join() {
        error!("rasterizer thread panicked: {e:?}");
    }

    Ok(())
}

/// Bind the listening socket with an explicit backlog, since `tokio::net::TcpListener::bind`
/// always passes the platform's default backlog and `Settings` needs to be able to override it.
fn bind_listener(settings: &Settings) -> Result<TcpListener, StartupError> {
    let make_socket = || -> std::io::Result<Socket> {
        let domain = if settings.bind_addr.is_ipv6() { Domain::IPV6 } else { Domain::IPV4 };
        let socket = Socket::new(domain, Type::STREAM, None)?;
        socket.set_reuse_address(true)?;
        socket.set_nonblocking(true)?;
        socket.bind(&settings.bind_addr.into())?;
        socket.listen(settings.listen_backlog as i32)?;
        Ok(socket)
    };

    let socket = make_socket().map_err(|source| StartupError::BindFailed {
        addr: settings.bind_addr.to_string(),
        source,
    })?;
    TcpListener::from_std(socket.into()).map_err(|source| StartupError::BindFailed {
        addr: settings.bind_addr.to_string(),
        source,
    })
}
