//! Ctrl-C → cancellation token bridge.

use std::io;
use std::thread;

use tokio_util::sync::CancellationToken;

/// Spawn a watcher thread that cancels `cancel` on the first Ctrl-C.
///
/// The watcher exits on its own once `cancel` is cancelled by anyone else,
/// so callers should cancel the token when their work ends.
pub fn cancel_on_ctrl_c(cancel: CancellationToken) -> io::Result<thread::JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("ctrl-c-watcher".into())
        .spawn(move || {
            runtime.block_on(async {
                tokio::select! {
                    result = tokio::signal::ctrl_c() => match result {
                        Ok(()) => {
                            log::info!("Interrupt received, stopping capture");
                            cancel.cancel();
                        }
                        Err(e) => log::error!("Failed to listen for Ctrl-C: {}", e),
                    },
                    _ = cancel.cancelled() => {}
                }
            });
        })
}
