use tokio::signal;
use tracing::{error, warn};

/// 等待 Ctrl+C。信号处理器注册失败时该 future 永不完成，
/// 服务一直运行到进程被终止。
pub async fn listen_for_shutdown() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received, initiating graceful shutdown...");
}
