//! 라이프사이클 관리.
//!
//! 종료 신호는 `watch` 채널 하나로 전파된다. 모니터링 루프는 반복마다
//! 구독한 수신기를 확인한다 (협조적 취소).

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// 라이프사이클 관리자
pub struct LifecycleManager {
    shutdown_tx: watch::Sender<bool>,
}

impl LifecycleManager {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self { shutdown_tx }
    }

    /// 종료 수신기
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// 종료 신호 발송. 구독자가 없어도 상태는 기록된다
    pub fn shutdown(&self) {
        info!("종료 신호 발송");
        self.shutdown_tx.send_replace(true);
    }

    /// 시그널 대기 태스크 시작
    ///
    /// 핸들러 등록 실패는 경고만 남긴다. `q` 명령과 `--max-frames`로는 여전히 종료된다.
    pub fn spawn_signal_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let lifecycle = Arc::clone(self);
        tokio::spawn(async move {
            match wait_for_signal().await {
                Ok(name) => {
                    info!("{name} 수신");
                    lifecycle.shutdown();
                }
                Err(e) => warn!("시그널 핸들러 등록 실패: {e}"),
            }
        })
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

/// 종료 시그널 하나를 기다려 이름을 돌려준다
#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let name = tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
    };
    Ok(name)
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("Ctrl+C")
}
