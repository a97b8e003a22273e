//! Wake-word notifier listener.
//!
//! The notifier is an external collaborator that pushes one framed
//! JSON message per detection over the shared `vox-wire` framing.
//! Every received message is treated as a one-shot "activate" edge,
//! consumed exactly once by the next poll.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use vox_wire::{read_message, WakeMessage};

/// Listens to the wake-word notifier on a background task.
pub struct WakeListener {
    activate: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl WakeListener {
    /// Connect to the notifier and start the read loop.
    pub async fn connect(addr: impl ToSocketAddrs) -> std::io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let activate = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&activate);

        let task = tokio::spawn(async move {
            let mut stream = stream;
            loop {
                match read_message(&mut stream).await {
                    Ok(value) => {
                        // Any message is an activation; a well-formed
                        // detection body also gets logged in detail.
                        match serde_json::from_value::<WakeMessage>(value) {
                            Ok(msg) => info!(
                                phrase = %msg.detect.phrase,
                                azimuth = msg.detect.azimuth,
                                time = %msg.detect.time,
                                "wake word detected"
                            ),
                            Err(_) => info!("wake notifier message received"),
                        }
                        flag.store(true, Ordering::SeqCst);
                    }
                    Err(e) => {
                        warn!(error = %e, "wake notifier connection lost");
                        break;
                    }
                }
            }
        });

        Ok(Self { activate, task })
    }

    /// Consume a pending activation edge, if any. Each detection is
    /// observed at most once.
    pub fn poll_activation(&self) -> bool {
        self.activate.swap(false, Ordering::SeqCst)
    }
}

impl Drop for WakeListener {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::net::TcpListener;
    use vox_wire::write_message;

    #[tokio::test]
    async fn activation_edge_consumed_once() {
        let notifier = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = notifier.local_addr().unwrap();

        let listener = WakeListener::connect(addr).await.unwrap();
        let (mut stream, _) = notifier.accept().await.unwrap();

        assert!(!listener.poll_activation());

        write_message(
            &mut stream,
            &json!({"detect": {"phrase": "hey vox", "azimuth": 10.0, "time": "now"}}),
        )
        .await
        .unwrap();

        // Wait for the background task to observe the message.
        let mut fired = false;
        for _ in 0..50 {
            if listener.poll_activation() {
                fired = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(fired);

        // The edge was consumed; no second activation without a
        // second message.
        assert!(!listener.poll_activation());
    }

    #[tokio::test]
    async fn malformed_body_still_activates() {
        let notifier = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = notifier.local_addr().unwrap();
        let listener = WakeListener::connect(addr).await.unwrap();
        let (mut stream, _) = notifier.accept().await.unwrap();

        write_message(&mut stream, &json!({"unexpected": true})).await.unwrap();

        let mut fired = false;
        for _ in 0..50 {
            if listener.poll_activation() {
                fired = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(fired);
    }
}
