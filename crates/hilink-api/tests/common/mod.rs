//! Test harness: the real router on an ephemeral port, backed by the
//! simulated vendor SDK

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hilink_api::{create_router, AppState};
use hilink_core::models::{MachineStatusType, ProgramEntry};
use hilink_core::AccessPolicy;
use hilink_mode2::transport::mock::MockExchange;
use hilink_mode2::{ClientConfig, MockConfig, MockMachineConfig, Mode2Client};
use tokio::net::TcpListener;

/// A test server that shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub http: reqwest::Client,
    pub mock: Arc<MockExchange>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    pub async fn start(control_enabled: bool, machines: Vec<MockMachineConfig>) -> Self {
        let mock = Arc::new(MockExchange::new(
            &MockConfig {
                machines,
                ..Default::default()
            },
            None,
        ));
        Self::start_with(control_enabled, mock).await
    }

    /// A server whose vendor SDK was never activated: every reply carries -99
    pub async fn start_unactivated(
        control_enabled: bool,
        machines: Vec<MockMachineConfig>,
    ) -> Self {
        let mock = Arc::new(MockExchange::new(
            &MockConfig {
                machines,
                require_activation: true,
                ..Default::default()
            },
            None,
        ));
        Self::start_with(control_enabled, mock).await
    }

    pub async fn start_with(control_enabled: bool, mock: Arc<MockExchange>) -> Self {
        let config = ClientConfig {
            poll_interval_ms: 5,
            default_timeout_ms: 500,
            command_timeout_ms: 500,
            drain_on_start: false,
        };
        let client = Arc::new(Mode2Client::new(mock.clone(), config));
        let router = create_router(AppState::new(client, AccessPolicy::new(control_enabled)));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        Self {
            addr,
            http,
            mock,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

pub fn machine(uid: &str) -> MockMachineConfig {
    MockMachineConfig {
        uid: uid.to_string(),
        ip: "192.168.10.1".to_string(),
        port: 8193,
        status: MachineStatusType::Ready,
        programs: vec![],
    }
}

pub fn machine_with_programs(uid: &str, count: i32) -> MockMachineConfig {
    MockMachineConfig {
        programs: (1..=count)
            .map(|no| ProgramEntry {
                no: 1000 + no,
                comment: format!("PART-{no}"),
                opened: no == 1,
            })
            .collect(),
        ..machine(uid)
    }
}
