use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use formrelay::captcha::{TokenVerifier, Verdict};
use formrelay::config::{CaptchaConfig, Config, SmtpConfig};
use formrelay::email::{DeliveryReceipt, MailTransport, Notification};

/// Token verifier double: fixed outcome, records invocations.
pub struct MockVerifier {
    outcome: Result<Verdict, String>,
    calls: AtomicUsize,
}

impl MockVerifier {
    pub fn succeeding(score: Option<f64>) -> Self {
        Self {
            outcome: Ok(Verdict {
                success: true,
                score,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            outcome: Ok(Verdict {
                success: false,
                score: None,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenVerifier for MockVerifier {
    async fn verify(&self, _token: &str) -> Result<Verdict, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Mail transport double: records every dispatch attempt, optionally fails.
pub struct RecordingMailer {
    fail: bool,
    sent: Mutex<Vec<Notification>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            fail: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_sent(&self) -> Option<Notification> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn dispatch(&self, mail: &Notification) -> Result<DeliveryReceipt, String> {
        self.sent.lock().unwrap().push(mail.clone());
        if self.fail {
            Err("connection refused".to_string())
        } else {
            Ok(DeliveryReceipt {
                code: "250".to_string(),
                message: "2.0.0 OK".to_string(),
            })
        }
    }
}

/// A running test server instance with injected collaborator doubles.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub verifier: Option<Arc<MockVerifier>>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit to /send-email, return (body, status).
    pub async fn send_email(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/send-email"))
            .json(data)
            .send()
            .await
            .expect("send-email request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to a random port
        allowed_origins: vec!["https://allowed.example".to_string()],
        max_body_size: 1_048_576,
        trusted_proxies: vec![],
        rate_limit: 5,
        rate_limit_window_secs: 60,
        log_level: "warn".to_string(),
        smtp: SmtpConfig {
            host: "localhost".to_string(),
            port: 2525,
            secure: false,
            user: "relay".to_string(),
            pass: "relay".to_string(),
            from: "relay@test.local".to_string(),
            to: "inbox@test.local".to_string(),
        },
        captcha: None,
    }
}

/// Spawn the app with verification disabled and a succeeding transport.
pub async fn spawn_app() -> TestApp {
    spawn_with(None, Arc::new(RecordingMailer::new()), test_config()).await
}

/// Spawn the app with verification enabled and the given verifier double.
pub async fn spawn_app_with_verifier(verifier: MockVerifier) -> TestApp {
    let mut config = test_config();
    config.captcha = Some(CaptchaConfig {
        secret: "test-secret".to_string(),
        verify_url: "http://127.0.0.1:9/siteverify".to_string(),
        min_score: 0.5,
    });
    spawn_with(
        Some(Arc::new(verifier)),
        Arc::new(RecordingMailer::new()),
        config,
    )
    .await
}

/// Spawn the app with a transport that fails every dispatch.
pub async fn spawn_app_failing_mailer() -> TestApp {
    spawn_with(None, Arc::new(RecordingMailer::failing()), test_config()).await
}

async fn spawn_with(
    verifier: Option<Arc<MockVerifier>>,
    mailer: Arc<RecordingMailer>,
    config: Config,
) -> TestApp {
    let (app, _state) = formrelay::build_app(
        config,
        verifier
            .clone()
            .map(|v| v as Arc<dyn TokenVerifier>),
        mailer.clone() as Arc<dyn MailTransport>,
    );

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        verifier,
        mailer,
    }
}

pub fn valid_submission() -> Value {
    json!({
        "name": "John Doe",
        "email": "john@example.com",
        "message": "Hello there, this is a test"
    })
}
