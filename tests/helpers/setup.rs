use chrono::{DateTime, Utc};
use memento_api::Application;
use memento_infra::{Config, ISys, InMemoryMessenger, MementoContext};
use memento_sdk::MementoSDK;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Clock the tests move by hand
pub struct TestSys {
    millis: AtomicI64,
}

impl TestSys {
    pub fn set(&self, now: DateTime<Utc>) {
        self.millis.store(now.timestamp_millis(), Ordering::SeqCst);
    }
}

impl ISys for TestSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

pub struct TestApp {
    pub config: Config,
    pub sys: Arc<TestSys>,
    pub messenger: Arc<InMemoryMessenger>,
}

// Launch the application as a background task
pub async fn spawn_app(now: DateTime<Utc>) -> (TestApp, MementoSDK, String) {
    let sys = Arc::new(TestSys {
        millis: AtomicI64::new(now.timestamp_millis()),
    });
    let messenger = Arc::new(InMemoryMessenger::new());

    let mut ctx = MementoContext::create_inmemory().expect("inmemory context");
    ctx.config.port = 0; // Random port
    ctx.config.sweep_interval = Duration::from_millis(20);
    ctx.config.delivery_pacing = Duration::from_millis(1);
    ctx.sys = sys.clone();
    ctx.messenger = messenger.clone();

    let config = ctx.config.clone();
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp {
        config,
        sys,
        messenger,
    };
    let sdk = MementoSDK::new(address.clone());
    (app, sdk, address)
}
