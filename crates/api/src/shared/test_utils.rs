use chrono::{DateTime, TimeZone, Utc};
use memento_infra::{ISys, InMemoryMessenger, MementoContext};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Clock that only moves when told to
pub struct StaticTimeSys {
    millis: AtomicI64,
}

impl StaticTimeSys {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(now.timestamp_millis()),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.millis.store(now.timestamp_millis(), Ordering::SeqCst);
    }
}

impl ISys for StaticTimeSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

pub struct TestContext {
    pub ctx: MementoContext,
    pub sys: Arc<StaticTimeSys>,
    pub messenger: Arc<InMemoryMessenger>,
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

/// In-memory context frozen at `now` with a recording messenger
pub fn setup(now: DateTime<Utc>) -> TestContext {
    let sys = Arc::new(StaticTimeSys::new(now));
    let messenger = Arc::new(InMemoryMessenger::new());
    let mut ctx = MementoContext::create_inmemory().expect("inmemory context");
    ctx.sys = sys.clone();
    ctx.messenger = messenger.clone();

    TestContext {
        ctx,
        sys,
        messenger,
    }
}
