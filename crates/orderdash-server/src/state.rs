use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::watch;
use tracing::info;

use orderdash_core::aggregate;
use orderdash_core::config::Config;
use orderdash_core::record::{OrderRecord, ProductRecord, UserRecord};

/// The latest full contents of every collection, as last delivered by the
/// data-access collaborator.
///
/// Collections sit behind `Arc` so handing a snapshot to a handler is a few
/// reference-count bumps, never a copy of the records.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub orders: Arc<Vec<OrderRecord>>,
    pub products: Arc<Vec<ProductRecord>>,
    pub users: Arc<Vec<UserRecord>>,
    /// `None` until the first replacement.
    pub received_at: Option<DateTime<Utc>>,
}

/// Source of the current instant. Tests pin it so calendar windows do not
/// move under them.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
pub struct AppState {
    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,

    /// Publishes each replaced snapshot. Readers clone the current value out
    /// of the channel and never observe a half-replaced collection.
    snapshot: watch::Sender<Snapshot>,

    clock: Clock,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, Arc::new(Utc::now))
    }

    pub fn with_clock(config: Config, clock: Clock) -> Self {
        let (snapshot, _) = watch::channel(Snapshot::default());
        Self {
            config: Arc::new(config),
            snapshot,
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Current snapshot. The channel borrow is released before returning.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.subscribe()
    }

    /// Today in the configured calendar.
    pub fn reference_date(&self) -> NaiveDate {
        self.now().with_timezone(&self.config.timezone).date_naive()
    }

    pub fn replace_orders(&self, orders: Vec<OrderRecord>) {
        self.publish(|snap| snap.orders = Arc::new(orders));
    }

    pub fn replace_products(&self, products: Vec<ProductRecord>) {
        self.publish(|snap| snap.products = Arc::new(products));
    }

    pub fn replace_users(&self, users: Vec<UserRecord>) {
        self.publish(|snap| snap.users = Arc::new(users));
    }

    fn publish(&self, apply: impl FnOnce(&mut Snapshot)) {
        let now = self.now();
        self.snapshot.send_modify(|snap| {
            apply(snap);
            snap.received_at = Some(now);
        });
    }

    /// Background loop: recompute the dashboard summary on every snapshot
    /// replacement and log it.
    ///
    /// Spawned as a `tokio::spawn` task in `main.rs`. Each run starts from
    /// the new snapshot alone; nothing is carried over from the previous one.
    pub async fn run_snapshot_watch_loop(self: Arc<Self>) {
        let mut rx = self.subscribe();
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            let summary = aggregate::compute_summary(
                snapshot.orders.iter(),
                self.config.dashboard_days,
                self.reference_date(),
                &self.config.timezone,
            );
            info!(
                orders = snapshot.orders.len(),
                products = snapshot.products.len(),
                users = snapshot.users.len(),
                window_days = self.config.dashboard_days,
                total_revenue = summary.total_revenue,
                order_count = summary.order_count,
                today_count = summary.today_count,
                "Snapshot replaced, dashboard recomputed"
            );
        }
    }
}
