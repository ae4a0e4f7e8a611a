use std::sync::Arc;
use tokio::time::{interval, sleep, Duration, MissedTickBehavior};
use tracing::{error, info};

use crate::{
    models::{Asset, SpotPrice},
    resolver::{PriceStore, SpotPriceSource},
};

#[derive(Clone, Copy, Debug)]
enum TaskType {
    RecordSpotPrice(Asset),
}

pub struct Task {
    interval: Duration,
    task_type: TaskType,
}

/// Periodically persists live spot prices so the resolver has something to fall back on
pub struct Scheduler {
    store: Arc<dyn PriceStore>,
    spot: Arc<dyn SpotPriceSource>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(store: Arc<dyn PriceStore>, spot: Arc<dyn SpotPriceSource>, interval: Duration) -> Self {
        Scheduler {
            store,
            spot,
            interval,
        }
    }

    pub async fn run_task(task: Task, store: Arc<dyn PriceStore>, spot: Arc<dyn SpotPriceSource>) {
        let mut interval = interval(task.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            match task.task_type {
                TaskType::RecordSpotPrice(asset) => {
                    Self::record_spot_price(store.as_ref(), spot.as_ref(), asset).await;
                }
            }
        }
    }

    /// Spawns one recording loop per asset, a few seconds apart
    pub async fn spawn_tasks(&self) {
        let tasks = Asset::ALL.map(|asset| Task {
            interval: self.interval,
            task_type: TaskType::RecordSpotPrice(asset),
        });

        let delay = Duration::from_secs(5);
        for task in tasks {
            info!("Scheduling {:?} every {:?}", task.task_type, task.interval);
            let store = Arc::clone(&self.store);
            let spot = Arc::clone(&self.spot);
            tokio::spawn(async move {
                Self::run_task(task, store, spot).await;
            });
            sleep(delay).await;
        }
    }

    async fn record_spot_price(
        store: &dyn PriceStore,
        spot: &dyn SpotPriceSource,
        asset: Asset,
    ) -> Option<SpotPrice> {
        match spot.current_price(asset).await {
            Ok(price) => match store.record_price(asset, price).await {
                Ok(row) => {
                    info!("Recorded {} price {}", asset, row.usd_price);
                    Some(row)
                }
                Err(e) => {
                    error!("Error recording {} price: {}", asset, e);
                    None
                }
            },
            Err(e) => {
                error!("Error getting {} price: {}", asset, e);
                None
            }
        }
    }
}
