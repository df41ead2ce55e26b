// src/core/services/health.rs
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct HealthService {
    start_time: i64,
    processed_requests: AtomicU64,
}

#[derive(Debug, Serialize)]
pub struct HealthMetrics {
    pub uptime_seconds: i64,
    pub processed_requests: u64,
}

impl HealthService {
    pub fn new() -> Self {
        Self {
            start_time: chrono::Utc::now().timestamp(),
            processed_requests: AtomicU64::new(0),
        }
    }

    pub fn record_request(&self) {
        self.processed_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_metrics(&self) -> HealthMetrics {
        HealthMetrics {
            uptime_seconds: chrono::Utc::now().timestamp() - self.start_time,
            processed_requests: self.processed_requests.load(Ordering::Relaxed),
        }
    }
}

impl Default for HealthService {
    fn default() -> Self {
        Self::new()
    }
}
