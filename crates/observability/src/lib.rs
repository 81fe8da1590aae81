use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use helpdesk_core::IntentBranch;
use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    asks_total: AtomicU64,
    tool_calls_total: AtomicU64,
    policy_answers_total: AtomicU64,
    faq_answers_total: AtomicU64,
    workflow_answers_total: AtomicU64,
    fallback_total: AtomicU64,
    total_latency_micros: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub asks_total: u64,
    pub tool_calls_total: u64,
    pub policy_answers_total: u64,
    pub faq_answers_total: u64,
    pub workflow_answers_total: u64,
    pub fallback_total: u64,
    pub avg_latency_micros: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_ask(&self) {
        self.asks_total.fetch_add(1, Ordering::Relaxed);
        counter!("helpdesk_asks_total").increment(1);
    }

    pub fn add_tool_calls(&self, calls: usize) {
        self.tool_calls_total
            .fetch_add(calls as u64, Ordering::Relaxed);
        counter!("helpdesk_tool_calls_total").increment(calls as u64);
    }

    /// Counts an answer under the intent branch that produced it.
    pub fn record_answer(&self, branch: IntentBranch) {
        let slot = match branch {
            IntentBranch::Policy => &self.policy_answers_total,
            IntentBranch::Faq => &self.faq_answers_total,
            IntentBranch::Workflow => &self.workflow_answers_total,
            IntentBranch::Fallback => &self.fallback_total,
        };
        slot.fetch_add(1, Ordering::Relaxed);
        counter!("helpdesk_answers_total", "branch" => branch.as_str()).increment(1);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_micros
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        histogram!("helpdesk_ask_latency_seconds").record(duration.as_secs_f64());
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let asks = self.asks_total.load(Ordering::Relaxed);
        let latency = self.total_latency_micros.load(Ordering::Relaxed);

        MetricsSnapshot {
            asks_total: asks,
            tool_calls_total: self.tool_calls_total.load(Ordering::Relaxed),
            policy_answers_total: self.policy_answers_total.load(Ordering::Relaxed),
            faq_answers_total: self.faq_answers_total.load(Ordering::Relaxed),
            workflow_answers_total: self.workflow_answers_total.load(Ordering::Relaxed),
            fallback_total: self.fallback_total.load(Ordering::Relaxed),
            avg_latency_micros: if asks == 0 {
                0.0
            } else {
                latency as f64 / asks as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,helpdesk_agents=info,helpdesk_storage=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
