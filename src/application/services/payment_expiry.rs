//! Background task that rejects pending payments left without proof.
//!
//! Runs in a tokio::spawn loop; each pass goes through the same settle path
//! as an admin rejection, so expired reservations free their slots.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{info, warn};

use super::PaymentService;
use crate::shared::shutdown::ShutdownSignal;

/// Start the payment expiry background task.
///
/// Every `check_interval_secs` it rejects `Pending` payments without proof
/// that were opened more than `ttl` ago.
pub fn start_payment_expiry_task(
    payments: Arc<PaymentService>,
    shutdown: ShutdownSignal,
    ttl: chrono::Duration,
    check_interval_secs: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            check_interval = check_interval_secs,
            ttl_hours = ttl.num_hours(),
            "Payment expiry task started"
        );

        let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs.max(1)));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match payments.expire_stale(Utc::now(), ttl).await {
                        Ok(0) => {}
                        Ok(count) => info!(count, "Stale payments rejected"),
                        Err(e) => warn!(error = %e, "Payment expiry check error"),
                    }
                }
                _ = shutdown.wait() => {
                    info!("Payment expiry task shutting down");
                    break;
                }
            }
        }

        info!("Payment expiry task stopped");
    })
}
