use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn, info_span, Instrument};
use crate::state::AppState;
use crate::domain::services::booking_sync::BookingSyncService;
use crate::domain::services::task_generation::{GenerationRequest, GenerationSummary, TaskGenerationService};

pub async fn start_background_worker(state: Arc<AppState>) {
    let interval = Duration::from_secs(state.config.task_generation_interval_secs.max(1));
    info!("Starting housekeeping worker (every {}s)...", interval.as_secs());

    loop {
        let span = info_span!("housekeeping_cycle", today = %state.config.today());
        run_cycle(&state).instrument(span).await;
        sleep(interval).await;
    }
}

/// One pass of the worker: refresh bookings when a channel manager is configured,
/// then derive tasks for whatever is still uncovered.
pub async fn run_cycle(state: &AppState) -> GenerationSummary {
    let today = state.config.today();

    if state.config.channel_manager.is_configured() {
        let sync = BookingSyncService::new(state.channel_manager.clone(), state.booking_repo.clone());
        if let Err(e) = sync.sync(today, state.config.booking_sync_horizon_days).await {
            warn!("Booking sync failed, deriving tasks from stored bookings: {}", e);
        }
    }

    let generator = TaskGenerationService::new(
        state.booking_repo.clone(),
        state.task_repo.clone(),
        state.template_repo.clone(),
        state.rule_repo.clone(),
    );
    let request = GenerationRequest {
        batch_size: Some(state.config.task_generation_batch_size),
        ..Default::default()
    };

    let summary = generator.run(&request, today).await;
    if !summary.success {
        error!("Scheduled task generation failed: {:?}", summary.error);
    }
    summary
}
