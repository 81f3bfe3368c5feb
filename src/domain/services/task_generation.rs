use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, warn, Instrument};
use crate::domain::models::booking::{Booking, CandidateFilter};
use crate::domain::models::housekeeping::CLEANING_STANDARD;
use crate::domain::ports::{BookingRepository, ChecklistTemplateRepository, CleaningRuleRepository, HousekeepingTaskRepository};
use crate::domain::services::cleaning_rules::{default_checkout_rule, plan_tasks, ResolvedRule};
use crate::domain::services::templates::resolve_checklist;
use crate::error::AppError;

pub const DEFAULT_BATCH_SIZE: i64 = 50;
pub const MAX_BATCH_SIZE: i64 = 500;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub listing_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub batch_size: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSummary {
    pub success: bool,
    pub processed: usize,
    pub total: usize,
    pub skipped: usize,
    pub tasks_generated: usize,
    /// Elapsed milliseconds.
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationSummary {
    fn failed(message: String, started: Instant) -> Self {
        Self {
            success: false,
            processed: 0,
            total: 0,
            skipped: 0,
            tasks_generated: 0,
            duration: started.elapsed().as_millis() as u64,
            errors: None,
            error: Some(message),
        }
    }
}

/// Result of processing one candidate: number of tasks created, or the failure message.
#[derive(Debug)]
pub struct BookingOutcome {
    pub booking_id: String,
    pub result: Result<usize, String>,
}

pub struct TaskGenerationService {
    booking_repo: Arc<dyn BookingRepository>,
    task_repo: Arc<dyn HousekeepingTaskRepository>,
    template_repo: Arc<dyn ChecklistTemplateRepository>,
    rule_repo: Arc<dyn CleaningRuleRepository>,
}

impl TaskGenerationService {
    pub fn new(
        booking_repo: Arc<dyn BookingRepository>,
        task_repo: Arc<dyn HousekeepingTaskRepository>,
        template_repo: Arc<dyn ChecklistTemplateRepository>,
        rule_repo: Arc<dyn CleaningRuleRepository>,
    ) -> Self {
        Self { booking_repo, task_repo, template_repo, rule_repo }
    }

    /// Ensures every confirmed booking checking out on or after `today` has at
    /// least one housekeeping task. Never returns an error: fatal failures are
    /// reported in the summary with `success = false`.
    pub async fn run(&self, request: &GenerationRequest, today: NaiveDate) -> GenerationSummary {
        let started = Instant::now();

        if let (Some(from), Some(to)) = (request.date_from, request.date_to)
            && from > to
        {
            return GenerationSummary::failed(format!("dateFrom {} is after dateTo {}", from, to), started);
        }

        let limit = request.batch_size.unwrap_or(DEFAULT_BATCH_SIZE).clamp(1, MAX_BATCH_SIZE);
        let filter = CandidateFilter {
            listing_id: request.listing_id.clone(),
            checkout_from: request.date_from,
            checkout_to: request.date_to,
        };

        let candidates = match self.booking_repo.find_candidates(&filter, today, limit).await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to fetch candidate bookings: {}", e);
                return GenerationSummary::failed(format!("Failed to fetch bookings: {}", e), started);
            }
        };

        let total = candidates.len();
        if total == 0 {
            info!("No candidate bookings for task generation");
            return self.summarize(Vec::new(), 0, 0, started);
        }

        let ids: Vec<String> = candidates.iter().map(|b| b.id.clone()).collect();
        let covered = match self.task_repo.booking_ids_with_tasks(&ids).await {
            Ok(set) => set,
            Err(e) => {
                error!("Failed to fetch existing housekeeping tasks: {}", e);
                return GenerationSummary::failed(format!("Failed to fetch existing tasks: {}", e), started);
            }
        };

        let pending: Vec<Booking> = candidates.into_iter()
            .filter(|b| !covered.contains(&b.id))
            .collect();
        let skipped = total - pending.len();
        info!("Task generation: {} candidates, {} already covered, {} to process", total, skipped, pending.len());
        if skipped == total && total as i64 == limit {
            warn!("Every candidate in a full batch of {} is already covered; raise batchSize or narrow the window to reach later bookings", limit);
        }

        let mut outcomes = Vec::with_capacity(pending.len());
        let mut rules_by_listing: HashMap<String, Vec<ResolvedRule>> = HashMap::new();
        let mut fallback: Option<ResolvedRule> = None;

        for booking in &pending {
            let span = info_span!("generate_tasks", booking_id = %booking.id, listing_id = %booking.listing_id);
            let result = self.generate_for_booking(booking, &mut rules_by_listing, &mut fallback)
                .instrument(span)
                .await;

            let result = match result {
                Ok(count) => {
                    info!("Generated {} task(s) for booking {}", count, booking.id);
                    Ok(count)
                }
                Err(e) => {
                    warn!("Task generation failed for booking {}: {}", booking.id, e);
                    Err(e.to_string())
                }
            };
            outcomes.push(BookingOutcome { booking_id: booking.id.clone(), result });
        }

        self.summarize(outcomes, total, skipped, started)
    }

    async fn generate_for_booking(
        &self,
        booking: &Booking,
        rules_by_listing: &mut HashMap<String, Vec<ResolvedRule>>,
        fallback: &mut Option<ResolvedRule>,
    ) -> Result<usize, AppError> {
        // Retried per booking until the default checklist loads once
        let fallback = match fallback {
            Some(rule) => rule,
            None => {
                let checklist = resolve_checklist(self.template_repo.as_ref(), None, CLEANING_STANDARD).await?;
                fallback.insert(ResolvedRule { rule: default_checkout_rule(), checklist })
            }
        };

        if !rules_by_listing.contains_key(&booking.listing_id) {
            let rules = self.rule_repo.list_active_for_listing(&booking.listing_id).await?;
            let mut resolved = Vec::with_capacity(rules.len());
            for rule in rules {
                let checklist = resolve_checklist(self.template_repo.as_ref(), rule.template_id.as_deref(), &rule.cleaning_type).await?;
                resolved.push(ResolvedRule { rule, checklist });
            }
            rules_by_listing.insert(booking.listing_id.clone(), resolved);
        }
        let rules = rules_by_listing.get(&booking.listing_id).map(Vec::as_slice).unwrap_or_default();

        let tasks = plan_tasks(booking, rules, fallback)?;
        let created = self.task_repo.create_many(&tasks).await?;
        Ok(created.len())
    }

    fn summarize(&self, outcomes: Vec<BookingOutcome>, total: usize, skipped: usize, started: Instant) -> GenerationSummary {
        let mut processed = 0;
        let mut tasks_generated = 0;
        let mut errors = Vec::new();

        for outcome in outcomes {
            match outcome.result {
                Ok(count) => {
                    processed += 1;
                    tasks_generated += count;
                }
                Err(msg) => errors.push(format!("{}: {}", outcome.booking_id, msg)),
            }
        }

        let duration = started.elapsed().as_millis() as u64;
        info!(
            processed,
            total,
            skipped,
            tasks_generated,
            failed = errors.len(),
            duration_ms = duration,
            "Task generation finished"
        );

        GenerationSummary {
            success: true,
            processed,
            total,
            skipped,
            tasks_generated,
            duration,
            errors: if errors.is_empty() { None } else { Some(errors) },
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::booking::NewBookingParams;
    use crate::domain::models::checklist::{ChecklistTemplate, CleaningRule};
    use crate::domain::models::housekeeping::{HousekeepingTask, TaskFilter};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn booking(id: &str, check_in: NaiveDate, check_out: NaiveDate) -> Booking {
        Booking::new(NewBookingParams {
            id: id.to_string(),
            listing_id: "villa-azure".to_string(),
            guest_name: None,
            check_in,
            check_out,
            status: "confirmed".to_string(),
            source: "test".to_string(),
        })
    }

    struct StubBookings {
        bookings: Vec<Booking>,
        fail: bool,
    }

    #[async_trait]
    impl BookingRepository for StubBookings {
        async fn upsert(&self, booking: &Booking) -> Result<Booking, AppError> {
            Ok(booking.clone())
        }
        async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
            Ok(self.bookings.iter().find(|b| b.id == id).cloned())
        }
        async fn list(&self, _listing_id: Option<&str>) -> Result<Vec<Booking>, AppError> {
            Ok(self.bookings.clone())
        }
        async fn find_candidates(&self, _filter: &CandidateFilter, today: NaiveDate, limit: i64) -> Result<Vec<Booking>, AppError> {
            if self.fail {
                return Err(AppError::InternalWithMsg("connection reset".to_string()));
            }
            Ok(self.bookings.iter()
                .filter(|b| b.is_confirmed() && b.check_out >= today)
                .take(limit as usize)
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    struct MemoryTasks {
        tasks: Mutex<Vec<HousekeepingTask>>,
    }

    #[async_trait]
    impl HousekeepingTaskRepository for MemoryTasks {
        async fn create_many(&self, tasks: &[HousekeepingTask]) -> Result<Vec<HousekeepingTask>, AppError> {
            self.tasks.lock().unwrap().extend(tasks.iter().cloned());
            Ok(tasks.to_vec())
        }
        async fn find_by_id(&self, id: &str) -> Result<Option<HousekeepingTask>, AppError> {
            Ok(self.tasks.lock().unwrap().iter().find(|t| t.id == id).cloned())
        }
        async fn list(&self, _filter: &TaskFilter) -> Result<Vec<HousekeepingTask>, AppError> {
            Ok(self.tasks.lock().unwrap().clone())
        }
        async fn update(&self, task: &HousekeepingTask) -> Result<HousekeepingTask, AppError> {
            Ok(task.clone())
        }
        async fn booking_ids_with_tasks(&self, booking_ids: &[String]) -> Result<HashSet<String>, AppError> {
            Ok(self.tasks.lock().unwrap().iter()
                .filter(|t| booking_ids.contains(&t.booking_id))
                .map(|t| t.booking_id.clone())
                .collect())
        }
    }

    struct NoTemplates;

    #[async_trait]
    impl ChecklistTemplateRepository for NoTemplates {
        async fn create(&self, template: &ChecklistTemplate) -> Result<ChecklistTemplate, AppError> {
            Ok(template.clone())
        }
        async fn find_by_id(&self, _id: &str) -> Result<Option<ChecklistTemplate>, AppError> {
            Ok(None)
        }
        async fn find_default(&self, _cleaning_type: &str) -> Result<Option<ChecklistTemplate>, AppError> {
            Ok(None)
        }
        async fn list(&self) -> Result<Vec<ChecklistTemplate>, AppError> {
            Ok(vec![])
        }
    }

    struct NoRules;

    #[async_trait]
    impl CleaningRuleRepository for NoRules {
        async fn create(&self, rule: &CleaningRule) -> Result<CleaningRule, AppError> {
            Ok(rule.clone())
        }
        async fn list(&self) -> Result<Vec<CleaningRule>, AppError> {
            Ok(vec![])
        }
        async fn list_active_for_listing(&self, _listing_id: &str) -> Result<Vec<CleaningRule>, AppError> {
            Ok(vec![])
        }
        async fn delete(&self, _id: &str) -> Result<(), AppError> {
            Ok(())
        }
    }

    struct BrokenTemplates;

    #[async_trait]
    impl ChecklistTemplateRepository for BrokenTemplates {
        async fn create(&self, _template: &ChecklistTemplate) -> Result<ChecklistTemplate, AppError> {
            Err(AppError::InternalWithMsg("templates unavailable".to_string()))
        }
        async fn find_by_id(&self, _id: &str) -> Result<Option<ChecklistTemplate>, AppError> {
            Err(AppError::InternalWithMsg("templates unavailable".to_string()))
        }
        async fn find_default(&self, _cleaning_type: &str) -> Result<Option<ChecklistTemplate>, AppError> {
            Err(AppError::InternalWithMsg("templates unavailable".to_string()))
        }
        async fn list(&self) -> Result<Vec<ChecklistTemplate>, AppError> {
            Ok(vec![])
        }
    }

    fn service(bookings: StubBookings, tasks: Arc<MemoryTasks>) -> TaskGenerationService {
        TaskGenerationService::new(Arc::new(bookings), tasks, Arc::new(NoTemplates), Arc::new(NoRules))
    }

    #[tokio::test]
    async fn test_candidate_fetch_failure_is_reported_not_thrown() {
        let svc = service(StubBookings { bookings: vec![], fail: true }, Arc::new(MemoryTasks::default()));
        let summary = svc.run(&GenerationRequest::default(), date(4, 1)).await;

        assert!(!summary.success);
        assert_eq!(summary.processed, 0);
        assert!(summary.error.unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_invalid_booking_does_not_abort_batch() {
        let bookings = vec![
            booking("res-bad", date(4, 10), date(4, 10)),
            booking("res-good", date(4, 2), date(4, 6)),
        ];
        let tasks = Arc::new(MemoryTasks::default());
        let svc = service(StubBookings { bookings, fail: false }, tasks.clone());

        let summary = svc.run(&GenerationRequest::default(), date(4, 1)).await;

        assert!(summary.success);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.tasks_generated, 1);
        let errors = summary.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("res-bad:"));
        assert_eq!(tasks.tasks.lock().unwrap()[0].booking_id, "res-good");
    }

    #[tokio::test]
    async fn test_second_run_processes_nothing() {
        let bookings = vec![
            booking("res-1", date(4, 2), date(4, 6)),
            booking("res-2", date(4, 3), date(4, 9)),
        ];
        let tasks = Arc::new(MemoryTasks::default());
        let svc = service(StubBookings { bookings, fail: false }, tasks.clone());

        let first = svc.run(&GenerationRequest::default(), date(4, 1)).await;
        assert_eq!(first.processed, 2);

        let second = svc.run(&GenerationRequest::default(), date(4, 1)).await;
        assert!(second.success);
        assert_eq!(second.processed, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(tasks.tasks.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_reversed_window_is_rejected() {
        let svc = service(StubBookings { bookings: vec![], fail: false }, Arc::new(MemoryTasks::default()));
        let request = GenerationRequest {
            date_from: Some(date(5, 1)),
            date_to: Some(date(4, 1)),
            ..Default::default()
        };
        let summary = svc.run(&request, date(4, 1)).await;

        assert!(!summary.success);
        assert!(summary.error.is_some());
    }

    #[tokio::test]
    async fn test_default_checklist_failure_is_reported_per_booking() {
        let bookings = vec![
            booking("res-1", date(4, 2), date(4, 6)),
            booking("res-2", date(4, 3), date(4, 9)),
        ];
        let tasks = Arc::new(MemoryTasks::default());
        let svc = TaskGenerationService::new(
            Arc::new(StubBookings { bookings, fail: false }),
            tasks.clone(),
            Arc::new(BrokenTemplates),
            Arc::new(NoRules),
        );

        let summary = svc.run(&GenerationRequest::default(), date(4, 1)).await;

        assert!(summary.success);
        assert!(summary.error.is_none());
        assert_eq!(summary.total, 2);
        assert_eq!(summary.processed, 0);
        let errors = summary.errors.unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("res-1:"));
        assert!(errors[1].starts_with("res-2:"));
        assert!(tasks.tasks.lock().unwrap().is_empty());
    }
}
