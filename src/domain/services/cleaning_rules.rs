use chrono::Duration;
use uuid::Uuid;
use crate::domain::models::booking::Booking;
use crate::domain::models::checklist::{CleaningRule, TRIGGER_CHECKOUT};
use crate::domain::models::housekeeping::{HousekeepingTask, NewTaskParams, CLEANING_STANDARD};
use crate::error::AppError;

/// A cleaning rule paired with the checklist its template resolved to.
#[derive(Debug, Clone)]
pub struct ResolvedRule {
    pub rule: CleaningRule,
    pub checklist: Vec<String>,
}

/// Rule applied when a listing has no checkout rule matching the stay.
pub fn default_checkout_rule() -> CleaningRule {
    CleaningRule {
        id: Uuid::nil().to_string(),
        listing_id: None,
        name: "Checkout cleaning".to_string(),
        cleaning_type: CLEANING_STANDARD.to_string(),
        trigger_type: TRIGGER_CHECKOUT.to_string(),
        interval_days: None,
        min_nights: 0,
        template_id: None,
        is_active: true,
        created_at: chrono::Utc::now(),
    }
}

/// Turns a booking and its rules into task drafts.
///
/// `rules` must already be ordered by precedence; the first matching checkout
/// rule yields the primary task. `fallback` is used when none matches, so the
/// result is never empty.
pub fn plan_tasks(booking: &Booking, rules: &[ResolvedRule], fallback: &ResolvedRule) -> Result<Vec<HousekeepingTask>, AppError> {
    let nights = booking.nights();
    if nights <= 0 {
        return Err(AppError::Validation(format!(
            "invalid stay dates: check-out {} is not after check-in {}",
            booking.check_out, booking.check_in
        )));
    }

    let applicable = |r: &&ResolvedRule| r.rule.is_active && i64::from(r.rule.min_nights) <= nights;

    let mut tasks = Vec::new();

    for resolved in rules.iter().filter(|r| r.rule.is_checkout()).filter(applicable) {
        let is_primary = tasks.is_empty();
        tasks.push(checkout_task(booking, resolved, is_primary));
    }

    if tasks.is_empty() {
        tasks.push(checkout_task(booking, fallback, true));
    }

    for resolved in rules.iter().filter(|r| r.rule.is_mid_stay()).filter(applicable) {
        let Some(interval) = resolved.rule.interval_days.filter(|d| *d > 0) else {
            continue;
        };
        let step = Duration::days(i64::from(interval));
        let mut next = booking.check_in.checked_add_signed(step);
        while let Some(due) = next.filter(|d| *d < booking.check_out) {
            tasks.push(HousekeepingTask::new(NewTaskParams {
                booking_id: booking.id.clone(),
                listing_id: booking.listing_id.clone(),
                title: format!("{} mid-stay cleaning", resolved.rule.cleaning_type),
                due_date: due,
                task_type: resolved.rule.cleaning_type.clone(),
                checklist_titles: resolved.checklist.clone(),
                assigned_to: None,
                is_primary: false,
            }));
            next = due.checked_add_signed(step);
        }
    }

    Ok(tasks)
}

fn checkout_task(booking: &Booking, resolved: &ResolvedRule, is_primary: bool) -> HousekeepingTask {
    HousekeepingTask::new(NewTaskParams {
        booking_id: booking.id.clone(),
        listing_id: booking.listing_id.clone(),
        title: format!("{} checkout cleaning", resolved.rule.cleaning_type),
        due_date: booking.check_out,
        task_type: resolved.rule.cleaning_type.clone(),
        checklist_titles: resolved.checklist.clone(),
        assigned_to: None,
        is_primary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::booking::NewBookingParams;
    use crate::domain::models::checklist::{NewRuleParams, TRIGGER_MID_STAY};
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn booking(check_in: NaiveDate, check_out: NaiveDate) -> Booking {
        Booking::new(NewBookingParams {
            id: "res-1".to_string(),
            listing_id: "villa-azure".to_string(),
            guest_name: Some("Test Guest".to_string()),
            check_in,
            check_out,
            status: "confirmed".to_string(),
            source: "test".to_string(),
        })
    }

    fn resolved(trigger: &str, cleaning_type: &str, interval: Option<i32>, min_nights: i32) -> ResolvedRule {
        ResolvedRule {
            rule: CleaningRule::new(NewRuleParams {
                listing_id: Some("villa-azure".to_string()),
                name: format!("{} rule", cleaning_type),
                cleaning_type: cleaning_type.to_string(),
                trigger_type: trigger.to_string(),
                interval_days: interval,
                min_nights,
                template_id: None,
            }),
            checklist: vec![format!("{} step", cleaning_type)],
        }
    }

    fn fallback() -> ResolvedRule {
        ResolvedRule { rule: default_checkout_rule(), checklist: vec!["Standard step".to_string()] }
    }

    #[test]
    fn test_no_rules_yields_single_standard_checkout_task() {
        let b = booking(date(4, 1), date(4, 4));
        let tasks = plan_tasks(&b, &[], &fallback()).unwrap();

        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].is_primary);
        assert_eq!(tasks[0].due_date, date(4, 4));
        assert_eq!(tasks[0].task_type, "Standard");
        assert_eq!(tasks[0].booking_id, "res-1");
        assert_eq!(tasks[0].checklist.0.len(), 1);
        assert!(!tasks[0].checklist.0[0].completed);
    }

    #[test]
    fn test_only_first_checkout_rule_is_primary() {
        let b = booking(date(4, 1), date(4, 10));
        let rules = vec![
            resolved(TRIGGER_CHECKOUT, "Standard", None, 0),
            resolved(TRIGGER_CHECKOUT, "Deep", None, 7),
        ];
        let tasks = plan_tasks(&b, &rules, &fallback()).unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks.iter().filter(|t| t.is_primary).count(), 1);
        assert_eq!(tasks[0].task_type, "Standard");
        assert_eq!(tasks[1].task_type, "Deep");
        assert!(tasks.iter().all(|t| t.due_date == date(4, 10)));
    }

    #[test]
    fn test_min_nights_filters_rules_and_falls_back() {
        let b = booking(date(4, 1), date(4, 3));
        let rules = vec![resolved(TRIGGER_CHECKOUT, "Deep", None, 7)];
        let tasks = plan_tasks(&b, &rules, &fallback()).unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task_type, "Standard");
        assert!(tasks[0].is_primary);
    }

    #[test]
    fn test_mid_stay_rule_schedules_strictly_before_checkout() {
        let b = booking(date(4, 1), date(4, 10));
        let rules = vec![
            resolved(TRIGGER_CHECKOUT, "Standard", None, 0),
            resolved(TRIGGER_MID_STAY, "Linen & Towel Change", Some(3), 4),
        ];
        let tasks = plan_tasks(&b, &rules, &fallback()).unwrap();

        let mid: Vec<NaiveDate> = tasks.iter().filter(|t| !t.is_primary).map(|t| t.due_date).collect();
        assert_eq!(mid, vec![date(4, 4), date(4, 7)]);
        assert!(tasks.iter().filter(|t| !t.is_primary).all(|t| t.task_type == "Linen & Towel Change"));
    }

    #[test]
    fn test_mid_stay_on_checkout_day_is_skipped() {
        let b = booking(date(4, 1), date(4, 7));
        let rules = vec![resolved(TRIGGER_MID_STAY, "Full", Some(3), 0)];
        let tasks = plan_tasks(&b, &rules, &fallback()).unwrap();

        let mid: Vec<NaiveDate> = tasks.iter().filter(|t| !t.is_primary).map(|t| t.due_date).collect();
        assert_eq!(mid, vec![date(4, 4)]);
    }

    #[test]
    fn test_inactive_and_zero_interval_rules_are_ignored() {
        let b = booking(date(4, 1), date(4, 10));
        let mut inactive = resolved(TRIGGER_CHECKOUT, "Deep", None, 0);
        inactive.rule.is_active = false;
        let rules = vec![inactive, resolved(TRIGGER_MID_STAY, "Full", Some(0), 0)];
        let tasks = plan_tasks(&b, &rules, &fallback()).unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task_type, "Standard");
    }

    #[test]
    fn test_invalid_stay_is_rejected() {
        let b = booking(date(4, 5), date(4, 5));
        let err = plan_tasks(&b, &[], &fallback()).unwrap_err();
        assert!(err.to_string().contains("invalid stay dates"));
    }

    #[test]
    fn test_oversized_interval_stops_without_panicking() {
        let b = booking(date(4, 1), date(4, 10));
        let rules = vec![resolved(TRIGGER_MID_STAY, "Full", Some(i32::MAX), 0)];
        let tasks = plan_tasks(&b, &rules, &fallback()).unwrap();

        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].is_primary);

        let late = booking(NaiveDate::MAX - Duration::days(5), NaiveDate::MAX);
        let rules = vec![resolved(TRIGGER_MID_STAY, "Full", Some(3), 0)];
        let tasks = plan_tasks(&late, &rules, &fallback()).unwrap();
        assert_eq!(tasks.iter().filter(|t| !t.is_primary).count(), 1);
    }
}
