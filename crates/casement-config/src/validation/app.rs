//! Validation for the managed application and the poll loop.

use crate::schema::CasementConfig;

use super::helpers::{validate_non_empty, validate_range};

pub(crate) fn validate_app(errors: &mut Vec<String>, config: &CasementConfig) {
    let app = &config.app;
    validate_non_empty(errors, "app.executable", &app.executable);
    validate_non_empty(errors, "app.class_filter", &app.class_filter);
    validate_non_empty(errors, "app.title_prefix", &app.title_prefix);
    validate_range(errors, "app.max_instances", u64::from(app.max_instances), 1, 16);
    validate_range(errors, "app.spawn_timeout_ms", app.spawn_timeout_ms, 100, 120_000);
    validate_range(errors, "app.close_grace_ms", app.close_grace_ms, 0, 60_000);

    if app.default_slots.len() < app.max_instances as usize {
        errors.push(format!(
            "app.default_slots has {} entries but app.max_instances = {}",
            app.default_slots.len(),
            app.max_instances
        ));
    }
    for (i, slot) in app.default_slots.iter().enumerate() {
        if !slot.is_well_formed() {
            errors.push(format!(
                "app.default_slots[{i}] must have right >= left and bottom >= top"
            ));
        }
    }
}

pub(crate) fn validate_sync(errors: &mut Vec<String>, config: &CasementConfig) {
    validate_range(
        errors,
        "sync.poll_interval_ms",
        config.sync.poll_interval_ms,
        100,
        60_000,
    );
    if config.sync.event_capacity == 0 {
        errors.push("sync.event_capacity must be >= 1".into());
    }
}
