use std::time::Duration;

use lettervideo_application::{
    ControllerSettings, FailureKind, FailureReasonTable, FailureRule, SubmitMessages,
    UserMessages,
};
use lettervideo_configuration::{AppConfig, FailureKindConfig};
use lettervideo_domain::LetterLimits;

pub fn controller_settings(config: &AppConfig) -> ControllerSettings {
    let rules = config
        .failures
        .rules
        .iter()
        .map(|rule| {
            FailureRule::new(
                rule.pattern.clone(),
                failure_kind(rule.kind),
                rule.message.clone(),
            )
        })
        .collect();

    ControllerSettings {
        limits: LetterLimits::new(config.letter.min_chars, config.letter.max_chars),
        poll_interval: Duration::from_millis(config.polling.interval_ms),
        submit_messages: SubmitMessages {
            queued: config.backend.queued_message.clone(),
            invalid_payload: config.backend.invalid_payload_message.clone(),
        },
        failures: FailureReasonTable::new(rules, config.failures.fallback_message.clone()),
        messages: UserMessages {
            queued: config.messages.queued.clone(),
            processing: config.messages.processing.clone(),
            submit_status_template: config.messages.submit_status_template.clone(),
            submit_failed: config.messages.submit_failed.clone(),
            poll_status_template: config.messages.poll_status_template.clone(),
            poll_failed: config.messages.poll_failed.clone(),
            malformed_acknowledgement: config.messages.malformed_acknowledgement.clone(),
        },
    }
}

fn failure_kind(kind: FailureKindConfig) -> FailureKind {
    match kind {
        FailureKindConfig::ContentPolicy => FailureKind::ContentPolicy,
        FailureKindConfig::ComputationFault => FailureKind::ComputationFault,
        FailureKindConfig::Generic => FailureKind::Generic,
    }
}
