//! Contact form submission flow.
//!
//! Nothing leaves the process: a successful submission waits for a simulated
//! delivery delay, reports success and clears the form.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use metrics::counter;
use tracing::{debug, info};

use super::status::{DEFAULT_STATUS_TTL, StatusBoard, StatusMessage};
use crate::domain::contact::{ContactFields, ValidationError};
use crate::util::lock::mutex_lock;

const SOURCE: &str = "application::contact";

pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_secs(1);

pub const SUCCESS_MESSAGE: &str = "Thanks!\nYour email was sent successfully!";

#[derive(Debug, Clone, Copy)]
pub struct ContactConfig {
    pub submit_delay: Duration,
    pub status_ttl: Duration,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            submit_delay: DEFAULT_SUBMIT_DELAY,
            status_ttl: DEFAULT_STATUS_TTL,
        }
    }
}

impl From<&crate::config::ContactSettings> for ContactConfig {
    fn from(settings: &crate::config::ContactSettings) -> Self {
        Self {
            submit_delay: settings.submit_delay,
            status_ttl: settings.status_ttl,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The message was accepted and the form cleared.
    Sent,
    /// A previous submission is still in flight; the submit button is disabled.
    Ignored,
}

#[derive(Debug, Default)]
struct FormState {
    fields: ContactFields,
    submitting: bool,
}

#[derive(Clone)]
pub struct ContactFormHandler {
    form: Arc<Mutex<FormState>>,
    status: StatusBoard,
    config: ContactConfig,
}

impl ContactFormHandler {
    pub fn new(config: ContactConfig, status: StatusBoard) -> Self {
        Self {
            form: Arc::new(Mutex::new(FormState::default())),
            status,
            config,
        }
    }

    pub fn fields(&self) -> ContactFields {
        mutex_lock(&self.form, SOURCE, "fields").fields.clone()
    }

    /// Whether the form is in its loading state.
    pub fn is_submitting(&self) -> bool {
        mutex_lock(&self.form, SOURCE, "is_submitting").submitting
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    /// Validate and submit `fields`.
    ///
    /// The first failing rule is shown as an error status and returned.
    pub async fn submit(&self, fields: ContactFields) -> Result<SubmitOutcome, ValidationError> {
        {
            let mut form = mutex_lock(&self.form, SOURCE, "submit");
            if form.submitting {
                debug!(target: "devguide::contact", "Submission ignored while another is in flight");
                return Ok(SubmitOutcome::Ignored);
            }

            form.fields = fields;
            if let Err(err) = form.fields.validate() {
                drop(form);
                counter!("devguide_contact_submit_total", "result" => "invalid").increment(1);
                info!(target: "devguide::contact", error = %err, "Contact form rejected");
                self.status
                    .show(StatusMessage::error_with_ttl(err.user_message(), self.config.status_ttl));
                return Err(err);
            }

            form.submitting = true;
        }
        let loading = LoadingGuard { form: &self.form };

        tokio::time::sleep(self.config.submit_delay).await;

        self.status.show(StatusMessage::success_with_ttl(
            SUCCESS_MESSAGE,
            self.config.status_ttl,
        ));
        mutex_lock(&self.form, SOURCE, "submit_complete").fields = ContactFields::default();
        drop(loading);

        counter!("devguide_contact_submit_total", "result" => "sent").increment(1);
        info!(target: "devguide::contact", "Contact form submitted");
        Ok(SubmitOutcome::Sent)
    }
}

/// Leaves the loading state on drop, also when a submit future is abandoned mid-delay.
struct LoadingGuard<'a> {
    form: &'a Mutex<FormState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        mutex_lock(self.form, SOURCE, "leave_loading").submitting = false;
    }
}
