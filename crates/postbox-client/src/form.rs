use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use postbox_types::api::SubmitMessageRequest;
use postbox_types::validation::{Field, FieldErrors, validate};

use crate::api::{ClientError, MessagesApi, SubmitOutcome};

pub const SUCCESS_BANNER: Duration = Duration::from_secs(3);
pub const FAILURE_BANNER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy)]
struct Banner {
    status: SubmitStatus,
    expires_at: Instant,
}

#[derive(Debug, Clone, Default)]
struct Values {
    name: String,
    phone: String,
    message: String,
}

impl Values {
    fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Message => &self.message,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Phone => &mut self.phone,
            Field::Message => &mut self.message,
        }
    }

    fn to_request(&self) -> SubmitMessageRequest {
        SubmitMessageRequest::new(&self.name, &self.phone, &self.message)
    }
}

/// In-memory state of the message form.
///
/// A submission runs in two halves, `begin_submit` and `finish_submit`, so a
/// front end can render the in-flight state while the request is pending.
/// `submit` drives both halves against a `MessagesApi`.
#[derive(Debug, Clone, Default)]
pub struct MessageForm {
    values: Values,
    errors: FieldErrors,
    submitting: bool,
    banner: Option<Banner>,
}

impl MessageForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: Field) -> &str {
        self.values.get(field)
    }

    /// Store a new value and drop any error shown for that field.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        *self.values.slot(field) = value.into();
        self.errors.remove(field);
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Controls are disabled while this is set.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn status(&self) -> Option<SubmitStatus> {
        self.status_at(Instant::now())
    }

    pub fn status_at(&self, now: Instant) -> Option<SubmitStatus> {
        self.banner
            .filter(|b| now < b.expires_at)
            .map(|b| b.status)
    }

    /// Forget a banner whose display window has passed.
    pub fn expire_status(&mut self) {
        if self.banner.is_some() && self.status().is_none() {
            self.banner = None;
        }
    }

    /// Run the field rules locally, replacing the displayed errors.
    pub fn validate(&mut self) -> bool {
        match validate(&self.values.to_request()) {
            Ok(_) => {
                self.errors.clear();
                true
            }
            Err(errors) => {
                self.errors = errors;
                false
            }
        }
    }

    /// Validate and, if everything passes, mark the form in flight and hand
    /// back the request to send. Returns `None` when nothing should be sent.
    pub fn begin_submit(&mut self) -> Option<SubmitMessageRequest> {
        if self.submitting {
            debug!("Submission already in flight, ignoring");
            return None;
        }
        if !self.validate() {
            return None;
        }

        self.submitting = true;
        self.banner = None;
        Some(self.values.to_request())
    }

    /// Apply the settled result of a submission.
    pub fn finish_submit(&mut self, result: Result<SubmitOutcome, ClientError>) {
        self.submitting = false;

        match result {
            Ok(SubmitOutcome::Created { id, .. }) => {
                debug!(id, "Message accepted");
                self.values = Values::default();
                self.errors.clear();
                self.show(SubmitStatus::Success, SUCCESS_BANNER);
            }
            Ok(SubmitOutcome::Rejected(errors)) if !errors.is_empty() => {
                self.errors = errors;
            }
            Ok(SubmitOutcome::Rejected(_)) => {
                warn!("Server rejected the form without naming a known field");
                self.show(SubmitStatus::Failure, FAILURE_BANNER);
            }
            Err(e) => {
                warn!("Error submitting form: {}", e);
                self.show(SubmitStatus::Failure, FAILURE_BANNER);
            }
        }
    }

    /// Validate, send and apply the result. Returns whether a request was
    /// actually sent.
    pub async fn submit<A: MessagesApi>(&mut self, api: &A) -> bool {
        let Some(req) = self.begin_submit() else {
            return false;
        };
        let result = api.submit(&req).await;
        self.finish_submit(result);
        true
    }

    fn show(&mut self, status: SubmitStatus, window: Duration) {
        self.banner = Some(Banner {
            status,
            expires_at: Instant::now() + window,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Replays a fixed outcome and records what it was sent.
    struct FakeApi {
        outcome: fn() -> Result<SubmitOutcome, ClientError>,
        sent: Mutex<Vec<SubmitMessageRequest>>,
    }

    impl FakeApi {
        fn new(outcome: fn() -> Result<SubmitOutcome, ClientError>) -> Self {
            Self {
                outcome,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<SubmitMessageRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl MessagesApi for FakeApi {
        async fn submit(&self, req: &SubmitMessageRequest) -> Result<SubmitOutcome, ClientError> {
            self.sent.lock().unwrap().push(req.clone());
            (self.outcome)()
        }
    }

    fn created() -> Result<SubmitOutcome, ClientError> {
        Ok(SubmitOutcome::Created {
            id: 1,
            message: "ok".into(),
        })
    }

    fn rejected_phone() -> Result<SubmitOutcome, ClientError> {
        let mut errors = FieldErrors::new();
        errors.insert(Field::Phone, "server says no");
        Ok(SubmitOutcome::Rejected(errors))
    }

    fn server_down() -> Result<SubmitOutcome, ClientError> {
        Err(ClientError::UnexpectedStatus(500))
    }

    fn filled() -> MessageForm {
        let mut form = MessageForm::new();
        form.set_field(Field::Name, "Иван");
        form.set_field(Field::Phone, "+375291234567");
        form.set_field(Field::Message, "Привет!");
        form
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_backend() {
        let api = FakeApi::new(created);
        let mut form = MessageForm::new();
        form.set_field(Field::Name, "A");
        form.set_field(Field::Phone, "12345");

        assert!(!form.submit(&api).await);
        assert!(api.sent().is_empty());
        assert_eq!(form.errors().len(), 3);
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn editing_a_field_clears_only_its_error() {
        let mut form = MessageForm::new();
        assert!(!form.validate());

        form.set_field(Field::Name, "И");
        assert!(form.error(Field::Name).is_none());
        assert!(form.error(Field::Phone).is_some());
        assert!(form.error(Field::Message).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn success_clears_form_and_shows_banner_for_three_seconds() {
        let api = FakeApi::new(created);
        let mut form = filled();

        assert!(form.submit(&api).await);
        assert_eq!(api.sent(), vec![SubmitMessageRequest::new("Иван", "+375291234567", "Привет!")]);
        assert_eq!(form.status(), Some(SubmitStatus::Success));
        for field in Field::ALL {
            assert_eq!(form.value(field), "");
        }
        assert!(form.errors().is_empty());
        assert!(!form.is_submitting());

        tokio::time::advance(Duration::from_millis(2_900)).await;
        assert_eq!(form.status(), Some(SubmitStatus::Success));

        tokio::time::advance(Duration::from_millis(200)).await;
        assert_eq!(form.status(), None);
        form.expire_status();
        assert_eq!(form.status(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_keeps_values_and_shows_banner_for_five_seconds() {
        let api = FakeApi::new(server_down);
        let mut form = filled();

        assert!(form.submit(&api).await);
        assert_eq!(form.status(), Some(SubmitStatus::Failure));
        assert_eq!(form.value(Field::Name), "Иван");
        assert_eq!(form.value(Field::Phone), "+375291234567");
        assert!(!form.is_submitting());

        tokio::time::advance(Duration::from_millis(4_900)).await;
        assert_eq!(form.status(), Some(SubmitStatus::Failure));

        tokio::time::advance(Duration::from_millis(200)).await;
        assert_eq!(form.status(), None);
    }

    #[tokio::test]
    async fn server_field_errors_are_shown_on_their_fields() {
        let api = FakeApi::new(rejected_phone);
        let mut form = filled();

        assert!(form.submit(&api).await);
        assert_eq!(form.error(Field::Phone), Some("server says no"));
        assert_eq!(form.errors().len(), 1);
        assert_eq!(form.status(), None);
        assert_eq!(form.value(Field::Message), "Привет!");
    }

    #[tokio::test]
    async fn rejection_without_known_fields_is_a_failure() {
        let mut form = filled();
        form.begin_submit().unwrap();
        form.finish_submit(Ok(SubmitOutcome::Rejected(FieldErrors::new())));
        assert_eq!(form.status(), Some(SubmitStatus::Failure));
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_is_ignored() {
        let mut form = filled();
        assert!(form.begin_submit().is_some());
        assert!(form.is_submitting());
        assert!(form.begin_submit().is_none());

        form.finish_submit(created());
        assert!(!form.is_submitting());
    }

    #[tokio::test(start_paused = true)]
    async fn new_submission_clears_previous_banner() {
        let mut form = filled();
        form.begin_submit().unwrap();
        form.finish_submit(server_down());
        assert_eq!(form.status(), Some(SubmitStatus::Failure));

        form.begin_submit().unwrap();
        assert_eq!(form.status(), None);
    }
}
