//! Step controller: wizard transitions, field focus and submission

use super::definition::FormDefinition;
use super::field::{FieldDef, FieldKind, FieldValue, CUSTOM_AMOUNT};
use super::form_state::FormState;
use super::step::{can_advance, can_submit};
use crate::api::{ApiReply, Endpoint, Payload, SubmissionError};
use crate::state::notification::Notification;
use crate::state::Record;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Label of the extra option appended to amount presets
pub const CUSTOM_AMOUNT_LABEL: &str = "Custom";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Why `begin_submit` refused to start a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBlocked {
    /// A submission is already in flight
    AlreadySubmitting,
    NotFinalStep,
    /// Some step has invalid fields; the error map is populated
    Invalid,
}

impl SubmitBlocked {
    /// Only validation failures are worth telling the user about
    pub fn notification(&self) -> Option<Notification> {
        match self {
            Self::Invalid => Some(Notification::fix_fields()),
            Self::AlreadySubmitting | Self::NotFinalStep => None,
        }
    }
}

/// Everything needed to perform one submission off the UI loop
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub session: Uuid,
    pub endpoint: Endpoint,
    pub payload: Payload,
}

/// What the UI should do with the form after a submission finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Created; the form is empty again for another entry
    Reset,
    /// Edited; the form should be closed
    Close,
    /// Failed; data is kept for another attempt
    Retry,
}

/// Owner of one mounted form
#[derive(Debug, Clone)]
pub struct FormController {
    session: Uuid,
    mode: FormMode,
    pub state: FormState,
    /// Focused field within the current step
    pub active_field: usize,
    /// Highlighted option for choice-like fields
    pub option_cursor: usize,
}

impl FormController {
    pub fn new(definition: Arc<FormDefinition>) -> Self {
        Self::with_state(FormMode::Create, FormState::new(definition))
    }

    /// Edit form pre-populated from an existing record
    pub fn edit(definition: Arc<FormDefinition>, record: &Record) -> Self {
        let state = FormState::from_record(definition, record.id.clone(), record.form_values());
        Self::with_state(FormMode::Edit, state)
    }

    fn with_state(mode: FormMode, state: FormState) -> Self {
        Self {
            session: Uuid::new_v4(),
            mode,
            state,
            active_field: 0,
            option_cursor: 0,
        }
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn definition(&self) -> &FormDefinition {
        self.state.definition()
    }

    /// Move forward if the current step is valid
    pub fn advance(&mut self) -> Result<(), Notification> {
        let step = self.state.current_step;
        if !can_advance(step, &mut self.state) {
            return Err(Notification::fix_fields());
        }
        if step < self.state.step_count() {
            self.state.go_to_step(step + 1);
            self.reset_focus();
        }
        Ok(())
    }

    /// Move back without validating
    pub fn retreat(&mut self) {
        if self.state.current_step > 1 {
            self.state.go_to_step(self.state.current_step - 1);
            self.reset_focus();
        }
    }

    /// Validate every step and mark the form as submitting. The guard is
    /// checked first so a second call while in flight is refused.
    pub fn begin_submit(&mut self) -> Result<SubmissionRequest, SubmitBlocked> {
        if self.state.is_submitting {
            return Err(SubmitBlocked::AlreadySubmitting);
        }
        if !self.state.is_final_step() {
            return Err(SubmitBlocked::NotFinalStep);
        }
        if !can_submit(&mut self.state) {
            return Err(SubmitBlocked::Invalid);
        }

        let definition = self.state.definition();
        let endpoint = match self.mode {
            FormMode::Edit => definition
                .update_endpoint
                .clone()
                .unwrap_or_else(|| definition.create_endpoint.clone()),
            FormMode::Create => definition.create_endpoint.clone(),
        };
        let values = match definition.prepare_payload {
            Some(prepare) => prepare(&self.state.values),
            None => self.state.values.clone(),
        };
        let payload = Payload::from_values(&values, self.state.record_id.as_deref());
        info!(
            multipart = payload.is_multipart(),
            "{}: submitting to {endpoint}",
            definition.title
        );

        self.state.is_submitting = true;
        Ok(SubmissionRequest {
            session: self.session,
            endpoint,
            payload,
        })
    }

    /// Apply the outcome of a submission. Always clears `is_submitting`.
    pub fn finish_submit(
        &mut self,
        result: Result<ApiReply, SubmissionError>,
    ) -> (Completion, Notification) {
        self.state.is_submitting = false;
        let title = self.definition().title;

        match result {
            Ok(_) => {
                info!("{title}: submission accepted");
                let message = self.definition().success_message;
                match self.mode {
                    FormMode::Create => {
                        self.state.reset();
                        self.reset_focus();
                        (Completion::Reset, Notification::success(message))
                    }
                    FormMode::Edit => (Completion::Close, Notification::success(message)),
                }
            }
            Err(e) => {
                warn!("{title}: submission failed: {e}");
                (Completion::Retry, Notification::error(e.user_message()))
            }
        }
    }

    /// Validate, send through `api`, and apply the outcome
    #[cfg(test)]
    pub async fn submit<A>(&mut self, api: &A) -> Result<(Completion, Notification), SubmitBlocked>
    where
        A: crate::api::ApiClientTrait + ?Sized,
    {
        let request = self.begin_submit()?;
        let result = api.send(&request.endpoint, request.payload).await;
        Ok(self.finish_submit(result))
    }

    // Field focus and editing

    pub fn fields_on_step(&self) -> Vec<&FieldDef> {
        self.definition().fields_for_step(self.state.current_step)
    }

    pub fn active_field_def(&self) -> Option<FieldDef> {
        self.fields_on_step()
            .get(self.active_field)
            .copied()
            .copied()
    }

    fn reset_focus(&mut self) {
        self.active_field = 0;
        self.option_cursor = 0;
    }

    /// Leaving a field counts as touching it
    fn blur(&mut self) {
        if let Some(def) = self.active_field_def() {
            self.state.set_touched(def.name);
        }
        self.option_cursor = 0;
    }

    pub fn next_field(&mut self) {
        let count = self.fields_on_step().len();
        if count == 0 {
            return;
        }
        self.blur();
        self.active_field = (self.active_field + 1) % count;
    }

    pub fn prev_field(&mut self) {
        let count = self.fields_on_step().len();
        if count == 0 {
            return;
        }
        self.blur();
        self.active_field = if self.active_field == 0 {
            count - 1
        } else {
            self.active_field - 1
        };
    }

    pub fn is_last_field(&self) -> bool {
        self.active_field + 1 >= self.fields_on_step().len()
    }

    /// Options offered for a field, with the custom entry for amounts
    pub fn options_for(def: &FieldDef) -> Vec<&'static str> {
        let mut options = def.options().to_vec();
        if matches!(def.kind, FieldKind::Amount(_)) {
            options.push(CUSTOM_AMOUNT_LABEL);
        }
        options
    }

    pub fn active_options(&self) -> Vec<&'static str> {
        self.active_field_def()
            .map(|def| Self::options_for(&def))
            .unwrap_or_default()
    }

    pub fn move_option(&mut self, forward: bool) {
        let count = self.active_options().len();
        if count == 0 {
            return;
        }
        self.option_cursor = if forward {
            (self.option_cursor + 1) % count
        } else {
            (self.option_cursor + count - 1) % count
        };
    }

    /// Select (or toggle, for multi-choice) the highlighted option
    pub fn choose_option(&mut self) {
        let Some(def) = self.active_field_def() else {
            return;
        };
        let Some(option) = self.active_options().get(self.option_cursor).copied() else {
            return;
        };

        let value = match def.kind {
            FieldKind::Choice(_) => FieldValue::text(option),
            FieldKind::Amount(_) if option == CUSTOM_AMOUNT_LABEL => {
                FieldValue::text(CUSTOM_AMOUNT)
            }
            FieldKind::Amount(_) => FieldValue::text(option),
            FieldKind::MultiChoice(_) => {
                let mut items = self
                    .state
                    .value(def.name)
                    .map(|v| v.as_multi().to_vec())
                    .unwrap_or_default();
                match items.iter().position(|i| i == option) {
                    Some(pos) => {
                        items.remove(pos);
                    }
                    None => items.push(option.to_string()),
                }
                FieldValue::MultiSelect(items)
            }
            _ => return,
        };
        self.state.set_value(def.name, value);
    }

    /// Type into the focused text or file-path field
    pub fn input_char(&mut self, c: char) {
        let Some(def) = self.active_field_def() else {
            return;
        };
        match def.kind {
            FieldKind::Text | FieldKind::Multiline => {
                let mut text = self.state.text(def.name).to_string();
                text.push(c);
                self.state.set_value(def.name, FieldValue::Text(text));
            }
            FieldKind::File => {
                let mut path = self.file_path(def.name);
                path.push(c);
                self.state.set_value(def.name, FieldValue::file(path));
            }
            FieldKind::Choice(_) | FieldKind::MultiChoice(_) | FieldKind::Amount(_) => {
                if c == ' ' {
                    self.choose_option();
                }
            }
        }
    }

    pub fn backspace(&mut self) {
        let Some(def) = self.active_field_def() else {
            return;
        };
        match def.kind {
            FieldKind::Text | FieldKind::Multiline => {
                let mut text = self.state.text(def.name).to_string();
                text.pop();
                self.state.set_value(def.name, FieldValue::Text(text));
            }
            FieldKind::File => {
                let mut path = self.file_path(def.name);
                path.pop();
                let value = if path.is_empty() {
                    FieldValue::File(None)
                } else {
                    FieldValue::file(path)
                };
                self.state.set_value(def.name, value);
            }
            _ => {}
        }
    }

    fn file_path(&self, field: &str) -> String {
        self.state
            .value(field)
            .and_then(FieldValue::as_file)
            .map(|f| f.path.display().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockApiClientTrait, FALLBACK_MESSAGE};
    use crate::state::forms::{admin, donation, volunteer};
    use crate::state::notification::{NotificationKind, FIX_FIELDS_MESSAGE};
    use serde_json::json;

    fn fill_donor_details(form: &mut FormController) {
        let state = &mut form.state;
        state.set_value("name", FieldValue::text("Ada Lovelace"));
        state.set_value("email", FieldValue::text("ada@example.org"));
        state.set_value("phone", FieldValue::text("0123456789"));
        state.set_value("amount", FieldValue::text("1000"));
    }

    fn ready_donation() -> FormController {
        let mut form = FormController::new(donation::definition());
        fill_donor_details(&mut form);
        form.advance().unwrap();
        let receipt = FieldValue::file("/tmp/receipt.png");
        form.state.set_value("receipt", receipt);
        form.advance().unwrap();
        form
    }

    mod transitions {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_advance_blocked_keeps_step() {
            let mut form = FormController::new(donation::definition());
            let err = form.advance().unwrap_err();
            assert_eq!(err.kind, NotificationKind::Warning);
            assert_eq!(err.message, FIX_FIELDS_MESSAGE);
            assert_eq!(form.state.current_step, 1);
        }

        #[test]
        fn test_advance_no_op_past_last_step() {
            let mut form = ready_donation();
            assert_eq!(form.state.current_step, 3);
            form.advance().unwrap();
            assert_eq!(form.state.current_step, 3);
        }

        #[test]
        fn test_retreat_skips_validation() {
            let mut form = ready_donation();
            form.state.set_value("name", FieldValue::text(""));
            form.retreat();
            form.retreat();
            form.retreat();
            assert_eq!(form.state.current_step, 1);
        }

        #[test]
        fn test_focus_resets_on_step_change() {
            let mut form = FormController::new(donation::definition());
            fill_donor_details(&mut form);
            form.next_field();
            form.next_field();
            form.advance().unwrap();
            assert_eq!(form.active_field, 0);
        }
    }

    mod begin_submit {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_refused_before_final_step() {
            let mut form = FormController::new(donation::definition());
            let blocked = form.begin_submit().unwrap_err();
            assert_eq!(blocked, SubmitBlocked::NotFinalStep);
        }

        #[test]
        fn test_revalidates_every_step() {
            let mut form = ready_donation();
            // Earlier step edited behind the gate's back
            form.state.set_value("email", FieldValue::text("broken"));

            let blocked = form.begin_submit().unwrap_err();
            assert_eq!(blocked, SubmitBlocked::Invalid);
            assert!(!form.state.error("email").is_empty());
            assert!(!form.state.is_submitting);
            assert_eq!(blocked.notification(), Some(Notification::fix_fields()));
        }

        #[test]
        fn test_second_call_refused_while_in_flight() {
            let mut form = ready_donation();
            assert!(form.begin_submit().is_ok());
            assert!(form.state.is_submitting);
            assert_eq!(
                form.begin_submit().unwrap_err(),
                SubmitBlocked::AlreadySubmitting
            );
        }

        #[test]
        fn test_edit_mode_targets_update_endpoint() {
            let record = Record::from_value(&json!({
                "_id": "n1",
                "title": "Walkathon",
                "content": "Join us",
                "image": "uploads/walk.png"
            }))
            .unwrap();
            let definition = admin::edit_definition(admin::AdminForm::News);
            let mut form = FormController::edit(definition, &record);

            let request = form.begin_submit().unwrap();
            assert_eq!(request.endpoint, Endpoint::update("news"));
            assert_eq!(request.payload.text("id"), Some("n1"));
            assert!(!request.payload.is_multipart());
        }
    }

    mod submit {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_donation_happy_path() {
            let mut form = ready_donation();

            let mut api = MockApiClientTrait::new();
            api.expect_send()
                .times(1)
                .withf(|endpoint, payload| {
                    *endpoint == Endpoint::post("donation/create")
                        && payload.is_multipart()
                        && payload.text("name") == Some("Ada Lovelace")
                        && payload.text("email") == Some("ada@example.org")
                        && payload.text("phone") == Some("0123456789")
                        && payload.text("amount") == Some("1000")
                        && payload
                            .file("receipt")
                            .is_some_and(|f| f.file_name == "receipt.png")
                        && !payload.contains("customAmount")
                })
                .returning(|_, _| Ok(ApiReply::ok("Donation saved")));

            let (completion, notification) = form.submit(&api).await.unwrap();

            assert_eq!(completion, Completion::Reset);
            assert_eq!(notification.kind, NotificationKind::Success);
            let fresh = FormState::new(donation::definition());
            assert_eq!(form.state.current_step, 1);
            assert_eq!(form.state.values, fresh.values);
            assert!(form.state.errors.is_empty());
            assert!(form.state.touched.is_empty());
            assert!(!form.state.is_submitting);
        }

        #[tokio::test]
        async fn test_logical_failure_keeps_data() {
            let mut form = ready_donation();
            let before = form.state.values.clone();

            let mut api = MockApiClientTrait::new();
            api.expect_send().times(1).returning(|_, _| {
                Err(SubmissionError::Rejected {
                    message: Some("Duplicate transaction".into()),
                })
            });

            let (completion, notification) = form.submit(&api).await.unwrap();

            assert_eq!(completion, Completion::Retry);
            assert_eq!(notification.kind, NotificationKind::Error);
            assert_eq!(notification.message, "Duplicate transaction");
            assert!(!form.state.is_submitting);
            assert_eq!(form.state.values, before);
            assert_eq!(form.state.current_step, 3);
        }

        #[test]
        fn test_transport_failure_uses_fallback() {
            let mut form = ready_donation();

            let mut api = MockApiClientTrait::new();
            api.expect_send()
                .times(1)
                .returning(|_, _| Err(SubmissionError::Decode("eof".into())));

            let (_, notification) = tokio_test::block_on(form.submit(&api)).unwrap();
            assert_eq!(notification.message, FALLBACK_MESSAGE);
            assert!(!form.state.is_submitting);
        }

        #[tokio::test]
        async fn test_invalid_form_never_calls_backend() {
            let mut form = FormController::new(volunteer::definition());
            form.state.go_to_step(3);

            let mut api = MockApiClientTrait::new();
            api.expect_send().times(0);

            let blocked = form.submit(&api).await.unwrap_err();
            assert_eq!(blocked, SubmitBlocked::Invalid);
            assert!(!form.state.error("name").is_empty());
            assert!(!form.state.error("skills").is_empty());
        }

        #[test]
        fn test_edit_success_closes_without_reset() {
            let record = Record::from_value(&json!({ "_id": "g1", "title": "Picnic" })).unwrap();
            let mut form =
                FormController::edit(admin::edit_definition(admin::AdminForm::Gallery), &record);
            form.begin_submit().unwrap();

            let (completion, _) = form.finish_submit(Ok(ApiReply::ok("updated")));
            assert_eq!(completion, Completion::Close);
            assert_eq!(form.state.text("title"), "Picnic");
        }
    }

    mod editing {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_typing_goes_through_sanitizer() {
            let mut form = FormController::new(volunteer::definition());
            form.next_field(); // age
            for c in "1x5".chars() {
                form.input_char(c);
            }
            assert_eq!(form.state.text("age"), "15");
        }

        #[test]
        fn test_leaving_field_marks_touched() {
            let mut form = FormController::new(volunteer::definition());
            form.next_field();
            assert!(form.state.touched.contains("name"));
            assert_eq!(form.state.error("name"), "Please enter your name");
        }

        #[test]
        fn test_multi_choice_toggles() {
            let mut form = FormController::new(volunteer::definition());
            form.state.go_to_step(2);
            form.move_option(true);
            form.input_char(' ');
            assert_eq!(
                form.state.value("skills").unwrap().as_multi(),
                &["Event support".to_string()]
            );
            form.choose_option();
            assert!(form.state.value("skills").unwrap().is_empty());
        }

        #[test]
        fn test_amount_custom_option_sets_sentinel() {
            let mut form = FormController::new(donation::definition());
            form.active_field = 3;
            assert_eq!(form.active_options().last(), Some(&CUSTOM_AMOUNT_LABEL));

            form.move_option(false); // wraps onto "Custom"
            form.choose_option();
            assert_eq!(form.state.text("amount"), CUSTOM_AMOUNT);
        }

        #[test]
        fn test_file_path_typing_and_backspace() {
            let mut form = FormController::new(donation::definition());
            form.state.go_to_step(2);
            for c in "a.png".chars() {
                form.input_char(c);
            }
            let receipt = form.state.value("receipt").and_then(FieldValue::as_file);
            assert_eq!(receipt.map(|f| f.file_name.as_str()), Some("a.png"));
            for _ in 0..5 {
                form.backspace();
            }
            assert_eq!(form.state.value("receipt"), Some(&FieldValue::File(None)));
        }

        #[test]
        fn test_sessions_are_unique() {
            let a = FormController::new(donation::definition());
            let b = FormController::new(donation::definition());
            assert_ne!(a.session(), b.session());
        }
    }
}
