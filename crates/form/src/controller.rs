//! Doctor form state.
//!
//! [`FormController`] is the single owner of the draft record, the per-field error map,
//! the raw postal-code text and the lookup and submission status. Every handler applies
//! its changes as one transition on `&mut self`; nothing is observable half-way.
//!
//! The two suspending operations are split in two halves. `begin_*` records the request
//! and hands out a ticket, `apply_*` folds a response back in. Tickets carry a generation
//! number and responses for anything but the latest generation are dropped, so the last
//! request issued wins regardless of the order responses arrive in. The `async`
//! convenience methods run both halves around a single collaborator call.

use crate::{
    FormError, FormResult, Notice, PostalCodeResolver, Resolution, SubmissionGateway,
    SubmissionOutcome, SubmissionTarget, ValidationErrorMap,
};
use api_shared::{DoctorId, DoctorRecord, SpecialitySelection};
use docdir_core::{DoctorField, PostalCode};

/// Message stored against [`DoctorField::ZipCode`] when a code has no match.
pub const POSTAL_CODE_NOT_FOUND: &str = "not found";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Progress of the most recent postal-code lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LookupStatus {
    #[default]
    Idle,
    Loading,
    Resolved,
    NotFound,
    /// The lookup service could not be used; the reason is kept for display.
    Failed(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Whether a response was folded into the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    /// A newer request superseded this one; the response was dropped.
    Stale,
}

/// Where the caller should go after a form action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    BackToList,
}

/// Handle for one in-flight postal-code lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostalLookupTicket {
    generation: u64,
    code: PostalCode,
}

impl PostalLookupTicket {
    pub fn code(&self) -> &PostalCode {
        &self.code
    }
}

/// Handle for one in-flight submission, carrying the exact payload to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionTicket {
    generation: u64,
    target: SubmissionTarget,
    record: DoctorRecord,
}

impl SubmissionTicket {
    pub fn target(&self) -> SubmissionTarget {
        self.target
    }

    pub fn record(&self) -> &DoctorRecord {
        &self.record
    }
}

#[derive(Clone, Debug)]
pub struct FormController {
    mode: FormMode,
    original_id: Option<DoctorId>,
    draft: DoctorRecord,
    errors: ValidationErrorMap,
    postal_code: String,
    lookup: LookupStatus,
    lookup_generation: u64,
    submission: SubmissionState,
    submission_generation: u64,
    notification: Option<Notice>,
}

impl FormController {
    /// A form for a new doctor, seeded from the empty template.
    pub fn create() -> Self {
        Self::with_draft(FormMode::Create, None, DoctorRecord::default())
    }

    /// A form editing an existing doctor.
    ///
    /// The postal-code text starts out as the record's stored zip code.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingId`] if `record` has never been persisted.
    pub fn edit(record: DoctorRecord) -> FormResult<Self> {
        let id = record.id.ok_or(FormError::MissingId)?;
        let mut form = Self::with_draft(FormMode::Edit, Some(id), record);
        form.postal_code = form.draft.zip_code.clone();
        Ok(form)
    }

    fn with_draft(mode: FormMode, original_id: Option<DoctorId>, draft: DoctorRecord) -> Self {
        Self {
            mode,
            original_id,
            draft,
            errors: ValidationErrorMap::new(),
            postal_code: String::new(),
            lookup: LookupStatus::Idle,
            lookup_generation: 0,
            submission: SubmissionState::Idle,
            submission_generation: 0,
            notification: None,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &DoctorRecord {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrorMap {
        &self.errors
    }

    /// Raw postal-code text as typed, independent of the draft's `zip_code`.
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn lookup_status(&self) -> &LookupStatus {
        &self.lookup
    }

    pub fn is_loading_postal_code(&self) -> bool {
        self.lookup == LookupStatus::Loading
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.submission
    }

    pub fn notification(&self) -> Option<&Notice> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) -> Option<Notice> {
        self.notification.take()
    }

    /// Overwrite one text field. The error map is not touched.
    ///
    /// # Errors
    ///
    /// [`DoctorField::Speciality`] is not a text field; use
    /// [`set_specialities`](Self::set_specialities).
    pub fn set_field(&mut self, field: DoctorField, value: impl Into<String>) -> FormResult<()> {
        field.set_text(&mut self.draft, value.into())?;
        Ok(())
    }

    /// Replace the selected specialities wholesale.
    pub fn set_specialities(&mut self, selected: SpecialitySelection) {
        self.draft.speciality = selected;
    }

    /// Record a postal-code edit.
    ///
    /// Clears the error map and, when an address is present, the resolved address fields.
    /// Returns a ticket when the new text is a complete postal code; the caller should then
    /// resolve it and pass the result to [`apply_postal_resolution`](Self::apply_postal_resolution).
    pub fn begin_postal_code_change(&mut self, value: impl Into<String>) -> Option<PostalLookupTicket> {
        self.postal_code = value.into();
        self.errors = ValidationErrorMap::new();
        if !self.draft.address.is_empty() {
            // The zip code itself is only rewritten by a successful resolution.
            for field in DoctorField::RESOLVED_BY_POSTAL_CODE {
                if field != DoctorField::ZipCode {
                    field.clear_text(&mut self.draft);
                }
            }
        }
        // Any earlier lookup is now outdated, whether or not a new one starts.
        self.lookup_generation += 1;

        match PostalCode::parse(&self.postal_code) {
            Ok(code) => {
                self.lookup = LookupStatus::Loading;
                Some(PostalLookupTicket {
                    generation: self.lookup_generation,
                    code,
                })
            }
            Err(_) => {
                self.lookup = LookupStatus::Idle;
                None
            }
        }
    }

    /// Fold a lookup result into the form.
    pub fn apply_postal_resolution(
        &mut self,
        ticket: PostalLookupTicket,
        resolution: Resolution,
    ) -> Delivery {
        if ticket.generation != self.lookup_generation {
            tracing::debug!(code = %ticket.code, "dropping stale postal-code resolution");
            return Delivery::Stale;
        }

        match resolution {
            Resolution::Resolved(found) => {
                self.draft.zip_code = ticket.code.as_str().to_string();
                self.draft.address = found.address;
                self.draft.neighborhood = found.neighborhood;
                self.draft.city = found.city;
                self.draft.state_province = found.state_province;
                self.lookup = LookupStatus::Resolved;
            }
            Resolution::NotFound => {
                self.errors = ValidationErrorMap::single(DoctorField::ZipCode, POSTAL_CODE_NOT_FOUND);
                self.lookup = LookupStatus::NotFound;
            }
            Resolution::TransportFailure(reason) => {
                tracing::warn!(code = %ticket.code, %reason, "postal-code lookup failed");
                self.notification = Some(Notice::failure(format!(
                    "Could not look up postal code {}: {reason}",
                    ticket.code
                )));
                self.lookup = LookupStatus::Failed(reason);
            }
        }
        Delivery::Applied
    }

    /// Record a postal-code edit and, for a complete code, resolve it with `resolver`.
    pub async fn change_postal_code(
        &mut self,
        value: impl Into<String>,
        resolver: &dyn PostalCodeResolver,
    ) -> Option<Delivery> {
        let ticket = self.begin_postal_code_change(value)?;
        let resolution = resolver.resolve(ticket.code()).await;
        Some(self.apply_postal_resolution(ticket, resolution))
    }

    /// Start a submission attempt.
    ///
    /// Clears the error map. In edit mode the payload carries the original record's id.
    pub fn begin_submit(&mut self) -> SubmissionTicket {
        self.errors = ValidationErrorMap::new();
        self.submission = SubmissionState::Submitting;
        self.submission_generation += 1;

        let (target, record) = match (self.mode, self.original_id) {
            (FormMode::Edit, Some(id)) => {
                (SubmissionTarget::Update(id), self.draft.clone().with_id(id))
            }
            _ => (SubmissionTarget::Create, self.draft.clone()),
        };
        SubmissionTicket {
            generation: self.submission_generation,
            target,
            record,
        }
    }

    /// Fold a submission result into the form.
    ///
    /// A successful create appends the stored record to `records` and resets the draft.
    pub fn apply_submission(
        &mut self,
        ticket: SubmissionTicket,
        outcome: SubmissionOutcome,
        records: &mut Vec<DoctorRecord>,
    ) -> Delivery {
        if ticket.generation != self.submission_generation {
            tracing::debug!(submission = ?ticket.target, "dropping stale submission response");
            return Delivery::Stale;
        }

        match outcome {
            SubmissionOutcome::Succeeded { record, message } => {
                if self.mode == FormMode::Create {
                    match record {
                        Some(record) => records.push(record),
                        None => tracing::warn!("create succeeded without returning the record"),
                    }
                    self.draft = DoctorRecord::default();
                    self.postal_code.clear();
                    self.lookup = LookupStatus::Idle;
                    self.lookup_generation += 1;
                }
                self.errors = ValidationErrorMap::new();
                self.submission = SubmissionState::Succeeded;
                self.notification = Some(Notice::success(message));
            }
            SubmissionOutcome::Failed {
                violations,
                message,
            } => {
                self.errors = ValidationErrorMap::from_violations(&violations);
                self.submission = SubmissionState::Failed;
                self.notification = Some(Notice::failure(message));
            }
            SubmissionOutcome::TransportFailure(reason) => {
                tracing::warn!(submission = ?ticket.target, %reason, "submission failed");
                self.submission = SubmissionState::Failed;
                self.notification = Some(Notice::failure(format!(
                    "Could not reach the doctor directory: {reason}"
                )));
            }
        }
        Delivery::Applied
    }

    /// Submit the draft through `gateway` and apply the response.
    pub async fn submit(
        &mut self,
        gateway: &dyn SubmissionGateway,
        records: &mut Vec<DoctorRecord>,
    ) -> Delivery {
        let ticket = self.begin_submit();
        let outcome = gateway.submit(ticket.target(), ticket.record()).await;
        self.apply_submission(ticket, outcome, records)
    }

    /// Leave the form without saving. Only an edit form has somewhere to go back to.
    pub fn cancel(&self) -> Option<Navigation> {
        match self.mode {
            FormMode::Edit => Some(Navigation::BackToList),
            FormMode::Create => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResolvedAddress;
    use api_shared::FieldViolation;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Resolver double that records every code it is asked for.
    struct RecordingResolver {
        calls: Mutex<Vec<String>>,
        answer: Resolution,
    }

    impl RecordingResolver {
        fn answering(answer: Resolution) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                answer,
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl PostalCodeResolver for RecordingResolver {
        async fn resolve(&self, code: &PostalCode) -> Resolution {
            self.calls.lock().expect("calls lock").push(code.to_string());
            self.answer.clone()
        }
    }

    /// Gateway double replaying scripted outcomes and recording what was sent.
    struct ScriptedGateway {
        outcomes: Mutex<VecDeque<SubmissionOutcome>>,
        sent: Mutex<Vec<(SubmissionTarget, DoctorRecord)>>,
    }

    impl ScriptedGateway {
        fn new(outcomes: impl IntoIterator<Item = SubmissionOutcome>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into_iter().collect()),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<(SubmissionTarget, DoctorRecord)> {
            self.sent.lock().expect("sent lock").clone()
        }
    }

    #[async_trait]
    impl SubmissionGateway for ScriptedGateway {
        async fn submit(&self, target: SubmissionTarget, record: &DoctorRecord) -> SubmissionOutcome {
            self.sent
                .lock()
                .expect("sent lock")
                .push((target, record.clone()));
            self.outcomes
                .lock()
                .expect("outcomes lock")
                .pop_front()
                .expect("scripted outcome")
        }
    }

    fn se_address() -> ResolvedAddress {
        ResolvedAddress {
            address: "Praça da Sé".into(),
            neighborhood: "Sé".into(),
            city: "São Paulo".into(),
            state_province: "SP".into(),
        }
    }

    fn stored_doctor() -> DoctorRecord {
        DoctorRecord {
            id: Some(DoctorId::new(5)),
            name: "Ana".into(),
            med_cert_id: "123456".into(),
            zip_code: "01001000".into(),
            address: "Praça da Sé".into(),
            number: "100".into(),
            neighborhood: "Sé".into(),
            city: "São Paulo".into(),
            state_province: "SP".into(),
            speciality: SpecialitySelection::new(["Angiologia"]),
            ..DoctorRecord::default()
        }
    }

    fn rejected(path: &str, message: &str) -> SubmissionOutcome {
        SubmissionOutcome::Failed {
            violations: vec![FieldViolation::new(path, vec![message.into()])],
            message: "Validation failed".into(),
        }
    }

    #[test]
    fn set_field_changes_only_that_field_and_keeps_errors() {
        let mut form = FormController::create();
        form.errors = ValidationErrorMap::single(DoctorField::Name, "is required");

        for field in DoctorField::ALL.into_iter().filter(|f| f.is_text()) {
            let before = form.draft().clone();
            form.set_field(field, format!("value for {field}"))
                .expect("text field");

            for other in DoctorField::ALL {
                if other == field {
                    assert_eq!(other.text(form.draft()), Some(format!("value for {field}").as_str()));
                } else {
                    assert_eq!(other.text(form.draft()), other.text(&before));
                }
            }
            assert_eq!(form.draft().speciality, before.speciality);
            assert_eq!(form.errors().get(DoctorField::Name), Some("is required"));
        }
    }

    #[test]
    fn set_field_rejects_speciality() {
        let mut form = FormController::create();
        let err = form
            .set_field(DoctorField::Speciality, "Angiologia")
            .expect_err("speciality is not text");
        assert!(matches!(
            err,
            FormError::Core(docdir_core::DoctorError::NotATextField(DoctorField::Speciality))
        ));
        assert!(form.draft().speciality.is_empty());
    }

    #[test]
    fn set_specialities_replaces_selection() {
        let mut form = FormController::create();
        form.set_specialities(SpecialitySelection::new(["Angiologia", "Alergologia"]));
        form.set_specialities(SpecialitySelection::new(["Cirurgia cardíaca"]));
        assert_eq!(form.draft().speciality.as_slice(), ["Cirurgia cardíaca"]);
    }

    #[tokio::test]
    async fn incomplete_postal_codes_never_trigger_a_lookup() {
        let resolver = RecordingResolver::answering(Resolution::NotFound);
        let mut form = FormController::create();

        for value in ["", "0", "0100100", "010010001", "0100100a"] {
            let delivery = form.change_postal_code(value, &resolver).await;
            assert_eq!(delivery, None, "{value:?} should not be looked up");
            assert_eq!(form.postal_code(), value);
            assert!(!form.is_loading_postal_code());
        }
        assert!(resolver.calls().is_empty());
    }

    #[tokio::test]
    async fn complete_postal_code_is_looked_up_once_and_fills_the_address() {
        let resolver = RecordingResolver::answering(Resolution::Resolved(se_address()));
        let mut form = FormController::create();
        form.set_field(DoctorField::Number, "100").expect("text field");

        let delivery = form.change_postal_code("01001000", &resolver).await;

        assert_eq!(delivery, Some(Delivery::Applied));
        assert_eq!(resolver.calls(), vec!["01001000".to_string()]);
        for field in DoctorField::RESOLVED_BY_POSTAL_CODE {
            assert_ne!(field.text(form.draft()), Some(""), "{field} left empty");
        }
        let draft = form.draft();
        assert_eq!(draft.zip_code, "01001000");
        assert_eq!(draft.address, "Praça da Sé");
        assert_eq!(draft.neighborhood, "Sé");
        assert_eq!(draft.city, "São Paulo");
        assert_eq!(draft.state_province, "SP");
        assert_eq!(draft.number, "100");
        assert!(!form.is_loading_postal_code());
        assert_eq!(form.lookup_status(), &LookupStatus::Resolved);
    }

    #[test]
    fn lookup_is_loading_until_resolution_arrives() {
        let mut form = FormController::create();
        let ticket = form
            .begin_postal_code_change("01001000")
            .expect("complete code");

        assert!(form.is_loading_postal_code());
        assert_eq!(ticket.code().as_str(), "01001000");

        form.apply_postal_resolution(ticket, Resolution::Resolved(se_address()));
        assert!(!form.is_loading_postal_code());
    }

    #[tokio::test]
    async fn not_found_sets_only_the_zip_code_error() {
        let resolver = RecordingResolver::answering(Resolution::NotFound);
        let mut form = FormController::create();
        form.set_field(DoctorField::Name, "Ana").expect("text field");
        let before = form.draft().clone();

        form.change_postal_code("99999999", &resolver).await;

        assert_eq!(form.errors().len(), 1);
        assert_eq!(form.errors().get(DoctorField::ZipCode), Some(POSTAL_CODE_NOT_FOUND));
        assert_eq!(form.draft(), &before);
        assert!(!form.is_loading_postal_code());
        assert_eq!(form.lookup_status(), &LookupStatus::NotFound);
    }

    #[test]
    fn editing_postal_code_clears_resolved_address_immediately() {
        let mut form = FormController::edit(stored_doctor()).expect("stored doctor");
        form.errors = ValidationErrorMap::single(DoctorField::Name, "is required");

        let ticket = form.begin_postal_code_change("0100100");

        assert!(ticket.is_none());
        let draft = form.draft();
        assert!(draft.address.is_empty());
        assert!(draft.neighborhood.is_empty());
        assert!(draft.city.is_empty());
        assert!(draft.state_province.is_empty());
        assert_eq!(draft.number, "100");
        assert_eq!(draft.zip_code, "01001000");
        assert!(form.errors().is_empty());
    }

    #[test]
    fn address_is_cleared_while_a_new_lookup_is_in_flight() {
        let mut form = FormController::edit(stored_doctor()).expect("stored doctor");

        let ticket = form
            .begin_postal_code_change("20040002")
            .expect("complete code");

        assert!(form.is_loading_postal_code());
        for field in DoctorField::RESOLVED_BY_POSTAL_CODE {
            let expected = if field == DoctorField::ZipCode { "01001000" } else { "" };
            assert_eq!(field.text(form.draft()), Some(expected), "{field}");
        }
        assert_eq!(form.draft().number, "100");

        form.apply_postal_resolution(
            ticket,
            Resolution::Resolved(ResolvedAddress {
                address: "Avenida Rio Branco".into(),
                neighborhood: "Centro".into(),
                city: "Rio de Janeiro".into(),
                state_province: "RJ".into(),
            }),
        );
        assert_eq!(form.draft().zip_code, "20040002");
        assert_eq!(form.draft().city, "Rio de Janeiro");
    }

    #[test]
    fn editing_postal_code_keeps_address_fields_when_address_is_empty() {
        let mut form = FormController::create();
        form.set_field(DoctorField::City, "Recife").expect("text field");

        form.begin_postal_code_change("5");

        assert_eq!(form.draft().city, "Recife");
    }

    #[test]
    fn superseded_lookup_is_discarded() {
        let mut form = FormController::create();
        let first = form.begin_postal_code_change("01001000").expect("complete");
        let second = form.begin_postal_code_change("20040002").expect("complete");

        let late = form.apply_postal_resolution(first, Resolution::Resolved(se_address()));
        assert_eq!(late, Delivery::Stale);
        assert!(form.draft().address.is_empty());
        assert!(form.is_loading_postal_code());

        let rio = ResolvedAddress {
            address: "Avenida Rio Branco".into(),
            neighborhood: "Centro".into(),
            city: "Rio de Janeiro".into(),
            state_province: "RJ".into(),
        };
        assert_eq!(
            form.apply_postal_resolution(second, Resolution::Resolved(rio)),
            Delivery::Applied
        );
        assert_eq!(form.draft().zip_code, "20040002");
        assert_eq!(form.draft().city, "Rio de Janeiro");
    }

    #[test]
    fn lookup_outdated_by_a_shorter_edit_is_discarded() {
        let mut form = FormController::create();
        let ticket = form.begin_postal_code_change("01001000").expect("complete");
        form.begin_postal_code_change("0100100");

        assert!(!form.is_loading_postal_code());
        assert_eq!(
            form.apply_postal_resolution(ticket, Resolution::Resolved(se_address())),
            Delivery::Stale
        );
        assert!(form.draft().zip_code.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_ends_loading_and_notifies() {
        let resolver =
            RecordingResolver::answering(Resolution::TransportFailure("connection refused".into()));
        let mut form = FormController::create();

        form.change_postal_code("01001000", &resolver).await;

        assert!(!form.is_loading_postal_code());
        assert_eq!(
            form.lookup_status(),
            &LookupStatus::Failed("connection refused".into())
        );
        assert!(form.errors().is_empty());
        assert!(form.draft().zip_code.is_empty());
        let notice = form.notification().expect("failure notice");
        assert!(!notice.success);
        assert!(notice.message.contains("01001000"));
    }

    #[tokio::test]
    async fn successful_create_appends_and_resets() {
        let mut form = FormController::create();
        form.set_field(DoctorField::Name, "Ana").expect("text field");
        form.set_field(DoctorField::MedCertId, "123456").expect("text field");
        form.set_specialities(SpecialitySelection::new(["Cardiologia clínca"]));
        form.begin_postal_code_change("0100");

        let stored = form.draft().clone().with_id(DoctorId::new(1));
        let gateway = ScriptedGateway::new([SubmissionOutcome::Succeeded {
            record: Some(stored.clone()),
            message: "Doctor added".into(),
        }]);
        let mut records = vec![stored_doctor()];

        let delivery = form.submit(&gateway, &mut records).await;

        assert_eq!(delivery, Delivery::Applied);
        let sent = gateway.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, SubmissionTarget::Create);
        assert_eq!(sent[0].1.name, "Ana");
        assert_eq!(sent[0].1.id, None);

        assert_eq!(records.len(), 2);
        assert_eq!(records[1], stored);
        assert_eq!(form.draft(), &DoctorRecord::default());
        assert_eq!(form.postal_code(), "");
        assert!(form.errors().is_empty());
        assert_eq!(form.submission_state(), SubmissionState::Succeeded);
        assert_eq!(form.notification(), Some(&Notice::success("Doctor added")));
    }

    #[tokio::test]
    async fn rejected_create_maps_violations_and_keeps_draft() {
        let mut form = FormController::create();
        form.set_field(DoctorField::Name, "Ana").expect("text field");
        form.set_field(DoctorField::MedCertId, "12a").expect("text field");
        let before = form.draft().clone();
        let gateway = ScriptedGateway::new([rejected("medCertId", "invalid")]);
        let mut records = Vec::new();

        form.submit(&gateway, &mut records).await;

        assert_eq!(form.errors().len(), 1);
        assert_eq!(form.errors().get(DoctorField::MedCertId), Some("invalid"));
        assert_eq!(form.draft(), &before);
        assert!(records.is_empty());
        assert_eq!(form.submission_state(), SubmissionState::Failed);
        assert_eq!(form.notification(), Some(&Notice::failure("Validation failed")));
    }

    #[tokio::test]
    async fn first_violation_per_field_wins() {
        let mut form = FormController::create();
        let gateway = ScriptedGateway::new([SubmissionOutcome::Failed {
            violations: vec![
                FieldViolation::new("name", vec!["required".into()]),
                FieldViolation::new("name", vec!["too long".into()]),
            ],
            message: "Validation failed".into(),
        }]);

        form.submit(&gateway, &mut Vec::new()).await;

        assert_eq!(form.errors().get(DoctorField::Name), Some("required"));
        assert_eq!(form.errors().len(), 1);
    }

    #[tokio::test]
    async fn successful_edit_sends_original_id_and_keeps_draft() {
        let mut form = FormController::edit(stored_doctor()).expect("stored doctor");
        form.set_field(DoctorField::Name, "Ana Maria").expect("text field");
        let gateway = ScriptedGateway::new([SubmissionOutcome::Succeeded {
            record: None,
            message: "Doctor updated".into(),
        }]);
        let mut records = vec![stored_doctor()];

        form.submit(&gateway, &mut records).await;

        let sent = gateway.sent();
        assert_eq!(sent[0].0, SubmissionTarget::Update(DoctorId::new(5)));
        assert_eq!(sent[0].1.id, Some(DoctorId::new(5)));
        assert_eq!(sent[0].1.name, "Ana Maria");

        assert_eq!(records.len(), 1);
        assert_eq!(form.draft().name, "Ana Maria");
        assert_eq!(form.postal_code(), "01001000");
        assert_eq!(form.notification(), Some(&Notice::success("Doctor updated")));
    }

    #[tokio::test]
    async fn resubmitting_clears_previous_errors() {
        let mut form = FormController::create();
        let gateway = ScriptedGateway::new([
            rejected("name", "is required"),
            SubmissionOutcome::Succeeded {
                record: Some(DoctorRecord::default().with_id(DoctorId::new(1))),
                message: "Doctor added".into(),
            },
        ]);
        let mut records = Vec::new();

        form.submit(&gateway, &mut records).await;
        assert!(form.errors().has_error(DoctorField::Name));

        let ticket = form.begin_submit();
        assert!(form.errors().is_empty());
        assert_eq!(form.submission_state(), SubmissionState::Submitting);
        let outcome = gateway.submit(ticket.target(), ticket.record()).await;
        form.apply_submission(ticket, outcome, &mut records);

        assert_eq!(form.submission_state(), SubmissionState::Succeeded);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn superseded_submission_is_discarded() {
        let mut form = FormController::create();
        form.set_field(DoctorField::Name, "Ana").expect("text field");
        let first = form.begin_submit();
        let second = form.begin_submit();
        let mut records = Vec::new();

        let late = form.apply_submission(
            first,
            SubmissionOutcome::Succeeded {
                record: Some(DoctorRecord::default().with_id(DoctorId::new(1))),
                message: "Doctor added".into(),
            },
            &mut records,
        );
        assert_eq!(late, Delivery::Stale);
        assert!(records.is_empty());
        assert_eq!(form.draft().name, "Ana");

        form.apply_submission(second, rejected("medCertId", "is required"), &mut records);
        assert_eq!(form.errors().get(DoctorField::MedCertId), Some("is required"));
    }

    #[test]
    fn create_success_outdates_pending_lookup() {
        let mut form = FormController::create();
        let lookup = form.begin_postal_code_change("01001000").expect("complete");
        let submit = form.begin_submit();
        form.apply_submission(
            submit,
            SubmissionOutcome::Succeeded {
                record: None,
                message: "Doctor added".into(),
            },
            &mut Vec::new(),
        );

        assert_eq!(
            form.apply_postal_resolution(lookup, Resolution::Resolved(se_address())),
            Delivery::Stale
        );
        assert_eq!(form.draft(), &DoctorRecord::default());
        assert!(!form.is_loading_postal_code());
    }

    #[tokio::test]
    async fn submission_transport_failure_keeps_draft_and_notifies() {
        let mut form = FormController::create();
        form.set_field(DoctorField::Name, "Ana").expect("text field");
        let gateway = ScriptedGateway::new([SubmissionOutcome::TransportFailure(
            "timed out".into(),
        )]);
        let mut records = Vec::new();

        form.submit(&gateway, &mut records).await;

        assert_eq!(form.submission_state(), SubmissionState::Failed);
        assert!(form.errors().is_empty());
        assert_eq!(form.draft().name, "Ana");
        assert!(records.is_empty());
        let notice = form.dismiss_notification().expect("failure notice");
        assert!(!notice.success);
        assert!(form.notification().is_none());
    }

    #[test]
    fn cancel_only_navigates_from_edit() {
        assert_eq!(FormController::create().cancel(), None);
        let edit = FormController::edit(stored_doctor()).expect("stored doctor");
        assert_eq!(edit.cancel(), Some(Navigation::BackToList));
    }

    #[test]
    fn edit_requires_a_persisted_record() {
        let err = FormController::edit(DoctorRecord::default()).expect_err("no id");
        assert!(matches!(err, FormError::MissingId));
    }
}
