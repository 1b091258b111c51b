//! Creating and editing issues.
//!
//! `IssueForm` is the editable state; `IssueEditWorkflow` fills it from an
//! issue, validates it and writes it back through the collaborators.

use crate::errors::JournalError;
use crate::models::issue::{AccessStatus, Issue, IssueId};
use crate::models::journal::JournalId;
use crate::models::locale::{LocaleContext, LocalizedText};
use crate::models::settings::{as_integer, PublishingMode};
use crate::models::temporary_file::TemporaryFile;
use crate::models::validation::FieldError;
use crate::services::locale_registry::is_valid_locale_code;
use crate::services::{IssueGateway, PublicFileManager, TemporaryFileStore};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use validator::Validate;

/// Who is saving and in which journal and locales.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub journal_id: JournalId,
    pub user_id: i64,
    pub locale: LocaleContext,
}

// Zero, blank and unknown codes all deserialize to None
fn access_status_from_input<'de, D>(deserializer: D) -> Result<Option<AccessStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(as_integer)
        .and_then(AccessStatus::from_code))
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct IssueForm {
    pub title: LocalizedText,
    #[validate(length(max = 10, code = "volumeTooLong"))]
    pub volume: String,
    #[validate(length(max = 40, code = "numberTooLong"))]
    pub number: String,
    #[validate(length(max = 4, code = "yearTooLong"))]
    pub year: String,
    pub date_published: Option<DateTime<Utc>>,
    pub description: LocalizedText,
    #[serde(deserialize_with = "access_status_from_input")]
    pub access_status: Option<AccessStatus>,
    pub enable_open_access_date: bool,
    pub open_access_date: Option<DateTime<Utc>>,
    pub show_volume: bool,
    pub show_number: bool,
    pub show_year: bool,
    pub show_title: bool,
    pub temporary_file_id: Option<i64>,
    /// Preview of the current cover for the request locales; never written back.
    pub cover_image: Option<String>,
    pub cover_image_alt_text: LocalizedText,
    pub form_locale: String,
}

/// Blank and "0" count as not filled in.
fn is_filled(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != "0"
}

fn parse_or_zero(field: &str, value: &str) -> Result<i32, JournalError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse()
        .map_err(|_| JournalError::InvalidInput(format!("{} must be a whole number", field)))
}

fn is_integer_or_blank(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.parse::<i32>().is_ok()
}

impl IssueForm {
    /// Editable state for `issue`, or defaults for a new issue in a journal
    /// publishing under `mode`.
    pub fn initialize(issue: Option<&Issue>, mode: PublishingMode, ctx: &LocaleContext) -> Self {
        let form_locale = ctx.active_locale.clone();
        match issue {
            Some(issue) => Self {
                title: issue.title.clone(),
                volume: issue.volume.to_string(),
                number: issue.number.clone(),
                year: issue.year.to_string(),
                date_published: issue.date_published,
                description: issue.description.clone(),
                access_status: Some(issue.access_status),
                enable_open_access_date: issue.open_access_date.is_some(),
                open_access_date: issue.open_access_date,
                show_volume: issue.show_volume,
                show_number: issue.show_number,
                show_year: issue.show_year,
                show_title: issue.show_title,
                temporary_file_id: None,
                cover_image: issue.localized_cover_image(ctx).map(str::to_string),
                cover_image_alt_text: issue.cover_image_alt_text.clone(),
                form_locale,
            },
            None => {
                let access_status = match mode {
                    PublishingMode::Subscription | PublishingMode::None => {
                        AccessStatus::Subscription
                    }
                    PublishingMode::Open => AccessStatus::Open,
                };
                Self {
                    show_volume: true,
                    show_number: true,
                    show_year: true,
                    show_title: true,
                    access_status: Some(access_status),
                    form_locale,
                    ..Self::default()
                }
            }
        }
    }

    /// Locale the form edits. A form posted without one edits the active locale.
    pub fn effective_locale<'f>(&'f self, ctx: &'f LocaleContext) -> &'f str {
        let locale = self.form_locale.trim();
        if locale.is_empty() {
            ctx.active_locale.as_str()
        } else {
            locale
        }
    }

    fn any_identification_shown(&self) -> bool {
        self.show_volume || self.show_number || self.show_year || self.show_title
    }
}

/// Persistence progress of one save. A new issue with an uploaded cover goes
/// `Draft → Created → CoverAttached`, because the cover file name embeds the
/// issue id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueWriteState {
    Draft,
    Created(IssueId),
    CoverAttached(IssueId),
}

impl IssueWriteState {
    pub fn created(self, id: IssueId) -> Result<Self, JournalError> {
        match self {
            IssueWriteState::Draft => Ok(IssueWriteState::Created(id)),
            other => Err(JournalError::InvalidInput(format!(
                "Issue already persisted ({:?})",
                other
            ))),
        }
    }

    pub fn cover_attached(self) -> Result<Self, JournalError> {
        match self {
            IssueWriteState::Created(id) => Ok(IssueWriteState::CoverAttached(id)),
            other => Err(JournalError::InvalidInput(format!(
                "Cannot attach a cover in state {:?}",
                other
            ))),
        }
    }

    pub fn issue_id(self) -> Option<IssueId> {
        match self {
            IssueWriteState::Draft => None,
            IssueWriteState::Created(id) | IssueWriteState::CoverAttached(id) => Some(id),
        }
    }
}

/// `cover_issue_<id>_<locale><ext>`; `extension` carries its leading dot.
pub fn cover_file_name(id: IssueId, locale: &str, extension: &str) -> String {
    format!("cover_issue_{}_{}{}", id, locale, extension)
}

pub struct IssueEditWorkflow<'a> {
    issues: &'a dyn IssueGateway,
    temporary_files: &'a dyn TemporaryFileStore,
    public_files: &'a dyn PublicFileManager,
}

impl<'a> IssueEditWorkflow<'a> {
    pub fn new(
        issues: &'a dyn IssueGateway,
        temporary_files: &'a dyn TemporaryFileStore,
        public_files: &'a dyn PublicFileManager,
    ) -> Self {
        Self {
            issues,
            temporary_files,
            public_files,
        }
    }

    pub fn initialize_form_data(
        &self,
        issue: Option<&Issue>,
        mode: PublishingMode,
        ctx: &LocaleContext,
    ) -> IssueForm {
        IssueForm::initialize(issue, mode, ctx)
    }

    fn require_temporary_file(
        &self,
        file_id: i64,
        user_id: i64,
    ) -> Result<TemporaryFile, JournalError> {
        self.temporary_files
            .get_temporary_file(file_id, user_id)?
            .ok_or_else(|| {
                JournalError::NotFound(format!(
                    "Temporary file {} not found for user {}",
                    file_id, user_id
                ))
            })
    }

    /// Field errors for the submission; an empty list means it may be saved.
    /// Only collaborator failures (such as a missing upload) are `Err`.
    pub fn validate(
        &self,
        form: &IssueForm,
        request: &RequestContext,
    ) -> Result<Vec<FieldError>, JournalError> {
        let mut errors = Vec::new();

        if form.show_volume && !is_filled(&form.volume) {
            errors.push(FieldError::new("volume", "editor.issues.volumeRequired"));
        }
        if form.show_number && !is_filled(&form.number) {
            errors.push(FieldError::new("number", "editor.issues.numberRequired"));
        }
        if form.show_year && !is_filled(&form.year) {
            errors.push(FieldError::new("year", "editor.issues.yearRequired"));
        }
        if form.show_title && form.title.joined().is_empty() {
            errors.push(FieldError::new("title", "editor.issues.titleRequired"));
        }

        if !is_integer_or_blank(&form.volume) {
            errors.push(FieldError::new("volume", "editor.issues.volumeInvalid"));
        }
        if !is_integer_or_blank(&form.year) {
            errors.push(FieldError::new("year", "editor.issues.yearInvalid"));
        }

        if let Err(length_errors) = form.validate() {
            let mut found: Vec<FieldError> = length_errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, field_errors)| {
                    let field = field.to_string();
                    field_errors.iter().map(move |e| {
                        FieldError::new(field.clone(), format!("editor.issues.{}", e.code))
                    })
                })
                .collect();
            found.sort_by(|a, b| a.field.cmp(&b.field));
            errors.extend(found);
        }

        if !form.any_identification_shown() {
            errors.push(FieldError::new(
                "issueForm",
                "editor.issues.issueIdentificationRequired",
            ));
        }

        // The locale names the cover file, so it is checked before anything is written
        if !is_valid_locale_code(form.effective_locale(&request.locale)) {
            errors.push(FieldError::new("formLocale", "editor.issues.invalidFormLocale"));
        }

        if let Some(file_id) = form.temporary_file_id {
            let temporary_file = self.require_temporary_file(file_id, request.user_id)?;
            if self
                .public_files
                .image_extension(&temporary_file.file_type)
                .is_none()
            {
                errors.push(FieldError::new(
                    "coverImage",
                    "editor.issues.invalidCoverImageFormat",
                ));
            }
        }

        if !errors.is_empty() {
            warn!(
                "Issue form for journal {} failed validation with {} error(s)",
                request.journal_id,
                errors.len()
            );
        }
        Ok(errors)
    }

    /// Validates and saves the form onto `existing` or a new issue.
    pub fn execute(
        &self,
        form: &IssueForm,
        request: &RequestContext,
        existing: Option<&Issue>,
    ) -> Result<IssueId, JournalError> {
        let errors = self.validate(form, request)?;
        if !errors.is_empty() {
            return Err(JournalError::Validation(errors));
        }

        let (mut issue, mut state) = match existing {
            Some(issue) => {
                let id = issue.id.ok_or_else(|| {
                    JournalError::InvalidInput("Existing issue has no ID".to_string())
                })?;
                (issue.clone(), IssueWriteState::Created(id))
            }
            None => (self.issues.new_data_object(), IssueWriteState::Draft),
        };
        let is_new = state == IssueWriteState::Draft;
        let form_locale = form.effective_locale(&request.locale).to_string();

        issue.journal_id = Some(request.journal_id);
        issue.title = form.title.clone();
        issue.volume = parse_or_zero("Volume", &form.volume)?;
        issue.number = if form.number.trim().is_empty() {
            "0".to_string()
        } else {
            form.number.trim().to_string()
        };
        issue.year = parse_or_zero("Year", &form.year)?;
        if !is_new {
            issue.date_published = form.date_published;
        }
        issue.description = form.description.clone();
        issue.show_volume = form.show_volume;
        issue.show_number = form.show_number;
        issue.show_year = form.show_year;
        issue.show_title = form.show_title;

        // A missing access status has always meant open access
        issue.access_status = form.access_status.unwrap_or(AccessStatus::Open);
        issue.open_access_date = if form.enable_open_access_date {
            form.open_access_date
        } else {
            None
        };

        if let Some(file_id) = form.temporary_file_id {
            let temporary_file = self.require_temporary_file(file_id, request.user_id)?;
            let extension = self
                .public_files
                .image_extension(&temporary_file.file_type)
                .ok_or_else(|| {
                    JournalError::Validation(vec![FieldError::new(
                        "coverImage",
                        "editor.issues.invalidCoverImageFormat",
                    )])
                })?;

            if state == IssueWriteState::Draft {
                issue.published = false;
                issue.current = false;
                let id = self.issues.insert_issue(&issue)?;
                issue.id = Some(id);
                state = state.created(id)?;
                debug!("Inserted issue {} ahead of attaching its cover", id);
            }
            let id = state.issue_id().ok_or_else(|| {
                JournalError::InvalidInput("Issue has no ID for its cover".to_string())
            })?;

            let file_name = cover_file_name(id, &form_locale, extension);
            self.public_files.copy_journal_file(
                request.journal_id,
                &temporary_file.file_path,
                &file_name,
            )?;
            issue.cover_image.set(form_locale, file_name);
            state = state.cover_attached()?;
        }

        issue.cover_image_alt_text = form.cover_image_alt_text.clone();

        match state {
            IssueWriteState::Draft => {
                issue.published = false;
                issue.current = false;
                let id = self.issues.insert_issue(&issue)?;
                info!(
                    "Created issue {} ({}) in journal {}",
                    id,
                    issue.identification(&request.locale),
                    request.journal_id
                );
                Ok(id)
            }
            IssueWriteState::Created(id) | IssueWriteState::CoverAttached(id) => {
                issue.id = Some(id);
                self.issues.update_issue(&issue)?;
                info!(
                    "Saved issue {} ({}) in journal {}",
                    id,
                    issue.identification(&request.locale),
                    request.journal_id
                );
                Ok(id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        IssueWrite, MemoryTemporaryFiles, RecordingIssueGateway, RecordingPublicFiles,
    };
    use chrono::TimeZone;
    use serde_json::json;
    use std::path::PathBuf;

    const USER: i64 = 42;

    fn request() -> RequestContext {
        RequestContext {
            journal_id: JournalId(1),
            user_id: USER,
            locale: LocaleContext::new("en_US", "en_US"),
        }
    }

    fn valid_form() -> IssueForm {
        IssueForm {
            volume: "3".to_string(),
            number: "2".to_string(),
            year: "2024".to_string(),
            show_volume: true,
            show_number: true,
            show_year: true,
            form_locale: "en_US".to_string(),
            ..IssueForm::default()
        }
    }

    fn saved_issue() -> Issue {
        Issue {
            id: Some(IssueId(9)),
            journal_id: Some(JournalId(1)),
            volume: 3,
            number: "2".to_string(),
            year: 2024,
            date_published: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            access_status: AccessStatus::Subscription,
            open_access_date: Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()),
            show_volume: true,
            show_number: true,
            show_year: true,
            show_title: true,
            published: true,
            current: true,
            title: LocalizedText::new()
                .with("en_US", "Open Science")
                .with("fr_CA", "Science ouverte"),
            description: LocalizedText::new().with("en_US", "<p>Special issue</p>"),
            cover_image: LocalizedText::new().with("en_US", "cover_issue_9_en_US.png"),
            cover_image_alt_text: LocalizedText::new().with("en_US", "A library"),
        }
    }

    #[test]
    fn new_form_shows_everything() {
        let ctx = LocaleContext::new("fr_CA", "en_US");
        let form = IssueForm::initialize(None, PublishingMode::Open, &ctx);

        assert!(form.show_volume && form.show_number && form.show_year && form.show_title);
        assert_eq!(form.access_status, Some(AccessStatus::Open));
        assert_eq!(form.form_locale, "fr_CA");
    }

    #[test]
    fn new_form_access_follows_publishing_mode() {
        let ctx = LocaleContext::new("en_US", "en_US");
        let cases = [
            (PublishingMode::Open, AccessStatus::Open),
            (PublishingMode::Subscription, AccessStatus::Subscription),
            (PublishingMode::None, AccessStatus::Subscription),
        ];
        for (mode, expected) in cases {
            let form = IssueForm::initialize(None, mode, &ctx);
            assert_eq!(form.access_status, Some(expected), "mode {}", mode);
        }
    }

    #[test]
    fn edit_form_copies_issue() {
        let ctx = LocaleContext::new("en_US", "en_US");
        let issue = saved_issue();
        let form = IssueForm::initialize(Some(&issue), PublishingMode::Open, &ctx);

        assert_eq!(form.title, issue.title);
        assert_eq!(form.volume, "3");
        assert_eq!(form.year, "2024");
        assert_eq!(form.access_status, Some(AccessStatus::Subscription));
        assert!(form.enable_open_access_date);
        assert_eq!(form.cover_image.as_deref(), Some("cover_issue_9_en_US.png"));
        assert_eq!(form.cover_image_alt_text, issue.cover_image_alt_text);
    }

    #[test]
    fn shown_volume_must_be_filled() {
        let gateway = RecordingIssueGateway::default();
        let temps = MemoryTemporaryFiles::default();
        let files = RecordingPublicFiles::default();
        let workflow = IssueEditWorkflow::new(&gateway, &temps, &files);

        let form = IssueForm {
            show_volume: true,
            form_locale: "en_US".to_string(),
            ..IssueForm::default()
        };
        let errors = workflow.validate(&form, &request()).unwrap();

        assert_eq!(
            errors,
            vec![FieldError::new("volume", "editor.issues.volumeRequired")]
        );
    }

    #[test]
    fn hidden_fields_may_be_empty() {
        let gateway = RecordingIssueGateway::default();
        let temps = MemoryTemporaryFiles::default();
        let files = RecordingPublicFiles::default();
        let workflow = IssueEditWorkflow::new(&gateway, &temps, &files);

        let form = IssueForm {
            show_title: true,
            title: LocalizedText::new().with("fr_CA", "Numéro spécial"),
            ..IssueForm::default()
        };
        assert!(workflow.validate(&form, &request()).unwrap().is_empty());
    }

    #[test]
    fn zero_does_not_count_as_filled() {
        let gateway = RecordingIssueGateway::default();
        let temps = MemoryTemporaryFiles::default();
        let files = RecordingPublicFiles::default();
        let workflow = IssueEditWorkflow::new(&gateway, &temps, &files);

        let form = IssueForm {
            year: "0".to_string(),
            ..valid_form()
        };
        let errors = workflow.validate(&form, &request()).unwrap();
        assert_eq!(errors, vec![FieldError::new("year", "editor.issues.yearRequired")]);
    }

    #[test]
    fn title_required_across_all_locales() {
        let gateway = RecordingIssueGateway::default();
        let temps = MemoryTemporaryFiles::default();
        let files = RecordingPublicFiles::default();
        let workflow = IssueEditWorkflow::new(&gateway, &temps, &files);

        let form = IssueForm {
            show_title: true,
            title: LocalizedText::new().with("en_US", "").with("fr_CA", ""),
            ..valid_form()
        };
        let errors = workflow.validate(&form, &request()).unwrap();
        assert_eq!(errors, vec![FieldError::new("title", "editor.issues.titleRequired")]);
    }

    #[test]
    fn some_identification_must_be_shown() {
        let gateway = RecordingIssueGateway::default();
        let temps = MemoryTemporaryFiles::default();
        let files = RecordingPublicFiles::default();
        let workflow = IssueEditWorkflow::new(&gateway, &temps, &files);

        let form = IssueForm {
            volume: "1".to_string(),
            ..IssueForm::default()
        };
        let errors = workflow.validate(&form, &request()).unwrap();
        assert_eq!(
            errors,
            vec![FieldError::new("issueForm", "editor.issues.issueIdentificationRequired")]
        );
    }

    #[test]
    fn volume_and_year_must_be_numbers() {
        let gateway = RecordingIssueGateway::default();
        let temps = MemoryTemporaryFiles::default();
        let files = RecordingPublicFiles::default();
        let workflow = IssueEditWorkflow::new(&gateway, &temps, &files);

        let form = IssueForm {
            volume: "IV".to_string(),
            year: "20x4".to_string(),
            ..valid_form()
        };
        let errors = workflow.validate(&form, &request()).unwrap();
        assert!(errors.contains(&FieldError::new("volume", "editor.issues.volumeInvalid")));
        assert!(errors.contains(&FieldError::new("year", "editor.issues.yearInvalid")));
    }

    #[test]
    fn overlong_fields_are_reported() {
        let gateway = RecordingIssueGateway::default();
        let temps = MemoryTemporaryFiles::default();
        let files = RecordingPublicFiles::default();
        let workflow = IssueEditWorkflow::new(&gateway, &temps, &files);

        let form = IssueForm {
            year: "20245".to_string(),
            ..valid_form()
        };
        let errors = workflow.validate(&form, &request()).unwrap();
        assert_eq!(errors, vec![FieldError::new("year", "editor.issues.yearTooLong")]);
    }

    #[test]
    fn cover_upload_must_be_an_image() {
        let gateway = RecordingIssueGateway::default();
        let temps = MemoryTemporaryFiles::default().with_file(5, USER, "application/pdf");
        let files = RecordingPublicFiles::default();
        let workflow = IssueEditWorkflow::new(&gateway, &temps, &files);

        let form = IssueForm {
            temporary_file_id: Some(5),
            ..valid_form()
        };
        let errors = workflow.validate(&form, &request()).unwrap();
        assert_eq!(
            errors,
            vec![FieldError::new("coverImage", "editor.issues.invalidCoverImageFormat")]
        );
    }

    #[test]
    fn someone_elses_upload_is_not_found() {
        let gateway = RecordingIssueGateway::default();
        let temps = MemoryTemporaryFiles::default().with_file(5, 7, "image/png");
        let files = RecordingPublicFiles::default();
        let workflow = IssueEditWorkflow::new(&gateway, &temps, &files);

        let form = IssueForm {
            temporary_file_id: Some(5),
            ..valid_form()
        };
        let err = workflow.validate(&form, &request()).unwrap_err();
        assert!(matches!(err, JournalError::NotFound(_)));

        let err = workflow.execute(&form, &request(), None).unwrap_err();
        assert!(matches!(err, JournalError::NotFound(_)));
        assert!(gateway.writes().is_empty());
    }

    #[test]
    fn invalid_form_is_never_persisted() {
        let gateway = RecordingIssueGateway::default();
        let temps = MemoryTemporaryFiles::default();
        let files = RecordingPublicFiles::default();
        let workflow = IssueEditWorkflow::new(&gateway, &temps, &files);

        let form = IssueForm {
            volume: String::new(),
            ..valid_form()
        };
        let err = workflow.execute(&form, &request(), None).unwrap_err();

        assert_eq!(
            err.field_errors(),
            &[FieldError::new("volume", "editor.issues.volumeRequired")]
        );
        assert!(gateway.writes().is_empty());
    }

    #[test]
    fn new_issue_is_inserted_unpublished() {
        let gateway = RecordingIssueGateway::default();
        let temps = MemoryTemporaryFiles::default();
        let files = RecordingPublicFiles::default();
        let workflow = IssueEditWorkflow::new(&gateway, &temps, &files);

        let form = IssueForm {
            number: "  ".to_string(),
            show_number: false,
            date_published: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            ..valid_form()
        };
        let id = workflow.execute(&form, &request(), None).unwrap();
        assert_eq!(id, IssueId(1));

        let writes = gateway.writes();
        assert_eq!(writes.len(), 1);
        let IssueWrite::Insert(issue) = &writes[0] else {
            panic!("expected an insert, got {:?}", writes[0]);
        };
        assert_eq!(issue.journal_id, Some(JournalId(1)));
        assert_eq!(issue.volume, 3);
        assert_eq!(issue.number, "0");
        assert_eq!(issue.year, 2024);
        assert!(!issue.published);
        assert!(!issue.current);
        assert_eq!(issue.date_published, None);
    }

    #[test]
    fn blank_access_status_saves_as_open() {
        let gateway = RecordingIssueGateway::default();
        let temps = MemoryTemporaryFiles::default();
        let files = RecordingPublicFiles::default();
        let workflow = IssueEditWorkflow::new(&gateway, &temps, &files);

        for submitted in [json!(0), json!(""), json!(null), json!("0")] {
            let form: IssueForm = serde_json::from_value(json!({
                "volume": "1",
                "showVolume": true,
                "accessStatus": submitted,
                "formLocale": "en_US",
            }))
            .unwrap();
            assert_eq!(form.access_status, None);

            let mut existing = saved_issue();
            existing.access_status = AccessStatus::Subscription;
            workflow.execute(&form, &request(), Some(&existing)).unwrap();
            assert_eq!(
                gateway.last_written().unwrap().access_status,
                AccessStatus::Open
            );
        }
    }

    #[test]
    fn submitted_access_status_is_kept() {
        let form: IssueForm = serde_json::from_value(json!({
            "volume": "1",
            "showVolume": true,
            "accessStatus": "2",
        }))
        .unwrap();
        assert_eq!(form.access_status, Some(AccessStatus::Subscription));
    }

    #[test]
    fn disabling_open_access_date_clears_it() {
        let gateway = RecordingIssueGateway::default();
        let temps = MemoryTemporaryFiles::default();
        let files = RecordingPublicFiles::default();
        let workflow = IssueEditWorkflow::new(&gateway, &temps, &files);
        let ctx = LocaleContext::new("en_US", "en_US");

        let existing = saved_issue();
        let mut form = IssueForm::initialize(Some(&existing), PublishingMode::Open, &ctx);
        form.enable_open_access_date = false;

        workflow.execute(&form, &request(), Some(&existing)).unwrap();
        assert_eq!(gateway.last_written().unwrap().open_access_date, None);
    }

    #[test]
    fn unchanged_edit_round_trips() {
        let gateway = RecordingIssueGateway::default();
        let temps = MemoryTemporaryFiles::default();
        let files = RecordingPublicFiles::default();
        let workflow = IssueEditWorkflow::new(&gateway, &temps, &files);
        let ctx = LocaleContext::new("en_US", "en_US");

        let existing = saved_issue();
        let form = workflow.initialize_form_data(Some(&existing), PublishingMode::Open, &ctx);
        let id = workflow.execute(&form, &request(), Some(&existing)).unwrap();

        assert_eq!(id, IssueId(9));
        assert_eq!(gateway.writes(), vec![IssueWrite::Update(existing)]);
    }

    #[test]
    fn new_issue_with_cover_inserts_then_updates() {
        let gateway = RecordingIssueGateway::default();
        let temps = MemoryTemporaryFiles::default().with_file(5, USER, "image/jpeg");
        let files = RecordingPublicFiles::default();
        let workflow = IssueEditWorkflow::new(&gateway, &temps, &files);

        let form = IssueForm {
            temporary_file_id: Some(5),
            form_locale: "fr_CA".to_string(),
            cover_image_alt_text: LocalizedText::new().with("fr_CA", "Une bibliothèque"),
            ..valid_form()
        };
        let id = workflow.execute(&form, &request(), None).unwrap();
        assert_eq!(id, IssueId(1));

        let writes = gateway.writes();
        assert_eq!(writes.len(), 2);
        let (IssueWrite::Insert(first), IssueWrite::Update(second)) = (&writes[0], &writes[1])
        else {
            panic!("expected insert then update, got {:?}", writes);
        };
        assert!(first.cover_image.is_empty());
        assert!(!first.published && !first.current);
        assert_eq!(second.id, Some(IssueId(1)));
        assert_eq!(second.cover_image.get("fr_CA"), Some("cover_issue_1_fr_CA.jpg"));
        assert_eq!(second.cover_image_alt_text.get("fr_CA"), Some("Une bibliothèque"));

        assert_eq!(
            files.copies.borrow().as_slice(),
            &[(
                JournalId(1),
                PathBuf::from("/tmp/uploads/5.upload"),
                "cover_issue_1_fr_CA.jpg".to_string()
            )]
        );
    }

    #[test]
    fn existing_issue_with_cover_updates_once() {
        let gateway = RecordingIssueGateway::default();
        let temps = MemoryTemporaryFiles::default().with_file(5, USER, "image/png");
        let files = RecordingPublicFiles::default();
        let workflow = IssueEditWorkflow::new(&gateway, &temps, &files);
        let ctx = LocaleContext::new("en_US", "en_US");

        let existing = saved_issue();
        let mut form = IssueForm::initialize(Some(&existing), PublishingMode::Open, &ctx);
        form.temporary_file_id = Some(5);
        form.form_locale = "fr_CA".to_string();

        workflow.execute(&form, &request(), Some(&existing)).unwrap();

        let writes = gateway.writes();
        assert_eq!(writes.len(), 1);
        let saved = gateway.last_written().unwrap();
        assert_eq!(saved.cover_image.get("en_US"), Some("cover_issue_9_en_US.png"));
        assert_eq!(saved.cover_image.get("fr_CA"), Some("cover_issue_9_fr_CA.png"));
        assert!(saved.published && saved.current);
    }

    #[test]
    fn posted_form_without_locale_edits_active_locale() {
        let gateway = RecordingIssueGateway::default();
        let temps = MemoryTemporaryFiles::default().with_file(5, USER, "image/png");
        let files = RecordingPublicFiles::default();
        let workflow = IssueEditWorkflow::new(&gateway, &temps, &files);
        let request = RequestContext {
            locale: LocaleContext::new("fr_CA", "en_US"),
            ..request()
        };

        let form: IssueForm = serde_json::from_value(json!({
            "volume": "1",
            "showVolume": true,
            "temporaryFileId": 5,
        }))
        .unwrap();
        assert_eq!(form.form_locale, "");
        assert!(workflow.validate(&form, &request).unwrap().is_empty());

        workflow.execute(&form, &request, None).unwrap();
        let saved = gateway.last_written().unwrap();
        assert_eq!(saved.cover_image.get("fr_CA"), Some("cover_issue_1_fr_CA.png"));
        assert_eq!(saved.cover_image.get(""), None);
        assert_eq!(files.copies.borrow()[0].2, "cover_issue_1_fr_CA.png");
    }

    #[test]
    fn malformed_form_locale_is_rejected_before_insert() {
        let gateway = RecordingIssueGateway::default();
        let temps = MemoryTemporaryFiles::default().with_file(5, USER, "image/png");
        let files = RecordingPublicFiles::default();
        let workflow = IssueEditWorkflow::new(&gateway, &temps, &files);

        for locale in ["x/../../y", "english", "en_US.png"] {
            let form = IssueForm {
                temporary_file_id: Some(5),
                form_locale: locale.to_string(),
                ..valid_form()
            };
            let err = workflow.execute(&form, &request(), None).unwrap_err();

            assert_eq!(
                err.field_errors(),
                &[FieldError::new("formLocale", "editor.issues.invalidFormLocale")],
                "locale {:?}",
                locale
            );
        }
        assert!(gateway.writes().is_empty());
        assert!(files.copies.borrow().is_empty());
    }

    #[test]
    fn write_state_transitions() {
        let state = IssueWriteState::Draft;
        assert_eq!(state.issue_id(), None);
        assert!(state.cover_attached().is_err());

        let created = state.created(IssueId(4)).unwrap();
        assert_eq!(created, IssueWriteState::Created(IssueId(4)));
        assert!(created.created(IssueId(5)).is_err());

        let attached = created.cover_attached().unwrap();
        assert_eq!(attached, IssueWriteState::CoverAttached(IssueId(4)));
        assert_eq!(attached.issue_id(), Some(IssueId(4)));
        assert!(attached.cover_attached().is_err());
    }

    #[test]
    fn cover_names_are_deterministic() {
        assert_eq!(
            cover_file_name(IssueId(12), "en_US", ".png"),
            "cover_issue_12_en_US.png"
        );
    }
}
