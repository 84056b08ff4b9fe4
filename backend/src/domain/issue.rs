//! The issue entity and its validated field types.
//!
//! Raw form input arrives as an [`IssueSubmission`]; [`IssueSubmission::validate`]
//! turns it into [`IssueContent`] or the complete list of field failures so
//! callers can report every problem at once.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Maximum number of characters in an issue title.
pub const TITLE_MAX: usize = 150;

/// Store-assigned identifier. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct IssueId(i64);

/// Raised when text or numbers cannot form an [`IssueId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("issue id must be a positive integer")]
pub struct InvalidIssueId;

impl IssueId {
    /// Validate a raw identifier.
    ///
    /// # Examples
    /// ```
    /// use community_issues::domain::IssueId;
    ///
    /// assert!(IssueId::new(7).is_ok());
    /// assert!(IssueId::new(0).is_err());
    /// ```
    pub fn new(raw: i64) -> Result<Self, InvalidIssueId> {
        if raw > 0 { Ok(Self(raw)) } else { Err(InvalidIssueId) }
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IssueId {
    type Err = InvalidIssueId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s.trim().parse().map_err(|_| InvalidIssueId)?;
        Self::new(raw)
    }
}

impl TryFrom<i64> for IssueId {
    type Error = InvalidIssueId;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IssueId> for i64 {
    fn from(value: IssueId) -> Self {
        value.0
    }
}

/// Fields of an issue addressed by validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum IssueField {
    Title,
    Description,
    Category,
    Priority,
    Status,
}

/// Machine-readable reason attached to an [`IssueFieldError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorCode {
    Required,
    TooLong,
    InvalidValue,
}

/// One failed field in a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct IssueFieldError {
    pub field: IssueField,
    pub code: FieldErrorCode,
    pub message: String,
}

impl IssueFieldError {
    fn required(field: IssueField, label: &str) -> Self {
        Self {
            field,
            code: FieldErrorCode::Required,
            message: format!("{label} is required"),
        }
    }

    fn invalid(field: IssueField, label: &str, raw: &str) -> Self {
        Self {
            field,
            code: FieldErrorCode::InvalidValue,
            message: format!("{label} '{raw}' is not recognised"),
        }
    }
}

/// Non-empty trimmed title of at most [`TITLE_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IssueTitle(String);

impl IssueTitle {
    /// # Examples
    /// ```
    /// use community_issues::domain::IssueTitle;
    ///
    /// assert_eq!(IssueTitle::new("  Broken streetlight ").expect("valid").as_ref(), "Broken streetlight");
    /// assert!(IssueTitle::new("   ").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IssueFieldError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IssueFieldError::required(IssueField::Title, "title"));
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(IssueFieldError {
                field: IssueField::Title,
                code: FieldErrorCode::TooLong,
                message: format!("title must be at most {TITLE_MAX} characters"),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for IssueTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Non-empty trimmed description with no length cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IssueDescription(String);

impl IssueDescription {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IssueFieldError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IssueFieldError::required(
                IssueField::Description,
                "description",
            ));
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for IssueDescription {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Raised when text does not name a variant of an issue enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a closed issue enumeration whose wire names are the PascalCase
/// variant names. Parsing ignores ASCII case and underscores so both
/// `InProgress` and `in_progress` are accepted.
macro_rules! issue_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) { $($(#[$vmeta:meta])* $variant:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
        #[serde(try_from = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire and storage name.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted: String = s
                    .trim()
                    .chars()
                    .filter(|c| *c != '_')
                    .collect();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(&wanted))
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_owned(),
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

issue_enum! {
    /// Kind of problem being reported.
    IssueCategory("category") {
        Potholes,
        Lighting,
        Sanitation,
        Safety,
        Other,
    }
}

issue_enum! {
    /// Urgency, ordered `Low < Medium < High < Critical`.
    IssuePriority("priority") {
        Low,
        Medium,
        High,
        Critical,
    }
}

issue_enum! {
    /// Triage state. Any status may follow any other.
    IssueStatus("status") {
        Open,
        InProgress,
        Resolved,
        Closed,
    }
}

impl Default for IssueStatus {
    fn default() -> Self {
        Self::Open
    }
}

/// Validated user-editable content of an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueContent {
    pub title: IssueTitle,
    pub description: IssueDescription,
    pub category: IssueCategory,
    pub priority: IssuePriority,
}

/// Raw, unvalidated form input for create and edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueSubmission {
    /// Identifier echoed by edit forms; must match the addressed issue.
    pub id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

impl IssueSubmission {
    /// Validate the four content fields, collecting every failure.
    pub fn validate(&self) -> Result<IssueContent, Vec<IssueFieldError>> {
        let mut errors = Vec::new();
        let title = collect(
            &mut errors,
            self.title.as_deref().map_or_else(
                || Err(IssueFieldError::required(IssueField::Title, "title")),
                IssueTitle::new,
            ),
        );
        let description = collect(
            &mut errors,
            self.description.as_deref().map_or_else(
                || {
                    Err(IssueFieldError::required(
                        IssueField::Description,
                        "description",
                    ))
                },
                IssueDescription::new,
            ),
        );
        let category = collect(
            &mut errors,
            parse_choice(self.category.as_deref(), IssueField::Category, "category"),
        );
        let priority = collect(
            &mut errors,
            parse_choice(self.priority.as_deref(), IssueField::Priority, "priority"),
        );

        match (title, description, category, priority) {
            (Some(title), Some(description), Some(category), Some(priority))
                if errors.is_empty() =>
            {
                Ok(IssueContent {
                    title,
                    description,
                    category,
                    priority,
                })
            }
            _ => Err(errors),
        }
    }

    /// Parse the submitted status; `Ok(None)` when it was omitted or blank.
    pub fn parsed_status(&self) -> Result<Option<IssueStatus>, IssueFieldError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| IssueFieldError::invalid(IssueField::Status, "status", raw)),
        }
    }
}

fn collect<T>(errors: &mut Vec<IssueFieldError>, result: Result<T, IssueFieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            errors.push(error);
            None
        }
    }
}

fn parse_choice<T>(raw: Option<&str>, field: IssueField, label: &str) -> Result<T, IssueFieldError>
where
    T: FromStr,
{
    match raw.map(str::trim) {
        None | Some("") => Err(IssueFieldError::required(field, label)),
        Some(value) => value
            .parse()
            .map_err(|_| IssueFieldError::invalid(field, label, value)),
    }
}

/// A fully formed issue awaiting an identifier from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub content: IssueContent,
    pub status: IssueStatus,
    pub created_at: DateTime<Utc>,
    pub created_by_user_id: Option<UserId>,
}

/// A persisted community issue.
///
/// `created_at` and `created_by_user_id` have no setters; only content and
/// status change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[schema(value_type = i64, example = 42)]
    id: IssueId,
    #[schema(value_type = String, example = "Broken streetlight on Elm St")]
    title: IssueTitle,
    #[schema(value_type = String, example = "The lamp outside number 12 has been dark for a week.")]
    description: IssueDescription,
    category: IssueCategory,
    priority: IssuePriority,
    status: IssueStatus,
    created_at: DateTime<Utc>,
    #[schema(value_type = Option<String>, format = Uuid)]
    created_by_user_id: Option<UserId>,
}

impl Issue {
    /// Attach a store-assigned identifier to a draft.
    pub fn new(id: IssueId, draft: NewIssue) -> Self {
        let NewIssue {
            content,
            status,
            created_at,
            created_by_user_id,
        } = draft;
        Self {
            id,
            title: content.title,
            description: content.description,
            category: content.category,
            priority: content.priority,
            status,
            created_at,
            created_by_user_id,
        }
    }

    pub fn id(&self) -> IssueId {
        self.id
    }

    pub fn title(&self) -> &IssueTitle {
        &self.title
    }

    pub fn description(&self) -> &IssueDescription {
        &self.description
    }

    pub fn category(&self) -> IssueCategory {
        self.category
    }

    pub fn priority(&self) -> IssuePriority {
        self.priority
    }

    pub fn status(&self) -> IssueStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn created_by_user_id(&self) -> Option<UserId> {
        self.created_by_user_id
    }

    /// Replace the user-editable content.
    pub fn apply_content(&mut self, content: IssueContent) {
        self.title = content.title;
        self.description = content.description;
        self.category = content.category;
        self.priority = content.priority;
    }

    pub fn set_status(&mut self, status: IssueStatus) {
        self.status = status;
    }
}
