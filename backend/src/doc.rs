//! OpenAPI document for the issue tracker.
//!
//! Registers every inbound handler, the domain schemas they return and the
//! session cookie security scheme. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::IssueFormOptions;
use crate::domain::{
    FieldErrorCode, Issue, IssueCategory, IssueField, IssueFieldError, IssuePriority,
    IssueSortOrder, IssueStatus, IssueStatusCounts, Role,
};
use crate::inbound::http::issues::{EditIssueResponse, IssueFormRequest, IssueListResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{CallerResponse, LoginRequest};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the HTTP surface.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Community issue tracker API",
        description = "Report, triage and resolve local infrastructure issues."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    paths(
        crate::inbound::http::issues::list_issues,
        crate::inbound::http::issues::issue_detail,
        crate::inbound::http::issues::create_form,
        crate::inbound::http::issues::create_issue,
        crate::inbound::http::issues::edit_form,
        crate::inbound::http::issues::edit_issue,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_caller,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        Issue,
        IssueCategory,
        IssuePriority,
        IssueStatus,
        IssueSortOrder,
        IssueStatusCounts,
        IssueField,
        IssueFieldError,
        FieldErrorCode,
        IssueFormOptions,
        IssueFormRequest,
        IssueListResponse,
        EditIssueResponse,
        LoginRequest,
        CallerResponse,
        Role,
    )),
    tags(
        (name = "issues", description = "Community issue reports"),
        (name = "users", description = "Session login and caller identity"),
        (name = "health", description = "Readiness and liveness probes")
    )
)]
pub struct ApiDoc;
