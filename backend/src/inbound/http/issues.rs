//! Issue handlers.
//!
//! ```text
//! GET  /Issues?sortOrder=&categoryFilter=
//! GET  /Issues/Details/{id}
//! GET  /Issues/Create
//! POST /Issues/Create
//! GET  /Issues/Edit/{id}
//! POST /Issues/Edit/{id}
//! ```

use actix_web::{HttpResponse, get, http::header, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::IssueFormOptions;
use crate::domain::{
    Error, Issue, IssueCategory, IssueId, IssueListQuery, IssueSortOrder, IssueStatusCounts,
    IssueSubmission,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::resolve_caller;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Query-string parameters for the issue list.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct IssueListParams {
    /// `priority_desc`, `priority_asc`, `date_asc` or `date_desc`.
    pub sort_order: Option<String>,
    /// Category name; unknown values are ignored.
    pub category_filter: Option<String>,
}

/// Listing response: issues plus dashboard counts and the applied query.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueListResponse {
    pub issues: Vec<Issue>,
    pub counts: IssueStatusCounts,
    pub sort_order: IssueSortOrder,
    pub category_filter: Option<IssueCategory>,
}

/// Create/edit form body. Every field is optional on the wire so that
/// missing values surface as field errors rather than a parse failure.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueFormRequest {
    /// Echoed by edit forms; must match the path id.
    pub id: Option<i64>,
    #[schema(example = "Broken streetlight")]
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = "Lighting")]
    pub category: Option<String>,
    #[schema(example = "High")]
    pub priority: Option<String>,
    /// Ignored on create; applied on edit only for administrators.
    #[schema(example = "Open")]
    pub status: Option<String>,
}

impl From<IssueFormRequest> for IssueSubmission {
    fn from(value: IssueFormRequest) -> Self {
        let IssueFormRequest {
            id,
            title,
            description,
            category,
            priority,
            status,
        } = value;
        Self {
            id,
            title,
            description,
            category,
            priority,
            status,
        }
    }
}

/// Edit form payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditIssueResponse {
    pub issue: Issue,
    /// Whether the form should offer the status field.
    pub can_set_status: bool,
}

/// Path ids that are not positive integers address no issue.
fn parse_issue_id(raw: &str) -> Result<IssueId, Error> {
    raw.parse().map_err(|_| {
        debug!(raw, "rejected malformed issue id");
        Error::not_found(format!("issue {raw} not found"))
    })
}

/// List issues with optional category filter and sort order.
#[utoipa::path(
    get,
    path = "/Issues",
    params(IssueListParams),
    responses(
        (status = 200, description = "Issues and dashboard counts", body = IssueListResponse),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["issues"],
    operation_id = "listIssues",
    security([])
)]
#[get("/Issues")]
pub async fn list_issues(
    state: web::Data<HttpState>,
    params: web::Query<IssueListParams>,
) -> ApiResult<web::Json<IssueListResponse>> {
    let params = params.into_inner();
    let query = IssueListQuery::from_raw(
        params.sort_order.as_deref(),
        params.category_filter.as_deref(),
    );
    let listing = state.issues.list_issues(query).await?;
    Ok(web::Json(IssueListResponse {
        issues: listing.issues,
        counts: listing.counts,
        sort_order: listing.query.sort,
        category_filter: listing.query.category,
    }))
}

/// Fetch one issue.
#[utoipa::path(
    get,
    path = "/Issues/Details/{id}",
    params(("id" = String, Path, description = "Issue identifier")),
    responses(
        (status = 200, description = "Issue", body = Issue),
        (status = 404, description = "No such issue", body = ErrorSchema)
    ),
    tags = ["issues"],
    operation_id = "issueDetail",
    security([])
)]
#[get("/Issues/Details/{id}")]
pub async fn issue_detail(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Issue>> {
    let id = parse_issue_id(&path)?;
    let issue = state.issues.issue_detail(id).await?;
    Ok(web::Json(issue))
}

/// Options for the create form.
#[utoipa::path(
    get,
    path = "/Issues/Create",
    responses(
        (status = 200, description = "Form options", body = IssueFormOptions),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["issues"],
    operation_id = "createIssueForm",
    security(("SessionCookie" = []))
)]
#[get("/Issues/Create")]
pub async fn create_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<IssueFormOptions>> {
    let caller = resolve_caller(&session, state.identity.as_ref()).await?;
    let options = state.issue_commands.create_form(caller).await?;
    Ok(web::Json(options))
}

/// Submit a new issue. The status is always `Open`.
#[utoipa::path(
    post,
    path = "/Issues/Create",
    request_body = IssueFormRequest,
    responses(
        (status = 201, description = "Issue created", body = Issue,
            headers(("Location" = String, description = "Detail URL"))),
        (status = 400, description = "Invalid submission", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["issues"],
    operation_id = "createIssue",
    security(("SessionCookie" = []))
)]
#[post("/Issues/Create")]
pub async fn create_issue(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<IssueFormRequest>,
) -> ApiResult<HttpResponse> {
    let caller = resolve_caller(&session, state.identity.as_ref()).await?;
    let issue = state
        .issue_commands
        .create_issue(payload.into_inner().into(), caller)
        .await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/Issues/Details/{}", issue.id())))
        .json(issue))
}

/// Load an issue for the edit form.
#[utoipa::path(
    get,
    path = "/Issues/Edit/{id}",
    params(("id" = String, Path, description = "Issue identifier")),
    responses(
        (status = 200, description = "Issue and edit permissions", body = EditIssueResponse),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Neither owner nor administrator", body = ErrorSchema),
        (status = 404, description = "No such issue", body = ErrorSchema)
    ),
    tags = ["issues"],
    operation_id = "editIssueForm",
    security(("SessionCookie" = []))
)]
#[get("/Issues/Edit/{id}")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<EditIssueResponse>> {
    let id = parse_issue_id(&path)?;
    let caller = resolve_caller(&session, state.identity.as_ref()).await?;
    let editable = state.issue_commands.prepare_edit(id, caller).await?;
    Ok(web::Json(EditIssueResponse {
        issue: editable.issue,
        can_set_status: editable.permissions.can_set_status,
    }))
}

/// Apply an edit.
#[utoipa::path(
    post,
    path = "/Issues/Edit/{id}",
    params(("id" = String, Path, description = "Issue identifier")),
    request_body = IssueFormRequest,
    responses(
        (status = 200, description = "Updated issue", body = Issue),
        (status = 400, description = "Invalid submission", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Neither owner nor administrator", body = ErrorSchema),
        (status = 404, description = "No such issue", body = ErrorSchema)
    ),
    tags = ["issues"],
    operation_id = "editIssue",
    security(("SessionCookie" = []))
)]
#[post("/Issues/Edit/{id}")]
pub async fn edit_issue(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<IssueFormRequest>,
) -> ApiResult<web::Json<Issue>> {
    let id = parse_issue_id(&path)?;
    let caller = resolve_caller(&session, state.identity.as_ref()).await?;
    let issue = state
        .issue_commands
        .edit_issue(id, payload.into_inner().into(), caller)
        .await?;
    Ok(web::Json(issue))
}

#[cfg(test)]
#[path = "issues_tests.rs"]
mod tests;
