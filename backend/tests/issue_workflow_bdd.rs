//! Behaviour tests for the issue lifecycle against the in-memory store.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use community_issues::domain::ports::{IssueCommand, IssueQuery};
use community_issues::domain::{
    Caller, Error, ErrorCode, Issue, IssueId, IssueListQuery, IssueService, IssueStatus,
    IssueSubmission, Role, RoleSet, UserId,
};
use community_issues::outbound::memory::InMemoryIssueRepository;
use mockable::DefaultClock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;

struct IssueWorld {
    runtime: Runtime,
    service: IssueService<InMemoryIssueRepository>,
    callers: RefCell<HashMap<String, Caller>>,
    issue: RefCell<Option<Issue>>,
    outcome: RefCell<Option<Result<Issue, Error>>>,
}

impl IssueWorld {
    fn new() -> Self {
        Self {
            runtime: Runtime::new().expect("runtime"),
            service: IssueService::new(
                Arc::new(InMemoryIssueRepository::new()),
                Arc::new(DefaultClock),
            ),
            callers: RefCell::new(HashMap::new()),
            issue: RefCell::new(None),
            outcome: RefCell::new(None),
        }
    }

    fn add_caller(&self, name: String, roles: RoleSet) {
        let caller = Caller::authenticated(UserId::random(), roles);
        self.callers.borrow_mut().insert(name, caller);
    }

    fn caller(&self, name: &str) -> Caller {
        self.callers
            .borrow()
            .get(name)
            .cloned()
            .expect("caller registered by a given step")
    }

    fn issue_id(&self) -> IssueId {
        self.issue.borrow().as_ref().expect("issue reported").id()
    }

    fn stored(&self) -> Issue {
        self.runtime
            .block_on(self.service.issue_detail(self.issue_id()))
            .expect("stored issue")
    }

    fn create(&self, name: &str, submission: IssueSubmission) -> Result<Issue, Error> {
        self.runtime
            .block_on(self.service.create_issue(submission, self.caller(name)))
    }

    fn record(&self, outcome: Result<Issue, Error>) {
        if let Ok(issue) = &outcome {
            *self.issue.borrow_mut() = Some(issue.clone());
        }
        *self.outcome.borrow_mut() = Some(outcome);
    }

    fn error_code(&self) -> ErrorCode {
        match self.outcome.borrow().as_ref().expect("outcome recorded") {
            Ok(issue) => panic!("expected failure, got {issue:?}"),
            Err(error) => error.code(),
        }
    }
}

fn streetlight(status: Option<&str>) -> IssueSubmission {
    IssueSubmission {
        title: Some("Broken streetlight".to_owned()),
        description: Some("The lamp on Elm St has been dark for a week".to_owned()),
        category: Some("Lighting".to_owned()),
        priority: Some("High".to_owned()),
        status: status.map(str::to_owned),
        ..IssueSubmission::default()
    }
}

#[fixture]
fn world() -> IssueWorld {
    IssueWorld::new()
}

#[given("an empty issue store")]
fn an_empty_issue_store(world: &IssueWorld) {
    let listing = world
        .runtime
        .block_on(world.service.list_issues(IssueListQuery::default()))
        .expect("listing");
    assert_eq!(listing.counts.total, 0);
}

#[given("a resident named {name}")]
fn a_resident_named(world: &IssueWorld, name: String) {
    world.add_caller(name, RoleSet::empty());
}

#[given("an administrator named {name}")]
fn an_administrator_named(world: &IssueWorld, name: String) {
    world.add_caller(name, [Role::Admin].into_iter().collect());
}

#[given("{name} has reported a broken streetlight")]
fn has_reported_a_broken_streetlight(world: &IssueWorld, name: String) {
    let issue = world.create(&name, streetlight(None)).expect("report accepted");
    *world.issue.borrow_mut() = Some(issue);
}

#[when("{name} reports a broken streetlight marked Resolved")]
fn reports_a_broken_streetlight_marked_resolved(world: &IssueWorld, name: String) {
    world.record(world.create(&name, streetlight(Some("Resolved"))));
}

#[when("{name} reports an issue without a title")]
fn reports_an_issue_without_a_title(world: &IssueWorld, name: String) {
    let submission = IssueSubmission {
        title: Some(String::new()),
        ..streetlight(None)
    };
    world.record(world.create(&name, submission));
}

#[when("{name} marks the issue Resolved")]
fn marks_the_issue_resolved(world: &IssueWorld, name: String) {
    let submission = IssueSubmission {
        priority: Some("Critical".to_owned()),
        ..streetlight(Some("Resolved"))
    };
    let outcome = world.runtime.block_on(world.service.edit_issue(
        world.issue_id(),
        submission,
        world.caller(&name),
    ));
    *world.outcome.borrow_mut() = Some(outcome);
}

#[when("issue {id} is requested")]
fn issue_is_requested(world: &IssueWorld, id: i64) {
    let id = IssueId::new(id).expect("positive id");
    let outcome = world.runtime.block_on(world.service.issue_detail(id));
    *world.outcome.borrow_mut() = Some(outcome);
}

#[then("the issue is Open")]
fn the_issue_is_open(world: &IssueWorld) {
    let issue = world.issue.borrow().clone().expect("issue created");
    assert_eq!(issue.status(), IssueStatus::Open);
}

#[then("the issue is owned by {name}")]
fn the_issue_is_owned_by(world: &IssueWorld, name: String) {
    let issue = world.issue.borrow().clone().expect("issue created");
    assert_eq!(issue.created_by_user_id(), world.caller(&name).user_id());
}

#[then("the issue was created just now")]
fn the_issue_was_created_just_now(world: &IssueWorld) {
    let issue = world.issue.borrow().clone().expect("issue created");
    let age = Utc::now() - issue.created_at();
    assert!(age.num_seconds().abs() < 5, "createdAt too far from now: {age}");
}

#[then("the edit is forbidden")]
fn the_edit_is_forbidden(world: &IssueWorld) {
    assert_eq!(world.error_code(), ErrorCode::Forbidden);
}

#[then("the stored issue is {status}")]
fn the_stored_issue_is(world: &IssueWorld, status: String) {
    let expected: IssueStatus = status.parse().expect("status name");
    assert_eq!(world.stored().status(), expected);
}

#[then("the stored issue has priority {priority}")]
fn the_stored_issue_has_priority(world: &IssueWorld, priority: String) {
    assert_eq!(world.stored().priority().as_str(), priority);
}

#[then("the request fails with {code}")]
fn the_request_fails_with(world: &IssueWorld, code: String) {
    let actual = serde_json::to_value(world.error_code()).expect("code serialises");
    assert_eq!(actual, code.as_str());
}

#[then("the store holds {count} issues")]
fn the_store_holds_issues(world: &IssueWorld, count: u64) {
    let listing = world
        .runtime
        .block_on(world.service.list_issues(IssueListQuery::default()))
        .expect("listing");
    assert_eq!(listing.counts.total, count);
}

#[scenario(
    path = "tests/features/issue_workflow.feature",
    name = "A resident reports a broken streetlight"
)]
fn a_resident_reports_a_broken_streetlight(world: IssueWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/issue_workflow.feature",
    name = "Another resident cannot resolve the issue"
)]
fn another_resident_cannot_resolve_the_issue(world: IssueWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/issue_workflow.feature",
    name = "An administrator resolves the issue"
)]
fn an_administrator_resolves_the_issue(world: IssueWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/issue_workflow.feature",
    name = "A missing issue is not found"
)]
fn a_missing_issue_is_not_found(world: IssueWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/issue_workflow.feature",
    name = "An untitled report is rejected"
)]
fn an_untitled_report_is_rejected(world: IssueWorld) {
    drop(world);
}
