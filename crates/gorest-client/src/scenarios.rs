//! End-to-end scenarios against a live (or fake) GoREST service
//!
//! Each scenario owns a fresh [`Check`], tears down everything it created,
//! and drains the check once at the end.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use gorest_core::{
    Check, CommentPayload, OutcomeStatus, PostPayload, ScenarioOutcome, SeedData, SuiteReport,
    UserPayload, check,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::GorestClient;
use crate::error::ScenarioError;
use crate::fixtures::UserFixture;
use crate::resources::{DELETE_CONFIRMATION, unique_email};

/// Comment author name used by the comment scenarios.
const COMMENT_NAME: &str = "Test User Comments";
const COMMENT_BODY: &str = "Sample comment body.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    CreateUser,
    GetUser,
    UpdateUser,
    CreatePost,
    ListPosts,
    CreateComment,
    ListComments,
    Todos,
    FullChain,
}

impl Scenario {
    pub const ALL: [Self; 9] = [
        Self::CreateUser,
        Self::GetUser,
        Self::UpdateUser,
        Self::CreatePost,
        Self::ListPosts,
        Self::CreateComment,
        Self::ListComments,
        Self::Todos,
        Self::FullChain,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateUser => "create-user",
            Self::GetUser => "get-user",
            Self::UpdateUser => "update-user",
            Self::CreatePost => "create-post",
            Self::ListPosts => "list-posts",
            Self::CreateComment => "create-comment",
            Self::ListComments => "list-comments",
            Self::Todos => "todos",
            Self::FullChain => "full-chain",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::CreateUser => "Create a user from the first seed user",
            Self::GetUser => "Create a user and read it back by id",
            Self::UpdateUser => "Create a user and replace its name and email",
            Self::CreatePost => "Create a post under a fresh user",
            Self::ListPosts => "Create a post and find it in the user's posts",
            Self::CreateComment => "Create a comment under a fresh post",
            Self::ListComments => "Create a comment and find it in the post's comments",
            Self::Todos => "List a fresh user's todos",
            Self::FullChain => "User, post, comment, list comments, delete",
        }
    }

    fn run(self, client: &GorestClient, template: &UserPayload) -> Result<(), ScenarioError> {
        match self {
            Self::CreateUser => create_user(client, template),
            Self::GetUser => get_user(client, template),
            Self::UpdateUser => update_user(client, template),
            Self::CreatePost => create_post(client, template),
            Self::ListPosts => list_posts(client, template),
            Self::CreateComment => create_comment(client, template),
            Self::ListComments => list_comments(client, template),
            Self::Todos => todos(client, template),
            Self::FullChain => full_chain(client, template),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scenario '{0}'")]
pub struct UnknownScenario(pub String);

impl FromStr for Scenario {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| UnknownScenario(s.to_string()))
    }
}

/// Run one scenario with the first seed user as template.
#[must_use]
pub fn run_scenario(client: &GorestClient, seed: &SeedData, scenario: Scenario) -> ScenarioOutcome {
    let name = scenario.name();
    let Some(template) = seed.first_user() else {
        return ScenarioOutcome::error(name, "seed data contains no users");
    };

    info!(scenario = name, "running scenario");
    let start = Instant::now();
    let result = scenario.run(client, template);
    let elapsed = start.elapsed().as_secs_f64();

    let outcome = match result {
        Ok(()) => ScenarioOutcome::pass(name),
        Err(ScenarioError::Checks(failures)) => ScenarioOutcome::fail(name, failures.errors),
        Err(e) => ScenarioOutcome::error(name, e.to_string()),
    };
    match outcome.status {
        OutcomeStatus::Pass => info!(scenario = name, elapsed, "scenario passed"),
        status => warn!(scenario = name, %status, elapsed, "scenario did not pass"),
    }
    outcome.with_elapsed(elapsed)
}

/// Run `scenarios` one after another.
#[must_use]
pub fn run_suite(client: &GorestClient, seed: &SeedData, scenarios: &[Scenario]) -> SuiteReport {
    let outcomes = scenarios
        .iter()
        .map(|&scenario| run_scenario(client, seed, scenario))
        .collect();
    SuiteReport::from_outcomes(outcomes)
}

fn sample_comment() -> CommentPayload {
    CommentPayload::new(COMMENT_NAME, unique_email(), COMMENT_BODY)
}

fn str_field<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value.get(field).and_then(Value::as_str)
}

fn create_user(client: &GorestClient, template: &UserPayload) -> Result<(), ScenarioError> {
    let mut chk = Check::new();
    let user = UserFixture::create(client, template, &mut chk)?;
    check!(chk, !user.body().is_null(), "User data should not be None");
    user.teardown(&mut chk);
    chk.ensure_clean("create-user")?;
    Ok(())
}

fn get_user(client: &GorestClient, template: &UserPayload) -> Result<(), ScenarioError> {
    let mut chk = Check::new();
    let user = UserFixture::create(client, template, &mut chk)?;
    let fetched = client.get_user(user.id(), &mut chk)?;
    let fetched_id = fetched.get("id").and_then(Value::as_u64);
    check!(
        chk,
        fetched_id == Some(user.id()),
        "Retrieved user ID should match the created user ID",
        user.id(),
        fetched_id
    );
    user.teardown(&mut chk);
    chk.ensure_clean("get-user")?;
    Ok(())
}

fn update_user(client: &GorestClient, template: &UserPayload) -> Result<(), ScenarioError> {
    let mut chk = Check::new();
    let user = UserFixture::create(client, template, &mut chk)?;
    let update = UserPayload::new("Updated Name", "male", "active").with_email(unique_email());
    let updated = client.update_user(user.id(), &update, &mut chk)?;

    let name = str_field(&updated, "name");
    let email = str_field(&updated, "email");
    check!(
        chk,
        name == Some(update.name.as_str()),
        "User name should be updated",
        update.name,
        name
    );
    check!(
        chk,
        email == Some(update.email.as_str()),
        "User email should be updated",
        update.email,
        email
    );
    user.teardown(&mut chk);
    chk.ensure_clean("update-user")?;
    Ok(())
}

fn create_post(client: &GorestClient, template: &UserPayload) -> Result<(), ScenarioError> {
    let mut chk = Check::new();
    let user = UserFixture::create(client, template, &mut chk)?;
    let post = user.create_post(&PostPayload::sample(), &mut chk)?;
    check!(
        chk,
        post.user_id() == user.id(),
        "Post should belong to the created user",
        post.user_id(),
        user.id()
    );
    user.teardown(&mut chk);
    chk.ensure_clean("create-post")?;
    Ok(())
}

fn list_posts(client: &GorestClient, template: &UserPayload) -> Result<(), ScenarioError> {
    let mut chk = Check::new();
    let user = UserFixture::create(client, template, &mut chk)?;
    let payload = PostPayload::sample();
    let post = user.create_post(&payload, &mut chk)?;

    let posts = client.get_user_posts(user.id(), &mut chk)?;
    let entries = posts.as_array().map(Vec::as_slice).unwrap_or_default();
    check!(chk, !entries.is_empty(), "User posts should not be empty");
    let found = entries.iter().any(|p| {
        p.get("id").and_then(Value::as_u64) == Some(post.id())
            && str_field(p, "title") == Some(payload.title.as_str())
            && str_field(p, "body") == Some(payload.body.as_str())
    });
    check!(
        chk,
        found,
        "Created post should appear in the user's posts",
        post.id(),
        payload.title
    );
    user.teardown(&mut chk);
    chk.ensure_clean("list-posts")?;
    Ok(())
}

fn create_comment(client: &GorestClient, template: &UserPayload) -> Result<(), ScenarioError> {
    let mut chk = Check::new();
    let user = UserFixture::create(client, template, &mut chk)?;
    let post = user.create_post(&PostPayload::sample(), &mut chk)?;
    let comment = post.create_comment(&sample_comment(), &mut chk)?;
    check!(
        chk,
        comment.post_id == post.id(),
        "Comment should belong to the created post",
        comment.post_id,
        post.id()
    );
    user.teardown(&mut chk);
    chk.ensure_clean("create-comment")?;
    Ok(())
}

fn list_comments(client: &GorestClient, template: &UserPayload) -> Result<(), ScenarioError> {
    let mut chk = Check::new();
    let user = UserFixture::create(client, template, &mut chk)?;
    let post = user.create_post(&PostPayload::sample(), &mut chk)?;
    let payload = sample_comment();
    let comment = post.create_comment(&payload, &mut chk)?;

    let comments = client.get_post_comments(post.id(), &mut chk)?;
    let entries = comments.as_array().map(Vec::as_slice).unwrap_or_default();
    check!(chk, !entries.is_empty(), "Post comments should not be empty");
    let matching = entries
        .iter()
        .find(|c| c.get("id").and_then(Value::as_u64) == Some(comment.id))
        .or_else(|| entries.first());
    let name = matching.and_then(|c| str_field(c, "name"));
    let body = matching.and_then(|c| str_field(c, "body"));
    check!(
        chk,
        name == Some(payload.name.as_str()),
        "Comment name should match the submitted name",
        payload.name,
        name
    );
    check!(
        chk,
        body == Some(payload.body.as_str()),
        "Comment body should match the submitted body",
        payload.body,
        body
    );
    user.teardown(&mut chk);
    chk.ensure_clean("list-comments")?;
    Ok(())
}

fn todos(client: &GorestClient, template: &UserPayload) -> Result<(), ScenarioError> {
    let mut chk = Check::new();
    let user = UserFixture::create(client, template, &mut chk)?;
    let todos = client.get_user_todos(user.id(), &mut chk)?;
    check!(chk, todos.is_array(), "User todos should be a list", todos);
    user.teardown(&mut chk);
    chk.ensure_clean("todos")?;
    Ok(())
}

fn full_chain(client: &GorestClient, template: &UserPayload) -> Result<(), ScenarioError> {
    let mut chk = Check::new();
    let user = UserFixture::create(client, template, &mut chk)?;
    chk.ensure_clean("full-chain: create user")?;

    let post = user.create_post(&PostPayload::sample(), &mut chk)?;
    let payload = sample_comment();
    post.create_comment(&payload, &mut chk)?;

    let comments = client.get_post_comments(post.id(), &mut chk)?;
    let first = comments.as_array().and_then(|c| c.first());
    check!(chk, first.is_some(), "Post comments should not be empty");
    for (field, expected) in [
        ("name", &payload.name),
        ("email", &payload.email),
        ("body", &payload.body),
    ] {
        let actual = first.and_then(|c| str_field(c, field));
        check!(
            chk,
            actual == Some(expected.as_str()),
            format!("First comment {field} should match the submitted comment"),
            expected,
            actual
        );
    }

    let confirmation = user.delete(&mut chk)?;
    check!(
        chk,
        confirmation == DELETE_CONFIRMATION,
        "Delete should confirm the user was removed",
        confirmation
    );
    chk.ensure_clean("full-chain")?;
    Ok(())
}
