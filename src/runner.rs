//! Ordered conformance checks against a running Lost & Found service
//!
//! Stages run strictly one after another (see [`Stage::ORDER`]). Whatever a
//! stage produces that a later one needs, such as sessions, the uploaded
//! file URL or the created item id, travels forward in a [`RunContext`].
//! A check that fails is recorded and the run moves on.

use crate::auth::{AuthHandshake, Session};
use crate::config::HarnessConfig;
use crate::error::{AuthError, CheckError};
use crate::fixtures;
use crate::model::{
    Credentials, Item, ItemEnvelope, ItemFilter, ItemStatus, ItemUpdate, ItemsEnvelope,
    MessageEnvelope, NewItem, Role, SessionUser, UploadedFile, UserEnvelope,
};
use crate::report::{RunReport, Stage};
use crate::transport::{ApiRequest, ApiResponse, Connector, FilePart};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;
use tracing::info;

pub const REGISTER_PATH: &str = "/api/auth/register";
pub const UPLOAD_PATH: &str = "/api/upload";
pub const ITEMS_PATH: &str = "/api/items";

const NO_SESSION: &str = "No valid session available for testing";
const NO_ADMIN_SESSION: &str = "No admin session available";
const NO_ITEM: &str = "No test item ID available";
const NO_UPLOAD: &str = "No uploaded file available";
const WRONG_PASSWORD: &str = "wrongpassword";

type CheckResult = Result<String, CheckError>;

/// State handed from one stage to the next
#[derive(Debug, Default)]
pub struct RunContext {
    pub regular: Option<Session>,
    pub admin: Option<Session>,
    pub other: Option<Session>,
    pub uploaded_url: Option<String>,
    pub item_id: Option<String>,
    /// Owner reported when the item was created
    pub item_owner: Option<String>,
}

pub struct ConformanceRunner<C> {
    connector: C,
    handshake: AuthHandshake,
    config: HarnessConfig,
}

impl<C: Connector> ConformanceRunner<C> {
    pub fn new(connector: C, config: HarnessConfig) -> Self {
        Self {
            connector,
            handshake: AuthHandshake::new(&config.base_url),
            config,
        }
    }

    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::default();
        let mut ctx = RunContext::default();

        for stage in Stage::ORDER {
            info!(stage = stage.title(), "running stage");
            self.run_stage(stage, &mut ctx, &mut report).await;
        }

        info!(
            passed = report.passed(),
            failed = report.failed(),
            "conformance run complete"
        );
        report
    }

    async fn run_stage(&self, stage: Stage, ctx: &mut RunContext, report: &mut RunReport) {
        match stage {
            Stage::Registration => self.registration(report).await,
            Stage::Login => self.login(ctx, report).await,
            Stage::Upload => self.upload(ctx, report).await,
            Stage::Create => self.create(ctx, report).await,
            Stage::List => self.list(report).await,
            Stage::Get => self.get(ctx, report).await,
            Stage::Update => self.update(ctx, report).await,
            Stage::Delete => self.delete(ctx, report).await,
        }
    }

    async fn registration(&self, report: &mut RunReport) {
        let stage = Stage::Registration;

        let started = Instant::now();
        let outcome = self.register(&self.config.regular, Role::User).await;
        report.record(stage, "Regular User Registration", started, outcome);

        let started = Instant::now();
        let outcome = self.register(&self.config.admin, Role::Admin).await;
        report.record(stage, "Admin User Registration", started, outcome);

        let started = Instant::now();
        let outcome = self.register(&self.config.other, Role::User).await;
        report.record(stage, "Second User Registration", started, outcome);

        let started = Instant::now();
        let outcome = self
            .expect_rejected_registration(serde_json::json!({ "email": "test@test.com" }))
            .await
            .map(|_| "Correctly rejected missing fields".to_string());
        report.record(stage, "Registration Validation (Missing Fields)", started, outcome);

        let started = Instant::now();
        let outcome = self
            .expect_rejected_registration(serde_json::json!({
                "email": "test2@test.com",
                "password": "123",
                "name": "Test User",
            }))
            .await
            .map(|_| "Correctly rejected short password".to_string());
        report.record(stage, "Registration Validation (Short Password)", started, outcome);
    }

    /// 201 with the expected role, or 409 when the account already exists
    async fn register(&self, credentials: &Credentials, role: Role) -> CheckResult {
        let response = self
            .send_anonymous(ApiRequest::post(REGISTER_PATH).with_json(to_json(credentials)?))
            .await?;

        match response.status {
            201 => {
                let envelope: UserEnvelope = parse(&response)?;
                expect_role(&envelope.user, role)?;
                Ok(format!("User created with role: {role}"))
            }
            409 => Ok(format!("{} already registered", credentials.email)),
            _ => Err(unexpected("201 or 409", &response)),
        }
    }

    async fn expect_rejected_registration(&self, body: serde_json::Value) -> Result<(), CheckError> {
        let response = self
            .send_anonymous(ApiRequest::post(REGISTER_PATH).with_json(body))
            .await?;
        expect_status(&response, 400)
    }

    async fn login(&self, ctx: &mut RunContext, report: &mut RunReport) {
        let stage = Stage::Login;

        let started = Instant::now();
        let outcome = self.sign_in(&self.config.regular, Role::User).await;
        report.record(stage, "Regular User Login", started, describe_login(&outcome));
        ctx.regular = outcome.ok();

        let started = Instant::now();
        let outcome = self.sign_in(&self.config.admin, Role::Admin).await;
        report.record(stage, "Admin User Login", started, describe_login(&outcome));
        ctx.admin = outcome.ok();

        let started = Instant::now();
        let outcome = self.sign_in(&self.config.other, Role::User).await;
        report.record(stage, "Second User Login", started, describe_login(&outcome));
        ctx.other = outcome.ok();

        let started = Instant::now();
        let outcome = self.expect_rejected_login().await;
        report.record(stage, "Invalid Credentials Login", started, outcome);
    }

    async fn sign_in(&self, credentials: &Credentials, role: Role) -> Result<Session, CheckError> {
        let session = self
            .handshake
            .authenticate(
                self.connector.connect()?,
                &credentials.email,
                &credentials.password,
            )
            .await?;
        expect_role(session.user(), role)?;
        Ok(session)
    }

    async fn expect_rejected_login(&self) -> CheckResult {
        let outcome = self
            .handshake
            .authenticate(
                self.connector.connect()?,
                &self.config.regular.email,
                WRONG_PASSWORD,
            )
            .await;
        match outcome {
            Err(AuthError::InvalidCredentials) => {
                Ok("Correctly rejected invalid credentials".to_string())
            }
            Err(err) => Err(err.into()),
            Ok(_) => Err(CheckError::shape("Invalid credentials were accepted")),
        }
    }

    async fn upload(&self, ctx: &mut RunContext, report: &mut RunReport) {
        let stage = Stage::Upload;

        let started = Instant::now();
        let outcome = match require(&ctx.regular, NO_SESSION) {
            Ok(session) => upload_file(session).await,
            Err(err) => Err(err),
        };
        let outcome = outcome.map(|url| {
            ctx.uploaded_url = Some(url.clone());
            format!("File uploaded successfully: {url}")
        });
        report.record(stage, "File Upload (Authenticated)", started, outcome);

        let started = Instant::now();
        let outcome = self.expect_anonymous_upload_rejected().await;
        report.record(stage, "File Upload (Unauthenticated)", started, outcome);

        let started = Instant::now();
        let outcome = match require(&ctx.regular, NO_SESSION) {
            Ok(session) => expect_empty_upload_rejected(session).await,
            Err(err) => Err(err),
        };
        report.record(stage, "File Upload (No File)", started, outcome);
    }

    async fn expect_anonymous_upload_rejected(&self) -> CheckResult {
        let response = self
            .send_anonymous(ApiRequest::post(UPLOAD_PATH).with_files(vec![sample_image()?]))
            .await?;
        expect_status(&response, 401)?;
        Ok("Correctly rejected unauthenticated upload".to_string())
    }

    async fn create(&self, ctx: &mut RunContext, report: &mut RunReport) {
        let stage = Stage::Create;

        let started = Instant::now();
        let outcome = match require(&ctx.regular, NO_SESSION) {
            Ok(session) => {
                let fixture =
                    fixtures::lost_phone(ctx.uploaded_url.clone(), &self.config.regular.email);
                create_item(session, &fixture).await
            }
            Err(err) => Err(err),
        };
        // The item is kept for later stages even when this check fails
        let outcome = outcome.and_then(|item| {
            ctx.item_owner = item.owner_id.clone();
            ctx.item_id = Some(item.id.clone());
            if item.owner_id.is_none() {
                return Err(CheckError::shape("created item does not report its owner"));
            }
            let Some(url) = &ctx.uploaded_url else {
                return Err(CheckError::MissingPrerequisite(NO_UPLOAD));
            };
            if item.image.as_deref() != Some(url.as_str()) {
                return Err(CheckError::shape(format!(
                    "expected image '{url}', got {:?}",
                    item.image
                )));
            }
            Ok(format!("Item created successfully: {}", item.id))
        });
        report.record(stage, "Create Item (With Image)", started, outcome);

        let started = Instant::now();
        let outcome = match require(&ctx.regular, NO_SESSION) {
            Ok(session) => create_item(session, &fixtures::found_wallet()).await,
            Err(err) => Err(err),
        };
        let outcome = outcome.and_then(|item| match item.image {
            None => Ok("Item created successfully without image".to_string()),
            Some(image) => Err(CheckError::shape(format!(
                "expected null image, got '{image}'"
            ))),
        });
        report.record(stage, "Create Item (Without Image)", started, outcome);

        let started = Instant::now();
        let outcome = self.expect_anonymous_create_rejected().await;
        report.record(stage, "Create Item (Unauthenticated)", started, outcome);

        let started = Instant::now();
        let outcome = match require(&ctx.regular, NO_SESSION) {
            Ok(session) => expect_incomplete_item_rejected(session).await,
            Err(err) => Err(err),
        };
        report.record(stage, "Create Item (Missing Fields)", started, outcome);
    }

    async fn expect_anonymous_create_rejected(&self) -> CheckResult {
        let fixture = fixtures::lost_phone(None, &self.config.regular.email);
        let response = self
            .send_anonymous(ApiRequest::post(ITEMS_PATH).with_json(to_json(&fixture)?))
            .await?;
        expect_status(&response, 401)?;
        Ok("Correctly rejected unauthenticated creation".to_string())
    }

    async fn list(&self, report: &mut RunReport) {
        let stage = Stage::List;
        let filters = [
            ("Get All Items", ItemFilter::default()),
            (
                "Search Filter",
                ItemFilter {
                    search: Some("iPhone".to_string()),
                    ..Default::default()
                },
            ),
            (
                "Category Filter",
                ItemFilter {
                    category: Some("Electronics".to_string()),
                    ..Default::default()
                },
            ),
            (
                "Location Filter",
                ItemFilter {
                    location: Some("Central Park, NYC".to_string()),
                    ..Default::default()
                },
            ),
            (
                "Status Filter",
                ItemFilter {
                    status: Some(ItemStatus::Lost),
                    ..Default::default()
                },
            ),
            (
                "Verified Filter",
                ItemFilter {
                    verified: true,
                    ..Default::default()
                },
            ),
            (
                "Combined Filters",
                ItemFilter {
                    search: Some("iPhone".to_string()),
                    category: Some("Electronics".to_string()),
                    status: Some(ItemStatus::Lost),
                    ..Default::default()
                },
            ),
        ];

        for (name, filter) in filters {
            let started = Instant::now();
            let outcome = self.list_items(&filter).await;
            report.record(stage, name, started, outcome);
        }
    }

    async fn list_items(&self, filter: &ItemFilter) -> CheckResult {
        let response = self
            .send_anonymous(ApiRequest::get(ITEMS_PATH).with_query(filter.to_query()))
            .await?;
        expect_status(&response, 200)?;
        let envelope: ItemsEnvelope = parse(&response)?;

        let strays: Vec<&str> = envelope
            .items
            .iter()
            .filter(|item| !filter.matches(item))
            .map(|item| item.id.as_str())
            .collect();
        if !strays.is_empty() {
            return Err(CheckError::shape(format!(
                "{} of {} items do not match the filter: {}",
                strays.len(),
                envelope.items.len(),
                strays.join(", ")
            )));
        }
        Ok(format!("Retrieved {} items", envelope.items.len()))
    }

    async fn get(&self, ctx: &RunContext, report: &mut RunReport) {
        let stage = Stage::Get;

        let Some(item_id) = ctx.item_id.clone() else {
            report.record(
                stage,
                "Get Single Item (No Test Item)",
                Instant::now(),
                Err(CheckError::MissingPrerequisite(NO_ITEM)),
            );
            return;
        };

        let started = Instant::now();
        let outcome = self.fetch_item(&item_id).await.and_then(|item| {
            if item.id != item_id {
                return Err(CheckError::shape(format!(
                    "asked for {item_id}, got {}",
                    item.id
                )));
            }
            Ok(format!("Retrieved item: {}", item.title))
        });
        report.record(stage, "Get Single Item (Valid ID)", started, outcome);

        let started = Instant::now();
        let outcome = self.expect_missing(&unknown_id()).await;
        report.record(stage, "Get Single Item (Invalid ID)", started, outcome);
    }

    async fn fetch_item(&self, id: &str) -> Result<Item, CheckError> {
        let response = self.send_anonymous(ApiRequest::get(item_path(id))).await?;
        expect_status(&response, 200)?;
        let envelope: ItemEnvelope = parse(&response)?;
        Ok(envelope.item)
    }

    async fn expect_missing(&self, id: &str) -> CheckResult {
        let response = self.send_anonymous(ApiRequest::get(item_path(id))).await?;
        expect_status(&response, 404)?;
        Ok("Correctly returned 404 for non-existent item".to_string())
    }

    async fn update(&self, ctx: &RunContext, report: &mut RunReport) {
        let stage = Stage::Update;

        let Some(item_id) = ctx.item_id.clone() else {
            report.record(
                stage,
                "Update Item (No Test Item)",
                Instant::now(),
                Err(CheckError::MissingPrerequisite(NO_ITEM)),
            );
            return;
        };
        let owner = ctx.item_owner.clone();

        let started = Instant::now();
        let outcome = match require(&ctx.regular, NO_SESSION) {
            Ok(session) => update_item(session, &item_id, &fixtures::owner_update()).await,
            Err(err) => Err(err),
        };
        let outcome = outcome.and_then(|item| {
            expect_owner(&item, &owner)?;
            if !item.title.contains("UPDATED") {
                return Err(CheckError::shape(format!(
                    "update not reflected, title is '{}'",
                    item.title
                )));
            }
            Ok("Item updated successfully by owner".to_string())
        });
        report.record(stage, "Update Item (As Owner)", started, outcome);

        // Must run before the admin marks the item verified
        let started = Instant::now();
        let outcome = match require(&ctx.regular, NO_SESSION) {
            Ok(session) => self.expect_self_verify_refused(session, &item_id).await,
            Err(err) => Err(err),
        };
        report.record(stage, "Update Item (Owner Self-Verify)", started, outcome);

        let started = Instant::now();
        let outcome = match require(&ctx.admin, NO_ADMIN_SESSION) {
            Ok(session) => update_item(session, &item_id, &fixtures::admin_verification()).await,
            Err(err) => Err(err),
        };
        let outcome = outcome.and_then(|item| {
            expect_owner(&item, &owner)?;
            if !item.verified {
                return Err(CheckError::shape("admin update did not set verified"));
            }
            Ok("Item updated successfully by admin".to_string())
        });
        report.record(stage, "Update Item (As Admin)", started, outcome);

        let started = Instant::now();
        let outcome = match require(&ctx.other, NO_SESSION) {
            Ok(session) => {
                let hijack = ItemUpdate {
                    title: Some("Non-owner update".to_string()),
                    ..Default::default()
                };
                let response = send_update(session, &item_id, &hijack).await;
                response.and_then(|r| expect_forbidden(&r, "update"))
            }
            Err(err) => Err(err),
        };
        report.record(stage, "Update Item (Non-owner)", started, outcome);

        let started = Instant::now();
        let outcome = self.expect_anonymous_update_rejected(&item_id).await;
        report.record(stage, "Update Item (Unauthenticated)", started, outcome);

        let started = Instant::now();
        let outcome = match require(&ctx.regular, NO_SESSION) {
            Ok(session) => {
                let update = ItemUpdate {
                    title: Some("Update non-existent".to_string()),
                    ..Default::default()
                };
                send_update(session, &unknown_id(), &update)
                    .await
                    .and_then(|r| expect_status(&r, 404))
                    .map(|_| "Correctly returned 404 for non-existent item".to_string())
            }
            Err(err) => Err(err),
        };
        report.record(stage, "Update Item (Non-existent)", started, outcome);
    }

    /// Only an admin may set `verified`. The owner is either turned away
    /// or the flag is dropped, which a fresh read must confirm.
    async fn expect_self_verify_refused(&self, session: &Session, id: &str) -> CheckResult {
        let update = ItemUpdate {
            verified: Some(true),
            ..Default::default()
        };
        let response = send_update(session, id, &update).await?;
        match response.status {
            401 | 403 => return Ok("Correctly rejected owner verification".to_string()),
            200 => {}
            _ => return Err(unexpected("200, 401 or 403", &response)),
        }
        let item = self.fetch_item(id).await?;
        if item.verified {
            return Err(CheckError::shape("owner was able to mark the item verified"));
        }
        Ok("Owner update left the item unverified".to_string())
    }

    async fn expect_anonymous_update_rejected(&self, id: &str) -> CheckResult {
        let body = serde_json::json!({ "title": "Unauthorized update" });
        let response = self
            .send_anonymous(ApiRequest::put(item_path(id)).with_json(body))
            .await?;
        expect_status(&response, 401)?;
        Ok("Correctly rejected unauthenticated update".to_string())
    }

    async fn delete(&self, ctx: &RunContext, report: &mut RunReport) {
        let stage = Stage::Delete;

        let started = Instant::now();
        let created = match require(&ctx.regular, NO_SESSION) {
            Ok(session) => {
                let fixture = fixtures::disposable_item("Test Item for Deletion", ItemStatus::Lost);
                create_item(session, &fixture).await
            }
            Err(err) => Err(err),
        };
        let doomed = created.as_ref().ok().map(|item| item.id.clone());
        let outcome = created.map(|item| format!("Created test item: {}", item.id));
        report.record(stage, "Create Item for Deletion Test", started, outcome);

        let Some(doomed) = doomed else {
            report.record(
                stage,
                "Delete Item Tests",
                Instant::now(),
                Err(CheckError::MissingPrerequisite(
                    "No test item available for deletion tests",
                )),
            );
            return;
        };

        let started = Instant::now();
        let outcome = self.expect_anonymous_delete_rejected(&doomed).await;
        report.record(stage, "Delete Item (Unauthenticated)", started, outcome);

        let started = Instant::now();
        let outcome = match require(&ctx.other, NO_SESSION) {
            Ok(session) => session
                .send(ApiRequest::delete(item_path(&doomed)))
                .await
                .map_err(CheckError::from)
                .and_then(|r| expect_forbidden(&r, "deletion")),
            Err(err) => Err(err),
        };
        report.record(stage, "Delete Item (Non-owner)", started, outcome);

        let started = Instant::now();
        let outcome = match require(&ctx.regular, NO_SESSION) {
            Ok(session) => delete_item(session, &doomed).await,
            Err(err) => Err(err),
        };
        let deleted = report.record(stage, "Delete Item (As Owner)", started, outcome);

        if deleted {
            let started = Instant::now();
            let outcome = self
                .expect_missing(&doomed)
                .await
                .map(|_| "Item confirmed deleted".to_string());
            report.record(stage, "Delete Item Verification", started, outcome);
        }

        let started = Instant::now();
        let outcome = match require(&ctx.regular, NO_SESSION) {
            Ok(session) => session
                .send(ApiRequest::delete(item_path(&unknown_id())))
                .await
                .map_err(CheckError::from)
                .and_then(|r| expect_status(&r, 404))
                .map(|_| "Correctly returned 404 for non-existent item".to_string()),
            Err(err) => Err(err),
        };
        report.record(stage, "Delete Item (Non-existent)", started, outcome);

        let started = Instant::now();
        let outcome = match (
            require(&ctx.regular, NO_SESSION),
            require(&ctx.admin, NO_ADMIN_SESSION),
        ) {
            (Ok(owner), Ok(admin)) => admin_delete(owner, admin).await,
            (Err(err), _) | (_, Err(err)) => Err(err),
        };
        report.record(stage, "Delete Item (As Admin)", started, outcome);
    }

    async fn expect_anonymous_delete_rejected(&self, id: &str) -> CheckResult {
        let response = self.send_anonymous(ApiRequest::delete(item_path(id))).await?;
        expect_status(&response, 401)?;
        Ok("Correctly rejected unauthenticated deletion".to_string())
    }

    /// Send on a fresh identity with an empty cookie jar
    async fn send_anonymous(&self, request: ApiRequest) -> Result<ApiResponse, CheckError> {
        let transport = self.connector.connect()?;
        Ok(transport.send(request).await?)
    }
}

async fn upload_file(session: &Session) -> Result<String, CheckError> {
    let response = session
        .send(ApiRequest::post(UPLOAD_PATH).with_files(vec![sample_image()?]))
        .await?;
    expect_status(&response, 200)?;
    let uploaded: UploadedFile = parse(&response)?;
    if !uploaded.url.starts_with("/uploads/") {
        return Err(CheckError::shape(format!(
            "upload URL '{}' is not under /uploads/",
            uploaded.url
        )));
    }
    Ok(uploaded.url)
}

async fn expect_empty_upload_rejected(session: &Session) -> CheckResult {
    let response = session
        .send(ApiRequest::post(UPLOAD_PATH).with_files(Vec::new()))
        .await?;
    expect_status(&response, 400)?;
    Ok("Correctly rejected empty upload".to_string())
}

async fn create_item(session: &Session, item: &NewItem) -> Result<Item, CheckError> {
    let response = session
        .send(ApiRequest::post(ITEMS_PATH).with_json(to_json(item)?))
        .await?;
    expect_status(&response, 201)?;
    let envelope: ItemEnvelope = parse(&response)?;
    if envelope.item.id.trim().is_empty() {
        return Err(CheckError::shape("created item has an empty id"));
    }
    Ok(envelope.item)
}

async fn expect_incomplete_item_rejected(session: &Session) -> CheckResult {
    let response = session
        .send(ApiRequest::post(ITEMS_PATH).with_json(serde_json::json!({ "title": "Test Item" })))
        .await?;
    expect_status(&response, 400)?;
    Ok("Correctly rejected missing required fields".to_string())
}

async fn send_update(
    session: &Session,
    id: &str,
    update: &ItemUpdate,
) -> Result<ApiResponse, CheckError> {
    Ok(session
        .send(ApiRequest::put(item_path(id)).with_json(to_json(update)?))
        .await?)
}

async fn update_item(session: &Session, id: &str, update: &ItemUpdate) -> Result<Item, CheckError> {
    let response = send_update(session, id, update).await?;
    expect_status(&response, 200)?;
    let envelope: ItemEnvelope = parse(&response)?;
    Ok(envelope.item)
}

async fn delete_item(session: &Session, id: &str) -> CheckResult {
    let response = session.send(ApiRequest::delete(item_path(id))).await?;
    expect_status(&response, 200)?;
    let envelope: MessageEnvelope = parse(&response)?;
    if !envelope.message.contains("deleted successfully") {
        return Err(CheckError::shape(format!(
            "unexpected deletion message '{}'",
            envelope.message
        )));
    }
    Ok("Item deleted successfully by owner".to_string())
}

/// Item owned by `owner`, removed by `admin`
async fn admin_delete(owner: &Session, admin: &Session) -> CheckResult {
    let fixture = fixtures::disposable_item("Item for Admin Deletion", ItemStatus::Found);
    let item = create_item(owner, &fixture).await.map_err(|err| {
        CheckError::shape(format!("Failed to create item for admin deletion test: {err}"))
    })?;
    let response = admin.send(ApiRequest::delete(item_path(&item.id))).await?;
    expect_status(&response, 200)?;
    Ok("Item deleted successfully by admin".to_string())
}

fn require<'a>(
    session: &'a Option<Session>,
    missing: &'static str,
) -> Result<&'a Session, CheckError> {
    session
        .as_ref()
        .ok_or(CheckError::MissingPrerequisite(missing))
}

fn describe_login(outcome: &Result<Session, CheckError>) -> CheckResult {
    match outcome {
        Ok(session) => {
            let user = session.user();
            Ok(format!(
                "Login successful - User: {}, Role: {}",
                user.name.as_deref().unwrap_or("<unnamed>"),
                user.role_label()
            ))
        }
        Err(err) => Err(err.clone()),
    }
}

fn sample_image() -> Result<FilePart, CheckError> {
    fixtures::sample_image()
        .map_err(|_| CheckError::MissingPrerequisite("Upload fixture is not valid base64"))
}

fn expect_role(user: &SessionUser, role: Role) -> Result<(), CheckError> {
    if user.known_role() == Some(role) {
        return Ok(());
    }
    Err(CheckError::shape(format!(
        "expected role '{}', got '{}'",
        role,
        user.role_label()
    )))
}

fn expect_owner(item: &Item, owner: &Option<String>) -> Result<(), CheckError> {
    if item.owner_id.is_none() {
        return Err(CheckError::shape("updated item does not report its owner"));
    }
    if owner.is_some() && item.owner_id != *owner {
        return Err(CheckError::shape(format!(
            "owner changed from {:?} to {:?}",
            owner, item.owner_id
        )));
    }
    Ok(())
}

fn expect_status(response: &ApiResponse, expected: u16) -> Result<(), CheckError> {
    if response.status == expected {
        return Ok(());
    }
    Err(unexpected(&expected.to_string(), response))
}

/// A non-owner must be turned away with 401 or 403
fn expect_forbidden(response: &ApiResponse, action: &str) -> CheckResult {
    match response.status {
        401 | 403 => Ok(format!("Correctly rejected non-owner {action}")),
        _ => Err(unexpected("401 or 403", response)),
    }
}

fn unexpected(expected: &str, response: &ApiResponse) -> CheckError {
    CheckError::UnexpectedStatus {
        expected: expected.to_string(),
        actual: response.status,
        body: response.preview(200),
    }
}

fn parse<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, CheckError> {
    response.json().map_err(|err| {
        CheckError::shape(format!("{err}; body: {}", response.preview(200)))
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, CheckError> {
    serde_json::to_value(value).map_err(|err| CheckError::shape(err.to_string()))
}

fn item_path(id: &str) -> String {
    format!("{ITEMS_PATH}/{id}")
}

fn unknown_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
