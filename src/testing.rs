//! In-memory stand-in for the Lost & Found service
//!
//! Behaves like the real API closely enough to drive the whole suite,
//! and can be told to misbehave in specific ways through [`Quirks`].

use crate::error::TransportError;
use crate::model::{Item, ItemFilter, ItemStatus, Role};
use crate::transport::{ApiRequest, ApiResponse, Connector, Method, RequestBody, Transport};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const ADMIN_EMAIL: &str = "admin@lostandfound.com";

/// Deliberate deviations from correct server behavior
#[derive(Debug, Clone, Default)]
pub struct Quirks {
    pub ignore_category_filter: bool,
    pub anyone_can_edit: bool,
    pub keep_deleted_items: bool,
    /// Owners may set `verified` on their own items
    pub owner_can_verify: bool,
    /// Create responses leave out `userId`
    pub omit_owner_on_create: bool,
    /// Duplicate registration answers 500 "User already exists" instead of 409
    pub duplicate_as_500: bool,
    /// Requests to these paths fail below HTTP
    pub unreachable_paths: Vec<&'static str>,
}

#[derive(Debug, Clone)]
struct FakeUser {
    id: String,
    email: String,
    password: String,
    name: String,
    role: Role,
}

impl FakeUser {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "email": self.email,
            "name": self.name,
            "role": self.role.as_str(),
        })
    }
}

#[derive(Debug, Default)]
struct FakeState {
    users: HashMap<String, FakeUser>,
    sessions: HashMap<String, String>,
    items: Vec<Item>,
    next_id: u64,
}

impl FakeState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeServer {
    state: Arc<Mutex<FakeState>>,
    quirks: Quirks,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quirks(quirks: Quirks) -> Self {
        Self {
            quirks,
            ..Self::default()
        }
    }

    pub fn item_count(&self) -> usize {
        self.state.lock().unwrap().items.len()
    }

    /// Store `item` as if some other client had created or edited it
    pub fn insert_item(&self, item: Item) {
        self.state.lock().unwrap().items.push(item);
    }

    pub fn transport(&self) -> FakeTransport {
        FakeTransport {
            server: self.clone(),
            jar: Mutex::new(Jar::default()),
        }
    }

    fn handle(&self, jar: &mut Jar, request: ApiRequest) -> ApiResponse {
        let mut state = self.state.lock().unwrap();
        let viewer = jar
            .session
            .as_ref()
            .and_then(|token| state.sessions.get(token))
            .and_then(|email| state.users.get(email))
            .cloned();

        let path = request.path.clone();
        match (request.method, path.as_str()) {
            (Method::Post, "/api/auth/register") => self.register(&mut state, &request),
            (Method::Get, "/api/auth/csrf") => {
                let token = state.next_id("csrf");
                jar.csrf = Some(token.clone());
                ApiResponse::new(200, json!({ "csrfToken": token }).to_string())
                    .with_cookies(&["next-auth.csrf-token"])
            }
            (Method::Get, "/api/auth/providers") => ApiResponse::new(
                200,
                json!({ "credentials": { "id": "credentials", "type": "credentials" } })
                    .to_string(),
            ),
            (Method::Post, "/api/auth/callback/credentials") => {
                sign_in(&mut state, jar, &request)
            }
            (Method::Get, "/api/auth/session") => match viewer {
                Some(user) => ApiResponse::new(200, json!({ "user": user.to_json() }).to_string()),
                None => ApiResponse::new(200, "{}"),
            },
            (Method::Post, "/api/upload") => upload(viewer.as_ref(), &request),
            (Method::Post, "/api/items") => {
                create_item(&mut state, viewer.as_ref(), &request, &self.quirks)
            }
            (Method::Get, "/api/items") => list_items(&state, &request, &self.quirks),
            (method, p) if p.starts_with("/api/items/") => {
                let id = p.trim_start_matches("/api/items/");
                self.item(&mut state, viewer.as_ref(), method, id, &request)
            }
            _ => error(404, "Not found"),
        }
    }

    fn register(&self, state: &mut FakeState, request: &ApiRequest) -> ApiResponse {
        let body = json_body(request);
        let field = |name: &str| body[name].as_str().unwrap_or_default().to_string();
        let (email, password, name) = (field("email"), field("password"), field("name"));

        if email.is_empty() || password.is_empty() || name.is_empty() {
            return error(400, "Missing required fields");
        }
        if password.len() < 6 {
            return error(400, "Password must be at least 6 characters");
        }
        if state.users.contains_key(&email) {
            let status = if self.quirks.duplicate_as_500 { 500 } else { 409 };
            return error(status, "User already exists");
        }

        let user = FakeUser {
            id: state.next_id("user"),
            role: if email == ADMIN_EMAIL { Role::Admin } else { Role::User },
            email: email.clone(),
            password,
            name,
        };
        let response = ApiResponse::new(201, json!({ "user": user.to_json() }).to_string());
        state.users.insert(email, user);
        response
    }

    fn item(
        &self,
        state: &mut FakeState,
        viewer: Option<&FakeUser>,
        method: Method,
        id: &str,
        request: &ApiRequest,
    ) -> ApiResponse {
        if method == Method::Get {
            return match state.items.iter().find(|i| i.id == id) {
                Some(item) => ApiResponse::new(200, json!({ "item": item }).to_string()),
                None => error(404, "Item not found"),
            };
        }

        let Some(viewer) = viewer else {
            return error(401, "Unauthorized");
        };
        let Some(index) = state.items.iter().position(|i| i.id == id) else {
            return error(404, "Item not found");
        };
        let owns = state.items[index].owner_id.as_deref() == Some(viewer.id.as_str());
        if viewer.role != Role::Admin && !owns && !self.quirks.anyone_can_edit {
            return error(403, "Forbidden");
        }

        match method {
            Method::Put => {
                let body = json_body(request);
                let item = &mut state.items[index];
                if let Some(title) = body["title"].as_str() {
                    item.title = title.to_string();
                }
                if let Some(description) = body["description"].as_str() {
                    item.description = description.to_string();
                }
                let may_verify = viewer.role == Role::Admin || self.quirks.owner_can_verify;
                if let Some(verified) = body["verified"].as_bool().filter(|_| may_verify) {
                    item.verified = verified;
                }
                ApiResponse::new(
                    200,
                    json!({ "message": "Item updated successfully", "item": item }).to_string(),
                )
            }
            Method::Delete => {
                if !self.quirks.keep_deleted_items {
                    state.items.remove(index);
                }
                ApiResponse::new(200, json!({ "message": "Item deleted successfully" }).to_string())
            }
            _ => error(405, "Method not allowed"),
        }
    }
}

impl Connector for FakeServer {
    fn connect(&self) -> Result<Box<dyn Transport>, TransportError> {
        Ok(Box::new(self.transport()))
    }
}

#[derive(Debug, Default)]
struct Jar {
    csrf: Option<String>,
    session: Option<String>,
}

/// One cookie jar talking to a [`FakeServer`]
pub struct FakeTransport {
    server: FakeServer,
    jar: Mutex<Jar>,
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        if self.server.quirks.unreachable_paths.iter().any(|p| *p == request.path) {
            return Err(TransportError::new(format!(
                "connection refused: {}",
                request.path
            )));
        }
        let mut jar = self.jar.lock().unwrap();
        Ok(self.server.handle(&mut jar, request))
    }
}

fn sign_in(state: &mut FakeState, jar: &mut Jar, request: &ApiRequest) -> ApiResponse {
    let RequestBody::Form(fields) = &request.body else {
        return error(400, "Expected form body");
    };
    let field = |name: &str| {
        fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    };

    let csrf_ok = jar.csrf.as_deref().is_some_and(|t| !t.is_empty() && t == field("csrfToken"));
    let user_ok = state
        .users
        .get(field("email"))
        .is_some_and(|u| u.password == field("password"));

    if !csrf_ok || !user_ok {
        return ApiResponse::new(
            401,
            json!({ "url": "/api/auth/error?error=CredentialsSignin" }).to_string(),
        );
    }

    let token = state.next_id("session");
    state.sessions.insert(token.clone(), field("email").to_string());
    jar.session = Some(token);
    ApiResponse::new(200, json!({ "url": field("callbackUrl") }).to_string())
        .with_cookies(&["next-auth.session-token"])
}

fn upload(viewer: Option<&FakeUser>, request: &ApiRequest) -> ApiResponse {
    if viewer.is_none() {
        return error(401, "Unauthorized");
    }
    match &request.body {
        RequestBody::Multipart(parts) if !parts.is_empty() => {
            let url = format!("/uploads/{}-{}", uuid::Uuid::new_v4(), parts[0].file_name);
            ApiResponse::new(200, json!({ "url": url }).to_string())
        }
        _ => error(400, "No file uploaded"),
    }
}

fn create_item(
    state: &mut FakeState,
    viewer: Option<&FakeUser>,
    request: &ApiRequest,
    quirks: &Quirks,
) -> ApiResponse {
    let Some(viewer) = viewer else {
        return error(401, "Unauthorized");
    };
    let body = json_body(request);
    let text = |name: &str| body[name].as_str().map(str::to_string);

    let required = ["title", "description", "category", "status", "location", "date"];
    if required.iter().any(|f| text(*f).unwrap_or_default().is_empty()) {
        return error(400, "Missing required fields");
    }
    let status = match body["status"].as_str() {
        Some("found") => ItemStatus::Found,
        _ => ItemStatus::Lost,
    };

    let item = Item {
        id: state.next_id("item"),
        title: text("title").unwrap_or_default(),
        description: text("description").unwrap_or_default(),
        category: text("category").unwrap_or_default(),
        status: Some(status.as_str().to_string()),
        location: text("location").unwrap_or_default(),
        date: text("date").unwrap_or_default(),
        image: text("image").filter(|i| !i.is_empty()),
        contact_info: text("contactInfo").or_else(|| Some(viewer.email.clone())),
        verified: false,
        owner_id: Some(viewer.id.clone()),
    };
    let mut body = json!({ "message": "Item created successfully", "item": item });
    if quirks.omit_owner_on_create {
        if let Some(fields) = body["item"].as_object_mut() {
            fields.remove("userId");
        }
    }
    let response = ApiResponse::new(201, body.to_string());
    state.items.push(item);
    response
}

fn list_items(state: &FakeState, request: &ApiRequest, quirks: &Quirks) -> ApiResponse {
    let param = |name: &str| {
        request
            .query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
            .filter(|v| v != "all")
    };
    let filter = ItemFilter {
        search: param("search"),
        category: param("category").filter(|_| !quirks.ignore_category_filter),
        location: param("location"),
        status: match param("status").as_deref() {
            Some("lost") => Some(ItemStatus::Lost),
            Some("found") => Some(ItemStatus::Found),
            _ => None,
        },
        verified: param("verified").as_deref() == Some("true"),
    };

    let items: Vec<&Item> = state.items.iter().rev().filter(|i| filter.matches(i)).collect();
    ApiResponse::new(200, json!({ "items": items }).to_string())
}

fn json_body(request: &ApiRequest) -> Value {
    match &request.body {
        RequestBody::Json(value) => value.clone(),
        _ => Value::Null,
    }
}

fn error(status: u16, message: &str) -> ApiResponse {
    ApiResponse::new(status, json!({ "error": message }).to_string())
}
