use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str, name: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        }
    }
}

/// Authorization tier attached to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `user` object returned by registration and by session introspection.
///
/// `role` is kept as sent. Any user object at all means a session exists;
/// whether its role is the right one is for the caller to judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl SessionUser {
    /// `None` when the role is missing or not one we know
    pub fn known_role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }

    pub fn role_label(&self) -> &str {
        self.role.as_deref().unwrap_or("<none>")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Lost,
    Found,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Lost => "lost",
            ItemStatus::Found => "found",
        }
    }
}

/// A lost-or-found record as served by the items API.
///
/// Updates are merged into stored records as sent, so apart from `id`
/// every field may be missing, `null`, or carry a status we don't know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub verified: bool,
    #[serde(rename = "userId", alias = "ownerId", default)]
    pub owner_id: Option<String>,
}

/// Create payload for `POST /api/items`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: ItemStatus,
    pub location: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
}

/// Partial update for `PUT /api/items/{id}`; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

/// Query for `GET /api/items`.
///
/// `category`, `location` and `status` are exact matches, `search` is a
/// case-insensitive substring over title, description, location and
/// category. `verified` is only sent when set, mirroring the server, which
/// ignores anything but `verified=true`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub status: Option<ItemStatus>,
    pub verified: bool,
}

impl ItemFilter {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(search) = &self.search {
            query.push(("search".to_string(), search.clone()));
        }
        if let Some(category) = &self.category {
            query.push(("category".to_string(), category.clone()));
        }
        if let Some(location) = &self.location {
            query.push(("location".to_string(), location.clone()));
        }
        if let Some(status) = self.status {
            query.push(("status".to_string(), status.as_str().to_string()));
        }
        if self.verified {
            query.push(("verified".to_string(), "true".to_string()));
        }
        query
    }

    /// Whether `item` satisfies every clause of this filter
    pub fn matches(&self, item: &Item) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = [&item.title, &item.description, &item.location, &item.category]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if self.category.as_ref().is_some_and(|c| *c != item.category) {
            return false;
        }
        if self.location.as_ref().is_some_and(|l| *l != item.location) {
            return false;
        }
        if self
            .status
            .is_some_and(|s| item.status.as_deref() != Some(s.as_str()))
        {
            return false;
        }
        if self.verified && !item.verified {
            return false;
        }
        true
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub struct UserEnvelope {
    pub user: SessionUser,
}

#[derive(Debug, Deserialize)]
pub struct ItemEnvelope {
    pub item: Item,
}

#[derive(Debug, Deserialize)]
pub struct ItemsEnvelope {
    pub items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
pub struct MessageEnvelope {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfToken {
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadedFile {
    pub url: String,
}
