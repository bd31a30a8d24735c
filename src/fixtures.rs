//! Request payloads the suite sends

use crate::model::{ItemStatus, ItemUpdate, NewItem};
use crate::transport::FilePart;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// 1x1 transparent PNG
const SAMPLE_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub fn sample_image() -> Result<FilePart, base64::DecodeError> {
    Ok(FilePart {
        field: "file".to_string(),
        file_name: "test_image.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: STANDARD.decode(SAMPLE_PNG)?,
    })
}

pub fn lost_phone(image: Option<String>, contact: &str) -> NewItem {
    NewItem {
        title: "Lost iPhone 13".to_string(),
        description: "Black iPhone 13 lost near Central Park".to_string(),
        category: "Electronics".to_string(),
        status: ItemStatus::Lost,
        location: "Central Park, NYC".to_string(),
        date: "2024-01-15".to_string(),
        image,
        contact_info: Some(contact.to_string()),
    }
}

pub fn found_wallet() -> NewItem {
    NewItem {
        title: "Found Wallet".to_string(),
        description: "Brown leather wallet found on Main Street".to_string(),
        category: "Personal Items".to_string(),
        status: ItemStatus::Found,
        location: "Main Street".to_string(),
        date: "2024-01-16".to_string(),
        image: None,
        contact_info: None,
    }
}

pub fn disposable_item(title: &str, status: ItemStatus) -> NewItem {
    NewItem {
        title: title.to_string(),
        description: "This item will be deleted".to_string(),
        category: "Test".to_string(),
        status,
        location: "Test Location".to_string(),
        date: "2024-01-17".to_string(),
        image: None,
        contact_info: None,
    }
}

pub fn owner_update() -> ItemUpdate {
    ItemUpdate {
        title: Some("Lost iPhone 13 - UPDATED".to_string()),
        description: Some("Updated description".to_string()),
        verified: None,
    }
}

pub fn admin_verification() -> ItemUpdate {
    ItemUpdate {
        title: Some("Lost iPhone 13 - ADMIN VERIFIED".to_string()),
        description: None,
        verified: Some(true),
    }
}
