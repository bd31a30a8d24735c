#[cfg(test)]
mod model_tests {
    use crate::model::*;
    use serde_json::json;

    fn item(category: &str, status: ItemStatus, location: &str, verified: bool) -> Item {
        Item {
            id: "item-1".to_string(),
            title: "Lost iPhone 13".to_string(),
            description: "Black iPhone 13 lost near Central Park".to_string(),
            category: category.to_string(),
            status: Some(status.as_str().to_string()),
            location: location.to_string(),
            date: "2024-01-15".to_string(),
            image: None,
            contact_info: None,
            verified,
            owner_id: Some("user-1".to_string()),
        }
    }

    #[test]
    fn test_item_from_server_json() {
        let raw = json!({
            "id": "4f1c",
            "title": "Found Wallet",
            "description": "Brown leather wallet",
            "category": "Personal Items",
            "status": "found",
            "location": "Main Street",
            "date": "2024-01-16",
            "image": null,
            "contactInfo": "john.doe@example.com",
            "userId": "u-42",
            "userName": "John Doe",
            "verified": false,
            "createdAt": "2024-01-16T10:00:00.000Z"
        });

        let item: Item = serde_json::from_value(raw).unwrap();
        assert_eq!(item.id, "4f1c");
        assert_eq!(item.status.as_deref(), Some("found"));
        assert_eq!(item.image, None);
        assert_eq!(item.contact_info.as_deref(), Some("john.doe@example.com"));
        assert_eq!(item.owner_id.as_deref(), Some("u-42"));
        assert!(!item.verified);
    }

    #[test]
    fn test_owner_id_alias() {
        let raw = json!({
            "id": "x",
            "title": "t",
            "status": "lost",
            "ownerId": "u-7"
        });
        let item: Item = serde_json::from_value(raw).unwrap();
        assert_eq!(item.owner_id.as_deref(), Some("u-7"));
        assert_eq!(item.description, "");

        let out = serde_json::to_value(&item).unwrap();
        assert_eq!(out["userId"], "u-7");
    }

    #[test]
    fn test_edited_item_with_odd_fields_still_parses() {
        let raw = json!({
            "id": "x",
            "title": "t",
            "status": "claimed",
            "category": null,
            "location": null,
            "verified": null
        });
        let item: Item = serde_json::from_value(raw).unwrap();
        assert_eq!(item.status.as_deref(), Some("claimed"));
        assert_eq!(item.category, "");
        assert!(!item.verified);

        // Present in the list, but never a match for a status filter
        assert!(ItemFilter::default().matches(&item));
        let lost = ItemFilter {
            status: Some(ItemStatus::Lost),
            ..Default::default()
        };
        assert!(!lost.matches(&item));
    }

    #[test]
    fn test_item_without_id_is_rejected() {
        let raw = json!({ "title": "t", "status": "lost" });
        assert!(serde_json::from_value::<Item>(raw).is_err());
    }

    #[test]
    fn test_session_user_role() {
        let user: SessionUser =
            serde_json::from_value(json!({ "name": "Admin User", "role": "admin" })).unwrap();
        assert_eq!(user.known_role(), Some(Role::Admin));
        assert_eq!(user.id, None);
        assert_eq!(Role::User.to_string(), "user");

        let roleless: SessionUser = serde_json::from_value(json!({ "name": "John Doe" })).unwrap();
        assert_eq!(roleless.known_role(), None);
        assert_eq!(roleless.role_label(), "<none>");

        let unknown: SessionUser =
            serde_json::from_value(json!({ "role": "moderator" })).unwrap();
        assert_eq!(unknown.known_role(), None);
        assert_eq!(unknown.role_label(), "moderator");
    }

    #[test]
    fn test_filter_query_string() {
        let filter = ItemFilter {
            search: Some("iPhone".to_string()),
            category: Some("Electronics".to_string()),
            status: Some(ItemStatus::Lost),
            ..Default::default()
        };
        assert_eq!(
            filter.to_query(),
            vec![
                ("search".to_string(), "iPhone".to_string()),
                ("category".to_string(), "Electronics".to_string()),
                ("status".to_string(), "lost".to_string()),
            ]
        );

        assert!(ItemFilter::default().to_query().is_empty());
        let verified = ItemFilter {
            verified: true,
            ..Default::default()
        };
        assert_eq!(
            verified.to_query(),
            vec![("verified".to_string(), "true".to_string())]
        );
    }

    #[test]
    fn test_category_filter_has_no_false_positives() {
        let filter = ItemFilter {
            category: Some("Electronics".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&item("Electronics", ItemStatus::Lost, "Park", false)));
        assert!(!filter.matches(&item("Personal Items", ItemStatus::Lost, "Park", false)));
        // Exact match, not prefix or case-folded
        assert!(!filter.matches(&item("electronics", ItemStatus::Lost, "Park", false)));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let filter = ItemFilter {
            search: Some("IPHONE".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&item("Electronics", ItemStatus::Lost, "Park", false)));

        let by_location = ItemFilter {
            search: Some("central".to_string()),
            ..Default::default()
        };
        let mut wallet = item("Personal Items", ItemStatus::Found, "Main Street", false);
        wallet.title = "Found Wallet".to_string();
        wallet.description = "Brown leather wallet".to_string();
        assert!(!by_location.matches(&wallet));
        wallet.location = "Central Station".to_string();
        assert!(by_location.matches(&wallet));
    }

    #[test]
    fn test_combined_filter_requires_every_clause() {
        let filter = ItemFilter {
            search: Some("iPhone".to_string()),
            category: Some("Electronics".to_string()),
            location: Some("Central Park, NYC".to_string()),
            status: Some(ItemStatus::Lost),
            verified: true,
        };
        assert!(filter.matches(&item("Electronics", ItemStatus::Lost, "Central Park, NYC", true)));
        assert!(!filter.matches(&item("Electronics", ItemStatus::Lost, "Central Park, NYC", false)));
        assert!(!filter.matches(&item("Electronics", ItemStatus::Found, "Central Park, NYC", true)));
        assert!(!filter.matches(&item("Electronics", ItemStatus::Lost, "Central Park", true)));
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let update = ItemUpdate {
            verified: Some(true),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "verified": true }));
    }
}
