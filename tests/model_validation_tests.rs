use article_portal::models::{
    Article, ArticleRequest, RegisterUserRequest, UpdateUserRequest, User, UserPatch, UserProfile,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

fn stored_user() -> User {
    User {
        id: Uuid::new_v4(),
        fullname: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        profession: "Mathematician".to_string(),
        city: "London".to_string(),
        contact: "0612345678".to_string(),
        password_hash: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
        is_admin: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// --- Tests ---

#[test]
fn test_user_profile_never_serializes_credentials() {
    let profile = UserProfile::from(stored_user());

    let value = serde_json::to_value(&profile).unwrap();
    let text = value.to_string();

    assert!(value.get("password").is_none());
    assert!(value.get("passwordHash").is_none());
    assert!(!text.contains("$2b$"));
    assert_eq!(value["isAdmin"], false);
    assert!(value.get("createdAt").is_some());
}

#[test]
fn test_article_uses_type_key() {
    let article = Article {
        id: Uuid::new_v4(),
        title: "Title".to_string(),
        article_type: "news".to_string(),
        content: "Body".to_string(),
        author: "Site Admin".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let value = serde_json::to_value(&article).unwrap();

    assert_eq!(value["type"], "news");
    assert!(value.get("articleType").is_none());
}

#[test]
fn test_article_request_reads_type_and_drops_author() {
    let request: ArticleRequest = serde_json::from_value(json!({
        "title": "Title",
        "type": "event",
        "author": "Impostor"
    }))
    .unwrap();

    assert_eq!(request.article_type.as_deref(), Some("event"));
    assert!(request.content.is_none());
}

#[test]
fn test_update_request_ignores_protected_fields() {
    let request: UpdateUserRequest = serde_json::from_value(json!({
        "fullname": "Ada King",
        "email": "new@example.com",
        "password": "secret123",
        "isAdmin": true
    }))
    .unwrap();

    let patch = UserPatch::from(request);

    assert_eq!(patch.fullname.as_deref(), Some("Ada King"));
    assert!(patch.city.is_none());
    assert!(patch.contact.is_none());
}

#[test]
fn test_registration_accepts_missing_fields() {
    // Missing fields are reported by validation, not by deserialization.
    let request: RegisterUserRequest = serde_json::from_value(json!({ "email": "a@b.co" })).unwrap();

    assert_eq!(request.email.as_deref(), Some("a@b.co"));
    assert!(request.password.is_none());
}
