#![allow(clippy::unwrap_used)]

use super::*;

fn memory_context() -> AuthContext {
    AuthContext::new(Box::new(MemoryStorage::default()))
}

fn context_with_token(token: &str) -> AuthContext {
    let mut storage = MemoryStorage::default();
    storage.set(TOKEN_KEY, token).unwrap();
    AuthContext::new(Box::new(storage))
}

// ── Login ─────────────────────────────────────────────────────

#[test]
fn test_starts_loading() {
    let ctx = memory_context();
    assert!(ctx.is_loading());
    assert!(ctx.user().is_none());
}

#[test]
fn test_login_success_stores_parseable_token() {
    let mut ctx = memory_context();
    ctx.init();
    let result = ctx.login("admin@liberdadepro.com", "admin123");

    assert!(result.success);
    assert!(result.error.is_none());
    assert_eq!(result.user.as_ref().unwrap().role, "admin");
    assert!(ctx.is_authenticated());

    let token = ctx.storage().get(TOKEN_KEY).unwrap();
    let stored: User = serde_json::from_str(&token).unwrap();
    assert_eq!(stored.email, "admin@liberdadepro.com");
    assert_eq!(stored.name, "Administrador");
}

#[test]
fn test_login_rejects_everything_else() {
    let attempts = [
        ("admin@liberdadepro.com", "wrong"),
        ("admin@liberdadepro.com", ""),
        ("ADMIN@liberdadepro.com", "admin123"),
        ("someone@else.com", "admin123"),
        ("", ""),
        (" admin@liberdadepro.com", "admin123"),
    ];
    for (email, password) in attempts {
        let mut ctx = memory_context();
        ctx.init();
        let result = ctx.login(email, password);
        assert!(!result.success, "accepted {email:?}/{password:?}");
        assert!(result.user.is_none());
        assert_eq!(result.error.as_deref(), Some("Invalid credentials"));
        assert!(!ctx.is_authenticated());
        assert!(ctx.storage().get(TOKEN_KEY).is_none());
    }
}

#[test]
fn test_failed_login_keeps_existing_session() {
    let mut ctx = memory_context();
    ctx.init();
    ctx.login("admin@liberdadepro.com", "admin123");
    let result = ctx.login("admin@liberdadepro.com", "nope");
    assert!(!result.success);
    assert!(ctx.is_authenticated());
}

// ── Logout ────────────────────────────────────────────────────

#[test]
fn test_logout_clears_state_and_storage() {
    let mut ctx = memory_context();
    ctx.init();
    ctx.login("admin@liberdadepro.com", "admin123");
    ctx.logout();
    assert_eq!(ctx.state(), &AuthState::Unauthenticated);
    assert!(ctx.storage().get(TOKEN_KEY).is_none());
}

// ── Init ──────────────────────────────────────────────────────

#[test]
fn test_init_without_token() {
    let mut ctx = memory_context();
    ctx.init();
    assert_eq!(ctx.state(), &AuthState::Unauthenticated);
}

#[test]
fn test_init_restores_valid_token() {
    let token = serde_json::to_string(&User::admin()).unwrap();
    let mut ctx = context_with_token(&token);
    ctx.init();
    assert!(ctx.is_authenticated());
    assert_eq!(ctx.user().unwrap().id, "1");
}

#[test]
fn test_init_trusts_any_well_formed_record() {
    let token = r#"{"id":"9","name":"Forged","email":"x@y.z","role":"admin"}"#;
    let mut ctx = context_with_token(token);
    ctx.init();
    assert_eq!(ctx.user().unwrap().name, "Forged");
}

#[test]
fn test_init_corrupted_token_is_cleared() {
    crate::logging::init_test_logging();
    let mut ctx = context_with_token("not json at all");
    ctx.init();
    assert_eq!(ctx.state(), &AuthState::Unauthenticated);
    assert!(ctx.storage().get(TOKEN_KEY).is_none());
}

#[test]
fn test_init_wrong_shape_is_cleared() {
    let mut ctx = context_with_token(r#"{"id":1}"#);
    ctx.init();
    assert!(!ctx.is_authenticated());
    assert!(ctx.storage().get(TOKEN_KEY).is_none());
}

// ── File storage ──────────────────────────────────────────────

#[test]
fn test_file_storage_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStorage::new(dir.path().join("session"));
    assert!(storage.get(TOKEN_KEY).is_none());

    storage.set(TOKEN_KEY, "value").unwrap();
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("value"));

    storage.remove(TOKEN_KEY).unwrap();
    assert!(storage.get(TOKEN_KEY).is_none());
    // removing twice is fine
    storage.remove(TOKEN_KEY).unwrap();
}

#[test]
fn test_session_survives_new_context_on_same_dir() {
    let dir = tempfile::tempdir().unwrap();

    let mut first = AuthContext::new(Box::new(FileStorage::new(dir.path())));
    first.init();
    assert!(first.login("admin@liberdadepro.com", "admin123").success);

    let mut second = AuthContext::new(Box::new(FileStorage::new(dir.path())));
    second.init();
    assert!(second.is_authenticated());

    second.logout();
    let mut third = AuthContext::new(Box::new(FileStorage::new(dir.path())));
    third.init();
    assert!(!third.is_authenticated());
}
