use warden::derivation::argon2;
use warden::derivation::password::PasswordHasher;

fn fast_hasher() -> PasswordHasher {
    PasswordHasher {
        memory_cost: 64,
        time_cost: 1,
        lanes: 2,
        threads: 2,
        hash_length: 32,
    }
}

#[test]
fn password_hash_strips_common_prefix() {
    let hasher = fast_hasher();
    assert_eq!(hasher.prefix(), "$argon2id$v=19$m=64,t=1,p=2$");

    let stored = hasher.hash(b"correct horse", 1).unwrap();
    assert!(!stored.starts_with('$'));
    assert_eq!(stored.matches('$').count(), 1, "salt$tag expected, got {stored}");
}

#[test]
fn password_verify_accepts_stored_and_full_forms() {
    let hasher = fast_hasher();
    let stored = hasher.hash(b"correct horse", "admins").unwrap();
    let full = format!("{}{stored}", hasher.prefix());

    assert!(hasher.verify(&stored, b"correct horse", "admins"));
    assert!(hasher.verify(&full, b"correct horse", "admins"));
    assert!(argon2::verify(&full, b"correct horseadmins"));
}

#[test]
fn password_verify_rejects_wrong_password_or_category() {
    let hasher = fast_hasher();
    let stored = hasher.hash(b"correct horse", 42).unwrap();

    assert!(hasher.verify(&stored, b"correct horse", 42));
    assert!(!hasher.verify(&stored, b"correct horse", 43));
    assert!(!hasher.verify(&stored, b"correct hors", 42));
    assert!(!hasher.verify("not a hash", b"correct horse", 42));
}

#[test]
fn password_hashes_use_fresh_salts() {
    let hasher = fast_hasher();
    let a = hasher.hash(b"same password", 1).unwrap();
    let b = hasher.hash(b"same password", 1).unwrap();

    assert_ne!(a, b);
    assert!(hasher.verify(&a, b"same password", 1));
    assert!(hasher.verify(&b, b"same password", 1));
}

#[test]
fn password_verify_uses_prefix_of_the_hasher() {
    let stored = fast_hasher().hash(b"pw", 1).unwrap();

    let stronger = PasswordHasher {
        time_cost: 2,
        ..fast_hasher()
    };
    assert!(!stronger.verify(&stored, b"pw", 1));
}
