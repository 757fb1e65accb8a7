//! End-to-end flows through the real service, gate, and in-memory stores:
//! sign-up → login → session check → gated resource access.

use std::sync::Arc;

use chrono::{Duration, Utc};

use opencampus_auth::{
    AccessControl, Action, AuthError, AuthService, AuthSession, CredentialHasher,
    Hs256TokenIssuer, LessonAccess, ResourceDescriptor, Role, SignUpRequest, TokenVerifier,
};
use opencampus_core::{CourseId, LessonId};
use opencampus_infra::{InMemoryIdentityStore, InMemoryResourceStore};

const JWT_SECRET: &[u8] = b"integration-test-secret";

struct TestPlatform {
    service: AuthService<Arc<InMemoryIdentityStore>>,
    access: AccessControl<Arc<InMemoryResourceStore>>,
    resources: Arc<InMemoryResourceStore>,
    identities: Arc<InMemoryIdentityStore>,
}

impl TestPlatform {
    fn new() -> Self {
        let identities = Arc::new(InMemoryIdentityStore::new());
        let resources = Arc::new(InMemoryResourceStore::new());

        let issuer = Arc::new(Hs256TokenIssuer::new(JWT_SECRET, Duration::minutes(60)));
        let service = AuthService::new(
            identities.clone(),
            // Low cost keeps the suite fast; semantics are cost-independent.
            CredentialHasher::with_cost(64, 1, 1).unwrap(),
            Hs256TokenIssuer::new(JWT_SECRET, Duration::minutes(60)),
        );
        let access = AccessControl::new(issuer, resources.clone());

        Self {
            service,
            access,
            resources,
            identities,
        }
    }

    async fn sign_up(&self, name: &str, email: &str, role: Role) -> AuthSession {
        self.service
            .sign_up(SignUpRequest {
                display_name: name.to_string(),
                email: email.to_string(),
                password: "secret123".to_string(),
                confirm_password: "secret123".to_string(),
                requested_role: role,
            })
            .await
            .expect("sign-up failed")
    }
}

#[tokio::test]
async fn sign_up_login_whoami_round_trip() {
    let platform = TestPlatform::new();

    let signup = platform.sign_up("Alice", "alice@example.com", Role::Student).await;
    let token_a = signup.token.clone();

    let login = platform
        .service
        .login("alice@example.com", "secret123")
        .await
        .unwrap();
    let token_b = login.token.clone();

    // Two sessions, same identity, different signatures.
    assert_ne!(token_a, token_b);
    assert_eq!(signup.identity, login.identity);

    let me = platform.service.who_am_i(&token_b).await.unwrap();
    assert_eq!(me.email, "alice@example.com");
    assert_eq!(me.role, Role::Student);

    // The serialized profile must not carry any credential material.
    let json = serde_json::to_value(&me).unwrap();
    let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
    assert!(
        !keys.iter().any(|k| k.contains("password") || k.contains("secret")),
        "profile leaked credential fields: {keys:?}"
    );
}

#[tokio::test]
async fn concurrent_duplicate_sign_ups_admit_exactly_one() {
    let platform = Arc::new(TestPlatform::new());

    let mut handles = Vec::new();
    for n in 0..4 {
        let platform = platform.clone();
        handles.push(tokio::spawn(async move {
            platform
                .service
                .sign_up(SignUpRequest {
                    display_name: format!("Racer {n}"),
                    email: "race@example.com".to_string(),
                    password: "secret123".to_string(),
                    confirm_password: "secret123".to_string(),
                    requested_role: Role::Student,
                })
                .await
        }));
    }

    let mut ok = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => ok += 1,
            Err(AuthError::Conflict) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(conflicts, 3);
    assert_eq!(platform.identities.len(), 1);
}

#[tokio::test]
async fn instructor_owns_their_course_but_not_others() {
    let platform = TestPlatform::new();

    let olivia = platform.sign_up("Olivia", "olivia@example.com", Role::Instructor).await;
    let marcus = platform.sign_up("Marcus", "marcus@example.com", Role::Instructor).await;

    let course = CourseId::new();
    platform.resources.set_owner(course, olivia.identity.id);
    let descriptor = ResourceDescriptor::Course { id: course };

    // Owner passes role + ownership.
    let claims = platform
        .access
        .authorize(&olivia.token, Action::UpdateCourse, Some(&descriptor))
        .await
        .unwrap();
    assert_eq!(claims.sub, olivia.identity.id);

    // Same role, different identity: denied with an ownership message.
    let denied = platform
        .access
        .authorize(&marcus.token, Action::UpdateCourse, Some(&descriptor))
        .await
        .unwrap_err();
    assert!(matches!(denied, AuthError::Authorization(_)));
}

#[tokio::test]
async fn student_role_never_creates_courses() {
    let platform = TestPlatform::new();
    let student = platform.sign_up("Sam", "sam@example.com", Role::Student).await;

    // Ownership facts are irrelevant; the role check fails first.
    let course = CourseId::new();
    platform.resources.set_owner(course, student.identity.id);

    let result = platform
        .access
        .authorize(&student.token, Action::CreateCourse, None)
        .await;
    assert!(matches!(result, Err(AuthError::Authorization(_))));
}

#[tokio::test]
async fn playback_flips_from_hidden_to_allowed_on_enrollment() {
    let platform = TestPlatform::new();
    let student = platform.sign_up("Sam", "sam@example.com", Role::Student).await;

    let course = CourseId::new();
    let lesson = ResourceDescriptor::Lesson(LessonAccess {
        id: LessonId::new(),
        course_id: course,
        preview: false,
    });

    // Not enrolled: the lesson does not exist as far as Sam can tell.
    let before = platform
        .access
        .authorize(&student.token, Action::PlayLesson, Some(&lesson))
        .await;
    assert!(matches!(before, Err(AuthError::NotFound)));

    platform.resources.enroll(student.identity.id, course);

    platform
        .access
        .authorize(&student.token, Action::PlayLesson, Some(&lesson))
        .await
        .unwrap();
}

#[tokio::test]
async fn expired_token_is_rejected_at_the_gate() {
    let platform = TestPlatform::new();
    platform.sign_up("Sam", "sam@example.com", Role::Student).await;

    // Issue a token in the past, directly against the issuer.
    let issuer = Hs256TokenIssuer::new(JWT_SECRET, Duration::minutes(60));
    let me = platform
        .service
        .login("sam@example.com", "secret123")
        .await
        .unwrap();
    let stale = issuer
        .issue(&me.identity, Utc::now() - Duration::hours(2))
        .unwrap();

    // Sanity: the stale token is genuinely expired rather than malformed.
    assert!(issuer.verify(&stale, Utc::now() - Duration::hours(2)).is_ok());

    let result = platform
        .access
        .authorize(&stale, Action::Enroll, None)
        .await;
    assert!(matches!(result, Err(AuthError::Authentication)));
}

#[tokio::test]
async fn forged_token_is_rejected_at_the_gate() {
    let platform = TestPlatform::new();
    let student = platform.sign_up("Sam", "sam@example.com", Role::Student).await;

    let forged = Hs256TokenIssuer::new(b"attacker-secret", Duration::minutes(60))
        .issue(&student.identity, Utc::now())
        .unwrap();

    let result = platform.access.authorize(&forged, Action::Enroll, None).await;
    assert!(matches!(result, Err(AuthError::Authentication)));
}
