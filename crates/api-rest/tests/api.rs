use api_rest::{build_router, AppState, CookieSettings};
use api_shared::TokenService;
use axum::body::Body;
use axum::http::{header, HeaderValue, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use techmed_core::seed::{self, MOCK_PASSWORD};
use techmed_core::{CredentialService, Database, KdfParams, PasswordPolicy};
use tower::ServiceExt;

const SECRET: &[u8] = b"integration-test-secret";

struct TestApp {
    router: Router,
    state: AppState,
}

async fn app(dev_mode: bool) -> TestApp {
    let db = Database::in_memory().await.expect("open");
    db.migrate().await.expect("migrate");
    let credentials = CredentialService::new(KdfParams::insecure_fast()).expect("kdf");
    seed::insert_mock_data(&db, &credentials, chrono::Local::now().date_naive())
        .await
        .expect("seed");

    let ttl = chrono::Duration::hours(2);
    let state = AppState::new(
        db,
        credentials,
        PasswordPolicy::default(),
        TokenService::new(SECRET, ttl).expect("tokens"),
        CookieSettings {
            secure: false,
            max_age: ttl,
        },
        dev_mode,
    );
    let router = build_router(
        state.clone(),
        vec![HeaderValue::from_static("http://localhost:3000")],
    );
    TestApp { router, state }
}

struct Reply {
    status: StatusCode,
    session: Option<String>,
    set_cookie: Option<String>,
    body: Value,
}

impl Reply {
    fn detail(&self) -> &str {
        self.body["detail"].as_str().unwrap_or_default()
    }
}

fn form_encode(pairs: &[(&str, &str)]) -> String {
    let encode = |s: &str| {
        s.bytes()
            .map(|b| {
                if b.is_ascii_alphanumeric() {
                    (b as char).to_string()
                } else {
                    format!("%{b:02X}")
                }
            })
            .collect::<String>()
    };
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> Reply {
        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let session = set_cookie.as_deref().and_then(|c| {
            c.split(';')
                .next()
                .and_then(|pair| pair.strip_prefix("access_token="))
                .map(str::to_owned)
        });
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Reply {
            status,
            session,
            set_cookie,
            body,
        }
    }

    async fn get(&self, uri: &str, session: Option<&str>) -> Reply {
        let mut builder = Request::get(uri);
        if let Some(token) = session {
            builder = builder.header(header::COOKIE, format!("access_token={token}"));
        }
        self.send(builder.body(Body::empty()).expect("request")).await
    }

    async fn post_form(&self, uri: &str, session: Option<&str>, pairs: &[(&str, &str)]) -> Reply {
        let mut builder = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(token) = session {
            builder = builder.header(header::COOKIE, format!("access_token={token}"));
        }
        self.send(builder.body(Body::from(form_encode(pairs))).expect("request"))
            .await
    }

    async fn post_json(&self, uri: &str, session: Option<&str>, body: &Value) -> Reply {
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = session {
            builder = builder.header(header::COOKIE, format!("access_token={token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).expect("request"))
            .await
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let reply = self
            .post_form(
                "/auth/login",
                None,
                &[("email", email), ("password", password)],
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{:?}", reply.body);
        reply.session.expect("session cookie")
    }
}

fn new_patient(email: &str) -> Value {
    json!({
        "email": email,
        "PESEL": "44051401359",
        "gender": "K",
        "phone_number": "+48 601602603",
        "first_name": "Halina",
        "last_name": "Mazur",
        "address": "ul. Lipowa 4, Kraków"
    })
}

#[tokio::test]
async fn health_needs_no_session() {
    let app = app(false).await;
    let reply = app.get("/health", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["ok"], true);
}

#[tokio::test]
async fn register_sets_session_cookie() {
    let app = app(false).await;
    let reply = app
        .post_form(
            "/auth/register",
            None,
            &[("email", "new@example.com"), ("password", "a-long-enough-secret")],
        )
        .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["message"], "Register successful");

    let cookie = reply.set_cookie.clone().expect("set-cookie");
    assert!(cookie.contains("HttpOnly"), "{cookie}");
    assert!(cookie.contains("SameSite=Lax"), "{cookie}");
    assert!(cookie.contains("Path=/"), "{cookie}");
    assert!(cookie.contains("Max-Age=7200"), "{cookie}");

    let me = app
        .get("/auth/get_my_info", reply.session.as_deref())
        .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body, json!({"email": "new@example.com", "type": "Unassigned"}));
}

#[tokio::test]
async fn registration_rules() {
    let app = app(false).await;
    async fn register(app: &TestApp, email: &str, password: &str) -> Reply {
        app.post_form(
            "/auth/register",
            None,
            &[("email", email), ("password", password)],
        )
        .await
    }

    let dup = register(&app, "admin@example.com", "a-long-enough-secret").await;
    assert_eq!(dup.status, StatusCode::BAD_REQUEST);
    assert_eq!(dup.detail(), "User already exists");

    let short = register(&app, "x@example.com", "short").await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        short.detail(),
        "The password must be at least 12 characters long."
    );

    let weak = register(&app, "x@example.com", "password1234").await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);
    assert_eq!(weak.detail(), "This password is considered too weak");

    let email = register(&app, "not-an-email", "a-long-enough-secret").await;
    assert_eq!(email.status, StatusCode::BAD_REQUEST);
    assert_eq!(email.detail(), "Email address must be valid");

    let missing = app
        .post_form("/auth/register", None, &[("email", "x@example.com")])
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = app(false).await;
    for (email, password) in [
        ("nobody@example.com", MOCK_PASSWORD),
        ("admin@example.com", "wrong-password"),
    ] {
        let reply = app
            .post_form(
                "/auth/login",
                None,
                &[("email", email), ("password", password)],
            )
            .await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert_eq!(reply.detail(), "Invalid username or password");
        assert!(reply.session.is_none());
    }
}

#[tokio::test]
async fn session_is_required_and_checked() {
    let app = app(false).await;
    let reply = app.get("/auth/verify_token", None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        reply.detail(),
        "Authentication credentials were not provided or are invalid."
    );

    let token = app.login("admin@example.com", MOCK_PASSWORD).await;
    let reply = app.get("/auth/verify_token", Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!({"email": "admin@example.com", "type": "Admin"}));

    let mut tampered = token.clone();
    tampered.push('A');
    assert_eq!(
        app.get("/auth/verify_token", Some(&tampered)).await.status,
        StatusCode::UNAUTHORIZED
    );

    let foreign = TokenService::new(b"other-secret", chrono::Duration::hours(2))
        .expect("tokens")
        .issue("admin@example.com", "Admin")
        .expect("issue")
        .0;
    assert_eq!(
        app.get("/auth/verify_token", Some(&foreign)).await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn extend_session_issues_a_later_token() {
    let app = app(false).await;
    let token = app.login("doctor@example.com", MOCK_PASSWORD).await;
    let before = app.state.tokens.verify(&token).expect("claims");

    let reply = app.get("/auth/extend_session", Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["message"], "Session extend successful");

    let after = app
        .state
        .tokens
        .verify(&reply.session.expect("new cookie"))
        .expect("claims");
    assert_eq!(after.sub, before.sub);
    assert_eq!(after.role, "Doctor");
    assert!(after.exp >= before.exp);
}

#[tokio::test]
async fn change_password_flow() {
    let app = app(false).await;
    let token = app.login("user1@example.com", MOCK_PASSWORD).await;
    async fn change(app: &TestApp, token: &str, current: &str, new: &str) -> Reply {
        app.post_form(
            "/auth/change_password",
            Some(token),
            &[("current_password", current), ("new_password", new)],
        )
        .await
    }

    let weak = change(&app, &token, MOCK_PASSWORD, "qwerty123456").await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);

    let wrong = change(&app, &token, "not-my-password", "a-brand-new-secret").await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.detail(), "Current password is incorrect");

    let ok = change(&app, &token, MOCK_PASSWORD, "a-brand-new-secret").await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["message"], "Password change successful");

    app.login("user1@example.com", "a-brand-new-secret").await;
    let old = app
        .post_form(
            "/auth/login",
            None,
            &[("email", "user1@example.com"), ("password", MOCK_PASSWORD)],
        )
        .await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn my_info_includes_role_profile() {
    let app = app(false).await;

    let patient = app.login("user0@example.com", MOCK_PASSWORD).await;
    let reply = app.get("/auth/get_my_info", Some(&patient)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["type"], "Patient");
    assert_eq!(reply.body["Patient"]["PESEL"], seed::mock_pesel(0));
    assert!(reply.body.get("Doctor").is_none());

    let doctor = app.login("doctor@example.com", MOCK_PASSWORD).await;
    let reply = app.get("/auth/get_my_info", Some(&doctor)).await;
    assert_eq!(reply.body["type"], "Doctor");
    assert_eq!(reply.body["Doctor"]["license_number"], "D1001");
    assert_eq!(reply.body["Doctor"]["speciality"]["id"], 2);
}

#[tokio::test]
async fn admin_endpoints_reject_other_roles() {
    let app = app(false).await;
    for email in [
        "unassigned@example.com",
        "doctor@example.com",
        "user2@example.com",
    ] {
        let token = app.login(email, MOCK_PASSWORD).await;
        for uri in [
            "/admin/users",
            "/admin/users/1",
            "/admin/patients/00000000000",
            "/admin/doctors/ZZZZZ",
        ] {
            let reply = app.get(uri, Some(&token)).await;
            assert_eq!(reply.status, StatusCode::UNAUTHORIZED, "{email} {uri}");
        }
        let reply = app
            .post_json("/admin/patients/add", Some(&token), &new_patient("h@example.com"))
            .await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED, "{email}");
    }

    let patient = app.login("user2@example.com", MOCK_PASSWORD).await;
    assert_eq!(
        app.get("/doctor/appointments", Some(&patient)).await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn admin_directory() {
    let app = app(false).await;
    let admin = app.login("admin@example.com", MOCK_PASSWORD).await;

    let users = app.get("/admin/users", Some(&admin)).await;
    assert_eq!(users.status, StatusCode::OK);
    let users = users.body.as_array().expect("array").clone();
    assert_eq!(users.len(), 13);
    assert!(users.iter().all(|u| u.get("hashed_password").is_none()));
    assert_eq!(users[0]["type"]["name"], "Patient");

    let user = app.get("/admin/users/11", Some(&admin)).await;
    assert_eq!(user.body["email"], "admin@example.com");
    let missing = app.get("/admin/users/999", Some(&admin)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.detail(), "User not found");
    let bad_id = app.get("/admin/users/abc", Some(&admin)).await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);

    let patients = app.get("/admin/patients", Some(&admin)).await;
    let patients = patients.body.as_array().expect("array").clone();
    assert_eq!(patients.len(), 100);
    assert!(patients[0].get("PESEL").is_none());

    let pesel = seed::mock_pesel(0);
    let patient = app.get(&format!("/admin/patients/{pesel}"), Some(&admin)).await;
    assert_eq!(patient.status, StatusCode::OK);
    assert_eq!(patient.body["first_name"], "Anna");
    let missing = app.get("/admin/patients/44051401359", Some(&admin)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.detail(), "Patient not found");

    let doctors = app.get("/admin/doctors", Some(&admin)).await;
    assert_eq!(doctors.body.as_array().expect("array").len(), 10);

    let doctor = app.get("/admin/doctors/D1001", Some(&admin)).await;
    assert_eq!(doctor.status, StatusCode::OK);
    assert_eq!(doctor.body["license_number"], "D1001");
    let facilities: Vec<&str> = doctor.body["facilities"]
        .as_array()
        .expect("facilities")
        .iter()
        .filter_map(|f| f["name"].as_str())
        .collect();
    assert_eq!(facilities, vec!["General Hospital", "City Labs"]);
    let missing = app.get("/admin/doctors/X0000", Some(&admin)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.detail(), "Doctor not found");
}

#[tokio::test]
async fn admin_creates_patient_with_working_login() {
    let app = app(false).await;
    let admin = app.login("admin@example.com", MOCK_PASSWORD).await;

    let created = app
        .post_json("/admin/patients/add", Some(&admin), &new_patient("halina@example.com"))
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
    assert_eq!(created.body["message"], "Patient created");
    let temp = created.body["patient_temp_password"]
        .as_str()
        .expect("temp password")
        .to_owned();
    assert_eq!(temp.len(), 16);

    let session = app.login("halina@example.com", &temp).await;
    let me = app.get("/auth/get_my_info", Some(&session)).await;
    assert_eq!(me.body["type"], "Patient");
    assert_eq!(me.body["Patient"]["last_name"], "Mazur");

    let dup = app
        .post_json("/admin/patients/add", Some(&admin), &new_patient("halina@example.com"))
        .await;
    assert_eq!(dup.status, StatusCode::BAD_REQUEST);
    assert_eq!(dup.detail(), "User already exists");

    let mut bad = new_patient("other@example.com");
    bad["PESEL"] = json!("44051401358");
    let reply = app.post_json("/admin/patients/add", Some(&admin), &bad).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.detail(), "Invalid PESEL: checksum does not match.");

    let incomplete = app
        .post_json("/admin/patients/add", Some(&admin), &json!({"email": "x@example.com"}))
        .await;
    assert_eq!(incomplete.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_creates_doctor() {
    let app = app(false).await;
    let admin = app.login("admin@example.com", MOCK_PASSWORD).await;
    let doctor = |license: &str, speciality_id: i64| {
        json!({
            "email": format!("{license}@example.com"),
            "PESEL": "62042621665",
            "gender": "F",
            "phone_number": "600700800",
            "first_name": "Zofia",
            "last_name": "Religa",
            "license_number": license,
            "hire_date": "2021-09-01",
            "speciality_id": speciality_id
        })
    };

    let unknown = app
        .post_json("/admin/doctors/add", Some(&admin), &doctor("ZR001", 42))
        .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown.detail(), "Speciality not found");

    let taken = app
        .post_json("/admin/doctors/add", Some(&admin), &doctor("D1001", 1))
        .await;
    assert_eq!(taken.status, StatusCode::BAD_REQUEST);
    assert_eq!(taken.detail(), "User already exists");

    let created = app
        .post_json("/admin/doctors/add", Some(&admin), &doctor("ZR001", 1))
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
    assert_eq!(created.body["message"], "Doctor created");

    let detail = app.get("/admin/doctors/ZR001", Some(&admin)).await;
    assert_eq!(detail.body["speciality"]["name"], "Cardiology");
    assert_eq!(detail.body["facilities"], json!([]));
}

#[tokio::test]
async fn doctor_appointments_filter() {
    let app = app(false).await;
    let doctor = app.login("doctor@example.com", MOCK_PASSWORD).await;

    let upcoming = app.get("/doctor/appointments", Some(&doctor)).await;
    assert_eq!(upcoming.status, StatusCode::OK);
    let upcoming = upcoming.body.as_array().expect("array").clone();
    assert_eq!(upcoming.len(), 2);
    assert!(upcoming.iter().all(|a| a["status"]["name"] == "Scheduled"));
    assert!(upcoming[0]["date"].as_str() < upcoming[1]["date"].as_str());
    assert!(upcoming[0]["patient"].get("PESEL").is_none());

    let start = (chrono::Local::now().date_naive() - chrono::Days::new(30)).to_string();
    let any = app
        .get(
            &format!("/doctor/appointments?start_date={start}&appointment_status=Any"),
            Some(&doctor),
        )
        .await;
    assert_eq!(any.body.as_array().expect("array").len(), 6);

    let completed = app
        .get(
            &format!("/doctor/appointments?start_date={start}&appointment_status=Completed"),
            Some(&doctor),
        )
        .await;
    let completed = completed.body.as_array().expect("array").clone();
    assert_eq!(completed.len(), 2);
    assert!(completed.iter().all(|a| a["status"]["id"] == 2));

    let unknown = app
        .get("/doctor/appointments?appointment_status=Postponed", Some(&doctor))
        .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown.detail(), "Unknown appointment status");

    let bad_date = app
        .get("/doctor/appointments?start_date=yesterday", Some(&doctor))
        .await;
    assert_eq!(bad_date.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reference_data_needs_a_session() {
    let app = app(false).await;
    assert_eq!(
        app.get("/misc/get_doctor_specialities", None).await.status,
        StatusCode::UNAUTHORIZED
    );

    let token = app.login("unassigned@example.com", MOCK_PASSWORD).await;
    let specialities = app.get("/misc/get_doctor_specialities", Some(&token)).await;
    assert_eq!(specialities.status, StatusCode::OK);
    assert_eq!(specialities.body[0]["code"], "CARD");
    assert_eq!(specialities.body.as_array().expect("array").len(), 3);

    let statuses = app.get("/misc/get_appointment_statuses", Some(&token)).await;
    assert_eq!(
        statuses.body,
        json!([
            {"id": 1, "name": "Scheduled"},
            {"id": 2, "name": "Completed"},
            {"id": 3, "name": "Cancelled"}
        ])
    );
}

#[tokio::test]
async fn reset_only_in_dev_mode() {
    let prod = app(false).await;
    let reply = prod.post_form("/misc/reset", None, &[]).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let dev = app(true).await;
    dev.post_form(
        "/auth/register",
        None,
        &[("email", "temp@example.com"), ("password", "a-long-enough-secret")],
    )
    .await;
    let reply = dev.post_form("/misc/reset", None, &[]).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["message"], "Database reset");

    dev.login("admin@example.com", MOCK_PASSWORD).await;
    let gone = dev
        .post_form(
            "/auth/login",
            None,
            &[("email", "temp@example.com"), ("password", "a-long-enough-secret")],
        )
        .await;
    assert_eq!(gone.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app(false).await;
    let reply = app.get("/api-docs/openapi.json", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body["paths"].get("/doctor/appointments").is_some());
}
