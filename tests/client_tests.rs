use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use school_erp::config::ClientConfig;
use school_erp::models::{Bus, TripStatus};
use school_erp::services::{
    BusService, ResourceApi, StudentRegistrationService, TeacherService, TripService, VehicleService,
};
use school_erp::utils::jwt::{generate_token, JwtConfig};
use school_erp::{ApiClient, FailureKind, Session, SessionEvent};

fn logged_in_session(school_id: &str) -> (Session, String) {
    let jwt = JwtConfig {
        secret: "client-secret".to_string(),
        expiration: 3600,
    };
    let token = generate_token("admin", school_id, &jwt).unwrap();
    let session = Session::in_memory();
    session.login(&token, None).unwrap();
    (session, token)
}

fn client_for(server: &MockServer, session: Session) -> ApiClient {
    ApiClient::new(&ClientConfig::new(format!("{}/api", server.uri())), session).unwrap()
}

fn bus_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "registrationNumber": "KA-01-1234",
        "make": "Tata",
        "model": "Starbus",
        "capacity": 40,
        "fuelType": "Diesel",
        "status": "ACTIVE"
    })
}

#[tokio::test]
async fn test_list_sends_token_and_school() {
    let server = MockServer::start().await;
    let (session, token) = logged_in_session("school-7");

    Mock::given(method("GET"))
        .and(path("/api/transport/buses"))
        .and(query_param("schoolId", "school-7"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [bus_json("b1"), bus_json("b2")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = BusService::new(client_for(&server, session));
    let buses = service.get_all().await.unwrap();

    assert_eq!(buses.len(), 2);
    assert_eq!(buses[0].id, "b1");
}

#[tokio::test]
async fn test_unauthorized_expires_session() {
    let server = MockServer::start().await;
    let (session, _) = logged_in_session("school-7");
    let mut events = session.subscribe();

    Mock::given(method("GET"))
        .and(path("/api/transport/buses"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "error": "Invalid or expired token"
        })))
        .mount(&server)
        .await;

    let service = BusService::new(client_for(&server, session.clone()));
    let err = service.get_all().await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Unauthorized);
    assert!(!session.is_authenticated());
    assert_eq!(events.try_recv().unwrap(), SessionEvent::LoginRequired);
}

#[tokio::test]
async fn test_rejected_envelope_is_an_error() {
    let server = MockServer::start().await;
    let (session, _) = logged_in_session("school-7");

    Mock::given(method("POST"))
        .and(path("/api/transport/buses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Registration number already exists"
        })))
        .mount(&server)
        .await;

    let service = BusService::new(client_for(&server, session));
    let bus: Bus = serde_json::from_value(bus_json("")).unwrap();
    let err = service.create(&bus).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Rejected);
    assert_eq!(err.message, "Registration number already exists");
}

#[tokio::test]
async fn test_http_error_uses_body_message() {
    let server = MockServer::start().await;
    let (session, _) = logged_in_session("school-7");

    Mock::given(method("DELETE"))
        .and(path("/api/transport/buses/b9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "bus with id 'b9' not found"
        })))
        .mount(&server)
        .await;

    let service = BusService::new(client_for(&server, session));
    let err = service.delete("b9").await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Http(404));
    assert_eq!(err.message, "bus with id 'b9' not found");
}

#[tokio::test]
async fn test_get_by_id_maps_not_found_to_none() {
    let server = MockServer::start().await;
    let (session, _) = logged_in_session("school-7");

    Mock::given(method("GET"))
        .and(path("/api/transport/buses/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let service = BusService::new(client_for(&server, session));
    assert_eq!(service.get_by_id("missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_network_failure_is_reported() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = ApiClient::new(&ClientConfig::new(uri), Session::in_memory()).unwrap();
    let err = BusService::new(client).get_all().await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Network);
}

#[tokio::test]
async fn test_trip_status_is_sent_in_backend_casing() {
    let server = MockServer::start().await;
    let (session, _) = logged_in_session("school-7");

    Mock::given(method("PATCH"))
        .and(path("/api/transport/trips/t1/status"))
        .and(body_json(json!({ "status": "IN_PROGRESS" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "id": "t1",
                "busId": "b1",
                "routeId": "r1",
                "driverId": "d1",
                "date": "2024-03-01",
                "startTime": "07:30",
                "status": "IN_PROGRESS"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = TripService::new(client_for(&server, session));
    let trip = service
        .update_status("t1", TripStatus::InProgress)
        .await
        .unwrap();

    assert_eq!(trip.status, TripStatus::InProgress);
}

#[tokio::test]
async fn test_teacher_incharge_checked_before_create() {
    let server = MockServer::start().await;
    let (session, _) = logged_in_session("school-7");

    Mock::given(method("GET"))
        .and(path("/api/teachers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{
                "id": "t1",
                "fullName": "Anita Rao",
                "email": "anita@school.test",
                "phone": "9876543210",
                "isClassIncharge": true,
                "inchargeClass": "5",
                "inchargeSection": "A"
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/teachers"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let candidate = serde_json::from_value(json!({
        "fullName": "Vikram Shah",
        "email": "vikram@school.test",
        "phone": "9876543211",
        "isClassIncharge": true,
        "inchargeClass": "5",
        "inchargeSection": "A"
    }))
    .unwrap();

    let service = TeacherService::new(client_for(&server, session));
    let err = service.create_checked(&candidate).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Rejected);
    assert!(err.message.contains("Anita Rao"));
}

#[tokio::test]
async fn test_vehicle_service_renames_make() {
    let server = MockServer::start().await;
    let (session, _) = logged_in_session("school-7");

    Mock::given(method("GET"))
        .and(path("/api/transport/buses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [bus_json("b1")]
        })))
        .mount(&server)
        .await;

    let service = VehicleService::new(client_for(&server, session));
    let vehicles = service.get_all().await.unwrap();

    assert_eq!(vehicles[0].vehicle_name, "Tata");
}

#[tokio::test]
async fn test_student_search_is_url_encoded() {
    let server = MockServer::start().await;
    let (session, _) = logged_in_session("school-7");

    Mock::given(method("GET"))
        .and(path("/api/register/student"))
        .and(query_param("search", "riya menon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{
                "formNo": "F-1",
                "fullName": "Riya Menon",
                "registerForClass": "3",
                "regnDate": "2024-04-01"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = StudentRegistrationService::new(client_for(&server, session));
    let found = service.search("  riya menon ").await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].form_no, "F-1");
}
