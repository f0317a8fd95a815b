use serde_json::json;
use waste_to_worth::error::Error;
use waste_to_worth::feed::{Coordinates, Kind};
use waste_to_worth::submit::{NewDonation, NewUrgentRequest};
use waste_to_worth::WasteToWorth;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn donation() -> NewDonation {
    NewDonation {
        donor_id: "donor-1".to_string(),
        donor_name: "Asha".to_string(),
        phone: "9876543210".to_string(),
        item_name: "Rice".to_string(),
        description: "5kg bag".to_string(),
        quantity: 5.0,
        kind: Kind::Food,
        coordinates: Coordinates::new(28.6, 77.2).unwrap(),
        image_url: None,
    }
}

#[tokio::test]
async fn donation_submission_creates_canonical_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/documents/donations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/p/databases/d/documents/donations/new-id"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = WasteToWorth::new(&mock_server.uri(), "test_key");
    let id = client
        .submissions()
        .submit_donation(&donation())
        .await
        .unwrap();
    assert_eq!(id, "new-id");

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["fields"]["itemName"]["stringValue"], "Rice");
    assert_eq!(body["fields"]["donorId"]["stringValue"], "donor-1");
    assert_eq!(body["fields"]["isReceived"]["booleanValue"], false);
    assert_eq!(body["fields"]["location"]["geoPointValue"]["latitude"], 28.6);
    // the store assigns the id; the body never carries a resource name
    assert!(body.get("name").is_none());
}

#[tokio::test]
async fn invalid_donation_never_reaches_the_store() {
    let mock_server = MockServer::start().await;

    let client = WasteToWorth::new(&mock_server.uri(), "test_key");

    let mut bad = donation();
    bad.phone = "1234567890".to_string();
    let result = client.submissions().submit_donation(&bad).await;
    assert!(matches!(result, Err(Error::Validation(_))));

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn urgent_request_written_once_to_its_own_collection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/documents/urgent_requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/p/databases/d/documents/urgent_requests/ur-1"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = WasteToWorth::new(&mock_server.uri(), "test_key");
    let request = NewUrgentRequest {
        requester_id: "req-1".to_string(),
        requester_name: "Ravi".to_string(),
        requester_phone: "8765432109".to_string(),
        item_name: "Bread".to_string(),
        description: None,
        quantity: "12".to_string(),
        delivery_address: "12 Main St".to_string(),
        coordinates: None,
    };

    let id = client
        .submissions()
        .submit_urgent_request(&request)
        .await
        .unwrap();
    assert_eq!(id, "ur-1");

    // exactly one write: no mirror copy lands in the donations collection
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["fields"]["status"]["stringValue"], "pending");
    assert_eq!(body["fields"]["requesterId"]["stringValue"], "req-1");
}
