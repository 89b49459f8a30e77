use actix_web::{test, web, App};
use auction_bids::coordinator::BidCoordinator;
use auction_bids::domain::AuctionableConfig;
use auction_bids::persistence::InMemoryBidRepository;
use auction_bids::web::app::configure_app;
use auction_bids::web::types::{AddAuctionableRequest, BidRequest};
use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Value};
use std::sync::Arc;
#[path = "utils/mod.rs"]
mod utils;
use utils::*;

fn auth_header(bidder: &str) -> (&'static str, String) {
    let payload = json!({ "sub": bidder, "name": bidder, "u_typ": "0" }).to_string();
    ("x-jwt-payload", general_purpose::STANDARD.encode(payload))
}

macro_rules! test_app {
    ($coordinator:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($coordinator))
                .configure(configure_app),
        )
        .await
    };
}

#[::core::prelude::v1::test]
fn test_add_auctionable_request_deserialization() {
    let request: AddAuctionableRequest = serde_json::from_value(json!({
        "id": "painting",
        "title": "Painting"
    }))
    .unwrap();

    let auctionable = request.to_auctionable().unwrap();
    assert_eq!(auctionable.item_id, sample_item_id());
    assert_eq!(auctionable.config, AuctionableConfig::default());

    let request: AddAuctionableRequest = serde_json::from_value(json!({
        "id": "painting",
        "title": "Painting",
        "incrementFactor": -2
    }))
    .unwrap();
    assert!(request.to_auctionable().is_err());
}

#[::core::prelude::v1::test]
fn test_bid_request_deserialization() {
    let request: BidRequest = serde_json::from_value(json!({ "amount": 10 })).unwrap();
    assert_eq!(request.amount, 10);
}

#[actix_web::test]
async fn test_place_bids_over_http() {
    let coordinator = coordinator_with_item(AuctionableConfig::default()).await;
    let app = test_app!(coordinator);
    let uri = format!("/items/{}/bids", sample_item_id());

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(auth_header(&buyer_a()))
        .set_json(json!({ "amount": 100 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["bid"]["amount"], json!(100));
    assert_eq!(body["bid"]["bidderId"], json!("Buyer_A"));
    assert_eq!(body["bid"]["sequence"], json!(1));

    // Rejections carry their kind
    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(auth_header(&buyer_b()))
        .set_json(json!({ "amount": 103 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], json!("BelowIncrement"));

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(auth_header(&buyer_a()))
        .set_json(json!({ "amount": 200 }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["kind"], json!("SuccessiveBidNotAllowed"));

    let req = test::TestRequest::get()
        .uri(&format!("/items/{}", sample_item_id()))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["bidCount"], json!(1));
    assert_eq!(detail["highestBidder"]["bidderId"], json!("Buyer_A"));
    assert_eq!(detail["minimumNextBid"], json!(105));

    let req = test::TestRequest::get()
        .uri(&format!("/items/{}/last-bidder", sample_item_id()))
        .insert_header(auth_header(&buyer_a()))
        .to_request();
    let last: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(last["isLastBidder"], json!(true));
}

#[actix_web::test]
async fn test_bidding_requires_identity() {
    let coordinator = coordinator_with_item(AuctionableConfig::default()).await;
    let app = test_app!(coordinator);

    let req = test::TestRequest::post()
        .uri(&format!("/items/{}/bids", sample_item_id()))
        .set_json(json!({ "amount": 100 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_unknown_item_is_not_found() {
    let app = test_app!(BidCoordinator::new(InMemoryBidRepository::new_shared()));

    let req = test::TestRequest::post()
        .uri("/items/nothing/bids")
        .insert_header(auth_header(&buyer_a()))
        .set_json(json!({ "amount": 100 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], json!("ItemNotFound"));

    let req = test::TestRequest::get().uri("/items/nothing/bids").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn test_register_auctionable_over_http() {
    let app = test_app!(BidCoordinator::new(InMemoryBidRepository::new_shared()));

    let register = || {
        test::TestRequest::post()
            .uri("/items")
            .insert_header(auth_header("Seller"))
            .set_json(json!({ "id": "vase", "title": "Vase", "incrementFactor": 10 }))
            .to_request()
    };

    let resp = test::call_service(&app, register()).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["incrementFactor"], json!(10));

    assert_eq!(test::call_service(&app, register()).await.status(), 409);

    let req = test::TestRequest::get().uri("/items/vase/bids").to_request();
    let bids: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(bids, json!([]));
}

#[actix_web::test]
async fn test_storage_failure_is_service_unavailable() {
    let repository = FlakyRepository::failing(repository_with_item(AuctionableConfig::default()).await, 1);
    let app = test_app!(BidCoordinator::new(Arc::new(repository)));
    let uri = format!("/items/{}/bids", sample_item_id());
    let place = || {
        test::TestRequest::post()
            .uri(&uri)
            .insert_header(auth_header(&buyer_a()))
            .set_json(json!({ "amount": 100 }))
            .to_request()
    };

    let resp = test::call_service(&app, place()).await;
    assert_eq!(resp.status(), 503);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], json!("PersistenceFailure"));

    // Nothing was recorded, so the retry gets the first sequence
    let body: Value = test::call_and_read_body_json(&app, place()).await;
    assert_eq!(body["bid"]["sequence"], json!(1));
}
