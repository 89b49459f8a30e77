use actix_web::middleware::Logger;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Result};
use base64::{engine::general_purpose, Engine as _};
use log::{info, warn};
use serde_json::Value;
use std::sync::Arc;

use super::types::{
    AddAuctionableRequest, ApiError, AppState, AuctionableDetail, BidAccepted, BidRequest, LastBidderResponse,
};
use crate::config::Settings;
use crate::coordinator::{BidCoordinator, BidError};
use crate::domain::{AuctionableState, BidderId, ItemId};
use crate::money::Amount;
use crate::persistence::{
    BidRepository, InMemoryBidRepository, JsonFileBidRepository, RepositoryError, SharedBidRepository,
};

// Initialize application state
pub async fn init_app_state(settings: &Settings) -> Result<AppState, RepositoryError> {
    let repository: SharedBidRepository = match &settings.data_file {
        Some(path) => {
            info!("Storing bids in {}", path.display());
            Arc::new(JsonFileBidRepository::open(path).await?)
        }
        None => {
            warn!("No AUCTION_DATA_FILE set, bids are kept in memory only");
            InMemoryBidRepository::new_shared()
        }
    };
    Ok(BidCoordinator::new(repository))
}

// Read x-jwt-payload header and extract the caller's bidder id
pub fn get_auth_user(req: &HttpRequest) -> Option<BidderId> {
    let auth_header = req.headers().get("x-jwt-payload")?;
    let auth_str = auth_header.to_str().ok()?;

    let decoded = general_purpose::STANDARD.decode(auth_str).ok()?;
    let json_str = String::from_utf8(decoded).ok()?;
    let json: Value = serde_json::from_str(&json_str).ok()?;

    let sub = json.get("sub")?.as_str()?;
    if sub.is_empty() {
        return None;
    }
    Some(sub.to_string())
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiError {
        kind: "Unauthorized".to_string(),
        message: "Missing or invalid x-jwt-payload header".to_string(),
    })
}

fn error_response(err: &BidError) -> HttpResponse {
    let body = ApiError::from(err);
    match err {
        BidError::Rejected(_) => HttpResponse::BadRequest().json(body),
        BidError::ItemNotFound(_) => HttpResponse::NotFound().json(body),
        BidError::PersistenceFailure(_) => HttpResponse::ServiceUnavailable().json(body),
    }
}

// Register an item that can be bid on
async fn add_auctionable(
    req: HttpRequest,
    add_req: web::Json<AddAuctionableRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    if get_auth_user(&req).is_none() {
        return Ok(unauthorized());
    }

    let auctionable = match add_req.to_auctionable() {
        Ok(auctionable) => auctionable,
        Err(err) => {
            return Ok(HttpResponse::BadRequest().json(ApiError {
                kind: "InvalidConfiguration".to_string(),
                message: err.to_string(),
            }))
        }
    };

    match data.repository().add_auctionable(auctionable.clone()).await {
        Ok(()) => Ok(HttpResponse::Created().json(auctionable)),
        Err(RepositoryError::DuplicateAuctionable(id)) => Ok(HttpResponse::Conflict().json(ApiError {
            kind: "AuctionableAlreadyExists".to_string(),
            message: format!("Auctionable already exists: {}", id),
        })),
        Err(err) => Ok(error_response(&BidError::PersistenceFailure(err))),
    }
}

async fn get_auctionable(path: web::Path<ItemId>, data: web::Data<AppState>) -> Result<HttpResponse> {
    let item_id = path.into_inner();

    match data.snapshot(&item_id).await {
        Ok(snapshot) => {
            let state = AuctionableState::from_bids(&snapshot.bids);
            Ok(HttpResponse::Ok().json(AuctionableDetail::new(&snapshot.auctionable, &state)))
        }
        Err(err) => Ok(error_response(&err)),
    }
}

async fn get_bids(path: web::Path<ItemId>, data: web::Data<AppState>) -> Result<HttpResponse> {
    let item_id = path.into_inner();
    match data.bids(&item_id).await {
        Ok(bids) => Ok(HttpResponse::Ok().json(bids)),
        Err(err) => Ok(error_response(&err)),
    }
}

// Place a bid on an item
async fn place_bid(
    req: HttpRequest,
    path: web::Path<ItemId>,
    bid_req: web::Json<BidRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    let bidder_id = match get_auth_user(&req) {
        Some(bidder_id) => bidder_id,
        None => return Ok(unauthorized()),
    };
    let item_id = path.into_inner();

    match data.submit(&item_id, &bidder_id, Amount::new(bid_req.amount)).await {
        Ok(bid) => Ok(HttpResponse::Ok().json(BidAccepted { bid })),
        Err(err) => Ok(error_response(&err)),
    }
}

async fn get_last_bidder(
    req: HttpRequest,
    path: web::Path<ItemId>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    let bidder_id = match get_auth_user(&req) {
        Some(bidder_id) => bidder_id,
        None => return Ok(unauthorized()),
    };
    let item_id = path.into_inner();

    match data.is_last_bidder(&item_id, &bidder_id).await {
        Ok(is_last_bidder) => Ok(HttpResponse::Ok().json(LastBidderResponse {
            item_id,
            bidder_id,
            is_last_bidder,
        })),
        Err(err) => Ok(error_response(&err)),
    }
}

// Configure routes
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .route("/items", web::post().to(add_auctionable))
            .route("/items/{id}", web::get().to(get_auctionable))
            .route("/items/{id}/bids", web::get().to(get_bids))
            .route("/items/{id}/bids", web::post().to(place_bid))
            .route("/items/{id}/last-bidder", web::get().to(get_last_bidder)),
    );
}

// Main application
pub async fn run_app(settings: Settings) -> std::io::Result<()> {
    let app_state = init_app_state(&settings)
        .await
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;

    info!("Starting server on {}:{}", settings.host, settings.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(Logger::default())
            .configure(configure_app)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
