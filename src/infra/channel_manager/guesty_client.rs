use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};
use crate::domain::models::booking::{Booking, NewBookingParams, STATUS_CANCELLED};
use crate::domain::ports::ChannelManager;
use crate::domain::services::token_cache::TokenCache;
use crate::error::AppError;

const PAGE_SIZE: usize = 100;
const MAX_RETRIES: u32 = 2;
const INITIAL_BACKOFF_MS: u64 = 500;
const SOURCE: &str = "guesty";

#[derive(Deserialize)]
struct ReservationPage {
    #[serde(default)]
    results: Vec<ReservationDto>,
    count: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReservationDto {
    #[serde(rename = "_id")]
    id: String,
    listing_id: Option<String>,
    check_in: Option<String>,
    check_out: Option<String>,
    check_in_date_localized: Option<NaiveDate>,
    check_out_date_localized: Option<NaiveDate>,
    status: Option<String>,
    guest: Option<GuestDto>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuestDto {
    full_name: Option<String>,
}

fn parse_day(localized: Option<NaiveDate>, raw: Option<&str>) -> Option<NaiveDate> {
    localized.or_else(|| {
        raw.and_then(|s| s.get(..10))
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    })
}

fn normalize_status(status: &str) -> String {
    match status.to_ascii_lowercase().as_str() {
        "canceled" | "cancelled" => STATUS_CANCELLED.to_string(),
        other => other.to_string(),
    }
}

impl ReservationDto {
    fn into_booking(self) -> Option<Booking> {
        let check_in = parse_day(self.check_in_date_localized, self.check_in.as_deref())?;
        let check_out = parse_day(self.check_out_date_localized, self.check_out.as_deref())?;
        Some(Booking::new(NewBookingParams {
            id: self.id,
            listing_id: self.listing_id?,
            guest_name: self.guest.and_then(|g| g.full_name),
            check_in,
            check_out,
            status: normalize_status(self.status.as_deref().unwrap_or("unknown")),
            source: SOURCE.to_string(),
        }))
    }
}

/// Guesty Open API reservations reader, authenticated through the shared token cache.
pub struct GuestyClient {
    client: Client,
    api_url: String,
    tokens: Arc<TokenCache>,
}

impl GuestyClient {
    pub fn new(api_url: String, tokens: Arc<TokenCache>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_url: api_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    async fn fetch_page(&self, filters: &str, skip: usize) -> Result<ReservationPage, AppError> {
        let url = format!("{}/reservations", self.api_url);
        let mut retries = 0;
        let mut backoff = INITIAL_BACKOFF_MS;
        let mut reauthenticated = false;

        loop {
            let token = self.tokens.get_token().await?;
            let res = self.client.get(&url)
                .bearer_auth(&token)
                .query(&[
                    ("limit", PAGE_SIZE.to_string()),
                    ("skip", skip.to_string()),
                    ("filters", filters.to_string()),
                    ("fields", "_id listingId checkIn checkOut checkInDateLocalized checkOutDateLocalized status guest.fullName".to_string()),
                ])
                .send()
                .await;

            match res {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<ReservationPage>().await.map_err(|e| {
                            error!("Failed to parse reservations page: {:?}", e);
                            AppError::Upstream(format!("malformed reservations response: {}", e))
                        });
                    } else if status == StatusCode::UNAUTHORIZED && !reauthenticated {
                        warn!("Channel manager rejected token, refreshing once");
                        self.tokens.invalidate().await;
                        reauthenticated = true;
                        continue;
                    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        if retries >= MAX_RETRIES {
                            let text = response.text().await.unwrap_or_default();
                            error!("Reservations request failed after {} retries. Status: {}", retries, status);
                            return Err(AppError::Upstream(format!("{} - {}", status, text)));
                        }
                        warn!("Reservations request transient error {}. Retrying in {}ms...", status, backoff);
                    } else if status == StatusCode::UNAUTHORIZED {
                        return Err(AppError::Authentication("channel manager rejected a freshly issued token".into()));
                    } else {
                        let text = response.text().await.unwrap_or_default();
                        error!("Reservations request rejected {}: {}", status, text);
                        return Err(AppError::Upstream(format!("{} - {}", status, text)));
                    }
                }
                Err(e) => {
                    if retries >= MAX_RETRIES {
                        error!("Reservations network error after {} retries: {:?}", retries, e);
                        return Err(AppError::Upstream(format!("network error: {}", e)));
                    }
                    warn!("Reservations network error. Retrying in {}ms... {:?}", backoff, e);
                }
            }

            sleep(Duration::from_millis(backoff)).await;
            retries += 1;
            backoff *= 2;
        }
    }
}

#[async_trait]
impl ChannelManager for GuestyClient {
    #[instrument(skip(self))]
    async fn fetch_reservations(&self, checkout_from: NaiveDate, checkout_to: NaiveDate) -> Result<Vec<Booking>, AppError> {
        let filters = json!([
            { "field": "checkOut", "operator": "$gte", "value": checkout_from.to_string() },
            { "field": "checkOut", "operator": "$lte", "value": checkout_to.to_string() }
        ]).to_string();

        let mut bookings = Vec::new();
        let mut skip = 0;

        loop {
            let page = self.fetch_page(&filters, skip).await?;
            let received = page.results.len();

            for dto in page.results {
                let id = dto.id.clone();
                match dto.into_booking() {
                    Some(b) => bookings.push(b),
                    None => warn!("Skipping reservation {} with missing listing or dates", id),
                }
            }

            skip += received;
            let exhausted = received < PAGE_SIZE || page.count.is_some_and(|c| skip >= c);
            if exhausted {
                break;
            }
        }

        info!("Fetched {} reservations from channel manager", bookings.len());
        Ok(bookings)
    }
}
