//! ip-api.com Provider
//!
//! Implements GeoProvider against the ip-api.com JSON endpoint.

use crate::domain::entities::{unix_seconds, GeoRecord};
use crate::domain::errors::FetchError;
use crate::domain::ports::GeoProvider;
use crate::domain::value_objects::IpVersion;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::SystemTime;

pub const IP_API: &str = "ip-api.com";
pub const IP_API_URL: &str = "http://ip-api.com/json";

const FIELDS: &str = "status,message,query,country,countryCode,regionName,city,isp,lat,lon";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    query: Option<String>,
    country: Option<String>,
    country_code: Option<String>,
    region_name: Option<String>,
    city: Option<String>,
    isp: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpApiResponse {
    fn into_record(self, requested_ip: &str, captured_at: i64) -> Result<GeoRecord, FetchError> {
        if self.status != "success" {
            return Err(FetchError::Upstream(
                self.message.unwrap_or_else(|| format!("status {}", self.status)),
            ));
        }

        Ok(GeoRecord {
            ip_address: self
                .query
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| requested_ip.to_string()),
            country_name: self.country.unwrap_or_default(),
            country_code: self.country_code.unwrap_or_default(),
            region_name: self.region_name.unwrap_or_default(),
            city_name: self.city.unwrap_or_default(),
            isp: self.isp.unwrap_or_default(),
            latitude: self.lat.unwrap_or_default(),
            longitude: self.lon.unwrap_or_default(),
            timestamp: captured_at,
        })
    }
}

/// Client for `GET http://ip-api.com/json/{ip}`.
///
/// ip-api.com detects the address family itself, so the version hint is
/// not sent. A `"status": "fail"` body is reported as an upstream error.
#[derive(Clone)]
pub struct IpApiProvider {
    http: reqwest::Client,
}

impl IpApiProvider {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl GeoProvider for IpApiProvider {
    async fn fetch(
        &self,
        endpoint: &str,
        ip: &str,
        _ip_version: IpVersion,
    ) -> Result<GeoRecord, FetchError> {
        let url = format!("{}/{}", endpoint.trim_end_matches('/'), ip);
        let response = self
            .http
            .get(&url)
            .query(&[("fields", FIELDS)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body: IpApiResponse = response.json().await?;
        body.into_record(ip, unix_seconds(SystemTime::now()))
    }
}
