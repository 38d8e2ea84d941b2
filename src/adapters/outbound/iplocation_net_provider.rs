//! iplocation.net Provider
//!
//! Implements GeoProvider against the iplocation.net form-post API.

use crate::domain::entities::{unix_seconds, GeoRecord};
use crate::domain::errors::FetchError;
use crate::domain::ports::GeoProvider;
use crate::domain::value_objects::IpVersion;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::SystemTime;

pub const IPLOCATION_NET: &str = "iplocation.net";
pub const IPLOCATION_NET_URL: &str = "https://www.iplocation.net/get-ipdata";

/// Data source requested from iplocation.net.
const SOURCE: &str = "ip2location";

#[derive(Debug, Deserialize)]
struct IpLocationNetResponse {
    res: IpLocationNetResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpLocationNetResult {
    ip_address: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    country_name: Option<String>,
    country_code: Option<String>,
    isp: Option<String>,
    city_name: Option<String>,
    region_name: Option<String>,
}

impl IpLocationNetResult {
    fn into_record(self, requested_ip: &str, captured_at: i64) -> GeoRecord {
        GeoRecord {
            ip_address: self
                .ip_address
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| requested_ip.to_string()),
            country_name: self.country_name.unwrap_or_default(),
            country_code: self.country_code.unwrap_or_default(),
            region_name: self.region_name.unwrap_or_default(),
            city_name: self.city_name.unwrap_or_default(),
            isp: self.isp.unwrap_or_default(),
            latitude: self.latitude.unwrap_or_default(),
            longitude: self.longitude.unwrap_or_default(),
            timestamp: captured_at,
        }
    }
}

/// Client for `POST https://www.iplocation.net/get-ipdata`.
///
/// Sends `ipv`, `ip` and `source=ip2location` as a url-encoded form and
/// reads the `res` object of the JSON reply.
#[derive(Clone)]
pub struct IpLocationNetProvider {
    http: reqwest::Client,
}

impl IpLocationNetProvider {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl GeoProvider for IpLocationNetProvider {
    async fn fetch(
        &self,
        endpoint: &str,
        ip: &str,
        ip_version: IpVersion,
    ) -> Result<GeoRecord, FetchError> {
        let response = self
            .http
            .post(endpoint)
            .form(&[("ipv", ip_version.as_str()), ("ip", ip), ("source", SOURCE)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body: IpLocationNetResponse = response.json().await?;
        Ok(body.res.into_record(ip, unix_seconds(SystemTime::now())))
    }
}
