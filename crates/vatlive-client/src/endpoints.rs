//! Status discovery.

use serde_json::Value;
use tracing::debug;
use vatlive_core::transport::Transport;
use vatlive_decode::{decode, raw::RawStatus};

use crate::error::{Error, Result};

const STATUS: &str = "status";

/// Endpoint URLs advertised by the status discovery document. Each is the
/// first entry of its list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
  pub status:           String,
  pub data_v3:          String,
  pub transceivers:     String,
  pub servers:          String,
  pub servers_sweatbox: String,
  pub user:             String,
  pub metar:            String,
}

fn first_url(urls: Vec<String>, field: &str) -> vatlive_core::Result<String> {
  urls
    .into_iter()
    .next()
    .ok_or_else(|| vatlive_core::Error::MissingField {
      entity: STATUS,
      field:  field.to_owned(),
    })
}

impl Endpoints {
  /// Read the endpoint lists out of a status document fetched from
  /// `status_url`.
  pub fn from_status(status_url: &str, doc: &Value) -> vatlive_core::Result<Self> {
    let status: RawStatus = decode(STATUS, doc)?;
    let data = status.data;

    Ok(Self {
      status:           status_url.to_owned(),
      data_v3:          first_url(data.v3, "v3")?,
      transceivers:     first_url(data.transceivers, "transceivers")?,
      servers:          first_url(data.servers, "servers")?,
      servers_sweatbox: first_url(data.servers_sweatbox, "servers_sweatbox")?,
      user:             first_url(status.user, "user")?,
      metar:            first_url(status.metar, "metar")?,
    })
  }

  /// Fetch and parse the status document.
  pub async fn discover<T: Transport>(transport: &T, status_url: &str) -> Result<Self> {
    let doc = transport
      .get_json(status_url)
      .await
      .map_err(Error::transport)?;
    let endpoints = Self::from_status(status_url, &doc)?;
    debug!(
      data = %endpoints.data_v3,
      metar = %endpoints.metar,
      "discovered endpoints"
    );
    Ok(endpoints)
  }
}
