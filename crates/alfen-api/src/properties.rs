// Property and info endpoints
//
// Every call goes through `execute_authenticated`, so an expired session
// is renewed transparently before the result reaches the caller.

use tracing::{debug, trace};

use crate::client::{AlfenClient, check_status, parse_json};
use crate::error::Error;
use crate::models::{Info, Properties, property_write_body};

impl AlfenClient {
    /// Fetch the given property ids in one request.
    ///
    /// Ids are joined with unencoded commas: `GET /api/prop?ids=a,b,c`.
    pub async fn get_properties<S: AsRef<str>>(&self, ids: &[S]) -> Result<Properties, Error> {
        let joined = ids
            .iter()
            .map(AsRef::<str>::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        let url = self.api_url(&format!("prop?ids={joined}"))?;

        let resp = self
            .execute_authenticated(|| self.send_get(url.clone()))
            .await?;
        let resp = check_status(resp, "error getting properties").await?;
        let props: Properties = parse_json(resp).await?;

        trace!(
            count = props.properties.len(),
            total = props.total,
            "fetched properties"
        );
        Ok(props)
    }

    /// Write a single property. The device takes every value as a string.
    ///
    /// Stricter than the device contract, which only asks for transport
    /// success: a non-2xx reply is returned as [`Error::Http`] rather than
    /// ignored.
    pub async fn set_property(&self, id: &str, value: &str) -> Result<(), Error> {
        debug!(id, value, "setting property");

        let url = self.api_url("prop")?;
        let body = serde_json::to_vec(&property_write_body(id, value))?;

        let resp = self
            .execute_authenticated(|| self.send_post(url.clone(), body.clone()))
            .await?;
        check_status(resp, "error setting property").await?;
        Ok(())
    }

    /// Fetch the device identity record.
    pub async fn get_info(&self) -> Result<Info, Error> {
        let url = self.api_url("info")?;

        let resp = self
            .execute_authenticated(|| self.send_get(url.clone()))
            .await?;
        let resp = check_status(resp, "error getting info").await?;
        parse_json(resp).await
    }
}
