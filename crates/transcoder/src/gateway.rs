//! Form endpoint gateway

use tracing::instrument;

use contracts::ContractError;

/// Downstream form-processing endpoint
///
/// Serves form definitions and accepts transcoded submissions.
#[trait_variant::make(FormGateway: Send)]
pub trait LocalFormGateway {
    /// Fetch the XML form definition for a form id.
    async fn fetch_form_xml(&self, form_id: &str) -> Result<String, ContractError>;

    /// Submit one transcoded record.
    async fn submit(
        &self,
        form_id: &str,
        data: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), ContractError>;
}

/// HTTP gateway to the form endpoint.
pub struct HttpFormGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFormGateway {
    /// Create a gateway for the endpoint's base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl FormGateway for HttpFormGateway {
    #[instrument(name = "form_gateway_fetch", skip(self), fields(form_id = %form_id))]
    async fn fetch_form_xml(&self, form_id: &str) -> Result<String, ContractError> {
        let url = format!("{}/formXml", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("formId", form_id)])
            .send()
            .await
            .map_err(|e| ContractError::http(&url, e.to_string()))?
            .error_for_status()
            .map_err(|e| ContractError::http(&url, e.to_string()))?;

        response
            .text()
            .await
            .map_err(|e| ContractError::http(&url, e.to_string()))
    }

    #[instrument(name = "form_gateway_submit", skip(self, data), fields(form_id = %form_id))]
    async fn submit(
        &self,
        form_id: &str,
        data: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), ContractError> {
        let url = format!("{}/submission", self.base_url);
        self.client
            .post(&url)
            .json(&serde_json::json!({ "formId": form_id, "data": data }))
            .send()
            .await
            .map_err(|e| ContractError::http(&url, e.to_string()))?
            .error_for_status()
            .map_err(|e| ContractError::http(&url, e.to_string()))?;
        Ok(())
    }
}
