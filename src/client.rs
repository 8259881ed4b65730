use async_trait::async_trait;
use const_format::concatcp;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use url::Url;

use crate::error::{Result, SpeakersError};
use crate::panel::SpeakerApi;
use crate::payload::{MultipartPayload, PayloadPart, PHOTO_FIELD};
use crate::types::{PhotoFile, Speaker};

const USER_AGENT: &str = concatcp!("indico-speakers/", env!("CARGO_PKG_VERSION"));

/// URL builders for the speaker endpoints of one server.
#[derive(Debug, Clone)]
pub struct Routes {
    base: Url,
}

impl Routes {
    pub fn new(base_url: &str) -> Result<Self> {
        let base =
            Url::parse(base_url).map_err(|_| SpeakersError::InvalidUrl(base_url.to_string()))?;

        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(SpeakersError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self { base })
    }

    fn endpoint(&self, segments: &[String]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn speakers_base(event_id: u64) -> Vec<String> {
        vec![
            "event".to_string(),
            event_id.to_string(),
            "manage".to_string(),
            "persons".to_string(),
            "speakers".to_string(),
        ]
    }

    pub fn speakers_list(&self, event_id: u64) -> Url {
        let mut segments = Self::speakers_base(event_id);
        segments.push("api".to_string());
        self.endpoint(&segments)
    }

    pub fn api_speaker(&self, event_id: u64, person_id: u64) -> Url {
        let mut segments = Self::speakers_base(event_id);
        segments.extend([person_id.to_string(), "api".to_string()]);
        self.endpoint(&segments)
    }

    pub fn upload_speaker_photo(&self, event_id: u64, person_id: u64) -> Url {
        let mut segments = Self::speakers_base(event_id);
        segments.extend([person_id.to_string(), "photo".to_string()]);
        self.endpoint(&segments)
    }
}

pub struct IndicoClient {
    http: Client,
    routes: Routes,
    api_token: Option<String>,
}

impl IndicoClient {
    pub fn new(routes: Routes, api_token: Option<String>) -> Result<Self> {
        Self::with_builder(Client::builder(), routes, api_token)
    }

    /// Client that never goes through a proxy, for talking to a local server.
    #[cfg(test)]
    pub fn without_proxy(routes: Routes, api_token: Option<String>) -> Result<Self> {
        Self::with_builder(Client::builder().no_proxy(), routes, api_token)
    }

    fn with_builder(
        builder: ClientBuilder,
        routes: Routes,
        api_token: Option<String>,
    ) -> Result<Self> {
        let http = builder.user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            routes,
            api_token,
        })
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(SpeakersError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            });
        }

        Ok(response)
    }

    /// Post a photo to the upload endpoint of an edit form (see
    /// `EditSpeakerForm::photo_upload_url`). The response is passed through untouched.
    pub async fn upload_photo(&self, url: Url, file: &PhotoFile) -> Result<serde_json::Value> {
        tracing::debug!(%url, filename = %file.filename, "uploading speaker photo");

        let mut payload = MultipartPayload::new();
        payload.append_file(PHOTO_FIELD, file.clone());

        let response = self
            .send(self.http.post(url).multipart(payload.into_form()?))
            .await?;

        Ok(response.json().await?)
    }
}

#[async_trait]
impl SpeakerApi for IndicoClient {
    async fn list_speakers(&self, event_id: u64) -> Result<Vec<Speaker>> {
        let url = self.routes.speakers_list(event_id);
        tracing::debug!(%url, "fetching speakers");

        let response = self.send(self.http.get(url)).await?;
        Ok(response.json().await?)
    }

    async fn update_speaker(
        &self,
        event_id: u64,
        person_id: u64,
        payload: MultipartPayload,
    ) -> Result<Speaker> {
        let url = self.routes.api_speaker(event_id, person_id);
        let fields: Vec<&str> = payload.parts().iter().map(PayloadPart::name).collect();
        tracing::debug!(%url, ?fields, "updating speaker");

        let response = self
            .send(self.http.post(url).multipart(payload.into_form()?))
            .await?;
        Ok(response.json().await?)
    }
}
