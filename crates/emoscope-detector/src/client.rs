//! HTTP client for the analysis service.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::png::PngEncoder;
use image::ImageEncoder;
use reqwest::Client;
use tracing::{debug, warn};

use emoscope_media::Frame;

use crate::error::{DetectorError, DetectorResult};
use crate::types::{DetectRequest, DetectResponse, HealthResponse, RawDetection};
use crate::EmotionDetector;

/// Configuration for the detector client.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Base URL of the analysis service
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Max retries per frame
    pub max_retries: u32,
    /// Whether to request every face in the frame
    pub multi_face: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 2,
            multi_face: false,
        }
    }
}

impl DetectorConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("EMOSCOPE_DETECTOR_URL")
                .unwrap_or(defaults.base_url),
            timeout: Duration::from_secs(
                std::env::var("EMOSCOPE_DETECTOR_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            max_retries: std::env::var("EMOSCOPE_DETECTOR_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_retries),
            multi_face: defaults.multi_face,
        }
    }

    /// Set the multi-face hint.
    pub fn with_multi_face(mut self, multi_face: bool) -> Self {
        self.multi_face = multi_face;
        self
    }
}

/// Client for the facial-analysis HTTP service.
pub struct HttpDetector {
    http: Client,
    config: DetectorConfig,
}

impl HttpDetector {
    /// Create a new detector client.
    pub fn new(config: DetectorConfig) -> DetectorResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(DetectorError::Network)?;
        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> DetectorResult<Self> {
        Self::new(DetectorConfig::from_env())
    }

    /// Check if the analysis service is healthy.
    pub async fn health_check(&self) -> DetectorResult<bool> {
        let url = format!("{}/health", self.config.base_url);

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await?;
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!("Detector health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Detector health check error: {}", e);
                Ok(false)
            }
        }
    }

    fn encode_frame(frame: &Frame) -> DetectorResult<String> {
        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(&frame.data, frame.width, frame.height, image::ColorType::Rgb8)
            .map_err(|e| DetectorError::Encode(e.to_string()))?;
        Ok(BASE64.encode(png))
    }

    async fn post_detect(&self, request: &DetectRequest) -> DetectorResult<DetectResponse> {
        let url = format!("{}/detect", self.config.base_url);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(DetectorError::Network)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DetectorError::RequestFailed(format!(
                "detector returned {}: {}",
                status, body
            )));
        }

        response
            .json::<DetectResponse>()
            .await
            .map_err(|e| DetectorError::InvalidResponse(e.to_string()))
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> DetectorResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = DetectorResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "Detector request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| DetectorError::RequestFailed("retries exhausted".to_string())))
    }
}

#[async_trait]
impl EmotionDetector for HttpDetector {
    async fn detect(&self, frame: &Frame) -> DetectorResult<Vec<RawDetection>> {
        let request = DetectRequest {
            image: Self::encode_frame(frame)?,
            multi_face: self.config.multi_face,
        };

        debug!(frame = frame.index, "sending frame to detector");
        let response = self.with_retry(|| self.post_detect(&request)).await?;
        Ok(response.faces)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
