//! Recognition Submission Flow
//!
//! Sends one image with the session id and portion weight to the recognition
//! endpoint and keeps the banner/result area of the dashboard in sync.

use std::time::Duration;

use crate::api::{ClientError, ClientResult, FoodApi};
use crate::models::{ImageUpload, RecognitionResult};
use crate::session::Session;

use super::FlowError;

pub const NO_IMAGE_MESSAGE: &str = "No dish to analyze!";
pub const LOADING_MESSAGE: &str = "Tasting...";
pub const FAILURE_MESSAGE: &str = "Analysis failed!";

/// How long error banners stay visible
pub const BANNER_DISPLAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Loading,
    Error,
    Result,
}

/// Transient message in the result area
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    /// Identifies this banner for [`RecognitionFlow::expire_banner`]
    pub generation: u64,
    /// `Some` when the banner should disappear on its own
    pub clear_after: Option<Duration>,
}

/// A validated submission
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionRequest {
    pub session: Session,
    pub image: ImageUpload,
    pub weight_grams: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionOutcome {
    /// A dish was recognized and logged server-side
    Recognized(RecognitionResult),
    /// The service answered with an `error` field
    Rejected(String),
    /// Transport or parse failure
    Failed,
}

impl RecognitionOutcome {
    /// Only a recognized dish adds an entry to the log
    pub fn refreshes_logs(&self) -> bool {
        matches!(self, RecognitionOutcome::Recognized(_))
    }
}

/// State of the analysis panel
#[derive(Debug, Clone)]
pub struct RecognitionFlow {
    in_flight: bool,
    banner: Option<Banner>,
    result: Option<RecognitionResult>,
    generation: u64,
    banner_display: Duration,
}

impl Default for RecognitionFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl RecognitionFlow {
    pub fn new() -> Self {
        Self::with_banner_display(BANNER_DISPLAY)
    }

    pub fn with_banner_display(banner_display: Duration) -> Self {
        Self {
            in_flight: false,
            banner: None,
            result: None,
            generation: 0,
            banner_display,
        }
    }

    /// The submit control is disabled while this is true
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Result of the last successful analysis
    pub fn result(&self) -> Option<&RecognitionResult> {
        self.result.as_ref()
    }

    /// Validate the selection and mark the request in flight.
    ///
    /// Without an image no request is built and the "no dish" banner is
    /// shown instead.
    pub fn begin(
        &mut self,
        image: Option<ImageUpload>,
        session: &Session,
        weight_grams: u32,
    ) -> Result<RecognitionRequest, FlowError> {
        if self.in_flight {
            return Err(FlowError::Busy);
        }

        let image = match image {
            Some(image) if !image.is_empty() => image,
            _ => {
                self.show(BannerKind::Error, NO_IMAGE_MESSAGE.to_string(), true);
                return Err(FlowError::Invalid(NO_IMAGE_MESSAGE.to_string()));
            }
        };

        self.in_flight = true;
        self.result = None;
        self.show(BannerKind::Loading, LOADING_MESSAGE.to_string(), false);

        Ok(RecognitionRequest {
            session: session.clone(),
            image,
            weight_grams,
        })
    }

    /// Apply the service response and re-enable the submit control
    pub fn finish(&mut self, response: ClientResult<RecognitionResult>) -> RecognitionOutcome {
        self.in_flight = false;

        match response {
            Ok(result) => {
                tracing::info!(
                    food = %result.food_name,
                    confidence = result.confidence,
                    "Dish recognized"
                );
                self.show(BannerKind::Result, result.display_name(), false);
                self.result = Some(result.clone());
                RecognitionOutcome::Recognized(result)
            }
            Err(ClientError::Server(message)) => {
                tracing::info!(%message, "Recognition rejected");
                self.show(BannerKind::Error, message.clone(), true);
                RecognitionOutcome::Rejected(message)
            }
            Err(e) => {
                tracing::error!(error = %e, "Recognition request failed");
                self.show(BannerKind::Error, FAILURE_MESSAGE.to_string(), true);
                RecognitionOutcome::Failed
            }
        }
    }

    /// Clear the banner if it is still the one identified by `generation`.
    ///
    /// Returns whether anything was cleared.
    pub fn expire_banner(&mut self, generation: u64) -> bool {
        match &self.banner {
            Some(banner) if banner.generation == generation && banner.clear_after.is_some() => {
                self.banner = None;
                true
            }
            _ => false,
        }
    }

    fn show(&mut self, kind: BannerKind, message: String, auto_clear: bool) {
        self.generation += 1;
        self.banner = Some(Banner {
            kind,
            message,
            generation: self.generation,
            clear_after: auto_clear.then_some(self.banner_display),
        });
    }
}

/// Send a validated request and apply the response
pub async fn analyze<A>(
    flow: &mut RecognitionFlow,
    api: &A,
    request: &RecognitionRequest,
) -> RecognitionOutcome
where
    A: FoodApi + ?Sized,
{
    let response = api
        .recognize(&request.session, &request.image, request.weight_grams)
        .await;
    flow.finish(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{Call, FakeFoodApi};
    use crate::models::Nutrition;

    fn session() -> Session {
        Session::new("3").unwrap()
    }

    fn image() -> ImageUpload {
        ImageUpload::new("plate.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF])
    }

    fn pizza() -> RecognitionResult {
        RecognitionResult {
            food_name: "pizza".to_string(),
            confidence: 0.93,
            nutrition: Nutrition::new(532.0, 22.0, 66.0, 20.0),
            summary: "Pizza is a dish of Italian origin.".to_string(),
        }
    }

    #[test]
    fn test_no_image_shows_banner_without_request() {
        let mut flow = RecognitionFlow::new();

        let err = flow.begin(None, &session(), 100).unwrap_err();
        assert_eq!(err, FlowError::Invalid(NO_IMAGE_MESSAGE.to_string()));
        assert!(!flow.is_in_flight());

        let banner = flow.banner().unwrap();
        assert_eq!(banner.kind, BannerKind::Error);
        assert_eq!(banner.message, NO_IMAGE_MESSAGE);
        assert_eq!(banner.clear_after, Some(BANNER_DISPLAY));

        let empty = ImageUpload::new("empty.png", "image/png", Vec::new());
        assert!(flow.begin(Some(empty), &session(), 100).is_err());
    }

    #[test]
    fn test_in_flight_guard() {
        let mut flow = RecognitionFlow::new();
        let request = flow.begin(Some(image()), &session(), 200).unwrap();
        assert_eq!(request.weight_grams, 200);
        assert!(flow.is_in_flight());
        assert_eq!(flow.banner().unwrap().message, LOADING_MESSAGE);
        assert_eq!(flow.banner().unwrap().clear_after, None);

        assert_eq!(flow.begin(Some(image()), &session(), 200), Err(FlowError::Busy));

        flow.finish(Ok(pizza()));
        assert!(!flow.is_in_flight());
    }

    #[test]
    fn test_server_error_shown_verbatim_and_auto_clears() {
        let mut flow = RecognitionFlow::new();
        flow.begin(Some(image()), &session(), 100).unwrap();

        let outcome = flow.finish(Err(ClientError::Server("Image processing failed".into())));
        assert_eq!(outcome, RecognitionOutcome::Rejected("Image processing failed".into()));
        assert!(!outcome.refreshes_logs());

        let banner = flow.banner().unwrap().clone();
        assert_eq!(banner.message, "Image processing failed");
        assert_eq!(banner.clear_after, Some(BANNER_DISPLAY));
        assert!(flow.expire_banner(banner.generation));
        assert!(flow.banner().is_none());
    }

    #[test]
    fn test_transport_failure_generic_message() {
        let mut flow = RecognitionFlow::new();
        flow.begin(Some(image()), &session(), 100).unwrap();

        let outcome = flow.finish(Err(ClientError::Transport("connection reset".into())));
        assert_eq!(outcome, RecognitionOutcome::Failed);
        assert_eq!(flow.banner().unwrap().message, FAILURE_MESSAGE);
    }

    #[test]
    fn test_stale_timer_does_not_clear_newer_banner() {
        let mut flow = RecognitionFlow::new();
        let _ = flow.begin(None, &session(), 100);
        let stale = flow.banner().unwrap().generation;

        flow.begin(Some(image()), &session(), 100).unwrap();
        assert!(!flow.expire_banner(stale));
        assert_eq!(flow.banner().unwrap().message, LOADING_MESSAGE);
    }

    #[test]
    fn test_result_banner_is_sticky_and_replaced_on_next_submit() {
        let mut flow = RecognitionFlow::new();
        flow.begin(Some(image()), &session(), 100).unwrap();
        flow.finish(Ok(pizza()));

        let banner = flow.banner().unwrap().clone();
        assert_eq!(banner.kind, BannerKind::Result);
        assert!(!flow.expire_banner(banner.generation));
        assert_eq!(flow.result().unwrap().food_name, "pizza");

        flow.begin(Some(image()), &session(), 100).unwrap();
        assert!(flow.result().is_none());
    }

    #[tokio::test]
    async fn test_analyze_sends_image_session_and_weight() {
        let api = FakeFoodApi::new();
        api.push_recognize(Ok(pizza()));

        let mut flow = RecognitionFlow::new();
        let request = flow.begin(Some(image()), &session(), 250).unwrap();
        let outcome = analyze(&mut flow, &api, &request).await;

        assert!(outcome.refreshes_logs());
        assert_eq!(
            api.calls(),
            vec![Call::Recognize {
                user: "3".into(),
                file: "plate.jpg".into(),
                weight: 250
            }]
        );
    }
}
