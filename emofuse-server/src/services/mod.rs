//! External capabilities behind the signal adapters
//!
//! Each capability is a trait so the adapters can be driven by remote
//! services in production and by fakes in tests.

pub mod face_detector;
pub mod frame_source;
pub mod speech_affect;
pub mod text_classifier;
pub mod translator;

pub use face_detector::{
    FaceDetection, FaceEmotionDetector, FaceRegion, RemoteFaceDetector, UnavailableDetector,
};
pub use frame_source::{FrameSource, SnapshotFrameSource};
pub use speech_affect::{DurationHeuristic, SpeechAffectModel};
pub use text_classifier::{KeywordClassifier, TextEmotionClassifier};
pub use translator::{PassthroughTranslator, RemoteTranslator, Translation, Translator, UNTRANSLATED_TAG};
