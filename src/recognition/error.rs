//! Classification of raw recognition engine errors.
//!
//! Engine errors never propagate upward as crate errors; they become state
//! on the session. The raw engine value is kept verbatim for diagnostics
//! next to a localized message suitable for the user.

/// What kind of failure the engine reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    Network,
    PermissionDenied,
    NoSpeech,
    AudioCapture,
    Aborted,
    Unknown,
}

impl RecognitionErrorKind {
    /// Benign kinds end a session without any continuation consequences:
    /// recognition naturally re-arms.
    pub fn is_benign(self) -> bool {
        matches!(self, Self::NoSpeech | Self::Aborted)
    }
}

/// A classified engine error: kind, raw engine value, friendly message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionError {
    pub kind: RecognitionErrorKind,
    pub raw: String,
}

impl RecognitionError {
    /// Classify a raw engine error code.
    pub fn classify(raw: &str) -> Self {
        let kind = match raw.trim() {
            "network" => RecognitionErrorKind::Network,
            "not-allowed" | "service-not-allowed" | "permission-denied" => {
                RecognitionErrorKind::PermissionDenied
            }
            "no-speech" => RecognitionErrorKind::NoSpeech,
            "audio-capture" => RecognitionErrorKind::AudioCapture,
            "aborted" => RecognitionErrorKind::Aborted,
            _ => RecognitionErrorKind::Unknown,
        };
        Self {
            kind,
            raw: raw.to_string(),
        }
    }

    /// Localized user-facing message.
    pub fn friendly(&self) -> &'static str {
        match self.kind {
            RecognitionErrorKind::Network => "Error de red en el reconocimiento de voz",
            RecognitionErrorKind::PermissionDenied => "Permiso de micrófono denegado",
            RecognitionErrorKind::NoSpeech => "No se detectó voz",
            RecognitionErrorKind::AudioCapture => "No se pudo acceder al micrófono",
            RecognitionErrorKind::Aborted => "Reconocimiento de voz interrumpido",
            RecognitionErrorKind::Unknown => "Error del reconocimiento de voz",
        }
    }
}

impl std::fmt::Display for RecognitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.friendly(), self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_codes() {
        assert_eq!(
            RecognitionError::classify("network").kind,
            RecognitionErrorKind::Network
        );
        assert_eq!(
            RecognitionError::classify("not-allowed").kind,
            RecognitionErrorKind::PermissionDenied
        );
        assert_eq!(
            RecognitionError::classify("service-not-allowed").kind,
            RecognitionErrorKind::PermissionDenied
        );
        assert_eq!(
            RecognitionError::classify("no-speech").kind,
            RecognitionErrorKind::NoSpeech
        );
        assert_eq!(
            RecognitionError::classify("audio-capture").kind,
            RecognitionErrorKind::AudioCapture
        );
        assert_eq!(
            RecognitionError::classify("aborted").kind,
            RecognitionErrorKind::Aborted
        );
    }

    #[test]
    fn test_classify_unknown_preserves_raw() {
        let err = RecognitionError::classify("bad-grammar");
        assert_eq!(err.kind, RecognitionErrorKind::Unknown);
        assert_eq!(err.raw, "bad-grammar");
    }

    #[test]
    fn test_benign_kinds() {
        assert!(RecognitionErrorKind::NoSpeech.is_benign());
        assert!(RecognitionErrorKind::Aborted.is_benign());
        assert!(!RecognitionErrorKind::Network.is_benign());
        assert!(!RecognitionErrorKind::PermissionDenied.is_benign());
        assert!(!RecognitionErrorKind::AudioCapture.is_benign());
        assert!(!RecognitionErrorKind::Unknown.is_benign());
    }

    #[test]
    fn test_display_includes_raw_value() {
        let err = RecognitionError::classify("network");
        let shown = err.to_string();
        assert!(shown.contains("red"));
        assert!(shown.contains("network"));
    }
}
