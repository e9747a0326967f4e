use http::StatusCode;
use std::fmt;

/// Canonical body of a handler-level 404.
pub const NOT_FOUND_MESSAGE: &str = "Status Code: 404; Not Found";

/// Envelope whose model is arbitrary JSON.
pub type UntypedResponse = HttpResponse<serde_json::Value>;

/// Outcome of handling one request.
///
/// Fields are private: an envelope is immutable once built. Whether it
/// succeeded is derived from the presence of an error message and nothing
/// else.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse<T = serde_json::Value> {
    model: Option<T>,
    status: StatusCode,
    error_message: Option<String>,
}

/// Rejected envelope construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// A payload envelope was requested without a payload.
    MissingModel,
    /// A failure envelope was requested with an empty or whitespace message.
    BlankErrorMessage,
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeError::MissingModel => {
                write!(f, "response envelope: a model is required for a payload response")
            }
            EnvelopeError::BlankErrorMessage => {
                write!(f, "response envelope: error message must not be blank")
            }
        }
    }
}

impl std::error::Error for EnvelopeError {}

impl<T> HttpResponse<T> {
    /// Successful response carrying only a status code.
    #[must_use]
    pub fn status(status: StatusCode) -> Self {
        Self {
            model: None,
            status,
            error_message: None,
        }
    }

    /// Successful response carrying `model`.
    #[must_use]
    pub fn with_model(model: T, status: StatusCode) -> Self {
        Self {
            model: Some(model),
            status,
            error_message: None,
        }
    }

    /// Like [`HttpResponse::with_model`], for callers holding an `Option`.
    ///
    /// # Errors
    ///
    /// [`EnvelopeError::MissingModel`] when `model` is `None`.
    pub fn try_with_model(model: Option<T>, status: StatusCode) -> Result<Self, EnvelopeError> {
        model
            .map(|m| Self::with_model(m, status))
            .ok_or(EnvelopeError::MissingModel)
    }

    /// Failed response whose body is `message`.
    ///
    /// # Panics
    ///
    /// Panics when `message` is empty or whitespace. A blank failure is a bug
    /// in the handler, and the dispatcher turns the panic into a 500.
    #[must_use]
    #[allow(clippy::panic)]
    pub fn failure(message: impl Into<String>, status: StatusCode) -> Self {
        match Self::try_failure(message, status) {
            Ok(envelope) => envelope,
            Err(err) => panic!("{err}"),
        }
    }

    /// Non-panicking form of [`HttpResponse::failure`].
    ///
    /// # Errors
    ///
    /// [`EnvelopeError::BlankErrorMessage`] when `message` is empty or whitespace.
    pub fn try_failure(message: impl Into<String>, status: StatusCode) -> Result<Self, EnvelopeError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(EnvelopeError::BlankErrorMessage);
        }
        Ok(Self {
            model: None,
            status,
            error_message: Some(message),
        })
    }

    /// Assemble an envelope without validation.
    ///
    /// Mirrors a plain data holder: an `Some("")` error message still marks
    /// the envelope as failed.
    #[must_use]
    pub fn from_parts(model: Option<T>, status: StatusCode, error_message: Option<String>) -> Self {
        Self {
            model,
            status,
            error_message,
        }
    }

    /// `true` iff no error message is present.
    #[inline]
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.error_message.is_none()
    }

    #[inline]
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    #[inline]
    #[must_use]
    pub fn model(&self) -> Option<&T> {
        self.model.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Split into `(model, status, error_message)`.
    #[must_use]
    pub fn into_parts(self) -> (Option<T>, StatusCode, Option<String>) {
        (self.model, self.status, self.error_message)
    }
}
