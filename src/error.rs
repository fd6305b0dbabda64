use crate::i18n;
use crate::models::draft::AmountField;
use crate::models::localized::Locale;
use crate::models::media::MediaKind;
use crate::utils::validation::FieldErrors;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {}", summarize(.0))]
    Validation(FieldErrors),

    #[error("Currency conversion unavailable for {field} ({currency})")]
    ConversionUnavailable { field: AmountField, currency: String },

    #[error("Negative amount for {field}")]
    NegativeAmount { field: AmountField },

    #[error("Too many {kind} files (max {max})")]
    LimitExceeded { kind: MediaKind, max: usize },

    #[error("{kind} file is too large ({size} bytes, max {max})")]
    SizeExceeded { kind: MediaKind, size: u64, max: u64 },

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn user_message(&self, locale: Locale) -> String {
        match self {
            Error::Validation(errors) => {
                let count = errors.len().to_string();
                i18n::translate_with(locale, "errors.validation", &[("count", &count)])
            }
            Error::ConversionUnavailable { field, currency } => {
                let label = field.label(locale);
                i18n::translate_with(
                    locale,
                    "errors.conversion_unavailable",
                    &[("field", &label), ("currency", currency)],
                )
            }
            Error::NegativeAmount { field } => {
                let label = field.label(locale);
                i18n::translate_with(locale, "errors.negative_amount", &[("field", &label)])
            }
            Error::LimitExceeded { kind, max } => {
                let max = max.to_string();
                i18n::translate_with(
                    locale,
                    kind.limit_message_key(),
                    &[("max", &max)],
                )
            }
            Error::SizeExceeded { kind, max, .. } => {
                let max_mb = (max / (1024 * 1024)).to_string();
                i18n::translate_with(locale, kind.size_message_key(), &[("max", &max_mb)])
            }
            Error::UploadFailed(msg) => verbatim_or(locale, msg, "errors.upload_failed"),
            Error::Transport(msg) => verbatim_or(locale, msg, "errors.generic"),
            Error::NotFound(_) => i18n::translate(locale, "errors.not_found"),
            _ => i18n::translate(locale, "errors.generic"),
        }
    }
}

fn verbatim_or(locale: Locale, msg: &str, fallback_key: &str) -> String {
    if msg.trim().is_empty() {
        i18n::translate(locale, fallback_key)
    } else {
        msg.to_string()
    }
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("{}: {}", field, msg))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Transport("Request timed out".to_string())
        } else if err.is_decode() {
            Error::Transport(format!("Invalid response body: {}", err))
        } else {
            Error::Transport(err.to_string())
        }
    }
}
