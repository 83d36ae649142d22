use crate::utils::output::OutputStyle;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Prompt '{0}' not found")]
    NotFound(String),

    #[error("A prompt with ID '{0}' already exists")]
    DuplicateId(String),

    #[error("Analysis service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Analysis service timed out after {0}s")]
    ServiceTimeout(u64),

    #[error("Corrupt prompt file {path}: {reason}")]
    CorruptRecord { path: String, reason: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("System error: {0}")]
    System(String),
}

impl AppError {
    /// Errors the interactive session reports and then keeps running after
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::Io(_) | AppError::System(_))
    }
}

/// Result type alias for consistent error handling across the application
pub type AppResult<T> = Result<T, AppError>;

pub enum FlowResult {
    NotFound {
        item_type: String,
        search_term: String,
    },
    EmptyList {
        item_type: String,
    },
    Cancelled(String),
    Success(String),
}

pub fn report_error(err: &AppError) {
    match err {
        AppError::NotFound(_) | AppError::DuplicateId(_) => {
            println!("⚠️  {}", OutputStyle::warning(&err.to_string()));
        }
        AppError::ServiceUnavailable(_) | AppError::ServiceTimeout(_) => {
            println!("🌐 {}", OutputStyle::warning(&err.to_string()));
        }
        AppError::CorruptRecord { .. } => {
            eprintln!("⚠️  {}", OutputStyle::warning(&err.to_string()));
        }
        AppError::Validation(msg) => {
            println!("❌ {}", OutputStyle::error(msg));
        }
        AppError::Io(msg) | AppError::System(msg) => {
            eprintln!("❌ {}", OutputStyle::error(msg));
        }
    }
}

/// Report an error coming out of command glue, using the typed presentation
/// when the root cause is an [`AppError`]
pub fn report_any(err: &anyhow::Error) {
    match err.downcast_ref::<AppError>() {
        Some(app_err) => report_error(app_err),
        None => eprintln!("❌ {}", OutputStyle::error(&format!("{:#}", err))),
    }
}

pub fn handle_flow(flow: FlowResult) {
    match flow {
        FlowResult::NotFound {
            item_type,
            search_term,
        } => {
            let msg = format!("{} '{}' not found", item_type, search_term);
            println!("⚠️  {}", OutputStyle::warning(&msg));
        }
        FlowResult::EmptyList { item_type } => {
            let msg = format!("No {} found", item_type);
            println!("{}", OutputStyle::muted(&msg));
        }
        FlowResult::Cancelled(msg) => {
            println!("⏹️  {}", OutputStyle::muted(&msg));
        }
        FlowResult::Success(msg) => {
            println!("✅ {}", OutputStyle::success(&msg));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_kinds() {
        assert!(AppError::NotFound("x".into()).is_recoverable());
        assert!(AppError::Validation("empty".into()).is_recoverable());
        assert!(AppError::ServiceTimeout(30).is_recoverable());
        assert!(!AppError::Io("permission denied".into()).is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::CorruptRecord {
            path: "public/general/a.json".into(),
            reason: "expected value".into(),
        };
        assert_eq!(
            err.to_string(),
            "Corrupt prompt file public/general/a.json: expected value"
        );
        assert_eq!(
            AppError::ServiceTimeout(5).to_string(),
            "Analysis service timed out after 5s"
        );
    }
}
