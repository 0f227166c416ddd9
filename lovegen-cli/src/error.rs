use crate::exit_codes;
use lovegen_gemini::GeminiError;
use lovegen_project::ProjectSaveError;
use std::error::Error as _;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LovegenError {
    #[error("{0} is not implemented yet")]
    NotImplemented(&'static str),

    #[error("{env_var} environment variable not set")]
    MissingCredential { env_var: String },

    #[error("an error occurred while communicating with Gemini")]
    Gemini(#[from] GeminiError),

    #[error("Gemini returned no Lua code once code fences were removed")]
    EmptyCode,

    #[error("failed to save generated code")]
    Save(#[from] ProjectSaveError),
}

impl LovegenError {
    pub fn exit_code(&self) -> u8 {
        match self {
            LovegenError::NotImplemented(_) => exit_codes::NOT_IMPLEMENTED,
            LovegenError::MissingCredential { .. } => exit_codes::CONFIG_ERROR,
            LovegenError::Gemini(GeminiError::MissingApiKey) => exit_codes::CONFIG_ERROR,
            LovegenError::Gemini(GeminiError::Http(_)) => exit_codes::TRANSPORT_ERROR,
            LovegenError::Gemini(GeminiError::EmptyResponse { .. }) => exit_codes::EMPTY_RESPONSE,
            LovegenError::EmptyCode => exit_codes::EMPTY_RESPONSE,
            LovegenError::Save(_) => exit_codes::IO_ERROR,
        }
    }

    /// Lines shown to the user: the error with its causes, then any hints.
    pub fn report(&self) -> Vec<String> {
        let mut lines = vec![format!("Error: {}", self.describe())];

        match self {
            LovegenError::MissingCredential { env_var } => lines.push(format!(
                "Set {env_var} in your environment or in a .env file in the working directory."
            )),
            LovegenError::Gemini(error) => {
                if let Some(feedback) = error.feedback() {
                    lines.push(format!("Prompt feedback: {feedback}"));
                }
                if let GeminiError::EmptyResponse {
                    finish_reason: Some(reason),
                    ..
                } = error
                {
                    lines.push(format!("Finish reason: {reason}"));
                }
            }
            _ => {}
        }

        lines
    }

    fn describe(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

pub type Result<T> = std::result::Result<T, LovegenError>;
