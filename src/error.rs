use crate::domain::DrivetrainKind;

/// Failures raised by the calculation core.
///
/// An absent result is not an error; it propagates as `None`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("Parameter `{parameter}` must be within [0, 1], got {value}.")]
    WeightRatioOutOfRange { parameter: &'static str, value: f64 },

    #[error("No drivetrain factor configured for {0}.")]
    MissingDrivetrainFactor(DrivetrainKind),

    #[error("Drivetrain factor for {kind} must be a positive number, got {value}.")]
    InvalidDrivetrainFactor { kind: DrivetrainKind, value: f64 },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<CalcError> for AppError {
    fn from(err: CalcError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
