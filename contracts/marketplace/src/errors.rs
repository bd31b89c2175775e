use soroban_sdk::contracttype;

/// Error categories for classifying marketplace failures.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCategory {
    /// Contract lifecycle: missing or repeated initialization
    Lifecycle = 1,
    /// Invalid input parameters
    Validation = 2,
    /// Caller role or ownership check failed
    Authorization = 3,
    /// Listing lookup failed
    NotFound = 4,
    /// The request conflicts with the caller's current ledger state
    StateConflict = 5,
}

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    NoMatchingRecords = 5,
    NotFound = 6,
    NoCredit = 7,
    InsufficientCredit = 8,
}

impl ContractError {
    /// Returns the error category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContractError::NotInitialized | ContractError::AlreadyInitialized => {
                ErrorCategory::Lifecycle
            }
            ContractError::InvalidInput | ContractError::NoMatchingRecords => {
                ErrorCategory::Validation
            }
            ContractError::Unauthorized => ErrorCategory::Authorization,
            ContractError::NotFound => ErrorCategory::NotFound,
            ContractError::NoCredit | ContractError::InsufficientCredit => {
                ErrorCategory::StateConflict
            }
        }
    }

    /// Whether the caller can succeed by correcting its own request.
    ///
    /// `NotFound`, `NoCredit` and `InsufficientCredit` need a state change
    /// first; the contract never retries anything itself.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            ContractError::Unauthorized | ContractError::InvalidInput
        )
    }

    /// Caller-facing reason for the failure.
    pub fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Marketplace has not been initialized",
            ContractError::AlreadyInitialized => "Marketplace is already initialized",
            ContractError::Unauthorized => "Caller is not allowed to perform this action!",
            ContractError::InvalidInput => "Invalid input parameters provided",
            ContractError::NoMatchingRecords => "No medical records of matching types to sell!",
            ContractError::NotFound => "Listing does not exist!",
            ContractError::NoCredit => "No MT!",
            ContractError::InsufficientCredit => "Not enough MT for this action!",
        }
    }
}
