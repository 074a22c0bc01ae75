use crate::blockchain::wallet::sol_to_lamports;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use thiserror::Error;

/// Addresses up to this many characters are shown in full.
pub const DISPLAY_TRUNCATE_THRESHOLD: usize = 12;
/// Characters kept on each side of a truncated address.
pub const DISPLAY_EDGE_CHARS: usize = 6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingParameter(String),

    #[error("Invalid Solana address: {0}")]
    InvalidSolanaAddress(String),

    #[error("Amount must be a number: {0}")]
    InvalidAmount(String),

    #[error("Amount must be greater than 0")]
    NonPositiveAmount,

    #[error("Amount is smaller than 1 lamport (0.000000001 SOL): {0}")]
    BelowOneLamport(String),

    #[error("Insufficient balance: requested {requested} SOL but only {available} SOL available")]
    InsufficientBalance { requested: f64, available: f64 },
}

/// Structural check only: can the string be parsed as an address? Says
/// nothing about whether the account exists or is funded.
pub fn is_valid_address(address: &str) -> bool {
    Pubkey::from_str(address).is_ok()
}

pub fn validate_solana_address(address: &str) -> Result<Pubkey, ValidationError> {
    if address.trim().is_empty() {
        return Err(ValidationError::MissingParameter("Recipient address".to_string()));
    }

    Pubkey::from_str(address).map_err(|_| ValidationError::InvalidSolanaAddress(address.to_string()))
}

pub fn validate_amount(amount: &str) -> Result<f64, ValidationError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(ValidationError::MissingParameter("Amount".to_string()));
    }

    let value: f64 = amount
        .parse()
        .map_err(|_| ValidationError::InvalidAmount(amount.to_string()))?;
    if !value.is_finite() {
        return Err(ValidationError::InvalidAmount(amount.to_string()));
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    if sol_to_lamports(value) == 0 {
        return Err(ValidationError::BelowOneLamport(amount.to_string()));
    }

    Ok(value)
}

/// UX guard against the locally cached balance. The cluster enforces the
/// real limit.
pub fn validate_against_balance(requested: f64, available: f64) -> Result<(), ValidationError> {
    if requested > available {
        return Err(ValidationError::InsufficientBalance { requested, available });
    }
    Ok(())
}

/// Shorten long addresses to `prefix...suffix`; short ones pass through.
pub fn format_address_for_display(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= DISPLAY_TRUNCATE_THRESHOLD {
        return address.to_string();
    }

    let prefix: String = chars[..DISPLAY_EDGE_CHARS].iter().collect();
    let suffix: String = chars[chars.len() - DISPLAY_EDGE_CHARS..].iter().collect();
    format!("{}...{}", prefix, suffix)
}

/// A send-form submission that passed input validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub recipient: Pubkey,
    pub amount: f64,
}

/// Per-field errors for the send form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferFormErrors {
    pub recipient: Option<ValidationError>,
    pub amount: Option<ValidationError>,
}

impl TransferFormErrors {
    pub fn is_empty(&self) -> bool {
        self.recipient.is_none() && self.amount.is_none()
    }
}

impl TransferRequest {
    /// Validate raw form input. Both fields are checked so every problem can
    /// be shown at once.
    pub fn parse(recipient: &str, amount: &str) -> Result<Self, TransferFormErrors> {
        let recipient = validate_solana_address(recipient.trim());
        let amount = validate_amount(amount);

        match (recipient, amount) {
            (Ok(recipient), Ok(amount)) => Ok(Self { recipient, amount }),
            (recipient, amount) => Err(TransferFormErrors {
                recipient: recipient.err(),
                amount: amount.err(),
            }),
        }
    }
}
