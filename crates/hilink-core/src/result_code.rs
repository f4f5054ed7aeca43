//! Hi-Link vendor result codes
//!
//! Every vendor response record carries a small integer `result`. Zero means
//! success; the non-zero values below have fixed diagnostics. The dictionary
//! only enriches responses and never drives control flow.

use std::fmt;

use crate::CollectDataType;

/// Vendor result codes with a known meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorResultCode {
    Success,
    LicenseNotActivated,
    LinkLimitExceededType2,
    LinkLimitExceededType1,
    SerialNotVerifiable,
    ActivationLoginFailed,
    ActivationServerUnreachable,
    CncCommunicationError,
    CncDriverMissing,
    InvalidSerialNumber,
    SerialRegisteredElsewhere,
    UidAlreadyRegistered,
    InvalidHandle,
    InvalidControllerType,
    /// The vendor uses both 89 and -89; the original value is kept
    UnregisteredUid(i32),
    Unknown(i32),
}

impl From<i32> for VendorResultCode {
    fn from(value: i32) -> Self {
        match value {
            0 => Self::Success,
            -99 => Self::LicenseNotActivated,
            -32 => Self::LinkLimitExceededType2,
            -31 => Self::LinkLimitExceededType1,
            -23 => Self::SerialNotVerifiable,
            -22 => Self::ActivationLoginFailed,
            -21 => Self::ActivationServerUnreachable,
            -16 => Self::CncCommunicationError,
            -15 => Self::CncDriverMissing,
            21 => Self::InvalidSerialNumber,
            22 => Self::SerialRegisteredElsewhere,
            88 => Self::UidAlreadyRegistered,
            -8 => Self::InvalidHandle,
            -7 => Self::InvalidControllerType,
            89 | -89 => Self::UnregisteredUid(value),
            other => Self::Unknown(other),
        }
    }
}

impl From<VendorResultCode> for i32 {
    fn from(code: VendorResultCode) -> Self {
        match code {
            VendorResultCode::Success => 0,
            VendorResultCode::LicenseNotActivated => -99,
            VendorResultCode::LinkLimitExceededType2 => -32,
            VendorResultCode::LinkLimitExceededType1 => -31,
            VendorResultCode::SerialNotVerifiable => -23,
            VendorResultCode::ActivationLoginFailed => -22,
            VendorResultCode::ActivationServerUnreachable => -21,
            VendorResultCode::CncCommunicationError => -16,
            VendorResultCode::CncDriverMissing => -15,
            VendorResultCode::InvalidSerialNumber => 21,
            VendorResultCode::SerialRegisteredElsewhere => 22,
            VendorResultCode::UidAlreadyRegistered => 88,
            VendorResultCode::InvalidHandle => -8,
            VendorResultCode::InvalidControllerType => -7,
            VendorResultCode::UnregisteredUid(v) => v,
            VendorResultCode::Unknown(v) => v,
        }
    }
}

impl VendorResultCode {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Fixed diagnostic for this code, if the vendor documents one
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Success | Self::Unknown(_) => None,
            Self::LicenseNotActivated => Some("Activate the Hi-Link license."),
            Self::LinkLimitExceededType2 => Some("Machine link limit exceeded (Type2)."),
            Self::LinkLimitExceededType1 => Some("Machine link limit exceeded (Type1)."),
            Self::SerialNotVerifiable => {
                Some("Serial number could not be verified. Contact Hi-Link support.")
            }
            Self::ActivationLoginFailed => Some(
                "Cannot log in to the online activation server. Check the internet connection.",
            ),
            Self::ActivationServerUnreachable => Some(
                "Cannot reach the online activation server. Check the internet connection.",
            ),
            Self::CncCommunicationError => Some(
                "CNC communication error: check machine power, communication cable, IP and port.",
            ),
            Self::CncDriverMissing => Some(
                "No driver for this CNC type. Check whether the CNC type is supported.",
            ),
            Self::InvalidSerialNumber => {
                Some("Invalid serial number. Enter the serial number exactly.")
            }
            Self::SerialRegisteredElsewhere => {
                Some("Serial number is already activated on another PC.")
            }
            Self::UidAlreadyRegistered => Some("UID is already registered."),
            Self::InvalidHandle => Some("Invalid communication handle."),
            Self::InvalidControllerType => Some("Invalid CNC controller type."),
            Self::UnregisteredUid(_) => Some("Machine UID is not registered."),
        }
    }
}

impl fmt::Display for VendorResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code: i32 = (*self).into();
        match self.message() {
            Some(msg) => write!(f, "{} ({})", msg, code),
            None => write!(f, "result {}", code),
        }
    }
}

/// Whether a reply to `data_type` carrying `code` counts as success.
///
/// A present code must be 0. A missing code is a success unless the kind
/// [requires one](CollectDataType::requires_result_code).
pub fn reply_succeeded(data_type: CollectDataType, code: Option<i32>) -> bool {
    match code {
        Some(code) => VendorResultCode::from(code).is_success(),
        None => !data_type.requires_result_code(),
    }
}

/// Diagnostic for a reply that should have carried a result code but did not
pub fn describe_missing_code(uid: &str, data_type: CollectDataType) -> String {
    format!(
        "Hi-Link request returned no result code (uid={}, type={})",
        uid, data_type
    )
}

/// Generic diagnostic for a failed exchange with no dictionary entry
pub fn describe_failure(uid: &str, data_type: CollectDataType, code: i32) -> String {
    format!(
        "Hi-Link request failed (uid={}, type={}, result={})",
        uid, data_type, code
    )
}
