//! hilink-core - Vendor contract types for the Hi-Link Mode2 bridge
//!
//! This crate defines the types shared by the correlation client and the
//! HTTP gateway:
//! - [`CollectDataType`] - the vendor request-kind enumeration
//! - [`RequestMessage`] / [`ResponseMessage`] - what travels through the
//!   vendor exchange queues
//! - [`models`] - the record shapes the vendor SDK returns
//! - [`VendorResultCode`] - the result-code dictionary
//! - [`AccessPolicy`] - read-only vs. control authorization

pub mod data_type;
pub mod error;
pub mod message;
pub mod models;
pub mod policy;
pub mod result_code;

pub use data_type::{CollectDataType, UnknownDataType};
pub use error::{BridgeError, BridgeResult};
pub use message::{RequestData, RequestMessage, ResponseData, ResponseMessage};
pub use policy::AccessPolicy;
pub use result_code::{
    describe_failure, describe_missing_code, reply_succeeded, VendorResultCode,
};
