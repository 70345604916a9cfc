//! `pwpolicy-auth`: password policy enforcement after a directory bind.
//!
//! This crate is intentionally decoupled from the directory transport and from
//! any UI: it consumes a bound entry and produces a policy decision.

pub mod account_control;
pub mod attributes;
pub mod classifier;
pub mod configuration;
pub mod date;
pub mod directory;
pub mod error_type;
pub mod expiration;
pub mod handler;
pub mod outcome;
pub mod settings;
pub mod status;

pub use account_control::{AccountControl, AccountControlFlag};
pub use attributes::{AttributeReadError, AttributeSource, Attributes, extract};
pub use classifier::{ErrorDefinition, classify_error};
pub use configuration::PolicyConfiguration;
pub use date::{
    ActiveDirectoryConverter, DateConversionError, DateConverter, EpochOffsetConverter, EpochUnit,
    GeneralizedTimeConverter,
};
pub use directory::{
    BindOutcome, Credentials, DirectoryAccount, DirectoryAuthenticator, DirectoryEntry, DirectoryError,
    InMemoryDirectory,
};
pub use error_type::ErrorType;
pub use expiration::{ExpirationCheck, examine_password_expiration};
pub use handler::PasswordPolicyHandler;
pub use outcome::{AuthenticationOutcome, ExpirationWarning, FlowEvent, Rejection};
pub use settings::{PolicyAttributes, PolicySettings};
pub use status::{AccountStatusViolation, examine_account_status};
