/// Scoped cloud credentials: environment changes that undo themselves.
pub mod providers;
pub mod scope;

pub use providers::{AwsCredentials, with_aws_auth, with_gcp_auth};
