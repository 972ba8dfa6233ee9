//! Client side of the brokerage REST API

pub mod envelope;
pub mod remote;
pub mod rest;

pub use envelope::{ListEnvelope, MutateEnvelope};
pub use remote::RemoteDataService;
pub use rest::{ClientError, RestClient};
