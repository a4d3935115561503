pub mod mocks;

pub use mocks::{api_commit, FetchCall, MockHistoryClient};
