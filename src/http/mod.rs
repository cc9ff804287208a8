//! HTTP request execution shared by the `http` probe and the load tester.
mod client;
mod executor;
mod payload;


pub use client::ReqwestExecutor;
pub use executor::{
    ExecutionRequest, ExecutionResult, NO_RESPONSE_STATUS, RequestExecutor, ResponseBody,
};
pub use payload::Payload;
