//! HTTP value types shared by the application, the server and the test client.

mod request;
mod response;

pub use request::{AppRequest, Method};
pub use response::{AppResponse, StatusCode};
