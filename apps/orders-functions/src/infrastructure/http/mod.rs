//! HTTP Event Adapter
//!
//! Invocation event and response envelope shared by every function.

mod request;
mod response;

pub use request::{HttpEvent, HttpMethod};
pub use response::{
    BAD_REQUEST, CREATED, HttpResponse, INTERNAL_SERVER_ERROR, METHOD_NOT_ALLOWED, NOT_FOUND, OK,
    ResponseBody,
};
