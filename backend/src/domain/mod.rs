//! Domain primitives, the transformation pipeline and its ports.
//!
//! Purpose: keep conversion logic and entity rules free of transport and
//! storage concerns. Inbound adapters talk to the [`ports::DocumentConversion`]
//! driving port and the repository ports; outbound adapters implement the
//! driven ports.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — transport-agnostic error payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Project / Documentation — persisted metadata records.
//! - ConversionService — pipeline-backed conversion driving port.

pub mod conversion_service;
pub mod documentation;
pub mod error;
pub mod openapi;
pub mod ports;
pub mod project;
pub mod trace_id;

pub use self::conversion_service::ConversionService;
pub use self::documentation::{Documentation, DocumentationValidationError, NewDocumentation};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::project::{NewProject, Project, ProjectValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use schemaforge::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
