//! # Doctor Form
//!
//! Client-side state for adding and editing a doctor:
//! - [`FormController`]: draft, inline errors, postal-code lookup and submission
//! - [`SpecialityPicker`]: multi-select over the speciality catalog
//! - HTTP collaborators for the directory API ([`HttpPostalCodeResolver`],
//!   [`HttpSubmissionGateway`])
//!
//! Validation is server-authoritative. The form only maps reported violations onto fields.

pub mod controller;
pub mod error;
pub mod error_map;
pub mod gateway;
pub mod notification;
pub mod picker;
pub mod resolver;

pub use controller::{
    Delivery, FormController, FormMode, LookupStatus, Navigation, PostalLookupTicket,
    SubmissionState, SubmissionTicket, POSTAL_CODE_NOT_FOUND,
};
pub use error::{FormError, FormResult};
pub use error_map::ValidationErrorMap;
pub use gateway::{HttpSubmissionGateway, SubmissionGateway, SubmissionOutcome, SubmissionTarget};
pub use notification::Notice;
pub use picker::{PickerOption, SpecialityPicker};
pub use resolver::{HttpPostalCodeResolver, PostalCodeResolver, Resolution, ResolvedAddress};
