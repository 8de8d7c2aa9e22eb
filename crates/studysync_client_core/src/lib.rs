pub mod domain;
pub mod ports;

pub use domain::{
    AuthoringSession, CourseFields, MediaRef, ModuleDraft, ModuleFields, StepLedger,
};
pub use ports::{CatalogService, PortError, PortResult};
