pub mod comment;
pub mod error_group;
pub mod error_report;
pub mod ingest_outcome;
pub mod occurrence;
pub mod tag;
pub mod user;
pub mod view;

pub use comment::Comment;
pub use error_group::{ErrorGroup, RowClass};
pub use error_report::{ErrorReport, Frame, JsonMap};
pub use ingest_outcome::IngestOutcome;
pub use occurrence::Occurrence;
pub use tag::Tag;
pub use user::UserRef;
pub use view::View;
