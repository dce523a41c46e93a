pub mod actor;
pub mod conducteur;
pub mod ids;
pub mod macros;
pub mod notification;
pub mod program;
pub mod time;
pub mod validation;

pub use actor::*;
pub use conducteur::*;
pub use ids::*;
pub use notification::*;
pub use program::*;
pub use time::*;
pub use validation::{FieldIssue, ValidationErrors};
