//! Summary/timeline/distribution aggregations over form responses (§4.11,
//! C11). Pure functions over an already-fetched response slice — no
//! repository of its own, the same shape as `access-control`.

pub mod aggregate;
pub mod models;

pub use aggregate::{distribution, summary, timeline};
pub use models::{QuestionDistribution, Summary, TimelinePoint};
