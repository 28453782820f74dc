//! HTML presentation of the job store.

mod page;
mod salary;

pub use page::{render_page, PageRenderer, MISSING_STORE_MESSAGE, NO_JOBS_MESSAGE};
pub use salary::{format_salary, SALARY_NOT_SPECIFIED};
