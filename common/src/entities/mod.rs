pub mod colleges;
pub mod org_members;
pub mod organizations;
pub mod prelude;
pub mod programs;
pub mod students;
