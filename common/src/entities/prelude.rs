pub use super::colleges::Entity as Colleges;
pub use super::org_members::Entity as OrgMembers;
pub use super::organizations::Entity as Organizations;
pub use super::programs::Entity as Programs;
pub use super::students::Entity as Students;
