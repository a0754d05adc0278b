pub mod colleges;
pub mod org_members;
pub mod organizations;
pub mod programs;
pub mod students;

pub use colleges::{CollegeListQuery, CollegeRepository, CollegeRepositoryImpl};
pub use org_members::{MemberRow, OrgMemberListQuery, OrgMemberRepository, OrgMemberRepositoryImpl};
pub use organizations::{
    NewOrganization, OrganizationListQuery, OrganizationRepository, OrganizationRepositoryImpl,
};
pub use programs::{ProgramListQuery, ProgramRepository, ProgramRepositoryImpl};
pub use students::{NewStudent, StudentListQuery, StudentRepository, StudentRepositoryImpl};

use sea_orm::{DbErr, SqlErr};

/// True when the store rejected a write because of a unique constraint.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Normalizes a free-text search box value; blank input means "no search".
fn search_term(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|term| !term.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_term_ignores_blank_input() {
        assert_eq!(search_term(None), None);
        assert_eq!(search_term(Some("   ")), None);
        assert_eq!(search_term(Some(" chess ")), Some("chess"));
    }

    #[test]
    fn custom_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&DbErr::Custom("boom".to_string())));
        assert!(!is_unique_violation(&DbErr::RecordNotFound(
            "students".to_string()
        )));
    }
}
