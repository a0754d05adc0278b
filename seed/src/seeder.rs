use crate::error::{SeedError, SeedResult};
use crate::generator::DataGenerator;
use chrono::NaiveDate;
use common::repositories::{
    is_unique_violation, CollegeRepository, CollegeRepositoryImpl, NewOrganization, NewStudent,
    OrgMemberRepository, OrgMemberRepositoryImpl, OrganizationRepository,
    OrganizationRepositoryImpl, ProgramRepository, ProgramRepositoryImpl, StudentRepository,
    StudentRepositoryImpl,
};
use common::settings::SeedSettings;
use sea_orm::{DatabaseConnection, DbErr};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

pub const DEFAULT_COLLEGE: &str = "Default College";
pub const DEFAULT_PROGRAM: &str = "General Program";

/// Attempt counts for one seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPlan {
    pub organizations: u32,
    pub students: u32,
    pub members: u32,
}

impl From<&SeedSettings> for SeedPlan {
    fn from(settings: &SeedSettings) -> Self {
        Self {
            organizations: settings.organizations,
            students: settings.students,
            members: settings.members,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Organizations,
    Students,
    Memberships,
}

impl Step {
    fn label(self) -> &'static str {
        match self {
            Step::Organizations => "Organizations",
            Step::Students => "Students",
            Step::Memberships => "Memberships",
        }
    }
}

/// Outcome of one batch step. `created <= attempted` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub step: Step,
    pub created: u32,
    pub attempted: u32,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created: {} (attempted {})",
            self.step.label(),
            self.created,
            self.attempted
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedRelations {
    pub created_college: bool,
    pub created_program: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub relations: SeedRelations,
    pub organizations: StepReport,
    pub students: StepReport,
    /// `None` when there were no students or organizations to link.
    pub memberships: Option<StepReport>,
}

/// The repositories a [`Seeder`] writes through.
#[derive(Clone)]
pub struct SeedRepositories {
    pub colleges: Arc<dyn CollegeRepository>,
    pub programs: Arc<dyn ProgramRepository>,
    pub organizations: Arc<dyn OrganizationRepository>,
    pub students: Arc<dyn StudentRepository>,
    pub members: Arc<dyn OrgMemberRepository>,
}

impl SeedRepositories {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            colleges: Arc::new(CollegeRepositoryImpl::new(db.clone())),
            programs: Arc::new(ProgramRepositoryImpl::new(db.clone())),
            organizations: Arc::new(OrganizationRepositoryImpl::new(db.clone())),
            students: Arc::new(StudentRepositoryImpl::new(db.clone())),
            members: Arc::new(OrgMemberRepositoryImpl::new(db)),
        }
    }
}

pub struct Seeder<G> {
    colleges: Arc<dyn CollegeRepository>,
    programs: Arc<dyn ProgramRepository>,
    organizations: Arc<dyn OrganizationRepository>,
    students: Arc<dyn StudentRepository>,
    members: Arc<dyn OrgMemberRepository>,
    generator: G,
    today: NaiveDate,
}

impl<G: DataGenerator> Seeder<G> {
    pub fn new(db: Arc<DatabaseConnection>, generator: G) -> Self {
        Self::with_repositories(SeedRepositories::new(db), generator)
    }

    pub fn with_repositories(repos: SeedRepositories, generator: G) -> Self {
        Self {
            colleges: repos.colleges,
            programs: repos.programs,
            organizations: repos.organizations,
            students: repos.students,
            members: repos.members,
            generator,
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Overrides the date join dates are counted back from.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Runs every step in order, writing one line per step to `out`.
    ///
    /// Missing membership prerequisites are reported on `out` and end the
    /// run normally; database failures abort it.
    pub async fn run(&mut self, plan: &SeedPlan, out: &mut dyn Write) -> SeedResult<SeedSummary> {
        let relations = self.ensure_seed_relations().await?;
        if relations.created_college {
            writeln!(out, "Created {}", DEFAULT_COLLEGE)?;
        }
        if relations.created_program {
            writeln!(out, "Created {}", DEFAULT_PROGRAM)?;
        }

        let organizations = self.create_organization(plan.organizations).await?;
        writeln!(out, "{}", organizations)?;

        let students = self.create_students(plan.students).await?;
        writeln!(out, "{}", students)?;

        let memberships = match self.create_membership(plan.members).await {
            Ok(report) => {
                writeln!(out, "{}", report)?;
                Some(report)
            }
            Err(SeedError::MissingPrerequisites) => {
                tracing::error!("{}", SeedError::MissingPrerequisites);
                writeln!(out, "{}", SeedError::MissingPrerequisites)?;
                None
            }
            Err(err) => return Err(err),
        };

        Ok(SeedSummary {
            relations,
            organizations,
            students,
            memberships,
        })
    }

    /// Makes sure at least one college and one program exist.
    pub async fn ensure_seed_relations(&mut self) -> Result<SeedRelations, DbErr> {
        let mut relations = SeedRelations::default();

        if self.colleges.count().await? == 0 {
            self.colleges.create(DEFAULT_COLLEGE).await?;
            tracing::warn!("Created {}", DEFAULT_COLLEGE);
            relations.created_college = true;
        }

        if self.programs.count().await? == 0 {
            let college = self
                .colleges
                .first()
                .await?
                .ok_or_else(|| DbErr::RecordNotFound("colleges".to_string()))?;
            self.programs.create(DEFAULT_PROGRAM, college.id).await?;
            tracing::warn!("Created {} under {}", DEFAULT_PROGRAM, college);
            relations.created_program = true;
        }

        Ok(relations)
    }

    pub async fn create_organization(&mut self, count: u32) -> Result<StepReport, DbErr> {
        let college_ids = self.colleges.all_ids().await?;
        let mut created = 0;

        for _ in 0..count {
            let name = self.generator.organization_name();
            let college_id = self.pick(&college_ids);
            let description = self.generator.description();

            let (organization, was_created) = self
                .organizations
                .get_or_create(NewOrganization {
                    name,
                    college_id,
                    description: Some(description),
                })
                .await?;

            if was_created {
                created += 1;
            } else {
                tracing::debug!("Organization {} already exists, skipping", organization);
            }
        }

        Ok(self.finish(Step::Organizations, created, count))
    }

    pub async fn create_students(&mut self, count: u32) -> Result<StepReport, DbErr> {
        let program_ids = self.programs.all_ids().await?;
        let mut created = 0;

        for _ in 0..count {
            let student_id = self.generator.student_id();
            let program_id = self.pick(&program_ids);
            let params = NewStudent {
                student_id,
                lastname: self.generator.last_name(),
                firstname: self.generator.first_name(),
                middlename: Some(self.generator.middle_name()),
                program_id,
            };

            let (student, was_created) = self.students.get_or_create(params).await?;
            if was_created {
                created += 1;
            } else {
                tracing::debug!("Student {} already exists, skipping", student.student_id);
            }
        }

        Ok(self.finish(Step::Students, created, count))
    }

    /// Links random (student, organization) pairs, drawn independently and
    /// with replacement, so repeated pairs are expected and skipped.
    pub async fn create_membership(&mut self, count: u32) -> SeedResult<StepReport> {
        let student_ids = self.students.all_ids().await?;
        let organization_ids = self.organizations.all_ids().await?;

        if student_ids.is_empty() || organization_ids.is_empty() {
            return Err(SeedError::MissingPrerequisites);
        }

        let mut created = 0;
        for _ in 0..count {
            let (Some(student_id), Some(organization_id)) =
                (self.pick(&student_ids), self.pick(&organization_ids))
            else {
                return Err(SeedError::MissingPrerequisites);
            };
            let date_joined = self.generator.date_joined(self.today);

            match self
                .members
                .get_or_create(student_id, organization_id, date_joined)
                .await
            {
                Ok((_, true)) => created += 1,
                Ok((_, false)) => tracing::debug!(
                    "Student {} already belongs to organization {}, skipping",
                    student_id,
                    organization_id
                ),
                Err(err) if is_unique_violation(&err) => tracing::debug!(
                    "Membership {}/{} was created concurrently, skipping",
                    student_id,
                    organization_id
                ),
                Err(err) => return Err(err.into()),
            }
        }

        Ok(self.finish(Step::Memberships, created, count))
    }

    fn pick(&mut self, ids: &[i32]) -> Option<i32> {
        if ids.is_empty() {
            return None;
        }
        ids.get(self.generator.pick_index(ids.len())).copied()
    }

    fn finish(&self, step: Step, created: u32, attempted: u32) -> StepReport {
        let report = StepReport {
            step,
            created,
            attempted,
        };
        tracing::info!("{}", report);
        report
    }
}
