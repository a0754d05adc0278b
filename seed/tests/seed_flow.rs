//! End-to-end seeding runs against a migrated in-memory database.

use common::entities::{colleges, org_members, organizations, programs, students};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use seed::{FakeDataGenerator, SeedPlan, Seeder};
use std::collections::HashSet;
use std::sync::Arc;

async fn setup_test_db() -> Arc<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    Arc::new(db)
}

fn parse_counts(line: &str) -> (u32, u32) {
    // "<Step> created: X (attempted Y)"
    let (_, rest) = line.split_once("created: ").expect("summary line");
    let (created, rest) = rest.split_once(" (attempted ").expect("summary line");
    let attempted = rest.trim_end_matches(')');
    (created.parse().unwrap(), attempted.parse().unwrap())
}

#[tokio::test]
async fn seeding_an_empty_store() {
    let db = setup_test_db().await;
    let mut seeder = Seeder::new(db.clone(), FakeDataGenerator::new(Some(2024)));
    let plan = SeedPlan {
        organizations: 3,
        students: 5,
        members: 4,
    };
    let mut out = Vec::new();

    let summary = seeder.run(&plan, &mut out).await.expect("seed run");

    let conn = db.as_ref();
    assert_eq!(colleges::Entity::find().count(conn).await.unwrap(), 1);
    assert_eq!(programs::Entity::find().count(conn).await.unwrap(), 1);

    let organizations = organizations::Entity::find().count(conn).await.unwrap();
    let students = students::Entity::find().count(conn).await.unwrap();
    let members = org_members::Entity::find().count(conn).await.unwrap();
    assert!((1..=3).contains(&organizations));
    assert!((1..=5).contains(&students));
    assert!(members >= 1 && members <= 4.min(students * organizations));

    assert_eq!(u64::from(summary.organizations.created), organizations);
    assert_eq!(u64::from(summary.students.created), students);
    assert_eq!(
        summary.memberships.map(|m| u64::from(m.created)),
        Some(members)
    );

    let output = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "Created Default College");
    assert_eq!(lines[1], "Created General Program");
    for (line, prefix, attempted) in [
        (lines[2], "Organizations", 3),
        (lines[3], "Students", 5),
        (lines[4], "Memberships", 4),
    ] {
        assert!(line.starts_with(prefix), "unexpected line {line:?}");
        let (created, reported_attempted) = parse_counts(line);
        assert_eq!(reported_attempted, attempted);
        assert!(created <= attempted);
    }
}

#[tokio::test]
async fn rerunning_keeps_single_defaults_and_unique_keys() {
    let db = setup_test_db().await;
    let plan = SeedPlan {
        organizations: 5,
        students: 20,
        members: 30,
    };

    for seed in [7, 7, 8] {
        let mut seeder = Seeder::new(db.clone(), FakeDataGenerator::new(Some(seed)));
        let mut out = Vec::new();
        let summary = seeder.run(&plan, &mut out).await.expect("seed run");
        assert!(summary.organizations.created <= summary.organizations.attempted);
        assert!(summary.students.created <= summary.students.attempted);
    }

    let conn = db.as_ref();
    assert_eq!(colleges::Entity::find().count(conn).await.unwrap(), 1);
    assert_eq!(programs::Entity::find().count(conn).await.unwrap(), 1);

    let orgs = organizations::Entity::find().all(conn).await.unwrap();
    let names: HashSet<&str> = orgs.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names.len(), orgs.len(), "organization names repeated");

    let students = students::Entity::find().all(conn).await.unwrap();
    let ids: HashSet<&str> = students.iter().map(|s| s.student_id.as_str()).collect();
    assert_eq!(ids.len(), students.len(), "student ids repeated");

    let members = org_members::Entity::find().all(conn).await.unwrap();
    let pairs: HashSet<(i32, i32)> = members
        .iter()
        .map(|m| (m.student_id, m.organization_id))
        .collect();
    assert_eq!(pairs.len(), members.len(), "membership pairs repeated");
}

#[tokio::test]
async fn same_seed_on_fresh_store_reproduces_data() {
    let mut snapshots = Vec::new();

    for _ in 0..2 {
        let db = setup_test_db().await;
        let mut seeder = Seeder::new(db.clone(), FakeDataGenerator::new(Some(11)));
        let plan = SeedPlan {
            organizations: 2,
            students: 3,
            members: 0,
        };
        seeder
            .run(&plan, &mut std::io::sink())
            .await
            .expect("seed run");

        let students = students::Entity::find().all(db.as_ref()).await.unwrap();
        let ids: Vec<String> = students.into_iter().map(|s| s.student_id).collect();
        snapshots.push(ids);
    }

    assert_eq!(snapshots[0], snapshots[1]);
}
