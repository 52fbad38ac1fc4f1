//! Out-of-band maintenance tools.
//!
//! These run against the same datastore as the API but outside the
//! running service, through the same domain operations:
//!
//! ```text
//! studylearn-tools seed-subjects
//! studylearn-tools create-admin --email a@x.com --name Admin --password secret1
//! studylearn-tools cleanup-emails [--apply]
//! ```

use clap::{Parser, Subcommand};
use core_config::{tracing::install_color_eyre, FromEnv};
use database::postgres::{connect_from_config, PostgresConfig};
use domain_catalog::{CatalogService, CreateSubject, PgCatalogRepository, SubjectFilter};
use domain_users::{
    CreateUser, PgUserRepository, UpdateUser, UserFilter, UserService,
};
use validator::ValidateEmail;

#[derive(Parser)]
#[command(name = "studylearn-tools", about = "StudyLearn maintenance tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Seed the standard course catalog when the database is empty
    SeedSubjects,
    /// Create an admin user, or promote an existing one
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
    /// Find users with malformed emails; --apply hard-deletes them
    CleanupEmails {
        #[arg(long)]
        apply: bool,
    },
}

/// The standard catalog, matching the seed data the library page expects
const SEED_SUBJECTS: &[(&str, &str)] = &[
    (
        "Mathematics Fundamentals",
        "Core mathematical concepts including algebra, geometry, and basic calculus.",
    ),
    (
        "Computer Science Basics",
        "Introduction to programming, algorithms, and data structures.",
    ),
    (
        "Physics Principles",
        "Classical mechanics, thermodynamics, and electromagnetism.",
    ),
    (
        "English Literature",
        "Analysis of classic and contemporary literature.",
    ),
    (
        "Biology Essentials",
        "Cell biology, genetics, and ecology.",
    ),
    (
        "Chemistry Foundations",
        "Atomic structure, chemical bonding, and reactions.",
    ),
    (
        "History & Social Studies",
        "World history, government, and social systems.",
    ),
    (
        "Art & Design",
        "Visual arts, design principles, and creative expression.",
    ),
];

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let cli = Cli::parse();

    let db = connect_from_config(PostgresConfig::from_env()?)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    match cli.command {
        Command::SeedSubjects => seed_subjects(db).await,
        Command::CreateAdmin {
            email,
            name,
            password,
        } => create_admin(db, email, name, password).await,
        Command::CleanupEmails { apply } => cleanup_emails(db, apply).await,
    }
}

async fn seed_subjects(db: database::DatabaseConnection) -> eyre::Result<()> {
    let service = CatalogService::new(PgCatalogRepository::new(db));

    let existing = service
        .list_subjects(SubjectFilter {
            limit: 1000,
            ..Default::default()
        })
        .await
        .map_err(|e| eyre::eyre!("{}", e))?;

    println!("Current subjects in database: {}", existing.len());

    if existing.len() >= 3 {
        println!("Database already has subjects, skipping seed");
        return Ok(());
    }

    let existing_names: Vec<&str> = existing.iter().map(|s| s.name.as_str()).collect();

    for (name, description) in SEED_SUBJECTS {
        if existing_names.contains(name) {
            println!("  skipped (exists): {}", name);
            continue;
        }

        service
            .create_subject(CreateSubject {
                name: (*name).to_string(),
                description: Some((*description).to_string()),
            })
            .await
            .map_err(|e| eyre::eyre!("{}", e))?;

        println!("  added: {}", name);
    }

    println!("Seeding complete");
    Ok(())
}

async fn create_admin(
    db: database::DatabaseConnection,
    email: String,
    name: String,
    password: String,
) -> eyre::Result<()> {
    use domain_users::repository::UserRepository;

    let repository = PgUserRepository::new(db);
    let service = UserService::new(repository.clone());

    if let Some(existing) = repository
        .get_by_email(&email)
        .await
        .map_err(|e| eyre::eyre!("{}", e))?
    {
        if existing.is_admin {
            println!("User {} is already an admin", email);
            return Ok(());
        }

        service
            .update_user(
                existing.id,
                UpdateUser {
                    is_admin: Some(true),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| eyre::eyre!("{}", e))?;

        println!("User {} has been promoted to admin", email);
        return Ok(());
    }

    let user = service
        .create_user(CreateUser {
            email,
            full_name: name,
            password,
            is_admin: true,
        })
        .await
        .map_err(|e| eyre::eyre!("{}", e))?;

    println!("Admin user created: id={} email={}", user.id, user.email);
    Ok(())
}

async fn cleanup_emails(db: database::DatabaseConnection, apply: bool) -> eyre::Result<()> {
    let service = UserService::new(PgUserRepository::new(db));

    let users = service
        .list_users(UserFilter {
            limit: 10_000,
            ..Default::default()
        })
        .await
        .map_err(|e| eyre::eyre!("{}", e))?;

    let malformed: Vec<_> = users
        .iter()
        .filter(|u| !u.email.validate_email())
        .collect();

    if malformed.is_empty() {
        println!("No malformed emails found");
        return Ok(());
    }

    for user in &malformed {
        println!("  malformed: id={} email={:?}", user.id, user.email);
    }

    if !apply {
        println!(
            "{} user(s) with malformed emails; re-run with --apply to delete",
            malformed.len()
        );
        return Ok(());
    }

    for user in &malformed {
        service
            .delete_user(user.id)
            .await
            .map_err(|e| eyre::eyre!("{}", e))?;
    }

    println!("Deleted {} user(s) and their dependent rows", malformed.len());
    Ok(())
}
