use std::collections::HashSet;
use std::sync::Arc;
use validator::ValidateEmail;

use crate::error::{AdminError, AdminResult};
use crate::models::{
    BackupDocument, CleanupReport, DailyStats, DifficultyStats, OverviewStats, RestoreReport,
    SubjectStats, TopUserStats,
};
use crate::repository::SystemRepository;

pub(crate) fn email_is_valid(email: &str) -> bool {
    email.validate_email()
}

/// Service layer for the system console
#[derive(Clone)]
pub struct SystemService<R: SystemRepository> {
    repository: Arc<R>,
}

impl<R: SystemRepository> SystemService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn backup(&self) -> AdminResult<BackupDocument> {
        let document = self.repository.snapshot().await?;
        tracing::info!(
            users = document.users.len(),
            subjects = document.subjects.len(),
            "Produced backup document"
        );
        Ok(document)
    }

    /// Replace-all restore. The whole document is validated up front and
    /// applied in one transaction; the first malformed row aborts with the
    /// pre-restore state intact. (Bulk question import deliberately has
    /// the opposite, per-item contract.)
    pub async fn restore(&self, document: BackupDocument) -> AdminResult<RestoreReport> {
        validate_document(&document)?;

        let report = RestoreReport::for_document(&document);
        self.repository.restore(document).await?;

        tracing::info!(
            users = report.users,
            subjects = report.subjects,
            questions = report.questions,
            "Restore complete"
        );
        Ok(report)
    }

    pub async fn overview(&self) -> AdminResult<OverviewStats> {
        self.repository.overview().await
    }

    pub async fn by_subject(&self) -> AdminResult<Vec<SubjectStats>> {
        self.repository.by_subject().await
    }

    pub async fn by_difficulty(&self) -> AdminResult<Vec<DifficultyStats>> {
        self.repository.by_difficulty().await
    }

    pub async fn daily(&self, days: u32) -> AdminResult<Vec<DailyStats>> {
        if days == 0 || days > 365 {
            return Err(AdminError::Validation(
                "days must be between 1 and 365".to_string(),
            ));
        }

        self.repository.daily(days).await
    }

    pub async fn top_users(&self, limit: u64) -> AdminResult<Vec<TopUserStats>> {
        if limit == 0 || limit > 100 {
            return Err(AdminError::Validation(
                "limit must be between 1 and 100".to_string(),
            ));
        }

        self.repository.top_users(limit).await
    }

    pub async fn cleanup(&self) -> AdminResult<CleanupReport> {
        let report = self.repository.cleanup().await?;
        tracing::info!(
            invalid_email_users = report.invalid_email_users,
            orphaned_attempts = report.orphaned_attempts,
            orphaned_sessions = report.orphaned_sessions,
            "Cleanup sweep complete"
        );
        Ok(report)
    }
}

/// Whole-document validation for restore. The first broken row fails the
/// entire operation.
fn validate_document(doc: &BackupDocument) -> AdminResult<()> {
    let fail = |msg: String| Err(AdminError::RestoreFailed(msg));

    let mut user_ids = HashSet::new();
    let mut emails = HashSet::new();
    for user in &doc.users {
        if !user_ids.insert(user.id) {
            return fail(format!("duplicate user id {}", user.id));
        }
        if !email_is_valid(&user.email) {
            return fail(format!("user {} has an invalid email", user.id));
        }
        if !emails.insert(user.email.to_lowercase()) {
            return fail(format!("duplicate user email '{}'", user.email));
        }
    }

    let mut subject_ids = HashSet::new();
    for subject in &doc.subjects {
        if !subject_ids.insert(subject.id) {
            return fail(format!("duplicate subject id {}", subject.id));
        }
        if subject.name.is_empty() {
            return fail(format!("subject {} has an empty name", subject.id));
        }
    }

    let mut question_ids = HashSet::new();
    for question in &doc.questions {
        if !question_ids.insert(question.id) {
            return fail(format!("duplicate question id {}", question.id));
        }
        if !subject_ids.contains(&question.subject_id) {
            return fail(format!(
                "question {} references missing subject {}",
                question.id, question.subject_id
            ));
        }
    }

    let mut session_ids = HashSet::new();
    for session in &doc.practice_sessions {
        if !session_ids.insert(session.id) {
            return fail(format!("duplicate session id {}", session.id));
        }
        if !user_ids.contains(&session.user_id) {
            return fail(format!(
                "session {} references missing user {}",
                session.id, session.user_id
            ));
        }
        if !subject_ids.contains(&session.subject_id) {
            return fail(format!(
                "session {} references missing subject {}",
                session.id, session.subject_id
            ));
        }
        if !(0.0..=100.0).contains(&session.score) {
            return fail(format!("session {} has an out-of-range score", session.id));
        }
    }

    let mut attempt_ids = HashSet::new();
    for attempt in &doc.question_attempts {
        if !attempt_ids.insert(attempt.id) {
            return fail(format!("duplicate attempt id {}", attempt.id));
        }
        if !user_ids.contains(&attempt.user_id) {
            return fail(format!(
                "attempt {} references missing user {}",
                attempt.id, attempt.user_id
            ));
        }
        if !question_ids.contains(&attempt.question_id) {
            return fail(format!(
                "attempt {} references missing question {}",
                attempt.id, attempt.question_id
            ));
        }
        if !session_ids.contains(&attempt.session_id) {
            return fail(format!(
                "attempt {} references missing session {}",
                attempt.id, attempt.session_id
            ));
        }
    }

    let mut enrollment_ids = HashSet::new();
    let mut active_pairs = HashSet::new();
    for enrollment in &doc.user_enrollments {
        if !enrollment_ids.insert(enrollment.id) {
            return fail(format!("duplicate enrollment id {}", enrollment.id));
        }
        if !user_ids.contains(&enrollment.user_id) {
            return fail(format!(
                "enrollment {} references missing user {}",
                enrollment.id, enrollment.user_id
            ));
        }
        if !subject_ids.contains(&enrollment.subject_id) {
            return fail(format!(
                "enrollment {} references missing subject {}",
                enrollment.id, enrollment.subject_id
            ));
        }
        if enrollment.is_active
            && !active_pairs.insert((enrollment.user_id, enrollment.subject_id))
        {
            return fail(format!(
                "user {} has more than one active enrollment in subject {}",
                enrollment.user_id, enrollment.subject_id
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemorySystemRepository;
    use chrono::Utc;

    fn user(id: i32, email: &str) -> domain_users::entity::Model {
        domain_users::entity::Model {
            id,
            email: email.to_string(),
            full_name: "User".to_string(),
            hashed_password: "hash".to_string(),
            is_active: true,
            is_admin: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn subject(id: i32, name: &str) -> domain_catalog::entity::subject::Model {
        domain_catalog::entity::subject::Model {
            id,
            name: name.to_string(),
            description: None,
            is_active: true,
            created_at: Utc::now().into(),
        }
    }

    fn session(id: i32, user_id: i32, subject_id: i32, score: f64) -> domain_practice::entity::session::Model {
        domain_practice::entity::session::Model {
            id,
            user_id,
            subject_id,
            score,
            total_questions: 10,
            correct_answers: 5,
            time_taken: 120,
            completed_at: Utc::now().into(),
        }
    }

    fn valid_document() -> BackupDocument {
        BackupDocument {
            users: vec![user(1, "a@x.com"), user(2, "b@x.com")],
            subjects: vec![subject(1, "Math")],
            questions: vec![],
            practice_sessions: vec![session(1, 1, 1, 80.0), session(2, 2, 1, 60.0)],
            question_attempts: vec![],
            user_enrollments: vec![],
        }
    }

    fn service_with(document: BackupDocument) -> SystemService<InMemorySystemRepository> {
        SystemService::new(InMemorySystemRepository::with_state(document))
    }

    #[tokio::test]
    async fn test_backup_round_trips_through_restore() {
        let service = service_with(valid_document());

        let dump = service.backup().await.unwrap();
        let report = service.restore(dump.clone()).await.unwrap();

        assert_eq!(report.users, 2);
        assert_eq!(report.practice_sessions, 2);

        let again = service.backup().await.unwrap();
        assert_eq!(
            serde_json::to_value(&dump).unwrap(),
            serde_json::to_value(&again).unwrap()
        );
    }

    #[tokio::test]
    async fn test_backup_document_shape() {
        let service = service_with(valid_document());
        let dump = service.backup().await.unwrap();

        let json = serde_json::to_value(&dump).unwrap();
        for table in [
            "users",
            "subjects",
            "questions",
            "practice_sessions",
            "question_attempts",
            "user_enrollments",
        ] {
            assert!(json.get(table).is_some(), "missing table {}", table);
        }

        // Field list of a user row is fixed for dump interoperability
        let user_row = &json["users"][0];
        for field in [
            "id",
            "email",
            "full_name",
            "hashed_password",
            "is_active",
            "is_admin",
            "created_at",
            "updated_at",
        ] {
            assert!(user_row.get(field).is_some(), "missing user field {}", field);
        }
    }

    #[tokio::test]
    async fn test_restore_rolls_back_on_malformed_row() {
        let service = service_with(valid_document());
        let before = service.backup().await.unwrap();

        // One broken row: session pointing at a user that is not in the dump
        let mut dump = valid_document();
        dump.practice_sessions.push(session(3, 99, 1, 50.0));

        let result = service.restore(dump).await;
        assert!(matches!(result, Err(AdminError::RestoreFailed(_))));

        // Pre-restore state intact
        let after = service.backup().await.unwrap();
        assert_eq!(
            serde_json::to_value(&before).unwrap(),
            serde_json::to_value(&after).unwrap()
        );
    }

    #[tokio::test]
    async fn test_restore_rejects_invalid_email() {
        let service = service_with(BackupDocument::default());

        let mut dump = valid_document();
        dump.users.push(user(3, "not-an-email"));

        let result = service.restore(dump).await;
        assert!(matches!(result, Err(AdminError::RestoreFailed(_))));
    }

    #[tokio::test]
    async fn test_restore_rejects_double_active_enrollment() {
        let mut dump = valid_document();
        dump.user_enrollments = vec![
            domain_catalog::entity::enrollment::Model {
                id: 1,
                user_id: 1,
                subject_id: 1,
                is_active: true,
                enrolled_at: Utc::now().into(),
            },
            domain_catalog::entity::enrollment::Model {
                id: 2,
                user_id: 1,
                subject_id: 1,
                is_active: true,
                enrolled_at: Utc::now().into(),
            },
        ];

        let service = service_with(BackupDocument::default());
        let result = service.restore(dump).await;
        assert!(matches!(result, Err(AdminError::RestoreFailed(_))));
    }

    #[tokio::test]
    async fn test_overview_counts() {
        let service = service_with(valid_document());

        let stats = service.overview().await.unwrap();
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_subjects, 1);
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.average_score, 70.0);
    }

    #[tokio::test]
    async fn test_top_users_orders_by_mean_score() {
        let service = service_with(valid_document());

        let top = service.top_users(10).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].user_id, 1);
        assert_eq!(top[0].average_score, 80.0);
    }

    #[tokio::test]
    async fn test_daily_window_validation() {
        let service = service_with(valid_document());
        assert!(service.daily(0).await.is_err());
        assert!(service.daily(366).await.is_err());
        assert!(service.daily(7).await.is_ok());
    }

    #[tokio::test]
    async fn test_cleanup_removes_invalid_emails_and_orphans() {
        let mut dump = valid_document();
        // In-memory repo accepts broken state directly, mirroring a
        // datastore corrupted out-of-band
        dump.users.push(user(3, "broken-email"));
        dump.practice_sessions.push(session(3, 3, 1, 10.0));
        dump.practice_sessions.push(session(4, 77, 1, 10.0));

        let service = service_with(dump);
        let report = service.cleanup().await.unwrap();

        assert_eq!(report.invalid_email_users, 1);
        // User 3's session went with the user; session 4's owner never existed
        assert_eq!(report.orphaned_sessions, 1);

        let stats = service.overview().await.unwrap();
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_sessions, 2);
    }
}
