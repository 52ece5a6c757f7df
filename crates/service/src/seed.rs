//! Mock data loader for local development and demos.
//!
//! Wipes the student and interaction collections, then inserts a small
//! fixed cast of students and a timeline for each of them.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use models::{timestamp::Millis, Interaction, Progress, Student};
use rand::Rng;
use serde_json::Number;
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::storage::DocumentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub students: usize,
    pub interactions: usize,
}

struct MockStudent {
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    grade_level: &'static str,
    country: &'static str,
    gpa: f64,
    sat: Option<(u32, u32)>,
    app_status: &'static str,
    last_active_days_ago: f64,
    colleges_selected_count: u32,
    ai_questions_asked: u32,
    high_intent_score: u32,
    needs_essay_help: bool,
}

struct MockInteraction {
    email: &'static str,
    kind: &'static str,
    subtype: &'static str,
    details: &'static str,
    days_ago: f64,
    team_member: Option<&'static str>,
}

const STUDENTS: &[MockStudent] = &[
    MockStudent {
        name: "Anya Sharma",
        email: "anya.sharma@gmail.com",
        phone: "123-456-7890",
        grade_level: "Junior",
        country: "India",
        gpa: 3.9,
        sat: Some((750, 780)),
        app_status: "Applying",
        last_active_days_ago: 1.0,
        colleges_selected_count: 15,
        ai_questions_asked: 85,
        high_intent_score: 92,
        needs_essay_help: false,
    },
    MockStudent {
        name: "Ben Carter",
        email: "ben.carter@gmail.com",
        phone: "234-567-8901",
        grade_level: "Sophomore",
        country: "USA",
        gpa: 3.2,
        sat: None,
        app_status: "Exploring",
        last_active_days_ago: 10.0,
        colleges_selected_count: 2,
        ai_questions_asked: 3,
        high_intent_score: 30,
        needs_essay_help: false,
    },
    MockStudent {
        name: "Chloe Wong",
        email: "chloe.wong@gmail.com",
        phone: "345-678-9012",
        grade_level: "Senior",
        country: "Canada",
        gpa: 3.5,
        sat: Some((650, 680)),
        app_status: "Shortlisting",
        last_active_days_ago: 8.0,
        colleges_selected_count: 8,
        ai_questions_asked: 40,
        high_intent_score: 65,
        needs_essay_help: true,
    },
    MockStudent {
        name: "David Lee",
        email: "david.lee@gmail.com",
        phone: "456-789-0123",
        grade_level: "Senior",
        country: "UK",
        gpa: 4.0,
        sat: Some((800, 800)),
        app_status: "Submitted",
        last_active_days_ago: 2.0,
        colleges_selected_count: 20,
        ai_questions_asked: 100,
        high_intent_score: 100,
        needs_essay_help: false,
    },
];

const INTERACTIONS: &[MockInteraction] = &[
    MockInteraction { email: "anya.sharma@gmail.com", kind: "Activity", subtype: "Login", details: "User logged in.", days_ago: 0.5, team_member: None },
    MockInteraction { email: "anya.sharma@gmail.com", kind: "Activity", subtype: "AI Question", details: "Asked 5 questions about university scholarships.", days_ago: 0.8, team_member: None },
    MockInteraction { email: "anya.sharma@gmail.com", kind: "Document", subtype: "Essay Draft", details: "Saved first draft of UCAS personal statement.", days_ago: 1.2, team_member: None },
    MockInteraction { email: "ben.carter@gmail.com", kind: "Activity", subtype: "College Select", details: "Added \"UT Austin\" to My Colleges.", days_ago: 15.0, team_member: None },
    MockInteraction { email: "ben.carter@gmail.com", kind: "Communication", subtype: "Email Sent", details: "Welcome Email sent: Guide to Sophomore Success.", days_ago: 10.0, team_member: Some("System") },
    MockInteraction { email: "ben.carter@gmail.com", kind: "Communication", subtype: "SMS Follow-up", details: "Sent SMS link to GPA Calculator tool.", days_ago: 5.0, team_member: Some("Alex M.") },
    MockInteraction { email: "chloe.wong@gmail.com", kind: "Communication", subtype: "Called", details: "Team member called to discuss essay topics. Left voicemail.", days_ago: 8.0, team_member: Some("Sarah J.") },
    MockInteraction { email: "chloe.wong@gmail.com", kind: "Note", subtype: "Internal", details: "Need to send Chloe information about Canadian university deadlines. Follow up next week.", days_ago: 7.0, team_member: Some("Sarah J.") },
    MockInteraction { email: "david.lee@gmail.com", kind: "Activity", subtype: "Resume Upload", details: "Final version of resume uploaded for review.", days_ago: 2.0, team_member: None },
    MockInteraction { email: "david.lee@gmail.com", kind: "Note", subtype: "Internal", details: "High potential student. Move to post-submission mentoring queue.", days_ago: 1.0, team_member: Some("Team Lead") },
];

/// Readiness summary implied by an application status.
pub fn progress_for<R: Rng>(app_status: &str, rng: &mut R) -> Progress {
    let (resume_uploaded, activities_added_count): (bool, u32) = match app_status {
        "Submitted" => (true, rng.gen_range(5..=15)),
        "Applying" => (true, rng.gen_range(3..=8)),
        "Shortlisting" => (false, rng.gen_range(1..=3)),
        _ => (false, 0),
    };
    Progress {
        resume_uploaded: Some(resume_uploaded),
        activities_added_count: Some(activities_added_count.into()),
        ..Default::default()
    }
}

/// A moment `days_ago` days back, jittered by another 1..=24 hours.
fn past_millis<R: Rng>(days_ago: f64, rng: &mut R) -> Millis {
    let back = Duration::milliseconds((days_ago * 86_400_000.0) as i64) + Duration::hours(rng.gen_range(1..=24));
    (Utc::now() - back).timestamp_millis()
}

fn mock_students<R: Rng>(rng: &mut R) -> Vec<Student> {
    STUDENTS
        .iter()
        .map(|m| Student {
            name: Some(m.name.into()),
            email: Some(m.email.into()),
            phone: Some(m.phone.into()),
            grade_level: Some(m.grade_level.into()),
            country: Some(m.country.into()),
            gpa: Number::from_f64(m.gpa),
            sat_e: m.sat.map(|(e, _)| e.into()),
            sat_m: m.sat.map(|(_, s)| s.into()),
            app_status: Some(m.app_status.into()),
            last_active_timestamp: Some(past_millis(m.last_active_days_ago, rng)),
            colleges_selected_count: Some(m.colleges_selected_count.into()),
            ai_questions_asked: Some(m.ai_questions_asked.into()),
            high_intent_score: Some(m.high_intent_score.into()),
            needs_essay_help: Some(m.needs_essay_help),
            progress: Some(progress_for(m.app_status, rng)),
            ..Default::default()
        })
        .collect()
}

fn mock_interactions<R: Rng>(ids_by_email: &HashMap<String, String>, rng: &mut R) -> Vec<Interaction> {
    INTERACTIONS
        .iter()
        .filter_map(|m| {
            let Some(student_id) = ids_by_email.get(m.email) else {
                warn!(email = m.email, "no seeded student for interaction; skipping");
                return None;
            };
            Some(Interaction {
                student_id: student_id.clone(),
                kind: Some(m.kind.into()),
                subtype: Some(m.subtype.into()),
                details: Some(m.details.into()),
                team_member: m.team_member.map(str::to_string),
                timestamp: Some(past_millis(m.days_ago, rng)),
                ..Default::default()
            })
        })
        .collect()
}

/// Replace both collections with the mock data set.
pub async fn seed(
    store: &dyn DocumentStore,
    students_collection: &str,
    interactions_collection: &str,
) -> Result<SeedReport, ServiceError> {
    let cleared = store.clear(students_collection).await?;
    info!(collection = %students_collection, cleared, "cleared existing students");

    let students = mock_students(&mut rand::thread_rng());
    let mut ids_by_email = HashMap::new();
    for student in &students {
        let id = store.create(students_collection, student.to_document()?).await?;
        if let Some(email) = &student.email {
            ids_by_email.insert(email.clone(), id);
        }
    }
    info!(count = students.len(), "seeded students");

    let cleared = store.clear(interactions_collection).await?;
    info!(collection = %interactions_collection, cleared, "cleared existing interactions");

    let interactions = mock_interactions(&ids_by_email, &mut rand::thread_rng());
    for interaction in &interactions {
        store.create(interactions_collection, interaction.to_document()?).await?;
    }
    info!(count = interactions.len(), "seeded interactions");

    Ok(SeedReport { students: students.len(), interactions: interactions.len() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{directory::DirectoryService, test_support::temp_store, timeline::TimelineService};
    use rand::{rngs::StdRng, SeedableRng};
    use std::sync::Arc;

    fn summary(p: &Progress) -> (bool, u64) {
        (
            p.resume_uploaded.unwrap_or_default(),
            p.activities_added_count.as_ref().and_then(Number::as_u64).unwrap_or_default(),
        )
    }

    #[test]
    fn progress_follows_status() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let (uploaded, count) = summary(&progress_for("Submitted", &mut rng));
            assert!(uploaded && (5..=15).contains(&count));
            let (uploaded, count) = summary(&progress_for("Applying", &mut rng));
            assert!(uploaded && (3..=8).contains(&count));
            let (uploaded, count) = summary(&progress_for("Shortlisting", &mut rng));
            assert!(!uploaded && (1..=3).contains(&count));
        }
        let exploring = progress_for("Exploring", &mut rng);
        assert_eq!(exploring.resume_uploaded, Some(false));
        assert_eq!(exploring.activities_added_count, Some(0u32.into()));
    }

    #[test]
    fn past_millis_is_in_the_past() {
        let mut rng = StdRng::seed_from_u64(1);
        let before = Utc::now().timestamp_millis();
        let t = past_millis(0.5, &mut rng);
        let after = Utc::now().timestamp_millis();
        assert!(t <= after - 13 * 3_600_000);
        assert!(t >= before - 36 * 3_600_000);
    }

    #[tokio::test]
    async fn seed_replaces_collections() {
        let (store, _dir) = temp_store().await;
        store
            .create("Students", crate::test_support::doc(serde_json::json!({"name": "stale"})))
            .await
            .unwrap();

        let report = seed(store.as_ref(), "Students", "Interactions").await.unwrap();
        assert_eq!(report, SeedReport { students: 4, interactions: 10 });

        // running twice does not duplicate
        seed(store.as_ref(), "Students", "Interactions").await.unwrap();

        let directory = DirectoryService::new(Arc::clone(&store), "Students");
        let students = directory.list_students().await.unwrap();
        assert_eq!(students.len(), 4);
        assert!(students.iter().all(|s| s.name.as_deref() != Some("stale")));

        let chloe = students.iter().find(|s| s.email.as_deref() == Some("chloe.wong@gmail.com")).unwrap();
        let timeline = TimelineService::new(Arc::clone(&store), "Interactions");
        let items = timeline.list_interactions(&chloe.id).await.unwrap();
        assert_eq!(items.len(), 2);
        // the note (7 days ago) is newer than the call (8 days ago)
        assert_eq!(items[0].kind.as_deref(), Some("Note"));

        let full = directory.get_student(&chloe.id).await.unwrap();
        assert_eq!(full.progress.and_then(|p| p.resume_uploaded), Some(false));
    }
}
