use std::sync::Arc;

use autodeputy_application::{
    AssignableItem, AvailabilityResolutionEngine, AvailabilityService, ChangeRecord,
    DeputyDirectoryRepository, DeputyDirectoryService, DeputyManagementService, DeputyResolver, ProjectRepository,
    ResolutionContext, ResolutionSettings,
};
use autodeputy_domain::{
    Assignee, DeputyScope, ItemField, MoveDirection, Person, PersonId, Project, ProjectId,
    UnavailabilityWindow,
};
use chrono::NaiveDate;

use super::InMemoryDeputyRepository;
use crate::TracingDiagnosticSink;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| unreachable!())
}

#[derive(Default)]
struct Journal {
    notes: Vec<String>,
}

impl ChangeRecord for Journal {
    fn append_note(&mut self, note: &str) {
        self.notes.push(note.to_owned());
    }
}

struct Ticket {
    assignee: Option<Assignee>,
    watchers: Vec<PersonId>,
    due_date: Option<NaiveDate>,
    project_id: ProjectId,
    journal: Option<Journal>,
    errors: Vec<(ItemField, String)>,
}

impl AssignableItem for Ticket {
    fn item_id(&self) -> String {
        "42".to_owned()
    }

    fn current_assignee(&self) -> Option<&Assignee> {
        self.assignee.as_ref()
    }

    fn set_assignee(&mut self, assignee: Assignee) {
        self.assignee = Some(assignee);
    }

    fn add_watcher(&mut self, person: &Person) {
        if !self.watchers.contains(&person.id()) {
            self.watchers.push(person.id());
        }
    }

    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    fn start_date(&self) -> Option<NaiveDate> {
        None
    }

    fn current_project(&self) -> ProjectId {
        self.project_id
    }

    fn current_change_record(&mut self) -> Option<&mut dyn ChangeRecord> {
        self.journal
            .as_mut()
            .map(|journal| journal as &mut dyn ChangeRecord)
    }

    fn open_change_record(&mut self) -> &mut dyn ChangeRecord {
        self.journal.get_or_insert_with(Journal::default)
    }

    fn report_field_error(&mut self, field: ItemField, message: &str) {
        self.errors.push((field, message.to_owned()));
    }
}

fn management(repository: &Arc<InMemoryDeputyRepository>) -> DeputyManagementService {
    DeputyManagementService::new(
        DeputyDirectoryService::new(repository.clone()),
        repository.clone(),
        repository.clone(),
        repository.clone(),
        repository.clone(),
    )
}

fn engine(repository: &Arc<InMemoryDeputyRepository>) -> AvailabilityResolutionEngine {
    let availability = AvailabilityService::new(repository.clone());
    AvailabilityResolutionEngine::new(
        availability.clone(),
        repository.clone(),
        repository.clone(),
        DeputyResolver::new(
            DeputyDirectoryService::new(repository.clone()),
            availability,
            repository.clone(),
        ),
        Arc::new(TracingDiagnosticSink::new()),
        ResolutionSettings::default(),
    )
}

async fn seed_person(repository: &InMemoryDeputyRepository, name: &str) -> Person {
    let person = Person::new(PersonId::new(), name).unwrap_or_else(|_| unreachable!());
    repository.insert_person(person.clone()).await;
    person
}

async fn seed_project(
    repository: &InMemoryDeputyRepository,
    name: &str,
    parent_id: Option<ProjectId>,
    permits_deputies: bool,
) -> ProjectId {
    let project_id = ProjectId::new();
    let project = Project::new(project_id, name, parent_id, permits_deputies)
        .unwrap_or_else(|_| unreachable!());
    repository.insert_project(project).await;
    project_id
}

#[tokio::test]
async fn deputy_from_permitted_parent_project_takes_over() {
    let repository = Arc::new(InMemoryDeputyRepository::new());
    let management = management(&repository);
    let principal = seed_person(&repository, "Max Muster").await;
    let deputy = seed_person(&repository, "Dana Deputy").await;
    let acting = seed_person(&repository, "Ada Admin").await;
    let parent = seed_project(&repository, "Operations", None, true).await;
    let child = seed_project(&repository, "Operations Support", Some(parent), false).await;

    let created = management
        .create_deputy(principal.id(), deputy.id(), DeputyScope::Project(parent))
        .await;
    assert!(created.is_ok());
    let granted = management.set_permissions(principal.id(), vec![parent]).await;
    assert!(granted.is_ok());
    let unavailable = management
        .set_availabilities(
            principal.id(),
            vec![UnavailabilityWindow::new(date(2026, 11, 2), date(2026, 11, 6))
                .unwrap_or_else(|_| unreachable!())],
        )
        .await;
    assert!(unavailable.is_ok());

    let mut ticket = Ticket {
        assignee: Some(Assignee::Individual(principal.clone())),
        watchers: Vec::new(),
        due_date: Some(date(2026, 11, 4)),
        project_id: child,
        journal: None,
        errors: Vec::new(),
    };
    let context = ResolutionContext {
        acting_user_id: acting.id(),
        today: date(2026, 10, 18),
    };

    let outcome = engine(&repository)
        .check_assignee_availability(&mut ticket, &context)
        .await;

    assert!(outcome.assignee_changed());
    assert_eq!(ticket.assignee, Some(Assignee::Individual(deputy)));
    assert_eq!(ticket.watchers, vec![principal.id()]);
    assert_eq!(
        ticket.journal.map(|journal| journal.notes),
        Some(vec![
            "Assignee changed to Dana Deputy because Max Muster is unavailable.".to_owned()
        ])
    );
    assert!(ticket.errors.is_empty());
}

#[tokio::test]
async fn projects_are_listed_by_name() {
    let repository = InMemoryDeputyRepository::new();
    seed_project(&repository, "Zeta", None, true).await;
    seed_project(&repository, "Alpha", None, false).await;

    let names: Vec<String> = repository
        .list_projects()
        .await
        .unwrap_or_else(|_| unreachable!())
        .into_iter()
        .map(|project| project.name().to_owned())
        .collect();

    assert_eq!(names, vec!["Alpha".to_owned(), "Zeta".to_owned()]);
}

#[tokio::test]
async fn failed_directory_mutation_leaves_roster_untouched() {
    let repository = Arc::new(InMemoryDeputyRepository::new());
    let management = management(&repository);
    let principal = seed_person(&repository, "Max Muster").await;
    let deputy = seed_person(&repository, "Dana Deputy").await;

    let created = management
        .create_deputy(principal.id(), deputy.id(), DeputyScope::AllProjects)
        .await;
    assert!(created.is_ok());
    let duplicate = management
        .create_deputy(principal.id(), deputy.id(), DeputyScope::AllProjects)
        .await;
    assert!(duplicate.is_err());

    let listed = management
        .list_deputies(principal.id())
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].entry.rank(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_directory_edits_keep_ranks_dense() {
    let repository = Arc::new(InMemoryDeputyRepository::new());
    let principal_id = PersonId::new();

    let mut handles = Vec::new();
    for task in 0..32_usize {
        let repository = repository.clone();
        handles.push(tokio::spawn(async move {
            let scope = if task % 2 == 0 {
                DeputyScope::AllProjects
            } else {
                DeputyScope::Project(ProjectId::from_uuid(uuid::Uuid::nil()))
            };
            let entry = repository
                .append_entry(principal_id, PersonId::new(), scope)
                .await?;
            let direction = if task % 4 < 2 {
                MoveDirection::Up
            } else {
                MoveDirection::Down
            };
            repository
                .reorder_entry(principal_id, entry.id(), direction)
                .await?;
            if task % 3 == 0 {
                repository.remove_entry(principal_id, entry.id()).await?;
            }
            autodeputy_core::AppResult::Ok(())
        }));
    }
    for handle in handles {
        let joined = handle.await.unwrap_or_else(|_| unreachable!());
        assert!(joined.is_ok());
    }

    let roster = repository
        .load_roster(principal_id)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(roster.entries().len(), 21);
    for scope in [
        DeputyScope::AllProjects,
        DeputyScope::Project(ProjectId::from_uuid(uuid::Uuid::nil())),
    ] {
        let mut ranks: Vec<u32> = roster
            .entries()
            .into_iter()
            .filter(|entry| entry.scope() == scope)
            .map(|entry| entry.rank())
            .collect();
        ranks.sort_unstable();
        let expected: Vec<u32> = (0..u32::try_from(ranks.len()).unwrap_or(u32::MAX)).collect();
        assert_eq!(ranks, expected);
    }
}
