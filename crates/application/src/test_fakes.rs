//! Port fakes shared by the service tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use autodeputy_core::{AppError, AppResult};
use autodeputy_domain::{
    Assignee, DeputyEntry, DeputyEntryId, DeputyRoster, DeputyScope, ItemField, MoveDirection,
    Person, PersonId, Project, ProjectId, UnavailabilityWindow,
};
use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::{
    AssignableItem, AvailabilityRepository, AvailabilityResolutionEngine, AvailabilityService,
    ChangeRecord, DeputyDirectoryRepository, DeputyDirectoryService, DeputyPermissionRepository,
    DeputyResolver, DiagnosticEntry, DiagnosticSink, PersonRepository, ProjectRepository,
    ProjectScopeResolver, ResolutionSettings,
};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| unreachable!())
}

pub fn person(name: &str) -> Person {
    Person::new(PersonId::new(), name).unwrap_or_else(|_| unreachable!())
}

pub fn window(from: NaiveDate, to: NaiveDate) -> UnavailabilityWindow {
    UnavailabilityWindow::new(from, to).unwrap_or_else(|_| unreachable!())
}

#[derive(Default)]
pub struct FakePersonRepository {
    people: Mutex<HashMap<PersonId, Person>>,
}

impl FakePersonRepository {
    pub async fn insert(&self, person: &Person) {
        self.people.lock().await.insert(person.id(), person.clone());
    }
}

#[async_trait]
impl PersonRepository for FakePersonRepository {
    async fn find_person(&self, person_id: PersonId) -> AppResult<Option<Person>> {
        Ok(self.people.lock().await.get(&person_id).cloned())
    }
}

#[derive(Default)]
pub struct FakeProjectRepository {
    projects: Mutex<Vec<Project>>,
}

impl FakeProjectRepository {
    pub async fn insert(&self, project: Project) {
        self.projects.lock().await.push(project);
    }
}

#[async_trait]
impl ProjectRepository for FakeProjectRepository {
    async fn find_project(&self, project_id: ProjectId) -> AppResult<Option<Project>> {
        Ok(self
            .projects
            .lock()
            .await
            .iter()
            .find(|project| project.id() == project_id)
            .cloned())
    }

    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        Ok(self.projects.lock().await.clone())
    }
}

#[derive(Default)]
pub struct FakePermissionRepository {
    grants: Mutex<HashMap<PersonId, Vec<ProjectId>>>,
}

#[async_trait]
impl DeputyPermissionRepository for FakePermissionRepository {
    async fn list_permitted_projects(&self, person_id: PersonId) -> AppResult<Vec<ProjectId>> {
        Ok(self
            .grants
            .lock()
            .await
            .get(&person_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_permitted_projects(
        &self,
        person_id: PersonId,
        project_ids: Vec<ProjectId>,
    ) -> AppResult<()> {
        self.grants.lock().await.insert(person_id, project_ids);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeAvailabilityRepository {
    windows: Mutex<HashMap<PersonId, Vec<UnavailabilityWindow>>>,
    failing: Mutex<bool>,
    lookups: Mutex<usize>,
}

impl FakeAvailabilityRepository {
    pub async fn fail_lookups(&self) {
        *self.failing.lock().await = true;
    }

    pub async fn lookup_count(&self) -> usize {
        *self.lookups.lock().await
    }
}

#[async_trait]
impl AvailabilityRepository for FakeAvailabilityRepository {
    async fn list_windows(&self, person_id: PersonId) -> AppResult<Vec<UnavailabilityWindow>> {
        *self.lookups.lock().await += 1;
        if *self.failing.lock().await {
            return Err(AppError::Internal("Bad thing happened".to_owned()));
        }

        Ok(self
            .windows
            .lock()
            .await
            .get(&person_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_windows(
        &self,
        person_id: PersonId,
        windows: Vec<UnavailabilityWindow>,
    ) -> AppResult<()> {
        self.windows.lock().await.insert(person_id, windows);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeDirectoryRepository {
    entries: Mutex<HashMap<PersonId, Vec<DeputyEntry>>>,
}

impl FakeDirectoryRepository {
    async fn mutate<T>(
        &self,
        principal_id: PersonId,
        mutation: impl FnOnce(&mut DeputyRoster) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut entries = self.entries.lock().await;
        let stored = entries.remove(&principal_id).unwrap_or_default();
        let mut roster = DeputyRoster::new(principal_id, stored)?;
        let result = mutation(&mut roster);
        entries.insert(principal_id, roster.into_entries());
        result
    }
}

#[async_trait]
impl DeputyDirectoryRepository for FakeDirectoryRepository {
    async fn load_roster(&self, principal_id: PersonId) -> AppResult<DeputyRoster> {
        let entries = self
            .entries
            .lock()
            .await
            .get(&principal_id)
            .cloned()
            .unwrap_or_default();
        DeputyRoster::new(principal_id, entries)
    }

    async fn append_entry(
        &self,
        principal_id: PersonId,
        deputy_id: PersonId,
        scope: DeputyScope,
    ) -> AppResult<DeputyEntry> {
        self.mutate(principal_id, |roster| roster.append(deputy_id, scope))
            .await
    }

    async fn reorder_entry(
        &self,
        principal_id: PersonId,
        entry_id: DeputyEntryId,
        direction: MoveDirection,
    ) -> AppResult<()> {
        self.mutate(principal_id, |roster| {
            roster.reorder(entry_id, direction).map(|_| ())
        })
        .await
    }

    async fn remove_entry(
        &self,
        principal_id: PersonId,
        entry_id: DeputyEntryId,
    ) -> AppResult<DeputyEntry> {
        self.mutate(principal_id, |roster| {
            roster.remove(entry_id).map(|removal| removal.removed)
        })
        .await
    }
}

#[derive(Default)]
pub struct RecordingDiagnosticSink {
    entries: StdMutex<Vec<DiagnosticEntry>>,
}

impl RecordingDiagnosticSink {
    pub fn entries(&self) -> Vec<DiagnosticEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl DiagnosticSink for RecordingDiagnosticSink {
    fn log_error(&self, entry: &DiagnosticEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry.clone());
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeChangeRecord {
    pub notes: Vec<String>,
}

impl ChangeRecord for FakeChangeRecord {
    fn append_note(&mut self, note: &str) {
        self.notes.push(note.to_owned());
    }
}

#[derive(Debug)]
pub struct FakeItem {
    pub assignee: Option<Assignee>,
    pub watchers: BTreeSet<PersonId>,
    pub due_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub project_id: ProjectId,
    pub change_record: Option<FakeChangeRecord>,
    pub opened_change_records: usize,
    pub field_errors: Vec<(ItemField, String)>,
}

impl FakeItem {
    pub fn new(assignee: Option<Assignee>, project_id: ProjectId) -> Self {
        Self {
            assignee,
            watchers: BTreeSet::new(),
            due_date: None,
            start_date: None,
            project_id,
            change_record: None,
            opened_change_records: 0,
            field_errors: Vec::new(),
        }
    }

    pub fn notes(&self) -> Vec<String> {
        self.change_record
            .as_ref()
            .map(|record| record.notes.clone())
            .unwrap_or_default()
    }
}

impl AssignableItem for FakeItem {
    fn item_id(&self) -> String {
        "1".to_owned()
    }

    fn current_assignee(&self) -> Option<&Assignee> {
        self.assignee.as_ref()
    }

    fn set_assignee(&mut self, assignee: Assignee) {
        self.assignee = Some(assignee);
    }

    fn add_watcher(&mut self, person: &Person) {
        self.watchers.insert(person.id());
    }

    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    fn current_project(&self) -> ProjectId {
        self.project_id
    }

    fn current_change_record(&mut self) -> Option<&mut dyn ChangeRecord> {
        self.change_record
            .as_mut()
            .map(|record| record as &mut dyn ChangeRecord)
    }

    fn open_change_record(&mut self) -> &mut dyn ChangeRecord {
        self.opened_change_records += 1;
        self.change_record.get_or_insert_with(FakeChangeRecord::default)
    }

    fn report_field_error(&mut self, field: ItemField, message: &str) {
        self.field_errors.push((field, message.to_owned()));
    }
}

/// Every port fake wired into one set of services.
#[derive(Default)]
pub struct Harness {
    pub people: Arc<FakePersonRepository>,
    pub projects: Arc<FakeProjectRepository>,
    pub permissions: Arc<FakePermissionRepository>,
    pub availability: Arc<FakeAvailabilityRepository>,
    pub directory: Arc<FakeDirectoryRepository>,
    pub sink: Arc<RecordingDiagnosticSink>,
}

impl Harness {
    pub fn directory_service(&self) -> DeputyDirectoryService {
        DeputyDirectoryService::new(self.directory.clone())
    }

    pub fn availability_service(&self) -> AvailabilityService {
        AvailabilityService::new(self.availability.clone())
    }

    pub fn scope_resolver(&self, inherit_ancestor_scopes: bool) -> ProjectScopeResolver {
        let settings = ResolutionSettings {
            inherit_ancestor_scopes,
            ..ResolutionSettings::default()
        };
        ProjectScopeResolver::new(self.projects.clone(), self.permissions.clone(), &settings)
    }

    pub fn deputy_resolver(&self) -> DeputyResolver {
        DeputyResolver::new(
            self.directory_service(),
            self.availability_service(),
            self.people.clone(),
        )
    }

    pub fn engine(&self) -> AvailabilityResolutionEngine {
        self.engine_with(ResolutionSettings::default())
    }

    pub fn engine_with(&self, settings: ResolutionSettings) -> AvailabilityResolutionEngine {
        AvailabilityResolutionEngine::new(
            self.availability_service(),
            self.projects.clone(),
            self.permissions.clone(),
            self.deputy_resolver(),
            self.sink.clone(),
            settings,
        )
    }

    pub async fn add_person(&self, name: &str) -> Person {
        let value = person(name);
        self.people.insert(&value).await;
        value
    }

    pub async fn add_project(
        &self,
        parent_id: Option<ProjectId>,
        permits_deputies: bool,
    ) -> ProjectId {
        let project_id = ProjectId::new();
        let project = Project::new(project_id, "Project", parent_id, permits_deputies)
            .unwrap_or_else(|_| unreachable!());
        self.projects.insert(project).await;
        project_id
    }

    pub async fn set_unavailable(&self, person: &Person, from: NaiveDate, to: NaiveDate) {
        let result = self
            .availability
            .replace_windows(person.id(), vec![window(from, to)])
            .await;
        assert!(result.is_ok());
    }

    pub async fn add_deputy(&self, principal: &Person, deputy: &Person, scope: DeputyScope) {
        let result = self
            .directory
            .append_entry(principal.id(), deputy.id(), scope)
            .await;
        assert!(result.is_ok());
    }
}
