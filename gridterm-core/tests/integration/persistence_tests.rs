//! Saving and restoring the workspace through the configuration directory

use std::fs;

use gridterm_core::layout::LayoutId;
use gridterm_core::{ConfigError, ConfigManager, Project, ProjectState, Settings, Workspace};
use tempfile::TempDir;

fn manager() -> (TempDir, ConfigManager) {
    let dir = TempDir::new().expect("temp dir");
    let manager = ConfigManager::with_config_dir(dir.path().join("gridterm"));
    (dir, manager)
}

#[test]
fn workspace_round_trips_through_disk() {
    let (_dir, manager) = manager();
    let mut workspace = Workspace::new();
    let api = workspace
        .add_project(Project::new("api", "/srv/api", LayoutId::Grid2x2))
        .unwrap();
    let web = workspace
        .add_project(Project::new("web", "/srv/web", LayoutId::Cols3))
        .unwrap();
    workspace.set_active_project(web).unwrap();
    workspace.close_pane(api, 3).unwrap();
    workspace.close_pane(web, 0).unwrap();
    // Pending transitions are not part of the saved state.
    workspace.request_layout_change(api, LayoutId::Solo).unwrap();

    manager.save_state(&workspace.to_state()).unwrap();
    let restored = Workspace::from_state(manager.load_state().unwrap());

    assert_eq!(restored.projects(), workspace.projects());
    assert_eq!(restored.active_project().map(|p| p.id), Some(web));
    assert_eq!(restored.layout(api).unwrap(), LayoutId::Grid2x2);
    assert_eq!(restored.closed_indices(api), vec![3]);
    assert_eq!(restored.closed_indices(web), vec![0]);
    assert!(restored.pending_transition(api).is_none());
}

#[test]
fn damaged_state_is_repaired_on_load() {
    let (_dir, manager) = manager();
    let project = Project::new("api", "/srv/api", LayoutId::SideBySide);
    let id = project.id;
    let stranger = Project::new("gone", "/srv/gone", LayoutId::Solo).id;

    let mut state = ProjectState::new();
    state.projects.push(project);
    state.active = Some(stranger);
    state.closed.insert(id, vec![1, 1, 20]);
    state.closed.insert(stranger, vec![0]);
    manager.save_state(&state).unwrap();

    let workspace = Workspace::from_state(manager.load_state().unwrap());
    assert_eq!(workspace.closed_indices(id), vec![1]);
    assert!(workspace.closed_indices(stranger).is_empty());
    assert_eq!(workspace.active_project().map(|p| p.id), Some(id));
}

#[test]
fn unknown_layout_in_saved_state_is_rejected() {
    let (_dir, manager) = manager();
    let project = Project::new("api", "/srv/api", LayoutId::Grid2x2);
    let mut state = ProjectState::new();
    state.projects.push(project);
    let json = state.to_json().unwrap().replace("grid-2x2", "grid-5x5");

    fs::create_dir_all(manager.config_dir()).unwrap();
    fs::write(manager.state_path(), json).unwrap();
    assert!(matches!(
        manager.load_state(),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn settings_drive_new_projects_and_timing() {
    let (_dir, manager) = manager();
    fs::create_dir_all(manager.config_dir()).unwrap();
    fs::write(
        manager.settings_path(),
        "[grid]\ndefault_layout = \"grid-3x3\"\n\n[session]\nresize_debounce_ms = 120\n",
    )
    .unwrap();

    let settings: Settings = manager.load_settings().unwrap();
    let project = Project::from_root("/srv/tools", settings.grid.default_layout);
    assert_eq!(project.layout().pane_count, 9);
    assert_eq!(
        settings.session.timing().resize_debounce,
        std::time::Duration::from_millis(120)
    );
}
