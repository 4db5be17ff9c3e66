//! End-to-end grid scenarios on the workspace

use gridterm_core::layout::LayoutId;
use gridterm_core::{GridError, LayoutChange, Project, Workspace, WorkspaceError};

#[test]
fn shrink_2x2_to_solo_then_grow_back() {
    let mut workspace = Workspace::new();
    let id = workspace
        .add_project(Project::new("api", "/srv/api", LayoutId::Grid2x2))
        .unwrap();

    let change = workspace.request_layout_change(id, LayoutId::Solo).unwrap();
    let LayoutChange::Pending(pending) = change else {
        panic!("shrinking must wait for confirmation");
    };
    assert_eq!(pending.from_count, 4);
    assert_eq!(pending.to_count, 1);
    assert_eq!(pending.deficit(), 3);
    assert_eq!(workspace.layout(id).unwrap(), LayoutId::Grid2x2);

    let committed = workspace.confirm_transition(id, &[1, 2, 3]).unwrap();
    assert_eq!(committed.newly_closed, vec![1, 2, 3]);
    assert_eq!(workspace.layout(id).unwrap(), LayoutId::Solo);
    assert_eq!(workspace.closed_indices(id), vec![1, 2, 3]);
    let live: Vec<usize> = workspace.live_panes().iter().map(|p| p.key.index).collect();
    assert_eq!(live, vec![0]);

    // Growing back does not reopen anything.
    let change = workspace
        .request_layout_change(id, LayoutId::Grid2x2)
        .unwrap();
    assert!(matches!(change, LayoutChange::Committed(_)));
    assert_eq!(workspace.closed_indices(id), vec![1, 2, 3]);
    assert_eq!(workspace.visible_panes(id).unwrap(), vec![0]);

    assert!(workspace.reopen_pane(id, 2).unwrap());
    assert_eq!(workspace.visible_panes(id).unwrap(), vec![0, 2]);
    assert_eq!(workspace.closed_indices(id), vec![1, 3]);
}

#[test]
fn rejected_confirmation_keeps_layout() {
    let mut workspace = Workspace::new();
    let id = workspace
        .add_project(Project::new("web", "/srv/web", LayoutId::Grid3x3))
        .unwrap();
    workspace
        .request_layout_change(id, LayoutId::SideBySide)
        .unwrap();

    let err = workspace.confirm_transition(id, &[8, 7]).unwrap_err();
    assert!(matches!(
        err,
        WorkspaceError::Grid(GridError::SelectionMismatch {
            expected: 7,
            actual: 2
        })
    ));
    assert_eq!(workspace.layout(id).unwrap(), LayoutId::Grid3x3);
    assert!(workspace.pending_transition(id).is_some());

    assert!(workspace.cancel_transition(id).is_some());
    assert!(workspace.pending_transition(id).is_none());
    assert!(workspace.closed_indices(id).is_empty());
    assert_eq!(workspace.visible_panes(id).unwrap().len(), 9);
}

#[test]
fn custom_selection_keeps_chosen_panes() {
    let mut workspace = Workspace::new();
    let id = workspace
        .add_project(Project::new("ops", "/srv/ops", LayoutId::Grid2x2))
        .unwrap();
    workspace
        .request_layout_change(id, LayoutId::SideBySide)
        .unwrap();

    // Keep panes 2 and 3 running, close 0 and 1.
    let committed = workspace.confirm_transition(id, &[0, 1]).unwrap();
    assert_eq!(committed.newly_closed, vec![0, 1]);
    assert!(workspace.visible_panes(id).unwrap().is_empty());
    assert_eq!(workspace.closed_indices(id), vec![0, 1]);
}

#[test]
fn switching_projects_keeps_every_pane_live() {
    let mut workspace = Workspace::new();
    let a = workspace
        .add_project(Project::new("a", "/srv/a", LayoutId::SideBySide))
        .unwrap();
    let b = workspace
        .add_project(Project::new("b", "/srv/b", LayoutId::Cols3))
        .unwrap();
    assert_eq!(workspace.active_project().map(|p| p.id), Some(a));

    let before = workspace.live_panes();
    workspace.set_active_project(b).unwrap();
    assert_eq!(workspace.active_project().map(|p| p.id), Some(b));
    assert_eq!(workspace.live_panes(), before);
    assert_eq!(before.len(), 5);
}

#[test]
fn removing_a_project_drops_its_panes_and_pending_change() {
    let mut workspace = Workspace::new();
    let a = workspace
        .add_project(Project::new("a", "/srv/a", LayoutId::Grid2x2))
        .unwrap();
    let b = workspace
        .add_project(Project::new("b", "/srv/b", LayoutId::Solo))
        .unwrap();
    workspace.close_pane(a, 1).unwrap();
    workspace.request_layout_change(a, LayoutId::Solo).unwrap();

    workspace.remove_project(a).unwrap();
    assert!(workspace.pending_transition(a).is_none());
    assert!(workspace.closed_indices(a).is_empty());
    assert_eq!(workspace.active_project().map(|p| p.id), Some(b));
    assert!(workspace.live_panes().iter().all(|p| p.key.project == b));
}
