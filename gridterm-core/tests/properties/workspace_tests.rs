//! Property tests for workspace pane bookkeeping

use gridterm_core::layout::{self, LayoutId};
use gridterm_core::{LayoutChange, Project, ProjectId, ProjectState, Workspace};
use proptest::prelude::*;

use super::layout_tests::layout_id_strategy;

fn shrinking_pair_strategy() -> impl Strategy<Value = (LayoutId, LayoutId)> {
    (layout_id_strategy(), layout_id_strategy()).prop_filter("target must shrink", |(a, b)| {
        layout::layout(*b).pane_count < layout::layout(*a).pane_count
    })
}

fn workspace_with(layout_id: LayoutId) -> (Workspace, ProjectId) {
    let mut workspace = Workspace::new();
    let id = workspace
        .add_project(Project::new("demo", "/tmp/demo", layout_id))
        .unwrap();
    (workspace, id)
}

/// Applies a layout change, confirming shrinks with the default selection.
fn switch_layout(workspace: &mut Workspace, id: ProjectId, target: LayoutId) {
    if let LayoutChange::Pending(pending) = workspace.request_layout_change(id, target).unwrap() {
        workspace
            .confirm_transition(id, &pending.default_selection())
            .unwrap();
    }
    assert_eq!(workspace.layout(id).unwrap(), target);
}

proptest! {
    /// Property: A closed pane that the grid shrinks away stays open when
    /// the grid grows back
    #[test]
    fn prop_pruned_pane_is_not_resurrected(
        (large, small, k) in shrinking_pair_strategy().prop_flat_map(|(large, small)| {
            let range = layout::layout(small).pane_count..layout::layout(large).pane_count;
            (Just(large), Just(small), range)
        }),
    ) {
        let (mut workspace, id) = workspace_with(large);
        workspace.close_pane(id, k).unwrap();

        switch_layout(&mut workspace, id, small);
        prop_assert!(!workspace.is_pane_closed(id, k));

        switch_layout(&mut workspace, id, large);
        prop_assert!(!workspace.is_pane_closed(id, k));
        prop_assert!(workspace.visible_panes(id).unwrap().contains(&k));
    }

    /// Property: Live panes are exactly the open indices below each
    /// project's pane count
    #[test]
    fn prop_live_panes_are_open_indices(
        layout_id in layout_id_strategy(),
        closes in prop::collection::vec(0usize..16, 0..8),
    ) {
        let (mut workspace, id) = workspace_with(layout_id);
        let pane_count = layout::layout(layout_id).pane_count;
        for index in closes {
            let result = workspace.close_pane(id, index);
            prop_assert_eq!(result.is_ok(), index < pane_count);
        }

        let live: Vec<usize> = workspace.live_panes().into_iter().map(|p| p.key.index).collect();
        let expected: Vec<usize> = (0..pane_count).filter(|&i| !workspace.is_pane_closed(id, i)).collect();
        prop_assert_eq!(&live, &expected);
        prop_assert_eq!(live, workspace.visible_panes(id).unwrap());
    }

    /// Property: Saving and restoring keeps layouts and closed panes
    #[test]
    fn prop_state_survives_round_trip(
        layout_id in layout_id_strategy(),
        closes in prop::collection::btree_set(0usize..16, 0..8),
    ) {
        let (mut workspace, id) = workspace_with(layout_id);
        let pane_count = layout::layout(layout_id).pane_count;
        for index in closes.into_iter().filter(|&i| i < pane_count) {
            workspace.close_pane(id, index).unwrap();
        }
        let json = workspace.to_state().to_json().unwrap();
        let restored = Workspace::from_state(ProjectState::from_json(&json).unwrap());
        prop_assert_eq!(restored.layout(id).unwrap(), layout_id);
        prop_assert_eq!(restored.closed_indices(id), workspace.closed_indices(id));
        prop_assert_eq!(restored.active_project().map(|p| p.id), Some(id));
    }

    /// Property: Panes closed by confirming a shrink stay closed across a
    /// save and restore, and after growing back
    #[test]
    fn prop_confirmed_shrink_survives_round_trip((large, small) in shrinking_pair_strategy()) {
        let (mut workspace, id) = workspace_with(large);
        switch_layout(&mut workspace, id, small);
        let closed = workspace.closed_indices(id);
        let small_count = layout::layout(small).pane_count;
        let large_count = layout::layout(large).pane_count;
        prop_assert_eq!(closed.clone(), (small_count..large_count).collect::<Vec<_>>());

        let json = workspace.to_state().to_json().unwrap();
        let mut restored = Workspace::from_state(ProjectState::from_json(&json).unwrap());
        prop_assert_eq!(restored.closed_indices(id), closed.clone());

        restored.request_layout_change(id, large).unwrap();
        prop_assert_eq!(restored.layout(id).unwrap(), large);
        prop_assert_eq!(restored.closed_indices(id), closed);
        prop_assert_eq!(restored.visible_panes(id).unwrap(), (0..small_count).collect::<Vec<_>>());
    }
}
