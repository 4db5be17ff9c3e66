//! Property tests for the layout catalogue

use gridterm_core::layout::{self, LayoutId};
use gridterm_core::{LayoutError, all_layouts, get_layout};
use proptest::prelude::*;

/// Strategy for any catalogued layout id
pub fn layout_id_strategy() -> impl Strategy<Value = LayoutId> {
    prop::sample::select(LayoutId::ALL.to_vec())
}

proptest! {
    /// Property: Lookup by string id returns the definition with that id
    #[test]
    fn prop_lookup_by_string_matches_id(id in layout_id_strategy()) {
        let def = get_layout(id.as_str()).unwrap();
        prop_assert_eq!(def.id, id);
        prop_assert_eq!(def, layout::layout(id));
    }

    /// Property: Pane count is always columns times rows
    #[test]
    fn prop_pane_count_matches_geometry(id in layout_id_strategy()) {
        let def = layout::layout(id);
        prop_assert_eq!(
            def.pane_count,
            usize::from(def.geometry.columns) * usize::from(def.geometry.rows)
        );
        prop_assert!(def.pane_count > 0);
    }

    /// Property: Every pane index maps to a cell inside the grid, and no
    /// index past the pane count does
    #[test]
    fn prop_cells_cover_every_pane(id in layout_id_strategy(), extra in 0usize..8) {
        let geometry = layout::layout(id).geometry;
        for index in 0..geometry.cell_count() {
            let (column, row) = geometry.cell_of(index).unwrap();
            prop_assert!(column < geometry.columns);
            prop_assert!(row < geometry.rows);
        }
        prop_assert!(geometry.cell_of(geometry.cell_count() + extra).is_none());
    }

    /// Property: Ids outside the catalogue are reported as not found
    #[test]
    fn prop_unknown_ids_are_not_found(id in "[a-z]{1,6}-[0-9]x[0-9]") {
        prop_assume!(LayoutId::ALL.iter().all(|known| known.as_str() != id));
        let result = get_layout(&id);
        prop_assert!(matches!(result, Err(LayoutError::NotFound(ref name)) if *name == id));
    }
}

#[test]
fn catalogue_order_is_stable() {
    let ids: Vec<LayoutId> = all_layouts().iter().map(|def| def.id).collect();
    assert_eq!(ids, LayoutId::ALL.to_vec());
}
