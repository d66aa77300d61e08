use crate::core::grid::{GRID_CELLS, PagerLabels};
use crate::render::{CellView, RenderTarget, Scaffold};
use serde::Serialize;

/// In-memory target that keeps whatever was last applied.
///
/// Used by tests and by hosts that draw from a plain data model.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SnapshotTarget {
    pub scaffold: Option<Scaffold>,
    pub cells: Vec<CellView>,
    pub pager: Option<PagerLabels>,
    pub visible: bool,
    pub overlay_visible: bool,
    pub attached: bool,
    /// Number of full `set_cells` calls.
    pub cell_updates: usize,
}

impl SnapshotTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.cells.iter().position(|c| c.selected)
    }

    pub fn today_index(&self) -> Option<usize> {
        self.cells.iter().position(|c| c.today)
    }

    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|c| c.blocked).count()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.label.as_str()).collect()
    }

    pub fn pager_text(&self) -> String {
        self.pager
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "attached": self.attached,
            "visible": self.visible,
            "overlay": self.scaffold.as_ref().map(|s| s.overlay).unwrap_or(false),
            "overlay_visible": self.overlay_visible,
            "pager": self.pager,
            "week_labels": self.scaffold.as_ref().map(|s| s.week_labels),
            "cells": self.cells,
        })
    }
}

impl RenderTarget for SnapshotTarget {
    fn mount(&mut self, scaffold: &Scaffold) {
        self.scaffold = Some(scaffold.clone());
        self.cells = vec![CellView::default(); GRID_CELLS];
        self.attached = true;
    }

    fn set_cells(&mut self, cells: &[CellView]) {
        self.cells = cells.to_vec();
        self.cell_updates += 1;
    }

    fn set_selected(&mut self, index: Option<usize>) {
        for (i, cell) in self.cells.iter_mut().enumerate() {
            cell.selected = Some(i) == index;
        }
    }

    fn set_pager(&mut self, labels: &PagerLabels) {
        self.pager = Some(labels.clone());
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_overlay_visible(&mut self, visible: bool) {
        self.overlay_visible = visible;
    }

    fn detach(&mut self) {
        self.attached = false;
        self.visible = false;
        self.overlay_visible = false;
    }
}
