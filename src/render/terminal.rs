use crate::core::grid::{GRID_CELLS, PagerLabels, PagerVariant, WEEK_LENGTH};
use crate::render::{CellView, Region, RenderTarget, Scaffold};
use crate::ui::span::{Span, SpanLine, line_width};
use crate::ui::style::{Color, Style};
use unicode_width::UnicodeWidthStr;

const CELL_WIDTH: usize = 4;
const GRID_WIDTH: usize = CELL_WIDTH * WEEK_LENGTH;
const ARROW_WIDTH: usize = 3;
const BACKDROP: char = '░';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Hit {
    row: u16,
    start: u16,
    end: u16,
    region: Region,
}

struct LineBuilder {
    row: u16,
    col: u16,
    spans: SpanLine,
}

impl LineBuilder {
    fn new(row: u16) -> Self {
        Self {
            row,
            col: 0,
            spans: Vec::new(),
        }
    }

    fn push(&mut self, span: Span, region: Option<Region>, hits: &mut Vec<Hit>) {
        let width = span.width() as u16;
        if let Some(region) = region {
            hits.push(Hit {
                row: self.row,
                start: self.col,
                end: self.col + width,
                region,
            });
        }
        self.col += width;
        self.spans.push(span);
    }
}

/// Draws the picker as styled text for a terminal and maps screen positions
/// back to picker regions.
#[derive(Debug, Clone)]
pub struct TerminalTarget {
    scaffold: Option<Scaffold>,
    cells: Vec<CellView>,
    pager: Option<PagerLabels>,
    visible: bool,
    overlay_visible: bool,
    attached: bool,
    origin: (u16, u16),
}

impl Default for TerminalTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalTarget {
    pub fn new() -> Self {
        Self {
            scaffold: None,
            cells: Vec::new(),
            pager: None,
            visible: false,
            overlay_visible: false,
            attached: false,
            origin: (2, 1),
        }
    }

    /// Screen position (col, row) of the picker's top-left corner.
    pub fn with_origin(mut self, col: u16, row: u16) -> Self {
        self.origin = (col, row);
        self
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    fn pager_line(&self, hits: &mut Vec<Hit>) -> SpanLine {
        let mut line = LineBuilder::new(0);
        let Some(scaffold) = &self.scaffold else {
            return line.spans;
        };
        let labels = self.pager.clone().unwrap_or(PagerLabels {
            previous: None,
            current: String::new(),
            next: None,
        });
        let current_style = Style::new().color(Color::Cyan).bold();
        let arrow_style = Style::new().color(Color::DarkGrey);

        match scaffold.pager {
            PagerVariant::Single => {
                let inner = GRID_WIDTH - 4 * ARROW_WIDTH;
                line.push(Span::new(" « "), Some(Region::PrevYear), hits);
                line.push(Span::new(" ‹ "), Some(Region::PrevMonth), hits);
                line.push(
                    Span::styled(center(&labels.current, inner), current_style),
                    None,
                    hits,
                );
                line.push(Span::new(" › "), Some(Region::NextMonth), hits);
                line.push(Span::new(" » "), Some(Region::NextYear), hits);
            }
            PagerVariant::Triple => {
                let previous = labels.previous.unwrap_or_default();
                let next = labels.next.unwrap_or_default();
                line.push(
                    Span::styled(format!("‹ {previous}"), arrow_style),
                    Some(Region::PrevMonth),
                    hits,
                );
                line.push(Span::new(" │ "), None, hits);
                line.push(Span::styled(labels.current, current_style), None, hits);
                line.push(Span::new(" │ "), None, hits);
                line.push(
                    Span::styled(format!("{next} ›"), arrow_style),
                    Some(Region::NextMonth),
                    hits,
                );
            }
        }
        line.spans
    }

    fn week_label_line(&self) -> SpanLine {
        let Some(scaffold) = &self.scaffold else {
            return Vec::new();
        };
        let style = Style::new().color(Color::DarkGrey);
        scaffold
            .week_labels
            .iter()
            .map(|label| Span::styled(format!("{label:>3} "), style))
            .collect()
    }

    fn week_lines(&self, hits: &mut Vec<Hit>) -> Vec<SpanLine> {
        self.cells
            .chunks(WEEK_LENGTH)
            .enumerate()
            .map(|(week, cells)| {
                let mut line = LineBuilder::new(2 + week as u16);
                for (offset, cell) in cells.iter().enumerate() {
                    let index = week * WEEK_LENGTH + offset;
                    line.push(
                        Span::styled(format!("{:>3} ", cell.label), cell_style(cell)),
                        Some(Region::Cell(index)),
                        hits,
                    );
                }
                line.spans
            })
            .collect()
    }

    fn layout(&self) -> (Vec<SpanLine>, Vec<Hit>) {
        let mut hits = Vec::new();
        let mut lines = vec![self.pager_line(&mut hits), self.week_label_line()];
        lines.extend(self.week_lines(&mut hits));
        (lines, hits)
    }

    /// Picker lines alone, without backdrop or origin offset.
    pub fn picker_lines(&self) -> Vec<SpanLine> {
        if !self.attached || !self.visible {
            return Vec::new();
        }
        self.layout().0
    }

    fn overlay_shown(&self) -> bool {
        self.attached
            && self.overlay_visible
            && self.scaffold.as_ref().is_some_and(|s| s.overlay)
    }

    /// A full screen of lines: backdrop (if shown) with the picker at its origin.
    pub fn frame(&self, width: u16, height: u16) -> Vec<SpanLine> {
        let picker = self.picker_lines();
        let (origin_col, origin_row) = (self.origin.0 as usize, self.origin.1 as usize);
        let width = width as usize;
        let backdrop = self.overlay_shown();
        let fill = |n: usize| -> Span {
            if backdrop {
                Span::styled(
                    BACKDROP.to_string().repeat(n),
                    Style::new().color(Color::DarkGrey),
                )
            } else {
                Span::new(" ".repeat(n))
            }
        };

        (0..height as usize)
            .map(|row| {
                let mut line = Vec::new();
                match row.checked_sub(origin_row).and_then(|r| picker.get(r)) {
                    Some(picker_line) => {
                        line.push(fill(origin_col.min(width)));
                        line.extend(picker_line.iter().cloned());
                        let used = origin_col + line_width(picker_line);
                        line.push(fill(width.saturating_sub(used)));
                    }
                    None => line.push(fill(width)),
                }
                line.retain(|s| !s.text.is_empty());
                line
            })
            .collect()
    }

    /// Which region is drawn at screen position (col, row).
    pub fn region_at(&self, col: u16, row: u16) -> Option<Region> {
        if !self.attached || !self.visible {
            return None;
        }
        let (lines, hits) = self.layout();
        let local = col
            .checked_sub(self.origin.0)
            .zip(row.checked_sub(self.origin.1));

        if let Some((x, y)) = local {
            if let Some(hit) = hits
                .iter()
                .find(|h| h.row == y && x >= h.start && x < h.end)
            {
                return Some(hit.region);
            }
            let picker_width = lines.iter().map(line_width).max().unwrap_or(0);
            if (y as usize) < lines.len() && (x as usize) < picker_width {
                return None;
            }
        }

        if self.overlay_shown() {
            Some(Region::Overlay)
        } else {
            None
        }
    }
}

fn center(text: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(text);
    if used >= width {
        return text.to_string();
    }
    let left = (width - used) / 2;
    let right = width - used - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

fn cell_style(cell: &CellView) -> Style {
    if cell.selected {
        Style::new().color(Color::Black).background(Color::Cyan).bold()
    } else if cell.blocked {
        Style::new().color(Color::DarkGrey)
    } else if cell.today {
        Style::new().color(Color::Yellow).underline()
    } else {
        Style::default()
    }
}

impl RenderTarget for TerminalTarget {
    fn mount(&mut self, scaffold: &Scaffold) {
        self.scaffold = Some(scaffold.clone());
        self.cells = vec![CellView::default(); GRID_CELLS];
        self.attached = true;
    }

    fn set_cells(&mut self, cells: &[CellView]) {
        self.cells = cells.to_vec();
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
        self.cells.clear();
        self.pager = None;
    }
}
