use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::config::{LayoutConfig, RowAlign};
use crate::geometry::Point;

/// A box to be placed, with the row it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBox {
    /// Current left edge; only consulted when rows are sorted by x.
    pub x: f64,
    pub width: f64,
    pub height: f64,
    pub depth: usize,
}

/// Where the packed rows go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPlacement {
    /// Horizontal centre every row is centred on.
    pub center_x: f64,
    /// Top of the first row.
    pub top_y: f64,
    /// Order each row by current x instead of input order.
    pub sort_by_x: bool,
}

impl RowPlacement {
    /// Fresh layout anchored at the origin.
    pub fn fresh() -> Self {
        Self {
            center_x: 0.0,
            top_y: 0.0,
            sort_by_x: false,
        }
    }
}

/// Packs boxes into one row per depth and returns the top-left corner of
/// each box, in input order.
///
/// Rows stack downwards from `placement.top_y`, separated by
/// `config.row_gap`. Inside a row boxes are laid left to right with
/// `config.column_gap` between them, the row centred on
/// `placement.center_x`. Depths that hold no box do not take up space.
pub fn pack_rows(boxes: &[LayoutBox], placement: RowPlacement, config: &LayoutConfig) -> Vec<Point> {
    let mut rows: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (idx, layout_box) in boxes.iter().enumerate() {
        rows.entry(layout_box.depth).or_default().push(idx);
    }

    let mut positions = vec![Point::ORIGIN; boxes.len()];
    let mut cursor_y = placement.top_y;
    for members in rows.values_mut() {
        if placement.sort_by_x {
            members.sort_by(|a, b| {
                boxes[*a]
                    .x
                    .partial_cmp(&boxes[*b].x)
                    .unwrap_or(Ordering::Equal)
            });
        }

        let row_height = members
            .iter()
            .map(|idx| boxes[*idx].height)
            .fold(0.0_f64, f64::max);
        let row_width = members.iter().map(|idx| boxes[*idx].width).sum::<f64>()
            + config.column_gap * members.len().saturating_sub(1) as f64;

        let mut cursor_x = placement.center_x - row_width / 2.0;
        for &idx in members.iter() {
            let layout_box = &boxes[idx];
            let y = match config.row_align {
                RowAlign::Center => cursor_y + (row_height - layout_box.height) / 2.0,
                RowAlign::Top => cursor_y,
            };
            positions[idx] = Point::new(cursor_x, y);
            cursor_x += layout_box.width + config.column_gap;
        }
        cursor_y += row_height + config.row_gap;
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(depth: usize) -> LayoutBox {
        LayoutBox {
            x: 0.0,
            width: 200.0,
            height: 100.0,
            depth,
        }
    }

    #[test]
    fn single_row_is_centred_on_origin() {
        let config = LayoutConfig::default();
        let positions = pack_rows(&[node(0), node(0)], RowPlacement::fresh(), &config);
        assert_eq!(positions[0], Point::new(-220.0, 0.0));
        assert_eq!(positions[1], Point::new(20.0, 0.0));
    }

    #[test]
    fn rows_stack_with_gap() {
        let config = LayoutConfig::default();
        let positions = pack_rows(
            &[node(0), node(1), node(2)],
            RowPlacement::fresh(),
            &config,
        );
        assert_eq!(positions[0].y, 0.0);
        assert_eq!(positions[1].y, 180.0);
        assert_eq!(positions[2].y, 360.0);
        assert!(positions.iter().all(|p| p.x == -100.0));
    }

    #[test]
    fn row_alignment_controls_vertical_offset() {
        let short = LayoutBox {
            height: 50.0,
            ..node(0)
        };
        let boxes = [node(0), short];

        let centred = pack_rows(&boxes, RowPlacement::fresh(), &LayoutConfig::default());
        assert_eq!(centred[1].y, 25.0);

        let top = LayoutConfig {
            row_align: RowAlign::Top,
            ..LayoutConfig::default()
        };
        let flush = pack_rows(&boxes, RowPlacement::fresh(), &top);
        assert_eq!(flush[1].y, 0.0);
    }

    #[test]
    fn sorting_by_x_keeps_left_to_right_order() {
        let config = LayoutConfig::default();
        let boxes = [
            LayoutBox { x: 500.0, ..node(0) },
            LayoutBox { x: -20.0, ..node(0) },
            LayoutBox { x: 100.0, ..node(0) },
        ];
        let placement = RowPlacement {
            center_x: 1000.0,
            top_y: 40.0,
            sort_by_x: true,
        };
        let positions = pack_rows(&boxes, placement, &config);
        assert!(positions[1].x < positions[2].x);
        assert!(positions[2].x < positions[0].x);
        assert_eq!(positions[1].x, 1000.0 - 340.0);
        assert!(positions.iter().all(|p| p.y == 40.0));
    }

    #[test]
    fn boxes_in_a_row_never_overlap() {
        let config = LayoutConfig::default();
        let boxes: Vec<LayoutBox> = (0..6)
            .map(|i| LayoutBox {
                width: 50.0 + 30.0 * i as f64,
                ..node(0)
            })
            .collect();
        let positions = pack_rows(&boxes, RowPlacement::fresh(), &config);
        for pair in positions.windows(2).zip(boxes.windows(2)) {
            let (p, b) = pair;
            assert!(p[1].x - (p[0].x + b[0].width) >= config.column_gap - 1e-9);
        }
    }

    #[test]
    fn skipped_depths_do_not_leave_gaps() {
        let config = LayoutConfig::default();
        let positions = pack_rows(&[node(0), node(3)], RowPlacement::fresh(), &config);
        assert_eq!(positions[1].y, 180.0);
    }
}
