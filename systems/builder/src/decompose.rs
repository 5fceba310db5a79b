//! Greedy covering of obstacle pixels with maximal rectangles.

use arena_core::{GeometryError, Rect};

use crate::raster::{Pixel, Raster};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Growth {
    Square,
    Wide,
    Tall,
}

impl Growth {
    fn grows_width(self) -> bool {
        matches!(self, Self::Square | Self::Wide)
    }

    fn grows_height(self) -> bool {
        matches!(self, Self::Square | Self::Tall)
    }
}

/// Covers every obstacle pixel with non-overlapping rectangles.
///
/// Pixels are scanned in raster order. Each uncovered obstacle pixel anchors
/// a rectangle that grows diagonally, then to the right, then downward, for as
/// long as every newly touched pixel is an uncovered obstacle.
pub(crate) fn decompose(raster: &Raster) -> Result<Vec<Rect>, GeometryError> {
    let width = raster.width();
    let height = raster.height();
    let mut remaining: Vec<bool> = raster
        .pixels()
        .iter()
        .map(|&pixel| pixel == Pixel::Obstacle)
        .collect();
    let mut rects = Vec::new();

    for start in 0..remaining.len() {
        if !remaining[start] {
            continue;
        }

        let left = start % width;
        let top = start / width;
        let mut columns = 1;
        let mut rows = 1;
        let mut growth = Growth::Square;

        loop {
            let next_columns = columns + usize::from(growth.grows_width());
            let next_rows = rows + usize::from(growth.grows_height());

            let column_free = !growth.grows_width()
                || (left + columns < width
                    && (top..top + next_rows).all(|y| {
                        y < height && remaining[y * width + left + columns]
                    }));
            let row_free = !growth.grows_height()
                || (top + rows < height
                    && (left..left + next_columns).all(|x| {
                        x < width && remaining[(top + rows) * width + x]
                    }));

            if column_free && row_free {
                columns = next_columns;
                rows = next_rows;
                continue;
            }

            growth = match growth {
                Growth::Square => Growth::Wide,
                Growth::Wide => Growth::Tall,
                Growth::Tall => break,
            };
        }

        for y in top..top + rows {
            remaining[y * width + left..y * width + left + columns].fill(false);
        }
        rects.push(Rect::new(
            left as f64,
            top as f64,
            columns as f64,
            rows as f64,
        )?);
    }

    Ok(rects)
}
