//! External contour extraction.
//!
//! Only outermost borders are traced: a component nested inside the hole of
//! another component never yields a contour.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::{Connectivity, ContourApproximation};
use crate::labeling::ComponentMap;
use crate::raster::{Coord, GrayImage, Image};

/// Neighbor offsets as `(d_row, d_col)`, counterclockwise starting east.
const DIRECTIONS: [(isize, isize); 8] = [
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const WEST: usize = 4;

/// Inclusive pixel bounds of a contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Coord,
    pub max: Coord,
}

impl BoundingBox {
    pub fn width(&self) -> usize {
        self.max.col - self.min.col + 1
    }

    pub fn height(&self) -> usize {
        self.max.row - self.min.row + 1
    }
}

/// Ordered boundary points of one region, together with the frame they were
/// traced in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    points: Vec<Coord>,
    width: usize,
    height: usize,
}

impl Contour {
    pub fn new(points: Vec<Coord>, width: usize, height: usize) -> Self {
        debug_assert!(points.iter().all(|p| p.row < height && p.col < width));
        Self {
            points,
            width,
            height,
        }
    }

    #[inline]
    pub fn points(&self) -> &[Coord] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(width, height)` of the frame the contour lives in.
    #[inline]
    pub fn frame(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Area enclosed by the closed polygon through the points (shoelace
    /// formula with `x = col`, `y = row`).
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: i64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.col as i64 * b.row as i64 - b.col as i64 * a.row as i64
            })
            .sum();
        twice.abs() as f64 / 2.0
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = *self.points.first()?;
        let bounds = self.points.iter().fold(
            BoundingBox {
                min: first,
                max: first,
            },
            |b, p| BoundingBox {
                min: Coord::new(b.min.row.min(p.row), b.min.col.min(p.col)),
                max: Coord::new(b.max.row.max(p.row), b.max.col.max(p.col)),
            },
        );
        Some(bounds)
    }
}

/// Traces the outer border of every 8-connected component of nonzero pixels
/// that is not enclosed by another component.
///
/// Contours come out in raster order of their first pixel. Each starts at
/// that pixel and runs counterclockwise on screen.
pub fn find_external_contours(
    edges: &GrayImage,
    approximation: ContourApproximation,
) -> Vec<Contour> {
    let width = edges.width();
    let height = edges.height();
    if edges.is_empty() {
        return Vec::new();
    }

    let foreground = edges.map(|&v| v != 0);
    let components = ComponentMap::from_mask(&foreground, Connectivity::Eight);
    let num = components.num_components();
    if num == 0 {
        return Vec::new();
    }

    let exterior = exterior_background(&foreground);

    // Outermost components touch the frame or 4-neighbor exterior background.
    let mut external = vec![false; num + 1];
    let mut start = vec![None; num + 1];
    for y in 0..height {
        for x in 0..width {
            let label = components.label_at(x, y) as usize;
            if label == 0 {
                continue;
            }
            if start[label].is_none() {
                start[label] = Some(Coord::new(y, x));
            }
            if external[label] {
                continue;
            }
            let on_frame = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            external[label] = on_frame
                || [(0isize, 1isize), (0, -1), (1, 0), (-1, 0)]
                    .iter()
                    .filter_map(|&(dr, dc)| Coord::new(y, x).offset(dr, dc, width, height))
                    .any(|c| exterior[c]);
        }
    }

    let mut starts: Vec<Coord> = (1..=num)
        .filter(|&label| external[label])
        .filter_map(|label| start[label])
        .collect();
    starts.sort();

    starts
        .into_iter()
        .map(|p0| {
            let border = trace_outer_border(&foreground, p0);
            let points = match approximation {
                ContourApproximation::None => border,
                ContourApproximation::Simple => compress_segments(&border),
            };
            Contour::new(points, width, height)
        })
        .collect()
}

/// Background pixels 4-connected to the outside of the frame.
fn exterior_background(foreground: &Image<bool>) -> Image<bool> {
    let width = foreground.width();
    let height = foreground.height();
    let mut exterior = Image::new_filled(width, height, false);
    let mut queue = VecDeque::new();

    let mut seed = |exterior: &mut Image<bool>, c: Coord| {
        if !foreground[c] && !exterior[c] {
            exterior[c] = true;
            queue.push_back(c);
        }
    };
    for x in 0..width {
        seed(&mut exterior, Coord::new(0, x));
        seed(&mut exterior, Coord::new(height - 1, x));
    }
    for y in 0..height {
        seed(&mut exterior, Coord::new(y, 0));
        seed(&mut exterior, Coord::new(y, width - 1));
    }

    while let Some(c) = queue.pop_front() {
        for (dr, dc) in [(0, 1), (0, -1), (1, 0), (-1, 0)] {
            if let Some(n) = c.offset(dr, dc, width, height)
                && !foreground[n]
                && !exterior[n]
            {
                exterior[n] = true;
                queue.push_back(n);
            }
        }
    }

    exterior
}

#[inline]
fn neighbor(image: &Image<bool>, c: Coord, dir: usize) -> Option<Coord> {
    let (dr, dc) = DIRECTIONS[dir];
    c.offset(dr, dc, image.width(), image.height())
        .filter(|&n| image[n])
}

/// Suzuki-Abe outer border following from `p0`, the first pixel of its
/// component in raster order.
fn trace_outer_border(image: &Image<bool>, p0: Coord) -> Vec<Coord> {
    // Clockwise from the west neighbor, which is background.
    let Some((first_dir, p1)) = (0..8)
        .map(|k| (WEST + 8 - k) % 8)
        .find_map(|d| neighbor(image, p0, d).map(|n| (d, n)))
    else {
        return vec![p0];
    };

    let mut points = Vec::new();
    let mut current = p0;
    let mut back_dir = first_dir;
    loop {
        // Counterclockwise from the pixel we came from; `current` has at least
        // that neighbor, so the search always succeeds.
        let (dir, next) = (1..=8)
            .map(|k| (back_dir + k) % 8)
            .find_map(|d| neighbor(image, current, d).map(|n| (d, n)))
            .unwrap_or((back_dir, current));

        points.push(current);
        if next == p0 && current == p1 {
            break;
        }
        back_dir = (dir + 4) % 8;
        current = next;
    }

    points
}

fn direction(from: Coord, to: Coord) -> (isize, isize) {
    (
        to.row as isize - from.row as isize,
        to.col as isize - from.col as isize,
    )
}

/// Keeps the first point and every point where the chain changes direction.
fn compress_segments(points: &[Coord]) -> Vec<Coord> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let mut out = vec![points[0]];
    for i in 1..n {
        let incoming = direction(points[i - 1], points[i]);
        let outgoing = direction(points[i], points[(i + 1) % n]);
        if incoming != outgoing {
            out.push(points[i]);
        }
    }
    out
}
