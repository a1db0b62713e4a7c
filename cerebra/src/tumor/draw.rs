use crate::raster::{ColorImage, Coord, Rgb};

use super::contour::Contour;

/// Paints a `thickness x thickness` square centred on `(x, y)`, clipped to the
/// frame.
fn stamp(image: &mut ColorImage, x: isize, y: isize, thickness: usize, color: Rgb) {
    let lo = (thickness as isize - 1) / 2;
    let hi = thickness as isize / 2;
    for yy in (y - lo)..=(y + hi) {
        for xx in (x - lo)..=(x + hi) {
            if xx >= 0
                && yy >= 0
                && (xx as usize) < image.width()
                && (yy as usize) < image.height()
            {
                image[(xx as usize, yy as usize)] = color;
            }
        }
    }
}

/// Bresenham line from `a` to `b`, both ends included.
pub fn draw_line(image: &mut ColorImage, a: Coord, b: Coord, thickness: usize, color: Rgb) {
    let (mut x, mut y) = (a.col as isize, a.row as isize);
    let (x1, y1) = (b.col as isize, b.row as isize);
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        stamp(image, x, y, thickness, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Draws `contour` as a closed polygon.
pub fn draw_contour(image: &mut ColorImage, contour: &Contour, thickness: usize, color: Rgb) {
    let points = contour.points();
    match points {
        [] => {}
        [p] => stamp(image, p.col as isize, p.row as isize, thickness, color),
        _ => {
            for (i, &a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                draw_line(image, a, b, thickness, color);
            }
        }
    }
}
