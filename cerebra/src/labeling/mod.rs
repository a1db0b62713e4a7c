//! Connected components of binary masks.
//!
//! Each row is split into spans of foreground pixels. A span joins every span
//! of the row above that it touches under the chosen connectivity; spans that
//! touch nothing open a new provisional label. Provisional labels are merged in
//! a disjoint-set forest whose roots are always the smallest member, and the
//! final pass renumbers roots to `1..=K` in increasing order. A component's
//! label therefore reflects where its first span appears in raster order.


use crate::config::Connectivity;
use crate::raster::Image;

// ============================================================================
// Spans
// ============================================================================

/// Foreground pixels `start..end` of one row.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
    label: u32,
}

impl Span {
    /// Whether `above`, a span of the previous row, touches `self`. Diagonal
    /// contact at the span ends counts only for eight-connectivity.
    #[inline]
    fn touches(&self, above: &Span, connectivity: Connectivity) -> bool {
        let reach = diagonal_reach(connectivity);
        above.start < self.end + reach && self.start < above.end + reach
    }
}

#[inline]
fn diagonal_reach(connectivity: Connectivity) -> usize {
    match connectivity {
        Connectivity::Four => 0,
        Connectivity::Eight => 1,
    }
}

fn row_spans(row: &[bool], spans: &mut Vec<Span>) {
    spans.clear();
    let mut pixels = row.iter().enumerate().peekable();
    while let Some((start, &on)) = pixels.next() {
        if !on {
            continue;
        }
        let mut end = start + 1;
        while pixels.next_if(|&(_, &next)| next).is_some() {
            end += 1;
        }
        spans.push(Span {
            start,
            end,
            label: 0,
        });
    }
}

/// Gives every span of `row` a provisional label, joining the labels of all
/// spans of `above` it touches.
fn link_to_row_above(
    row: &mut [Span],
    above: &[Span],
    connectivity: Connectivity,
    forest: &mut LabelForest,
) {
    let reach = diagonal_reach(connectivity);
    // Both rows are sorted by start, so spans of `above` that end before the
    // current span's reach can never touch a later one either.
    let mut first = 0;
    for span in row.iter_mut() {
        while first < above.len() && above[first].end + reach <= span.start {
            first += 1;
        }

        let mut label = None;
        for candidate in above[first..]
            .iter()
            .take_while(|a| a.start < span.end + reach)
            .filter(|a| span.touches(a, connectivity))
        {
            match label {
                None => label = Some(candidate.label),
                Some(own) => forest.join(own, candidate.label),
            }
        }

        span.label = label.unwrap_or_else(|| forest.open());
    }
}

// ============================================================================
// ComponentMap
// ============================================================================

/// Label image of a binary mask.
///
/// `0` is background; every foreground pixel carries exactly one label in
/// `1..=num_components()`.
#[derive(Debug, Clone)]
pub struct ComponentMap {
    labels: Image<u32>,
    /// Pixel count per label; index 0 is unused.
    areas: Vec<usize>,
}

impl ComponentMap {
    pub fn from_mask(mask: &Image<bool>, connectivity: Connectivity) -> Self {
        let width = mask.width();
        let mut labels = Image::new_default(width, mask.height());
        if mask.is_empty() {
            return Self {
                labels,
                areas: vec![0],
            };
        }

        let mut forest = LabelForest::default();
        let mut above: Vec<Span> = Vec::new();
        let mut row: Vec<Span> = Vec::new();

        for (mask_row, label_row) in mask
            .rows()
            .zip(labels.pixels_mut().chunks_exact_mut(width))
        {
            row_spans(mask_row, &mut row);
            link_to_row_above(&mut row, &above, connectivity, &mut forest);
            for span in &row {
                label_row[span.start..span.end].fill(span.label);
            }
            std::mem::swap(&mut above, &mut row);
        }

        let final_label = forest.resolve();
        let num_components = final_label.iter().copied().max().unwrap_or(0) as usize;
        let mut areas = vec![0usize; num_components + 1];
        for label in labels.pixels_mut() {
            if *label != 0 {
                *label = final_label[*label as usize];
                areas[*label as usize] += 1;
            }
        }

        Self { labels, areas }
    }

    /// Number of components, excluding background.
    #[inline]
    pub fn num_components(&self) -> usize {
        self.areas.len() - 1
    }

    #[inline]
    pub fn labels(&self) -> &Image<u32> {
        &self.labels
    }

    #[inline]
    pub fn label_at(&self, x: usize, y: usize) -> u32 {
        self.labels[(x, y)]
    }

    /// Pixel count of `label`. Background (0) reports 0.
    #[inline]
    pub fn area(&self, label: u32) -> usize {
        self.areas.get(label as usize).copied().unwrap_or(0)
    }

    /// Pixel counts indexed by label; index 0 is background and always 0.
    #[inline]
    pub fn areas(&self) -> &[usize] {
        &self.areas
    }

    /// Label with the most pixels, lowest label on ties. `None` without
    /// foreground.
    pub fn largest(&self) -> Option<u32> {
        let mut best: Option<(u32, usize)> = None;
        for (label, &area) in self.areas.iter().enumerate().skip(1) {
            if best.is_none_or(|(_, best_area)| area > best_area) {
                best = Some((label as u32, area));
            }
        }
        best.map(|(label, _)| label)
    }
}

// ============================================================================
// Label forest
// ============================================================================

/// Disjoint sets of provisional labels. Index 0 stands for background and is
/// its own root.
#[derive(Debug)]
struct LabelForest {
    parent: Vec<u32>,
}

impl Default for LabelForest {
    fn default() -> Self {
        Self { parent: vec![0] }
    }
}

impl LabelForest {
    /// A fresh singleton label.
    #[inline]
    fn open(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    fn root(&mut self, label: u32) -> u32 {
        let mut root = label;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        // Point the whole path at the root.
        let mut node = label;
        while node != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }
        root
    }

    /// Merges the sets of `a` and `b` under the smaller root.
    fn join(&mut self, a: u32, b: u32) {
        let (ra, rb) = (self.root(a), self.root(b));
        if ra != rb {
            let (keep, merged) = (ra.min(rb), ra.max(rb));
            self.parent[merged as usize] = keep;
        }
    }

    /// Final label of every provisional label, indexed by provisional label.
    ///
    /// A root is never larger than its members, so walking labels upwards
    /// meets each root before any member and can number roots as it goes.
    fn resolve(mut self) -> Vec<u32> {
        let mut resolved = vec![0u32; self.parent.len()];
        let mut next = 0u32;
        for label in 1..self.parent.len() as u32 {
            let root = self.root(label);
            if root == label {
                next += 1;
                resolved[label as usize] = next;
            } else {
                resolved[label as usize] = resolved[root as usize];
            }
        }
        resolved
    }
}
