use eframe::egui::{Vec2, vec2};

const LEAF_POINTS: usize = 8;
const MAX_DEPTH: u8 = 10;
const NO_CHILD: u32 = u32::MAX;

#[derive(Clone, Copy, Debug)]
pub(super) struct Square {
    pub(super) center: Vec2,
    pub(super) half: f32,
}

impl Square {
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let (min, max) = points.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), point| (min.min(*point), max.max(*point)),
        );
        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            return None;
        }

        Some(Self {
            center: (min + max) * 0.5,
            half: (max - min).max_elem() * 0.5 + 1.0,
        })
    }

    pub(super) fn side(self) -> f32 {
        self.half * 2.0
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        let offset = (point - self.center).abs();
        offset.x <= self.half && offset.y <= self.half
    }

    /// Squared gap between two squares; zero when they touch or overlap.
    pub(super) fn gap_sq(self, other: Self) -> f32 {
        let reach = Vec2::splat(self.half + other.half);
        ((self.center - other.center).abs() - reach)
            .max(Vec2::ZERO)
            .length_sq()
    }

    fn quadrant_of(self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) | (usize::from(point.y >= self.center.y) << 1)
    }

    fn quarter(self, quadrant: usize) -> Self {
        let half = self.half * 0.5;
        let x = if quadrant & 1 == 0 { -half } else { half };
        let y = if quadrant & 2 == 0 { -half } else { half };
        Self {
            center: self.center + vec2(x, y),
            half,
        }
    }
}

/// One square of the tree. Covers a contiguous run of the tree's point order
/// and carries what both tree-walking forces need: the charge aggregate
/// (`centroid`, `count`) and the largest collision radius below it.
pub(super) struct Cell {
    pub(super) square: Square,
    pub(super) centroid: Vec2,
    pub(super) count: usize,
    pub(super) max_radius: f32,
    start: usize,
    end: usize,
    children: [u32; 4],
}

impl Cell {
    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(|&child| child == NO_CHILD)
    }

    pub(super) fn children(&self) -> impl Iterator<Item = u32> {
        self.children.into_iter().filter(|&child| child != NO_CHILD)
    }

    /// Children by quadrant, for walks that pair siblings.
    pub(super) fn child_slots(&self) -> [Option<u32>; 4] {
        self.children.map(|child| (child != NO_CHILD).then_some(child))
    }
}

/// Cells live in one arena; the root is cell 0. Point indices are reordered
/// so every cell's points are one slice of `order`.
pub(super) struct Quadtree {
    cells: Vec<Cell>,
    order: Vec<usize>,
}

impl Quadtree {
    pub(super) const ROOT: u32 = 0;

    /// `radii` is indexed like `positions`; missing entries count as zero.
    pub(super) fn build(positions: &[Vec2], radii: &[f32]) -> Option<Self> {
        let square = Square::enclosing(positions)?;
        let mut tree = Self {
            cells: Vec::with_capacity(positions.len() / 2 + 1),
            order: (0..positions.len()).collect(),
        };
        tree.subdivide(square, 0, positions.len(), 0, positions, radii);
        Some(tree)
    }

    fn subdivide(
        &mut self,
        square: Square,
        start: usize,
        end: usize,
        depth: u8,
        positions: &[Vec2],
        radii: &[f32],
    ) -> u32 {
        let slot = self.cells.len();
        let points = &self.order[start..end];
        let count = points.len();
        let centroid =
            points.iter().fold(Vec2::ZERO, |sum, &index| sum + positions[index]) / count.max(1) as f32;
        let max_radius = points
            .iter()
            .map(|&index| radii.get(index).copied().unwrap_or(0.0))
            .fold(0.0, f32::max);

        self.cells.push(Cell {
            square,
            centroid,
            count,
            max_radius,
            start,
            end,
            children: [NO_CHILD; 4],
        });

        if count <= LEAF_POINTS || depth >= MAX_DEPTH {
            return slot as u32;
        }

        let run = &mut self.order[start..end];
        run.sort_by_key(|&index| square.quadrant_of(positions[index]));
        let mut bounds = [end; 5];
        for (quadrant, bound) in bounds.iter_mut().take(4).enumerate() {
            *bound = start + run.partition_point(|&index| square.quadrant_of(positions[index]) < quadrant);
        }

        // Coincident or tightly packed points that all fall in one quadrant stay a leaf.
        if bounds.windows(2).any(|pair| pair[1] - pair[0] == count) {
            return slot as u32;
        }

        for quadrant in 0..4 {
            let (from, to) = (bounds[quadrant], bounds[quadrant + 1]);
            if from == to {
                continue;
            }
            let child = self.subdivide(square.quarter(quadrant), from, to, depth + 1, positions, radii);
            self.cells[slot].children[quadrant] = child;
        }
        slot as u32
    }

    pub(super) fn cell(&self, id: u32) -> &Cell {
        &self.cells[id as usize]
    }

    pub(super) fn points(&self, cell: &Cell) -> &[usize] {
        &self.order[cell.start..cell.end]
    }
}
