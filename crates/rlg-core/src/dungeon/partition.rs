//! Binary space partitioning for room placement
//!
//! The interior is split recursively until every leaf fits the configured
//! size window. Nodes live in an arena and refer to their children by
//! index; the whole tree is dropped once rooms have been placed.

use crate::GameRng;
use crate::world::GenerationConfig;

/// A rectangle of the grid being partitioned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Partition {
    /// Left column
    pub x: usize,
    /// Top row
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Partition {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole interior of a `width` x `height` grid
    pub const fn interior(width: usize, height: usize) -> Self {
        Self::new(1, 1, width.saturating_sub(2), height.saturating_sub(2))
    }

    pub const fn area(&self) -> usize {
        self.width * self.height
    }

    /// Check if this partition intersects another
    pub const fn intersects(&self, other: &Partition) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Check if this partition fully contains another
    pub const fn contains(&self, other: &Partition) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }
}

/// Direction of a cut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitAxis {
    /// Cut across the rows: top and bottom halves
    Rows,
    /// Cut across the columns: left and right halves
    Columns,
}

/// Size window for leaves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitLimits {
    pub min_width: usize,
    pub min_height: usize,
    pub max_width: usize,
    pub max_height: usize,
    /// How much longer one side must be before it is preferred for cutting
    pub bias: f64,
}

impl SplitLimits {
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            min_width: config.min_partition_width,
            min_height: config.min_partition_height,
            max_width: config.max_partition_width,
            max_height: config.max_partition_height,
            bias: config.split_bias,
        }
    }

    fn width_needs_cut(&self, area: &Partition) -> bool {
        area.width > self.max_width && area.width >= 2 * self.min_width
    }

    fn height_needs_cut(&self, area: &Partition) -> bool {
        area.height > self.max_height && area.height >= 2 * self.min_height
    }

    /// Pick the axis to cut, or `None` if the partition is already a valid leaf
    pub fn choose_axis(&self, area: &Partition, rng: &mut GameRng) -> Option<SplitAxis> {
        match (self.width_needs_cut(area), self.height_needs_cut(area)) {
            (false, false) => None,
            (true, false) => Some(SplitAxis::Columns),
            (false, true) => Some(SplitAxis::Rows),
            (true, true) => {
                let width = area.width as f64;
                let height = area.height as f64;
                if height * (1.0 + self.bias) < width {
                    Some(SplitAxis::Columns)
                } else if width * (1.0 + self.bias) < height {
                    Some(SplitAxis::Rows)
                } else if rng.one_in(2) {
                    Some(SplitAxis::Columns)
                } else {
                    Some(SplitAxis::Rows)
                }
            }
        }
    }

    /// Cut a partition in two, each side at least the minimum size
    pub fn split(
        &self,
        area: &Partition,
        axis: SplitAxis,
        rng: &mut GameRng,
    ) -> (Partition, Partition) {
        match axis {
            SplitAxis::Columns => {
                let left = rng.range(self.min_width, area.width - self.min_width);
                (
                    Partition::new(area.x, area.y, left, area.height),
                    Partition::new(area.x + left, area.y, area.width - left, area.height),
                )
            }
            SplitAxis::Rows => {
                let top = rng.range(self.min_height, area.height - self.min_height);
                (
                    Partition::new(area.x, area.y, area.width, top),
                    Partition::new(area.x, area.y + top, area.width, area.height - top),
                )
            }
        }
    }
}

/// One node of the partition tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionNode {
    pub area: Partition,
    /// Arena indices of the two halves, `None` for a leaf
    pub children: Option<(usize, usize)>,
}

/// Arena-backed binary partition tree
#[derive(Debug, Clone, Default)]
pub struct PartitionTree {
    nodes: Vec<PartitionNode>,
}

impl PartitionTree {
    /// Split `root` until every leaf is inside the limits
    pub fn build(root: Partition, limits: &SplitLimits, rng: &mut GameRng) -> Self {
        let mut nodes = vec![PartitionNode {
            area: root,
            children: None,
        }];
        let mut pending = vec![0usize];

        while let Some(index) = pending.pop() {
            let area = nodes[index].area;
            let Some(axis) = limits.choose_axis(&area, rng) else {
                continue;
            };
            let (first, second) = limits.split(&area, axis, rng);
            let first_index = nodes.len();
            nodes.push(PartitionNode {
                area: first,
                children: None,
            });
            nodes.push(PartitionNode {
                area: second,
                children: None,
            });
            nodes[index].children = Some((first_index, first_index + 1));
            pending.push(first_index + 1);
            pending.push(first_index);
        }

        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> Option<&PartitionNode> {
        self.nodes.get(index)
    }

    /// Leaf partitions in depth-first, first-half-first order
    pub fn leaves(&self) -> Vec<Partition> {
        let mut leaves = Vec::new();
        let mut stack = Vec::new();
        if !self.nodes.is_empty() {
            stack.push(0usize);
        }
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            match node.children {
                Some((first, second)) => {
                    stack.push(second);
                    stack.push(first);
                }
                None => leaves.push(node.area),
            }
        }
        leaves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_limits() -> SplitLimits {
        SplitLimits::from_config(&GenerationConfig::default())
    }

    #[test]
    fn test_small_area_is_a_leaf() {
        let limits = default_limits();
        let mut rng = GameRng::new(42);
        let tree = PartitionTree::build(Partition::new(1, 1, 20, 10), &limits, &mut rng);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.leaves(), vec![Partition::new(1, 1, 20, 10)]);
    }

    #[test]
    fn test_axis_choice_follows_out_of_range_side() {
        let limits = default_limits();
        let mut rng = GameRng::new(42);
        assert_eq!(
            limits.choose_axis(&Partition::new(1, 1, 60, 10), &mut rng),
            Some(SplitAxis::Columns)
        );
        assert_eq!(
            limits.choose_axis(&Partition::new(1, 1, 20, 19), &mut rng),
            Some(SplitAxis::Rows)
        );
        // Both too large: the relatively longer side is cut.
        assert_eq!(
            limits.choose_axis(&Partition::new(1, 1, 78, 19), &mut rng),
            Some(SplitAxis::Columns)
        );
    }

    #[test]
    fn test_leaves_tile_the_interior() {
        let limits = default_limits();
        for seed in 0..20 {
            let mut rng = GameRng::new(seed);
            let root = Partition::interior(80, 21);
            let tree = PartitionTree::build(root, &limits, &mut rng);
            let leaves = tree.leaves();

            let total: usize = leaves.iter().map(Partition::area).sum();
            assert_eq!(total, root.area());
            for (i, a) in leaves.iter().enumerate() {
                assert!(root.contains(a));
                assert!(a.width >= limits.min_width && a.width <= limits.max_width);
                assert!(a.height >= limits.min_height && a.height <= limits.max_height);
                for b in &leaves[i + 1..] {
                    assert!(!a.intersects(b));
                }
            }
        }
    }

    #[test]
    fn test_default_leaf_count() {
        let limits = default_limits();
        for seed in 0..20 {
            let mut rng = GameRng::new(seed);
            let tree = PartitionTree::build(Partition::interior(80, 21), &limits, &mut rng);
            let count = tree.leaves().len();
            assert!((6..=12).contains(&count), "seed {} gave {} leaves", seed, count);
        }
    }

    #[test]
    fn test_children_point_forward() {
        let limits = default_limits();
        let mut rng = GameRng::new(9);
        let tree = PartitionTree::build(Partition::interior(80, 21), &limits, &mut rng);
        for index in 0..tree.len() {
            if let Some((a, b)) = tree.node(index).and_then(|n| n.children) {
                assert!(a > index && b == a + 1 && b < tree.len());
            }
        }
    }
}
