use crate::block::PixelBlock;

/// A cell constellation centered at the origin, in half-pixel units.
///
/// `welds` lists the open polygon corners that may fuse with a neighboring
/// block's cell during welding.
#[derive(Debug)]
pub(crate) struct Template {
    pub(crate) points: &'static [(f64, f64)],
    pub(crate) edges: &'static [(usize, usize)],
    pub(crate) welds: &'static [usize],
}

/// The plus-shaped cell every plain configuration maps to.
///
/// ```text
///     v0
///      |
/// v1 ─ v2 ─ v3
///      |
///     v4
/// ```
pub(crate) const DEFAULT: Template = Template {
    points: &[(0.0, -0.5), (-0.5, 0.0), (0.0, 0.0), (0.5, 0.0), (0.0, 0.5)],
    edges: &[(0, 2), (1, 2), (2, 3), (2, 4)],
    welds: &[0, 1, 3, 4],
};

/// Cell for a corner triangle: two axis edges closed off by a diagonal.
pub(crate) const TRIANGLE: Template = Template {
    points: &[
        (0.0, -0.5),
        (0.25, -0.25),
        (-0.5, 0.0),
        (0.0, 0.0),
        (0.5, 0.0),
        (0.0, 0.5),
    ],
    edges: &[(0, 1), (2, 3), (3, 1), (1, 4), (3, 5)],
    welds: &[0, 2, 4, 5],
};

/// Cell for a lone diagonal: a band with a knee on either side.
pub(crate) const DIAGONAL: Template = Template {
    points: &[
        (0.0, -0.5),
        (-0.25, -0.25),
        (-0.5, 0.0),
        (0.0, 0.0),
        (0.5, 0.0),
        (0.25, 0.25),
        (0.0, 0.5),
    ],
    edges: &[(0, 1), (1, 2), (1, 3), (3, 5), (5, 4), (6, 5)],
    welds: &[0, 2, 4, 6],
};

/// Quarter-turn rotation about the origin, clockwise in memory coordinates.
///
/// Expressed as exact coordinate permutations so no trigonometric error
/// reaches the rounded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rotation {
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub(crate) fn apply(self, (x, y): (f64, f64)) -> (f64, f64) {
        match self {
            Rotation::R0 => (x, y),
            Rotation::R90 => (y, -x),
            Rotation::R180 => (-x, -y),
            Rotation::R270 => (-y, x),
        }
    }
}

/// The template and orientation a block's configuration selects.
#[derive(Debug)]
pub(crate) struct CellPlan {
    pub(crate) template: &'static Template,
    pub(crate) rotation: Rotation,
}

/// Matches a non-empty block signature to its cell plan.
///
/// Returns `None` for configurations with no known cell: a diagonal
/// accompanied by no axis edge outside the six special signatures, which a
/// resolved similarity graph never produces.
pub(crate) fn match_signature(block: &PixelBlock) -> Option<CellPlan> {
    let plan = match block.signature().as_str() {
        "lb[bD]" => CellPlan {
            template: &TRIANGLE,
            rotation: Rotation::R0,
        },
        "rb[fD]" => CellPlan {
            template: &TRIANGLE,
            rotation: Rotation::R90,
        },
        "rt[bD]" => CellPlan {
            template: &TRIANGLE,
            rotation: Rotation::R180,
        },
        "lt[fD]" => CellPlan {
            template: &TRIANGLE,
            rotation: Rotation::R270,
        },
        "[fD]" => CellPlan {
            template: &DIAGONAL,
            rotation: Rotation::R0,
        },
        "[bD]" => CellPlan {
            template: &DIAGONAL,
            rotation: Rotation::R90,
        },
        _ => {
            if block.left.is_none()
                && block.right.is_none()
                && block.top.is_none()
                && block.bottom.is_none()
            {
                return None;
            }
            CellPlan {
                template: &DEFAULT,
                rotation: Rotation::R0,
            }
        }
    };

    Some(plan)
}
