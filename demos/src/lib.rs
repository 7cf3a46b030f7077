//! Levels and text rendering shared by the hexgate command-line tools.
//!
//! Provides a hand-made sample level exercising walls, a named gate and a
//! temporal wall, a seeded random level generator, and an ASCII renderer
//! that draws the odd-q layout with odd columns half a row lower.

use hexgate_core::{CellKind, GateSchedule, GridError, HexGrid, Point};
use rand::{Rng, RngExt};

const SAMPLE_LAYOUT: &str = "
    S..#.....
    ...#.....
    ...#..#..
    ......#..
    ...#..#..
    ...#.....
    ...#....G
";

/// Glyph drawn on path cells that are neither start nor goal.
pub const PATH_GLYPH: char = 'o';

/// The built-in level: a wall split by one gate, then a second wall with a
/// temporal opening.
pub fn sample_level() -> Result<HexGrid, GridError> {
    let mut grid = HexGrid::from_layout(SAMPLE_LAYOUT)?;
    grid.define_pattern("A", "11110000")?;
    grid.set_named_gate(Point::new(3, 3), "A")?;
    grid.set_temporal_wall(Point::new(6, 5), 6)?;
    Ok(grid)
}

/// A random board. Roughly `wall_percent` of the cells become walls and a
/// few become gates with random four-turn schedules. Start and goal are the
/// opposite corners.
pub fn random_level(
    width: i32,
    height: i32,
    wall_percent: u32,
    rng: &mut impl Rng,
) -> Result<HexGrid, GridError> {
    let mut grid = HexGrid::new(width, height)?;
    let (start, goal) = (grid.start(), grid.goal());
    for p in grid.bounds() {
        if p == start || p == goal {
            continue;
        }
        let roll: u32 = rng.random_range(0..100);
        let kind = if roll < wall_percent {
            CellKind::Wall
        } else if roll < wall_percent + 5 {
            let pattern: Vec<bool> = (0..4).map(|_| rng.random_bool(0.5)).collect();
            CellKind::Gate(GateSchedule::new(pattern, 4)?)
        } else {
            CellKind::Free
        };
        grid.set(p, kind)?;
    }
    log::debug!("random level {width}x{height}, {wall_percent}% walls");
    Ok(grid)
}

/// Draw `grid` with `path` overlaid.
///
/// Each board row takes two text lines: even columns on the first, odd
/// columns on the second, two characters apart.
pub fn render(grid: &HexGrid, path: &[Point]) -> String {
    let width = grid.width().max(0) as usize;
    let mut out = String::new();
    for y in 0..grid.height() {
        for parity in [0, 1] {
            let mut line = vec![' '; width * 2];
            for x in (parity..grid.width()).step_by(2) {
                let p = Point::new(x, y);
                let glyph = match grid.cell(p) {
                    _ if p == grid.start() => CellKind::Start.glyph(),
                    _ if p == grid.goal() => CellKind::Goal.glyph(),
                    Some(kind) if kind.is_static() && path.contains(&p) => PATH_GLYPH,
                    Some(kind) => kind.glyph(),
                    None => ' ',
                };
                line[x as usize * 2] = glyph;
            }
            let line: String = line.into_iter().collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out
}
