use gridpath::pathfinding::{Cell, GridBounds, GridIndex};
use gridpath::{GridError, GridResult};
use rand::Rng;
use std::collections::HashSet;

fn invalid(reason: impl Into<String>) -> GridError {
    GridError::InvalidArgument {
        reason: reason.into(),
    }
}

/// Generic parser for delimited strings that return fixed-size arrays
pub fn parse_delimited<T, const N: usize>(
    input: &str,
    delimiter: char,
    type_name: &str,
    parser: impl Fn(&str) -> Result<T, std::num::ParseIntError>,
) -> GridResult<[T; N]>
where
    T: Copy + Default,
{
    let parts: Vec<&str> = input.split(delimiter).collect();
    if parts.len() != N {
        return Err(invalid(format!(
            "Invalid {type_name} format '{input}'. Expected {N} {delimiter}-separated values"
        )));
    }

    let mut result = [T::default(); N];
    for (i, part) in parts.iter().enumerate() {
        result[i] = parser(part.trim())
            .map_err(|_| invalid(format!("Invalid {type_name} value: '{part}'")))?;
    }

    Ok(result)
}

/// Parse size string "WIDTHxHEIGHT" with validation
pub fn parse_size(size_str: &str) -> GridResult<(i32, i32)> {
    let [width, height] = parse_delimited::<i32, 2>(size_str, 'x', "size", |s| s.parse())?;

    if width <= 0 || height <= 0 {
        return Err(invalid("Width and height must be greater than 0"));
    }

    if width > 4096 || height > 4096 {
        return Err(invalid("Width and height must not exceed 4096"));
    }

    Ok((width, height))
}

/// Parse cell string "X,Y"
pub fn parse_cell(cell_str: &str) -> GridResult<Cell> {
    let [x, y] = parse_delimited::<i32, 2>(cell_str, ',', "cell", |s| s.parse())?;
    Ok(Cell::new(x, y))
}

/// Parse a semicolon-separated list of cells "X,Y;X,Y"
pub fn parse_cell_list(list_str: &str) -> GridResult<Vec<Cell>> {
    list_str
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_cell)
        .collect()
}

/// Validate wall density and clamp to valid range
pub fn validate_density(density: f64) -> f64 {
    if !(0.0..=1.0).contains(&density) {
        println!(
            "Warning: Wall density {density} is out of range [0.0, 1.0], clamping to valid range"
        );
        density.clamp(0.0, 1.0)
    } else {
        density
    }
}

/// Grid layout read from an ASCII map
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayout {
    pub bounds: GridBounds,
    pub walls: Vec<Cell>,
    pub start: Option<Cell>,
    pub end: Option<Cell>,
}

/// Parse an ASCII map. The first line is the top row; `#` is a wall,
/// `S` and `E` mark the start and end, anything else is open.
pub fn parse_map(contents: &str) -> GridResult<MapLayout> {
    let rows: Vec<&str> = contents
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect();

    let height = rows.len() as i32;
    let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0) as i32;
    if width == 0 || height == 0 {
        return Err(invalid("Map is empty"));
    }

    let mut layout = MapLayout {
        bounds: GridBounds::from_size(width, height),
        walls: Vec::new(),
        start: None,
        end: None,
    };

    for (row, line) in rows.iter().enumerate() {
        let y = height - 1 - row as i32;
        for (x, ch) in line.chars().enumerate() {
            let cell = Cell::new(x as i32, y);
            match ch {
                '#' => layout.walls.push(cell),
                'S' => layout.start = Some(cell),
                'E' => layout.end = Some(cell),
                _ => {}
            }
        }
    }

    Ok(layout)
}

/// Pick random wall cells, never covering the `keep_clear` cells
pub fn random_walls(
    bounds: GridBounds,
    density: f64,
    keep_clear: &[Cell],
    rng: &mut impl Rng,
) -> Vec<Cell> {
    bounds
        .cells()
        .filter(|cell| !keep_clear.contains(cell))
        .filter(|_| rng.gen_bool(density))
        .collect()
}

/// Draw the grid top row first: `#` blocked, `*` path, `S`/`E` endpoints
pub fn render_grid(grid: &GridIndex, start: Cell, end: Cell, path: &[Cell]) -> String {
    let bounds = grid.bounds();
    let on_path: HashSet<Cell> = path.iter().copied().collect();
    let mut out = String::with_capacity(bounds.cell_count() + bounds.height() as usize);

    for y in (bounds.min.y..bounds.max.y).rev() {
        for x in bounds.min.x..bounds.max.x {
            let cell = Cell::new(x, y);
            let ch = if cell == start {
                'S'
            } else if cell == end {
                'E'
            } else if on_path.contains(&cell) {
                '*'
            } else if !grid.is_walkable(cell) {
                '#'
            } else {
                '.'
            };
            out.push(ch);
        }
        out.push('\n');
    }

    out
}
