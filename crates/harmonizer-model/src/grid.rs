//! Grid access traits and the in-memory grid.

/// Row-major string matrix, the shape every import/export boundary uses.
pub type Matrix = Vec<Vec<String>>;

/// A single value to be written into the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellWrite {
    pub row: usize,
    pub col: usize,
    pub value: String,
}

impl CellWrite {
    pub fn new(row: usize, col: usize, value: impl Into<String>) -> Self {
        Self {
            row,
            col,
            value: value.into(),
        }
    }
}

/// Read access to a grid of data rows.
pub trait GridView {
    /// Cell value; cells outside the grid read as `""`.
    fn value_at(&self, row: usize, col: usize) -> &str;

    fn row_count(&self) -> usize;

    /// True when every cell of the row is blank (whitespace counts as blank).
    fn is_row_empty(&self, row: usize) -> bool;
}

/// Write access on top of [`GridView`].
pub trait GridMut: GridView {
    fn set_value_at(&mut self, row: usize, col: usize, value: String);

    fn apply_writes(&mut self, writes: impl IntoIterator<Item = CellWrite>)
    where
        Self: Sized,
    {
        for write in writes {
            self.set_value_at(write.row, write.col, write.value);
        }
    }
}

/// In-memory grid with a fixed column count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Matrix,
    width: usize,
}

impl Grid {
    pub fn new(width: usize) -> Self {
        Self {
            rows: Vec::new(),
            width,
        }
    }

    /// Build a grid, padding or truncating every row to `width` cells.
    pub fn from_rows(width: usize, rows: Matrix) -> Self {
        let mut grid = Self::new(width);
        for row in rows {
            grid.push_row(row);
        }
        grid
    }

    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.width, String::new());
        self.rows.push(row);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// Rows with the trailing run of empty rows removed.
    pub fn trimmed_rows(&self) -> &[Vec<String>] {
        let mut end = self.rows.len();
        while end > 0 && self.is_row_empty(end - 1) {
            end -= 1;
        }
        &self.rows[..end]
    }

    pub fn into_rows(self) -> Matrix {
        self.rows
    }
}

impl GridView for Grid {
    fn value_at(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map_or("", String::as_str)
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn is_row_empty(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_none_or(|cells| cells.iter().all(|cell| cell.trim().is_empty()))
    }
}

impl GridMut for Grid {
    fn set_value_at(&mut self, row: usize, col: usize, value: String) {
        if col >= self.width {
            return;
        }
        while self.rows.len() <= row {
            self.rows.push(vec![String::new(); self.width]);
        }
        self.rows[row][col] = value;
    }
}

/// The two canonical header rows: section names over field names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderRows {
    /// Section name in the first column of each section, `""` elsewhere.
    pub primary: Vec<String>,
    /// Field names in column order.
    pub secondary: Vec<String>,
}

impl HeaderRows {
    pub fn width(&self) -> usize {
        self.secondary.len()
    }

    pub fn to_matrix(&self) -> Matrix {
        vec![self.primary.clone(), self.secondary.clone()]
    }
}
