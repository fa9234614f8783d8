/// The memory of a running program.
///
/// The tape starts as a single zero cell and only ever grows to the right.
/// Moving left of the first cell leaves the pointer where it is; moving right
/// past the last cell appends a fresh zero cell. Cell arithmetic wraps at the
/// 0..=255 boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
}

/// A formatted view of the tape plus the number of lines it occupies, so a
/// caller can move the cursor back up and draw over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTape {
    pub text: String,
    pub lines: usize,
}

/// How many cells fit on one line of `width` columns.
///
/// Each cell takes five columns plus one separating space.
pub fn cells_per_line(width: usize) -> usize {
    (width + 1) / 6
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    pub fn new() -> Self {
        Self {
            cells: vec![0],
            pointer: 0,
        }
    }

    pub fn move_right(&mut self) {
        self.pointer += 1;
        if self.pointer == self.cells.len() {
            self.cells.push(0);
        }
    }

    pub fn move_left(&mut self) {
        self.pointer = self.pointer.saturating_sub(1);
    }

    pub fn increment(&mut self) {
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_add(1);
    }

    pub fn decrement(&mut self) {
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_sub(1);
    }

    pub fn read(&self) -> u8 {
        self.cells[self.pointer]
    }

    pub fn write(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Format every cell left-aligned in three columns, wrapped to `width`.
    ///
    /// Plain cells are padded with a space on each side; with
    /// `highlight_pointer` the current cell is wrapped in parentheses instead.
    /// Each line starts with one space of margin and ends with `\n`.
    pub fn render(&self, width: usize, highlight_pointer: bool) -> RenderedTape {
        let per_line = cells_per_line(width).max(1);
        let formatted: Vec<String> = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if highlight_pointer && i == self.pointer {
                    format!("({cell:<3})")
                } else {
                    format!(" {cell:<3} ")
                }
            })
            .collect();

        let mut text = String::new();
        let mut lines = 0;
        for row in formatted.chunks(per_line) {
            text.push(' ');
            text.push_str(&row.join(" "));
            text.push('\n');
            lines += 1;
        }

        RenderedTape { text, lines }
    }
}
