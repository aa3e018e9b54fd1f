//! Core domain types for ultimate tic-tac-toe.

use serde::{Deserialize, Serialize};

/// Player in the game.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Player X (goes first).
    #[default]
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn other(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Returns the mark this player writes into cells.
    pub fn mark(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

/// Content of a single cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// No mark yet.
    #[default]
    Empty,
    /// Marked by player X.
    X,
    /// Marked by player O.
    O,
}

impl Cell {
    /// Returns the player whose mark this is, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
        }
    }

    /// Checks whether the cell is unmarked.
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => write!(f, "."),
            Cell::X => write!(f, "X"),
            Cell::O => write!(f, "O"),
        }
    }
}

/// Index of one position inside a 3x3 grid, 0-8 in row-major order.
///
/// The same type addresses sub-boards within the super-board and cells
/// within a sub-board. Out-of-range indices cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Slot(u8);

impl Slot {
    /// All nine slots in index order.
    pub const ALL: [Slot; 9] = [
        Slot(0),
        Slot(1),
        Slot(2),
        Slot(3),
        Slot(4),
        Slot(5),
        Slot(6),
        Slot(7),
        Slot(8),
    ];

    /// The eight winning lines: rows 0-2, columns 0-2, then the two diagonals.
    pub const LINES: [[Slot; 3]; 8] = [
        // Rows
        [Slot(0), Slot(1), Slot(2)],
        [Slot(3), Slot(4), Slot(5)],
        [Slot(6), Slot(7), Slot(8)],
        // Columns
        [Slot(0), Slot(3), Slot(6)],
        [Slot(1), Slot(4), Slot(7)],
        [Slot(2), Slot(5), Slot(8)],
        // Diagonals
        [Slot(0), Slot(4), Slot(8)],
        [Slot(2), Slot(4), Slot(6)],
    ];

    /// Creates a slot from row and column, both in 0-2.
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < 3 && col < 3 {
            Some(Slot(row * 3 + col))
        } else {
            None
        }
    }

    /// Creates a slot from a 0-8 row-major index.
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 9 { Some(Slot(index)) } else { None }
    }

    /// Returns the 0-8 row-major index.
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the row, 0-2.
    pub const fn row(self) -> u8 {
        self.0 / 3
    }

    /// Returns the column, 0-2.
    pub const fn col(self) -> u8 {
        self.0 % 3
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row(), self.col())
    }
}

/// A single 3x3 cell grid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Board {
    /// Cells in row-major order.
    cells: [[Cell; 3]; 3],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board from raw cell contents.
    pub fn from_cells(cells: [[Cell; 3]; 3]) -> Self {
        Self { cells }
    }

    /// Gets the cell at the given slot.
    pub fn get(&self, slot: Slot) -> Cell {
        self.cells[slot.row() as usize][slot.col() as usize]
    }

    /// Sets the cell at the given slot.
    pub fn set(&mut self, slot: Slot, cell: Cell) {
        self.cells[slot.row() as usize][slot.col() as usize] = cell;
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[[Cell; 3]; 3] {
        &self.cells
    }

    /// Checks whether any cell is still unmarked.
    pub fn has_empty(&self) -> bool {
        self.cells.iter().flatten().any(|c| c.is_empty())
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (row, line) in self.cells.iter().enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            write!(f, "{} {} {}", line[0], line[1], line[2])?;
        }
        Ok(())
    }
}

/// The outer 3x3 arrangement of sub-boards.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SuperBoard {
    /// Sub-boards in row-major order.
    boards: [[Board; 3]; 3],
}

impl SuperBoard {
    /// Creates a new super-board of empty sub-boards.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the sub-board at the given slot.
    pub fn board(&self, slot: Slot) -> &Board {
        &self.boards[slot.row() as usize][slot.col() as usize]
    }

    /// Gets the sub-board at the given slot mutably.
    pub fn board_mut(&mut self, slot: Slot) -> &mut Board {
        &mut self.boards[slot.row() as usize][slot.col() as usize]
    }

    /// Returns all sub-boards.
    pub fn boards(&self) -> &[[Board; 3]; 3] {
        &self.boards
    }
}

impl std::fmt::Display for SuperBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for band in 0..3 {
            if band > 0 {
                writeln!(f, "------+-------+------")?;
            }
            for row in 0..3 {
                for bcol in 0..3 {
                    if bcol > 0 {
                        write!(f, " | ")?;
                    }
                    let line = self.boards[band][bcol].cells()[row];
                    write!(f, "{} {} {}", line[0], line[1], line[2])?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Fully addresses one cell inside the super-board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MoveRequest {
    /// Which sub-board to play in.
    board: Slot,
    /// Which cell of that sub-board to mark.
    cell: Slot,
}

impl MoveRequest {
    /// Creates a move request from board and cell slots.
    pub fn new(board: Slot, cell: Slot) -> Self {
        Self { board, cell }
    }

    /// Creates a move request from board and cell coordinates, each in 0-2.
    pub fn from_coords(board_row: u8, board_col: u8, cell_row: u8, cell_col: u8) -> Option<Self> {
        let board = Slot::new(board_row, board_col)?;
        let cell = Slot::new(cell_row, cell_col)?;
        Some(Self { board, cell })
    }

    /// Returns the addressed sub-board.
    pub fn board(self) -> Slot {
        self.board
    }

    /// Returns the addressed cell within the sub-board.
    pub fn cell(self) -> Slot {
        self.cell
    }
}

impl std::fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "board {}, cell {}", self.board, self.cell)
    }
}
