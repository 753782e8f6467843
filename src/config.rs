//! Window and patch pre-pass configuration, bundled into a small parameter
//! struct mirroring the knob-bag every `whitebox_tools` tool struct carries,
//! shrunk to just what the facade dispatches on (no file paths, no output
//! format, no verbosity flag — those stay a CLI concern this crate does not
//! own).

/// The shape of the moving window centred on each output cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Window {
    /// Covers `[row-radius, row+radius] x [col-radius, col+radius]`.
    Square { radius: i32 },
    /// Covers every offset `(dr, dc)` with `dr*dr + dc*dc <= floor(radius)^2`.
    Circle { radius: f64 },
}

impl Window {
    /// The square-equivalent integer radius used to size column buffers /
    /// cursor offset tables (for a circle, the floor of the real radius).
    pub fn integer_radius(&self) -> i32 {
        match *self {
            Window::Square { radius } => radius,
            Window::Circle { radius } => radius.floor() as i32,
        }
    }
}

/// 4- ("rook") or 8- ("queen") connectivity for the patch pre-pass. Queen is
/// the default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connectivity {
    Rook,
    Queen,
}

impl Default for Connectivity {
    fn default() -> Self {
        Connectivity::Queen
    }
}

/// Bundles the knobs the facade dispatches on: the window shape, and the
/// connectivity used only when the chosen indicator is patch-valued.
#[derive(Clone, Copy, Debug)]
pub struct SweepConfig {
    pub window: Window,
    pub connectivity: Connectivity,
}

impl SweepConfig {
    pub fn new(window: Window) -> Self {
        SweepConfig {
            window,
            connectivity: Connectivity::default(),
        }
    }

    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queen_is_the_default_connectivity() {
        assert_eq!(Connectivity::default(), Connectivity::Queen);
    }

    #[test]
    fn circle_integer_radius_floors() {
        let w = Window::Circle { radius: 2.9 };
        assert_eq!(w.integer_radius(), 2);
    }
}
