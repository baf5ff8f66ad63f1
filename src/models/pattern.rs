/// Colour of one run along a scan line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Dark run (at or below the line mean)
    Bar,
    /// Light run (above the line mean)
    Space,
}

impl RunState {
    pub fn flipped(self) -> Self {
        match self {
            RunState::Bar => RunState::Space,
            RunState::Space => RunState::Bar,
        }
    }
}

/// One run of equal-state pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run {
    pub state: RunState,
    pub width: u32,
}

/// Alternating bar/space run lengths along one horizontal line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunLengthPattern {
    runs: Vec<Run>,
}

impl RunLengthPattern {
    /// Build from runs. Adjacent runs must alternate state; equal-state
    /// neighbours are merged.
    pub fn from_runs(runs: impl IntoIterator<Item = Run>) -> Self {
        let mut merged: Vec<Run> = Vec::new();
        for run in runs {
            if run.width == 0 {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.state == run.state => last.width += run.width,
                _ => merged.push(run),
            }
        }
        Self { runs: merged }
    }

    /// Build an alternating pattern from widths, starting with `first`
    pub fn from_widths(first: RunState, widths: &[u32]) -> Self {
        let mut state = first;
        let runs = widths.iter().map(|&width| {
            let run = Run { state, width };
            state = state.flipped();
            run
        });
        Self::from_runs(runs)
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn widths(&self) -> impl Iterator<Item = u32> + '_ {
        self.runs.iter().map(|r| r.width)
    }

    /// Total pixels covered
    pub fn span(&self) -> u32 {
        self.widths().sum()
    }
}
