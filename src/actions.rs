use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Apply the next step.
    Advance,
    /// Undo the last applied step.
    Retreat,
    Quit,
}

impl Action {
    /// Order used when listing bindings in the status bar.
    pub const ALL: [Action; 3] = [Action::Advance, Action::Retreat, Action::Quit];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Advance => "Next step",
            Action::Retreat => "Previous step",
            Action::Quit => "Quit",
        };
        write!(f, "{}", s)
    }
}
