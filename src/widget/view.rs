/// Which of the three widget panels is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Form,
    Loading,
    Result,
}

/// Visibility flags for the form, loading and result regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Panels {
    pub form: bool,
    pub loading: bool,
    pub result: bool,
}

impl ViewState {
    pub const ALL: [ViewState; 3] = [ViewState::Form, ViewState::Loading, ViewState::Result];

    pub fn panels(self) -> Panels {
        Panels {
            form: self == ViewState::Form,
            loading: self == ViewState::Loading,
            result: self == ViewState::Result,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewState::Form => "form",
            ViewState::Loading => "loading",
            ViewState::Result => "result",
        }
    }
}

impl Panels {
    pub fn visible_count(&self) -> usize {
        [self.form, self.loading, self.result]
            .iter()
            .filter(|visible| **visible)
            .count()
    }
}
