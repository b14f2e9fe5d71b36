use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShowerError {
    #[error("Invalid event id {index}: expected 0 <= id < {event_count}")]
    InvalidIndex { index: i64, event_count: usize },

    #[error("Entry is empty for event id {0}")]
    EmptyEntry(usize),

    #[error(
        "Axis fit did not converge after {iterations} iterations ({function_calls} function calls)"
    )]
    FitNonConvergent {
        iterations: usize,
        function_calls: usize,
    },

    #[error("Hit layer index {layer} outside of the detector (n_slabs = {n_slabs})")]
    LayerOutOfRange { layer: usize, n_slabs: usize },

    #[error("Invalid display parameter: {0}")]
    InvalidDisplayParameter(String),

    #[error("Invalid fit parameter: {0}")]
    InvalidFitParameter(String),

    #[error("Invalid event id input: {0}")]
    InvalidPromptInput(String),

    #[error("Unable to perform I/O operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl PartialEq for ShowerError {
    fn eq(&self, other: &Self) -> bool {
        use ShowerError::*;
        match (self, other) {
            (
                InvalidIndex {
                    index: a,
                    event_count: n,
                },
                InvalidIndex {
                    index: b,
                    event_count: m,
                },
            ) => a == b && n == m,
            (EmptyEntry(a), EmptyEntry(b)) => a == b,
            (
                FitNonConvergent {
                    iterations: a,
                    function_calls: c,
                },
                FitNonConvergent {
                    iterations: b,
                    function_calls: d,
                },
            ) => a == b && c == d,
            (
                LayerOutOfRange {
                    layer: a,
                    n_slabs: n,
                },
                LayerOutOfRange {
                    layer: b,
                    n_slabs: m,
                },
            ) => a == b && n == m,
            (InvalidDisplayParameter(a), InvalidDisplayParameter(b)) => a == b,
            (InvalidFitParameter(a), InvalidFitParameter(b)) => a == b,
            (InvalidPromptInput(a), InvalidPromptInput(b)) => a == b,

            // not comparable: equal when same variant
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
