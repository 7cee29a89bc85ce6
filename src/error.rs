use thiserror::Error;
use qrs_colloc_core::ExpmError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("unknown trajectory component `{0}`")]
    UnknownComponent(String),

    #[error("duplicate trajectory component `{0}`")]
    DuplicateComponent(String),

    #[error("drive components must be contiguous and ordered, got {0:?}")]
    NonContiguousDrives(Vec<usize>),

    #[error("state `{name}` has dimension {dim}, which is not a valid {repr} dimension")]
    StateDimension { name: String, dim: usize, repr: &'static str },

    #[error("system has {system} drives but the drive components hold {components}")]
    DriveCount { system: usize, components: usize },

    #[error("system has {levels} levels but the state implies {ket_dim}")]
    SystemLevels { levels: usize, ket_dim: usize },

    #[error("generator has dimension {generator}, expected {expected}")]
    GeneratorDimension { generator: usize, expected: usize },

    #[error("timestep component `{0}` must have length one")]
    TimestepComponent(String),

    #[error("knot point has length {actual}, expected {expected}")]
    KnotPointLength { expected: usize, actual: usize },

    #[error("trajectory needs at least two knot points, got {0}")]
    TrajectoryLength(usize),

    #[error(transparent)]
    Numerical(#[from] ExpmError),
}
