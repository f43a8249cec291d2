use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("No reference nodes available for nearest-node assignment")]
    EmptyReferenceSet,

    #[error("Reference inputs are misaligned: {coordinates} coordinates but {ceilings} rated ceilings")]
    MisalignedInput { coordinates: usize, ceilings: usize },

    #[error("Non-finite coordinate ({longitude}, {latitude})")]
    NonFiniteCoordinate { longitude: f64, latitude: f64 },

    #[error("Invalid rated ceiling: {0}")]
    InvalidCeiling(String),

    #[error("Unknown graph node: {0}")]
    UnknownNode(usize),

    #[error("Self loop on node {0}")]
    SelfLoop(usize),

    #[error("Edge already exists between nodes {0} and {1}")]
    DuplicateEdge(usize, usize),

    #[error("Invalid edge weight: {0}")]
    InvalidWeight(f64),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
